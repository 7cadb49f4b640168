//! Request identity extraction.
//!
//! Keeps handlers free of header parsing: the extractor hands the
//! `Authorization` header to the configured [`CurrentUserResolver`] and
//! exposes the outcome as an optional [`User`].
//!
//! [`CurrentUserResolver`]: crate::domain::ports::CurrentUserResolver

use actix_web::http::header::AUTHORIZATION;
use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use futures_util::future::LocalBoxFuture;
use tracing::warn;

use crate::domain::{AccessPolicy, Error, UNAUTHORIZED_MESSAGE, User, authorize};
use crate::inbound::http::state::HttpState;

/// Optional identity resolved for the current request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestIdentity(Option<User>);

impl RequestIdentity {
    pub fn anonymous() -> Self {
        Self(None)
    }

    pub fn user(&self) -> Option<&User> {
        self.0.as_ref()
    }

    /// Check the route policy against this identity.
    pub fn authorize(&self, policy: AccessPolicy) -> Result<(), Error> {
        authorize(policy, self.user())
    }

    /// Require a resolved user, failing with `403 Forbidden` otherwise.
    pub fn require_user(&self) -> Result<&User, Error> {
        self.authorize(AccessPolicy::AuthenticatedUser)?;
        self.user()
            .ok_or_else(|| Error::forbidden(UNAUTHORIZED_MESSAGE))
    }
}

impl From<Option<User>> for RequestIdentity {
    fn from(value: Option<User>) -> Self {
        Self(value)
    }
}

impl FromRequest for RequestIdentity {
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let state = req.app_data::<web::Data<HttpState>>().cloned();
        let header = req
            .headers()
            .get(AUTHORIZATION)
            .map(|value| value.to_str().map(str::to_owned));

        Box::pin(async move {
            let state =
                state.ok_or_else(|| Error::internal("HTTP state is not configured"))?;
            let header = match header {
                None => None,
                Some(Ok(value)) => Some(value),
                Some(Err(error)) => {
                    warn!(%error, "authorization header is not visible ASCII");
                    return Err(Error::internal(
                        "authorization header is not visible ASCII",
                    ));
                }
            };
            state.identity.resolve(header.as_deref()).await.map(Self)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ErrorCode, Nickname, UserId};
    use crate::inbound::http::test_utils::{bearer_for, state_with_users};
    use actix_web::http::StatusCode;
    use actix_web::test as actix_test;
    use actix_web::{App, HttpResponse};
    use rstest::rstest;

    fn reader() -> User {
        User::new(
            UserId::random(),
            Nickname::new("reader").expect("valid nickname"),
            "hash",
        )
    }

    async fn whoami(identity: RequestIdentity) -> HttpResponse {
        let nickname = identity
            .user()
            .map_or_else(|| "anonymous".to_owned(), |user| user.nickname.to_string());
        HttpResponse::Ok().body(nickname)
    }

    #[actix_web::test]
    async fn resolves_the_bearer_subject() {
        let user = reader();
        let app = actix_test::init_service(
            App::new()
                .app_data(web::Data::new(state_with_users([user.clone()])))
                .route("/", web::get().to(whoami)),
        )
        .await;
        let req = actix_test::TestRequest::get()
            .uri("/")
            .insert_header((AUTHORIZATION, bearer_for(&user.id)))
            .to_request();
        let body = actix_test::call_and_read_body(&app, req).await;
        assert_eq!(body.as_ref(), b"reader");
    }

    #[actix_web::test]
    async fn missing_header_is_anonymous() {
        let app = actix_test::init_service(
            App::new()
                .app_data(web::Data::new(state_with_users(Vec::<User>::new())))
                .route("/", web::get().to(whoami)),
        )
        .await;
        let req = actix_test::TestRequest::get().uri("/").to_request();
        let body = actix_test::call_and_read_body(&app, req).await;
        assert_eq!(body.as_ref(), b"anonymous");
    }

    #[actix_web::test]
    async fn missing_state_is_an_internal_error() {
        let app = actix_test::init_service(App::new().route("/", web::get().to(whoami))).await;
        let req = actix_test::TestRequest::get().uri("/").to_request();
        let res = actix_test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[rstest]
    #[case(AccessPolicy::Public, true)]
    #[case(AccessPolicy::AuthenticatedUser, false)]
    #[case(AccessPolicy::AdminOnly, false)]
    fn anonymous_identity_only_passes_public_routes(
        #[case] policy: AccessPolicy,
        #[case] allowed: bool,
    ) {
        assert_eq!(RequestIdentity::anonymous().authorize(policy).is_ok(), allowed);
    }

    #[rstest]
    fn require_user_returns_the_reader() {
        let user = reader();
        let identity = RequestIdentity::from(Some(user.clone()));
        assert_eq!(identity.require_user().expect("resolved"), &user);
        let err = RequestIdentity::anonymous()
            .require_user()
            .expect_err("anonymous");
        assert_eq!(err.code(), ErrorCode::Forbidden);
    }
}
