//! Cross-origin policy for browser clients.

use actix_cors::Cors;
use actix_web::http::{Method, header};

use crate::domain::TRACE_ID_HEADER;

const PREFLIGHT_MAX_AGE_SECS: usize = 86_400;

/// Build the CORS middleware.
///
/// An empty `allowed_origins` admits every origin; otherwise only the listed
/// origins are echoed back. The `trace-id` response header is exposed to
/// scripts.
pub fn cors_layer(allowed_origins: &[String]) -> Cors {
    let cors = Cors::default()
        .allowed_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allowed_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
        .expose_headers([TRACE_ID_HEADER])
        .max_age(PREFLIGHT_MAX_AGE_SECS);
    if allowed_origins.is_empty() {
        return cors.allow_any_origin();
    }
    allowed_origins
        .iter()
        .fold(cors, |cors, origin| cors.allowed_origin(origin))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::test::{self as actix_test, TestRequest};
    use actix_web::{App, HttpResponse, web};

    async fn status_and_allow_origin(
        allowed: &[String],
        request: TestRequest,
    ) -> (StatusCode, Option<String>) {
        let app = actix_test::init_service(
            App::new()
                .wrap(cors_layer(allowed))
                .route("/comics", web::get().to(HttpResponse::Ok)),
        )
        .await;
        let response = actix_test::call_service(&app, request.to_request()).await;
        let origin = response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);
        (response.status(), origin)
    }

    fn preflight(origin: &str) -> TestRequest {
        TestRequest::default()
            .method(Method::OPTIONS)
            .uri("/comics")
            .insert_header((header::ORIGIN, origin))
            .insert_header((header::ACCESS_CONTROL_REQUEST_METHOD, "GET"))
    }

    #[actix_web::test]
    async fn any_origin_is_echoed_when_unrestricted() {
        let request = TestRequest::get()
            .uri("/comics")
            .insert_header((header::ORIGIN, "https://shop.example"));

        let (status, origin) = status_and_allow_origin(&[], request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(origin.as_deref(), Some("https://shop.example"));
    }

    #[actix_web::test]
    async fn preflight_is_answered_for_listed_origin() {
        let allowed = vec!["https://shop.example".to_owned()];

        let (status, origin) =
            status_and_allow_origin(&allowed, preflight("https://shop.example")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(origin.as_deref(), Some("https://shop.example"));
    }

    #[actix_web::test]
    async fn unlisted_origin_gets_no_grant() {
        let allowed = vec!["https://shop.example".to_owned()];

        let (status, origin) =
            status_and_allow_origin(&allowed, preflight("https://evil.example")).await;

        assert_ne!(status, StatusCode::OK);
        assert_eq!(origin, None);
    }
}
