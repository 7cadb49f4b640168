//! Shared harness wiring the catalogue HTTP surface over in-memory stores.

use std::sync::Arc;

use actix_http::Request;
use actix_web::body::BoxBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::{App, test, web};
use backend::Trace;
use backend::domain::ports::ComicRepository;
use backend::domain::{
    CatalogueQueryService, ComicAdminService, ComicId, IdentityResolver, NewComic, Nickname,
    Price, User, UserId, WishlistLedger,
};
use backend::inbound::http::comics;
use backend::inbound::http::error::{json_config, query_config};
use backend::inbound::http::state::{HttpState, HttpStatePorts};
use backend::outbound::memory::{InMemoryComicRepository, InMemoryUserRepository};
use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::NaiveDate;

/// Stores and seeded users behind a test app.
pub struct Catalogue {
    pub comics: Arc<InMemoryComicRepository>,
    pub users: Arc<InMemoryUserRepository>,
    pub reader: User,
    pub admin: User,
}

impl Catalogue {
    pub fn new() -> Self {
        let reader = User::new(
            UserId::random(),
            Nickname::new("Franco777").expect("valid nickname"),
            "hash",
        );
        let admin = User::new(
            UserId::random(),
            Nickname::new("curator").expect("valid nickname"),
            "hash",
        )
        .with_admin(true);
        Self {
            comics: Arc::new(InMemoryComicRepository::new()),
            users: Arc::new(InMemoryUserRepository::with_users([
                reader.clone(),
                admin.clone(),
            ])),
            reader,
            admin,
        }
    }

    /// Insert a comic directly into the store.
    pub async fn seed(&self, title: &str, publisher: &str, authors: &[&str], price: f64) -> ComicId {
        let id = ComicId::random();
        let comic = NewComic::new(
            title,
            publisher,
            authors.iter().map(|name| (*name).to_owned()).collect(),
            Price::new(price).expect("valid price"),
            NaiveDate::from_ymd_opt(2019, 12, 27).expect("valid date"),
        )
        .expect("valid comic")
        .into_comic(id);
        self.comics.insert(&comic).await.expect("seed comic");
        id
    }

    fn state(&self) -> HttpState {
        HttpState::new(HttpStatePorts {
            identity: Arc::new(IdentityResolver::new(self.users.clone())),
            catalogue: Arc::new(CatalogueQueryService::new(self.comics.clone())),
            wishlist: Arc::new(WishlistLedger::new(self.users.clone(), self.comics.clone())),
            admin: Arc::new(ComicAdminService::new(self.comics.clone())),
        })
    }

    pub async fn app(
        &self,
    ) -> impl Service<Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error> {
        test::init_service(
            App::new()
                .app_data(web::Data::new(self.state()))
                .app_data(json_config())
                .app_data(query_config())
                .wrap(Trace)
                .configure(comics::configure),
        )
        .await
    }
}

/// `Authorization` header value naming `user`.
pub fn bearer(user: &User) -> String {
    let payload = URL_SAFE_NO_PAD.encode(format!(r#"{{"sub":"{}","iat":1700000000}}"#, user.id));
    format!("Bearer eyJhbGciOiJIUzI1NiJ9.{payload}.signature")
}
