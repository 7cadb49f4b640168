//! Builders wiring domain services to either Diesel or in-memory adapters.

use std::sync::Arc;

use actix_web::web;
use tracing::warn;

use backend::domain::ports::{ComicRepository, SaltRepository, UserRepository};
use backend::domain::{
    CatalogueQueryService, ComicAdminService, IdentityResolver, UserProvisioner, WishlistLedger,
};
use backend::inbound::http::state::{HttpState, HttpStatePorts};
use backend::outbound::memory::{
    InMemoryComicRepository, InMemorySaltRepository, InMemoryUserRepository,
};
use backend::outbound::persistence::{
    DbPool, DieselComicRepository, DieselSaltRepository, DieselUserRepository,
};
use backend::seeding::{SeedingError, seed_users_on_startup};

use super::ServerConfig;

/// The driven ports shared by every service.
struct Stores {
    comics: Arc<dyn ComicRepository>,
    users: Arc<dyn UserRepository>,
    salts: Arc<dyn SaltRepository>,
}

impl Stores {
    fn diesel(pool: &DbPool) -> Self {
        Self {
            comics: Arc::new(DieselComicRepository::new(pool.clone())),
            users: Arc::new(DieselUserRepository::new(pool.clone())),
            salts: Arc::new(DieselSaltRepository::new(pool.clone())),
        }
    }

    fn in_memory() -> Self {
        warn!("no database configured; comics and users live in process memory");
        Self {
            comics: Arc::new(InMemoryComicRepository::new()),
            users: Arc::new(InMemoryUserRepository::new()),
            salts: Arc::new(InMemorySaltRepository::new()),
        }
    }

    fn into_ports(self) -> HttpStatePorts {
        let Self { comics, users, .. } = self;
        HttpStatePorts {
            identity: Arc::new(IdentityResolver::new(users.clone())),
            catalogue: Arc::new(CatalogueQueryService::new(comics.clone())),
            wishlist: Arc::new(WishlistLedger::new(users, comics.clone())),
            admin: Arc::new(ComicAdminService::new(comics)),
        }
    }
}

/// Build the shared HTTP state from the server configuration.
///
/// Users listed in the configured seed file are provisioned before any
/// request is served.
pub(super) async fn build_http_state(
    config: &ServerConfig,
) -> Result<web::Data<HttpState>, SeedingError> {
    let stores = match &config.db_pool {
        Some(pool) => Stores::diesel(pool),
        None => Stores::in_memory(),
    };
    let provisioner = UserProvisioner::new(stores.users.clone(), stores.salts.clone());
    seed_users_on_startup(config.seed_users.as_deref(), &provisioner).await?;
    Ok(web::Data::new(HttpState::new(stores.into_ports())))
}
