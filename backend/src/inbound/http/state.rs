//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    ComicAdminCommand, ComicCatalogueQuery, CurrentUserResolver, WishlistCommand,
};

/// Parameter object bundling all port implementations for HTTP handlers.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub identity: Arc<dyn CurrentUserResolver>,
    pub catalogue: Arc<dyn ComicCatalogueQuery>,
    pub wishlist: Arc<dyn WishlistCommand>,
    pub admin: Arc<dyn ComicAdminCommand>,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub identity: Arc<dyn CurrentUserResolver>,
    pub catalogue: Arc<dyn ComicCatalogueQuery>,
    pub wishlist: Arc<dyn WishlistCommand>,
    pub admin: Arc<dyn ComicAdminCommand>,
}

impl std::fmt::Debug for HttpState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpState").finish_non_exhaustive()
    }
}

impl From<HttpStatePorts> for HttpState {
    fn from(ports: HttpStatePorts) -> Self {
        Self::new(ports)
    }
}

impl HttpState {
    /// Construct state from a ports bundle.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use backend::domain::{
    ///     CatalogueQueryService, ComicAdminService, IdentityResolver, WishlistLedger,
    /// };
    /// use backend::inbound::http::state::{HttpState, HttpStatePorts};
    /// use backend::outbound::memory::{InMemoryComicRepository, InMemoryUserRepository};
    ///
    /// let comics = Arc::new(InMemoryComicRepository::new());
    /// let users = Arc::new(InMemoryUserRepository::new());
    /// let state = HttpState::new(HttpStatePorts {
    ///     identity: Arc::new(IdentityResolver::new(users.clone())),
    ///     catalogue: Arc::new(CatalogueQueryService::new(comics.clone())),
    ///     wishlist: Arc::new(WishlistLedger::new(users, comics.clone())),
    ///     admin: Arc::new(ComicAdminService::new(comics)),
    /// });
    /// let _catalogue = state.catalogue.clone();
    /// ```
    pub fn new(ports: HttpStatePorts) -> Self {
        let HttpStatePorts {
            identity,
            catalogue,
            wishlist,
            admin,
        } = ports;
        Self {
            identity,
            catalogue,
            wishlist,
            admin,
        }
    }
}
