//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;

use crate::domain::{
    CatalogueQueryService, ComicAdminService, IdentityResolver, User, UserId, WishlistLedger,
};
use crate::inbound::http::state::{HttpState, HttpStatePorts};
use crate::outbound::memory::{InMemoryComicRepository, InMemoryUserRepository};

/// Build an `Authorization` header value whose payload names `user_id`.
///
/// The header and signature segments are placeholders; only the payload is
/// ever decoded.
pub fn bearer_for(user_id: &UserId) -> String {
    let payload = URL_SAFE_NO_PAD.encode(format!(r#"{{"sub":"{user_id}","iat":1700000000}}"#));
    format!("Bearer eyJhbGciOiJIUzI1NiJ9.{payload}.signature")
}

/// Wire the real domain services over in-memory stores seeded with `users`.
pub fn state_with_users(users: impl IntoIterator<Item = User>) -> HttpState {
    let comics = Arc::new(InMemoryComicRepository::new());
    let users = Arc::new(InMemoryUserRepository::with_users(users));
    HttpState::new(HttpStatePorts {
        identity: Arc::new(IdentityResolver::new(users.clone())),
        catalogue: Arc::new(CatalogueQueryService::new(comics.clone())),
        wishlist: Arc::new(WishlistLedger::new(users, comics.clone())),
        admin: Arc::new(ComicAdminService::new(comics)),
    })
}
