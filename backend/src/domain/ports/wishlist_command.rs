//! Driving port for wishlist and purchase transitions.

use async_trait::async_trait;

use crate::domain::{ComicId, Error, User};

/// Domain use-case port applying list transitions for the calling user.
///
/// `user` is the identity resolved for the request. Implementations may
/// reload it from the store when a concurrent writer wins the race.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WishlistCommand: Send + Sync {
    /// Append `comic` to the user's wishlist, returning the stored user.
    async fn add_to_wishlist(&self, user: &User, comic: &ComicId) -> Result<User, Error>;

    /// Record a purchase of `comic`, returning the stored user.
    async fn purchase(&self, user: &User, comic: &ComicId) -> Result<User, Error>;
}
