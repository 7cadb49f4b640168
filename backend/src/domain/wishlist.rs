//! Wishlist and purchase ledger.
//!
//! Both operations rewrite a user's comic lists. Writes are guarded by the
//! user's revision: a concurrent writer makes `save_lists` fail with a
//! revision mismatch, the ledger reloads the user and reapplies the change,
//! giving up after [`MAX_ATTEMPTS`].

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::{debug, info};

use super::error_mapping::{comic_not_found, comic_store_error, user_store_error};
use super::ports::{ComicRepository, UserRepository, UserRepositoryError, WishlistCommand};
use super::{ComicId, Error, User};

/// Upper bound on optimistic write attempts per request.
pub const MAX_ATTEMPTS: u32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ListChange {
    Wish,
    Purchase,
}

impl ListChange {
    /// Apply the change in place; `false` means the lists are untouched.
    fn apply(self, user: &mut User, comic: ComicId) -> bool {
        match self {
            Self::Wish => user.add_to_wishlist(comic),
            Self::Purchase => {
                user.record_purchase(comic);
                true
            }
        }
    }
}

/// Domain service implementing [`WishlistCommand`].
#[derive(Clone)]
pub struct WishlistLedger<U: ?Sized, C: ?Sized> {
    users: Arc<U>,
    comics: Arc<C>,
}

impl<U: ?Sized, C: ?Sized> WishlistLedger<U, C> {
    pub fn new(users: Arc<U>, comics: Arc<C>) -> Self {
        Self { users, comics }
    }
}

impl<U, C> WishlistLedger<U, C>
where
    U: UserRepository + ?Sized,
    C: ComicRepository + ?Sized,
{
    async fn ensure_comic_exists(&self, comic: &ComicId) -> Result<(), Error> {
        self.comics
            .find_by_id(comic)
            .await
            .map_err(comic_store_error)?
            .map(|_| ())
            .ok_or_else(|| comic_not_found(&comic.to_string()))
    }

    async fn reload(&self, user: &User) -> Result<User, Error> {
        self.users
            .find_by_id(&user.id)
            .await
            .map_err(user_store_error)?
            .ok_or_else(|| Error::internal(format!("user {} disappeared during the request", user.id)))
    }

    async fn commit(&self, user: &User, comic: ComicId, change: ListChange) -> Result<User, Error> {
        self.ensure_comic_exists(&comic).await?;

        let mut current = user.clone();
        for attempt in 1..=MAX_ATTEMPTS {
            let mut next = current.clone();
            if !change.apply(&mut next, comic) {
                debug!(user_id = %next.id, %comic, "comic already on wishlist");
                return Ok(next);
            }
            let expected = current.revision;
            next.revision = expected.saturating_add(1);

            match self.users.save_lists(&next, expected).await {
                Ok(()) => {
                    info!(user_id = %next.id, %comic, ?change, "user lists updated");
                    return Ok(next);
                }
                Err(UserRepositoryError::RevisionMismatch { expected, actual }) => {
                    debug!(
                        user_id = %next.id,
                        attempt,
                        expected,
                        actual,
                        "concurrent list update"
                    );
                    if attempt < MAX_ATTEMPTS {
                        current = self.reload(&current).await?;
                    }
                }
                Err(other) => return Err(user_store_error(other)),
            }
        }

        Err(
            Error::conflict("user lists changed concurrently, please retry").with_details(json!({
                "code": "revision_mismatch",
                "attempts": MAX_ATTEMPTS,
            })),
        )
    }
}

#[async_trait]
impl<U, C> WishlistCommand for WishlistLedger<U, C>
where
    U: UserRepository + ?Sized,
    C: ComicRepository + ?Sized,
{
    async fn add_to_wishlist(&self, user: &User, comic: &ComicId) -> Result<User, Error> {
        self.commit(user, *comic, ListChange::Wish).await
    }

    async fn purchase(&self, user: &User, comic: &ComicId) -> Result<User, Error> {
        self.commit(user, *comic, ListChange::Purchase).await
    }
}
