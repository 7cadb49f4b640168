//! Driving port for administrator catalogue curation.

use async_trait::async_trait;

use crate::domain::{Comic, ComicId, ComicPatch, Error, NewComic};

/// Domain use-case port for creating, editing and deleting comics.
///
/// Callers are expected to have passed the admin-only authorization gate.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ComicAdminCommand: Send + Sync {
    /// Store a new comic and return its id.
    async fn create(&self, comic: NewComic) -> Result<ComicId, Error>;

    /// Apply a partial update and return the stored result.
    async fn edit(&self, id: &ComicId, patch: ComicPatch) -> Result<Comic, Error>;

    /// Remove a comic.
    async fn delete(&self, id: &ComicId) -> Result<(), Error>;
}
