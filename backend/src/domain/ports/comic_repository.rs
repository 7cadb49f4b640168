//! Port for comic catalogue persistence.
//!
//! Adapters must apply [`ComicFilter`] with the semantics documented on that
//! type and return pages in the store's stable insertion order, so that
//! consecutive pages neither overlap nor skip entries.

use async_trait::async_trait;

use crate::domain::{Comic, ComicFilter, ComicId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by comic repository adapters.
    pub enum ComicRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "comic repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "comic repository query failed: {message}",
        /// Another comic already uses this title.
        DuplicateTitle { title: String } => "a comic titled '{title}' already exists",
        /// No comic has the given identifier.
        NotFound { id: ComicId } => "comic {id} not found",
    }
}

/// Port for comic storage and filtered retrieval.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ComicRepository: Send + Sync {
    /// Fetch a single comic.
    async fn find_by_id(&self, id: &ComicId) -> Result<Option<Comic>, ComicRepositoryError>;

    /// Count comics matching `filter`, ignoring paging.
    async fn count(&self, filter: &ComicFilter) -> Result<u64, ComicRepositoryError>;

    /// Load at most `limit` matching comics starting at zero-based `offset`.
    async fn find_page(
        &self,
        filter: &ComicFilter,
        offset: u64,
        limit: u32,
    ) -> Result<Vec<Comic>, ComicRepositoryError>;

    /// Insert a new comic.
    ///
    /// Fails with [`ComicRepositoryError::DuplicateTitle`] when the title is
    /// taken.
    async fn insert(&self, comic: &Comic) -> Result<(), ComicRepositoryError>;

    /// Replace every attribute of an existing comic.
    ///
    /// Fails with [`ComicRepositoryError::NotFound`] when the id is unknown
    /// and [`ComicRepositoryError::DuplicateTitle`] on a title collision.
    async fn update(&self, comic: &Comic) -> Result<(), ComicRepositoryError>;

    /// Delete a comic, returning whether a record was removed.
    async fn delete(&self, id: &ComicId) -> Result<bool, ComicRepositoryError>;
}
