//! Driving port for public catalogue reads.

use async_trait::async_trait;
use pagination::{PageRequest, Paginated};

use crate::domain::{Comic, ComicFilter, ComicId, Error};

/// Domain use-case port for browsing the catalogue.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ComicCatalogueQuery: Send + Sync {
    /// List one page of comics matching `filter`.
    async fn list_comics(
        &self,
        filter: ComicFilter,
        page: PageRequest,
    ) -> Result<Paginated<Comic>, Error>;

    /// Fetch a single comic or fail with `not_found`.
    async fn fetch_comic(&self, id: &ComicId) -> Result<Comic, Error>;
}
