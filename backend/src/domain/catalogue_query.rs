//! Catalogue query service: filtered, paginated comic listings.

use std::num::NonZeroU32;
use std::sync::Arc;

use async_trait::async_trait;
use pagination::{PageRequest, PageWindow, Paginated};
use tracing::debug;

use super::error_mapping::{comic_not_found, comic_store_error};
use super::ports::{ComicCatalogueQuery, ComicRepository};
use super::{Comic, ComicFilter, ComicId, Error};

/// Number of comics served per catalogue page.
pub const COMICS_PER_PAGE: NonZeroU32 = match NonZeroU32::new(50) {
    Some(size) => size,
    None => NonZeroU32::MIN,
};

/// Catalogue read service implementing [`ComicCatalogueQuery`].
///
/// The total is counted with every filter applied, the requested page is
/// clamped against it, and only then is the slice loaded. An empty result
/// skips the second store call.
#[derive(Clone)]
pub struct CatalogueQueryService<C: ?Sized> {
    comics: Arc<C>,
}

impl<C: ?Sized> CatalogueQueryService<C> {
    /// Create a service reading from `comics`.
    pub fn new(comics: Arc<C>) -> Self {
        Self { comics }
    }
}

#[async_trait]
impl<C> ComicCatalogueQuery for CatalogueQueryService<C>
where
    C: ComicRepository + ?Sized,
{
    async fn list_comics(
        &self,
        filter: ComicFilter,
        page: PageRequest,
    ) -> Result<Paginated<Comic>, Error> {
        let total = self.comics.count(&filter).await.map_err(comic_store_error)?;
        let window = PageWindow::resolve(page, COMICS_PER_PAGE, total);
        debug!(
            requested = page.get(),
            served = window.page(),
            total,
            "catalogue page resolved"
        );
        if window.is_empty() {
            return Ok(Paginated::new(Vec::new(), window));
        }

        let items = self
            .comics
            .find_page(&filter, window.offset(), window.limit())
            .await
            .map_err(comic_store_error)?;
        Ok(Paginated::new(items, window))
    }

    async fn fetch_comic(&self, id: &ComicId) -> Result<Comic, Error> {
        self.comics
            .find_by_id(id)
            .await
            .map_err(comic_store_error)?
            .ok_or_else(|| comic_not_found(&id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{ComicRepositoryError, MockComicRepository};
    use crate::domain::{ErrorCode, NewComic, Price};
    use chrono::NaiveDate;
    use mockall::predicate::eq;
    use rstest::rstest;

    fn comic(n: u32) -> Comic {
        NewComic::new(
            format!("Issue {n}"),
            "Bonelli",
            Vec::new(),
            Price::new(3.5).expect("valid price"),
            NaiveDate::from_ymd_opt(2020, 1, 1).expect("valid date"),
        )
        .expect("valid comic")
        .into_comic(ComicId::random())
    }

    fn page(n: i64) -> PageRequest {
        PageRequest::new(n).expect("valid page")
    }

    #[rstest]
    #[case(1, 1, 0, 50)]
    #[case(3, 3, 100, 20)]
    #[case(5, 3, 100, 20)]
    #[tokio::test]
    async fn list_clamps_page_and_slices_store(
        #[case] requested: i64,
        #[case] served: u32,
        #[case] offset: u64,
        #[case] returned: u32,
    ) {
        let mut repo = MockComicRepository::new();
        repo.expect_count().times(1).return_once(|_| Ok(120));
        repo.expect_find_page()
            .withf(move |_, o, l| *o == offset && *l == 50)
            .times(1)
            .return_once(move |_, _, _| Ok((0..returned).map(comic).collect()));
        let service = CatalogueQueryService::new(Arc::new(repo));

        let result = service
            .list_comics(ComicFilter::default(), page(requested))
            .await
            .expect("listing succeeds");

        assert_eq!(result.window().page(), served);
        assert_eq!(result.window().total_pages(), 3);
        assert_eq!(result.window().total_items(), 120);
        assert_eq!(result.items().len(), returned as usize);
    }

    #[tokio::test]
    async fn empty_result_skips_page_load() {
        let mut repo = MockComicRepository::new();
        repo.expect_count().times(1).return_once(|_| Ok(0));
        repo.expect_find_page().never();
        let service = CatalogueQueryService::new(Arc::new(repo));

        let result = service
            .list_comics(ComicFilter::default(), page(7))
            .await
            .expect("listing succeeds");

        assert!(result.items().is_empty());
        assert_eq!(result.window().page(), 0);
        assert_eq!(result.window().total_pages(), 0);
    }

    #[tokio::test]
    async fn count_failure_is_internal() {
        let mut repo = MockComicRepository::new();
        repo.expect_count()
            .times(1)
            .return_once(|_| Err(ComicRepositoryError::connection("refused")));
        let service = CatalogueQueryService::new(Arc::new(repo));

        let error = service
            .list_comics(ComicFilter::default(), PageRequest::FIRST)
            .await
            .expect_err("store failure");
        assert_eq!(error.code(), ErrorCode::InternalError);
    }

    #[tokio::test]
    async fn fetch_missing_comic_is_not_found() {
        let id = ComicId::random();
        let mut repo = MockComicRepository::new();
        repo.expect_find_by_id()
            .with(eq(id))
            .times(1)
            .return_once(|_| Ok(None));
        let service = CatalogueQueryService::new(Arc::new(repo));

        let error = service.fetch_comic(&id).await.expect_err("missing comic");
        assert_eq!(error.code(), ErrorCode::NotFound);
    }
}
