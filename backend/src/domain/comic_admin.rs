//! Administrative catalogue commands: create, edit and delete comics.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use super::error_mapping::{comic_not_found, comic_store_error, comic_validation_error};
use super::ports::{ComicAdminCommand, ComicRepository};
use super::{Comic, ComicId, ComicPatch, Error, NewComic};

/// Domain service implementing [`ComicAdminCommand`].
#[derive(Clone)]
pub struct ComicAdminService<C: ?Sized> {
    comics: Arc<C>,
}

impl<C: ?Sized> ComicAdminService<C> {
    pub fn new(comics: Arc<C>) -> Self {
        Self { comics }
    }
}

#[async_trait]
impl<C> ComicAdminCommand for ComicAdminService<C>
where
    C: ComicRepository + ?Sized,
{
    async fn create(&self, comic: NewComic) -> Result<ComicId, Error> {
        let id = ComicId::random();
        let comic = comic.into_comic(id);
        self.comics.insert(&comic).await.map_err(comic_store_error)?;
        info!(comic_id = %id, title = %comic.title, "comic created");
        Ok(id)
    }

    async fn edit(&self, id: &ComicId, patch: ComicPatch) -> Result<Comic, Error> {
        patch
            .validate()
            .map_err(|err| comic_validation_error(&err))?;
        let mut comic = self
            .comics
            .find_by_id(id)
            .await
            .map_err(comic_store_error)?
            .ok_or_else(|| comic_not_found(&id.to_string()))?;
        patch.apply_to(&mut comic);
        self.comics.update(&comic).await.map_err(comic_store_error)?;
        info!(comic_id = %id, "comic updated");
        Ok(comic)
    }

    async fn delete(&self, id: &ComicId) -> Result<(), Error> {
        if !self.comics.delete(id).await.map_err(comic_store_error)? {
            return Err(comic_not_found(&id.to_string()));
        }
        info!(comic_id = %id, "comic deleted");
        Ok(())
    }
}
