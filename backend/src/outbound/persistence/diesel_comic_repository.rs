//! PostgreSQL-backed `ComicRepository` implementation using Diesel ORM.
//!
//! Catalogue filters are pushed into SQL: text filters become escaped
//! `ILIKE` patterns, the author set uses array overlap (`&&`), and date and
//! price bounds become inclusive range comparisons. Listings are ordered by
//! creation time, then id, so pages are stable across requests.

use async_trait::async_trait;
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{ComicRepository, ComicRepositoryError};
use crate::domain::{Comic, ComicFilter, ComicId};

use super::diesel_helpers::{
    DieselFailure, classify_diesel_error, collect_rows, contains_pattern, map_pool_error_message,
};
use super::models::{ComicRow, ComicUpdate, NewComicRow};
use super::pool::{DbPool, PoolError};
use super::schema::comics;

const TITLE_CONSTRAINT: &str = "comics_title_key";

/// Diesel-backed implementation of the `ComicRepository` port.
#[derive(Clone)]
pub struct DieselComicRepository {
    pool: DbPool,
}

impl DieselComicRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> ComicRepositoryError {
    ComicRepositoryError::connection(map_pool_error_message(error))
}

/// Map Diesel errors, attributing title uniqueness violations to `title`.
fn map_diesel_error(
    error: diesel::result::Error,
    operation: &str,
    title: Option<&str>,
) -> ComicRepositoryError {
    match classify_diesel_error(error, operation) {
        DieselFailure::Connection(message) => ComicRepositoryError::connection(message),
        DieselFailure::UniqueViolation(constraint)
            if constraint.as_deref().is_none_or(|name| name == TITLE_CONSTRAINT) =>
        {
            ComicRepositoryError::duplicate_title(title.unwrap_or_default())
        }
        DieselFailure::UniqueViolation(_) => ComicRepositoryError::query("unique violation"),
        DieselFailure::Query(message) => ComicRepositoryError::query(message),
    }
}

fn map_row_error(message: String) -> ComicRepositoryError {
    ComicRepositoryError::query(message)
}

/// Build the filtered base query shared by `count` and `find_page`.
fn filtered(filter: &ComicFilter) -> comics::BoxedQuery<'static, Pg> {
    let mut query = comics::table.into_boxed();
    if let Some(title) = &filter.title {
        query = query.filter(comics::title.ilike(contains_pattern(title)));
    }
    if let Some(publisher) = &filter.publisher {
        query = query.filter(comics::publisher.ilike(contains_pattern(publisher)));
    }
    if let Some(authors) = &filter.authors {
        query = query.filter(comics::authors.overlaps_with(authors.clone()));
    }
    if let Some(from) = filter.from_date {
        query = query.filter(comics::publish_date.ge(from));
    }
    if let Some(to) = filter.to_date {
        query = query.filter(comics::publish_date.le(to));
    }
    if let Some(max) = filter.price_less_than {
        query = query.filter(comics::price.le(max));
    }
    if let Some(min) = filter.price_greater_than {
        query = query.filter(comics::price.ge(min));
    }
    query
}

#[async_trait]
impl ComicRepository for DieselComicRepository {
    async fn find_by_id(&self, id: &ComicId) -> Result<Option<Comic>, ComicRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = comics::table
            .find(id.as_uuid())
            .select(ComicRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(|err| map_diesel_error(err, "find comic", None))?;
        row.map(Comic::try_from).transpose().map_err(map_row_error)
    }

    async fn count(&self, filter: &ComicFilter) -> Result<u64, ComicRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let total: i64 = filtered(filter)
            .count()
            .get_result(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, "count comics", None))?;
        u64::try_from(total).map_err(|_| ComicRepositoryError::query("negative comic count"))
    }

    async fn find_page(
        &self,
        filter: &ComicFilter,
        offset: u64,
        limit: u32,
    ) -> Result<Vec<Comic>, ComicRepositoryError> {
        let offset = i64::try_from(offset)
            .map_err(|_| ComicRepositoryError::query("page offset exceeds i64 range"))?;
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows = filtered(filter)
            .select(ComicRow::as_select())
            .order((comics::created_at.asc(), comics::id.asc()))
            .offset(offset)
            .limit(i64::from(limit))
            .load::<ComicRow>(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, "list comics", None))?;
        collect_rows(rows.into_iter().map(Comic::try_from), map_row_error)
    }

    async fn insert(&self, comic: &Comic) -> Result<(), ComicRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(comics::table)
            .values(NewComicRow::from(comic))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|err| map_diesel_error(err, "insert comic", Some(&comic.title)))
    }

    async fn update(&self, comic: &Comic) -> Result<(), ComicRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let updated = diesel::update(comics::table.find(comic.id.as_uuid()))
            .set(ComicUpdate::from(comic))
            .execute(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, "update comic", Some(&comic.title)))?;
        if updated == 0 {
            return Err(ComicRepositoryError::not_found(comic.id));
        }
        Ok(())
    }

    async fn delete(&self, id: &ComicId) -> Result<bool, ComicRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let deleted = diesel::delete(comics::table.find(id.as_uuid()))
            .execute(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, "delete comic", None))?;
        Ok(deleted > 0)
    }
}
