//! PostgreSQL-backed `SaltRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{SaltRepository, SaltRepositoryError};
use crate::domain::{Salt, UserId};

use super::diesel_helpers::{DieselFailure, classify_diesel_error, map_pool_error_message};
use super::models::SaltRow;
use super::pool::{DbPool, PoolError};
use super::schema::salts;

/// Diesel-backed implementation of the `SaltRepository` port.
#[derive(Clone)]
pub struct DieselSaltRepository {
    pool: DbPool,
}

impl DieselSaltRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> SaltRepositoryError {
    SaltRepositoryError::connection(map_pool_error_message(error))
}

fn map_diesel_error(
    error: diesel::result::Error,
    operation: &str,
    user_id: &UserId,
) -> SaltRepositoryError {
    match classify_diesel_error(error, operation) {
        DieselFailure::Connection(message) => SaltRepositoryError::connection(message),
        DieselFailure::UniqueViolation(_) => SaltRepositoryError::already_issued(*user_id),
        DieselFailure::Query(message) => SaltRepositoryError::query(message),
    }
}

#[async_trait]
impl SaltRepository for DieselSaltRepository {
    async fn insert(&self, salt: &Salt) -> Result<(), SaltRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(salts::table)
            .values(SaltRow::from(salt))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|err| map_diesel_error(err, "insert salt", &salt.user_id))
    }

    async fn find_by_user(&self, user_id: &UserId) -> Result<Option<Salt>, SaltRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        salts::table
            .find(user_id.as_uuid())
            .select(SaltRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map(|row| row.map(Salt::from))
            .map_err(|err| map_diesel_error(err, "find salt", user_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn salt_rows_mirror_domain_values() {
        let salt = Salt::generate(UserId::random());
        let row = SaltRow::from(&salt);
        assert_eq!(Salt::from(row), salt);
    }

    #[rstest]
    fn pool_error_maps_to_connection_error() {
        let err = map_pool_error(PoolError::build("invalid URL"));
        assert!(matches!(err, SaltRepositoryError::Connection { .. }));
    }
}
