//! PostgreSQL-backed `UserRepository` implementation using Diesel ORM.
//!
//! List writes are guarded by the `revision` column: the `UPDATE` only
//! matches when the stored revision equals the one the caller read. A
//! zero-row update is disambiguated into a revision mismatch or a missing
//! user with a follow-up read.

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{UserRepository, UserRepositoryError};
use crate::domain::{User, UserId};

use super::diesel_helpers::{
    DieselFailure, cast_revision, cast_revision_for_db, classify_diesel_error,
    map_pool_error_message,
};
use super::models::{NewUserRow, UserListsUpdate, UserRow};
use super::pool::{DbPool, PoolError};
use super::schema::users;

/// Diesel-backed implementation of the `UserRepository` port.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> UserRepositoryError {
    UserRepositoryError::connection(map_pool_error_message(error))
}

fn map_diesel_error(error: diesel::result::Error, operation: &str) -> UserRepositoryError {
    match classify_diesel_error(error, operation) {
        DieselFailure::Connection(message) => UserRepositoryError::connection(message),
        DieselFailure::UniqueViolation(_) => UserRepositoryError::query("unique violation"),
        DieselFailure::Query(message) => UserRepositoryError::query(message),
    }
}

fn map_insert_error(error: diesel::result::Error, user: &User) -> UserRepositoryError {
    match classify_diesel_error(error, "insert user") {
        DieselFailure::UniqueViolation(_) => {
            UserRepositoryError::already_exists(user.nickname.to_string())
        }
        DieselFailure::Connection(message) => UserRepositoryError::connection(message),
        DieselFailure::Query(message) => UserRepositoryError::query(message),
    }
}

fn lists_update(user: &User) -> UserListsUpdate {
    UserListsUpdate {
        comics_to_buy: user.comics_to_buy.iter().map(|id| *id.as_uuid()).collect(),
        purchased_comics: user
            .purchased_comics
            .iter()
            .map(|id| *id.as_uuid())
            .collect(),
        revision: cast_revision_for_db(user.revision),
        updated_at: Utc::now(),
    }
}

/// Explain a zero-row update: the user either moved on or vanished.
async fn disambiguate_update_failure<C>(
    conn: &mut C,
    id: &UserId,
    expected_revision: u32,
) -> UserRepositoryError
where
    C: diesel_async::AsyncConnection<Backend = diesel::pg::Pg> + Send,
{
    let current = users::table
        .find(id.as_uuid())
        .select(users::revision)
        .first::<i32>(conn)
        .await
        .optional();

    match current {
        Ok(Some(actual)) => {
            UserRepositoryError::revision_mismatch(expected_revision, cast_revision(actual))
        }
        Ok(None) => UserRepositoryError::not_found(*id),
        Err(err) => map_diesel_error(err, "reload user revision"),
    }
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn insert(&self, user: &User) -> Result<(), UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(users::table)
            .values(NewUserRow::from(user))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|err| map_insert_error(err, user))
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = users::table
            .find(id.as_uuid())
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(|err| map_diesel_error(err, "find user"))?;
        row.map(User::try_from)
            .transpose()
            .map_err(UserRepositoryError::query)
    }

    async fn save_lists(
        &self,
        user: &User,
        expected_revision: u32,
    ) -> Result<(), UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let updated = diesel::update(users::table)
            .filter(
                users::id
                    .eq(user.id.as_uuid())
                    .and(users::revision.eq(cast_revision_for_db(expected_revision))),
            )
            .set(lists_update(user))
            .execute(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, "save user lists"))?;

        if updated == 0 {
            return Err(disambiguate_update_failure(&mut conn, &user.id, expected_revision).await);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ComicId, Nickname};
    use rstest::rstest;

    #[rstest]
    fn pool_error_maps_to_connection_error() {
        let repo_err = map_pool_error(PoolError::checkout("connection refused"));
        assert!(matches!(repo_err, UserRepositoryError::Connection { .. }));
    }

    #[rstest]
    fn lists_update_carries_new_revision_and_order() {
        let mut user = User::new(
            UserId::random(),
            Nickname::new("reader").expect("valid nickname"),
            "hash",
        );
        let first = ComicId::random();
        let second = ComicId::random();
        user.add_to_wishlist(first);
        user.add_to_wishlist(second);
        user.revision = 5;

        let update = lists_update(&user);
        assert_eq!(update.revision, 5);
        assert_eq!(
            update.comics_to_buy,
            vec![*first.as_uuid(), *second.as_uuid()]
        );
        assert!(update.purchased_comics.is_empty());
    }
}
