//! Port abstraction for user persistence adapters and their errors.
//!
//! Users are created once by startup provisioning and never deleted. Requests
//! read them for identity resolution and rewrite their comic lists under an
//! optimistic revision check.

use async_trait::async_trait;

use crate::domain::{User, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
        /// The stored revision moved on since the caller read the user.
        RevisionMismatch { expected: u32, actual: u32 } =>
            "revision mismatch: expected {expected}, found {actual}",
        /// The user vanished between read and write.
        NotFound { id: UserId } => "user {id} not found",
        /// A user with this id or nickname is already stored.
        AlreadyExists { nickname: String } => "user {nickname} already exists",
    }
}

/// Port for reading users and persisting their comic lists.
///
/// # Revision Semantics
///
/// [`UserRepository::save_lists`] succeeds only when the stored revision
/// equals `expected_revision`. The caller sets `user.revision` to the new
/// value before saving; adapters never increment it themselves.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Store a new user.
    ///
    /// Fails with [`UserRepositoryError::AlreadyExists`] when the id or the
    /// nickname is taken.
    async fn insert(&self, user: &User) -> Result<(), UserRepositoryError>;

    /// Fetch a user by identifier.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserRepositoryError>;

    /// Persist `comics_to_buy`, `purchased_comics` and `revision` of `user`.
    async fn save_lists(
        &self,
        user: &User,
        expected_revision: u32,
    ) -> Result<(), UserRepositoryError>;
}
