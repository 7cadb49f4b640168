//! Port for storing the per-user salt pair.

use async_trait::async_trait;

use crate::domain::{Salt, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by salt repository adapters.
    pub enum SaltRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "salt repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "salt repository query failed: {message}",
        /// A salt pair is already bound to this user.
        AlreadyIssued { user_id: UserId } => "salt already issued for user {user_id}",
    }
}

/// Salts are written once and never mutated.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SaltRepository: Send + Sync {
    /// Store a freshly generated pair.
    async fn insert(&self, salt: &Salt) -> Result<(), SaltRepositoryError>;

    /// Fetch the pair bound to `user_id`.
    async fn find_by_user(&self, user_id: &UserId) -> Result<Option<Salt>, SaltRepositoryError>;
}
