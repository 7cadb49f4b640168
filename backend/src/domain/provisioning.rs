//! Startup provisioning of marketplace users.
//!
//! Users arrive from an operator-supplied seed file rather than over HTTP.
//! Provisioning stores the user and issues its salt pair; a user that is
//! already stored is left untouched, so restarting with the same file is
//! harmless.

use std::sync::Arc;

use tracing::{debug, info};

use super::error_mapping::user_store_error;
use super::ports::{SaltRepository, UserRepository, UserRepositoryError};
use super::{Error, Salt, SaltIssuer, User};

/// Result of provisioning a single user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Provisioned {
    /// The user was stored and received a fresh salt pair.
    Created(Salt),
    /// A user with the same id or nickname was already stored.
    AlreadyPresent,
}

/// Stores seeded users and their salts.
#[derive(Clone)]
pub struct UserProvisioner<U: ?Sized, S: ?Sized> {
    users: Arc<U>,
    salts: SaltIssuer<S>,
}

impl<U, S> UserProvisioner<U, S>
where
    U: UserRepository + ?Sized,
    S: SaltRepository + ?Sized,
{
    pub fn new(users: Arc<U>, salts: Arc<S>) -> Self {
        Self {
            users,
            salts: SaltIssuer::new(salts),
        }
    }

    /// Store `user` and issue its salt pair.
    ///
    /// # Errors
    /// Store faults surface as internal errors. A user that already exists is
    /// reported as [`Provisioned::AlreadyPresent`], not as an error.
    pub async fn provision(&self, user: &User) -> Result<Provisioned, Error> {
        match self.users.insert(user).await {
            Ok(()) => {}
            Err(UserRepositoryError::AlreadyExists { nickname }) => {
                debug!(%nickname, "user already provisioned");
                return Ok(Provisioned::AlreadyPresent);
            }
            Err(other) => return Err(user_store_error(other)),
        }
        let salt = self.salts.issue(&user.id).await?;
        info!(user_id = %user.id, nickname = %user.nickname, is_admin = user.is_admin, "provisioned user");
        Ok(Provisioned::Created(salt))
    }
}
