//! Identity resolution from bearer tokens.
//!
//! The resolver decodes the token payload, looks its subject up in the user
//! store and hands the stored record to the request. There is no signature
//! check: the token is an unverified hint naming the caller.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::warn;

use super::error_mapping::user_store_error;
use super::ports::{CurrentUserResolver, UserRepository};
use super::{Error, TokenClaims, User, UserId};

/// Domain service implementing [`CurrentUserResolver`] over a user store.
#[derive(Clone)]
pub struct IdentityResolver<U: ?Sized> {
    users: Arc<U>,
}

impl<U: ?Sized> IdentityResolver<U> {
    /// Create a resolver backed by `users`.
    pub fn new(users: Arc<U>) -> Self {
        Self { users }
    }
}

#[async_trait]
impl<U> CurrentUserResolver for IdentityResolver<U>
where
    U: UserRepository + ?Sized,
{
    async fn resolve(&self, authorization: Option<&str>) -> Result<Option<User>, Error> {
        let Some(header) = authorization else {
            return Ok(None);
        };

        let claims = TokenClaims::from_authorization_header(header).map_err(|err| {
            warn!(error = %err, "rejected authorization header");
            Error::internal(format!("failed to decode bearer token: {err}"))
        })?;

        let user_id = UserId::new(&claims.sub).map_err(|err| {
            warn!(error = %err, sub = %claims.sub, "token subject is not a user id");
            Error::internal(format!("token subject is not a user id: {err}"))
        })?;

        match self
            .users
            .find_by_id(&user_id)
            .await
            .map_err(user_store_error)?
        {
            Some(user) => Ok(Some(user)),
            None => {
                warn!(%user_id, "token subject does not match a stored user");
                Err(Error::internal(format!("token subject {user_id} not found")))
            }
        }
    }
}
