//! Driving port turning request credentials into an optional identity.

use async_trait::async_trait;

use crate::domain::{Error, User};

/// Resolve the raw `Authorization` header into the user it names.
///
/// `Ok(None)` means the request is anonymous. A header that is present but
/// cannot be resolved is an error, never a silent downgrade to anonymous.
#[async_trait]
pub trait CurrentUserResolver: Send + Sync {
    /// Resolve the caller identity from the header value, if any.
    async fn resolve(&self, authorization: Option<&str>) -> Result<Option<User>, Error>;
}
