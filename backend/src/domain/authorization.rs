//! Per-route authorization gate.
//!
//! Every route declares one [`AccessPolicy`]; handlers call [`authorize`]
//! with the identity resolved for the request before doing any work.

use tracing::debug;

use super::{Error, User};

/// Message returned to clients when a policy denies access.
pub const UNAUTHORIZED_MESSAGE: &str = "Unauthorized";

/// Authorization level a route requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessPolicy {
    /// Anyone, including anonymous callers.
    Public,
    /// Any resolved user.
    AuthenticatedUser,
    /// Resolved users flagged as administrators.
    AdminOnly,
}

/// Check `identity` against `policy`.
///
/// Denials surface as [`ErrorCode::Forbidden`](super::ErrorCode::Forbidden)
/// with the message `Unauthorized`.
///
/// # Examples
/// ```
/// use backend::domain::{AccessPolicy, ErrorCode, authorize};
///
/// assert!(authorize(AccessPolicy::Public, None).is_ok());
/// let denied = authorize(AccessPolicy::AuthenticatedUser, None).expect_err("anonymous");
/// assert_eq!(denied.code(), ErrorCode::Forbidden);
/// ```
pub fn authorize(policy: AccessPolicy, identity: Option<&User>) -> Result<(), Error> {
    let allowed = match policy {
        AccessPolicy::Public => true,
        AccessPolicy::AuthenticatedUser => identity.is_some(),
        AccessPolicy::AdminOnly => identity.is_some_and(|user| user.is_admin),
    };
    if allowed {
        return Ok(());
    }
    debug!(
        ?policy,
        user_id = ?identity.map(|user| user.id),
        "access denied"
    );
    Err(Error::forbidden(UNAUTHORIZED_MESSAGE))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ErrorCode, Nickname, UserId};
    use rstest::{fixture, rstest};
    use rstest_bdd_macros::{given, then, when};

    #[fixture]
    fn reader() -> User {
        User::new(
            UserId::random(),
            Nickname::new("reader").expect("valid nickname"),
            "hash",
        )
    }

    #[given("an anonymous caller")]
    fn an_anonymous_caller() -> Option<User> {
        None
    }

    #[given("an authenticated non-admin caller")]
    fn an_authenticated_non_admin_caller() -> Option<User> {
        Some(reader())
    }

    #[given("an administrator")]
    fn an_administrator() -> Option<User> {
        Some(reader().with_admin(true))
    }

    #[when("the gate checks the policy")]
    fn the_gate_checks_the_policy(policy: AccessPolicy, caller: Option<User>) -> Result<(), Error> {
        authorize(policy, caller.as_ref())
    }

    #[then("access is granted")]
    fn access_is_granted(result: Result<(), Error>) {
        assert!(result.is_ok(), "expected access to be granted");
    }

    #[then("access is denied as unauthorized")]
    fn access_is_denied_as_unauthorized(result: Result<(), Error>) {
        let error = result.expect_err("expected denial");
        assert_eq!(error.code(), ErrorCode::Forbidden);
        assert_eq!(error.message(), UNAUTHORIZED_MESSAGE);
    }

    #[rstest]
    #[case(AccessPolicy::Public)]
    #[case(AccessPolicy::AuthenticatedUser)]
    #[case(AccessPolicy::AdminOnly)]
    fn administrators_pass_every_policy(#[case] policy: AccessPolicy) {
        access_is_granted(the_gate_checks_the_policy(policy, an_administrator()));
    }

    #[rstest]
    fn anonymous_caller_passes_public_routes() {
        access_is_granted(the_gate_checks_the_policy(
            AccessPolicy::Public,
            an_anonymous_caller(),
        ));
    }

    #[rstest]
    #[case(AccessPolicy::AuthenticatedUser)]
    #[case(AccessPolicy::AdminOnly)]
    fn anonymous_caller_is_denied_protected_routes(#[case] policy: AccessPolicy) {
        access_is_denied_as_unauthorized(the_gate_checks_the_policy(
            policy,
            an_anonymous_caller(),
        ));
    }

    #[rstest]
    fn non_admin_passes_authenticated_routes() {
        access_is_granted(the_gate_checks_the_policy(
            AccessPolicy::AuthenticatedUser,
            an_authenticated_non_admin_caller(),
        ));
    }

    #[rstest]
    fn non_admin_is_denied_admin_routes() {
        access_is_denied_as_unauthorized(the_gate_checks_the_policy(
            AccessPolicy::AdminOnly,
            an_authenticated_non_admin_caller(),
        ));
    }
}
