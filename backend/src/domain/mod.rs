//! Domain primitives, aggregates and services of the comic catalogue.
//!
//! Purpose: define strongly typed entities used by the HTTP and persistence
//! adapters, and the services that implement the driving ports. Types
//! document their invariants in Rustdoc; adapters never reach past them.
//!
//! Public surface:
//! - Error / ErrorCode: transport-agnostic failure payload.
//! - User / Comic / Salt: the three persisted aggregates.
//! - ComicFilter / ComicPatch / NewComic: catalogue query and command input.
//! - IdentityResolver, CatalogueQueryService, WishlistLedger,
//!   ComicAdminService: implementations of the driving ports.
//! - UserProvisioner: stores seeded users and issues their salts.
//! - authorize / AccessPolicy: the per-route permission gate.

pub mod authorization;
pub mod catalogue_query;
pub mod comic;
pub mod comic_admin;
pub mod error;
pub(crate) mod error_mapping;
pub mod identity;
pub mod ports;
pub mod provisioning;
pub mod salt;
pub mod token;
pub mod trace_id;
pub mod user;
pub mod wishlist;

pub use self::authorization::{AccessPolicy, UNAUTHORIZED_MESSAGE, authorize};
pub use self::catalogue_query::{COMICS_PER_PAGE, CatalogueQueryService};
pub use self::comic::{
    Comic, ComicFilter, ComicId, ComicPatch, ComicValidationError, NewComic, Price,
};
pub use self::comic_admin::ComicAdminService;
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::identity::IdentityResolver;
pub use self::provisioning::{Provisioned, UserProvisioner};
pub use self::salt::{Salt, SaltIssuer};
pub use self::token::{TokenClaims, TokenDecodeError};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{Nickname, User, UserId, UserValidationError};
pub use self::wishlist::WishlistLedger;

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use backend::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("Unauthorized"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
