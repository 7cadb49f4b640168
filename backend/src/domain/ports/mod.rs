//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (`*Repository`) are implemented by outbound adapters. Driving
//! ports (`CurrentUserResolver`, `ComicCatalogueQuery`, `WishlistCommand`,
//! `ComicAdminCommand`) are implemented by domain services and consumed by
//! inbound adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod comic_admin_command;
mod comic_catalogue_query;
mod comic_repository;
mod current_user_resolver;
mod salt_repository;
mod user_repository;
mod wishlist_command;

#[cfg(test)]
pub use comic_admin_command::MockComicAdminCommand;
pub use comic_admin_command::ComicAdminCommand;
#[cfg(test)]
pub use comic_catalogue_query::MockComicCatalogueQuery;
pub use comic_catalogue_query::ComicCatalogueQuery;
#[cfg(test)]
pub use comic_repository::MockComicRepository;
pub use comic_repository::{ComicRepository, ComicRepositoryError};
pub use current_user_resolver::CurrentUserResolver;
#[cfg(test)]
pub use salt_repository::MockSaltRepository;
pub use salt_repository::{SaltRepository, SaltRepositoryError};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserRepository, UserRepositoryError};
#[cfg(test)]
pub use wishlist_command::MockWishlistCommand;
pub use wishlist_command::WishlistCommand;
