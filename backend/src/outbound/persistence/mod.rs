//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! This module provides concrete implementations of the catalogue's driven
//! ports backed by PostgreSQL via Diesel with async support through
//! `diesel-async` and `bb8` connection pooling.
//!
//! # Architecture
//!
//! - **Thin adapters**: repository implementations only translate between
//!   Diesel models and domain types. No business logic resides here.
//! - **Internal models**: Diesel row structs (`models.rs`) and schema
//!   definitions (`schema.rs`) are never exposed to the domain layer.
//! - **Strongly typed errors**: all database errors are mapped to the port
//!   error enums.
//!
//! # Example
//!
//! ```no_run
//! use backend::outbound::persistence::{DbPool, DieselComicRepository, PoolConfig};
//!
//! # async fn wire() -> Result<(), Box<dyn std::error::Error>> {
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/comics")).await?;
//! let comics = DieselComicRepository::new(pool);
//! # let _ = comics;
//! # Ok(())
//! # }
//! ```

mod diesel_comic_repository;
pub(crate) mod diesel_helpers;
mod diesel_salt_repository;
mod diesel_user_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_comic_repository::DieselComicRepository;
pub use diesel_salt_repository::DieselSaltRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use migrations::{MIGRATIONS, MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
