//! Comic catalogue backend library modules.
//!
//! Layout follows a hexagonal split: [`domain`] holds entities, services and
//! ports; [`inbound`] adapts HTTP requests onto the driving ports;
//! [`outbound`] implements the driven ports over PostgreSQL or process memory.
//! [`seeding`] provisions users from a JSON file at startup.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod seeding;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use middleware::Trace;
