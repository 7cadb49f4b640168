//! Request middleware.
//!
//! Purpose: request lifecycle concerns that sit in front of every handler,
//! currently trace id assignment and request spans.

pub mod trace;

pub use trace::Trace;
