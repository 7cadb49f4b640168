//! Shared helpers for Diesel repository implementations.
//!
//! This module provides common utilities for database access including:
//! - Error classification from pool and Diesel errors
//! - Revision casting between database and domain types
//! - `ILIKE` pattern escaping for literal substring filters

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use super::pool::PoolError;

/// Classified Diesel failure, ready to be mapped into a port error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum DieselFailure {
    /// The connection dropped mid-operation.
    Connection(String),
    /// A unique constraint rejected the write; carries the constraint name.
    UniqueViolation(Option<String>),
    /// Any other query failure.
    Query(String),
}

/// Extract a readable message from a pool error.
pub(crate) fn map_pool_error_message(error: PoolError) -> String {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => message,
    }
}

/// Classify a Diesel error and emit debug context.
pub(crate) fn classify_diesel_error(error: DieselError, operation: &str) -> DieselFailure {
    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), %operation, "diesel operation failed");
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            %operation,
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::NotFound => DieselFailure::Query("record not found".to_owned()),
        DieselError::QueryBuilderError(_) => {
            DieselFailure::Query("database query error".to_owned())
        }
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            DieselFailure::Connection("database connection error".to_owned())
        }
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
            DieselFailure::UniqueViolation(info.constraint_name().map(str::to_owned))
        }
        DieselError::DatabaseError(_, _) => DieselFailure::Query("database error".to_owned()),
        _ => DieselFailure::Query("database error".to_owned()),
    }
}

/// Cast domain revision (u32) to database revision (i32).
#[expect(
    clippy::cast_possible_wrap,
    reason = "revision values are always small positive integers"
)]
pub(crate) fn cast_revision_for_db(revision: u32) -> i32 {
    revision as i32
}

/// Cast database revision (i32) to domain revision (u32).
#[expect(
    clippy::cast_sign_loss,
    reason = "revision column carries CHECK (revision > 0)"
)]
pub(crate) fn cast_revision(revision: i32) -> u32 {
    revision as u32
}

/// Build an `ILIKE` pattern matching `needle` literally anywhere in a value.
///
/// `%`, `_` and the backslash escape character are escaped so user input
/// never acts as a wildcard.
pub(crate) fn contains_pattern(needle: &str) -> String {
    let mut pattern = String::with_capacity(needle.len() + 2);
    pattern.push('%');
    for ch in needle.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

/// Collect row conversion results, mapping the first error through `map_err`.
pub(crate) fn collect_rows<T, E>(
    results: impl Iterator<Item = Result<T, String>>,
    map_err: impl FnOnce(String) -> E,
) -> Result<Vec<T>, E> {
    results.collect::<Result<Vec<_>, _>>().map_err(map_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("dog", "%dog%")]
    #[case("100%", "%100\\%%")]
    #[case("a_b", "%a\\_b%")]
    #[case("back\\slash", "%back\\\\slash%")]
    fn contains_pattern_escapes_wildcards(#[case] needle: &str, #[case] expected: &str) {
        assert_eq!(contains_pattern(needle), expected);
    }

    #[rstest]
    fn not_found_classifies_as_query() {
        assert_eq!(
            classify_diesel_error(DieselError::NotFound, "find"),
            DieselFailure::Query("record not found".to_owned())
        );
    }

    #[rstest]
    fn pool_errors_keep_their_message() {
        assert_eq!(
            map_pool_error_message(PoolError::checkout("timed out")),
            "timed out"
        );
    }

    #[rstest]
    #[case(1)]
    #[case(42)]
    fn revisions_round_trip(#[case] revision: u32) {
        assert_eq!(cast_revision(cast_revision_for_db(revision)), revision);
    }
}
