//! Translate driven-port failures into domain [`Error`] values.
//!
//! Store faults are reported as internal errors; their messages stay in the
//! server log because the HTTP adapter redacts internal payloads. Uniqueness
//! violations keep their own `duplicate_key` code.

use serde_json::json;

use super::ports::{ComicRepositoryError, SaltRepositoryError, UserRepositoryError};
use super::{ComicValidationError, Error};

pub(crate) fn comic_store_error(error: ComicRepositoryError) -> Error {
    match error {
        ComicRepositoryError::DuplicateTitle { title } => {
            Error::duplicate_key(format!("a comic titled '{title}' already exists")).with_details(
                json!({
                    "field": "title",
                    "code": "duplicate_title",
                }),
            )
        }
        ComicRepositoryError::NotFound { id } => comic_not_found(&id.to_string()),
        ComicRepositoryError::Connection { message } => {
            Error::internal(format!("comic repository unavailable: {message}"))
        }
        ComicRepositoryError::Query { message } => {
            Error::internal(format!("comic repository error: {message}"))
        }
    }
}

pub(crate) fn user_store_error(error: UserRepositoryError) -> Error {
    match error {
        UserRepositoryError::Connection { message } => {
            Error::internal(format!("user repository unavailable: {message}"))
        }
        UserRepositoryError::Query { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
        UserRepositoryError::RevisionMismatch { expected, actual } => {
            Error::conflict("user was modified concurrently").with_details(json!({
                "expectedRevision": expected,
                "actualRevision": actual,
                "code": "revision_mismatch",
            }))
        }
        UserRepositoryError::NotFound { id } => {
            Error::internal(format!("user {id} disappeared during the request"))
        }
        UserRepositoryError::AlreadyExists { nickname } => {
            Error::duplicate_key(format!("user {nickname} already exists"))
        }
    }
}

pub(crate) fn salt_store_error(error: SaltRepositoryError) -> Error {
    match error {
        SaltRepositoryError::AlreadyIssued { user_id } => {
            Error::duplicate_key(format!("salt already issued for user {user_id}"))
        }
        SaltRepositoryError::Connection { message } => {
            Error::internal(format!("salt repository unavailable: {message}"))
        }
        SaltRepositoryError::Query { message } => {
            Error::internal(format!("salt repository error: {message}"))
        }
    }
}

pub(crate) fn comic_not_found(id: &str) -> Error {
    Error::not_found("Comic not found").with_details(json!({ "comicId": id }))
}

pub(crate) fn comic_validation_error(error: &ComicValidationError) -> Error {
    Error::invalid_request(error.to_string()).with_details(json!({
        "field": error.field(),
        "code": "invalid_value",
    }))
}
