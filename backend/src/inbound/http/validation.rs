//! Shared validation helpers for inbound HTTP adapters.
//!
//! Query strings and JSON bodies arrive as loosely typed values; these
//! helpers turn them into domain types or `invalid_request` errors whose
//! `details` name the offending field.

use chrono::{DateTime, NaiveDate};
use pagination::PageRequest;
use serde_json::json;

use crate::domain::error_mapping::comic_not_found;
use crate::domain::{ComicId, Error, Price};

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    MissingField,
    InvalidPage,
    InvalidDate,
    InvalidNumber,
    InvalidValue,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::MissingField => "missing_field",
            ErrorCode::InvalidPage => "invalid_page",
            ErrorCode::InvalidDate => "invalid_date",
            ErrorCode::InvalidNumber => "invalid_number",
            ErrorCode::InvalidValue => "invalid_value",
        }
    }
}

/// Newtype wrapper for HTTP field names to provide type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(self) -> &'static str {
        self.0
    }
}

/// Builder for validation errors with field context.
struct ValidationError {
    field: &'static str,
    message: String,
}

impl ValidationError {
    fn new(field: FieldName, message: impl Into<String>) -> Self {
        Self {
            field: field.as_str(),
            message: message.into(),
        }
    }

    fn with_code(self, code: ErrorCode) -> Error {
        Error::invalid_request(self.message).with_details(json!({
            "field": self.field,
            "code": code.as_str(),
        }))
    }

    fn with_value(self, code: ErrorCode, value: &str) -> Error {
        Error::invalid_request(self.message).with_details(json!({
            "field": self.field,
            "value": value,
            "code": code.as_str(),
        }))
    }
}

pub(crate) fn missing_field_error(field: FieldName) -> Error {
    let name = field.as_str();
    ValidationError::new(field, format!("missing required field: {name}"))
        .with_code(ErrorCode::MissingField)
}

/// Require an optional body field.
pub(crate) fn require<T>(value: Option<T>, field: FieldName) -> Result<T, Error> {
    value.ok_or_else(|| missing_field_error(field))
}

/// Parse the optional `page` query parameter; absent means page 1.
pub(crate) fn parse_page(raw: Option<&str>) -> Result<PageRequest, Error> {
    let field = FieldName::new("page");
    let Some(raw) = raw else {
        return Ok(PageRequest::FIRST);
    };
    let number = raw.trim().parse::<i64>().map_err(|_| {
        ValidationError::new(field, "page must be an integer").with_value(ErrorCode::InvalidPage, raw)
    })?;
    PageRequest::new(number).map_err(|err| {
        ValidationError::new(field, err.to_string()).with_value(ErrorCode::InvalidPage, raw)
    })
}

/// Parse a calendar date given as `YYYY-MM-DD` or an RFC 3339 timestamp.
///
/// Timestamps keep the calendar date of their own offset.
pub(crate) fn parse_date(raw: &str, field: FieldName) -> Result<NaiveDate, Error> {
    let trimmed = raw.trim();
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .or_else(|_| DateTime::parse_from_rfc3339(trimmed).map(|ts| ts.date_naive()))
        .map_err(|_| {
            let name = field.as_str();
            ValidationError::new(field, format!("{name} must be YYYY-MM-DD or RFC 3339"))
                .with_value(ErrorCode::InvalidDate, raw)
        })
}

/// Parse a finite decimal query value.
pub(crate) fn parse_decimal(raw: &str, field: FieldName) -> Result<f64, Error> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or_else(|| {
            let name = field.as_str();
            ValidationError::new(field, format!("{name} must be a decimal number"))
                .with_value(ErrorCode::InvalidNumber, raw)
        })
}

/// Validate a body price: finite and strictly positive.
pub(crate) fn parse_price(amount: f64, field: FieldName) -> Result<Price, Error> {
    Price::new(amount).map_err(|err| {
        ValidationError::new(field, err.to_string()).with_value(ErrorCode::InvalidValue, &amount.to_string())
    })
}

/// Split a comma-separated author list; blank entries are dropped and an
/// empty result means no author filter.
pub(crate) fn parse_authors(raw: &str) -> Option<Vec<String>> {
    let authors: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|author| !author.is_empty())
        .map(str::to_owned)
        .collect();
    (!authors.is_empty()).then_some(authors)
}

/// Treat blank query text as absent.
pub(crate) fn non_blank(raw: Option<String>) -> Option<String> {
    raw.filter(|value| !value.trim().is_empty())
}

/// Parse a comic id from a path segment.
///
/// A malformed id cannot name any comic, so it is reported as not found.
pub(crate) fn parse_comic_id(raw: &str) -> Result<ComicId, Error> {
    ComicId::new(raw).map_err(|_| comic_not_found(raw))
}
