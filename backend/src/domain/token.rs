//! Bearer token payload decoding.
//!
//! Tokens are treated as unverified identity hints: the payload segment of a
//! JWT-shaped token is decoded and its `sub` claim names the caller. No
//! signature is checked, so the claims must not be trusted for anything beyond
//! selecting which stored user record the request acts as.

use base64::Engine as _;
use base64::alphabet;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use serde::Deserialize;

const BEARER_PREFIX: &str = "Bearer ";

/// Standard alphabet, accepting payloads with or without `=` padding.
const STANDARD_ANY_PAD: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Reasons a raw `Authorization` header value could not be decoded.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenDecodeError {
    /// Header does not start with `Bearer `.
    #[error("authorization header must use the Bearer scheme")]
    MissingBearerScheme,
    /// Token has no non-empty second `.`-separated segment.
    #[error("bearer token has no payload segment")]
    MissingPayload,
    /// Payload segment is not base64 in either alphabet.
    #[error("token payload is not valid base64")]
    InvalidEncoding,
    /// Payload decoded but is not JSON with `sub` and `iat`.
    #[error("token payload is not a valid claims object: {message}")]
    InvalidClaims {
        /// Deserializer error text.
        message: String,
    },
}

/// Claims carried in a token payload.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TokenClaims {
    /// Subject: the textual id of the user the token names.
    pub sub: String,
    /// Issued-at time in seconds since the Unix epoch.
    pub iat: i64,
}

impl TokenClaims {
    /// Decode the claims from a full `Authorization` header value.
    ///
    /// The value must be `Bearer <token>`. The token is split on `.` and the
    /// second segment is base64-decoded (URL-safe or standard alphabet, padding
    /// optional for either) into a JSON object with at least `sub` and `iat`.
    ///
    /// # Examples
    /// ```
    /// use backend::domain::TokenClaims;
    ///
    /// // {"sub":"42","iat":1}
    /// let header = "Bearer e30.eyJzdWIiOiI0MiIsImlhdCI6MX0.sig";
    /// let claims = TokenClaims::from_authorization_header(header).expect("decodes");
    /// assert_eq!(claims.sub, "42");
    /// assert_eq!(claims.iat, 1);
    /// ```
    pub fn from_authorization_header(value: &str) -> Result<Self, TokenDecodeError> {
        let token = value
            .strip_prefix(BEARER_PREFIX)
            .ok_or(TokenDecodeError::MissingBearerScheme)?;
        let payload = token
            .split('.')
            .nth(1)
            .filter(|segment| !segment.is_empty())
            .ok_or(TokenDecodeError::MissingPayload)?;
        let bytes = decode_segment(payload)?;
        serde_json::from_slice(&bytes).map_err(|err| TokenDecodeError::InvalidClaims {
            message: err.to_string(),
        })
    }
}

fn decode_segment(segment: &str) -> Result<Vec<u8>, TokenDecodeError> {
    let unpadded = segment.trim_end_matches('=');
    URL_SAFE_NO_PAD
        .decode(unpadded)
        .or_else(|_| STANDARD_ANY_PAD.decode(segment))
        .map_err(|_| TokenDecodeError::InvalidEncoding)
}
