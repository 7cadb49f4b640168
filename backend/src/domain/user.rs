//! Marketplace user and the two comic lists it owns.
//!
//! A user's wishlist (`comics_to_buy`) and purchase history
//! (`purchased_comics`) change only through [`User::add_to_wishlist`] and
//! [`User::record_purchase`]. Persisted users carry a `revision` used by
//! adapters for optimistic concurrency.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::ComicId;

/// Validation errors raised by user value constructors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserValidationError {
    /// Identifier text is not a UUID.
    #[error("user id must be a valid UUID")]
    InvalidId,
    /// Nickname is empty or whitespace.
    #[error("nickname must not be empty")]
    EmptyNickname,
}

/// Stable user identifier stored as a UUID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(Uuid);

impl UserId {
    /// Parse a user id from its textual UUID form.
    pub fn new(id: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let raw = id.as_ref();
        if raw.trim() != raw {
            return Err(UserValidationError::InvalidId);
        }
        Uuid::parse_str(raw)
            .map(Self)
            .map_err(|_| UserValidationError::InvalidId)
    }

    /// Wrap an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Generate a new random id.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Unique public handle chosen by the user.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Nickname(String);

impl Nickname {
    /// Validate and construct a nickname.
    pub fn new(value: impl Into<String>) -> Result<Self, UserValidationError> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(UserValidationError::EmptyNickname);
        }
        Ok(Self(value))
    }
}

impl AsRef<str> for Nickname {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Nickname {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Nickname {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Nickname> for String {
    fn from(value: Nickname) -> Self {
        value.0
    }
}

/// A registered marketplace user.
///
/// ## Invariants
/// - a comic id moved to `purchased_comics` by [`User::record_purchase`] no
///   longer appears in `comics_to_buy`;
/// - `comics_to_buy` holds each comic id at most once when populated through
///   [`User::add_to_wishlist`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub nickname: Nickname,
    /// Opaque credential digest; never inspected by this service.
    pub password_hash: String,
    pub is_admin: bool,
    pub comics_to_buy: Vec<ComicId>,
    pub purchased_comics: Vec<ComicId>,
    pub revision: u32,
}

impl User {
    /// Create a non-admin user with empty lists at revision 1.
    pub fn new(id: UserId, nickname: Nickname, password_hash: impl Into<String>) -> Self {
        Self {
            id,
            nickname,
            password_hash: password_hash.into(),
            is_admin: false,
            comics_to_buy: Vec::new(),
            purchased_comics: Vec::new(),
            revision: 1,
        }
    }

    /// Grant or revoke the administrator role.
    #[must_use]
    pub fn with_admin(mut self, is_admin: bool) -> Self {
        self.is_admin = is_admin;
        self
    }

    /// Append `comic` to the wishlist unless it is already there.
    ///
    /// Returns `true` when the list changed.
    ///
    /// # Examples
    /// ```
    /// use backend::domain::{ComicId, Nickname, User, UserId};
    ///
    /// let nickname = Nickname::new("reader").expect("valid nickname");
    /// let mut user = User::new(UserId::random(), nickname, "hash");
    /// let comic = ComicId::random();
    /// assert!(user.add_to_wishlist(comic));
    /// assert!(!user.add_to_wishlist(comic));
    /// assert_eq!(user.comics_to_buy, vec![comic]);
    /// ```
    pub fn add_to_wishlist(&mut self, comic: ComicId) -> bool {
        if self.comics_to_buy.contains(&comic) {
            return false;
        }
        self.comics_to_buy.push(comic);
        true
    }

    /// Move `comic` into the purchase history.
    ///
    /// The id is appended to `purchased_comics` and its first occurrence, if
    /// any, is removed from `comics_to_buy`.
    pub fn record_purchase(&mut self, comic: ComicId) {
        if let Some(index) = self.comics_to_buy.iter().position(|id| *id == comic) {
            self.comics_to_buy.remove(index);
        }
        self.purchased_comics.push(comic);
    }
}
