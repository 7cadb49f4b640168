//! Comic catalogue entries, admin drafts and catalogue filters.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Validation errors raised while building or patching comics.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ComicValidationError {
    /// Identifier text is not a UUID.
    #[error("comic id must be a valid UUID")]
    InvalidId,
    /// A required text attribute is empty or whitespace.
    #[error("{field} must not be empty")]
    BlankField {
        /// Attribute name as it appears on the wire.
        field: &'static str,
    },
    /// Price is zero, negative, NaN or infinite.
    #[error("price must be a finite number greater than zero")]
    NonPositivePrice,
}

impl ComicValidationError {
    /// Name of the offending field, for client-facing error details.
    pub fn field(&self) -> &'static str {
        match self {
            Self::InvalidId => "id",
            Self::BlankField { field } => field,
            Self::NonPositivePrice => "price",
        }
    }
}

/// Stable comic identifier stored as a UUID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ComicId(Uuid);

impl ComicId {
    /// Parse a comic id from its textual UUID form.
    pub fn new(id: impl AsRef<str>) -> Result<Self, ComicValidationError> {
        Uuid::parse_str(id.as_ref())
            .map(Self)
            .map_err(|_| ComicValidationError::InvalidId)
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

impl fmt::Display for ComicId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Strictly positive, finite price.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Price(f64);

impl Price {
    /// Validate a raw amount.
    ///
    /// # Examples
    /// ```
    /// use backend::domain::Price;
    ///
    /// assert!(Price::new(9.99).is_ok());
    /// assert!(Price::new(0.0).is_err());
    /// assert!(Price::new(-1.0).is_err());
    /// ```
    pub fn new(amount: f64) -> Result<Self, ComicValidationError> {
        if amount.is_finite() && amount > 0.0 {
            Ok(Self(amount))
        } else {
            Err(ComicValidationError::NonPositivePrice)
        }
    }

    /// The raw amount.
    pub fn amount(self) -> f64 {
        self.0
    }
}

impl TryFrom<f64> for Price {
    type Error = ComicValidationError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Price> for f64 {
    fn from(value: Price) -> Self {
        value.0
    }
}

fn require_text(field: &'static str, value: String) -> Result<String, ComicValidationError> {
    if value.trim().is_empty() {
        Err(ComicValidationError::BlankField { field })
    } else {
        Ok(value)
    }
}

/// A persisted catalogue entry.
#[derive(Debug, Clone, PartialEq)]
pub struct Comic {
    pub id: ComicId,
    pub title: String,
    pub publisher: String,
    pub authors: Vec<String>,
    pub price: Price,
    pub publish_date: NaiveDate,
    pub description: Option<String>,
    pub link: Option<String>,
    pub images: Vec<String>,
}

/// A validated comic awaiting insertion.
#[derive(Debug, Clone, PartialEq)]
pub struct NewComic {
    pub title: String,
    pub publisher: String,
    pub authors: Vec<String>,
    pub price: Price,
    pub publish_date: NaiveDate,
    pub description: Option<String>,
    pub link: Option<String>,
    pub images: Vec<String>,
}

impl NewComic {
    /// Validate the required attributes of a new comic.
    ///
    /// `authors` may be empty; `title` and `publisher` must not be blank.
    pub fn new(
        title: impl Into<String>,
        publisher: impl Into<String>,
        authors: Vec<String>,
        price: Price,
        publish_date: NaiveDate,
    ) -> Result<Self, ComicValidationError> {
        Ok(Self {
            title: require_text("title", title.into())?,
            publisher: require_text("publisher", publisher.into())?,
            authors,
            price,
            publish_date,
            description: None,
            link: None,
            images: Vec::new(),
        })
    }

    #[must_use]
    pub fn with_description(mut self, description: Option<String>) -> Self {
        self.description = description;
        self
    }

    #[must_use]
    pub fn with_link(mut self, link: Option<String>) -> Self {
        self.link = link;
        self
    }

    #[must_use]
    pub fn with_images(mut self, images: Vec<String>) -> Self {
        self.images = images;
        self
    }

    /// Attach an identity, producing the stored form.
    pub fn into_comic(self, id: ComicId) -> Comic {
        Comic {
            id,
            title: self.title,
            publisher: self.publisher,
            authors: self.authors,
            price: self.price,
            publish_date: self.publish_date,
            description: self.description,
            link: self.link,
            images: self.images,
        }
    }
}

/// Partial update applied by administrators; `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ComicPatch {
    pub title: Option<String>,
    pub publisher: Option<String>,
    pub authors: Option<Vec<String>>,
    pub price: Option<Price>,
    pub publish_date: Option<NaiveDate>,
    pub description: Option<String>,
    pub link: Option<String>,
    pub images: Option<Vec<String>>,
}

impl ComicPatch {
    /// Reject blank replacements for required text fields.
    pub fn validate(&self) -> Result<(), ComicValidationError> {
        if let Some(title) = &self.title {
            require_text("title", title.clone())?;
        }
        if let Some(publisher) = &self.publisher {
            require_text("publisher", publisher.clone())?;
        }
        Ok(())
    }

    /// Overwrite the supplied fields of `comic`.
    pub fn apply_to(&self, comic: &mut Comic) {
        let patch = self.clone();
        if let Some(title) = patch.title {
            comic.title = title;
        }
        if let Some(publisher) = patch.publisher {
            comic.publisher = publisher;
        }
        if let Some(authors) = patch.authors {
            comic.authors = authors;
        }
        if let Some(price) = patch.price {
            comic.price = price;
        }
        if let Some(publish_date) = patch.publish_date {
            comic.publish_date = publish_date;
        }
        if patch.description.is_some() {
            comic.description = patch.description;
        }
        if patch.link.is_some() {
            comic.link = patch.link;
        }
        if let Some(images) = patch.images {
            comic.images = images;
        }
    }
}

/// Optional catalogue constraints combined with logical AND.
///
/// Text filters are literal, case-insensitive substring matches. `authors`
/// matches comics sharing at least one author with the set. Date and price
/// bounds are inclusive and independent of each other.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ComicFilter {
    pub title: Option<String>,
    pub publisher: Option<String>,
    pub authors: Option<Vec<String>>,
    pub from_date: Option<NaiveDate>,
    pub to_date: Option<NaiveDate>,
    pub price_less_than: Option<f64>,
    pub price_greater_than: Option<f64>,
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

impl ComicFilter {
    /// Evaluate the filter against a single comic.
    ///
    /// Adapters that cannot push filters into their store use this directly;
    /// SQL adapters translate the same rules into a `WHERE` clause.
    pub fn matches(&self, comic: &Comic) -> bool {
        let title_ok = self
            .title
            .as_deref()
            .is_none_or(|needle| contains_ignore_case(&comic.title, needle));
        let publisher_ok = self
            .publisher
            .as_deref()
            .is_none_or(|needle| contains_ignore_case(&comic.publisher, needle));
        let authors_ok = self
            .authors
            .as_ref()
            .is_none_or(|wanted| comic.authors.iter().any(|author| wanted.contains(author)));
        let from_ok = self.from_date.is_none_or(|from| comic.publish_date >= from);
        let to_ok = self.to_date.is_none_or(|to| comic.publish_date <= to);
        let price = comic.price.amount();
        let below_ok = self.price_less_than.is_none_or(|max| price <= max);
        let above_ok = self.price_greater_than.is_none_or(|min| price >= min);

        title_ok && publisher_ok && authors_ok && from_ok && to_ok && below_ok && above_ok
    }
}
