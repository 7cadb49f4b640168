//! Comic catalogue DTOs and parsing helpers.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::error_mapping::comic_validation_error;
use crate::domain::{Comic, ComicFilter, ComicPatch, Error, NewComic};
use crate::inbound::http::validation::{
    FieldName, non_blank, parse_authors, parse_date, parse_decimal, parse_price, require,
};

/// Query parameters accepted by `GET /comics`.
///
/// Values arrive as raw strings so malformed input is reported with the
/// domain error envelope rather than the framework's plain-text rejection.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListComicsQuery {
    /// One-based page number; defaults to 1.
    #[param(example = "1")]
    pub page: Option<String>,
    /// Case-insensitive substring of the title.
    pub title: Option<String>,
    /// Case-insensitive substring of the publisher.
    pub publisher: Option<String>,
    /// Comma-separated author names; any overlap matches.
    pub authors: Option<String>,
    /// Earliest publish date, `YYYY-MM-DD` or RFC 3339.
    pub from_date: Option<String>,
    /// Latest publish date, `YYYY-MM-DD` or RFC 3339.
    pub to_date: Option<String>,
    /// Inclusive upper price bound.
    pub price_less_than: Option<String>,
    /// Inclusive lower price bound.
    pub price_greater_than: Option<String>,
}

impl ListComicsQuery {
    /// Convert the query into a domain filter, ignoring blank values.
    pub(super) fn to_filter(&self) -> Result<ComicFilter, Error> {
        let date = |raw: &Option<String>, field: &'static str| {
            non_blank(raw.clone())
                .map(|value| parse_date(&value, FieldName::new(field)))
                .transpose()
        };
        let decimal = |raw: &Option<String>, field: &'static str| {
            non_blank(raw.clone())
                .map(|value| parse_decimal(&value, FieldName::new(field)))
                .transpose()
        };

        Ok(ComicFilter {
            title: non_blank(self.title.clone()),
            publisher: non_blank(self.publisher.clone()),
            authors: self.authors.as_deref().and_then(parse_authors),
            from_date: date(&self.from_date, "from_date")?,
            to_date: date(&self.to_date, "to_date")?,
            price_less_than: decimal(&self.price_less_than, "price_less_than")?,
            price_greater_than: decimal(&self.price_greater_than, "price_greater_than")?,
        })
    }
}

/// Request payload for creating or editing a comic.
///
/// Every field is optional on the wire; creation enforces the required set
/// while edits apply whatever is present.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct ComicRequest {
    #[schema(example = "Dylan Dog 400")]
    pub title: Option<String>,
    #[schema(example = "Sergio Bonelli Editore")]
    pub publisher: Option<String>,
    pub authors: Option<Vec<String>>,
    #[schema(example = 4.4)]
    pub price: Option<f64>,
    #[schema(example = "2019-12-27")]
    pub publish_date: Option<String>,
    pub description: Option<String>,
    pub link: Option<String>,
    pub images: Option<Vec<String>>,
}

impl ComicRequest {
    /// Build a validated draft; every catalogue field except the optional
    /// extras must be present.
    pub(super) fn into_new_comic(self) -> Result<NewComic, Error> {
        let title = require(self.title, FieldName::new("title"))?;
        let publisher = require(self.publisher, FieldName::new("publisher"))?;
        let authors = require(self.authors, FieldName::new("authors"))?;
        let price = parse_price(
            require(self.price, FieldName::new("price"))?,
            FieldName::new("price"),
        )?;
        let publish_date = parse_date(
            &require(self.publish_date, FieldName::new("publish_date"))?,
            FieldName::new("publish_date"),
        )?;

        Ok(NewComic::new(title, publisher, authors, price, publish_date)
            .map_err(|err| comic_validation_error(&err))?
            .with_description(self.description)
            .with_link(self.link)
            .with_images(self.images.unwrap_or_default()))
    }

    /// Build a partial update from whichever fields are present.
    pub(super) fn into_patch(self) -> Result<ComicPatch, Error> {
        let price = self
            .price
            .map(|amount| parse_price(amount, FieldName::new("price")))
            .transpose()?;
        let publish_date = self
            .publish_date
            .map(|raw| parse_date(&raw, FieldName::new("publish_date")))
            .transpose()?;

        Ok(ComicPatch {
            title: self.title,
            publisher: self.publisher,
            authors: self.authors,
            price,
            publish_date,
            description: self.description,
            link: self.link,
            images: self.images,
        })
    }
}

/// Full comic representation.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, ToSchema)]
pub struct ComicResponse {
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    pub id: String,
    pub title: String,
    pub publisher: String,
    pub authors: Vec<String>,
    pub price: f64,
    #[schema(example = "2019-12-27")]
    pub publish_date: String,
    pub description: Option<String>,
    pub link: Option<String>,
    pub images: Vec<String>,
}

impl From<Comic> for ComicResponse {
    fn from(comic: Comic) -> Self {
        Self {
            id: comic.id.to_string(),
            title: comic.title,
            publisher: comic.publisher,
            authors: comic.authors,
            price: comic.price.amount(),
            publish_date: comic.publish_date.format("%Y-%m-%d").to_string(),
            description: comic.description,
            link: comic.link,
            images: comic.images,
        }
    }
}

/// One page of the catalogue listing.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct ComicListResponse {
    pub comics: Vec<ComicResponse>,
    /// Page actually served after clamping.
    pub page: u32,
    /// Total number of pages for the filter.
    pub pages: u32,
    /// Total number of matching comics.
    pub total: u64,
}

/// Response for a successful creation.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct CreatedResponse {
    pub created_id: String,
    #[schema(example = "Comic created")]
    pub message: String,
}

/// Response carrying a confirmation message.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub(super) fn new(message: &str) -> Self {
        Self {
            message: message.to_owned(),
        }
    }
}
