//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. Conversions into domain types live next to
//! the rows so every adapter validates stored data the same way.

use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::{Comic, ComicId, Nickname, Price, Salt, User, UserId};

use super::diesel_helpers::cast_revision_for_db;
use super::schema::{comics, salts, users};

/// Row struct for reading from the users table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub nickname: String,
    pub password_hash: String,
    pub is_admin: bool,
    pub comics_to_buy: Vec<Uuid>,
    pub purchased_comics: Vec<Uuid>,
    pub revision: i32,
}

impl TryFrom<UserRow> for User {
    type Error = String;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let nickname = Nickname::new(row.nickname)
            .map_err(|err| format!("stored user {} is invalid: {err}", row.id))?;
        let revision = u32::try_from(row.revision)
            .map_err(|_| format!("stored user {} has a negative revision", row.id))?;
        Ok(User {
            id: UserId::from_uuid(row.id),
            nickname,
            password_hash: row.password_hash,
            is_admin: row.is_admin,
            comics_to_buy: row.comics_to_buy.into_iter().map(ComicId::from_uuid).collect(),
            purchased_comics: row
                .purchased_comics
                .into_iter()
                .map(ComicId::from_uuid)
                .collect(),
            revision,
        })
    }
}

/// Insertable struct for provisioned users.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub id: Uuid,
    pub nickname: &'a str,
    pub password_hash: &'a str,
    pub is_admin: bool,
    pub comics_to_buy: Vec<Uuid>,
    pub purchased_comics: Vec<Uuid>,
    pub revision: i32,
}

impl<'a> From<&'a User> for NewUserRow<'a> {
    fn from(user: &'a User) -> Self {
        Self {
            id: *user.id.as_uuid(),
            nickname: user.nickname.as_ref(),
            password_hash: &user.password_hash,
            is_admin: user.is_admin,
            comics_to_buy: user.comics_to_buy.iter().map(|id| *id.as_uuid()).collect(),
            purchased_comics: user
                .purchased_comics
                .iter()
                .map(|id| *id.as_uuid())
                .collect(),
            revision: cast_revision_for_db(user.revision),
        }
    }
}

/// Changeset written by the wishlist ledger.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = users)]
pub(crate) struct UserListsUpdate {
    pub comics_to_buy: Vec<Uuid>,
    pub purchased_comics: Vec<Uuid>,
    pub revision: i32,
    pub updated_at: DateTime<Utc>,
}

/// Row struct for reading from the comics table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = comics)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ComicRow {
    pub id: Uuid,
    pub title: String,
    pub publisher: String,
    pub authors: Vec<String>,
    pub price: f64,
    pub publish_date: NaiveDate,
    pub description: Option<String>,
    pub link: Option<String>,
    pub images: Vec<String>,
}

impl TryFrom<ComicRow> for Comic {
    type Error = String;

    fn try_from(row: ComicRow) -> Result<Self, Self::Error> {
        let price = Price::new(row.price)
            .map_err(|err| format!("stored comic {} is invalid: {err}", row.id))?;
        Ok(Comic {
            id: ComicId::from_uuid(row.id),
            title: row.title,
            publisher: row.publisher,
            authors: row.authors,
            price,
            publish_date: row.publish_date,
            description: row.description,
            link: row.link,
            images: row.images,
        })
    }
}

/// Insertable struct for new comics.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = comics)]
pub(crate) struct NewComicRow<'a> {
    pub id: Uuid,
    pub title: &'a str,
    pub publisher: &'a str,
    pub authors: &'a [String],
    pub price: f64,
    pub publish_date: NaiveDate,
    pub description: Option<&'a str>,
    pub link: Option<&'a str>,
    pub images: &'a [String],
}

impl<'a> From<&'a Comic> for NewComicRow<'a> {
    fn from(comic: &'a Comic) -> Self {
        Self {
            id: *comic.id.as_uuid(),
            title: &comic.title,
            publisher: &comic.publisher,
            authors: &comic.authors,
            price: comic.price.amount(),
            publish_date: comic.publish_date,
            description: comic.description.as_deref(),
            link: comic.link.as_deref(),
            images: &comic.images,
        }
    }
}

/// Full replacement of the mutable comic columns.
///
/// Edits merge the patch into the stored comic first, so `None` here clears
/// the column.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = comics)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct ComicUpdate<'a> {
    pub title: &'a str,
    pub publisher: &'a str,
    pub authors: &'a [String],
    pub price: f64,
    pub publish_date: NaiveDate,
    pub description: Option<&'a str>,
    pub link: Option<&'a str>,
    pub images: &'a [String],
}

impl<'a> From<&'a Comic> for ComicUpdate<'a> {
    fn from(comic: &'a Comic) -> Self {
        Self {
            title: &comic.title,
            publisher: &comic.publisher,
            authors: &comic.authors,
            price: comic.price.amount(),
            publish_date: comic.publish_date,
            description: comic.description.as_deref(),
            link: comic.link.as_deref(),
            images: &comic.images,
        }
    }
}

/// Row struct for the salts table.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = salts)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct SaltRow {
    pub user_id: Uuid,
    pub salt_1: String,
    pub salt_2: String,
}

impl From<&Salt> for SaltRow {
    fn from(salt: &Salt) -> Self {
        Self {
            user_id: *salt.user_id.as_uuid(),
            salt_1: salt.salt_1.clone(),
            salt_2: salt.salt_2.clone(),
        }
    }
}

impl From<SaltRow> for Salt {
    fn from(row: SaltRow) -> Self {
        Self {
            user_id: UserId::from_uuid(row.user_id),
            salt_1: row.salt_1,
            salt_2: row.salt_2,
        }
    }
}
