//! In-memory adapters for the driven ports.
//!
//! Used when no database is configured and by the HTTP integration tests.
//! They honour the same contracts as the Diesel adapters: unique titles,
//! insertion-ordered listings, revision-checked list writes and one salt pair
//! per user.

use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use crate::domain::ports::{
    ComicRepository, ComicRepositoryError, SaltRepository, SaltRepositoryError, UserRepository,
    UserRepositoryError,
};
use crate::domain::{Comic, ComicFilter, ComicId, Salt, User, UserId};

fn lock<'a, T>(mutex: &'a Mutex<T>, store: &str) -> Result<MutexGuard<'a, T>, String> {
    mutex
        .lock()
        .map_err(|_| format!("{store} store lock poisoned"))
}

/// Comics kept in insertion order.
#[derive(Debug, Default)]
pub struct InMemoryComicRepository {
    comics: Mutex<Vec<Comic>>,
}

impl InMemoryComicRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn guard(&self) -> Result<MutexGuard<'_, Vec<Comic>>, ComicRepositoryError> {
        lock(&self.comics, "comic").map_err(ComicRepositoryError::connection)
    }
}

fn title_taken(comics: &[Comic], title: &str, except: Option<ComicId>) -> bool {
    comics
        .iter()
        .any(|comic| comic.title == title && Some(comic.id) != except)
}

#[async_trait]
impl ComicRepository for InMemoryComicRepository {
    async fn find_by_id(&self, id: &ComicId) -> Result<Option<Comic>, ComicRepositoryError> {
        Ok(self.guard()?.iter().find(|comic| comic.id == *id).cloned())
    }

    async fn count(&self, filter: &ComicFilter) -> Result<u64, ComicRepositoryError> {
        let matching = self.guard()?.iter().filter(|comic| filter.matches(comic)).count();
        Ok(matching as u64)
    }

    async fn find_page(
        &self,
        filter: &ComicFilter,
        offset: u64,
        limit: u32,
    ) -> Result<Vec<Comic>, ComicRepositoryError> {
        let skip = usize::try_from(offset)
            .map_err(|_| ComicRepositoryError::query("page offset exceeds usize range"))?;
        let take = usize::try_from(limit)
            .map_err(|_| ComicRepositoryError::query("page limit exceeds usize range"))?;
        Ok(self
            .guard()?
            .iter()
            .filter(|comic| filter.matches(comic))
            .skip(skip)
            .take(take)
            .cloned()
            .collect())
    }

    async fn insert(&self, comic: &Comic) -> Result<(), ComicRepositoryError> {
        let mut comics = self.guard()?;
        if title_taken(&comics, &comic.title, None) {
            return Err(ComicRepositoryError::duplicate_title(comic.title.clone()));
        }
        comics.push(comic.clone());
        Ok(())
    }

    async fn update(&self, comic: &Comic) -> Result<(), ComicRepositoryError> {
        let mut comics = self.guard()?;
        if title_taken(&comics, &comic.title, Some(comic.id)) {
            return Err(ComicRepositoryError::duplicate_title(comic.title.clone()));
        }
        let slot = comics
            .iter_mut()
            .find(|stored| stored.id == comic.id)
            .ok_or_else(|| ComicRepositoryError::not_found(comic.id))?;
        *slot = comic.clone();
        Ok(())
    }

    async fn delete(&self, id: &ComicId) -> Result<bool, ComicRepositoryError> {
        let mut comics = self.guard()?;
        let before = comics.len();
        comics.retain(|comic| comic.id != *id);
        Ok(comics.len() != before)
    }
}

/// Users provisioned at startup; only their lists change afterwards.
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    users: Mutex<Vec<User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a repository holding `users`.
    pub fn with_users(users: impl IntoIterator<Item = User>) -> Self {
        Self {
            users: Mutex::new(users.into_iter().collect()),
        }
    }

    fn guard(&self) -> Result<MutexGuard<'_, Vec<User>>, UserRepositoryError> {
        lock(&self.users, "user").map_err(UserRepositoryError::connection)
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn insert(&self, user: &User) -> Result<(), UserRepositoryError> {
        let mut users = self.guard()?;
        if users
            .iter()
            .any(|stored| stored.id == user.id || stored.nickname == user.nickname)
        {
            return Err(UserRepositoryError::already_exists(user.nickname.to_string()));
        }
        users.push(user.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserRepositoryError> {
        Ok(self.guard()?.iter().find(|user| user.id == *id).cloned())
    }

    async fn save_lists(
        &self,
        user: &User,
        expected_revision: u32,
    ) -> Result<(), UserRepositoryError> {
        let mut users = self.guard()?;
        let stored = users
            .iter_mut()
            .find(|stored| stored.id == user.id)
            .ok_or_else(|| UserRepositoryError::not_found(user.id))?;
        if stored.revision != expected_revision {
            return Err(UserRepositoryError::revision_mismatch(
                expected_revision,
                stored.revision,
            ));
        }
        stored.comics_to_buy = user.comics_to_buy.clone();
        stored.purchased_comics = user.purchased_comics.clone();
        stored.revision = user.revision;
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct InMemorySaltRepository {
    salts: Mutex<Vec<Salt>>,
}

impl InMemorySaltRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn guard(&self) -> Result<MutexGuard<'_, Vec<Salt>>, SaltRepositoryError> {
        lock(&self.salts, "salt").map_err(SaltRepositoryError::connection)
    }
}

#[async_trait]
impl SaltRepository for InMemorySaltRepository {
    async fn insert(&self, salt: &Salt) -> Result<(), SaltRepositoryError> {
        let mut salts = self.guard()?;
        if salts.iter().any(|stored| stored.user_id == salt.user_id) {
            return Err(SaltRepositoryError::already_issued(salt.user_id));
        }
        salts.push(salt.clone());
        Ok(())
    }

    async fn find_by_user(&self, user_id: &UserId) -> Result<Option<Salt>, SaltRepositoryError> {
        Ok(self
            .guard()?
            .iter()
            .find(|salt| salt.user_id == *user_id)
            .cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{NewComic, Nickname, Price, SaltIssuer};
    use chrono::NaiveDate;
    use rstest::{fixture, rstest};
    use std::sync::Arc;

    fn comic(title: &str, publisher: &str) -> Comic {
        NewComic::new(
            title,
            publisher,
            Vec::new(),
            Price::new(2.0).expect("valid price"),
            NaiveDate::from_ymd_opt(2001, 1, 1).expect("valid date"),
        )
        .expect("valid comic")
        .into_comic(ComicId::random())
    }

    #[fixture]
    fn reader() -> User {
        User::new(
            UserId::random(),
            Nickname::new("reader").expect("valid nickname"),
            "hash",
        )
    }

    #[tokio::test]
    async fn listing_keeps_insertion_order_and_filters() {
        let repo = InMemoryComicRepository::new();
        for (title, publisher) in [("Dylan Dog 1", "Bonelli"), ("Batman", "DC"), ("Dylan Dog 2", "Bonelli")] {
            repo.insert(&comic(title, publisher)).await.expect("insert");
        }
        let filter = ComicFilter {
            title: Some("dog".to_owned()),
            ..ComicFilter::default()
        };

        assert_eq!(repo.count(&filter).await.expect("count"), 2);
        let page = repo.find_page(&filter, 1, 50).await.expect("page");
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].title, "Dylan Dog 2");
    }

    #[tokio::test]
    async fn duplicate_titles_are_rejected_on_insert_and_update() {
        let repo = InMemoryComicRepository::new();
        let first = comic("Tex", "Bonelli");
        let mut second = comic("Zagor", "Bonelli");
        repo.insert(&first).await.expect("insert");
        repo.insert(&second).await.expect("insert");

        let err = repo.insert(&comic("Tex", "Other")).await.expect_err("duplicate");
        assert!(matches!(err, ComicRepositoryError::DuplicateTitle { .. }));

        second.title = "Tex".to_owned();
        let err = repo.update(&second).await.expect_err("duplicate");
        assert!(matches!(err, ComicRepositoryError::DuplicateTitle { .. }));
        let stored = repo.find_by_id(&first.id).await.expect("find");
        assert_eq!(stored.map(|c| c.publisher), Some("Bonelli".to_owned()));
    }

    #[tokio::test]
    async fn delete_reports_whether_a_comic_was_removed() {
        let repo = InMemoryComicRepository::new();
        let stored = comic("Tex", "Bonelli");
        repo.insert(&stored).await.expect("insert");

        assert!(repo.delete(&stored.id).await.expect("delete"));
        assert!(!repo.delete(&stored.id).await.expect("delete"));
    }

    #[rstest]
    #[tokio::test]
    async fn stale_revision_is_rejected(reader: User) {
        let repo = InMemoryUserRepository::with_users([reader.clone()]);
        let mut next = reader.clone();
        next.revision = 2;
        repo.save_lists(&next, 1).await.expect("first write");

        let err = repo.save_lists(&next, 1).await.expect_err("stale");
        assert_eq!(err, UserRepositoryError::revision_mismatch(1_u32, 2_u32));
    }

    #[rstest]
    #[tokio::test]
    async fn users_are_unique_by_id_and_nickname(reader: User) {
        let repo = InMemoryUserRepository::new();
        repo.insert(&reader).await.expect("first insert");

        let same_nickname = User::new(
            UserId::random(),
            Nickname::new("reader").expect("valid nickname"),
            "other",
        );
        for duplicate in [reader.clone(), same_nickname] {
            let err = repo.insert(&duplicate).await.expect_err("duplicate");
            assert_eq!(err, UserRepositoryError::already_exists("reader"));
        }
        assert_eq!(repo.find_by_id(&reader.id).await.expect("find"), Some(reader));
    }

    #[rstest]
    #[tokio::test]
    async fn salts_are_issued_once_per_user(reader: User) {
        let issuer = SaltIssuer::new(Arc::new(InMemorySaltRepository::new()));
        let salt = issuer.issue(&reader.id).await.expect("issued");

        assert_eq!(issuer.salt_for(&reader.id).await.expect("lookup"), Some(salt));
        assert!(issuer.issue(&reader.id).await.is_err());
    }
}
