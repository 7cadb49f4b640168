//! Per-user salt pairs.
//!
//! Each user owns exactly one pair of random salts, generated once and
//! persisted verbatim. Values are 16 random bytes rendered as lowercase hex.

use std::sync::Arc;

use rand::{CryptoRng, RngCore};
use tracing::info;

use super::error_mapping::salt_store_error;
use super::ports::SaltRepository;
use super::{Error, UserId};

/// Number of random bytes behind each salt.
pub const SALT_BYTES: usize = 16;

/// Two independent salts bound to one user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Salt {
    pub user_id: UserId,
    pub salt_1: String,
    pub salt_2: String,
}

impl Salt {
    /// Generate a pair with the thread-local CSPRNG.
    pub fn generate(user_id: UserId) -> Self {
        Self::generate_with(user_id, &mut rand::thread_rng())
    }

    /// Generate a pair from `rng`.
    pub fn generate_with<R>(user_id: UserId, rng: &mut R) -> Self
    where
        R: RngCore + CryptoRng,
    {
        Self {
            user_id,
            salt_1: random_hex(rng),
            salt_2: random_hex(rng),
        }
    }
}

fn random_hex<R: RngCore + CryptoRng>(rng: &mut R) -> String {
    let mut bytes = [0_u8; SALT_BYTES];
    rng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Issues salt pairs and enforces one pair per user.
#[derive(Clone)]
pub struct SaltIssuer<S: ?Sized> {
    salts: Arc<S>,
}

impl<S> SaltIssuer<S>
where
    S: SaltRepository + ?Sized,
{
    pub fn new(salts: Arc<S>) -> Self {
        Self { salts }
    }

    /// Generate and store a pair for `user_id`.
    ///
    /// Fails with a duplicate key when the user already has one.
    pub async fn issue(&self, user_id: &UserId) -> Result<Salt, Error> {
        if self
            .salts
            .find_by_user(user_id)
            .await
            .map_err(salt_store_error)?
            .is_some()
        {
            return Err(Error::duplicate_key(format!(
                "salt already issued for user {user_id}"
            )));
        }
        let salt = Salt::generate(*user_id);
        self.salts.insert(&salt).await.map_err(salt_store_error)?;
        info!(%user_id, "issued salt pair");
        Ok(salt)
    }

    /// Fetch the stored pair for `user_id`, if any.
    pub async fn salt_for(&self, user_id: &UserId) -> Result<Option<Salt>, Error> {
        self.salts
            .find_by_user(user_id)
            .await
            .map_err(salt_store_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use crate::domain::ports::{MockSaltRepository, SaltRepositoryError};
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use rstest::rstest;

    #[rstest]
    fn generated_salts_are_hex_and_distinct() {
        let mut rng = StdRng::seed_from_u64(7);
        let salt = Salt::generate_with(UserId::random(), &mut rng);

        assert_eq!(salt.salt_1.len(), SALT_BYTES * 2);
        assert_eq!(salt.salt_2.len(), SALT_BYTES * 2);
        assert!(salt.salt_1.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(salt.salt_1, salt.salt_2);
    }

    #[tokio::test]
    async fn issue_stores_fresh_pair() {
        let user_id = UserId::random();
        let mut repo = MockSaltRepository::new();
        repo.expect_find_by_user().times(1).return_once(|_| Ok(None));
        repo.expect_insert()
            .withf(move |salt| salt.user_id == user_id)
            .times(1)
            .return_once(|_| Ok(()));

        let salt = SaltIssuer::new(Arc::new(repo))
            .issue(&user_id)
            .await
            .expect("issued");
        assert_eq!(salt.user_id, user_id);
    }

    #[tokio::test]
    async fn issue_rejects_second_pair() {
        let user_id = UserId::random();
        let existing = Salt::generate(user_id);
        let mut repo = MockSaltRepository::new();
        repo.expect_find_by_user()
            .times(1)
            .return_once(move |_| Ok(Some(existing)));
        repo.expect_insert().never();

        let error = SaltIssuer::new(Arc::new(repo))
            .issue(&user_id)
            .await
            .expect_err("already issued");
        assert_eq!(error.code(), ErrorCode::DuplicateKey);
    }

    #[tokio::test]
    async fn insert_race_surfaces_as_conflict() {
        let user_id = UserId::random();
        let mut repo = MockSaltRepository::new();
        repo.expect_find_by_user().times(1).return_once(|_| Ok(None));
        repo.expect_insert()
            .times(1)
            .return_once(move |_| Err(SaltRepositoryError::already_issued(user_id)));

        let error = SaltIssuer::new(Arc::new(repo))
            .issue(&user_id)
            .await
            .expect_err("lost the race");
        assert_eq!(error.code(), ErrorCode::DuplicateKey);
    }
}
