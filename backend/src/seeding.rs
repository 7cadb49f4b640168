//! Startup user seeding from an operator-supplied JSON file.
//!
//! The file holds an array of users:
//!
//! ```json
//! [
//!   {
//!     "id": "3fa85f64-5717-4562-b3fc-2c963f66afa6",
//!     "nickname": "curator",
//!     "passwordHash": "$argon2id$...",
//!     "isAdmin": true
//!   }
//! ]
//! ```
//!
//! Every entry is provisioned through [`UserProvisioner`]; entries already
//! stored are skipped, so the same file can be applied on every start.

use std::path::{Path, PathBuf};

use cap_std::{ambient_authority, fs::Dir};
use serde::Deserialize;
use thiserror::Error;
use tracing::info;

use crate::domain::ports::{SaltRepository, UserRepository};
use crate::domain::{
    Nickname, Provisioned, User, UserId, UserProvisioner, UserValidationError,
};

/// One user entry in the seed file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SeedUser {
    pub id: String,
    pub nickname: String,
    pub password_hash: String,
    #[serde(default)]
    pub is_admin: bool,
}

impl SeedUser {
    /// Validate the entry into a fresh domain user.
    ///
    /// # Errors
    /// Returns [`UserValidationError`] when the id or nickname is invalid.
    pub fn into_user(self) -> Result<User, UserValidationError> {
        let id = UserId::new(&self.id)?;
        let nickname = Nickname::new(self.nickname)?;
        Ok(User::new(id, nickname, self.password_hash).with_admin(self.is_admin))
    }
}

/// Counts reported after a seeding run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedingSummary {
    /// Users stored by this run.
    pub created: usize,
    /// Users skipped because they were already stored.
    pub already_present: usize,
}

/// Errors returned while seeding users at startup.
#[derive(Debug, Error)]
pub enum SeedingError {
    /// Seed file could not be read.
    #[error("failed to read seed file at {path}: {source}")]
    Read {
        /// Path to the seed file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// Seed file is not a JSON array of users.
    #[error("seed file {path} is malformed: {source}")]
    Parse {
        /// Path to the seed file.
        path: PathBuf,
        /// Underlying JSON error.
        #[source]
        source: serde_json::Error,
    },
    /// An entry failed domain validation.
    #[error("seed entry {index} is invalid: {source}")]
    InvalidUser {
        /// Zero-based position of the entry in the file.
        index: usize,
        /// Validation failure.
        #[source]
        source: UserValidationError,
    },
    /// Storing a user or its salt failed.
    #[error("provisioning {nickname} failed: {message}")]
    Provisioning {
        /// Nickname of the user being provisioned.
        nickname: String,
        /// Domain error message.
        message: String,
    },
}

/// Provision every user in the seed file at `path`, if one is configured.
///
/// # Errors
/// Returns [`SeedingError`] when the file cannot be read or parsed, when an
/// entry is invalid, or when a store rejects a write. Entries before the
/// failing one stay provisioned.
///
/// # Examples
///
/// ```rust,no_run
/// use std::path::Path;
/// use std::sync::Arc;
///
/// use backend::domain::UserProvisioner;
/// use backend::outbound::memory::{InMemorySaltRepository, InMemoryUserRepository};
/// use backend::seeding::seed_users_on_startup;
///
/// # async fn run() -> Result<(), Box<dyn std::error::Error>> {
/// let provisioner = UserProvisioner::new(
///     Arc::new(InMemoryUserRepository::new()),
///     Arc::new(InMemorySaltRepository::new()),
/// );
/// let summary =
///     seed_users_on_startup(Some(Path::new("fixtures/seed-users.json")), &provisioner).await?;
/// println!("{} users created", summary.created);
/// # Ok(())
/// # }
/// ```
pub async fn seed_users_on_startup<U, S>(
    path: Option<&Path>,
    provisioner: &UserProvisioner<U, S>,
) -> Result<SeedingSummary, SeedingError>
where
    U: UserRepository + ?Sized,
    S: SaltRepository + ?Sized,
{
    let Some(path) = path else {
        info!(reason = "no seed file configured", "user seeding skipped");
        return Ok(SeedingSummary::default());
    };

    let entries = load_seed_users(path)?;
    let mut summary = SeedingSummary::default();
    for (index, entry) in entries.into_iter().enumerate() {
        let user = entry
            .into_user()
            .map_err(|source| SeedingError::InvalidUser { index, source })?;
        let outcome = provisioner
            .provision(&user)
            .await
            .map_err(|error| SeedingError::Provisioning {
                nickname: user.nickname.to_string(),
                message: error.message().to_owned(),
            })?;
        match outcome {
            Provisioned::Created(_) => summary.created += 1,
            Provisioned::AlreadyPresent => summary.already_present += 1,
        }
    }

    info!(
        path = %path.display(),
        created = summary.created,
        already_present = summary.already_present,
        "user seeding applied"
    );
    Ok(summary)
}

/// Read and parse the seed file at `path`.
///
/// # Errors
/// Returns [`SeedingError::Read`] or [`SeedingError::Parse`].
pub fn load_seed_users(path: &Path) -> Result<Vec<SeedUser>, SeedingError> {
    let read_error = |source: std::io::Error| SeedingError::Read {
        path: path.to_path_buf(),
        source,
    };
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let file_name = path.file_name().ok_or_else(|| {
        read_error(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            "seed path must be a file",
        ))
    })?;
    let dir = Dir::open_ambient_dir(parent, ambient_authority()).map_err(read_error)?;
    let payload = dir.read(Path::new(file_name)).map_err(read_error)?;
    serde_json::from_slice(&payload).map_err(|source| SeedingError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outbound::memory::{InMemorySaltRepository, InMemoryUserRepository};
    use rstest::{fixture, rstest};
    use std::io::Write as _;
    use std::sync::Arc;
    use tempfile::NamedTempFile;

    const CURATOR_ID: &str = "3fa85f64-5717-4562-b3fc-2c963f66afa6";
    const READER_ID: &str = "9b2f8a4e-1c3d-4e5f-8a7b-6c5d4e3f2a1b";

    type MemoryProvisioner = UserProvisioner<InMemoryUserRepository, InMemorySaltRepository>;

    struct Stores {
        users: Arc<InMemoryUserRepository>,
        salts: Arc<InMemorySaltRepository>,
        provisioner: MemoryProvisioner,
    }

    #[fixture]
    fn stores() -> Stores {
        let users = Arc::new(InMemoryUserRepository::new());
        let salts = Arc::new(InMemorySaltRepository::new());
        let provisioner = UserProvisioner::new(users.clone(), salts.clone());
        Stores {
            users,
            salts,
            provisioner,
        }
    }

    fn seed_file(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("temp file");
        file.write_all(contents.as_bytes()).expect("write seed");
        file
    }

    fn two_users() -> String {
        format!(
            r#"[
                {{"id": "{CURATOR_ID}", "nickname": "curator", "passwordHash": "h1", "isAdmin": true}},
                {{"id": "{READER_ID}", "nickname": "reader", "passwordHash": "h2"}}
            ]"#
        )
    }

    #[rstest]
    fn seed_user_defaults_to_non_admin() {
        let entries: Vec<SeedUser> =
            serde_json::from_str(&two_users()).expect("seed parses");
        let reader = entries[1].clone().into_user().expect("valid");
        assert!(!reader.is_admin);
        assert_eq!(reader.revision, 1);
        assert_eq!(reader.password_hash, "h2");
    }

    #[rstest]
    #[tokio::test]
    async fn missing_path_skips_seeding(stores: Stores) {
        let summary = seed_users_on_startup(None, &stores.provisioner)
            .await
            .expect("skipped");
        assert_eq!(summary, SeedingSummary::default());
    }

    #[rstest]
    #[tokio::test]
    async fn seeding_stores_users_with_salts(stores: Stores) {
        let file = seed_file(&two_users());

        let summary = seed_users_on_startup(Some(file.path()), &stores.provisioner)
            .await
            .expect("seeded");

        assert_eq!(
            summary,
            SeedingSummary {
                created: 2,
                already_present: 0
            }
        );
        let curator_id = UserId::new(CURATOR_ID).expect("valid id");
        let curator = stores
            .users
            .find_by_id(&curator_id)
            .await
            .expect("lookup")
            .expect("stored");
        assert!(curator.is_admin);
        let salt = stores
            .salts
            .find_by_user(&curator_id)
            .await
            .expect("lookup");
        assert!(salt.is_some());
    }

    #[rstest]
    #[tokio::test]
    async fn reseeding_the_same_file_is_a_no_op(stores: Stores) {
        let file = seed_file(&two_users());
        seed_users_on_startup(Some(file.path()), &stores.provisioner)
            .await
            .expect("first run");

        let summary = seed_users_on_startup(Some(file.path()), &stores.provisioner)
            .await
            .expect("second run");

        assert_eq!(
            summary,
            SeedingSummary {
                created: 0,
                already_present: 2
            }
        );
    }

    #[rstest]
    #[tokio::test]
    async fn invalid_entry_reports_its_index(stores: Stores) {
        let file = seed_file(
            r#"[{"id": "not-a-uuid", "nickname": "curator", "passwordHash": "h"}]"#,
        );

        let error = seed_users_on_startup(Some(file.path()), &stores.provisioner)
            .await
            .expect_err("invalid id");
        assert!(matches!(
            error,
            SeedingError::InvalidUser {
                index: 0,
                source: UserValidationError::InvalidId
            }
        ));
    }

    #[rstest]
    #[case("{}")]
    #[case(r#"[{"id": "x"}]"#)]
    #[case(r#"[{"id": "x", "nickname": "n", "passwordHash": "h", "role": "admin"}]"#)]
    fn malformed_file_is_a_parse_error(#[case] contents: &str) {
        let file = seed_file(contents);
        let error = load_seed_users(file.path()).expect_err("malformed");
        assert!(matches!(error, SeedingError::Parse { .. }));
    }

    #[rstest]
    fn missing_file_is_a_read_error() {
        let dir = tempfile::tempdir().expect("temp dir");
        let error = load_seed_users(&dir.path().join("absent.json")).expect_err("missing");
        assert!(matches!(error, SeedingError::Read { .. }));
    }
}
