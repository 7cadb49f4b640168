//! Embedded PostgreSQL helpers for repository integration tests.
//!
//! Each test receives its own temporary database on a cluster shared by the
//! whole test binary. The schema comes from the embedded Diesel migrations, so
//! tests always run against the same tables the server creates.
//!
//! Set `SKIP_TEST_CLUSTER=1` where PostgreSQL cannot be bootstrapped; tests
//! then print a skip marker instead of failing.

use std::time::Duration;

use backend::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};
use pg_embedded_setup_unpriv::{BootstrapResult, ClusterHandle, TemporaryDatabase};
use tokio::runtime::Runtime;

const SHARED_CLUSTER_RETRIES: usize = 5;
const SHARED_CLUSTER_RETRY_DELAY: Duration = Duration::from_millis(500);

/// A migrated temporary database and a pool connected to it.
pub struct MigratedDatabase {
    pub runtime: Runtime,
    pub pool: DbPool,
    _database: TemporaryDatabase,
}

/// Returns true when `SKIP_TEST_CLUSTER` is "1", "true" or "yes".
pub fn should_skip_test_cluster() -> bool {
    std::env::var("SKIP_TEST_CLUSTER")
        .map(|value| matches!(value.to_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(false)
}

/// Skip when `SKIP_TEST_CLUSTER` is truthy, otherwise fail loudly.
pub fn handle_cluster_setup_failure<T>(reason: impl std::fmt::Display) -> Option<T> {
    if should_skip_test_cluster() {
        eprintln!("SKIP-TEST-CLUSTER: {reason}");
        None
    } else {
        panic!("Test cluster setup failed: {reason}. Set SKIP_TEST_CLUSTER=1 to skip.");
    }
}

/// `postgresql_embedded` picks a random password per process unless one is
/// set, which breaks reuse of an existing data directory.
fn ensure_stable_password() {
    if std::env::var_os("PG_PASSWORD").is_none() {
        // SAFETY: runs before the cluster bootstrap spawns any threads.
        unsafe {
            std::env::set_var("PG_PASSWORD", "comics_embedded_test");
        }
    }
}

/// Start (or reuse) the cluster shared by this test binary.
pub fn shared_cluster_handle() -> BootstrapResult<&'static ClusterHandle> {
    ensure_stable_password();
    let mut attempt = 1;
    loop {
        match pg_embedded_setup_unpriv::test_support::shared_cluster_handle() {
            Ok(handle) => return Ok(handle),
            Err(error) => {
                if attempt >= SHARED_CLUSTER_RETRIES {
                    return Err(error);
                }
                std::thread::sleep(SHARED_CLUSTER_RETRY_DELAY);
                attempt += 1;
            }
        }
    }
}

/// Create a temporary database, apply migrations and open a small pool.
pub fn migrated_database() -> Result<MigratedDatabase, String> {
    let runtime = Runtime::new().map_err(|err| err.to_string())?;
    let cluster = shared_cluster_handle().map_err(|err| err.to_string())?;
    let database = cluster
        .create_temporary_database()
        .map_err(|err| format!("create temporary database: {err:?}"))?;
    let url = database.url().to_string();

    let pool = runtime.block_on(async {
        run_pending_migrations(&url)
            .await
            .map_err(|err| err.to_string())?;
        let config = PoolConfig::new(url.as_str())
            .with_max_size(2)
            .with_min_idle(Some(1));
        DbPool::new(config).await.map_err(|err| err.to_string())
    })?;

    Ok(MigratedDatabase {
        runtime,
        pool,
        _database: database,
    })
}
