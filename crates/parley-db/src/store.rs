use std::path::{Path, PathBuf};

use sqlx::pool::PoolConnection;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Sqlite, SqlitePool};

use crate::error::{DbError, Result};

const MAX_CONNECTIONS: u32 = 4;

/// Read-only handle on the bridge's message store.
///
/// Every query checks out its own connection from the pool and returns it
/// when the query finishes; no connection is held between calls.
#[derive(Clone)]
pub struct Store {
    pool: SqlitePool,
    path: PathBuf,
}

impl Store {
    pub async fn open(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(DbError::Connection(format!(
                "no message store at {}",
                path.display()
            )));
        }

        let options = SqliteConnectOptions::new()
            .filename(path)
            .read_only(true)
            .create_if_missing(false);

        let pool = SqlitePoolOptions::new()
            .max_connections(MAX_CONNECTIONS)
            .connect_with(options)
            .await
            .map_err(|e| DbError::Connection(format!("{}: {}", path.display(), e)))?;

        tracing::info!("Message store opened at: {}", path.display());

        Ok(Self {
            pool,
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }

    pub(crate) async fn acquire(&self) -> Result<PoolConnection<Sqlite>> {
        self.pool
            .acquire()
            .await
            .map_err(|e| DbError::Connection(e.to_string()))
    }

    #[cfg(test)]
    pub(crate) fn from_pool(pool: SqlitePool) -> Self {
        Self {
            pool,
            path: PathBuf::from(":memory:"),
        }
    }
}
