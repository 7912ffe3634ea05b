//! Bounded SQLite connection pool on `r2d2`.
//!
//! # Invariants
//! - A file pool migrates the database once, before the first pooled
//!   connection exists; pooled connections only receive pragmas.
//! - An in-memory pool holds exactly one connection, since an in-memory
//!   database is private to the connection that created it. That
//!   connection is never recycled.

use super::open::{bootstrap_connection, configure_connection, OpenMode};
use super::{open_db, DbError};
use log::{info, warn};
use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::Connection;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::Path;
use std::time::Duration;

/// Wait limit for a free connection unless overridden.
pub const DEFAULT_ACQUIRE_TIMEOUT: Duration = Duration::from_secs(5);

/// Checked-out connection; returned to its pool on drop.
pub type PooledConnection = r2d2::PooledConnection<SqliteConnectionManager>;

#[derive(Debug)]
pub enum PoolError {
    Db(DbError),
    /// Pool size must be at least one.
    InvalidSize(usize),
    /// The pool could not establish its initial connections.
    Build(r2d2::Error),
    /// No connection became free within the acquire timeout.
    Timeout(Duration),
}

impl Display for PoolError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidSize(size) => write!(f, "invalid connection pool size {size}"),
            Self::Build(err) => write!(f, "connection pool setup failed: {err}"),
            Self::Timeout(timeout) => write!(
                f,
                "timed out after {}ms waiting for a database connection",
                timeout.as_millis()
            ),
        }
    }
}

impl Error for PoolError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Build(err) => Some(err),
            Self::InvalidSize(_) | Self::Timeout(_) => None,
        }
    }
}

impl From<DbError> for PoolError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

/// Sizing for [`ConnectionPool::open`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolOptions {
    pub size: usize,
    pub acquire_timeout: Duration,
}

impl PoolOptions {
    pub fn new(size: usize) -> Self {
        Self {
            size,
            acquire_timeout: DEFAULT_ACQUIRE_TIMEOUT,
        }
    }

    pub fn acquire_timeout(mut self, timeout: Duration) -> Self {
        self.acquire_timeout = timeout;
        self
    }
}

/// Shared handle to a bounded set of customer database connections.
///
/// Cloning is cheap; clones share the same connections.
#[derive(Clone)]
pub struct ConnectionPool {
    pool: Pool<SqliteConnectionManager>,
    acquire_timeout: Duration,
}

impl ConnectionPool {
    /// Opens a pool of `options.size` connections to the file at `path`.
    ///
    /// # Errors
    /// - `InvalidSize` for a zero size.
    /// - `Db` when the schema cannot be brought up to date.
    pub fn open(path: impl AsRef<Path>, options: PoolOptions) -> Result<Self, PoolError> {
        let size = checked_size(options.size)?;
        let path = path.as_ref();

        // Schema errors surface typed here instead of inside r2d2 retries.
        drop(open_db(path)?);

        let manager = SqliteConnectionManager::file(path).with_init(|conn| {
            configure_connection(conn, OpenMode::File).map_err(DbError::into_sqlite)
        });
        let pool = Pool::builder()
            .max_size(size)
            .connection_timeout(options.acquire_timeout)
            .build(manager)
            .map_err(PoolError::Build)?;

        info!(
            "event=db_pool_open module=db status=ok mode=file size={} path={}",
            size,
            path.display()
        );
        Ok(Self {
            pool,
            acquire_timeout: options.acquire_timeout,
        })
    }

    /// Creates a single-connection pool over a fresh in-memory database.
    pub fn in_memory() -> Result<Self, PoolError> {
        Self::in_memory_with_timeout(DEFAULT_ACQUIRE_TIMEOUT)
    }

    pub fn in_memory_with_timeout(acquire_timeout: Duration) -> Result<Self, PoolError> {
        let manager = SqliteConnectionManager::memory().with_init(|conn| {
            bootstrap_connection(conn, OpenMode::Memory)
                .map(|_| ())
                .map_err(DbError::into_sqlite)
        });
        // Recycling the connection would discard the database.
        let pool = Pool::builder()
            .max_size(1)
            .max_lifetime(None)
            .idle_timeout(None)
            .connection_timeout(acquire_timeout)
            .build(manager)
            .map_err(PoolError::Build)?;

        info!("event=db_pool_open module=db status=ok mode=memory size=1");
        Ok(Self {
            pool,
            acquire_timeout,
        })
    }

    /// Takes a free connection, waiting up to the acquire timeout.
    ///
    /// # Errors
    /// - `PoolError::Timeout` when every connection stays checked out.
    pub fn acquire(&self) -> Result<PooledConnection, PoolError> {
        self.pool.get().map_err(|err| {
            warn!(
                "event=db_pool_acquire module=db status=error error_code=pool_timeout timeout_ms={} error={}",
                self.acquire_timeout.as_millis(),
                err
            );
            PoolError::Timeout(self.acquire_timeout)
        })
    }

    /// Runs `f` with a scoped connection and releases it afterwards.
    pub fn with_connection<T, E>(
        &self,
        f: impl FnOnce(&Connection) -> Result<T, E>,
    ) -> Result<T, E>
    where
        E: From<PoolError>,
    {
        let conn = self.acquire()?;
        f(&conn)
    }

    /// Maximum number of connections the pool holds.
    pub fn size(&self) -> usize {
        self.pool.max_size() as usize
    }

    /// Number of connections currently idle.
    pub fn idle(&self) -> usize {
        self.pool.state().idle_connections as usize
    }
}

fn checked_size(size: usize) -> Result<u32, PoolError> {
    match u32::try_from(size) {
        Ok(0) | Err(_) => Err(PoolError::InvalidSize(size)),
        Ok(size) => Ok(size),
    }
}
