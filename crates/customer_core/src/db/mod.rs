//! Customer database: connection bootstrap, schema steps and pooling.
//!
//! Every connection the repository layer sees comes from [`open_db`],
//! [`open_db_in_memory`] or a [`ConnectionPool`], so the `customers` table
//! and its unique identity index exist before the first query.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod migrations;
mod open;
mod pool;

pub use open::{open_db, open_db_in_memory};
pub use pool::{
    ConnectionPool, PoolError, PoolOptions, PooledConnection, DEFAULT_ACQUIRE_TIMEOUT,
};

pub type DbResult<T> = Result<T, DbError>;

/// Failure preparing a customer database for use.
#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
    /// `user_version` is past the last schema step this build knows.
    SchemaTooNew { found: u32, supported: u32 },
    /// Schema steps ran but `customers.identity_number` has no unique index.
    MissingIdentityIndex,
}

impl DbError {
    /// Folds into the error type pool init hooks must return.
    pub(crate) fn into_sqlite(self) -> rusqlite::Error {
        match self {
            Self::Sqlite(err) => err,
            other => rusqlite::Error::UserFunctionError(other.to_string().into()),
        }
    }
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::SchemaTooNew { found, supported } => write!(
                f,
                "customer database is at schema version {found}; this build supports up to {supported}"
            ),
            Self::MissingIdentityIndex => {
                write!(f, "customers.identity_number lacks a unique index")
            }
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            _ => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
