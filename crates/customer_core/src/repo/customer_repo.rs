//! Customer repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide the persistence primitives the customer service builds on.
//! - Keep SQL details inside core persistence boundary.
//!
//! # Invariants
//! - Mutations report affected-row counts; classifying zero rows is the
//!   caller's job.
//! - A `UNIQUE` violation on `identity_number` surfaces as
//!   `RepoError::DuplicateIdentity`, never as a raw driver error.

use crate::db::DbError;
use crate::model::customer::{Customer, CustomerId, CustomerInput};
use rusqlite::{params, Connection, ErrorCode, OptionalExtension, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

const CUSTOMER_SELECT_SQL: &str = "SELECT
    id,
    name,
    identity_number,
    birth_date,
    street_address,
    postal_code,
    city,
    state
FROM customers";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for customer persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    /// Storage rejected a write because the identity number is taken.
    DuplicateIdentity(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::DuplicateIdentity(message) => {
                write!(f, "identity number already registered: {message}")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::DuplicateIdentity(_) => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Persistence collaborator for customer records.
pub trait CustomerRepository {
    fn list_all(&self) -> RepoResult<Vec<Customer>>;
    fn find_by_identity_number(&self, identity_number: &str) -> RepoResult<Option<Customer>>;
    fn insert(&self, input: &CustomerInput) -> RepoResult<CustomerId>;
    /// Replaces every field of the row keyed by `id`; returns rows affected.
    fn update_by_id(&self, id: CustomerId, input: &CustomerInput) -> RepoResult<usize>;
    /// Hard-deletes the row keyed by `id`; returns rows affected.
    fn delete_by_id(&self, id: CustomerId) -> RepoResult<usize>;
}

/// SQLite-backed customer repository.
pub struct SqliteCustomerRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteCustomerRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl CustomerRepository for SqliteCustomerRepository<'_> {
    fn list_all(&self) -> RepoResult<Vec<Customer>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{CUSTOMER_SELECT_SQL} ORDER BY id ASC;"))?;
        let customers = stmt
            .query_map([], parse_customer_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(customers)
    }

    fn find_by_identity_number(&self, identity_number: &str) -> RepoResult<Option<Customer>> {
        let customer = self
            .conn
            .query_row(
                &format!("{CUSTOMER_SELECT_SQL} WHERE identity_number = ?1;"),
                [identity_number],
                parse_customer_row,
            )
            .optional()?;
        Ok(customer)
    }

    fn insert(&self, input: &CustomerInput) -> RepoResult<CustomerId> {
        self.conn
            .execute(
                "INSERT INTO customers (
                    name,
                    identity_number,
                    birth_date,
                    street_address,
                    postal_code,
                    city,
                    state
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7);",
                params![
                    input.name.as_str(),
                    input.identity_number.as_str(),
                    input.birth_date.as_str(),
                    input.street_address.as_str(),
                    input.postal_code.as_str(),
                    input.city.as_str(),
                    input.state.as_str(),
                ],
            )
            .map_err(classify_write_error)?;

        Ok(self.conn.last_insert_rowid())
    }

    fn update_by_id(&self, id: CustomerId, input: &CustomerInput) -> RepoResult<usize> {
        let changed = self
            .conn
            .execute(
                "UPDATE customers
                 SET
                    name = ?1,
                    identity_number = ?2,
                    birth_date = ?3,
                    street_address = ?4,
                    postal_code = ?5,
                    city = ?6,
                    state = ?7
                 WHERE id = ?8;",
                params![
                    input.name.as_str(),
                    input.identity_number.as_str(),
                    input.birth_date.as_str(),
                    input.street_address.as_str(),
                    input.postal_code.as_str(),
                    input.city.as_str(),
                    input.state.as_str(),
                    id,
                ],
            )
            .map_err(classify_write_error)?;

        Ok(changed)
    }

    fn delete_by_id(&self, id: CustomerId) -> RepoResult<usize> {
        let changed = self
            .conn
            .execute("DELETE FROM customers WHERE id = ?1;", [id])?;
        Ok(changed)
    }
}

fn parse_customer_row(row: &Row<'_>) -> rusqlite::Result<Customer> {
    Ok(Customer {
        id: row.get("id")?,
        name: row.get("name")?,
        identity_number: row.get("identity_number")?,
        birth_date: row.get("birth_date")?,
        street_address: row.get("street_address")?,
        postal_code: row.get("postal_code")?,
        city: row.get("city")?,
        state: row.get("state")?,
    })
}

fn classify_write_error(err: rusqlite::Error) -> RepoError {
    match &err {
        rusqlite::Error::SqliteFailure(failure, message)
            if failure.code == ErrorCode::ConstraintViolation
                && failure.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE =>
        {
            RepoError::DuplicateIdentity(message.clone().unwrap_or_else(|| err.to_string()))
        }
        _ => RepoError::from(err),
    }
}
