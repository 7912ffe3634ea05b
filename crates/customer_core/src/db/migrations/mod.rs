//! Schema steps for the customer database.
//!
//! `PRAGMA user_version` holds the number of steps applied. Pending steps run
//! in one `IMMEDIATE` transaction and the version is re-read under that lock,
//! so connections racing on a fresh file apply each step exactly once.

use crate::db::{DbError, DbResult};
use rusqlite::{Connection, TransactionBehavior};

/// Ordered schema steps; step `n` (1-based) leaves the schema at version `n`.
const STEPS: &[&str] = &[include_str!("0001_customers.sql")];

/// Returns the schema version this build brings databases to.
pub fn latest_version() -> u32 {
    STEPS.len() as u32
}

/// Brings `conn` to [`latest_version`] and checks the identity index.
///
/// Returns the number of steps applied; `0` when the schema was current.
///
/// # Errors
/// - `SchemaTooNew` when the file was written by a newer build.
/// - `MissingIdentityIndex` when the `customers` table cannot enforce
///   identity uniqueness.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<u32> {
    let latest = latest_version();
    if schema_version(conn)? == latest {
        verify_identity_index(conn)?;
        return Ok(0);
    }

    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
    let found = schema_version(&tx)?;
    if found > latest {
        return Err(DbError::SchemaTooNew {
            found,
            supported: latest,
        });
    }

    for (version, sql) in (found + 1..).zip(&STEPS[found as usize..]) {
        tx.execute_batch(sql)?;
        tx.pragma_update(None, "user_version", version)?;
    }
    verify_identity_index(&tx)?;
    tx.commit()?;

    Ok(latest - found)
}

fn schema_version(conn: &Connection) -> DbResult<u32> {
    Ok(conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?)
}

/// Duplicate detection in the repository relies on this index.
fn verify_identity_index(conn: &Connection) -> DbResult<()> {
    let indexed: bool = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM pragma_index_list('customers') AS idx
            JOIN pragma_index_info(idx.name) AS col
            WHERE idx.\"unique\" = 1 AND col.name = 'identity_number'
        );",
        [],
        |row| row.get(0),
    )?;
    if indexed {
        Ok(())
    } else {
        Err(DbError::MissingIdentityIndex)
    }
}
