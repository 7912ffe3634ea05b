//! Shared handler state.

use customer_core::{
    ConnectionPool, CustomerService, ServiceResult, SqliteCustomerRepository, UpdatePolicy,
};

use crate::error::AppError;

/// Customer service bound to one checked-out SQLite connection.
pub type SqliteCustomerService<'conn> = CustomerService<SqliteCustomerRepository<'conn>>;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pool: ConnectionPool,
    update_policy: UpdatePolicy,
}

impl AppState {
    pub fn new(pool: ConnectionPool, update_policy: UpdatePolicy) -> Self {
        Self {
            pool,
            update_policy,
        }
    }

    pub fn pool(&self) -> &ConnectionPool {
        &self.pool
    }

    /// Runs one service operation on the blocking pool.
    ///
    /// The connection is checked out for the duration of `op` and returned
    /// to the pool on every exit path.
    pub async fn run<T, F>(&self, op: F) -> Result<T, AppError>
    where
        T: Send + 'static,
        F: for<'conn> FnOnce(&SqliteCustomerService<'conn>) -> ServiceResult<T> + Send + 'static,
    {
        let pool = self.pool.clone();
        let update_policy = self.update_policy;

        let outcome = tokio::task::spawn_blocking(move || {
            pool.with_connection(|conn| {
                let service = CustomerService::with_update_policy(
                    SqliteCustomerRepository::new(conn),
                    update_policy,
                );
                op(&service)
            })
        })
        .await
        .map_err(|err| AppError::Internal(format!("customer task failed: {err}")))?;

        Ok(outcome?)
    }
}
