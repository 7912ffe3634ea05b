//! Core domain logic for the customer registry.
//! This crate is the single source of truth for business invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod validation;

pub use db::{ConnectionPool, PoolError, PoolOptions, PooledConnection};
pub use logging::{default_log_level, init_logging, logging_status, LogTarget};
pub use model::customer::{Customer, CustomerId, CustomerInput, CustomerValidationError};
pub use repo::customer_repo::{
    CustomerRepository, RepoError, RepoResult, SqliteCustomerRepository,
};
pub use service::customer_service::{CustomerService, ServiceError, ServiceResult, UpdatePolicy};
pub use validation::cpf::is_valid as is_valid_cpf;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
