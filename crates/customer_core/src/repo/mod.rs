//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the data access contract the customer service depends on.
//! - Isolate SQLite query details from service/business orchestration.
//!
//! # Invariants
//! - Repositories do not validate business rules; the service does that
//!   before any mutation reaches them.

pub mod customer_repo;
