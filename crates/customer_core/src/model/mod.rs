//! Customer domain model.
//!
//! # Responsibility
//! - Define canonical data structures used by core business logic.
//!
//! # Invariants
//! - Every stored customer is identified by a storage-assigned `CustomerId`.
//! - Deletion is a hard delete; there are no tombstones.

pub mod customer;
