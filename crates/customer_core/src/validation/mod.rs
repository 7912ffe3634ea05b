//! Domain validation rules.
//!
//! # Responsibility
//! - Host pure, storage-independent checks used by write paths.
//!
//! # Invariants
//! - Validators have no side effects and never fail; bad input yields `false`.

pub mod cpf;
