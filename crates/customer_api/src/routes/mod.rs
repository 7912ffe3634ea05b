//! # API Route Modules
//!
//! - `customers`: list/create/update/delete over the customer registry.
//! - `health`: liveness banner and version probe.

pub mod customers;
pub mod health;
