//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate validation and repository calls into use-case level APIs.
//! - Keep transport layers decoupled from storage details.

pub mod customer_service;
