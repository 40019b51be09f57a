//! Domain model for credentials and inventory records.
//!
//! # Responsibility
//! - Define canonical data structures used by core business logic.
//! - Own input validation so every write path shares one rule set.
//!
//! # Invariants
//! - Values constructed through the validating constructors are always
//!   persistable without further checks.

pub mod item;
pub mod user;
