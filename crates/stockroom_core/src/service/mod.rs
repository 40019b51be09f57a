//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into use-case level APIs.
//! - Translate storage failures into caller-facing error categories.
//! - Keep UI/FFI layers decoupled from storage details.

pub mod authorized_inventory;
pub mod credential_service;
pub mod inventory_service;
