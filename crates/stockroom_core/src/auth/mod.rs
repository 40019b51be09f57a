//! Password hashing and explicit session values.
//!
//! # Responsibility
//! - Hash and verify passwords with salted Argon2id.
//! - Represent an authenticated caller as a `Session` passed into gated calls.

pub mod password;
pub mod session;
