//! Flutter-facing bindings for the stockroom core.

pub mod api;
