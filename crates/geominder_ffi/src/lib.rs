//! Flutter-facing bindings for the Geominder core.

pub mod api;
