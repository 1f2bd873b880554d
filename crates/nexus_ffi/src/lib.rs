//! Flutter-facing bindings for Nexus core.

pub mod api;
