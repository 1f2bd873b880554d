//! Domain model for partners, the self profile, and local settings.
//!
//! # Responsibility
//! - Define the records shared by storage, the service and the export document.
//! - Keep validation next to the data it guards.
//!
//! # Invariants
//! - JSON field names match the export document (`id`, `name`, `smashes`,
//!   `rating`, `avatar`; `name`, `birthday`, `photo`).

pub mod partner;
pub mod profile;
pub mod settings;
pub mod store;
