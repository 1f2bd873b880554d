//! Durable storage for store objects.
//!
//! # Responsibility
//! - Define the slot repository contract and its SQLite/in-memory backends.
//! - Provide typed, best-effort load/save helpers over slots.
//!
//! # Invariants
//! - Each store object lives in its own slot; slots are written independently.

pub mod persistence;
pub mod slot_repo;
