//! Core use-case services.
//!
//! # Responsibility
//! - Turn user actions into store mutations plus explicit saves.
//! - Keep CLI/FFI front ends decoupled from storage details.

pub mod tracker_service;
