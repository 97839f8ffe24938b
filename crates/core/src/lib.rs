//! Domain primitives for the presence and attendance tracker.
//!
//! Everything in this crate is pure: no I/O, no async. The storage,
//! event and engine crates build on these types and rules.

pub mod attendance;
pub mod error;
pub mod export;
pub mod geo;
pub mod presence;
pub mod roles;
pub mod settings;
pub mod types;
