//! Presence API server library.
//!
//! Exposes config, state, error handling, routes and the WebSocket feed so
//! integration tests and the binary entrypoint share one router.

pub mod auth;
pub mod bootstrap;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod routes;
pub mod state;
pub mod ws;
