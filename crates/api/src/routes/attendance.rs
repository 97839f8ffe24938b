//! Route definitions for the `/attendance` resource.

use axum::routing::{post, put};
use axum::Router;

use crate::handlers::attendance;
use crate::state::AppState;

/// Routes mounted at `/attendance`.
///
/// ```text
/// POST /clock-in     -> clock_in
/// POST /clock-out    -> clock_out
/// PUT  /{id}         -> update (admin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/clock-in", post(attendance::clock_in))
        .route("/clock-out", post(attendance::clock_out))
        .route("/{id}", put(attendance::update))
}
