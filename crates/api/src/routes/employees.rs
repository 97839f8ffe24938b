//! Route definitions for the `/employees` resource and its sub-resources.

use axum::routing::get;
use axum::Router;

use crate::handlers::{attendance, employees, status};
use crate::state::AppState;

/// Routes mounted at `/employees`.
///
/// ```text
/// GET    /                          -> list
/// POST   /                          -> create (admin)
/// GET    /{id}                      -> get_by_id
/// PUT    /{id}                      -> update (admin)
/// DELETE /{id}                      -> deactivate (admin)
/// GET    /{id}/status               -> status::get
/// POST   /{id}/status               -> status::set
/// GET    /{id}/attendance           -> attendance::history
/// GET    /{id}/attendance/export    -> attendance::export_csv (admin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(employees::list).post(employees::create))
        .route(
            "/{id}",
            get(employees::get_by_id)
                .put(employees::update)
                .delete(employees::deactivate),
        )
        .route("/{id}/status", get(status::get).post(status::set))
        .route("/{id}/attendance", get(attendance::history))
        .route("/{id}/attendance/export", get(attendance::export_csv))
}
