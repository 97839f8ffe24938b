pub mod attendance;
pub mod auth;
pub mod departments;
pub mod employees;
pub mod health;

use axum::routing::get;
use axum::Router;

use crate::handlers;
use crate::state::AppState;

/// Build the `/api` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/login                              login (public)
/// /auth/me                                 current user
///
/// /departments                             tree (GET), create (POST, admin)
///
/// /employees                               list (GET), create (POST, admin)
/// /employees/{id}                          detail, update (admin), deactivate (admin)
/// /employees/{id}/status                   get, set
/// /employees/{id}/attendance               month, range or today
/// /employees/{id}/attendance/export        CSV (admin)
///
/// /employee-statuses                       all statuses
///
/// /attendance/clock-in                     clock in (POST)
/// /attendance/clock-out                    clock out (POST)
/// /attendance/{id}                         manual correction (PUT, admin)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/departments", departments::router())
        .nest("/employees", employees::router())
        .route("/employee-statuses", get(handlers::status::list))
        .nest("/attendance", attendance::router())
}
