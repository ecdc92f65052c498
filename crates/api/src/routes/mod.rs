pub mod health;
pub mod issues;

use axum::Router;

use crate::state::AppState;

/// Build the `/api` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /health                     service + database health
///
/// /issues                     list, create
/// /issues/{id}                get, full update, delete
/// /issues/{id}/tech           technician update (PATCH)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .nest("/issues", issues::router())
}
