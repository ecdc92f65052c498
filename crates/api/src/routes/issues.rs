//! Route definitions for the issue resource.
//!
//! Mounted at `/issues` by `api_routes()`.

use axum::routing::{get, patch};
use axum::Router;

use crate::handlers::issues;
use crate::state::AppState;

/// Issue routes.
///
/// ```text
/// GET    /                  -> list_issues
/// POST   /                  -> create_issue
/// GET    /{id}              -> get_issue
/// PUT    /{id}              -> update_issue
/// DELETE /{id}              -> delete_issue
/// PATCH  /{id}/tech         -> update_technician_fields
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(issues::list_issues).post(issues::create_issue))
        .route(
            "/{id}",
            get(issues::get_issue)
                .put(issues::update_issue)
                .delete(issues::delete_issue),
        )
        .route("/{id}/tech", patch(issues::update_technician_fields))
}
