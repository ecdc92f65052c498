//! HTTP-level integration tests for the issue endpoints.
//!
//! Uses Axum's tower::ServiceExt to send requests directly to the router
//! without an actual TCP listener.

mod common;

use axum::http::StatusCode;
use common::{body_json, create_issue, delete, get, patch_json, post_json, put_json};
use serde_json::json;
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Create / get
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_create_issue_returns_201(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = post_json(
        app,
        "/api/issues",
        json!({
            "userName": "  Alice ",
            "issueDate": "2024-01-01",
            "issueDescription": "printer won't turn on at all",
            "precedingEvents": "",
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert!(json["id"].is_number());
    assert_eq!(json["userName"], "Alice");
    assert_eq!(json["issueDate"], "2024-01-01");
    assert_eq!(json["isResolved"], false);
    assert!(json["precedingEvents"].is_null());
    assert!(json["technicianName"].is_null());
    assert!(json["technicianNotes"].is_null());
    assert_eq!(json["createdAt"], json["updatedAt"]);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_create_reports_every_violation(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = post_json(
        app,
        "/api/issues",
        json!({ "userName": "", "issueDescription": "short" }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
    let fields: Vec<&str> = json["details"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["field"].as_str().unwrap())
        .collect();
    assert_eq!(fields, vec!["issueDate", "issueDescription", "userName"]);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_malformed_body_returns_400(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = post_json(app, "/api/issues", json!({ "userName": 42 })).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "BAD_REQUEST");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_get_issue_by_id(pool: PgPool) {
    let id = create_issue(&pool, "Alice", "printer won't turn on at all").await;

    let app = common::build_test_app(pool);
    let response = get(app, &format!("/api/issues/{id}")).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["id"], id);
    assert_eq!(json["issueDescription"], "printer won't turn on at all");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_get_nonexistent_issue_returns_404(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get(app, "/api/issues/999999").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["code"], "NOT_FOUND");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_invalid_ids_return_400(pool: PgPool) {
    for uri in ["/api/issues/abc", "/api/issues/0", "/api/issues/-4"] {
        let app = common::build_test_app(pool.clone());
        let response = get(app, uri).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{uri}");
        assert_eq!(body_json(response).await["error"], "Invalid issue ID");
    }
}

// ---------------------------------------------------------------------------
// Full update
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_update_overwrites_only_provided_fields(pool: PgPool) {
    let id = create_issue(&pool, "Alice", "printer won't turn on at all").await;

    let app = common::build_test_app(pool);
    let response = put_json(
        app,
        &format!("/api/issues/{id}"),
        json!({ "resolutionSteps": "unplugged and replugged" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["resolutionSteps"], "unplugged and replugged");
    assert_eq!(json["userName"], "Alice");
    assert_eq!(json["issueDescription"], "printer won't turn on at all");
    assert_eq!(json["isResolved"], false);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_update_resolving_without_technician_is_rejected(pool: PgPool) {
    let id = create_issue(&pool, "Alice", "printer won't turn on at all").await;

    let app = common::build_test_app(pool);
    let response = put_json(app, &format!("/api/issues/{id}"), json!({ "isResolved": true })).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert_eq!(json["details"][0]["field"], "isResolved");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_update_resolving_with_blank_notes_is_rejected(pool: PgPool) {
    let id = create_issue(&pool, "Alice", "printer won't turn on at all").await;

    let app = common::build_test_app(pool.clone());
    let response = put_json(
        app,
        &format!("/api/issues/{id}"),
        json!({
            "technicianName": "Bob",
            "technicianNotes": "   ",
            "isResolved": true,
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["details"][0]["field"], "isResolved");

    let app = common::build_test_app(pool);
    let json = body_json(get(app, &format!("/api/issues/{id}")).await).await;
    assert_eq!(json["isResolved"], false);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_update_nonexistent_issue_returns_404(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = put_json(app, "/api/issues/999999", json!({ "userName": "Bob" })).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Technician update
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_technician_update_requires_all_fields(pool: PgPool) {
    let id = create_issue(&pool, "Alice", "printer won't turn on at all").await;

    let app = common::build_test_app(pool);
    let response = patch_json(
        app,
        &format!("/api/issues/{id}/tech"),
        json!({ "technicianName": "Bob" }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    let fields: Vec<&str> = json["details"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["field"].as_str().unwrap())
        .collect();
    assert_eq!(fields, vec!["isResolved", "technicianNotes"]);
}

/// Create → resolve via technician update → resolved/open views.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_resolution_scenario(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let created = body_json(
        post_json(
            app,
            "/api/issues",
            json!({
                "userName": "Alice",
                "issueDate": "2024-01-01",
                "issueDescription": "printer won't turn on at all",
            }),
        )
        .await,
    )
    .await;
    let id = created["id"].as_i64().unwrap();
    assert_eq!(created["isResolved"], false);

    let app = common::build_test_app(pool.clone());
    let response = patch_json(
        app,
        &format!("/api/issues/{id}/tech"),
        json!({
            "technicianName": "Bob",
            "technicianNotes": "replaced fuse",
            "isResolved": true,
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let resolved = body_json(response).await;
    assert_eq!(resolved["isResolved"], true);
    assert_eq!(resolved["technicianName"], "Bob");

    let app = common::build_test_app(pool.clone());
    let open = body_json(get(app, "/api/issues?resolved=false").await).await;
    assert!(open["issues"]
        .as_array()
        .unwrap()
        .iter()
        .all(|i| i["id"] != id));

    let app = common::build_test_app(pool);
    let past = body_json(get(app, "/api/issues?resolved=true").await).await;
    assert!(past["issues"]
        .as_array()
        .unwrap()
        .iter()
        .any(|i| i["id"] == id));
}

// ---------------------------------------------------------------------------
// Delete
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_delete_issue_then_delete_again(pool: PgPool) {
    let id = create_issue(&pool, "Alice", "printer won't turn on at all").await;

    let app = common::build_test_app(pool.clone());
    let response = delete(app, &format!("/api/issues/{id}")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await["message"],
        "Issue deleted successfully"
    );

    let app = common::build_test_app(pool.clone());
    let response = delete(app, &format!("/api/issues/{id}")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let app = common::build_test_app(pool);
    let response = get(app, &format!("/api/issues/{id}")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// List
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_list_pagination_metadata(pool: PgPool) {
    for i in 0..3 {
        create_issue(&pool, &format!("user {i}"), "screen goes black randomly").await;
    }

    let app = common::build_test_app(pool.clone());
    let json = body_json(get(app, "/api/issues?limit=2").await).await;
    assert_eq!(json["issues"].as_array().unwrap().len(), 2);
    assert_eq!(
        json["pagination"],
        json!({
            "page": 1,
            "limit": 2,
            "total": 3,
            "totalPages": 2,
            "hasNext": true,
            "hasPrev": false,
        })
    );

    // One page past the end: empty, not an error.
    let app = common::build_test_app(pool);
    let response = get(app, "/api/issues?limit=2&page=3").await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert!(json["issues"].as_array().unwrap().is_empty());
    assert_eq!(json["pagination"]["hasNext"], false);
    assert_eq!(json["pagination"]["hasPrev"], true);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_list_normalises_bad_paging_params(pool: PgPool) {
    create_issue(&pool, "Alice", "printer won't turn on at all").await;

    let app = common::build_test_app(pool);
    let json = body_json(get(app, "/api/issues?page=abc&limit=-3&search=").await).await;
    assert_eq!(json["pagination"]["page"], 1);
    assert_eq!(json["pagination"]["limit"], 10);
    assert_eq!(json["pagination"]["total"], 1);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_list_returns_newest_first(pool: PgPool) {
    let first = create_issue(&pool, "Alice", "printer won't turn on at all").await;
    let second = create_issue(&pool, "Bob", "mouse cursor drifts left").await;

    let app = common::build_test_app(pool);
    let json = body_json(get(app, "/api/issues").await).await;
    let ids: Vec<i64> = json["issues"]
        .as_array()
        .unwrap()
        .iter()
        .map(|i| i["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![second, first]);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_search_by_technician_name(pool: PgPool) {
    let target = create_issue(&pool, "Alice", "printer won't turn on at all").await;
    create_issue(&pool, "Bob", "mouse cursor drifts left").await;

    let app = common::build_test_app(pool.clone());
    patch_json(
        app,
        &format!("/api/issues/{target}/tech"),
        json!({
            "technicianName": "Quentin",
            "technicianNotes": "checking the power supply",
            "isResolved": false,
        }),
    )
    .await;

    let app = common::build_test_app(pool);
    let json = body_json(get(app, "/api/issues?search=quent").await).await;
    let issues = json["issues"].as_array().unwrap();
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0]["id"], target);
    assert_eq!(json["pagination"]["total"], 1);
}
