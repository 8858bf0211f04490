//! HTTP-level integration tests for the project, milestone, task and
//! worklog endpoints.
//!
//! Uses Axum's tower::ServiceExt to send requests directly to the router
//! without an actual TCP listener.

mod common;

use axum::http::StatusCode;
use common::{body_json, create_id, delete, get, post_json, post_raw, put_json};
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Project CRUD
// ---------------------------------------------------------------------------

#[sqlx::test]
async fn test_create_project_returns_201_with_defaults(pool: PgPool) {
    let app = common::app(&pool).await;
    let response = post_json(app, "/api/projects", json!({"name": "Alpha"})).await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["name"], "Alpha");
    assert_eq!(json["status"], "planning");
    assert!(json["description"].is_null());
    assert!(json["id"].as_str().unwrap().parse::<Uuid>().is_ok());
    assert!(json["created_at"].is_string());
    assert!(json["updated_at"].is_string());
}

#[sqlx::test]
async fn test_project_round_trip(pool: PgPool) {
    let app = common::app(&pool).await;
    let id = create_id(
        app,
        "/api/projects",
        json!({
            "name": "Website",
            "description": "Relaunch",
            "status": "in_progress",
            "start_date": "2024-01-01",
            "end_date": "2024-06-30"
        }),
    )
    .await;

    let app = common::build_test_app(pool.clone());
    let response = get(app, &format!("/api/projects/{id}")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["name"], "Website");
    assert_eq!(json["status"], "in_progress");
    assert_eq!(json["start_date"], "2024-01-01");

    let app = common::build_test_app(pool.clone());
    let response = put_json(
        app,
        &format!("/api/projects/{id}"),
        json!({"status": "on_hold", "description": null}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "on_hold");
    assert_eq!(json["name"], "Website", "absent fields are left alone");
    assert!(json["description"].is_null(), "null clears the field");
    assert_eq!(json["end_date"], "2024-06-30");

    let app = common::build_test_app(pool.clone());
    let response = delete(app, &format!("/api/projects/{id}")).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let app = common::build_test_app(pool);
    let response = get(app, &format!("/api/projects/{id}")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test]
async fn test_list_projects_in_creation_order(pool: PgPool) {
    let app = common::app(&pool).await;
    create_id(app, "/api/projects", json!({"name": "First"})).await;
    let app = common::build_test_app(pool.clone());
    create_id(app, "/api/projects", json!({"name": "Second"})).await;

    let app = common::build_test_app(pool);
    let response = get(app, "/api/projects").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let projects = json["projects"].as_array().unwrap();
    assert_eq!(projects.len(), 2);
    assert_eq!(projects[0]["name"], "First");
    assert_eq!(projects[1]["name"], "Second");
}

#[sqlx::test]
async fn test_empty_project_list(pool: PgPool) {
    let app = common::app(&pool).await;
    let json = body_json(get(app, "/api/projects").await).await;
    assert_eq!(json, json!({"projects": []}));
}

// ---------------------------------------------------------------------------
// Missing resources
// ---------------------------------------------------------------------------

#[sqlx::test]
async fn test_missing_ids_return_404(pool: PgPool) {
    common::setup(&pool).await;
    let missing = Uuid::new_v4();

    for resource in ["projects", "milestones", "tasks", "worklogs"] {
        let uri = format!("/api/{resource}/{missing}");

        let app = common::build_test_app(pool.clone());
        let response = get(app, &uri).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "GET {uri}");
        let json = body_json(response).await;
        assert_eq!(json["code"], "NOT_FOUND");

        let app = common::build_test_app(pool.clone());
        let response = put_json(app, &uri, json!({})).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "PUT {uri}");

        let app = common::build_test_app(pool.clone());
        let response = delete(app, &uri).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "DELETE {uri}");
    }
}

#[sqlx::test]
async fn test_nested_routes_under_missing_parent_return_404(pool: PgPool) {
    common::setup(&pool).await;
    let missing = Uuid::new_v4();

    for uri in [
        format!("/api/projects/{missing}/milestones"),
        format!("/api/projects/{missing}/tasks"),
        format!("/api/projects/{missing}/tasks/tree"),
        format!("/api/tasks/{missing}/children"),
        format!("/api/tasks/{missing}/worklogs"),
    ] {
        let app = common::build_test_app(pool.clone());
        let response = get(app, &uri).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "GET {uri}");
    }

    let app = common::build_test_app(pool.clone());
    let response = post_json(
        app,
        &format!("/api/projects/{missing}/tasks"),
        json!({"name": "Orphan"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let app = common::build_test_app(pool);
    let response = post_json(
        app,
        &format!("/api/projects/{missing}/milestones"),
        json!({"name": "Orphan"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Bad requests
// ---------------------------------------------------------------------------

#[sqlx::test]
async fn test_malformed_json_returns_400(pool: PgPool) {
    let app = common::app(&pool).await;
    let response = post_raw(app, "/api/projects", "{\"name\": ").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "BAD_REQUEST");
    assert!(json["error"].is_string());
}

#[sqlx::test]
async fn test_missing_required_field_returns_400(pool: PgPool) {
    let app = common::app(&pool).await;
    let response = post_json(app, "/api/projects", json!({"description": "no name"})).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test]
async fn test_unknown_status_returns_400(pool: PgPool) {
    let app = common::app(&pool).await;
    let response = post_json(
        app,
        "/api/projects",
        json!({"name": "Alpha", "status": "abandoned"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test]
async fn test_empty_name_returns_validation_error(pool: PgPool) {
    let app = common::app(&pool).await;
    let response = post_json(app, "/api/projects", json!({"name": ""})).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
}

#[sqlx::test]
async fn test_non_uuid_id_returns_400(pool: PgPool) {
    let app = common::app(&pool).await;
    let response = get(app, "/api/projects/not-a-uuid").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "BAD_REQUEST");
}

// ---------------------------------------------------------------------------
// Milestones
// ---------------------------------------------------------------------------

#[sqlx::test]
async fn test_milestone_crud(pool: PgPool) {
    let app = common::app(&pool).await;
    let project_id = create_id(app, "/api/projects", json!({"name": "Alpha"})).await;

    let app = common::build_test_app(pool.clone());
    let response = post_json(
        app,
        &format!("/api/projects/{project_id}/milestones"),
        json!({"name": "Beta release", "due_date": "2024-03-01"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let milestone = body_json(response).await;
    assert_eq!(milestone["status"], "pending");
    assert_eq!(milestone["project_id"], project_id.as_str());
    let milestone_id = milestone["id"].as_str().unwrap().to_string();

    let app = common::build_test_app(pool.clone());
    let json = body_json(get(app, &format!("/api/projects/{project_id}/milestones")).await).await;
    assert_eq!(json["milestones"].as_array().unwrap().len(), 1);

    let app = common::build_test_app(pool.clone());
    let response = put_json(
        app,
        &format!("/api/milestones/{milestone_id}"),
        json!({"status": "completed", "due_date": null}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "completed");
    assert!(json["due_date"].is_null());

    let app = common::build_test_app(pool.clone());
    let response = delete(app, &format!("/api/milestones/{milestone_id}")).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let app = common::build_test_app(pool);
    let response = get(app, &format!("/api/milestones/{milestone_id}")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Tasks
// ---------------------------------------------------------------------------

#[sqlx::test]
async fn test_task_defaults_and_hierarchy(pool: PgPool) {
    let app = common::app(&pool).await;
    let project_id = create_id(app, "/api/projects", json!({"name": "Alpha"})).await;
    let tasks_uri = format!("/api/projects/{project_id}/tasks");

    let app = common::build_test_app(pool.clone());
    let response = post_json(app, &tasks_uri, json!({"name": "Design"})).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let parent = body_json(response).await;
    assert_eq!(parent["status"], "not_started");
    assert_eq!(parent["priority"], "medium");
    assert_eq!(parent["sort_order"], 0);
    assert!(parent["parent_id"].is_null());
    let parent_id = parent["id"].as_str().unwrap().to_string();

    let app = common::build_test_app(pool.clone());
    let response = post_json(
        app,
        &tasks_uri,
        json!({
            "name": "Wireframes",
            "parent_id": parent_id,
            "priority": "high",
            "estimated_hours": 12.5
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let child = body_json(response).await;
    assert_eq!(child["parent_id"], parent_id.as_str());
    assert_eq!(child["estimated_hours"], 12.5);

    let app = common::build_test_app(pool.clone());
    let json = body_json(get(app, &format!("/api/tasks/{parent_id}/children")).await).await;
    let children = json["tasks"].as_array().unwrap();
    assert_eq!(children.len(), 1);
    assert_eq!(children[0]["name"], "Wireframes");

    let app = common::build_test_app(pool.clone());
    let json = body_json(get(app, &tasks_uri).await).await;
    assert_eq!(json["tasks"].as_array().unwrap().len(), 2);

    let app = common::build_test_app(pool);
    let response = get(app, &format!("{tasks_uri}/tree")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let roots = json["tasks"].as_array().unwrap();
    assert_eq!(roots.len(), 1);
    assert_eq!(roots[0]["name"], "Design");
    assert_eq!(roots[0]["children"][0]["name"], "Wireframes");
    assert_eq!(roots[0]["children"][0]["children"], json!([]));
}

#[sqlx::test]
async fn test_reparent_into_own_subtree_returns_400(pool: PgPool) {
    let app = common::app(&pool).await;
    let project_id = create_id(app, "/api/projects", json!({"name": "Alpha"})).await;
    let tasks_uri = format!("/api/projects/{project_id}/tasks");

    let app = common::build_test_app(pool.clone());
    let root = create_id(app, &tasks_uri, json!({"name": "Root"})).await;
    let app = common::build_test_app(pool.clone());
    let leaf = create_id(app, &tasks_uri, json!({"name": "Leaf", "parent_id": root})).await;

    let app = common::build_test_app(pool.clone());
    let response = put_json(app, &format!("/api/tasks/{root}"), json!({"parent_id": leaf})).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");

    let app = common::build_test_app(pool.clone());
    let response = put_json(app, &format!("/api/tasks/{root}"), json!({"parent_id": root})).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Detaching the leaf back to the root level is fine.
    let app = common::build_test_app(pool);
    let response = put_json(app, &format!("/api/tasks/{leaf}"), json!({"parent_id": null})).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_json(response).await["parent_id"].is_null());
}

#[sqlx::test]
async fn test_cross_project_references_return_400(pool: PgPool) {
    let app = common::app(&pool).await;
    let alpha = create_id(app, "/api/projects", json!({"name": "Alpha"})).await;
    let app = common::build_test_app(pool.clone());
    let beta = create_id(app, "/api/projects", json!({"name": "Beta"})).await;

    let app = common::build_test_app(pool.clone());
    let foreign_task =
        create_id(app, &format!("/api/projects/{beta}/tasks"), json!({"name": "B1"})).await;
    let app = common::build_test_app(pool.clone());
    let foreign_milestone = create_id(
        app,
        &format!("/api/projects/{beta}/milestones"),
        json!({"name": "M1"}),
    )
    .await;

    let app = common::build_test_app(pool.clone());
    let response = post_json(
        app,
        &format!("/api/projects/{alpha}/tasks"),
        json!({"name": "A1", "parent_id": foreign_task}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let app = common::build_test_app(pool);
    let response = post_json(
        app,
        &format!("/api/projects/{alpha}/tasks"),
        json!({"name": "A1", "milestone_id": foreign_milestone}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test]
async fn test_negative_estimate_returns_400(pool: PgPool) {
    let app = common::app(&pool).await;
    let project_id = create_id(app, "/api/projects", json!({"name": "Alpha"})).await;

    let app = common::build_test_app(pool);
    let response = post_json(
        app,
        &format!("/api/projects/{project_id}/tasks"),
        json!({"name": "T", "estimated_hours": -1.0}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test]
async fn test_hours_beyond_column_precision_return_400(pool: PgPool) {
    let app = common::app(&pool).await;
    let project_id = create_id(app, "/api/projects", json!({"name": "Alpha"})).await;
    let tasks_uri = format!("/api/projects/{project_id}/tasks");

    let app = common::build_test_app(pool.clone());
    let response = post_json(app, &tasks_uri, json!({"name": "T", "estimated_hours": 1e9})).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");

    let app = common::build_test_app(pool.clone());
    let task_id = create_id(app, &tasks_uri, json!({"name": "T", "actual_hours": 99999999.99})).await;

    let app = common::build_test_app(pool.clone());
    let response = put_json(app, &format!("/api/tasks/{task_id}"), json!({"actual_hours": 1e9})).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let worklogs_uri = format!("/api/tasks/{task_id}/worklogs");
    let app = common::build_test_app(pool.clone());
    let response = post_json(
        app,
        &worklogs_uri,
        json!({"user_name": "ana", "hours": 1e9, "work_date": "2024-02-01"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");

    let app = common::build_test_app(pool.clone());
    let worklog_id = create_id(
        app,
        &worklogs_uri,
        json!({"user_name": "ana", "hours": 1.0, "work_date": "2024-02-01"}),
    )
    .await;

    let app = common::build_test_app(pool);
    let response = put_json(app, &format!("/api/worklogs/{worklog_id}"), json!({"hours": 1e9})).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Worklogs
// ---------------------------------------------------------------------------

#[sqlx::test]
async fn test_worklog_crud_and_total(pool: PgPool) {
    let app = common::app(&pool).await;
    let project_id = create_id(app, "/api/projects", json!({"name": "Alpha"})).await;
    let app = common::build_test_app(pool.clone());
    let task_id = create_id(
        app,
        &format!("/api/projects/{project_id}/tasks"),
        json!({"name": "Build"}),
    )
    .await;
    let worklogs_uri = format!("/api/tasks/{task_id}/worklogs");

    let app = common::build_test_app(pool.clone());
    let json = body_json(get(app, &worklogs_uri).await).await;
    assert_eq!(json, json!({"worklogs": [], "total_hours": 0.0}));

    let app = common::build_test_app(pool.clone());
    let response = post_json(
        app,
        &worklogs_uri,
        json!({"user_name": "ana", "hours": 2.5, "work_date": "2024-02-01"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let worklog = body_json(response).await;
    assert_eq!(worklog["task_id"], task_id.as_str());
    assert_eq!(worklog["hours"], 2.5);
    let worklog_id = worklog["id"].as_str().unwrap().to_string();

    let app = common::build_test_app(pool.clone());
    create_id(
        app,
        &worklogs_uri,
        json!({"user_name": "ben", "hours": 1.25, "work_date": "2024-02-02", "description": "review"}),
    )
    .await;

    let app = common::build_test_app(pool.clone());
    let json = body_json(get(app, &worklogs_uri).await).await;
    assert_eq!(json["worklogs"].as_array().unwrap().len(), 2);
    assert_eq!(json["total_hours"], 3.75);

    let app = common::build_test_app(pool.clone());
    let response = put_json(app, &format!("/api/worklogs/{worklog_id}"), json!({"hours": 4.0})).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["hours"], 4.0);

    let app = common::build_test_app(pool.clone());
    let response = delete(app, &format!("/api/worklogs/{worklog_id}")).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let app = common::build_test_app(pool);
    let json = body_json(get(app, &worklogs_uri).await).await;
    assert_eq!(json["total_hours"], 1.25);
}

#[sqlx::test]
async fn test_non_positive_hours_return_400(pool: PgPool) {
    let app = common::app(&pool).await;
    let project_id = create_id(app, "/api/projects", json!({"name": "Alpha"})).await;
    let app = common::build_test_app(pool.clone());
    let task_id = create_id(
        app,
        &format!("/api/projects/{project_id}/tasks"),
        json!({"name": "Build"}),
    )
    .await;

    for hours in [0.0, -2.0] {
        let app = common::build_test_app(pool.clone());
        let response = post_json(
            app,
            &format!("/api/tasks/{task_id}/worklogs"),
            json!({"user_name": "ana", "hours": hours, "work_date": "2024-02-01"}),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "hours = {hours}");
    }
}

// ---------------------------------------------------------------------------
// Cascades
// ---------------------------------------------------------------------------

#[sqlx::test]
async fn test_deleting_project_removes_everything_below_it(pool: PgPool) {
    let app = common::app(&pool).await;
    let project_id = create_id(app, "/api/projects", json!({"name": "Alpha"})).await;
    let app = common::build_test_app(pool.clone());
    let milestone_id = create_id(
        app,
        &format!("/api/projects/{project_id}/milestones"),
        json!({"name": "M1"}),
    )
    .await;
    let app = common::build_test_app(pool.clone());
    let task_id = create_id(
        app,
        &format!("/api/projects/{project_id}/tasks"),
        json!({"name": "T1", "milestone_id": milestone_id}),
    )
    .await;
    let app = common::build_test_app(pool.clone());
    let worklog_id = create_id(
        app,
        &format!("/api/tasks/{task_id}/worklogs"),
        json!({"user_name": "ana", "hours": 1.0, "work_date": "2024-02-01"}),
    )
    .await;

    let app = common::build_test_app(pool.clone());
    let response = delete(app, &format!("/api/projects/{project_id}")).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    for uri in [
        format!("/api/milestones/{milestone_id}"),
        format!("/api/tasks/{task_id}"),
        format!("/api/worklogs/{worklog_id}"),
    ] {
        let app = common::build_test_app(pool.clone());
        assert_eq!(get(app, &uri).await.status(), StatusCode::NOT_FOUND, "{uri}");
    }
}

#[sqlx::test]
async fn test_deleting_milestone_detaches_its_tasks(pool: PgPool) {
    let app = common::app(&pool).await;
    let project_id = create_id(app, "/api/projects", json!({"name": "Alpha"})).await;
    let app = common::build_test_app(pool.clone());
    let milestone_id = create_id(
        app,
        &format!("/api/projects/{project_id}/milestones"),
        json!({"name": "M1"}),
    )
    .await;
    let app = common::build_test_app(pool.clone());
    let task_id = create_id(
        app,
        &format!("/api/projects/{project_id}/tasks"),
        json!({"name": "T1", "milestone_id": milestone_id}),
    )
    .await;

    let app = common::build_test_app(pool.clone());
    let response = delete(app, &format!("/api/milestones/{milestone_id}")).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let app = common::build_test_app(pool);
    let response = get(app, &format!("/api/tasks/{task_id}")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_json(response).await["milestone_id"].is_null());
}
