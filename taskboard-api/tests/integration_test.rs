/// Integration tests for the taskboard API
///
/// These tests verify the full system end-to-end over a real database:
/// - Registration and login round-trips
/// - The auth gate on every task endpoint
/// - Per-user task isolation
/// - Position-based ordering and drag-style partial updates
/// - The error taxonomy (validation, duplicates, not-found collapse)

mod common;

use axum::http::StatusCode;
use serde_json::json;
use taskboard_shared::auth::jwt::{create_token, Claims};
use uuid::Uuid;

use common::{json_request, TestContext};

#[tokio::test]
async fn test_health_probe() {
    let ctx = require_database!();

    let (status, body) = ctx.send(json_request("GET", "/", None, None)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "running");
    assert_eq!(body["database"], "connected");
}

#[tokio::test]
async fn test_register_then_login_returns_same_user() {
    let ctx = require_database!();

    let username = format!("alice-{}", Uuid::new_v4());

    let (status, registered) = ctx
        .send(json_request(
            "POST",
            "/register",
            None,
            Some(json!({ "username": username, "password": "secret123" })),
        ))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(registered["user"]["username"], username.as_str());
    assert!(registered["token"].is_string());
    // The hash must never appear in responses
    assert!(registered["user"].get("passwordHash").is_none());
    assert!(registered["user"].get("password_hash").is_none());

    let (status, logged_in) = ctx
        .send(json_request(
            "POST",
            "/login",
            None,
            Some(json!({ "username": username, "password": "secret123" })),
        ))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(logged_in["user"]["id"], registered["user"]["id"]);

    // The fresh token verifies to the same user: a gated request succeeds
    let token = logged_in["token"].as_str().unwrap();
    let (status, tasks) = ctx
        .send(json_request("GET", "/tasks", Some(token), None))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(tasks.as_array().unwrap().len(), 0);

    ctx.remove_user(registered["user"]["id"].as_str().unwrap())
        .await;
}

#[tokio::test]
async fn test_duplicate_username_rejected_without_partial_record() {
    let ctx = require_database!();

    let username = format!("dup-{}", Uuid::new_v4());
    let creds = json!({ "username": username, "password": "secret123" });

    let (status, first) = ctx
        .send(json_request("POST", "/register", None, Some(creds.clone())))
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, second) = ctx
        .send(json_request(
            "POST",
            "/register",
            None,
            Some(json!({ "username": username, "password": "different456" })),
        ))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(second["error"], "duplicate_username");

    // The original credentials still log in: no partial second record
    let (status, _) = ctx
        .send(json_request("POST", "/login", None, Some(creds)))
        .await;
    assert_eq!(status, StatusCode::OK);

    ctx.remove_user(first["user"]["id"].as_str().unwrap()).await;
}

#[tokio::test]
async fn test_bad_credentials_are_indistinguishable() {
    let ctx = require_database!();

    let (user, _) = ctx.register_user("creds").await;
    let username = user["username"].as_str().unwrap();

    let (wrong_pw_status, wrong_pw) = ctx
        .send(json_request(
            "POST",
            "/login",
            None,
            Some(json!({ "username": username, "password": "wrong-password" })),
        ))
        .await;

    let (no_user_status, no_user) = ctx
        .send(json_request(
            "POST",
            "/login",
            None,
            Some(json!({ "username": format!("ghost-{}", Uuid::new_v4()), "password": "secret123" })),
        ))
        .await;

    // Same status, same body shape: nothing reveals whether the account exists
    assert_eq!(wrong_pw_status, StatusCode::BAD_REQUEST);
    assert_eq!(no_user_status, StatusCode::BAD_REQUEST);
    assert_eq!(wrong_pw, no_user);

    ctx.remove_user(user["id"].as_str().unwrap()).await;
}

#[tokio::test]
async fn test_register_with_missing_fields_fails_validation() {
    let ctx = require_database!();

    let (status, body) = ctx
        .send(json_request("POST", "/register", None, Some(json!({}))))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation_error");
}

#[tokio::test]
async fn test_create_task_applies_defaults_and_owner() {
    let ctx = require_database!();
    let (user, token) = ctx.register_user("defaults").await;

    let (status, task) = ctx
        .send(json_request(
            "POST",
            "/tasks",
            Some(&token),
            Some(json!({ "title": "buy milk" })),
        ))
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(task["title"], "buy milk");
    assert_eq!(task["status"], "todo");
    assert_eq!(task["position"], 0);
    assert_eq!(task["description"], serde_json::Value::Null);
    assert_eq!(task["ownerId"], user["id"]);

    ctx.remove_user(user["id"].as_str().unwrap()).await;
}

#[tokio::test]
async fn test_create_task_without_title_fails() {
    let ctx = require_database!();
    let (user, token) = ctx.register_user("notitle").await;

    for body in [json!({}), json!({ "title": "" }), json!({ "title": "   " })] {
        let (status, response) = ctx
            .send(json_request("POST", "/tasks", Some(&token), Some(body)))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(response["error"], "validation_error");
    }

    ctx.remove_user(user["id"].as_str().unwrap()).await;
}

#[tokio::test]
async fn test_status_outside_enum_fails() {
    let ctx = require_database!();
    let (user, token) = ctx.register_user("badstatus").await;

    let (status, response) = ctx
        .send(json_request(
            "POST",
            "/tasks",
            Some(&token),
            Some(json!({ "title": "t", "status": "archived" })),
        ))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response["error"], "validation_error");

    // Same rule on update
    let (_, task) = ctx
        .send(json_request(
            "POST",
            "/tasks",
            Some(&token),
            Some(json!({ "title": "t" })),
        ))
        .await;
    let uri = format!("/tasks/{}", task["id"].as_str().unwrap());
    let (status, response) = ctx
        .send(json_request(
            "PATCH",
            &uri,
            Some(&token),
            Some(json!({ "status": "blocked" })),
        ))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response["error"], "validation_error");

    ctx.remove_user(user["id"].as_str().unwrap()).await;
}

#[tokio::test]
async fn test_list_is_sorted_by_position() {
    let ctx = require_database!();
    let (user, token) = ctx.register_user("ordering").await;

    // Created out of order on purpose
    for position in [3, 1, 2] {
        let (status, _) = ctx
            .send(json_request(
                "POST",
                "/tasks",
                Some(&token),
                Some(json!({ "title": format!("task {}", position), "position": position })),
            ))
            .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, tasks) = ctx
        .send(json_request("GET", "/tasks", Some(&token), None))
        .await;
    assert_eq!(status, StatusCode::OK);

    let positions: Vec<i64> = tasks
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["position"].as_i64().unwrap())
        .collect();
    assert_eq!(positions, vec![1, 2, 3]);

    ctx.remove_user(user["id"].as_str().unwrap()).await;
}

#[tokio::test]
async fn test_duplicate_positions_keep_creation_order() {
    let ctx = require_database!();
    let (user, token) = ctx.register_user("ties").await;

    for title in ["first", "second"] {
        ctx.send(json_request(
            "POST",
            "/tasks",
            Some(&token),
            Some(json!({ "title": title, "position": 7 })),
        ))
        .await;
    }

    let (_, tasks) = ctx
        .send(json_request("GET", "/tasks", Some(&token), None))
        .await;
    let titles: Vec<&str> = tasks
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["first", "second"]);

    ctx.remove_user(user["id"].as_str().unwrap()).await;
}

#[tokio::test]
async fn test_tasks_are_isolated_per_owner() {
    let ctx = require_database!();
    let (alice, alice_token) = ctx.register_user("alice").await;
    let (bob, bob_token) = ctx.register_user("bob").await;

    let (_, task) = ctx
        .send(json_request(
            "POST",
            "/tasks",
            Some(&alice_token),
            Some(json!({ "title": "alice's task" })),
        ))
        .await;
    let uri = format!("/tasks/{}", task["id"].as_str().unwrap());

    // Absent from Bob's list
    let (_, bob_tasks) = ctx
        .send(json_request("GET", "/tasks", Some(&bob_token), None))
        .await;
    assert_eq!(bob_tasks.as_array().unwrap().len(), 0);

    // Bob's update and delete both answer 404, exactly as if the task
    // didn't exist
    let (status, body) = ctx
        .send(json_request(
            "PATCH",
            &uri,
            Some(&bob_token),
            Some(json!({ "title": "hijacked" })),
        ))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "not_found");

    let (status, body) = ctx
        .send(json_request("DELETE", &uri, Some(&bob_token), None))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "not_found");

    // Alice's task is untouched
    let (_, alice_tasks) = ctx
        .send(json_request("GET", "/tasks", Some(&alice_token), None))
        .await;
    assert_eq!(alice_tasks.as_array().unwrap().len(), 1);
    assert_eq!(alice_tasks[0]["title"], "alice's task");

    ctx.remove_user(alice["id"].as_str().unwrap()).await;
    ctx.remove_user(bob["id"].as_str().unwrap()).await;
}

#[tokio::test]
async fn test_partial_update_leaves_other_fields() {
    let ctx = require_database!();
    let (user, token) = ctx.register_user("patch").await;

    let (_, task) = ctx
        .send(json_request(
            "POST",
            "/tasks",
            Some(&token),
            Some(json!({ "title": "write report", "description": "quarterly" })),
        ))
        .await;
    let uri = format!("/tasks/{}", task["id"].as_str().unwrap());

    // A drag to another column: status + position in one call
    let (status, moved) = ctx
        .send(json_request(
            "PATCH",
            &uri,
            Some(&token),
            Some(json!({ "status": "in-progress", "position": 4 })),
        ))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(moved["status"], "in-progress");
    assert_eq!(moved["position"], 4);
    assert_eq!(moved["title"], "write report");
    assert_eq!(moved["description"], "quarterly");

    // An empty patch is legal and changes nothing visible
    let (status, unchanged) = ctx
        .send(json_request("PATCH", &uri, Some(&token), Some(json!({}))))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(unchanged["status"], "in-progress");
    assert_eq!(unchanged["position"], 4);

    ctx.remove_user(user["id"].as_str().unwrap()).await;
}

#[tokio::test]
async fn test_delete_returns_prior_state_then_404() {
    let ctx = require_database!();
    let (user, token) = ctx.register_user("delete").await;

    let (_, task) = ctx
        .send(json_request(
            "POST",
            "/tasks",
            Some(&token),
            Some(json!({ "title": "ephemeral", "position": 9 })),
        ))
        .await;
    let uri = format!("/tasks/{}", task["id"].as_str().unwrap());

    let (status, deleted) = ctx
        .send(json_request("DELETE", &uri, Some(&token), None))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(deleted["id"], task["id"]);
    assert_eq!(deleted["title"], "ephemeral");
    assert_eq!(deleted["position"], 9);

    let (status, body) = ctx
        .send(json_request("DELETE", &uri, Some(&token), None))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "not_found");

    ctx.remove_user(user["id"].as_str().unwrap()).await;
}

#[tokio::test]
async fn test_auth_gate_rejects_before_any_side_effect() {
    let ctx = require_database!();

    // No header
    let (status, _) = ctx
        .send(json_request(
            "POST",
            "/tasks",
            None,
            Some(json!({ "title": "sneaky" })),
        ))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // Garbage token
    let (status, _) = ctx
        .send(json_request("GET", "/tasks", Some("not-a-token"), None))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // Well-formed token signed with the right secret, but for a user that
    // doesn't exist
    let ghost = create_token(&Claims::new(Uuid::new_v4()), common::TEST_JWT_SECRET).unwrap();
    let (status, body) = ctx
        .send(json_request("GET", "/tasks", Some(&ghost), None))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "unauthenticated");
}

#[tokio::test]
async fn test_end_to_end_board_scenario() {
    let ctx = require_database!();

    let username = format!("alice-{}", Uuid::new_v4());
    let (status, registered) = ctx
        .send(json_request(
            "POST",
            "/register",
            None,
            Some(json!({ "username": username, "password": "secret123" })),
        ))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let token = registered["token"].as_str().unwrap().to_string();

    let (status, task) = ctx
        .send(json_request(
            "POST",
            "/tasks",
            Some(&token),
            Some(json!({ "title": "buy milk" })),
        ))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(task["status"], "todo");
    assert_eq!(task["position"], 0);
    assert_eq!(task["ownerId"], registered["user"]["id"]);

    let uri = format!("/tasks/{}", task["id"].as_str().unwrap());
    let (status, done) = ctx
        .send(json_request(
            "PATCH",
            &uri,
            Some(&token),
            Some(json!({ "status": "done", "position": 0 })),
        ))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(done["status"], "done");

    let (status, tasks) = ctx
        .send(json_request("GET", "/tasks", Some(&token), None))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(tasks.as_array().unwrap().len(), 1);
    assert_eq!(tasks[0]["status"], "done");

    ctx.remove_user(registered["user"]["id"].as_str().unwrap())
        .await;
}
