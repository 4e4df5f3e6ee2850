mod common;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
};
use common::{is_object_id, TestApp};
use serde_json::json;
use std::collections::HashSet;

const UNKNOWN_ID: &str = "65a1b2c3d4e5f60718293a4b";

#[tokio::test]
async fn create_get_delete_round_trip() {
    let app = TestApp::new();

    let (status, created) = app.post("/users", json!({ "name": "Alice", "age": 30 })).await;
    assert_eq!(status, StatusCode::CREATED);
    let id = created["id"].as_str().unwrap().to_string();
    assert!(is_object_id(&id), "unexpected id format: {}", id);
    assert_eq!(created, json!({ "id": id, "name": "Alice", "age": 30 }));

    let (status, fetched) = app.get(&format!("/users/{}", id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, created);

    let (status, body) = app.delete(&format!("/users/{}", id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["message"],
        format!("User with ID {} deleted successfully", id)
    );

    let (status, body) = app.get(&format!("/users/{}", id)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "User not found");
}

#[tokio::test]
async fn created_ids_are_unique() {
    let app = TestApp::new();
    let mut ids = HashSet::new();

    for i in 0..20 {
        let id = app.create_user(&format!("user-{}", i), 20 + i).await;
        assert!(ids.insert(id), "identifier was reused");
    }

    assert_eq!(app.store.len(), 20);
}

#[tokio::test]
async fn create_with_missing_fields_is_rejected_without_side_effects() {
    let app = TestApp::new();
    app.create_user("Existing", 40).await;

    for body in [
        json!({ "name": "Alice" }),
        json!({ "age": 30 }),
        json!({ "name": null, "age": 30 }),
        json!({ "name": "Alice", "age": null }),
        json!({ "name": "", "age": 30 }),
        json!({}),
    ] {
        let (status, response) = app.post("/users", body.clone()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "body {} was accepted", body);
        assert!(response["error"].is_string());
    }

    assert_eq!(app.store.len(), 1);
}

#[tokio::test]
async fn create_reports_descriptive_message() {
    let app = TestApp::new();

    let (status, body) = app.post("/users", json!({ "name": "Alice" })).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Name and age are required");
}

#[tokio::test]
async fn malformed_bodies_are_client_errors() {
    let app = TestApp::new();

    let (status, _) = app
        .send(
            Request::builder()
                .method(Method::POST)
                .uri("/users")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from("{not json"))
                .unwrap(),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .send(
            Request::builder()
                .method(Method::POST)
                .uri("/users")
                .body(Body::from(r#"{"name":"Alice","age":30}"#))
                .unwrap(),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "missing content type");

    let (status, _) = app.post("/users", json!({ "name": "Alice", "age": "thirty" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app.post("/users", json!("Alice")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    assert!(app.store.is_empty());
}

#[tokio::test]
async fn list_returns_all_users() {
    let app = TestApp::new();

    let (status, body) = app.get("/users").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "users": [] }));

    let alice = app.create_user("Alice", 30).await;
    let bob = app.create_user("Bob", 25).await;

    let (status, body) = app.get("/users").await;
    assert_eq!(status, StatusCode::OK);
    let users = body["users"].as_array().unwrap();
    assert_eq!(users.len(), 2);

    let ids: HashSet<&str> = users.iter().map(|u| u["id"].as_str().unwrap()).collect();
    assert!(ids.contains(alice.as_str()));
    assert!(ids.contains(bob.as_str()));
}

#[tokio::test]
async fn invalid_identifier_is_a_client_error_on_every_route() {
    let app = TestApp::new();

    for id in ["not-an-id", "123", "65a1b2c3d4e5f60718293a4z"] {
        let uri = format!("/users/{}", id);

        let (status, body) = app.get(&uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "GET {}", uri);
        assert_eq!(body["error"], "Invalid user ID");

        let (status, _) = app.put(&uri, json!({ "name": "Bob" })).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "PUT {}", uri);

        let (status, _) = app.delete(&uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "DELETE {}", uri);
    }
}

#[tokio::test]
async fn invalid_identifier_is_reported_before_body_errors() {
    let app = TestApp::new();

    let (status, body) = app.put("/users/bogus", json!({ "name": "" })).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid user ID");
}

#[tokio::test]
async fn unknown_identifier_is_not_found_on_every_route() {
    let app = TestApp::new();
    let uri = format!("/users/{}", UNKNOWN_ID);

    let (status, _) = app.get(&uri).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app.put(&uri, json!({ "name": "Bob" })).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app.delete(&uri).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn update_merges_only_submitted_fields() {
    let app = TestApp::new();
    let id = app.create_user("A", 41).await;
    let uri = format!("/users/{}", id);

    let (status, updated) = app.put(&uri, json!({ "name": "B" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated, json!({ "id": id, "name": "B", "age": 41 }));

    let (status, fetched) = app.get(&uri).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["name"], "B");
    assert_eq!(fetched["age"], 41);

    let (status, updated) = app.put(&uri, json!({ "age": 42 })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated, json!({ "id": id, "name": "B", "age": 42 }));
}

#[tokio::test]
async fn update_rejects_invalid_bodies() {
    let app = TestApp::new();
    let id = app.create_user("Alice", 30).await;
    let uri = format!("/users/{}", id);

    for body in [
        json!({}),
        json!({ "name": "" }),
        json!({ "age": 500 }),
        json!({ "_id": UNKNOWN_ID }),
        json!({ "name": "Bob", "email": "bob@example.com" }),
        json!({ "name": null }),
        json!({ "name": null, "age": 5 }),
        json!({ "age": null }),
    ] {
        let (status, _) = app.put(&uri, body.clone()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "body {} was accepted", body);
    }

    let (_, fetched) = app.get(&uri).await;
    assert_eq!(fetched, json!({ "id": id, "name": "Alice", "age": 30 }));
}

#[tokio::test]
async fn store_failures_are_server_errors() {
    let app = TestApp::new();
    let id = app.create_user("Alice", 30).await;
    let uri = format!("/users/{}", id);
    app.store.set_available(false);

    let (status, body) = app.get("/users").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Database error");

    let (status, _) = app.get(&uri).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

    let (status, _) = app.post("/users", json!({ "name": "Bob", "age": 20 })).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

    let (status, _) = app.put(&uri, json!({ "name": "Bob" })).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

    let (status, _) = app.delete(&uri).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn invalid_identifier_stays_a_client_error_when_store_is_down() {
    let app = TestApp::new();
    app.store.set_available(false);

    let (status, _) = app.get("/users/not-an-id").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}
