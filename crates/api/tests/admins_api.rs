//! Integration tests for admin account management.

mod common;

use axum::http::StatusCode;
use common::{body_json, delete_auth, get_auth, post_json, post_json_auth, put_json_auth, TEST_PASSWORD};
use ghost_core::permissions::Permissions;
use ghost_db::AdminStore;
use serde_json::json;

fn manager() -> Permissions {
    Permissions {
        manage_admins: true,
        ..Permissions::default()
    }
}

fn new_admin_body(email: &str) -> serde_json::Value {
    json!({
        "email": email,
        "first_name": "Grace",
        "last_name": "Hopper",
        "role": "CTO",
        "permissions": { "view_suggestions": true, "manage_suggestions": true },
        "password": "Str0ng!pass",
    })
}

// ---------------------------------------------------------------------------
// Permission gate
// ---------------------------------------------------------------------------

#[tokio::test]
async fn non_managers_cannot_mutate_but_can_read() {
    let (app, store) = common::build_test_app();
    let everything_else = Permissions {
        manage_admins: false,
        ..Permissions::all()
    };
    let (_admin, token) = common::admin_with_token(&store, "hr@example.com", everything_else).await;
    let target = common::seed_admin(&store, "target@example.com", "Target", Permissions::view_only()).await;
    let target_uri = format!("/api/v1/admin/admins/{}", target.id);

    let response = post_json_auth(app.clone(), "/api/v1/admin/admins", new_admin_body("x@example.com"), &token).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(body_json(response).await["code"], "PERMISSION_DENIED");

    let response = put_json_auth(app.clone(), &target_uri, json!({ "last_name": "Changed" }), &token).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = delete_auth(app.clone(), &target_uri, &token).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let unchanged = store.find_admin(target.id).await.unwrap().unwrap();
    assert_eq!(unchanged.last_name, "Tester");
    assert!(unchanged.is_active);
    assert_eq!(store.count_admins().await.unwrap(), 2);

    let response = get_auth(app.clone(), "/api/v1/admin/admins", &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let response = get_auth(app.clone(), "/api/v1/admin/admins/names", &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let response = get_auth(app, &target_uri, &token).await;
    assert_eq!(response.status(), StatusCode::OK);
}

// ---------------------------------------------------------------------------
// Create
// ---------------------------------------------------------------------------

#[tokio::test]
async fn create_stores_normalised_account_without_exposing_hash() {
    let (app, store) = common::build_test_app();
    let (_admin, token) = common::admin_with_token(&store, "root@example.com", manager()).await;

    let response = post_json_auth(
        app.clone(),
        "/api/v1/admin/admins",
        new_admin_body("  Grace.Hopper@Example.com "),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = body_json(response).await;
    let data = &json["data"];
    assert_eq!(data["email"], "grace.hopper@example.com");
    assert_eq!(data["name"], "Grace Hopper");
    assert_eq!(data["role"], "CTO");
    assert_eq!(data["is_active"], true);
    assert_eq!(data["permissions"]["manage_suggestions"], true);
    assert_eq!(data["permissions"]["delete_suggestions"], false);
    assert!(data.get("password_hash").is_none());

    // The new account can log in with the chosen password.
    let login = json!({ "email": "grace.hopper@example.com", "password": "Str0ng!pass" });
    let response = post_json(app, "/api/v1/auth/login", login).await;
    assert_eq!(response.status(), StatusCode::OK);

    let stored = store
        .find_admin_by_email("grace.hopper@example.com")
        .await
        .unwrap()
        .unwrap();
    assert!(stored.password_hash.starts_with("$argon2id$"));
}

#[tokio::test]
async fn create_defaults_role_and_permissions() {
    let (app, store) = common::build_test_app();
    let (_admin, token) = common::admin_with_token(&store, "root@example.com", manager()).await;
    let body = json!({
        "email": "new@example.com",
        "first_name": "New",
        "last_name": "Person",
        "password": "Str0ng!pass",
    });

    let json = body_json(post_json_auth(app, "/api/v1/admin/admins", body, &token).await).await;
    assert_eq!(json["data"]["role"], "HR");
    assert_eq!(json["data"]["permissions"]["view_analytics"], true);
    assert_eq!(json["data"]["permissions"]["view_suggestions"], true);
    assert_eq!(json["data"]["permissions"]["export_data"], false);
}

#[tokio::test]
async fn duplicate_email_is_a_conflict() {
    let (app, store) = common::build_test_app();
    let (_admin, token) = common::admin_with_token(&store, "root@example.com", manager()).await;

    let response = post_json_auth(app, "/api/v1/admin/admins", new_admin_body("ROOT@example.com"), &token).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(response).await["code"], "CONFLICT");
}

#[tokio::test]
async fn create_validates_input() {
    let (app, store) = common::build_test_app();
    let (_admin, token) = common::admin_with_token(&store, "root@example.com", manager()).await;

    let mut weak = new_admin_body("weak@example.com");
    weak["password"] = json!("password1");
    let mut bad_email = new_admin_body("not-an-email");
    bad_email["password"] = json!("Str0ng!pass");
    let mut long_name = new_admin_body("long@example.com");
    long_name["first_name"] = json!("x".repeat(51));
    let mut blank_name = new_admin_body("blank@example.com");
    blank_name["last_name"] = json!("   ");

    for body in [weak, bad_email, long_name, blank_name] {
        let response = post_json_auth(app.clone(), "/api/v1/admin/admins", body, &token).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
    }
    assert_eq!(store.count_admins().await.unwrap(), 1);
}

// ---------------------------------------------------------------------------
// Update
// ---------------------------------------------------------------------------

#[tokio::test]
async fn update_with_empty_password_keeps_the_old_one() {
    let (app, store) = common::build_test_app();
    let (_admin, token) = common::admin_with_token(&store, "root@example.com", manager()).await;
    let target = common::seed_admin(&store, "ada@example.com", "Ada", Permissions::view_only()).await;
    let uri = format!("/api/v1/admin/admins/{}", target.id);

    let body = json!({
        "last_name": "Lovelace",
        "role": "CFO",
        "permissions": { "view_analytics": true, "export_data": true },
        "password": "",
    });
    let response = put_json_auth(app.clone(), &uri, body, &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["name"], "Ada Lovelace");
    assert_eq!(json["data"]["role"], "CFO");
    assert_eq!(json["data"]["permissions"]["export_data"], true);
    assert_eq!(json["data"]["permissions"]["view_suggestions"], false);

    let login = json!({ "email": "ada@example.com", "password": TEST_PASSWORD });
    let response = post_json(app, "/api/v1/auth/login", login).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn update_rejects_weak_password_and_taken_email() {
    let (app, store) = common::build_test_app();
    let (_admin, token) = common::admin_with_token(&store, "root@example.com", manager()).await;
    let target = common::seed_admin(&store, "ada@example.com", "Ada", Permissions::view_only()).await;
    let uri = format!("/api/v1/admin/admins/{}", target.id);

    let response = put_json_auth(app.clone(), &uri, json!({ "password": "short" }), &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = put_json_auth(app.clone(), &uri, json!({ "email": "Root@Example.com" }), &token).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    // Re-submitting the account's own email is not a conflict.
    let response = put_json_auth(app, &uri, json!({ "email": "ADA@example.com" }), &token).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn update_missing_admin_is_404() {
    let (app, store) = common::build_test_app();
    let (_admin, token) = common::admin_with_token(&store, "root@example.com", manager()).await;

    let response = put_json_auth(app, "/api/v1/admin/admins/404", json!({ "first_name": "X" }), &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Deactivate
// ---------------------------------------------------------------------------

#[tokio::test]
async fn deactivation_blocks_login_and_hides_from_names() {
    let (app, store) = common::build_test_app();
    let (_admin, token) = common::admin_with_token(&store, "root@example.com", manager()).await;
    let target = common::seed_admin(&store, "ada@example.com", "Ada", Permissions::view_only()).await;

    let uri = format!("/api/v1/admin/admins/{}", target.id);
    let response = delete_auth(app.clone(), &uri, &token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    // Soft state: the record still exists.
    let json = body_json(get_auth(app.clone(), &uri, &token).await).await;
    assert_eq!(json["data"]["is_active"], false);

    let json = body_json(get_auth(app.clone(), "/api/v1/admin/admins/names", &token).await).await;
    let names = json["data"].as_array().unwrap();
    assert_eq!(names.len(), 1);
    assert_eq!(names[0]["email"], "root@example.com");
    assert_eq!(names[0].as_object().unwrap().len(), 4);

    let json = body_json(get_auth(app.clone(), "/api/v1/admin/admins", &token).await).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 2);

    let login = json!({ "email": "ada@example.com", "password": TEST_PASSWORD });
    let response = post_json(app, "/api/v1/auth/login", login).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn self_deactivation_is_rejected() {
    let (app, store) = common::build_test_app();
    let (admin, token) = common::admin_with_token(&store, "root@example.com", manager()).await;

    let uri = format!("/api/v1/admin/admins/{}", admin.id);
    let response = delete_auth(app, &uri, &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(store.find_admin(admin.id).await.unwrap().unwrap().is_active);
}

#[tokio::test]
async fn deactivating_unknown_admin_is_404() {
    let (app, store) = common::build_test_app();
    let (_admin, token) = common::admin_with_token(&store, "root@example.com", manager()).await;

    let response = delete_auth(app, "/api/v1/admin/admins/999", &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
