//! HTTP-level tests for departments, employees and presence status.

mod common;

use axum::http::StatusCode;
use common::{
    body_json, build_test_app, delete_auth, get_auth, post_json_auth, put_json_auth,
};
use serde_json::json;

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

#[tokio::test]
async fn set_status_then_read_it_back_in_the_tree() {
    let app = build_test_app();
    let token = app.user_token().await;
    let dept = app.department("Engineering").await;
    let emp = app.employee(dept, "Yuki").await;

    let uri = format!("/api/employees/{}/status", emp.id);
    let response = get_auth(app.app(), &uri, &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = post_json_auth(
        app.app(),
        &uri,
        json!({ "status": "remote", "comment": "home", "location": "Osaka", "latitude": 34.69 }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let saved = body_json(response).await;
    assert_eq!(saved["status"], "remote");
    assert_eq!(saved["location"], "Osaka");
    assert_eq!(saved["latitude"], 34.69);

    let tree = body_json(get_auth(app.app(), "/api/departments", &token).await).await;
    assert_eq!(tree[0]["employees"][0]["id"], emp.id);
    assert_eq!(tree[0]["employees"][0]["status"]["comment"], "home");

    let all = body_json(get_auth(app.app(), "/api/employee-statuses", &token).await).await;
    assert_eq!(all.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn invalid_status_and_long_comment_are_400() {
    let app = build_test_app();
    let token = app.user_token().await;
    let dept = app.department("Engineering").await;
    let emp = app.employee(dept, "Ren").await;
    let uri = format!("/api/employees/{}/status", emp.id);

    for body in [
        json!({ "status": "sleeping" }),
        json!({ "status": "on-site", "comment": "x".repeat(21) }),
    ] {
        let response = post_json_auth(app.app(), &uri, body, &token).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
    }
}

#[tokio::test]
async fn status_for_unknown_employee_is_404() {
    let app = build_test_app();
    let token = app.user_token().await;

    let response = post_json_auth(
        app.app(),
        "/api/employees/4040/status",
        json!({ "status": "on-site" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["code"], "NOT_FOUND");
}

// ---------------------------------------------------------------------------
// Admin writes
// ---------------------------------------------------------------------------

#[tokio::test]
async fn admin_manages_departments_and_employees() {
    let app = build_test_app();
    let token = app.admin_token().await;

    let response = post_json_auth(
        app.app(),
        "/api/departments",
        json!({ "name": "Sales", "name_ja": "営業" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let dept = body_json(response).await;
    assert_eq!(dept["icon"], "building");

    let employee = json!({
        "first_name": "Hina",
        "last_name": "Sato",
        "first_name_ja": "ひな",
        "last_name_ja": "佐藤",
        "email": "hina@example.com",
        "position": "Manager",
        "position_ja": "マネージャー",
        "department_id": dept["id"],
    });
    let response = post_json_auth(app.app(), "/api/employees", employee.clone(), &token).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = body_json(response).await;
    let uri = format!("/api/employees/{}", created["id"]);

    let response = post_json_auth(app.app(), "/api/employees", employee, &token).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(response).await["code"], "CONFLICT");

    let response = put_json_auth(app.app(), &uri, json!({ "position": "Director" }), &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["position"], "Director");

    let detail = body_json(get_auth(app.app(), &uri, &token).await).await;
    assert_eq!(detail["department"]["name"], "Sales");
    assert!(detail["status"].is_null());

    let response = delete_auth(app.app(), &uri, &token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let tree = body_json(get_auth(app.app(), "/api/departments", &token).await).await;
    assert!(tree[0]["employees"].as_array().unwrap().is_empty());
    let list = body_json(get_auth(app.app(), "/api/employees", &token).await).await;
    assert_eq!(list[0]["is_active"], false);
}

#[tokio::test]
async fn employee_in_missing_department_is_rejected() {
    let app = build_test_app();
    let token = app.admin_token().await;

    let response = post_json_auth(
        app.app(),
        "/api/employees",
        json!({
            "first_name": "Kai",
            "last_name": "Ito",
            "first_name_ja": "かい",
            "last_name_ja": "伊藤",
            "email": "kai@example.com",
            "position": "Engineer",
            "position_ja": "エンジニア",
            "department_id": 999,
        }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
}
