mod common;

use axum::http::StatusCode;
use chrono::Utc;
use serde_json::json;
use uuid::Uuid;

use common::{register_user, request, test_app, test_app_with_store};
use suds_booking::repository::UserRepository;
use suds_booking::user::{User, UserType, VerificationStatus};

#[tokio::test]
async fn register_then_login_round_trips() {
    let app = test_app();
    register_user(&app, "Asha", "asha@example.com", "customer").await;

    let (status, body) = request(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({ "email": "Asha@Example.com", "password": "password123" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["data"]["user"]["email"], json!("asha@example.com"));
    assert!(body["data"]["token"].as_str().is_some());
}

#[tokio::test]
async fn login_with_wrong_password_is_unauthorized() {
    let app = test_app();
    register_user(&app, "Asha", "asha@example.com", "customer").await;

    let (status, body) = request(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({ "email": "asha@example.com", "password": "wrong" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], json!(false));
}

#[tokio::test]
async fn duplicate_email_is_rejected() {
    let app = test_app();
    register_user(&app, "Asha", "asha@example.com", "customer").await;

    let (status, body) = request(
        &app,
        "POST",
        "/api/auth/register",
        None,
        Some(json!({
            "name": "Asha Again",
            "email": "asha@example.com",
            "password": "password123",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], json!("Email already registered"));
}

#[tokio::test]
async fn register_requires_name_email_and_password() {
    let app = test_app();
    let (status, _) = request(
        &app,
        "POST",
        "/api/auth/register",
        None,
        Some(json!({ "email": "asha@example.com" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn student_needs_a_university_email() {
    let app = test_app();
    let (status, _) = request(
        &app,
        "POST",
        "/api/auth/register",
        None,
        Some(json!({
            "name": "Ravi",
            "email": "ravi@gmail.com",
            "password": "password123",
            "userType": "student",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn student_on_approved_domain_is_auto_verified() {
    let app = test_app();
    let (status, body) = request(
        &app,
        "POST",
        "/api/auth/register",
        None,
        Some(json!({
            "name": "Ravi",
            "email": "ravi@kristujayanti.com",
            "password": "password123",
            "userType": "student",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["user"]["student_verified"], json!(true));
    assert_eq!(body["data"]["user"]["verification_status"], json!("approved"));
}

#[tokio::test]
async fn me_returns_the_current_user() {
    let app = test_app();
    let token = register_user(&app, "Asha", "asha@example.com", "customer").await;

    let (status, body) = request(&app, "GET", "/api/auth/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["user"]["name"], json!("Asha"));
    assert!(body["data"]["user"].get("password_hash").is_none());
}

#[tokio::test]
async fn protected_routes_require_a_token() {
    let app = test_app();
    let (status, _) = request(&app, "GET", "/api/auth/me", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = request(&app, "GET", "/api/auth/me", Some("garbage"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn admin_routes_reject_customers() {
    let app = test_app();
    let token = register_user(&app, "Asha", "asha@example.com", "customer").await;

    let (status, _) = request(
        &app,
        "GET",
        "/api/auth/pending-students",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

fn pending_student(email: &str) -> User {
    let now = Utc::now();
    User {
        id: Uuid::new_v4(),
        name: "Pending Student".to_string(),
        email: email.to_string(),
        password_hash: String::new(),
        phone: String::new(),
        user_type: UserType::Student,
        student_id_number: "SID-1001".to_string(),
        student_verified: false,
        verification_status: VerificationStatus::Pending,
        verified_by: None,
        verified_at: None,
        is_active: true,
        created_at: now,
        updated_at: now,
    }
}

#[tokio::test]
async fn admin_can_approve_a_pending_student() {
    let (app, store) = test_app_with_store();
    let admin_token = register_user(&app, "Admin", "admin@example.com", "admin").await;

    let student = pending_student("meena@iiit.ac.in");
    let student_id = student.id;
    UserRepository::create(store.as_ref(), &student).await.unwrap();

    let (status, body) = request(
        &app,
        "GET",
        "/api/auth/pending-students",
        Some(&admin_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["students"].as_array().unwrap().len(), 1);

    let (status, _) = request(
        &app,
        "POST",
        "/api/auth/verify-student",
        Some(&admin_token),
        Some(json!({ "userId": student_id, "approved": true })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let verified = UserRepository::find_by_id(store.as_ref(), student_id)
        .await
        .unwrap()
        .unwrap();
    assert!(verified.student_verified);
    assert_eq!(verified.verification_status, VerificationStatus::Approved);
}

#[tokio::test]
async fn verifying_a_missing_student_is_not_found() {
    let app = test_app();
    let admin_token = register_user(&app, "Admin", "admin@example.com", "admin").await;

    let (status, _) = request(
        &app,
        "POST",
        "/api/auth/verify-student",
        Some(&admin_token),
        Some(json!({ "userId": Uuid::new_v4(), "approved": true })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
