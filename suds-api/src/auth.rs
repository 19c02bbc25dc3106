use axum::{
    extract::State,
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::{get, post},
    Extension, Json, Router,
};
use chrono::{Duration, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;
use uuid::Uuid;

use suds_booking::user::{User, UserType, VerificationStatus};

use crate::error::AppError;
use crate::middleware::auth::{admin_middleware, auth_middleware, Claims};
use crate::password::{hash_password, verify_password};
use crate::state::{AppState, AuthConfig};

/// Email domains whose students are verified automatically at signup.
const APPROVED_STUDENT_DOMAINS: &[&str] = &[
    "kristujayanti.com",
    "edu.in",
    "ac.in",
    "iiit.ac.in",
    "nit.ac.in",
    "iit.ac.in",
    "edu",
];

pub fn routes(state: AppState) -> Router<AppState> {
    let public = Router::new()
        .route("/api/auth/register", post(register))
        .route("/api/auth/login", post(login));

    let protected = Router::new()
        .route("/api/auth/me", get(me))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    let admin = Router::new()
        .route("/api/auth/pending-students", get(pending_students))
        .route("/api/auth/verify-student", post(verify_student))
        .layer(middleware::from_fn_with_state(state, admin_middleware));

    public.merge(protected).merge(admin)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RegisterRequest {
    name: Option<String>,
    email: Option<String>,
    password: Option<String>,
    phone: Option<String>,
    user_type: Option<String>,
    student_id: Option<String>,
}

async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<impl IntoResponse, AppError> {
    let name = req.name.unwrap_or_default().trim().to_string();
    let email = req.email.unwrap_or_default().trim().to_lowercase();
    let password = req.password.unwrap_or_default();
    if name.is_empty() || email.is_empty() || password.is_empty() {
        return Err(AppError::ValidationError(
            "Name, email and password are required".to_string(),
        ));
    }

    if state
        .users
        .find_by_email(&email)
        .await
        .map_err(AppError::internal)?
        .is_some()
    {
        return Err(AppError::ValidationError(
            "Email already registered".to_string(),
        ));
    }

    let user_type = UserType::parse(req.user_type.as_deref().unwrap_or("customer"));

    let mut auto_verified = false;
    if user_type == UserType::Student {
        if !is_approved_student_email(&email) {
            return Err(AppError::ValidationError(
                "Student registration requires a university email address".to_string(),
            ));
        }
        auto_verified = true;
    }

    let now = Utc::now();
    let user = User {
        id: Uuid::new_v4(),
        name,
        email,
        password_hash: hash_password(&password)?,
        phone: req.phone.unwrap_or_default(),
        user_type,
        student_id_number: req.student_id.unwrap_or_default(),
        student_verified: auto_verified,
        verification_status: match user_type {
            UserType::Student if auto_verified => VerificationStatus::Approved,
            UserType::Student => VerificationStatus::Pending,
            _ => VerificationStatus::NotRequired,
        },
        verified_by: None,
        verified_at: None,
        is_active: true,
        created_at: now,
        updated_at: now,
    };
    state.users.create(&user).await.map_err(AppError::internal)?;
    info!(user_id = %user.id, user_type = user.user_type.as_str(), "user registered");

    let token = issue_token(&state.auth, &user)?;
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": "Registration successful",
            "data": { "token": token, "user": user_json(&user) },
        })),
    ))
}

#[derive(Debug, Deserialize)]
struct LoginRequest {
    email: Option<String>,
    password: Option<String>,
}

async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<Value>, AppError> {
    let email = req.email.unwrap_or_default().trim().to_lowercase();
    let password = req.password.unwrap_or_default();
    if email.is_empty() || password.is_empty() {
        return Err(AppError::ValidationError(
            "Email and password are required".to_string(),
        ));
    }

    let user = state
        .users
        .find_by_email(&email)
        .await
        .map_err(AppError::internal)?
        .filter(|u| u.is_active)
        .ok_or_else(|| {
            AppError::AuthenticationError("Invalid email or password".to_string())
        })?;

    if !verify_password(&password, &user.password_hash) {
        return Err(AppError::AuthenticationError(
            "Invalid email or password".to_string(),
        ));
    }

    let token = issue_token(&state.auth, &user)?;
    Ok(Json(json!({
        "success": true,
        "message": "Login successful",
        "data": { "token": token, "user": user_json(&user) },
    })))
}

async fn me(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<Value>, AppError> {
    let user = state
        .users
        .find_by_id(claims.user_id()?)
        .await
        .map_err(AppError::internal)?
        .ok_or_else(|| AppError::NotFoundError("User not found".to_string()))?;

    Ok(Json(json!({
        "success": true,
        "data": { "user": user_json(&user) },
    })))
}

async fn pending_students(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    let students = state
        .users
        .pending_students()
        .await
        .map_err(AppError::internal)?;

    let rows: Vec<Value> = students
        .iter()
        .map(|u| {
            json!({
                "id": u.id,
                "name": u.name,
                "email": u.email,
                "phone": u.phone,
                "student_id_number": u.student_id_number,
                "verification_status": u.verification_status.as_str(),
                "created_at": u.created_at,
            })
        })
        .collect();

    Ok(Json(json!({
        "success": true,
        "data": { "students": rows },
    })))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VerifyStudentRequest {
    user_id: Option<String>,
    approved: Option<bool>,
}

async fn verify_student(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<VerifyStudentRequest>,
) -> Result<Json<Value>, AppError> {
    let user_id = req
        .user_id
        .as_deref()
        .ok_or_else(|| AppError::ValidationError("User ID is required".to_string()))?;
    let user_id = Uuid::parse_str(user_id)
        .map_err(|_| AppError::ValidationError("Invalid user ID".to_string()))?;
    let approved = req.approved.unwrap_or(false);

    let found = state
        .users
        .set_verification(user_id, approved, claims.user_id()?)
        .await
        .map_err(AppError::internal)?;
    if !found {
        return Err(AppError::NotFoundError("User not found".to_string()));
    }
    info!(%user_id, approved, "student verification updated");

    let message = if approved {
        "Student verified successfully"
    } else {
        "Student verification rejected"
    };
    Ok(Json(json!({ "success": true, "message": message })))
}

fn issue_token(auth: &AuthConfig, user: &User) -> Result<String, AppError> {
    let claims = Claims {
        sub: user.id.to_string(),
        email: user.email.clone(),
        user_type: user.user_type.as_str().to_string(),
        exp: (Utc::now() + Duration::seconds(auth.expiration as i64)).timestamp() as usize,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(auth.secret.as_bytes()),
    )
    .map_err(|e| AppError::InternalServerError(format!("Token encoding failed: {}", e)))
}

fn user_json(user: &User) -> Value {
    json!({
        "id": user.id,
        "name": user.name,
        "email": user.email,
        "phone": user.phone,
        "user_type": user.user_type.as_str(),
        "student_verified": user.student_verified,
        "verification_status": user.verification_status.as_str(),
        "created_at": user.created_at,
    })
}

fn is_approved_student_email(email: &str) -> bool {
    let Some(domain) = email.rsplit('@').next().filter(|_| email.contains('@')) else {
        return false;
    };
    let domain = domain.to_lowercase();
    APPROVED_STUDENT_DOMAINS
        .iter()
        .any(|approved| domain == *approved || domain.ends_with(&format!(".{}", approved)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_domain_is_approved() {
        assert!(is_approved_student_email("jane@kristujayanti.com"));
        assert!(is_approved_student_email("raj@iit.ac.in"));
    }

    #[test]
    fn subdomain_of_approved_domain_is_approved() {
        assert!(is_approved_student_email("jane@cs.kristujayanti.com"));
        assert!(is_approved_student_email("raj@ee.iitb.ac.in"));
    }

    #[test]
    fn unrelated_domain_is_rejected() {
        assert!(!is_approved_student_email("jane@gmail.com"));
        assert!(!is_approved_student_email("eduardo@notedu.com"));
        assert!(!is_approved_student_email("no-at-sign"));
    }
}
