//! Authentication HTTP handlers

use axum::{extract::State, http::StatusCode, Json};
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::services::auth::{AuthTokens, RegisterInput, RegisterResponse};
use crate::services::AuthService;
use crate::AppState;

/// Input for staff password login
#[derive(Debug, Deserialize)]
pub struct LoginInput {
    pub phone: String,
    pub password: String,
}

/// Input for requesting a login OTP
#[derive(Debug, Deserialize)]
pub struct OtpRequestInput {
    pub phone: String,
}

/// Input for verifying a login OTP
#[derive(Debug, Deserialize)]
pub struct OtpVerifyInput {
    pub phone: String,
    pub code: String,
}

/// Input for rotating a refresh token
#[derive(Debug, Deserialize)]
pub struct RefreshInput {
    pub refresh_token: String,
}

/// Register a farmer or trader profile (public).
/// Staff profiles are created by the committee via the profiles endpoint.
pub async fn register(
    State(state): State<AppState>,
    Json(input): Json<RegisterInput>,
) -> AppResult<(StatusCode, Json<RegisterResponse>)> {
    if input.role.is_staff() {
        return Err(AppError::InsufficientPermissions);
    }

    let service = AuthService::new(state.db.clone(), &state.config);
    let response = service.register(input).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// Staff password login
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginInput>,
) -> AppResult<Json<AuthTokens>> {
    let service = AuthService::new(state.db.clone(), &state.config);
    let tokens = service.login(&input.phone, &input.password).await?;
    Ok(Json(tokens))
}

/// Request a login OTP for a registered phone number
pub async fn request_otp(
    State(state): State<AppState>,
    Json(input): Json<OtpRequestInput>,
) -> AppResult<Json<serde_json::Value>> {
    let service = AuthService::new(state.db.clone(), &state.config);
    let expires_in = service.request_otp(&state.otp, &input.phone).await?;
    Ok(Json(serde_json::json!({
        "message": "OTP sent",
        "expires_in": expires_in,
    })))
}

/// Verify a login OTP and receive tokens
pub async fn verify_otp(
    State(state): State<AppState>,
    Json(input): Json<OtpVerifyInput>,
) -> AppResult<Json<AuthTokens>> {
    let service = AuthService::new(state.db.clone(), &state.config);
    let tokens = service
        .verify_otp(&state.otp, &input.phone, &input.code)
        .await?;
    Ok(Json(tokens))
}

/// Rotate a refresh token into a fresh token pair
pub async fn refresh(
    State(state): State<AppState>,
    Json(input): Json<RefreshInput>,
) -> AppResult<Json<AuthTokens>> {
    let service = AuthService::new(state.db.clone(), &state.config);
    let tokens = service.refresh(&input.refresh_token).await?;
    Ok(Json(tokens))
}
