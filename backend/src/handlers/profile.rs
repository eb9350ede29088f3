//! Profile HTTP handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::AppResult;
use crate::middleware::{require_role, CurrentUser};
use crate::services::auth::{RegisterInput, RegisterResponse};
use crate::services::{AuthService, ProfileService};
use crate::AppState;
use shared::{Profile, UserRole};

/// Query filter for listing profiles
#[derive(Debug, Default, Deserialize)]
pub struct ProfileListQuery {
    pub role: Option<UserRole>,
}

/// Get the authenticated principal's own profile
pub async fn get_me(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> AppResult<Json<Profile>> {
    let service = ProfileService::new(state.db.clone());
    let profile = service.get_profile(current_user.0.user_id).await?;
    Ok(Json(profile))
}

/// Get a profile by id
pub async fn get_profile(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(profile_id): Path<Uuid>,
) -> AppResult<Json<Profile>> {
    if profile_id != current_user.0.user_id {
        require_role(&current_user.0, &[UserRole::Committee, UserRole::Admin])?;
    }

    let service = ProfileService::new(state.db.clone());
    let profile = service.get_profile(profile_id).await?;
    Ok(Json(profile))
}

/// List profiles, optionally restricted to one role
pub async fn list_profiles(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Query(query): Query<ProfileListQuery>,
) -> AppResult<Json<Vec<Profile>>> {
    require_role(&current_user.0, &[UserRole::Committee, UserRole::Admin])?;

    let service = ProfileService::new(state.db.clone());
    let profiles = service.list_profiles(query.role).await?;
    Ok(Json(profiles))
}

/// Create a profile with any role (committee/admin), including staff
pub async fn create_profile(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<RegisterInput>,
) -> AppResult<(StatusCode, Json<RegisterResponse>)> {
    require_role(&current_user.0, &[UserRole::Committee, UserRole::Admin])?;

    let service = AuthService::new(state.db.clone(), &state.config);
    let response = service.register(input).await?;
    Ok((StatusCode::CREATED, Json(response)))
}
