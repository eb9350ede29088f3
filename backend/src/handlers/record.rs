//! Lot record HTTP handlers: intake, listing, and administrative deletion

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::error::AppResult;
use crate::middleware::{require_role, CurrentUser};
use crate::services::record::{CreateRecordInput, RecordListFilter, RecordService};
use crate::AppState;
use shared::{LotRecord, PaginatedResponse, UserRole};

/// Create a new lot record at farmer intake
pub async fn create_record(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<CreateRecordInput>,
) -> AppResult<(StatusCode, Json<LotRecord>)> {
    require_role(
        &current_user.0,
        &[UserRole::Farmer, UserRole::Committee, UserRole::Admin],
    )?;
    // A farmer may only register their own produce
    if current_user.0.role == UserRole::Farmer && input.farmer_id != current_user.0.user_id {
        return Err(crate::error::AppError::InsufficientPermissions);
    }

    let service = RecordService::new(state.db.clone(), &state.config);
    let record = service.create_record(&current_user.0, input).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

/// List lot records; farmers and traders see their own records only
pub async fn list_records(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Query(mut filter): Query<RecordListFilter>,
) -> AppResult<Json<PaginatedResponse<LotRecord>>> {
    match current_user.0.role {
        UserRole::Farmer => filter.farmer_id = Some(current_user.0.user_id),
        UserRole::Trader => filter.trader_id = Some(current_user.0.user_id),
        _ => {}
    }

    let service = RecordService::new(state.db.clone(), &state.config);
    let records = service.list_records(&filter).await?;
    Ok(Json(records))
}

/// Get a lot record by id
pub async fn get_record(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(record_id): Path<Uuid>,
) -> AppResult<Json<LotRecord>> {
    let service = RecordService::new(state.db.clone(), &state.config);
    let record = service.get_record(record_id).await?;
    Ok(Json(record))
}

/// Delete a lot record (explicit administrative action)
pub async fn delete_record(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(record_id): Path<Uuid>,
) -> AppResult<StatusCode> {
    require_role(&current_user.0, &[UserRole::Admin])?;

    let service = RecordService::new(state.db.clone(), &state.config);
    service.delete_record(&current_user.0, record_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
