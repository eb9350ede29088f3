//! Weighing station HTTP handlers

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use crate::error::AppResult;
use crate::middleware::{require_role, CurrentUser};
use crate::services::RecordService;
use crate::AppState;
use shared::{LotRecord, OfficialMeasurement, UserRole};

/// Record the official weight for a lot.
/// If a rate is already assigned this settles the lot; re-submitting after
/// settlement leaves the stored financials untouched.
pub async fn finalize_weight(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(record_id): Path<Uuid>,
    Json(measurement): Json<OfficialMeasurement>,
) -> AppResult<Json<LotRecord>> {
    require_role(&current_user.0, &[UserRole::WeighingStaff])?;

    let service = RecordService::new(state.db.clone(), &state.config);
    let record = service
        .finalize_weight(&current_user.0, record_id, measurement)
        .await?;
    Ok(Json(record))
}
