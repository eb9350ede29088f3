//! Lilav (auction) HTTP handlers: sale rate assignment

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use crate::error::AppResult;
use crate::middleware::{require_role, CurrentUser};
use crate::services::record::{AssignRateInput, RecordService};
use crate::AppState;
use shared::{LotRecord, UserRole};

/// Assign the lilav sale rate to a lot record.
/// If the lot was weighed before the auction, this also settles it.
pub async fn assign_rate(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(record_id): Path<Uuid>,
    Json(input): Json<AssignRateInput>,
) -> AppResult<Json<LotRecord>> {
    require_role(
        &current_user.0,
        &[UserRole::Auctioneer, UserRole::Committee, UserRole::Admin],
    )?;

    let service = RecordService::new(state.db.clone(), &state.config);
    let record = service
        .assign_rate(&current_user.0, record_id, input)
        .await?;
    Ok(Json(record))
}
