//! Reporting HTTP handlers

use axum::{
    extract::{Query, State},
    Json,
};

use crate::error::AppResult;
use crate::middleware::{require_role, CurrentUser};
use crate::services::report::{MarketSummary, ReportService, SummaryFilter};
use crate::AppState;
use shared::UserRole;

/// Market summary for the committee dashboard
pub async fn market_summary(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Query(filter): Query<SummaryFilter>,
) -> AppResult<Json<MarketSummary>> {
    require_role(&current_user.0, &[UserRole::Committee, UserRole::Admin])?;

    let service = ReportService::new(state.db.clone());
    let summary = service.market_summary(&filter).await?;
    Ok(Json(summary))
}
