//! Bill HTTP handlers

use axum::{
    extract::{Path, Query, State},
    Json,
};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::middleware::CurrentUser;
use crate::services::bill::{BillListFilter, BillService};
use crate::AppState;
use shared::{Bill, UserRole};

/// List bills; farmers and traders see their own bills only
pub async fn list_bills(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Query(mut filter): Query<BillListFilter>,
) -> AppResult<Json<Vec<Bill>>> {
    if matches!(current_user.0.role, UserRole::Farmer | UserRole::Trader) {
        filter.party_id = Some(current_user.0.user_id);
    }

    let service = BillService::new(state.db.clone());
    let bills = service.list_bills(&filter).await?;
    Ok(Json(bills))
}

/// Get a bill by id
pub async fn get_bill(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(bill_id): Path<Uuid>,
) -> AppResult<Json<Bill>> {
    let service = BillService::new(state.db.clone());
    let bill = service.get_bill(bill_id).await?;

    // Parties may only read their own bills
    if matches!(current_user.0.role, UserRole::Farmer | UserRole::Trader)
        && bill.party_id != current_user.0.user_id
    {
        return Err(AppError::InsufficientPermissions);
    }

    Ok(Json(bill))
}
