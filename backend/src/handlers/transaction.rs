//! Committee ledger HTTP handlers

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use uuid::Uuid;

use crate::error::AppResult;
use crate::middleware::{require_role, CurrentUser};
use crate::services::transaction::{TransactionListFilter, TransactionService};
use crate::AppState;
use shared::{MarketTransaction, PaginatedResponse, UserRole};

const LEDGER_ROLES: &[UserRole] = &[UserRole::Committee, UserRole::Admin, UserRole::Accountant];

/// List settled transactions
pub async fn list_transactions(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Query(filter): Query<TransactionListFilter>,
) -> AppResult<Json<PaginatedResponse<MarketTransaction>>> {
    require_role(&current_user.0, LEDGER_ROLES)?;

    let service = TransactionService::new(state.db.clone());
    let transactions = service.list_transactions(&filter).await?;
    Ok(Json(transactions))
}

/// Get a transaction by id
pub async fn get_transaction(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(transaction_id): Path<Uuid>,
) -> AppResult<Json<MarketTransaction>> {
    require_role(&current_user.0, LEDGER_ROLES)?;

    let service = TransactionService::new(state.db.clone());
    let transaction = service.get_transaction(transaction_id).await?;
    Ok(Json(transaction))
}

/// Export the filtered ledger as CSV
pub async fn export_transactions(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Query(filter): Query<TransactionListFilter>,
) -> AppResult<impl IntoResponse> {
    require_role(&current_user.0, LEDGER_ROLES)?;

    let service = TransactionService::new(state.db.clone());
    let csv = service.export_csv(&filter).await?;

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"transactions.csv\"",
            ),
        ],
        csv,
    ))
}
