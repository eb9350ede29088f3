//! Finance HTTP handlers: per-party payment updates
//!
//! Payments always flow through the lot record, which mirrors the change
//! onto the market transaction and the party's bill.

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use crate::error::AppResult;
use crate::middleware::{require_role, CurrentUser};
use crate::services::record::{PaymentUpdateInput, RecordService};
use crate::services::TransactionService;
use crate::AppState;
use shared::{LotRecord, UserRole};

const PAYMENT_ROLES: &[UserRole] = &[UserRole::Committee, UserRole::Admin, UserRole::Accountant];

/// Mark one party leg of a record paid
pub async fn update_record_payment(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(record_id): Path<Uuid>,
    Json(input): Json<PaymentUpdateInput>,
) -> AppResult<Json<LotRecord>> {
    require_role(&current_user.0, PAYMENT_ROLES)?;

    let service = RecordService::new(state.db.clone(), &state.config);
    let record = service
        .update_payment(&current_user.0, record_id, input)
        .await?;
    Ok(Json(record))
}

/// Mark one party leg paid through the ledger view; resolves the
/// originating record so both stay consistent
pub async fn update_transaction_payment(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(transaction_id): Path<Uuid>,
    Json(input): Json<PaymentUpdateInput>,
) -> AppResult<Json<LotRecord>> {
    require_role(&current_user.0, PAYMENT_ROLES)?;

    let transactions = TransactionService::new(state.db.clone());
    let transaction = transactions.get_transaction(transaction_id).await?;

    let service = RecordService::new(state.db.clone(), &state.config);
    let record = service
        .update_payment(&current_user.0, transaction.record_id, input)
        .await?;
    Ok(Json(record))
}
