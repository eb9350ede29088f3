//! Bill service: read access over party bills
//!
//! Bills are created by the record service at settlement time and their
//! payment fields are mirrored by the payment flow.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use shared::{Bill, PaymentStatus, SettlementParty};

const BILL_COLUMNS: &str = "id, bill_code, transaction_id, record_id, party, party_id, amount, \
     payment_status, payment_mode, payment_reference, paid_at, created_at";

/// Database row for a bill
#[derive(Debug, sqlx::FromRow)]
struct BillRow {
    id: Uuid,
    bill_code: String,
    transaction_id: Uuid,
    record_id: Uuid,
    party: String,
    party_id: Uuid,
    amount: Decimal,
    payment_status: String,
    payment_mode: Option<String>,
    payment_reference: Option<String>,
    paid_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
}

impl TryFrom<BillRow> for Bill {
    type Error = AppError;

    fn try_from(row: BillRow) -> AppResult<Self> {
        let leg = super::record::payment_leg(
            &row.payment_status,
            row.payment_mode.as_deref(),
            row.payment_reference,
            row.paid_at,
        )?;
        Ok(Bill {
            id: row.id,
            bill_code: row.bill_code,
            transaction_id: row.transaction_id,
            record_id: row.record_id,
            party: SettlementParty::from_str(&row.party)
                .ok_or_else(|| AppError::Internal(format!("invalid bill party '{}'", row.party)))?,
            party_id: row.party_id,
            amount: row.amount,
            payment_status: leg.status,
            payment_mode: leg.mode,
            payment_reference: leg.reference,
            paid_at: leg.paid_at,
            created_at: row.created_at,
        })
    }
}

/// Query filter for listing bills
#[derive(Debug, Default, Deserialize)]
pub struct BillListFilter {
    pub party: Option<SettlementParty>,
    pub party_id: Option<Uuid>,
    pub record_id: Option<Uuid>,
    pub payment_status: Option<PaymentStatus>,
}

/// Bill service
#[derive(Clone)]
pub struct BillService {
    db: PgPool,
}

impl BillService {
    /// Create a new BillService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Get a bill by id
    pub async fn get_bill(&self, bill_id: Uuid) -> AppResult<Bill> {
        let row = sqlx::query_as::<_, BillRow>(&format!(
            "SELECT {BILL_COLUMNS} FROM bills WHERE id = $1"
        ))
        .bind(bill_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Bill".to_string()))?;

        Bill::try_from(row)
    }

    /// List bills with optional party/record/status filters
    pub async fn list_bills(&self, filter: &BillListFilter) -> AppResult<Vec<Bill>> {
        let rows = sqlx::query_as::<_, BillRow>(&format!(
            r#"
            SELECT {BILL_COLUMNS} FROM bills
            WHERE ($1::text IS NULL OR party = $1)
              AND ($2::uuid IS NULL OR party_id = $2)
              AND ($3::uuid IS NULL OR record_id = $3)
              AND ($4::text IS NULL OR payment_status = $4)
            ORDER BY created_at DESC
            "#
        ))
        .bind(filter.party.map(|p| p.as_str()))
        .bind(filter.party_id)
        .bind(filter.record_id)
        .bind(filter.payment_status.map(|s| s.as_str()))
        .fetch_all(&self.db)
        .await?;

        rows.into_iter().map(Bill::try_from).collect()
    }
}
