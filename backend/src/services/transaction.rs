//! Committee ledger service: read access and CSV export over market
//! transactions
//!
//! Transactions are created by the record service at settlement time and
//! their payment fields are mirrored by the payment flow; this service is
//! read-only.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use shared::{
    MarketTransaction, PaginatedResponse, Pagination, PaginationMeta, PaymentStatus, SaleUnit,
    Settlement,
};

const TRANSACTION_COLUMNS: &str = "id, transaction_code, record_id, lot_code, farmer_id, \
     trader_id, produce_name, quantity, sale_unit, sale_rate, base_amount, farmer_commission, \
     trader_commission, net_payable_farmer, net_receivable_trader, total_amount, \
     commission_total, farmer_rate, trader_rate, farmer_payment_status, farmer_payment_mode, \
     farmer_payment_reference, farmer_paid_at, trader_payment_status, trader_payment_mode, \
     trader_payment_reference, trader_paid_at, payment_status, created_at, updated_at";

/// Database row for a market transaction
#[derive(Debug, sqlx::FromRow)]
struct TransactionRow {
    id: Uuid,
    transaction_code: String,
    record_id: Uuid,
    lot_code: String,
    farmer_id: Uuid,
    trader_id: Uuid,
    produce_name: String,
    quantity: Decimal,
    sale_unit: String,
    sale_rate: Decimal,
    base_amount: Decimal,
    farmer_commission: Decimal,
    trader_commission: Decimal,
    net_payable_farmer: Decimal,
    net_receivable_trader: Decimal,
    total_amount: Decimal,
    commission_total: Decimal,
    farmer_rate: Decimal,
    trader_rate: Decimal,
    farmer_payment_status: String,
    farmer_payment_mode: Option<String>,
    farmer_payment_reference: Option<String>,
    farmer_paid_at: Option<DateTime<Utc>>,
    trader_payment_status: String,
    trader_payment_mode: Option<String>,
    trader_payment_reference: Option<String>,
    trader_paid_at: Option<DateTime<Utc>>,
    payment_status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<TransactionRow> for MarketTransaction {
    type Error = AppError;

    fn try_from(row: TransactionRow) -> AppResult<Self> {
        Ok(MarketTransaction {
            id: row.id,
            transaction_code: row.transaction_code,
            record_id: row.record_id,
            lot_code: row.lot_code,
            farmer_id: row.farmer_id,
            trader_id: row.trader_id,
            produce_name: row.produce_name,
            quantity: row.quantity,
            sale_unit: SaleUnit::from_str(&row.sale_unit).ok_or_else(|| {
                AppError::Internal(format!("invalid sale unit '{}'", row.sale_unit))
            })?,
            sale_rate: row.sale_rate,
            settlement: Settlement {
                base_amount: row.base_amount,
                farmer_commission: row.farmer_commission,
                trader_commission: row.trader_commission,
                net_payable_farmer: row.net_payable_farmer,
                net_receivable_trader: row.net_receivable_trader,
                total_amount: row.total_amount,
                commission_total: row.commission_total,
                farmer_rate: row.farmer_rate,
                trader_rate: row.trader_rate,
            },
            farmer_payment: super::record::payment_leg(
                &row.farmer_payment_status,
                row.farmer_payment_mode.as_deref(),
                row.farmer_payment_reference,
                row.farmer_paid_at,
            )?,
            trader_payment: super::record::payment_leg(
                &row.trader_payment_status,
                row.trader_payment_mode.as_deref(),
                row.trader_payment_reference,
                row.trader_paid_at,
            )?,
            payment_status: PaymentStatus::from_str(&row.payment_status).ok_or_else(|| {
                AppError::Internal(format!("invalid payment status '{}'", row.payment_status))
            })?,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Query filter for listing transactions
#[derive(Debug, Default, Deserialize)]
pub struct TransactionListFilter {
    pub payment_status: Option<PaymentStatus>,
    pub farmer_id: Option<Uuid>,
    pub trader_id: Option<Uuid>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

impl TransactionListFilter {
    pub fn pagination(&self) -> Pagination {
        let default = Pagination::default();
        Pagination {
            page: self.page.unwrap_or(default.page).max(1),
            per_page: self.per_page.unwrap_or(default.per_page).clamp(1, 100),
        }
    }
}

/// Ledger service over settled transactions
#[derive(Clone)]
pub struct TransactionService {
    db: PgPool,
}

impl TransactionService {
    /// Create a new TransactionService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Get a transaction by id
    pub async fn get_transaction(&self, transaction_id: Uuid) -> AppResult<MarketTransaction> {
        let row = sqlx::query_as::<_, TransactionRow>(&format!(
            "SELECT {TRANSACTION_COLUMNS} FROM market_transactions WHERE id = $1"
        ))
        .bind(transaction_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Transaction".to_string()))?;

        MarketTransaction::try_from(row)
    }

    /// List transactions with optional payment/party/date filters
    pub async fn list_transactions(
        &self,
        filter: &TransactionListFilter,
    ) -> AppResult<PaginatedResponse<MarketTransaction>> {
        let pagination = filter.pagination();
        let total: i64 = sqlx::query_scalar(&format!(
            "SELECT COUNT(*) FROM market_transactions WHERE {}",
            Self::WHERE_CLAUSE
        ))
        .bind(filter.payment_status.map(|s| s.as_str()))
        .bind(filter.farmer_id)
        .bind(filter.trader_id)
        .bind(filter.from)
        .bind(filter.to)
        .fetch_one(&self.db)
        .await?;

        let rows = self.fetch_filtered(filter, Some(&pagination)).await?;
        let data = rows
            .into_iter()
            .map(MarketTransaction::try_from)
            .collect::<AppResult<Vec<_>>>()?;

        Ok(PaginatedResponse {
            data,
            pagination: PaginationMeta::new(&pagination, total as u64),
        })
    }

    /// Export the filtered ledger as CSV
    pub async fn export_csv(&self, filter: &TransactionListFilter) -> AppResult<Vec<u8>> {
        let rows = self.fetch_filtered(filter, None).await?;

        let mut writer = csv::Writer::from_writer(Vec::new());
        writer
            .write_record([
                "transaction_code",
                "lot_code",
                "produce_name",
                "quantity",
                "sale_unit",
                "sale_rate",
                "base_amount",
                "farmer_commission",
                "trader_commission",
                "net_payable_farmer",
                "net_receivable_trader",
                "farmer_payment_status",
                "trader_payment_status",
                "payment_status",
                "created_at",
            ])
            .map_err(|e| AppError::Internal(format!("CSV write failed: {}", e)))?;

        for row in rows {
            writer
                .write_record([
                    row.transaction_code.as_str(),
                    row.lot_code.as_str(),
                    row.produce_name.as_str(),
                    &row.quantity.to_string(),
                    row.sale_unit.as_str(),
                    &row.sale_rate.to_string(),
                    &row.base_amount.to_string(),
                    &row.farmer_commission.to_string(),
                    &row.trader_commission.to_string(),
                    &row.net_payable_farmer.to_string(),
                    &row.net_receivable_trader.to_string(),
                    row.farmer_payment_status.as_str(),
                    row.trader_payment_status.as_str(),
                    row.payment_status.as_str(),
                    &row.created_at.to_rfc3339(),
                ])
                .map_err(|e| AppError::Internal(format!("CSV write failed: {}", e)))?;
        }

        writer
            .into_inner()
            .map_err(|e| AppError::Internal(format!("CSV write failed: {}", e)))
    }

    const WHERE_CLAUSE: &'static str = r#"
        ($1::text IS NULL OR payment_status = $1)
        AND ($2::uuid IS NULL OR farmer_id = $2)
        AND ($3::uuid IS NULL OR trader_id = $3)
        AND ($4::date IS NULL OR created_at >= $4)
        AND ($5::date IS NULL OR created_at < $5 + INTERVAL '1 day')
    "#;

    async fn fetch_filtered(
        &self,
        filter: &TransactionListFilter,
        pagination: Option<&Pagination>,
    ) -> AppResult<Vec<TransactionRow>> {
        let page_clause = match pagination {
            Some(_) => "LIMIT $6 OFFSET $7",
            None => "",
        };
        let sql = format!(
            "SELECT {TRANSACTION_COLUMNS} FROM market_transactions WHERE {} ORDER BY created_at DESC {}",
            Self::WHERE_CLAUSE,
            page_clause
        );

        let mut query = sqlx::query_as::<_, TransactionRow>(&sql)
            .bind(filter.payment_status.map(|s| s.as_str()))
            .bind(filter.farmer_id)
            .bind(filter.trader_id)
            .bind(filter.from)
            .bind(filter.to);
        if let Some(p) = pagination {
            query = query.bind(p.limit()).bind(p.offset());
        }

        Ok(query.fetch_all(&self.db).await?)
    }
}
