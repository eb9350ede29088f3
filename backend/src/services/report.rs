//! Market summary reporting over lot records
//!
//! Read-only aggregates for the committee dashboard. Settled totals come
//! from the snapshot columns, so rate-configuration changes never move
//! historical numbers.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::error::AppResult;

/// Query filter for the market summary
#[derive(Debug, Default, Deserialize)]
pub struct SummaryFilter {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

/// Aggregate view of the market for a date range
#[derive(Debug, Serialize)]
pub struct MarketSummary {
    pub total_records: i64,
    pub pending: i64,
    pub rate_assigned: i64,
    pub weighed: i64,
    pub sold: i64,
    pub settled_base_amount: Decimal,
    pub settled_farmer_commission: Decimal,
    pub settled_trader_commission: Decimal,
    pub settled_net_payable_farmer: Decimal,
    pub settled_net_receivable_trader: Decimal,
    pub farmer_legs_paid: i64,
    pub trader_legs_paid: i64,
    pub records_closed: i64,
}

#[derive(Debug, sqlx::FromRow)]
struct SummaryRow {
    total_records: i64,
    pending: i64,
    rate_assigned: i64,
    weighed: i64,
    sold: i64,
    settled_base_amount: Decimal,
    settled_farmer_commission: Decimal,
    settled_trader_commission: Decimal,
    settled_net_payable_farmer: Decimal,
    settled_net_receivable_trader: Decimal,
    farmer_legs_paid: i64,
    trader_legs_paid: i64,
    records_closed: i64,
}

/// Reporting service
#[derive(Clone)]
pub struct ReportService {
    db: PgPool,
}

impl ReportService {
    /// Create a new ReportService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Market summary for an optional date range
    pub async fn market_summary(&self, filter: &SummaryFilter) -> AppResult<MarketSummary> {
        let row = sqlx::query_as::<_, SummaryRow>(
            r#"
            SELECT
                COUNT(*) AS total_records,
                COUNT(*) FILTER (WHERE status = 'pending') AS pending,
                COUNT(*) FILTER (WHERE status = 'rate_assigned') AS rate_assigned,
                COUNT(*) FILTER (WHERE status = 'weighed') AS weighed,
                COUNT(*) FILTER (WHERE status = 'sold') AS sold,
                COALESCE(SUM(base_amount) FILTER (WHERE status = 'sold'), 0) AS settled_base_amount,
                COALESCE(SUM(farmer_commission) FILTER (WHERE status = 'sold'), 0) AS settled_farmer_commission,
                COALESCE(SUM(trader_commission) FILTER (WHERE status = 'sold'), 0) AS settled_trader_commission,
                COALESCE(SUM(net_payable_farmer) FILTER (WHERE status = 'sold'), 0) AS settled_net_payable_farmer,
                COALESCE(SUM(net_receivable_trader) FILTER (WHERE status = 'sold'), 0) AS settled_net_receivable_trader,
                COUNT(*) FILTER (WHERE farmer_payment_status = 'paid') AS farmer_legs_paid,
                COUNT(*) FILTER (WHERE trader_payment_status = 'paid') AS trader_legs_paid,
                COUNT(*) FILTER (WHERE payment_status = 'paid') AS records_closed
            FROM lot_records
            WHERE ($1::date IS NULL OR created_at >= $1)
              AND ($2::date IS NULL OR created_at < $2 + INTERVAL '1 day')
            "#,
        )
        .bind(filter.from)
        .bind(filter.to)
        .fetch_one(&self.db)
        .await?;

        Ok(MarketSummary {
            total_records: row.total_records,
            pending: row.pending,
            rate_assigned: row.rate_assigned,
            weighed: row.weighed,
            sold: row.sold,
            settled_base_amount: row.settled_base_amount,
            settled_farmer_commission: row.settled_farmer_commission,
            settled_trader_commission: row.settled_trader_commission,
            settled_net_payable_farmer: row.settled_net_payable_farmer,
            settled_net_receivable_trader: row.settled_net_receivable_trader,
            farmer_legs_paid: row.farmer_legs_paid,
            trader_legs_paid: row.trader_legs_paid,
            records_closed: row.records_closed,
        })
    }
}
