//! Lot record service: intake, lilav rate assignment, weighing, settlement,
//! and payment tracking
//!
//! The lifecycle rules themselves live in `shared::models::record`; this
//! service loads a record, applies a pure transition, and persists the
//! result. Settlement additionally creates the market transaction and the
//! party bill pair inside one database transaction, then fires the audit
//! and notification side effects.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::middleware::AuthUser;
use crate::services::{AuditService, NotificationService, SequenceService};
use shared::{
    validate_produce_name, validate_quantity, AuditEvent, CommissionRates, LotRecord, LotStatus,
    NewBill, NewMarketTransaction, OfficialMeasurement, PaginatedResponse, Pagination,
    PaginationMeta, PaymentLeg, PaymentMode, PaymentStatus, SaleUnit, SequenceKind, Settlement,
    SettlementParty, TransitionOutcome, UserRole,
};

/// Columns of a full lot record row, in `RecordRow` field order
const RECORD_COLUMNS: &str = "id, lot_code, farmer_id, trader_id, weighed_by, sold_by, \
     produce_name, estimated_quantity_kg, official_quantity_kg, estimated_nag, official_nag, \
     official_carat, sale_unit, sale_rate, status, base_amount, farmer_commission, \
     trader_commission, net_payable_farmer, net_receivable_trader, total_amount, \
     commission_total, farmer_rate, trader_rate, farmer_payment_status, farmer_payment_mode, \
     farmer_payment_reference, farmer_paid_at, trader_payment_status, trader_payment_mode, \
     trader_payment_reference, trader_paid_at, payment_status, created_at, updated_at";

/// Database row for a lot record
#[derive(Debug, sqlx::FromRow)]
struct RecordRow {
    id: Uuid,
    lot_code: String,
    farmer_id: Uuid,
    trader_id: Option<Uuid>,
    weighed_by: Option<Uuid>,
    sold_by: Option<Uuid>,
    produce_name: String,
    estimated_quantity_kg: Decimal,
    official_quantity_kg: Option<Decimal>,
    estimated_nag: Option<i32>,
    official_nag: Option<i32>,
    official_carat: Option<Decimal>,
    sale_unit: Option<String>,
    sale_rate: Option<Decimal>,
    status: String,
    base_amount: Option<Decimal>,
    farmer_commission: Option<Decimal>,
    trader_commission: Option<Decimal>,
    net_payable_farmer: Option<Decimal>,
    net_receivable_trader: Option<Decimal>,
    total_amount: Option<Decimal>,
    commission_total: Option<Decimal>,
    farmer_rate: Option<Decimal>,
    trader_rate: Option<Decimal>,
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

impl TryFrom<RecordRow> for LotRecord {
    type Error = AppError;

    fn try_from(row: RecordRow) -> AppResult<Self> {
        let status = LotStatus::from_str(&row.status)
            .ok_or_else(|| AppError::Internal(format!("invalid lot status '{}'", row.status)))?;
        let sale_unit = row
            .sale_unit
            .as_deref()
            .map(|s| {
                SaleUnit::from_str(s)
                    .ok_or_else(|| AppError::Internal(format!("invalid sale unit '{}'", s)))
            })
            .transpose()?;

        let settlement = match (
            row.base_amount,
            row.farmer_commission,
            row.trader_commission,
            row.net_payable_farmer,
            row.net_receivable_trader,
            row.total_amount,
            row.commission_total,
            row.farmer_rate,
            row.trader_rate,
        ) {
            (
                Some(base_amount),
                Some(farmer_commission),
                Some(trader_commission),
                Some(net_payable_farmer),
                Some(net_receivable_trader),
                Some(total_amount),
                Some(commission_total),
                Some(farmer_rate),
                Some(trader_rate),
            ) => Some(Settlement {
                base_amount,
                farmer_commission,
                trader_commission,
                net_payable_farmer,
                net_receivable_trader,
                total_amount,
                commission_total,
                farmer_rate,
                trader_rate,
            }),
            _ => None,
        };

        Ok(LotRecord {
            id: row.id,
            lot_code: row.lot_code,
            farmer_id: row.farmer_id,
            trader_id: row.trader_id,
            weighed_by: row.weighed_by,
            sold_by: row.sold_by,
            produce_name: row.produce_name,
            estimated_quantity_kg: row.estimated_quantity_kg,
            official_quantity_kg: row.official_quantity_kg,
            estimated_nag: row.estimated_nag,
            official_nag: row.official_nag,
            official_carat: row.official_carat,
            sale_unit,
            sale_rate: row.sale_rate,
            status,
            settlement,
            farmer_payment: payment_leg(
                &row.farmer_payment_status,
                row.farmer_payment_mode.as_deref(),
                row.farmer_payment_reference,
                row.farmer_paid_at,
            )?,
            trader_payment: payment_leg(
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

pub(crate) fn payment_leg(
    status: &str,
    mode: Option<&str>,
    reference: Option<String>,
    paid_at: Option<DateTime<Utc>>,
) -> AppResult<PaymentLeg> {
    Ok(PaymentLeg {
        status: PaymentStatus::from_str(status)
            .ok_or_else(|| AppError::Internal(format!("invalid payment status '{}'", status)))?,
        mode: mode
            .map(|m| {
                PaymentMode::from_str(m)
                    .ok_or_else(|| AppError::Internal(format!("invalid payment mode '{}'", m)))
            })
            .transpose()?,
        reference,
        paid_at,
    })
}

/// Write a record's mutable fields back to its row
async fn persist_record<'e, E>(executor: E, record: &LotRecord) -> Result<(), sqlx::Error>
where
    E: sqlx::Executor<'e, Database = sqlx::Postgres>,
{
    let settlement = record.settlement.as_ref();
    sqlx::query(
        r#"
        UPDATE lot_records
        SET trader_id = $2, weighed_by = $3, sold_by = $4,
            official_quantity_kg = $5, official_nag = $6, official_carat = $7,
            sale_unit = $8, sale_rate = $9, status = $10,
            base_amount = $11, farmer_commission = $12, trader_commission = $13,
            net_payable_farmer = $14, net_receivable_trader = $15, total_amount = $16,
            commission_total = $17, farmer_rate = $18, trader_rate = $19,
            farmer_payment_status = $20, farmer_payment_mode = $21,
            farmer_payment_reference = $22, farmer_paid_at = $23,
            trader_payment_status = $24, trader_payment_mode = $25,
            trader_payment_reference = $26, trader_paid_at = $27,
            payment_status = $28, updated_at = $29
        WHERE id = $1
        "#,
    )
    .bind(record.id)
    .bind(record.trader_id)
    .bind(record.weighed_by)
    .bind(record.sold_by)
    .bind(record.official_quantity_kg)
    .bind(record.official_nag)
    .bind(record.official_carat)
    .bind(record.sale_unit.map(|u| u.as_str()))
    .bind(record.sale_rate)
    .bind(record.status.as_str())
    .bind(settlement.map(|s| s.base_amount))
    .bind(settlement.map(|s| s.farmer_commission))
    .bind(settlement.map(|s| s.trader_commission))
    .bind(settlement.map(|s| s.net_payable_farmer))
    .bind(settlement.map(|s| s.net_receivable_trader))
    .bind(settlement.map(|s| s.total_amount))
    .bind(settlement.map(|s| s.commission_total))
    .bind(settlement.map(|s| s.farmer_rate))
    .bind(settlement.map(|s| s.trader_rate))
    .bind(record.farmer_payment.status.as_str())
    .bind(record.farmer_payment.mode.map(|m| m.as_str()))
    .bind(record.farmer_payment.reference.as_deref())
    .bind(record.farmer_payment.paid_at)
    .bind(record.trader_payment.status.as_str())
    .bind(record.trader_payment.mode.map(|m| m.as_str()))
    .bind(record.trader_payment.reference.as_deref())
    .bind(record.trader_payment.paid_at)
    .bind(record.payment_status.as_str())
    .bind(record.updated_at)
    .execute(executor)
    .await?;
    Ok(())
}

/// Input for creating a record at farmer intake
#[derive(Debug, Deserialize)]
pub struct CreateRecordInput {
    pub farmer_id: Uuid,
    pub produce_name: String,
    pub estimated_quantity_kg: Option<Decimal>,
    pub estimated_nag: Option<i32>,
}

/// Input for assigning the lilav sale rate
#[derive(Debug, Deserialize)]
pub struct AssignRateInput {
    pub trader_id: Uuid,
    pub sale_unit: SaleUnit,
    pub sale_rate: Decimal,
}

/// Input for marking one party leg paid
#[derive(Debug, Deserialize)]
pub struct PaymentUpdateInput {
    pub party: SettlementParty,
    pub mode: PaymentMode,
    pub reference: Option<String>,
}

/// Query filter for listing records
#[derive(Debug, Default, Deserialize)]
pub struct RecordListFilter {
    pub status: Option<LotStatus>,
    pub farmer_id: Option<Uuid>,
    pub trader_id: Option<Uuid>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

impl RecordListFilter {
    pub fn pagination(&self) -> Pagination {
        let default = Pagination::default();
        Pagination {
            page: self.page.unwrap_or(default.page).max(1),
            per_page: self.per_page.unwrap_or(default.per_page).clamp(1, 100),
        }
    }
}

/// Lot record service for the sale lifecycle
#[derive(Clone)]
pub struct RecordService {
    db: PgPool,
    rates: CommissionRates,
    sequence: SequenceService,
    audit: AuditService,
    notifications: NotificationService,
}

impl RecordService {
    /// Create a new RecordService instance
    pub fn new(db: PgPool, config: &Config) -> Self {
        Self {
            rates: config.commission.rates(),
            sequence: SequenceService::new(db.clone()),
            audit: AuditService::new(db.clone()),
            notifications: NotificationService::new(db.clone(), config),
            db,
        }
    }

    /// Create a new lot record at farmer intake
    pub async fn create_record(
        &self,
        actor: &AuthUser,
        input: CreateRecordInput,
    ) -> AppResult<LotRecord> {
        if let Err(msg) = validate_produce_name(&input.produce_name) {
            return Err(AppError::Validation {
                field: "produce_name".to_string(),
                message: msg.to_string(),
                message_mr: "मालाचे नाव आवश्यक आहे".to_string(),
            });
        }
        if let Some(quantity) = input.estimated_quantity_kg {
            if validate_quantity(quantity).is_err() {
                return Err(AppError::Validation {
                    field: "estimated_quantity_kg".to_string(),
                    message: "Estimated quantity cannot be negative".to_string(),
                    message_mr: "अंदाजे वजन ऋण असू शकत नाही".to_string(),
                });
            }
        }

        self.ensure_role(input.farmer_id, UserRole::Farmer, "Farmer")
            .await?;

        let lot_code = self.sequence.next_code(SequenceKind::Lot).await?;

        let row = sqlx::query_as::<_, RecordRow>(&format!(
            r#"
            INSERT INTO lot_records (lot_code, farmer_id, produce_name, estimated_quantity_kg, estimated_nag)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {RECORD_COLUMNS}
            "#,
        ))
        .bind(&lot_code)
        .bind(input.farmer_id)
        .bind(input.produce_name.trim())
        .bind(input.estimated_quantity_kg.unwrap_or(Decimal::ZERO))
        .bind(input.estimated_nag)
        .fetch_one(&self.db)
        .await
        .map_err(|e| AppError::unique_violation(e, "lot_code"))?;

        let record = LotRecord::try_from(row)?;

        self.audit
            .record(
                actor.user_id,
                "lot_record",
                record.id,
                &AuditEvent::RecordCreated {
                    lot_code: record.lot_code.clone(),
                    farmer_id: record.farmer_id,
                    produce_name: record.produce_name.clone(),
                    estimated_quantity_kg: record.estimated_quantity_kg,
                },
            )
            .await;

        Ok(record)
    }

    /// Get a record by id
    pub async fn get_record(&self, record_id: Uuid) -> AppResult<LotRecord> {
        let row = sqlx::query_as::<_, RecordRow>(&format!(
            "SELECT {RECORD_COLUMNS} FROM lot_records WHERE id = $1"
        ))
        .bind(record_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Lot record".to_string()))?;

        LotRecord::try_from(row)
    }

    /// List records with optional status/party/date filters
    pub async fn list_records(
        &self,
        filter: &RecordListFilter,
    ) -> AppResult<PaginatedResponse<LotRecord>> {
        let pagination = filter.pagination();
        let status = filter.status.map(|s| s.as_str());

        let where_clause = r#"
            ($1::text IS NULL OR status = $1)
            AND ($2::uuid IS NULL OR farmer_id = $2)
            AND ($3::uuid IS NULL OR trader_id = $3)
            AND ($4::date IS NULL OR created_at >= $4)
            AND ($5::date IS NULL OR created_at < $5 + INTERVAL '1 day')
        "#;

        let total: i64 = sqlx::query_scalar(&format!(
            "SELECT COUNT(*) FROM lot_records WHERE {where_clause}"
        ))
        .bind(status)
        .bind(filter.farmer_id)
        .bind(filter.trader_id)
        .bind(filter.from)
        .bind(filter.to)
        .fetch_one(&self.db)
        .await?;

        let rows = sqlx::query_as::<_, RecordRow>(&format!(
            r#"
            SELECT {RECORD_COLUMNS} FROM lot_records
            WHERE {where_clause}
            ORDER BY created_at DESC
            LIMIT $6 OFFSET $7
            "#
        ))
        .bind(status)
        .bind(filter.farmer_id)
        .bind(filter.trader_id)
        .bind(filter.from)
        .bind(filter.to)
        .bind(pagination.limit())
        .bind(pagination.offset())
        .fetch_all(&self.db)
        .await?;

        let data = rows
            .into_iter()
            .map(LotRecord::try_from)
            .collect::<AppResult<Vec<_>>>()?;

        Ok(PaginatedResponse {
            data,
            pagination: PaginationMeta::new(&pagination, total as u64),
        })
    }

    /// Assign the lilav sale rate.
    ///
    /// From `Weighed` the settlement is computed immediately; from
    /// `Pending` it waits for the official weight.
    pub async fn assign_rate(
        &self,
        actor: &AuthUser,
        record_id: Uuid,
        input: AssignRateInput,
    ) -> AppResult<LotRecord> {
        self.ensure_role(input.trader_id, UserRole::Trader, "Trader")
            .await?;

        let mut record = self.get_record(record_id).await?;
        let outcome = record.assign_rate(
            input.trader_id,
            input.sale_unit,
            input.sale_rate,
            &self.rates,
            actor.user_id,
            Utc::now(),
        )?;

        match outcome {
            TransitionOutcome::Settled => self.persist_settled(&record).await?,
            _ => persist_record(&self.db, &record).await?,
        }

        self.audit
            .record(
                actor.user_id,
                "lot_record",
                record.id,
                &AuditEvent::RateAssigned {
                    lot_code: record.lot_code.clone(),
                    trader_id: input.trader_id,
                    sale_unit: input.sale_unit,
                    sale_rate: input.sale_rate,
                    settled: outcome == TransitionOutcome::Settled,
                },
            )
            .await;

        if outcome == TransitionOutcome::Settled {
            self.notify_settled(&record).await;
        }

        Ok(record)
    }

    /// Record the official weight; settles the record when the rate is
    /// already assigned. Idempotent once a settlement exists.
    pub async fn finalize_weight(
        &self,
        actor: &AuthUser,
        record_id: Uuid,
        measurement: OfficialMeasurement,
    ) -> AppResult<LotRecord> {
        let mut record = self.get_record(record_id).await?;
        let outcome =
            record.finalize_weight(measurement, actor.user_id, &self.rates, Utc::now())?;

        match outcome {
            // Settlement already computed: nothing to write
            TransitionOutcome::AlreadySettled => return Ok(record),
            TransitionOutcome::Settled => self.persist_settled(&record).await?,
            TransitionOutcome::Recorded => persist_record(&self.db, &record).await?,
        }

        self.audit
            .record(
                actor.user_id,
                "lot_record",
                record.id,
                &AuditEvent::WeightFinalized {
                    lot_code: record.lot_code.clone(),
                    official_quantity_kg: record.official_quantity_kg,
                    official_nag: record.official_nag,
                    official_carat: record.official_carat,
                    settled: outcome == TransitionOutcome::Settled,
                },
            )
            .await;

        if outcome == TransitionOutcome::Settled {
            self.notify_settled(&record).await;
        }

        Ok(record)
    }

    /// Mark one party leg paid and mirror the change onto the market
    /// transaction and the party's bill
    pub async fn update_payment(
        &self,
        actor: &AuthUser,
        record_id: Uuid,
        input: PaymentUpdateInput,
    ) -> AppResult<LotRecord> {
        if let Some(ref reference) = input.reference {
            if let Err(msg) = shared::validate_payment_reference(reference) {
                return Err(AppError::Validation {
                    field: "reference".to_string(),
                    message: msg.to_string(),
                    message_mr: "पेमेंट संदर्भ अवैध आहे".to_string(),
                });
            }
        }

        let mut record = self.get_record(record_id).await?;
        let closed = record.mark_paid(
            input.party,
            input.mode,
            input.reference.clone(),
            Utc::now(),
        )?;

        let leg = match input.party {
            SettlementParty::Farmer => &record.farmer_payment,
            SettlementParty::Trader => &record.trader_payment,
        };

        let mut tx = self.db.begin().await?;
        persist_record(&mut *tx, &record).await?;

        // Mirror onto the ledger twin; monetary fields stay as copied at
        // settlement time
        let mirror_sql = match input.party {
            SettlementParty::Farmer => {
                r#"
                UPDATE market_transactions
                SET farmer_payment_status = $2, farmer_payment_mode = $3,
                    farmer_payment_reference = $4, farmer_paid_at = $5,
                    payment_status = $6, updated_at = $7
                WHERE record_id = $1
                "#
            }
            SettlementParty::Trader => {
                r#"
                UPDATE market_transactions
                SET trader_payment_status = $2, trader_payment_mode = $3,
                    trader_payment_reference = $4, trader_paid_at = $5,
                    payment_status = $6, updated_at = $7
                WHERE record_id = $1
                "#
            }
        };
        sqlx::query(mirror_sql)
            .bind(record.id)
            .bind(leg.status.as_str())
            .bind(leg.mode.map(|m| m.as_str()))
            .bind(leg.reference.as_deref())
            .bind(leg.paid_at)
            .bind(record.payment_status.as_str())
            .bind(record.updated_at)
            .execute(&mut *tx)
            .await?;

        sqlx::query(
            r#"
            UPDATE bills
            SET payment_status = $3, payment_mode = $4, payment_reference = $5, paid_at = $6
            WHERE record_id = $1 AND party = $2
            "#,
        )
        .bind(record.id)
        .bind(input.party.as_str())
        .bind(leg.status.as_str())
        .bind(leg.mode.map(|m| m.as_str()))
        .bind(leg.reference.as_deref())
        .bind(leg.paid_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        self.audit
            .record(
                actor.user_id,
                "lot_record",
                record.id,
                &AuditEvent::PaymentMarked {
                    lot_code: record.lot_code.clone(),
                    party: input.party,
                    mode: input.mode,
                    reference: input.reference,
                    closed,
                },
            )
            .await;

        self.notify_paid(&record, input.party).await;

        Ok(record)
    }

    /// Delete a record (explicit administrative action); bills and the
    /// ledger twin cascade
    pub async fn delete_record(&self, actor: &AuthUser, record_id: Uuid) -> AppResult<()> {
        let record = self.get_record(record_id).await?;

        sqlx::query("DELETE FROM lot_records WHERE id = $1")
            .bind(record_id)
            .execute(&self.db)
            .await?;

        self.audit
            .record(
                actor.user_id,
                "lot_record",
                record.id,
                &AuditEvent::RecordDeleted {
                    lot_code: record.lot_code.clone(),
                },
            )
            .await;

        Ok(())
    }

    /// Persist a freshly settled record together with its market
    /// transaction and bill pair
    async fn persist_settled(&self, record: &LotRecord) -> AppResult<()> {
        let transaction_code = self.sequence.next_code(SequenceKind::Transaction).await?;
        let farmer_bill_code = self.sequence.next_code(SequenceKind::FarmerBill).await?;
        let trader_bill_code = self.sequence.next_code(SequenceKind::TraderBill).await?;

        let new_transaction = NewMarketTransaction::from_settled_record(record, transaction_code)
            .ok_or_else(|| AppError::Internal("settled record is missing settlement fields".to_string()))?;
        let farmer_bill = NewBill::for_party(record, SettlementParty::Farmer, farmer_bill_code)
            .ok_or_else(|| AppError::Internal("settled record is missing settlement fields".to_string()))?;
        let trader_bill = NewBill::for_party(record, SettlementParty::Trader, trader_bill_code)
            .ok_or_else(|| AppError::Internal("settled record is missing settlement fields".to_string()))?;

        let mut tx = self.db.begin().await?;

        persist_record(&mut *tx, record).await?;

        let settlement = &new_transaction.settlement;
        let transaction_id: Uuid = sqlx::query_scalar(
            r#"
            INSERT INTO market_transactions (
                transaction_code, record_id, lot_code, farmer_id, trader_id, produce_name,
                quantity, sale_unit, sale_rate,
                base_amount, farmer_commission, trader_commission, net_payable_farmer,
                net_receivable_trader, total_amount, commission_total, farmer_rate, trader_rate
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18)
            RETURNING id
            "#,
        )
        .bind(&new_transaction.transaction_code)
        .bind(new_transaction.record_id)
        .bind(&new_transaction.lot_code)
        .bind(new_transaction.farmer_id)
        .bind(new_transaction.trader_id)
        .bind(&new_transaction.produce_name)
        .bind(new_transaction.quantity)
        .bind(new_transaction.sale_unit.as_str())
        .bind(new_transaction.sale_rate)
        .bind(settlement.base_amount)
        .bind(settlement.farmer_commission)
        .bind(settlement.trader_commission)
        .bind(settlement.net_payable_farmer)
        .bind(settlement.net_receivable_trader)
        .bind(settlement.total_amount)
        .bind(settlement.commission_total)
        .bind(settlement.farmer_rate)
        .bind(settlement.trader_rate)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| AppError::unique_violation(e, "transaction_code"))?;

        for bill in [&farmer_bill, &trader_bill] {
            sqlx::query(
                r#"
                INSERT INTO bills (bill_code, transaction_id, record_id, party, party_id, amount)
                VALUES ($1, $2, $3, $4, $5, $6)
                "#,
            )
            .bind(&bill.bill_code)
            .bind(transaction_id)
            .bind(bill.record_id)
            .bind(bill.party.as_str())
            .bind(bill.party_id)
            .bind(bill.amount)
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::unique_violation(e, "bill_code"))?;
        }

        tx.commit().await?;
        Ok(())
    }

    async fn notify_settled(&self, record: &LotRecord) {
        let Some(settlement) = record.settlement.as_ref() else {
            return;
        };
        match self.profile_phone(record.farmer_id).await {
            Ok(phone) => {
                self.notifications
                    .notify_settlement(
                        record.farmer_id,
                        &phone,
                        &record.lot_code,
                        settlement.net_payable_farmer,
                    )
                    .await;
            }
            Err(e) => tracing::warn!("Skipping settlement notification: {}", e),
        }
    }

    async fn notify_paid(&self, record: &LotRecord, party: SettlementParty) {
        let Some(settlement) = record.settlement.as_ref() else {
            return;
        };
        let (party_id, amount) = match party {
            SettlementParty::Farmer => (Some(record.farmer_id), settlement.net_payable_farmer),
            SettlementParty::Trader => (record.trader_id, settlement.net_receivable_trader),
        };
        let Some(party_id) = party_id else { return };
        match self.profile_phone(party_id).await {
            Ok(phone) => {
                self.notifications
                    .notify_payment(party_id, &phone, &record.lot_code, amount)
                    .await;
            }
            Err(e) => tracing::warn!("Skipping payment notification: {}", e),
        }
    }

    async fn profile_phone(&self, profile_id: Uuid) -> AppResult<String> {
        sqlx::query_scalar::<_, String>("SELECT phone FROM profiles WHERE id = $1")
            .bind(profile_id)
            .fetch_optional(&self.db)
            .await?
            .ok_or_else(|| AppError::NotFound("Profile".to_string()))
    }

    /// Check a referenced profile exists and carries the expected role
    async fn ensure_role(
        &self,
        profile_id: Uuid,
        expected: UserRole,
        label: &str,
    ) -> AppResult<()> {
        let role = sqlx::query_scalar::<_, String>("SELECT role FROM profiles WHERE id = $1")
            .bind(profile_id)
            .fetch_optional(&self.db)
            .await?
            .ok_or_else(|| AppError::NotFound(label.to_string()))?;

        if UserRole::from_str(&role) != Some(expected) {
            return Err(AppError::Validation {
                field: format!("{}_id", expected.as_str()),
                message: format!("Profile is not registered as a {}", expected.as_str()),
                message_mr: format!("प्रोफाइल {} म्हणून नोंदणीकृत नाही", expected.as_str()),
            });
        }
        Ok(())
    }
}
