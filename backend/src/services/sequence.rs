//! Year-scoped sequence code allocation
//!
//! Codes are numbered from an atomic counter row per (kind, year), so two
//! concurrent creations can never observe the same sequence number. The
//! unique indexes on the code columns remain as a backstop.

use chrono::{Datelike, Utc};
use shared::{format_code, SequenceKind};
use sqlx::PgPool;

use crate::error::AppResult;

/// Allocates sequence codes for lots, transactions, bills, and profiles
#[derive(Clone)]
pub struct SequenceService {
    db: PgPool,
}

impl SequenceService {
    /// Create a new SequenceService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Allocate the next code for a kind in the current year.
    ///
    /// Increments are not transactional with the caller's insert: a failed
    /// insert burns a sequence number, which keeps codes unique but not
    /// necessarily gap-free.
    pub async fn next_code(&self, kind: SequenceKind) -> AppResult<String> {
        self.next_code_for_year(kind, Utc::now().year()).await
    }

    /// Allocate the next code for a kind in a specific year
    pub async fn next_code_for_year(&self, kind: SequenceKind, year: i32) -> AppResult<String> {
        let sequence: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO sequence_counters (kind, year, value)
            VALUES ($1, $2, 1)
            ON CONFLICT (kind, year) DO UPDATE SET value = sequence_counters.value + 1
            RETURNING value
            "#,
        )
        .bind(kind.counter_key())
        .bind(year)
        .fetch_one(&self.db)
        .await?;

        Ok(format_code(&kind, year, sequence))
    }
}
