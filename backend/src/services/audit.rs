//! Audit trail service
//!
//! Records one row per successful transition. Audit writes are a side
//! effect of an already-committed transition: failures are logged and
//! swallowed, never surfaced to the caller.

use shared::AuditEvent;
use sqlx::PgPool;
use uuid::Uuid;

/// Writes typed audit events for lifecycle transitions
#[derive(Clone)]
pub struct AuditService {
    db: PgPool,
}

impl AuditService {
    /// Create a new AuditService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Record an audit event; never fails the caller
    pub async fn record(
        &self,
        actor_id: Uuid,
        entity_type: &str,
        entity_id: Uuid,
        event: &AuditEvent,
    ) {
        let changes = match serde_json::to_value(event) {
            Ok(value) => value,
            Err(e) => {
                tracing::error!("Failed to serialize audit event: {}", e);
                return;
            }
        };

        let result = sqlx::query(
            r#"
            INSERT INTO audit_log (actor_id, entity_type, entity_id, action, changes)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(actor_id)
        .bind(entity_type)
        .bind(entity_id)
        .bind(event.action())
        .bind(&changes)
        .execute(&self.db)
        .await;

        if let Err(e) = result {
            tracing::warn!(
                "Audit write failed for {} {} ({}): {}",
                entity_type,
                entity_id,
                event.action(),
                e
            );
        }
    }
}
