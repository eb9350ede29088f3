//! Notification service for SMS and in-app delivery
//!
//! Notifications are fire-and-forget side effects of lifecycle
//! transitions: delivery failures are logged to the notification log and
//! to tracing, and never propagate to the transition's caller.

use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::config::Config;
use crate::error::{AppError, AppResult};

/// Delivery channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationChannel {
    Sms,
    InApp,
}

impl NotificationChannel {
    fn as_str(&self) -> &'static str {
        match self {
            NotificationChannel::Sms => "sms",
            NotificationChannel::InApp => "in_app",
        }
    }
}

/// SMS gateway client
#[derive(Clone)]
pub struct SmsClient {
    endpoint: String,
    api_key: String,
    sender_id: String,
    http_client: reqwest::Client,
}

#[derive(Serialize)]
struct SmsRequest<'a> {
    to: &'a str,
    message: &'a str,
    sender_id: &'a str,
}

impl SmsClient {
    pub fn new(endpoint: String, api_key: String, sender_id: String) -> Self {
        Self {
            endpoint,
            api_key,
            sender_id,
            http_client: reqwest::Client::new(),
        }
    }

    async fn send(&self, phone: &str, message: &str) -> AppResult<()> {
        let response = self
            .http_client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&SmsRequest {
                to: phone,
                message,
                sender_id: &self.sender_id,
            })
            .send()
            .await
            .map_err(|e| AppError::SmsGatewayError(e.to_string()))?;

        if !response.status().is_success() {
            return Err(AppError::SmsGatewayError(format!(
                "gateway returned {}",
                response.status()
            )));
        }
        Ok(())
    }
}

/// Sends transition notifications and records delivery attempts
#[derive(Clone)]
pub struct NotificationService {
    db: PgPool,
    sms_client: Option<SmsClient>,
}

impl NotificationService {
    /// Create a new NotificationService instance; SMS delivery is disabled
    /// when no gateway endpoint is configured
    pub fn new(db: PgPool, config: &Config) -> Self {
        let sms_client = if config.sms.api_endpoint.is_empty() {
            None
        } else {
            Some(SmsClient::new(
                config.sms.api_endpoint.clone(),
                config.sms.api_key.clone(),
                config.sms.sender_id.clone(),
            ))
        };
        Self { db, sms_client }
    }

    /// Notify the farmer that their lot settled and what they will be paid
    pub async fn notify_settlement(
        &self,
        farmer_id: Uuid,
        farmer_phone: &str,
        lot_code: &str,
        net_payable: Decimal,
    ) {
        let message = format!(
            "AgroNond: lot {} sold. Net payable to you: Rs {}.",
            lot_code, net_payable
        );
        self.deliver(Some(farmer_id), farmer_phone, &message).await;
    }

    /// Notify a party that their payment leg was marked paid
    pub async fn notify_payment(
        &self,
        party_id: Uuid,
        phone: &str,
        lot_code: &str,
        amount: Decimal,
    ) {
        let message = format!(
            "AgroNond: payment of Rs {} recorded for lot {}.",
            amount, lot_code
        );
        self.deliver(Some(party_id), phone, &message).await;
    }

    /// Deliver a login OTP
    pub async fn send_otp(&self, phone: &str, code: &str, ttl_seconds: i64) {
        let message = format!(
            "AgroNond login code: {}. Valid for {} minutes.",
            code,
            (ttl_seconds + 59) / 60
        );
        self.deliver(None, phone, &message).await;
    }

    /// Attempt delivery and log the outcome; never fails the caller
    async fn deliver(&self, recipient_id: Option<Uuid>, phone: &str, message: &str) {
        let (channel, status, error_message) = match &self.sms_client {
            Some(client) => match client.send(phone, message).await {
                Ok(()) => (NotificationChannel::Sms, "sent", None),
                Err(e) => {
                    tracing::warn!("SMS delivery to {} failed: {}", phone, e);
                    (NotificationChannel::Sms, "failed", Some(e.to_string()))
                }
            },
            // No gateway configured: record in-app only
            None => (NotificationChannel::InApp, "sent", None),
        };

        let result = sqlx::query(
            r#"
            INSERT INTO notification_log (recipient_id, phone, channel, message, status, error_message)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(recipient_id)
        .bind(phone)
        .bind(channel.as_str())
        .bind(message)
        .bind(status)
        .bind(error_message)
        .execute(&self.db)
        .await;

        if let Err(e) = result {
            tracing::warn!("Notification log write failed for {}: {}", phone, e);
        }
    }
}
