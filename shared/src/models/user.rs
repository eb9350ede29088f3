//! Profile and role models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::Language;

/// A market participant or staff member, identified primarily by phone number
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub id: Uuid,
    /// Role-prefixed sequence id for privileged roles (e.g. "TRD-2026-014");
    /// farmers carry no custom id
    pub custom_id: Option<String>,
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
    pub role: UserRole,
    pub village: Option<String>,
    pub preferred_language: Language,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Roles on the platform; the role determines which sale-lifecycle
/// transitions a principal may invoke
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Farmer,
    Trader,
    Committee,
    Admin,
    WeighingStaff,
    /// Auction staff ("lilav") who assign sale rates
    Auctioneer,
    Accountant,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Farmer => "farmer",
            UserRole::Trader => "trader",
            UserRole::Committee => "committee",
            UserRole::Admin => "admin",
            UserRole::WeighingStaff => "weighing_staff",
            UserRole::Auctioneer => "auctioneer",
            UserRole::Accountant => "accountant",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "farmer" => Some(UserRole::Farmer),
            "trader" => Some(UserRole::Trader),
            "committee" => Some(UserRole::Committee),
            "admin" => Some(UserRole::Admin),
            "weighing_staff" => Some(UserRole::WeighingStaff),
            "auctioneer" => Some(UserRole::Auctioneer),
            "accountant" => Some(UserRole::Accountant),
            _ => None,
        }
    }

    /// Custom-id prefix for privileged roles; roles without one are
    /// identified by phone number alone
    pub fn code_prefix(&self) -> Option<&'static str> {
        match self {
            UserRole::Trader => Some("TRD"),
            UserRole::Admin => Some("ADM"),
            UserRole::Committee => Some("MCDB"),
            UserRole::Auctioneer => Some("LLV"),
            _ => None,
        }
    }

    /// Whether this role authenticates with a password (staff) rather than
    /// phone OTP alone
    pub fn is_staff(&self) -> bool {
        !matches!(self, UserRole::Farmer | UserRole::Trader)
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
