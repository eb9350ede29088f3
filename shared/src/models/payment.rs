//! Payment status and per-party payment legs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Payment state of a single party leg, and of the record overall
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Pending,
    Paid,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Paid => "paid",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(PaymentStatus::Pending),
            "paid" => Some(PaymentStatus::Paid),
            _ => None,
        }
    }
}

/// How a payment was made
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMode {
    Cash,
    Cheque,
    BankTransfer,
    Upi,
}

impl PaymentMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMode::Cash => "cash",
            PaymentMode::Cheque => "cheque",
            PaymentMode::BankTransfer => "bank_transfer",
            PaymentMode::Upi => "upi",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "cash" => Some(PaymentMode::Cash),
            "cheque" => Some(PaymentMode::Cheque),
            "bank_transfer" => Some(PaymentMode::BankTransfer),
            "upi" => Some(PaymentMode::Upi),
            _ => None,
        }
    }
}

/// The two settling parties of a sale
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SettlementParty {
    Farmer,
    Trader,
}

impl SettlementParty {
    pub fn as_str(&self) -> &'static str {
        match self {
            SettlementParty::Farmer => "farmer",
            SettlementParty::Trader => "trader",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "farmer" => Some(SettlementParty::Farmer),
            "trader" => Some(SettlementParty::Trader),
            _ => None,
        }
    }
}

impl std::fmt::Display for SettlementParty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One party's settlement leg: status plus mode/reference/date stamped when
/// the leg is marked paid
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentLeg {
    pub status: PaymentStatus,
    pub mode: Option<PaymentMode>,
    pub reference: Option<String>,
    pub paid_at: Option<DateTime<Utc>>,
}

impl PaymentLeg {
    pub fn pending() -> Self {
        Self {
            status: PaymentStatus::Pending,
            mode: None,
            reference: None,
            paid_at: None,
        }
    }

    pub fn is_paid(&self) -> bool {
        self.status == PaymentStatus::Paid
    }
}

impl Default for PaymentLeg {
    fn default() -> Self {
        Self::pending()
    }
}
