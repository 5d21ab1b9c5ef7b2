use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::storage::StoreError;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum ReceiptStatus {
    Pending,
    Paid,
    Cancelled,
}

impl ReceiptStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReceiptStatus::Pending => "Pending",
            ReceiptStatus::Paid => "Paid",
            ReceiptStatus::Cancelled => "Cancelled",
        }
    }

    /// Only a pending receipt can move, and only to `Paid` or `Cancelled`.
    pub fn transition_to(self, next: ReceiptStatus) -> Result<ReceiptStatus, StoreError> {
        match (self, next) {
            (ReceiptStatus::Pending, ReceiptStatus::Paid)
            | (ReceiptStatus::Pending, ReceiptStatus::Cancelled) => Ok(next),
            (from, to) => Err(StoreError::InvalidTransition { from, to }),
        }
    }
}

impl std::fmt::Display for ReceiptStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ReceiptStatus {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(ReceiptStatus::Pending),
            "paid" => Ok(ReceiptStatus::Paid),
            "cancelled" | "canceled" => Ok(ReceiptStatus::Cancelled),
            other => Err(format!("unknown receipt status '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServiceLine {
    pub id: String,
    pub name: String,
    pub unit: Decimal,
    pub price: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptInput {
    pub organization: String,
    pub division: String,
    pub contact: String,
    pub email: String,
    pub address: String,
    pub services: Vec<ServiceLine>,
    pub tax: Decimal,
    pub vat: Decimal,
    pub discount: Decimal,
    #[serde(default)]
    pub deposit_amount: Decimal,
}

/// Monetary fields derived from a [`ReceiptInput`]; never edited directly.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct DerivedTotals {
    pub subtotal: Decimal,
    pub tax_amount: Decimal,
    pub vat_amount: Decimal,
    pub gross_total: Decimal,
    pub discount_amount: Decimal,
    pub payable_amount: Decimal,
    pub due_amount: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReceiptRecord {
    pub id: String,
    pub date: NaiveDate,
    #[serde(flatten)]
    pub input: ReceiptInput,
    #[serde(flatten)]
    pub totals: DerivedTotals,
    pub status: ReceiptStatus,
}
