//! On-disk layout of the receipt file.
//!
//! Amounts are written as JSON number literals carrying the exact decimal
//! digits, and read back from the literal text, so nothing passes through `f64`.
//! Quoted amounts are accepted on read as well.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tallyslip_core::{
    DerivedTotals, ReceiptInput, ReceiptRecord, ReceiptStatus, ServiceLine,
};
use tallyslip_finance::refresh_totals;

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct StoredService {
    id: String,
    name: String,
    #[serde(with = "exact_decimal")]
    unit: Decimal,
    #[serde(with = "exact_decimal")]
    price: Decimal,
}

/// Derived totals are written for readers of the file but never trusted on
/// read; they are recomputed from the inputs.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct StoredReceipt {
    id: String,
    date: NaiveDate,
    organization: String,
    division: String,
    contact: String,
    email: String,
    address: String,
    services: Vec<StoredService>,
    #[serde(with = "exact_decimal")]
    tax: Decimal,
    #[serde(with = "exact_decimal")]
    vat: Decimal,
    #[serde(with = "exact_decimal")]
    discount: Decimal,
    #[serde(with = "exact_decimal", default)]
    deposit_amount: Decimal,
    #[serde(serialize_with = "exact_decimal::serialize", skip_deserializing)]
    subtotal: Decimal,
    #[serde(serialize_with = "exact_decimal::serialize", skip_deserializing)]
    tax_amount: Decimal,
    #[serde(serialize_with = "exact_decimal::serialize", skip_deserializing)]
    vat_amount: Decimal,
    #[serde(serialize_with = "exact_decimal::serialize", skip_deserializing)]
    gross_total: Decimal,
    #[serde(serialize_with = "exact_decimal::serialize", skip_deserializing)]
    discount_amount: Decimal,
    #[serde(serialize_with = "exact_decimal::serialize", skip_deserializing)]
    payable_amount: Decimal,
    #[serde(serialize_with = "exact_decimal::serialize", skip_deserializing)]
    due_amount: Decimal,
    status: ReceiptStatus,
}

impl From<&ReceiptRecord> for StoredReceipt {
    fn from(record: &ReceiptRecord) -> Self {
        let input = &record.input;
        let totals = &record.totals;

        Self {
            id: record.id.clone(),
            date: record.date,
            organization: input.organization.clone(),
            division: input.division.clone(),
            contact: input.contact.clone(),
            email: input.email.clone(),
            address: input.address.clone(),
            services: input
                .services
                .iter()
                .map(|service| StoredService {
                    id: service.id.clone(),
                    name: service.name.clone(),
                    unit: service.unit,
                    price: service.price,
                })
                .collect(),
            tax: input.tax,
            vat: input.vat,
            discount: input.discount,
            deposit_amount: input.deposit_amount,
            subtotal: totals.subtotal,
            tax_amount: totals.tax_amount,
            vat_amount: totals.vat_amount,
            gross_total: totals.gross_total,
            discount_amount: totals.discount_amount,
            payable_amount: totals.payable_amount,
            due_amount: totals.due_amount,
            status: record.status,
        }
    }
}

impl StoredReceipt {
    pub(crate) fn into_record(self) -> ReceiptRecord {
        let mut record = ReceiptRecord {
            id: self.id,
            date: self.date,
            input: ReceiptInput {
                organization: self.organization,
                division: self.division,
                contact: self.contact,
                email: self.email,
                address: self.address,
                services: self
                    .services
                    .into_iter()
                    .map(|service| ServiceLine {
                        id: service.id,
                        name: service.name,
                        unit: service.unit,
                        price: service.price,
                    })
                    .collect(),
                tax: self.tax,
                vat: self.vat,
                discount: self.discount,
                deposit_amount: self.deposit_amount,
            },
            totals: DerivedTotals::default(),
            status: self.status,
        };
        refresh_totals(&mut record);
        record
    }
}

mod exact_decimal {
    use std::str::FromStr;

    use rust_decimal::Decimal;
    use serde::{Deserialize, Deserializer, Serialize, Serializer, de, ser};
    use serde_json::value::RawValue;

    pub fn serialize<S: Serializer>(value: &Decimal, serializer: S) -> Result<S::Ok, S::Error> {
        RawValue::from_string(value.to_string())
            .map_err(ser::Error::custom)?
            .serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Decimal, D::Error> {
        let raw = Box::<RawValue>::deserialize(deserializer)?;
        parse(raw.get()).map_err(de::Error::custom)
    }

    pub(super) fn parse(literal: &str) -> Result<Decimal, String> {
        let text = if literal.starts_with('"') {
            serde_json::from_str::<String>(literal).map_err(|err| err.to_string())?
        } else {
            literal.to_string()
        };
        let text = text.trim();

        Decimal::from_str_exact(text)
            .or_else(|_| Decimal::from_str(text))
            .or_else(|_| Decimal::from_scientific(text))
            .map_err(|err| format!("invalid amount '{text}': {err}"))
    }
}
