use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tallyslip_core::{DerivedTotals, ReceiptInput, ReceiptRecord};
use tallyslip_document::DocumentKind;
use tallyslip_finance::{compute, line_total};

pub type CreateReceiptRequest = ReceiptInput;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PreviewLine {
    pub serial: usize,
    pub id: String,
    pub name: String,
    pub unit: Decimal,
    pub price: Decimal,
    pub line_total: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PreviewResponse {
    pub lines: Vec<PreviewLine>,
    pub totals: DerivedTotals,
}

impl PreviewResponse {
    pub fn from_input(input: &ReceiptInput) -> Self {
        let lines = input
            .services
            .iter()
            .enumerate()
            .map(|(index, service)| PreviewLine {
                serial: index + 1,
                id: service.id.clone(),
                name: service.name.clone(),
                unit: service.unit,
                price: service.price,
                line_total: line_total(service),
            })
            .collect();

        Self {
            lines,
            totals: compute(input),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListReceiptsQuery {
    pub status: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListReceiptsResponse {
    pub receipts: Vec<ReceiptRecord>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DocumentQuery {
    pub kind: Option<DocumentKind>,
}
