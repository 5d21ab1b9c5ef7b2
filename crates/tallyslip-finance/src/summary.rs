use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tallyslip_core::{ReceiptRecord, ReceiptStatus};

use crate::compute;

/// Dashboard figures over a receipt history.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptSummary {
    pub total_receipts: usize,
    pub pending: usize,
    pub paid: usize,
    pub cancelled: usize,
    pub total_payable: Decimal,
    pub total_discounts: Decimal,
    pub total_deposits: Decimal,
    pub total_due: Decimal,
}

/// Cancelled receipts are counted but contribute nothing to the money sums.
pub fn summarize(records: &[ReceiptRecord]) -> ReceiptSummary {
    let mut summary = ReceiptSummary {
        total_receipts: records.len(),
        ..ReceiptSummary::default()
    };

    for record in records {
        match record.status {
            ReceiptStatus::Pending => summary.pending += 1,
            ReceiptStatus::Paid => summary.paid += 1,
            ReceiptStatus::Cancelled => {
                summary.cancelled += 1;
                continue;
            }
        }

        let totals = compute(&record.input);
        summary.total_payable = summary.total_payable.saturating_add(totals.payable_amount);
        summary.total_discounts = summary
            .total_discounts
            .saturating_add(totals.discount_amount);
        summary.total_deposits = summary
            .total_deposits
            .saturating_add(record.input.deposit_amount);
        summary.total_due = summary.total_due.saturating_add(totals.due_amount);
    }

    summary
}
