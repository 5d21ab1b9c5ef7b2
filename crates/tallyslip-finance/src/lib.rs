pub mod summary;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tallyslip_core::{DerivedTotals, ReceiptInput, ReceiptRecord, ReceiptStatus, ServiceLine};
use uuid::Uuid;

pub use summary::{ReceiptSummary, summarize};

pub fn line_total(service: &ServiceLine) -> Decimal {
    service.unit.saturating_mul(service.price)
}

pub fn subtotal(services: &[ServiceLine]) -> Decimal {
    services
        .iter()
        .map(line_total)
        .fold(Decimal::ZERO, Decimal::saturating_add)
}

fn percent_of(base: Decimal, rate: Decimal) -> Decimal {
    base.saturating_mul(rate) / Decimal::ONE_HUNDRED
}

/// Derives every monetary field of a receipt.
///
/// Rates are parts per hundred. Tax, VAT and discount are all taken from the
/// subtotal; the discount is not applied to the gross total. Nothing is rounded
/// and no input is rejected: a deposit above the payable amount yields a
/// negative due amount.
///
/// Arithmetic saturates at `Decimal::MAX`/`Decimal::MIN`. Input that passes
/// `ReceiptInput::check_bounds` never gets close to either limit.
pub fn compute(input: &ReceiptInput) -> DerivedTotals {
    let subtotal = subtotal(&input.services);
    let tax_amount = percent_of(subtotal, input.tax);
    let vat_amount = percent_of(subtotal, input.vat);
    let gross_total = subtotal.saturating_add(tax_amount).saturating_add(vat_amount);
    let discount_amount = percent_of(subtotal, input.discount);
    let payable_amount = gross_total.saturating_sub(discount_amount);
    let due_amount = payable_amount.saturating_sub(input.deposit_amount);

    DerivedTotals {
        subtotal,
        tax_amount,
        vat_amount,
        gross_total,
        discount_amount,
        payable_amount,
        due_amount,
    }
}

/// Snapshots `input` into a new pending record.
pub fn issue_receipt(input: ReceiptInput, issued_on: NaiveDate) -> ReceiptRecord {
    let totals = compute(&input);

    ReceiptRecord {
        id: Uuid::new_v4().to_string(),
        date: issued_on,
        input,
        totals,
        status: ReceiptStatus::Pending,
    }
}

pub fn refresh_totals(record: &mut ReceiptRecord) {
    record.totals = compute(&record.input);
}
