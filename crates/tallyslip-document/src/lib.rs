pub mod money;

use serde::Deserialize;
use tallyslip_core::{IssuerProfile, ReceiptRecord};
use tallyslip_finance::{compute, line_total};

pub use money::{format_money, format_quantity};

const WIDTH: usize = 72;

#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    #[default]
    Invoice,
    #[serde(alias = "receipt")]
    MoneyReceipt,
}

impl DocumentKind {
    pub fn title(&self) -> &'static str {
        match self {
            DocumentKind::Invoice => "INVOICE",
            DocumentKind::MoneyReceipt => "MONEY RECEIPT",
        }
    }

    fn number_label(&self) -> &'static str {
        match self {
            DocumentKind::Invoice => "Invoice No.",
            DocumentKind::MoneyReceipt => "Receipt No.",
        }
    }
}

/// Renders a printable plain-text document for one receipt.
///
/// Totals are recomputed from the record's inputs and rounded only for display.
pub fn render_document(
    record: &ReceiptRecord,
    issuer: &impl IssuerProfile,
    kind: DocumentKind,
) -> String {
    let symbol = issuer.currency_symbol();
    let input = &record.input;
    let totals = compute(input);
    let money = |amount| format_money(symbol, amount);
    let rule = "-".repeat(WIDTH);

    let mut lines = vec![centered(issuer.name())];
    lines.extend(
        [issuer.address(), issuer.contact_line()]
            .into_iter()
            .filter(|line| !line.trim().is_empty())
            .map(centered),
    );
    lines.push(rule.clone());
    lines.push(centered(&format!("[ {} ]", kind.title())));
    lines.push(String::new());

    lines.push("Bill To:".to_string());
    for line in [&input.organization, &input.contact, &input.address, &input.email] {
        lines.push(format!("  {line}"));
    }
    lines.push(String::new());
    lines.push(labelled(kind.number_label(), &record.id));
    lines.push(labelled("Date", &record.date));
    lines.push(labelled("Reference", &input.division));
    lines.push(labelled("Status", &record.status));
    lines.push(String::new());

    lines.push(table_row("#", "Service", "Unit", "Unit Price", "Amount"));
    lines.push(rule.clone());
    for (index, service) in input.services.iter().enumerate() {
        lines.push(table_row(
            &(index + 1).to_string(),
            &clip(&service.name, 28),
            &format_quantity(service.unit),
            &money(service.price),
            &money(line_total(service)),
        ));
    }
    lines.push(rule);

    let rows = [
        ("Subtotal".to_string(), totals.subtotal),
        (format!("Tax ({}%)", input.tax.normalize()), totals.tax_amount),
        (format!("VAT ({}%)", input.vat.normalize()), totals.vat_amount),
        ("Gross Total".to_string(), totals.gross_total),
        (
            format!("Discount ({}%)", input.discount.normalize()),
            totals.discount_amount,
        ),
        ("Payable Amount".to_string(), totals.payable_amount),
        ("Deposit Amount".to_string(), input.deposit_amount),
        ("Due Amount".to_string(), totals.due_amount),
    ];
    for (label, amount) in rows {
        lines.push(format!("{:>52} {:>19}", format!("{label}:"), money(amount)));
    }

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

fn centered(text: &str) -> String {
    format!("{text:^width$}", width = WIDTH)
}

fn labelled(label: &str, value: &impl std::fmt::Display) -> String {
    format!("{:<14}{value}", format!("{label}:"))
}

fn table_row(serial: &str, service: &str, unit: &str, price: &str, amount: &str) -> String {
    format!("{serial:>3}  {service:<28} {unit:>8} {price:>14} {amount:>14}")
}

fn clip(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let mut clipped: String = text.chars().take(max - 1).collect();
    clipped.push('~');
    clipped
}
