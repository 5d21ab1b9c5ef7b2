use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;
use validator::ValidateEmail;

use crate::models::ReceiptInput;

pub const MAX_SERVICES: usize = 500;
/// Largest accepted quantity on one service line.
pub const MAX_UNIT: u64 = 1_000_000;
/// Largest accepted unit price or deposit.
pub const MAX_AMOUNT: u64 = 1_000_000_000_000;

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// Every problem found in a form submission, in field order.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{}", render(.0))]
pub struct ValidationErrors(pub Vec<FieldError>);

impl ValidationErrors {
    pub fn fields(&self) -> &[FieldError] {
        &self.0
    }

    pub fn has(&self, field: &str) -> bool {
        self.0.iter().any(|error| error.field == field)
    }
}

fn render(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|error| format!("{}: {}", error.field, error.message))
        .collect::<Vec<_>>()
        .join("; ")
}

impl ReceiptInput {
    /// Form-boundary checks. The calculator never sees input that fails here.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = Vec::new();
        let mut push = |field: String, message: &str| {
            errors.push(FieldError {
                field,
                message: message.to_string(),
            })
        };

        if self.division.trim().is_empty() {
            push("division".into(), "Division is required");
        }
        if self.organization.trim().is_empty() {
            push("organization".into(), "Organization is required");
        }
        if self.contact.trim().is_empty() {
            push("contact".into(), "Contact is required");
        }
        if !self.email.validate_email() {
            push("email".into(), "Invalid email address");
        }
        if self.address.trim().is_empty() {
            push("address".into(), "Address is required");
        }

        if self.services.is_empty() {
            push("services".into(), "At least one service is required");
        }
        for (index, service) in self.services.iter().enumerate() {
            if service.name.trim().is_empty() {
                push(format!("services[{index}].name"), "Service name is required");
            }
            if service.unit < Decimal::ONE {
                push(format!("services[{index}].unit"), "Unit must be at least 1");
            }
            if service.price < Decimal::ZERO {
                push(format!("services[{index}].price"), "Price must be non-negative");
            }
        }

        for (field, value) in [
            ("tax", self.tax),
            ("vat", self.vat),
            ("discount", self.discount),
        ] {
            if value < Decimal::ZERO || value > Decimal::ONE_HUNDRED {
                push(field.into(), "Must be between 0 and 100");
            }
        }

        if self.deposit_amount < Decimal::ZERO {
            push(
                "depositAmount".into(),
                "Deposit amount must be non-negative",
            );
        }

        for error in self.bound_errors() {
            if !errors.iter().any(|existing| existing.field == error.field) {
                errors.push(error);
            }
        }

        into_result(errors)
    }

    /// Magnitude limits only. Input inside them keeps every derived amount far
    /// below `Decimal::MAX`, so partially filled forms can be previewed safely.
    pub fn check_bounds(&self) -> Result<(), ValidationErrors> {
        into_result(self.bound_errors())
    }

    fn bound_errors(&self) -> Vec<FieldError> {
        let max_unit = Decimal::from(MAX_UNIT);
        let max_amount = Decimal::from(MAX_AMOUNT);
        let mut errors = Vec::new();
        let mut push = |field: String, message: String| errors.push(FieldError { field, message });

        if self.services.len() > MAX_SERVICES {
            push(
                "services".into(),
                format!("At most {MAX_SERVICES} services are allowed"),
            );
        }
        for (index, service) in self.services.iter().enumerate() {
            if service.unit.abs() > max_unit {
                push(
                    format!("services[{index}].unit"),
                    format!("Unit must be at most {MAX_UNIT}"),
                );
            }
            if service.price.abs() > max_amount {
                push(
                    format!("services[{index}].price"),
                    format!("Price must be at most {MAX_AMOUNT}"),
                );
            }
        }

        for (field, value) in [
            ("tax", self.tax),
            ("vat", self.vat),
            ("discount", self.discount),
        ] {
            if value.abs() > Decimal::ONE_HUNDRED {
                push(field.into(), "Must be between 0 and 100".to_string());
            }
        }

        if self.deposit_amount.abs() > max_amount {
            push(
                "depositAmount".into(),
                format!("Deposit amount must be at most {MAX_AMOUNT}"),
            );
        }

        errors
    }
}

fn into_result(errors: Vec<FieldError>) -> Result<(), ValidationErrors> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(ValidationErrors(errors))
    }
}
