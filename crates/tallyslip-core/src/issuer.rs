use serde::{Deserialize, Serialize};

/// The organization that prints its header on every document.
pub trait IssuerProfile {
    fn name(&self) -> &str;
    fn address(&self) -> &str;
    fn contact_line(&self) -> &str;
    fn currency_symbol(&self) -> &str;
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IssuerDetails {
    pub name: String,
    pub address: String,
    pub contact_line: String,
    pub currency_symbol: String,
}

impl Default for IssuerDetails {
    fn default() -> Self {
        Self {
            name: "Tallyslip".to_string(),
            address: String::new(),
            contact_line: String::new(),
            currency_symbol: "৳".to_string(),
        }
    }
}

impl IssuerProfile for IssuerDetails {
    fn name(&self) -> &str {
        &self.name
    }

    fn address(&self) -> &str {
        &self.address
    }

    fn contact_line(&self) -> &str {
        &self.contact_line
    }

    fn currency_symbol(&self) -> &str {
        &self.currency_symbol
    }
}
