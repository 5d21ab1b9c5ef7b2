use std::path::PathBuf;

use anyhow::{Context, Result};
use tallyslip_core::IssuerDetails;

#[derive(Clone, Debug)]
pub struct ServiceConfig {
    pub http_addr: String,
    /// JSON file backing the receipt history; in-memory when unset.
    pub receipts_file: Option<PathBuf>,
    pub issuer: IssuerDetails,
}

impl ServiceConfig {
    pub fn from_env(default_http_addr: &str) -> Result<Self> {
        Self::from_lookup(default_http_addr, |key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(default_http_addr: &str, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let http_addr = read("HTTP_ADDR").unwrap_or_else(|| default_http_addr.to_string());
        http_addr
            .parse::<std::net::SocketAddr>()
            .with_context(|| format!("HTTP_ADDR '{http_addr}' is not a socket address"))?;

        let defaults = IssuerDetails::default();
        let issuer = IssuerDetails {
            name: read("ISSUER_NAME").unwrap_or(defaults.name),
            address: read("ISSUER_ADDRESS").unwrap_or(defaults.address),
            contact_line: read("ISSUER_CONTACT").unwrap_or(defaults.contact_line),
            currency_symbol: read("CURRENCY_SYMBOL").unwrap_or(defaults.currency_symbol),
        };

        Ok(Self {
            http_addr,
            receipts_file: read("RECEIPTS_FILE").map(PathBuf::from),
            issuer,
        })
    }
}
