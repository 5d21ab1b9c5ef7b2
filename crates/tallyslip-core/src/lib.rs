pub mod issuer;
pub mod models;
pub mod storage;
pub mod validation;

pub use issuer::{IssuerDetails, IssuerProfile};
pub use models::{DerivedTotals, ReceiptInput, ReceiptRecord, ReceiptStatus, ServiceLine};
pub use storage::{ReceiptStore, StoreError};
pub use validation::{FieldError, MAX_AMOUNT, MAX_SERVICES, MAX_UNIT, ValidationErrors};
