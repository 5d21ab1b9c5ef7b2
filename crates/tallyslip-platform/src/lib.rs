pub mod config;
pub mod contracts;

pub use config::ServiceConfig;
pub use contracts::{
    CreateReceiptRequest, DocumentQuery, ListReceiptsQuery, ListReceiptsResponse, PreviewLine,
    PreviewResponse,
};
