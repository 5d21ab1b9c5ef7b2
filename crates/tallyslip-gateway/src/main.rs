use std::{net::SocketAddr, sync::Arc};

use anyhow::Result as AnyResult;
use tallyslip_core::ReceiptStore;
use tallyslip_gateway::{AppState, build_router};
use tallyslip_platform::ServiceConfig;
use tallyslip_store::{InMemoryReceiptStore, JsonFileReceiptStore};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> AnyResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(std::env::var("RUST_LOG").unwrap_or_else(|_| {
            "tallyslip_gateway=info,tallyslip_store=info".to_string()
        }))
        .init();

    let config = ServiceConfig::from_env("0.0.0.0:8080")?;

    let store: Arc<dyn ReceiptStore> = match &config.receipts_file {
        Some(path) => {
            info!("receipt history stored in {}", path.display());
            Arc::new(JsonFileReceiptStore::new(path))
        }
        None => {
            warn!("RECEIPTS_FILE not set; receipts are kept in memory only");
            Arc::new(InMemoryReceiptStore::new())
        }
    };

    let router = build_router(AppState::new(store, config.issuer.clone()));

    let addr: SocketAddr = config.http_addr.parse()?;
    info!("receipt gateway listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}
