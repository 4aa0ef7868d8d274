//! # Harvest Register Library
//!
//! Session layer of the Harvest Cafe register: one in-progress ticket, the
//! menu catalog, checkout and the orders overview.
//!
//! ## Module Organization
//! ```text
//! harvest_register/
//! ├── lib.rs          ◄─── You are here (tracing setup & demo session)
//! ├── checkout.rs     ◄─── CheckoutStrategy trait, ClientSaga
//! ├── state/
//! │   ├── mod.rs      ◄─── State type exports
//! │   ├── ticket.rs   ◄─── TicketState (Arc<Mutex<Ticket>>, checkout guard)
//! │   └── config.rs   ◄─── RegisterConfig from HARVEST_* variables
//! ├── commands/
//! │   ├── mod.rs      ◄─── Command exports
//! │   ├── ticket.rs   ◄─── Ticket edits
//! │   ├── checkout.rs ◄─── Pay for the ticket
//! │   ├── menu.rs     ◄─── Catalog and menu management
//! │   └── reports.rs  ◄─── Recent orders, sales overview
//! └── error.rs        ◄─── RegisterError and its serialisable ApiError
//! ```
//!
//! ## Startup Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. init_tracing            RUST_LOG or "info,harvest=debug"            │
//! │  2. RegisterConfig          HARVEST_TAX_RATE, HARVEST_CURRENCY, ...     │
//! │  3. Backend                 HARVEST_BACKEND_URL/KEY ─► RestBackend      │
//! │                             unset ─► in-memory demo backend             │
//! │  4. Catalog::load           live menu, or sample menu on failure        │
//! │  5. TicketState + ClientSaga                                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod checkout;
pub mod commands;
pub mod error;
pub mod state;

use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use harvest_core::{Money, PaymentMethod};
use harvest_store::{connect, BackendConfig, MemoryBackend, OrderBackend};

pub use checkout::{CheckoutRequest, CheckoutStrategy, ClientSaga};
pub use error::{ApiError, ErrorCode, RegisterError, RegisterResult};
pub use state::{ConfigError, RegisterConfig, TicketState};

use commands::{Catalog, CheckoutOptions};

/// Filter used when `RUST_LOG` is unset.
const DEFAULT_LOG_FILTER: &str = "info,harvest=debug,reqwest=warn";

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=harvest=trace` - Show trace for harvest crates only
/// - Default: INFO, DEBUG for harvest crates
pub fn init_tracing() {
    tracing_subscriber::fmt().with_env_filter(log_filter()).init();
}

fn log_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER))
}

/// Picks the backend for this session.
///
/// Without `HARVEST_BACKEND_URL` the demo runs against an in-memory backend
/// seeded with the sample menu, so the whole flow can be exercised offline.
pub fn backend_from_env() -> Arc<dyn OrderBackend> {
    match BackendConfig::from_env() {
        Some(config) => connect(Some(config)),
        None => {
            info!("No hosted backend configured; using in-memory demo backend");
            Arc::new(MemoryBackend::new().with_menu(commands::fallback_menu()))
        }
    }
}

/// Runs one demo session: rings up two items, pays cash and prints the
/// receipt and the sales overview as JSON.
pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();
    info!("Starting Harvest register");

    let config = RegisterConfig::from_env()?;
    let backend = backend_from_env();
    info!(
        store = %config.store_name,
        tax_rate = %config.tax_rate.percentage(),
        currency = %config.currency,
        backend = backend.name(),
        "Register configured"
    );

    let catalog = Catalog::load(backend.as_ref()).await;
    if let Some(banner) = &catalog.banner {
        warn!("{banner}");
    }

    let ticket = TicketState::new(config.tax_rate);
    let strategy: Arc<dyn CheckoutStrategy> =
        Arc::new(ClientSaga::new(backend.clone(), config.call_timeout));

    let picks: Vec<String> = catalog.items.iter().take(2).map(|i| i.id.clone()).collect();
    for id in &picks {
        commands::add_item_by_id(&ticket, &config, &catalog, id)?;
    }
    if let Some(last) = picks.last() {
        commands::update_quantity(&ticket, &config, last, 2)?;
    }

    let current = commands::get_ticket(&ticket, &config);
    println!("{}", serde_json::to_string_pretty(&current)?);

    // Round the tender up to the next ten.
    let total = current.totals.total.cents();
    let tendered = Money::from_cents((total + 999) / 1000 * 1000);
    let receipt = commands::checkout(
        &ticket,
        &config,
        strategy,
        CheckoutOptions {
            method: PaymentMethod::Cash,
            notes: Some("demo session".to_string()),
            tendered: Some(tendered),
        },
    )
    .await?;
    println!("{}", serde_json::to_string_pretty(&receipt)?);

    let overview = commands::sales_overview(backend.as_ref(), &config).await;
    println!("{}", serde_json::to_string_pretty(&overview)?);

    info!("Register session finished");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing::Level;

    #[test]
    fn test_default_filter_quiets_http_client() {
        let subscriber = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::new(DEFAULT_LOG_FILTER))
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            assert!(!tracing::enabled!(target: "reqwest::connect", Level::DEBUG));
            assert!(tracing::enabled!(target: "reqwest::connect", Level::WARN));
            assert!(tracing::enabled!(target: "harvest_register", Level::DEBUG));
            assert!(!tracing::enabled!(target: "harvest_register", Level::TRACE));
            assert!(!tracing::enabled!(target: "hyper", Level::DEBUG));
        });
    }
}
