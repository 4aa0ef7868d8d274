//! # Harvest Register Entry Point
//!
//! Headless register session. The setup lives in lib.rs so it can be
//! driven from tests and other front-ends.
//!
//! ## Environment
//! - `HARVEST_BACKEND_URL`, `HARVEST_BACKEND_KEY`: hosted backend (optional)
//! - `HARVEST_TAX_RATE`, `HARVEST_CURRENCY`, `HARVEST_LOCALE`, ...: see
//!   `state::config`
//! - `RUST_LOG`: log filter

#[tokio::main]
async fn main() {
    if let Err(e) = harvest_register::run().await {
        tracing::error!(error = %e, "Register stopped");
        eprintln!("harvest-register: {e}");
        std::process::exit(1);
    }
}
