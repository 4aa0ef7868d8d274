//! # harvest-store: Backend Seam for the Harvest Cafe POS
//!
//! Everything the POS persists or reads back goes through the
//! [`OrderBackend`] trait defined here.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       harvest-store Architecture                        │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    apps/register                                │   │
//! │  │        holds Arc<dyn OrderBackend>, never a concrete type       │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 OrderBackend (async trait)                      │   │
//! │  │   list_menu_items  create_order  create_order_items             │   │
//! │  │   delete_order     create_payment  list_orders  sales_summary   │   │
//! │  └──────┬──────────────────────┬──────────────────────┬────────────┘   │
//! │         │                      │                      │                 │
//! │  ┌──────▼──────┐       ┌───────▼──────┐       ┌───────▼──────┐         │
//! │  │ RestBackend │       │MemoryBackend │       │OfflineBackend│         │
//! │  │  (reqwest)  │       │ (spy, tests) │       │ (no config)  │         │
//! │  └─────────────┘       └──────────────┘       └──────────────┘         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust,no_run
//! use harvest_store::{connect, BackendConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let backend = connect(BackendConfig::from_env());
//! let menu = backend.list_menu_items().await?;
//! # Ok(())
//! # }
//! ```

pub mod backend;
pub mod config;
pub mod error;
pub mod memory;
pub mod offline;
pub mod rest;

pub use backend::OrderBackend;
pub use config::{connect, BackendConfig};
pub use error::{PersistStep, StoreError, StoreResult};
pub use memory::{MemoryBackend, StoredOrder};
pub use offline::OfflineBackend;
pub use rest::RestBackend;
