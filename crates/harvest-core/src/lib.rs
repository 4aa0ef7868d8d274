//! # harvest-core: Pure Business Logic for the Harvest Cafe POS
//!
//! This crate holds the order-ticket logic every register screen shares:
//! how a ticket of line items is built, mutated, and reduced to money.
//! It has zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Harvest POS Architecture                            │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  Browser front-end (SPA)                        │   │
//! │  │    Menu grid ──► Ticket pane ──► Payment ──► Sales overview     │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 apps/register (session layer)                   │   │
//! │  │    add_item, update_quantity, checkout, load_menu, summary      │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             ★ harvest-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌─────────┐  ┌─────────┐  ┌─────────┐  ┌──────────┐          │   │
//! │  │   │  money  │  │ ticket  │  │ totals  │  │validation│          │   │
//! │  │   └─────────┘  └─────────┘  └─────────┘  └──────────┘          │   │
//! │  │   ┌─────────┐  ┌─────────┐  ┌─────────┐                        │   │
//! │  │   │  types  │  │ format  │  │ report  │                        │   │
//! │  │   └─────────┘  └─────────┘  └─────────┘                        │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO NETWORK • PURE FUNCTIONS                          │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              harvest-store (hosted backend seam)                │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (MenuItem, Order, Payment, etc.)
//! - [`money`] - Integer cents plus a micro-unit type for exact tax math
//! - [`ticket`] - The in-progress ticket and its line items
//! - [`totals`] - `compute_totals`, the one place subtotal/tax/total live
//! - [`validation`] - Input and checkout validation
//! - [`format`] - Locale-aware currency display
//! - [`report`] - Sales summary aggregation
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use harvest_core::{MenuItem, Money, TaxRate, Ticket};
//!
//! let mut ticket = Ticket::new(TaxRate::from_bps(700)); // 7%
//! let latte = MenuItem::new("latte", "Latte", Money::from_cents(450), "Coffee");
//! let muffin = MenuItem::new("muffin", "Muffin", Money::from_cents(295), "Bakery");
//!
//! ticket.add_item(&latte);
//! ticket.add_item(&muffin);
//! ticket.add_item(&muffin);
//!
//! let totals = ticket.totals().rounded();
//! assert_eq!(totals.subtotal.cents(), 1040);
//! assert_eq!(totals.tax.cents(), 73);   // 0.728 rounded at display
//! assert_eq!(totals.total.cents(), 1113);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod format;
pub mod money;
pub mod report;
pub mod ticket;
pub mod totals;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, ValidationError};
pub use format::CurrencyFormat;
pub use money::{Money, PreciseMoney};
pub use report::{summarize, SalesSummary};
pub use ticket::{LineItem, SubmitRejected, Ticket, TicketId, TicketPhase};
pub use totals::{change_due, compute_totals, RoundedTotals, Totals};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum quantity of a single line on a ticket.
///
/// Quantities above this are clamped, the same way quantities below one are.
pub const MAX_ITEM_QUANTITY: i64 = 999;

/// Tax rate the cafe runs with unless configured otherwise (7%).
pub const DEFAULT_TAX_RATE_PPM: u32 = 70_000;

/// Number of most recent orders the sales summary aggregates over.
pub const SUMMARY_WINDOW: usize = 500;

/// Default page size for the recent orders list.
pub const DEFAULT_ORDER_LIST_LIMIT: usize = 50;
