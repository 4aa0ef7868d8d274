//! # Commands Module
//!
//! Everything the register front-end can ask for.
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs       ◄─── You are here (exports)
//! ├── ticket.rs    ◄─── Ticket edits (add, quantity, remove, notes, clear)
//! ├── checkout.rs  ◄─── Pay for the ticket through a CheckoutStrategy
//! ├── menu.rs      ◄─── Catalog load with fallback, menu management
//! └── reports.rs   ◄─── Recent orders, sales overview
//! ```
//!
//! ## State Injection
//! Each command declares only the state it needs:
//! ```rust,ignore
//! // Only needs the ticket
//! fn add_item(ticket: &TicketState, config: &RegisterConfig, item: &MenuItem)
//!
//! // Only needs the backend
//! async fn recent_orders(backend: &dyn OrderBackend, limit: Option<usize>)
//!
//! // Needs ticket, config and a strategy
//! async fn checkout(ticket: &TicketState, config: &RegisterConfig,
//!                   strategy: Arc<dyn CheckoutStrategy>, options: CheckoutOptions)
//! ```
//!
//! Ticket edits are synchronous and return the whole ticket. Backend reads
//! degrade to fallbacks; backend writes return errors.

pub mod checkout;
pub mod menu;
pub mod reports;
pub mod ticket;

pub use checkout::{checkout, CheckoutOptions, CheckoutReceipt};
pub use menu::{
    delete_menu_item, fallback_menu, save_menu_item, Catalog, MenuItemForm, MenuQuery, MenuSource,
};
pub use reports::{recent_orders, sales_overview, SalesOverview};
pub use ticket::{
    add_item, add_item_by_id, clear_ticket, get_ticket, new_ticket, remove_item, set_line_notes,
    update_quantity, update_quantity_input, TicketResponse, TotalsDisplay,
};
