//! # State Module
//!
//! Session state for the register. Each command takes only the state it
//! needs.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  ┌──────────────────┐  ┌──────────────────┐  ┌──────────────────────┐  │
//! │  │   TicketState    │  │  RegisterConfig  │  │  Arc<dyn             │  │
//! │  │                  │  │                  │  │   OrderBackend>      │  │
//! │  │  Arc<Mutex<      │  │  tax_rate        │  │                      │  │
//! │  │    Ticket>>      │  │  currency/locale │  │  rest | memory |     │  │
//! │  │                  │  │  call_timeout    │  │  offline             │  │
//! │  └──────────────────┘  └──────────────────┘  └──────────────────────┘  │
//! │                                                                         │
//! │  THREAD SAFETY:                                                        │
//! │  • TicketState: Arc<Mutex<T>>, shared with the checkout task           │
//! │  • RegisterConfig: read-only after initialization                      │
//! │  • Backend: Send + Sync, internally synchronised                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod config;
mod ticket;

pub use config::{ConfigError, RegisterConfig};
pub use ticket::TicketState;
