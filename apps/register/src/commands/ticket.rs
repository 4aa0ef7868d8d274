//! # Ticket Commands
//!
//! Order-taking edits on the session ticket.
//!
//! ## Ticket Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  ┌──────────┐     ┌──────────┐     ┌──────────┐     ┌──────────┐       │
//! │  │  Empty   │────►│ Building │────►│Submitting│────►│ Committed│       │
//! │  │  Ticket  │     │          │     │          │     │          │       │
//! │  └──────────┘     └──────────┘     └──────────┘     └──────────┘       │
//! │                        │                 │                │             │
//! │                   add_item          checkout         new ticket id      │
//! │                   update_quantity   (checkout.rs)                       │
//! │                   remove_item                                           │
//! │                   set_line_notes                                        │
//! │                        │                                                │
//! │                        ▼                                                │
//! │                   clear_ticket ─────────────► (back to empty)           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every edit returns the full ticket so the pane re-renders from one value.

use serde::Serialize;
use tracing::debug;

use harvest_core::validation::parse_quantity;
use harvest_core::{
    LineItem, MenuItem, RoundedTotals, Ticket, TicketId, TicketPhase, ValidationError,
};

use crate::commands::menu::Catalog;
use crate::error::RegisterResult;
use crate::state::{RegisterConfig, TicketState};

/// Formatted figures for the ticket pane.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TotalsDisplay {
    pub subtotal: String,
    pub tax_label: String,
    pub tax: String,
    pub total: String,
}

/// Ticket response including lines and totals.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketResponse {
    pub ticket_id: TicketId,
    pub short_id: String,
    pub phase: TicketPhase,
    /// Pay action disabled while true.
    pub busy: bool,
    pub items: Vec<LineItem>,
    pub item_count: usize,
    pub total_quantity: i64,
    pub totals: RoundedTotals,
    pub display: TotalsDisplay,
}

impl TicketResponse {
    pub fn build(ticket: &Ticket, config: &RegisterConfig) -> Self {
        let totals = ticket.totals().rounded();
        let fmt = config.currency_format();
        TicketResponse {
            ticket_id: ticket.ticket_id(),
            short_id: ticket.ticket_id().short(),
            phase: ticket.phase(),
            busy: ticket.phase() == TicketPhase::Submitting,
            items: ticket.items().to_vec(),
            item_count: ticket.item_count(),
            total_quantity: ticket.total_quantity(),
            totals,
            display: TotalsDisplay {
                subtotal: fmt.format(totals.subtotal),
                tax_label: format!("Tax ({}%)", ticket.tax_rate().percentage()),
                tax: fmt.format(totals.tax),
                total: fmt.format(totals.total),
            },
        }
    }
}

/// Gets the current ticket.
pub fn get_ticket(ticket: &TicketState, config: &RegisterConfig) -> TicketResponse {
    ticket.with_ticket(|t| TicketResponse::build(t, config))
}

/// Adds one of a menu item (merging with an existing line).
pub fn add_item(
    ticket: &TicketState,
    config: &RegisterConfig,
    item: &MenuItem,
) -> RegisterResult<TicketResponse> {
    debug!(item_id = %item.id, "add_item command");
    ticket.with_ticket_mut(|t| {
        t.add_item(item);
        TicketResponse::build(t, config)
    })
}

/// Adds a catalog item by id, as the menu grid does on tap.
pub fn add_item_by_id(
    ticket: &TicketState,
    config: &RegisterConfig,
    catalog: &Catalog,
    item_id: &str,
) -> RegisterResult<TicketResponse> {
    let item = catalog
        .find(item_id)
        .ok_or_else(|| ValidationError::Unrecognised {
            field: "item".to_string(),
            value: item_id.to_string(),
        })?;
    add_item(ticket, config, item)
}

/// Removes a line regardless of quantity. Unknown ids are a no-op.
pub fn remove_item(
    ticket: &TicketState,
    config: &RegisterConfig,
    item_id: &str,
) -> RegisterResult<TicketResponse> {
    debug!(item_id = %item_id, "remove_item command");
    ticket.with_ticket_mut(|t| {
        t.remove_item(item_id);
        TicketResponse::build(t, config)
    })
}

/// Sets a line's quantity. Values below 1 become 1; removal goes
/// through [`remove_item`].
pub fn update_quantity(
    ticket: &TicketState,
    config: &RegisterConfig,
    item_id: &str,
    quantity: i64,
) -> RegisterResult<TicketResponse> {
    debug!(item_id = %item_id, quantity, "update_quantity command");
    ticket.with_ticket_mut(|t| {
        t.update_quantity(item_id, quantity);
        TicketResponse::build(t, config)
    })
}

/// Same as [`update_quantity`] for raw text from the quantity field.
pub fn update_quantity_input(
    ticket: &TicketState,
    config: &RegisterConfig,
    item_id: &str,
    input: &str,
) -> RegisterResult<TicketResponse> {
    let quantity = parse_quantity(input)?;
    update_quantity(ticket, config, item_id, quantity)
}

pub fn set_line_notes(
    ticket: &TicketState,
    config: &RegisterConfig,
    item_id: &str,
    notes: Option<String>,
) -> RegisterResult<TicketResponse> {
    let response = ticket.with_ticket_mut(|t| {
        t.set_line_notes(item_id, notes)
            .map(|()| TicketResponse::build(t, config))
    })??;
    Ok(response)
}

/// Empties the ticket, keeping its id.
pub fn clear_ticket(ticket: &TicketState, config: &RegisterConfig) -> RegisterResult<TicketResponse> {
    debug!("clear_ticket command");
    ticket.with_ticket_mut(|t| {
        t.clear();
        TicketResponse::build(t, config)
    })
}

/// Empties the ticket and issues a new id.
pub fn new_ticket(ticket: &TicketState, config: &RegisterConfig) -> RegisterResult<TicketResponse> {
    debug!("new_ticket command");
    ticket.with_ticket_mut(|t| {
        t.new_ticket();
        TicketResponse::build(t, config)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RegisterError;
    use harvest_core::{CoreError, Money};

    fn setup() -> (TicketState, RegisterConfig) {
        let config = RegisterConfig::default();
        (TicketState::new(config.tax_rate), config)
    }

    fn latte() -> MenuItem {
        MenuItem::new("latte", "Latte", Money::from_cents(450), "Coffee")
    }

    fn muffin() -> MenuItem {
        MenuItem::new("muffin", "Muffin", Money::from_cents(295), "Bakery")
    }

    #[test]
    fn test_cafe_ticket_display() {
        let (ticket, config) = setup();
        add_item(&ticket, &config, &latte()).unwrap();
        add_item(&ticket, &config, &muffin()).unwrap();
        let response = add_item(&ticket, &config, &muffin()).unwrap();

        assert_eq!(response.item_count, 2);
        assert_eq!(response.total_quantity, 3);
        assert_eq!(response.phase, TicketPhase::Building);
        assert_eq!(response.display.subtotal, "$10.40");
        assert_eq!(response.display.tax_label, "Tax (7%)");
        assert_eq!(response.display.tax, "$0.73");
        assert_eq!(response.display.total, "$11.13");
    }

    #[test]
    fn test_quantity_input() {
        let (ticket, config) = setup();
        add_item(&ticket, &config, &latte()).unwrap();

        let response = update_quantity_input(&ticket, &config, "latte", "0").unwrap();
        assert_eq!(response.items[0].quantity, 1);

        let err = update_quantity_input(&ticket, &config, "latte", "lots").unwrap_err();
        assert!(matches!(
            err,
            RegisterError::Validation(ValidationError::NotNumeric { .. })
        ));
    }

    #[test]
    fn test_remove_and_clear() {
        let (ticket, config) = setup();
        add_item(&ticket, &config, &latte()).unwrap();
        add_item(&ticket, &config, &muffin()).unwrap();
        let id = get_ticket(&ticket, &config).ticket_id;

        let response = remove_item(&ticket, &config, "latte").unwrap();
        assert_eq!(response.item_count, 1);
        let response = remove_item(&ticket, &config, "nope").unwrap();
        assert_eq!(response.item_count, 1);

        let response = clear_ticket(&ticket, &config).unwrap();
        assert_eq!(response.phase, TicketPhase::Empty);
        assert_eq!(response.ticket_id, id);

        let response = new_ticket(&ticket, &config).unwrap();
        assert_ne!(response.ticket_id, id);
    }

    #[test]
    fn test_line_notes() {
        let (ticket, config) = setup();
        add_item(&ticket, &config, &latte()).unwrap();

        let response =
            set_line_notes(&ticket, &config, "latte", Some("oat milk".to_string())).unwrap();
        assert_eq!(response.items[0].notes.as_deref(), Some("oat milk"));

        let err = set_line_notes(&ticket, &config, "tea", None).unwrap_err();
        assert!(matches!(err, RegisterError::Core(CoreError::LineNotFound(_))));
    }

    #[test]
    fn test_add_by_id_uses_catalog_snapshot() {
        let (ticket, config) = setup();
        let catalog = Catalog::fallback(None);
        let response = add_item_by_id(&ticket, &config, &catalog, "m1").unwrap();
        assert_eq!(response.items[0].name, "Pumpkin Spice Latte");
        assert_eq!(response.items[0].unit_price.cents(), 525);

        assert!(add_item_by_id(&ticket, &config, &catalog, "zzz").is_err());
    }

    #[test]
    fn test_edits_busy_during_checkout() {
        let (ticket, config) = setup();
        add_item(&ticket, &config, &latte()).unwrap();
        ticket.begin_checkout().unwrap();

        assert!(get_ticket(&ticket, &config).busy);
        assert!(matches!(
            update_quantity(&ticket, &config, "latte", 4),
            Err(RegisterError::Busy)
        ));
        assert!(matches!(clear_ticket(&ticket, &config), Err(RegisterError::Busy)));
    }
}
