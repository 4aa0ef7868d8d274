//! # Ticket
//!
//! The working cart for one customer transaction.
//!
//! ## Ticket Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Ticket Phases                                    │
//! │                                                                         │
//! │   ┌───────┐  add_item   ┌──────────┐  begin_submit  ┌────────────┐     │
//! │   │ Empty │────────────►│ Building │───────────────►│ Submitting │     │
//! │   └───────┘             └──────────┘                └─────┬──────┘     │
//! │       ▲                  ▲  │ remove last line            │            │
//! │       │                  │  ▼                             │            │
//! │       │                Empty        abort_submit (items   │            │
//! │       │                  ◄────────────────────────────────┤ retained)  │
//! │       │                                                   │            │
//! │       │   new_ticket()          ┌───────────┐   commit    │            │
//! │       └─────────────────────────│ Committed │◄────────────┘            │
//! │                                 └───────────┘                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Invariants
//! - At most one line per catalog id; adding a duplicate bumps its quantity.
//! - Quantity stays within `1..=MAX_ITEM_QUANTITY` after every mutation.
//!   Removal only happens through `remove_item`.
//! - Lines keep insertion order.
//! - Totals are derived on every call, never stored.

use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;
use uuid::Uuid;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::{Money, PreciseMoney};
use crate::totals::{compute_totals, Totals};
use crate::types::{MenuItem, OrderItemSnapshot, TaxRate};
use crate::MAX_ITEM_QUANTITY;

// =============================================================================
// Ticket Id
// =============================================================================

/// Identity of one ticket. Reissued whenever the ticket is reset for the
/// next customer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TicketId(Uuid);

impl TicketId {
    pub fn generate() -> Self {
        TicketId(Uuid::new_v4())
    }

    /// Short form printed on the ticket pane ("#1A2B3C4D").
    pub fn short(&self) -> String {
        let simple = self.0.simple().to_string();
        format!("#{}", simple[..8].to_uppercase())
    }
}

impl fmt::Display for TicketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// =============================================================================
// Line Item
// =============================================================================

/// One catalog item plus quantity on a ticket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    /// Catalog id of the item (not of the line).
    pub id: String,
    /// Name at the moment the item was added.
    pub name: String,
    /// Category at the moment the item was added.
    pub category: Option<String>,
    /// Price at the moment the item was added.
    pub unit_price: Money,
    pub quantity: i64,
    pub notes: Option<String>,
}

impl LineItem {
    /// Creates a line directly; the quantity is clamped into range.
    pub fn new(id: impl Into<String>, name: impl Into<String>, unit_price: Money, quantity: i64) -> Self {
        LineItem {
            id: id.into(),
            name: name.into(),
            category: None,
            unit_price,
            quantity: clamp_quantity(quantity),
            notes: None,
        }
    }

    /// Snapshots a menu item at quantity 1.
    pub fn from_menu_item(item: &MenuItem) -> Self {
        LineItem {
            id: item.id.clone(),
            name: item.name.clone(),
            category: Some(item.category.clone()),
            unit_price: item.price,
            quantity: 1,
            notes: None,
        }
    }

    /// unit_price × quantity.
    #[inline]
    pub fn line_total(&self) -> Money {
        self.unit_price.multiply_quantity(self.quantity)
    }

    /// The snapshot written to the order-items table.
    pub fn to_snapshot(&self) -> OrderItemSnapshot {
        OrderItemSnapshot {
            item_id: self.id.clone(),
            name: self.name.clone(),
            unit_price: self.unit_price,
            quantity: self.quantity,
            line_total: self.line_total(),
            notes: self.notes.clone(),
        }
    }
}

fn clamp_quantity(quantity: i64) -> i64 {
    quantity.clamp(1, MAX_ITEM_QUANTITY)
}

// =============================================================================
// Ticket Phase
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum TicketPhase {
    /// No lines yet.
    Empty,
    /// Order taking in progress.
    Building,
    /// Checkout in flight; the UI disables the pay action.
    Submitting,
    /// Order and payment persisted; waiting for reset.
    Committed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
enum SubmitState {
    #[default]
    Idle,
    Submitting,
    Committed,
}

// =============================================================================
// Ticket
// =============================================================================

/// The mutable working set of lines for one checkout cycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ticket {
    ticket_id: TicketId,
    items: Vec<LineItem>,
    tax_rate: TaxRate,
    #[serde(skip)]
    submit: SubmitState,
}

impl Ticket {
    /// Creates an empty ticket with a fresh id.
    pub fn new(tax_rate: TaxRate) -> Self {
        Ticket {
            ticket_id: TicketId::generate(),
            items: Vec::new(),
            tax_rate,
            submit: SubmitState::Idle,
        }
    }

    pub fn ticket_id(&self) -> TicketId {
        self.ticket_id
    }

    pub fn tax_rate(&self) -> TaxRate {
        self.tax_rate
    }

    /// Lines in insertion order.
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    pub fn line(&self, id: &str) -> Option<&LineItem> {
        self.items.iter().find(|l| l.id == id)
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of distinct lines.
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Sum of quantities across lines.
    pub fn total_quantity(&self) -> i64 {
        self.items.iter().map(|l| l.quantity).sum()
    }

    pub fn phase(&self) -> TicketPhase {
        match self.submit {
            SubmitState::Submitting => TicketPhase::Submitting,
            SubmitState::Committed => TicketPhase::Committed,
            SubmitState::Idle if self.items.is_empty() => TicketPhase::Empty,
            SubmitState::Idle => TicketPhase::Building,
        }
    }

    // -------------------------------------------------------------------------
    // Mutations
    // -------------------------------------------------------------------------

    /// Adds one of `item`: bumps the existing line or appends a new one.
    ///
    /// Name, category and price are copied now; later menu edits do not
    /// reach this ticket.
    pub fn add_item(&mut self, item: &MenuItem) {
        if let Some(line) = self.items.iter_mut().find(|l| l.id == item.id) {
            line.quantity = clamp_quantity(line.quantity + 1);
            return;
        }
        self.items.push(LineItem::from_menu_item(item));
    }

    /// Removes the line regardless of quantity. Returns whether a line
    /// was removed; an absent id is a no-op.
    pub fn remove_item(&mut self, id: &str) -> bool {
        let before = self.items.len();
        self.items.retain(|l| l.id != id);
        self.items.len() != before
    }

    /// Sets the quantity, clamped to `1..=MAX_ITEM_QUANTITY`. Zero or
    /// negative input leaves the line at 1; it never removes it.
    /// Returns whether the line exists.
    pub fn update_quantity(&mut self, id: &str, quantity: i64) -> bool {
        match self.items.iter_mut().find(|l| l.id == id) {
            Some(line) => {
                line.quantity = clamp_quantity(quantity);
                true
            }
            None => false,
        }
    }

    /// Attaches a free-text note to a line ("oat milk", "warm it up").
    pub fn set_line_notes(&mut self, id: &str, notes: Option<String>) -> CoreResult<()> {
        let line = self
            .items
            .iter_mut()
            .find(|l| l.id == id)
            .ok_or_else(|| CoreError::LineNotFound(id.to_string()))?;
        line.notes = notes.filter(|n| !n.trim().is_empty());
        Ok(())
    }

    /// Empties the ticket but keeps its identity.
    pub fn clear(&mut self) {
        self.items.clear();
        self.submit = SubmitState::Idle;
    }

    /// Empties the ticket and issues a new id for the next customer.
    pub fn new_ticket(&mut self) {
        self.clear();
        self.ticket_id = TicketId::generate();
    }

    // -------------------------------------------------------------------------
    // Checkout phases
    // -------------------------------------------------------------------------

    /// Enters `Submitting`. Rejects an empty ticket and a ticket that is
    /// already submitting.
    pub fn begin_submit(&mut self) -> Result<(), SubmitRejected> {
        if self.submit == SubmitState::Submitting {
            return Err(SubmitRejected::AlreadySubmitting);
        }
        if self.items.is_empty() {
            return Err(SubmitRejected::Invalid(ValidationError::EmptyTicket));
        }
        self.submit = SubmitState::Submitting;
        Ok(())
    }

    /// Leaves `Submitting` after a failure. Lines are untouched.
    pub fn abort_submit(&mut self) {
        self.submit = SubmitState::Idle;
    }

    /// Marks the ticket as persisted. The caller resets it with `new_ticket`.
    pub fn commit(&mut self) {
        self.submit = SubmitState::Committed;
    }

    // -------------------------------------------------------------------------
    // Derived values
    // -------------------------------------------------------------------------

    pub fn totals(&self) -> Totals {
        compute_totals(&self.items, self.tax_rate)
    }

    pub fn subtotal(&self) -> Money {
        self.totals().subtotal
    }

    pub fn tax(&self) -> PreciseMoney {
        self.totals().tax
    }

    pub fn total(&self) -> PreciseMoney {
        self.totals().total
    }

    /// Line snapshots for the order-items request.
    pub fn order_items(&self) -> Vec<OrderItemSnapshot> {
        self.items.iter().map(LineItem::to_snapshot).collect()
    }
}

/// Why a ticket could not enter `Submitting`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitRejected {
    AlreadySubmitting,
    Invalid(ValidationError),
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn menu(id: &str, cents: i64) -> MenuItem {
        MenuItem::new(id, format!("Item {id}"), Money::from_cents(cents), "Coffee")
    }

    fn ticket() -> Ticket {
        Ticket::new(TaxRate::from_bps(700))
    }

    #[test]
    fn test_repeated_adds_merge_into_one_line() {
        for n in 1..=25 {
            let mut t = ticket();
            let latte = menu("latte", 450);
            for _ in 0..n {
                t.add_item(&latte);
            }
            assert_eq!(t.item_count(), 1);
            assert_eq!(t.line("latte").unwrap().quantity, n);
        }
    }

    #[test]
    fn test_add_latte_twice() {
        let mut t = ticket();
        let latte = menu("latte", 450);
        t.add_item(&latte);
        t.add_item(&latte);

        let line = t.line("latte").unwrap();
        assert_eq!(line.quantity, 2);
        assert_eq!(line.line_total().cents(), 900);
    }

    #[test]
    fn test_insertion_order_preserved() {
        let mut t = ticket();
        t.add_item(&menu("b", 100));
        t.add_item(&menu("a", 100));
        t.add_item(&menu("b", 100));
        let ids: Vec<&str> = t.items().iter().map(|l| l.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);
    }

    #[test]
    fn test_price_snapshot_ignores_later_menu_changes() {
        let mut t = ticket();
        let mut latte = menu("latte", 450);
        t.add_item(&latte);

        latte.price = Money::from_cents(999);
        latte.name = "Renamed".to_string();
        t.add_item(&latte);

        let line = t.line("latte").unwrap();
        assert_eq!(line.unit_price.cents(), 450);
        assert_eq!(line.name, "Item latte");
        assert_eq!(line.quantity, 2);
    }

    #[test]
    fn test_update_quantity_clamps_to_one() {
        for q in [0, -1, -5, i64::MIN] {
            let mut t = ticket();
            t.add_item(&menu("latte", 450));
            assert!(t.update_quantity("latte", q));
            assert_eq!(t.item_count(), 1);
            assert_eq!(t.line("latte").unwrap().quantity, 1);
        }
    }

    #[test]
    fn test_update_quantity_caps_at_max() {
        let mut t = ticket();
        t.add_item(&menu("latte", 450));
        t.update_quantity("latte", 5_000);
        assert_eq!(t.line("latte").unwrap().quantity, MAX_ITEM_QUANTITY);
        t.add_item(&menu("latte", 450));
        assert_eq!(t.line("latte").unwrap().quantity, MAX_ITEM_QUANTITY);
    }

    #[test]
    fn test_missing_ids_are_noops() {
        let mut t = ticket();
        t.add_item(&menu("latte", 450));
        assert!(!t.update_quantity("nope", 3));
        assert!(!t.remove_item("nope"));
        assert_eq!(t.item_count(), 1);
        assert!(t.set_line_notes("nope", Some("x".into())).is_err());
    }

    #[test]
    fn test_remove_ignores_quantity() {
        let mut t = ticket();
        let latte = menu("latte", 450);
        t.add_item(&latte);
        t.update_quantity("latte", 7);
        assert!(t.remove_item("latte"));
        assert!(t.is_empty());
        assert_eq!(t.phase(), TicketPhase::Empty);
    }

    #[test]
    fn test_clear_keeps_identity_new_ticket_does_not() {
        let mut t = ticket();
        let id = t.ticket_id();
        t.add_item(&menu("latte", 450));

        t.clear();
        assert!(t.is_empty());
        assert_eq!(t.ticket_id(), id);

        t.add_item(&menu("latte", 450));
        t.new_ticket();
        assert!(t.is_empty());
        assert_ne!(t.ticket_id(), id);
    }

    #[test]
    fn test_derived_getters_are_stable() {
        let mut t = ticket();
        t.add_item(&menu("latte", 450));
        t.add_item(&menu("muffin", 295));
        t.update_quantity("muffin", 2);

        let first = (t.subtotal(), t.tax(), t.total());
        for _ in 0..10 {
            assert_eq!((t.subtotal(), t.tax(), t.total()), first);
        }
        assert_eq!(first.0.cents(), 1040);
        assert_eq!(first.1.round_to_cents().cents(), 73);
        assert_eq!(first.2.round_to_cents().cents(), 1113);
    }

    #[test]
    fn test_totals_follow_mutations() {
        let mut t = ticket();
        t.add_item(&menu("latte", 450));
        assert_eq!(t.subtotal().cents(), 450);
        t.update_quantity("latte", 3);
        assert_eq!(t.subtotal().cents(), 1350);
        t.remove_item("latte");
        assert_eq!(t.subtotal().cents(), 0);
    }

    #[test]
    fn test_submit_phases() {
        let mut t = ticket();
        assert_eq!(
            t.begin_submit(),
            Err(SubmitRejected::Invalid(ValidationError::EmptyTicket))
        );

        t.add_item(&menu("latte", 450));
        assert_eq!(t.phase(), TicketPhase::Building);

        t.begin_submit().unwrap();
        assert_eq!(t.phase(), TicketPhase::Submitting);
        assert_eq!(t.begin_submit(), Err(SubmitRejected::AlreadySubmitting));

        t.abort_submit();
        assert_eq!(t.phase(), TicketPhase::Building);
        assert_eq!(t.item_count(), 1);

        t.begin_submit().unwrap();
        t.commit();
        assert_eq!(t.phase(), TicketPhase::Committed);
        t.new_ticket();
        assert_eq!(t.phase(), TicketPhase::Empty);
    }

    #[test]
    fn test_order_items_snapshot() {
        let mut t = ticket();
        t.add_item(&menu("muffin", 295));
        t.add_item(&menu("muffin", 295));
        t.set_line_notes("muffin", Some("warmed".into())).unwrap();

        let snaps = t.order_items();
        assert_eq!(snaps.len(), 1);
        assert_eq!(snaps[0].item_id, "muffin");
        assert_eq!(snaps[0].quantity, 2);
        assert_eq!(snaps[0].line_total.cents(), 590);
        assert_eq!(snaps[0].notes.as_deref(), Some("warmed"));
    }

    #[test]
    fn test_short_ticket_id() {
        let id = TicketId::generate();
        let short = id.short();
        assert_eq!(short.len(), 9);
        assert!(short.starts_with('#'));
    }
}
