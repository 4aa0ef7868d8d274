//! # Ticket State
//!
//! The session's single in-progress ticket, shared between commands and
//! the checkout task.
//!
//! ## Checkout Guard
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   Empty ──add──► Building ──begin_checkout──► Submitting                │
//! │                     ▲                              │                    │
//! │                     │   fail_checkout              │ complete_checkout  │
//! │                     └──────(items kept)────────────┤                    │
//! │                                                    ▼                    │
//! │   Empty (new ticket id) ◄───────────────────── Committed                │
//! │                                                                         │
//! │   While Submitting: every edit and a second checkout → Busy             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The guard is the ticket's own phase, read and changed under the mutex, so
//! checking and entering `Submitting` is one atomic step.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use harvest_core::{SubmitRejected, TaxRate, Ticket, TicketPhase};

use crate::error::{RegisterError, RegisterResult};

/// Shared handle to the session ticket.
///
/// ## Thread Safety
/// Uses `Arc<Mutex<Ticket>>`: the checkout task holds a clone of the handle
/// so it can finish the ticket even if the caller has gone away.
#[derive(Debug, Clone)]
pub struct TicketState {
    ticket: Arc<Mutex<Ticket>>,
}

impl TicketState {
    /// Creates the state with an empty ticket.
    pub fn new(tax_rate: TaxRate) -> Self {
        TicketState {
            ticket: Arc::new(Mutex::new(Ticket::new(tax_rate))),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Ticket> {
        self.ticket.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Executes a function with read access to the ticket.
    pub fn with_ticket<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&Ticket) -> R,
    {
        f(&self.lock())
    }

    /// Executes a function with write access to the ticket.
    ///
    /// Rejected with [`RegisterError::Busy`] while a checkout is in flight;
    /// the lines being persisted must not change underneath it.
    pub fn with_ticket_mut<F, R>(&self, f: F) -> RegisterResult<R>
    where
        F: FnOnce(&mut Ticket) -> R,
    {
        let mut ticket = self.lock();
        if ticket.phase() == TicketPhase::Submitting {
            return Err(RegisterError::Busy);
        }
        Ok(f(&mut ticket))
    }

    /// True while a checkout is in flight. The UI disables the pay action.
    pub fn is_busy(&self) -> bool {
        self.phase() == TicketPhase::Submitting
    }

    pub fn phase(&self) -> TicketPhase {
        self.lock().phase()
    }

    /// Enters `Submitting` and returns a snapshot of the ticket to persist.
    pub fn begin_checkout(&self) -> RegisterResult<Ticket> {
        let mut ticket = self.lock();
        ticket.begin_submit().map_err(|rejected| match rejected {
            SubmitRejected::AlreadySubmitting => RegisterError::Busy,
            SubmitRejected::Invalid(e) => RegisterError::Validation(e),
        })?;
        Ok(ticket.clone())
    }

    /// Checkout failed: back to `Building` with every line intact.
    pub fn fail_checkout(&self) {
        self.lock().abort_submit();
    }

    /// Checkout succeeded: commit, then reset for the next customer.
    pub fn complete_checkout(&self) {
        let mut ticket = self.lock();
        ticket.commit();
        ticket.new_ticket();
    }
}

impl Default for TicketState {
    fn default() -> Self {
        Self::new(TaxRate::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use harvest_core::{MenuItem, Money, ValidationError};

    fn latte() -> MenuItem {
        MenuItem::new("latte", "Latte", Money::from_cents(450), "Coffee")
    }

    #[test]
    fn test_edits_rejected_while_submitting() {
        let state = TicketState::default();
        state.with_ticket_mut(|t| t.add_item(&latte())).unwrap();

        state.begin_checkout().unwrap();
        assert!(state.is_busy());
        assert!(matches!(
            state.with_ticket_mut(|t| t.add_item(&latte())),
            Err(RegisterError::Busy)
        ));
        assert!(matches!(state.begin_checkout(), Err(RegisterError::Busy)));
        assert_eq!(state.with_ticket(|t| t.total_quantity()), 1);
    }

    #[test]
    fn test_empty_ticket_cannot_begin() {
        let state = TicketState::default();
        assert!(matches!(
            state.begin_checkout(),
            Err(RegisterError::Validation(ValidationError::EmptyTicket))
        ));
        assert!(!state.is_busy());
    }

    #[test]
    fn test_fail_keeps_items() {
        let state = TicketState::default();
        state.with_ticket_mut(|t| t.add_item(&latte())).unwrap();
        let id = state.with_ticket(|t| t.ticket_id());

        state.begin_checkout().unwrap();
        state.fail_checkout();

        assert_eq!(state.phase(), TicketPhase::Building);
        assert_eq!(state.with_ticket(|t| t.ticket_id()), id);
        assert_eq!(state.with_ticket(|t| t.item_count()), 1);
    }

    #[test]
    fn test_complete_resets_with_new_id() {
        let state = TicketState::default();
        state.with_ticket_mut(|t| t.add_item(&latte())).unwrap();
        let id = state.with_ticket(|t| t.ticket_id());

        state.begin_checkout().unwrap();
        state.complete_checkout();

        assert_eq!(state.phase(), TicketPhase::Empty);
        assert_ne!(state.with_ticket(|t| t.ticket_id()), id);
    }

    #[test]
    fn test_clones_share_the_ticket() {
        let state = TicketState::default();
        let handle = state.clone();
        handle.with_ticket_mut(|t| t.add_item(&latte())).unwrap();
        assert_eq!(state.with_ticket(|t| t.item_count()), 1);
    }
}
