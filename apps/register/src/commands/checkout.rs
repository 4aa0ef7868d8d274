//! # Checkout Command
//!
//! Pays for the current ticket through a [`CheckoutStrategy`].
//!
//! ## Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  checkout(options)                                                      │
//! │    1. validate notes                 ── invalid ──► Validation          │
//! │    2. begin_checkout (snapshot)      ── empty   ──► Validation          │
//! │                                      ── busy    ──► Busy                │
//! │    3. validate tender                ── short   ──► Validation          │
//! │    4. build NewOrder from snapshot (rounded totals)                     │
//! │    5. spawn: strategy.submit ─► complete_checkout | fail_checkout       │
//! │    6. await the task ─► CheckoutReceipt | RegisterError                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The spawned task owns a clone of the ticket handle and finishes the
//! ticket itself, so a caller that stops waiting never strands it in
//! `Submitting`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};

use harvest_core::validation::{validate_notes, validate_tender};
use harvest_core::{
    change_due, Money, NewOrder, OrderItemSnapshot, OrderStatus, PaymentMethod, RoundedTotals,
    TicketId,
};

use crate::checkout::{CheckoutRequest, CheckoutStrategy};
use crate::error::{RegisterError, RegisterResult};
use crate::state::{RegisterConfig, TicketState};

/// What the cashier chose on the payment panel.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutOptions {
    pub method: PaymentMethod,
    pub notes: Option<String>,
    /// Cash handed over, for the change calculation.
    pub tendered: Option<Money>,
}

/// Printed after a successful checkout.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutReceipt {
    pub order_id: String,
    pub ticket_id: TicketId,
    pub store_name: String,
    pub lines: Vec<OrderItemSnapshot>,
    pub totals: RoundedTotals,
    pub method: PaymentMethod,
    pub currency: String,
    pub tendered: Option<Money>,
    pub change: Option<Money>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Persists the ticket as a paid order.
///
/// On success the ticket is reset with a new id. On any failure the ticket
/// keeps its lines and returns to `Building` so the cashier can retry.
pub async fn checkout(
    ticket: &TicketState,
    config: &RegisterConfig,
    strategy: Arc<dyn CheckoutStrategy>,
    options: CheckoutOptions,
) -> RegisterResult<CheckoutReceipt> {
    let notes = validate_notes(options.notes.as_deref())?;
    let snapshot = ticket.begin_checkout()?;
    let totals = snapshot.totals().rounded();

    if let Err(e) = validate_tender(totals.total, options.tendered, options.method) {
        ticket.fail_checkout();
        return Err(e.into());
    }

    let change = match (options.method, options.tendered) {
        (PaymentMethod::Cash, Some(tendered)) => Some(change_due(totals.total, tendered)),
        _ => None,
    };

    let order = NewOrder {
        ticket_id: snapshot.ticket_id().to_string(),
        items: snapshot.order_items(),
        subtotal: totals.subtotal,
        tax: totals.tax,
        total: totals.total,
        status: OrderStatus::Paid,
        notes: notes.clone(),
        payment_method: Some(options.method),
        tendered: options.tendered,
        change,
        created_at: Utc::now(),
    };
    let lines = order.items.clone();
    let created_at = order.created_at;

    info!(
        ticket_id = %snapshot.ticket_id(),
        total = %totals.total,
        method = %options.method,
        strategy = strategy.name(),
        "Checkout started"
    );

    let request = CheckoutRequest {
        order,
        method: options.method,
        currency: config.currency.clone(),
    };
    let task_ticket = ticket.clone();
    let handle = tokio::spawn(async move {
        let result = strategy.submit(request).await;
        match &result {
            Ok(_) => task_ticket.complete_checkout(),
            Err(_) => task_ticket.fail_checkout(),
        }
        result
    });

    let created = match handle.await {
        Ok(Ok(created)) => created,
        Ok(Err(e)) => {
            warn!(
                ticket_id = %snapshot.ticket_id(),
                step = ?e.step(),
                error = %e,
                "Checkout failed; ticket kept for retry"
            );
            return Err(e.into());
        }
        Err(join_error) => {
            ticket.fail_checkout();
            return Err(RegisterError::Internal(join_error.to_string()));
        }
    };

    info!(
        ticket_id = %snapshot.ticket_id(),
        order_id = %created.order_id,
        "Checkout completed"
    );

    Ok(CheckoutReceipt {
        order_id: created.order_id,
        ticket_id: snapshot.ticket_id(),
        store_name: config.store_name.clone(),
        lines,
        totals,
        method: options.method,
        currency: config.currency.clone(),
        tendered: options.tendered,
        change,
        notes,
        created_at,
    })
}
