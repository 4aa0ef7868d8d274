//! # Checkout Strategy
//!
//! Turns a ticket snapshot into persisted order, items and payment.
//!
//! ## Client-Side Saga
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  1. create_order ──── fails ──► report order error, nothing to undo     │
//! │        │                                                                │
//! │        ▼ order_id                                                       │
//! │  2. create_order_items ── fails ──► delete_order(order_id) once         │
//! │        │                            (failure logged, swallowed)         │
//! │        │                            report the items error              │
//! │        ▼                                                                │
//! │  3. create_payment(amount = order total) ── fails ──► report payment    │
//! │        │                                   error; order + items stay    │
//! │        ▼                                                                │
//! │     done                                                                │
//! │                                                                         │
//! │  Every call is bounded by `call_timeout` → StoreError::Timeout          │
//! │  No automatic retries.                                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The sequence is not atomic. A server-side procedure doing all three
//! writes in one transaction can replace [`ClientSaga`] behind the
//! [`CheckoutStrategy`] trait without touching the ticket or the commands.

use async_trait::async_trait;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

use harvest_core::{CreatedOrder, NewOrder, NewPayment, PaymentMethod};
use harvest_store::{OrderBackend, PersistStep, StoreError, StoreResult};

/// What a strategy needs to persist one checkout.
#[derive(Debug, Clone)]
pub struct CheckoutRequest {
    /// Order header plus line snapshots, totals already rounded.
    pub order: NewOrder,
    pub method: PaymentMethod,
    pub currency: String,
}

#[async_trait]
pub trait CheckoutStrategy: Send + Sync {
    /// Short name for logs.
    fn name(&self) -> &'static str;

    /// Persists order, items and payment. Returns the backend's order id.
    async fn submit(&self, request: CheckoutRequest) -> StoreResult<CreatedOrder>;
}

/// The three-call sequence with a single compensating delete.
pub struct ClientSaga {
    backend: Arc<dyn OrderBackend>,
    call_timeout: Duration,
}

impl ClientSaga {
    pub fn new(backend: Arc<dyn OrderBackend>, call_timeout: Duration) -> Self {
        ClientSaga {
            backend,
            call_timeout,
        }
    }

    async fn bounded<T, F>(&self, step: PersistStep, call: F) -> StoreResult<T>
    where
        F: Future<Output = StoreResult<T>> + Send,
    {
        match tokio::time::timeout(self.call_timeout, call).await {
            Ok(result) => result,
            Err(_) => Err(StoreError::Timeout {
                step,
                after_ms: self.call_timeout.as_millis() as u64,
            }),
        }
    }

    /// Best-effort delete of an order whose items could not be written.
    async fn compensate(&self, order_id: &str) {
        let result = self
            .bounded(PersistStep::DeleteOrder, self.backend.delete_order(order_id))
            .await;
        match result {
            Ok(()) => info!(order_id = %order_id, "Compensating delete succeeded"),
            Err(e) => error!(
                order_id = %order_id,
                error = %e,
                "Compensating delete failed; order left without items"
            ),
        }
    }
}

#[async_trait]
impl CheckoutStrategy for ClientSaga {
    fn name(&self) -> &'static str {
        "client_saga"
    }

    async fn submit(&self, request: CheckoutRequest) -> StoreResult<CreatedOrder> {
        let CheckoutRequest {
            order,
            method,
            currency,
        } = request;

        let created = self
            .bounded(PersistStep::Order, self.backend.create_order(&order))
            .await?;
        let order_id = created.order_id.clone();
        debug!(order_id = %order_id, backend = self.backend.name(), "Order created");

        if let Err(e) = self
            .bounded(
                PersistStep::OrderItems,
                self.backend.create_order_items(&order_id, &order.items),
            )
            .await
        {
            warn!(order_id = %order_id, error = %e, "Order items failed; compensating");
            self.compensate(&order_id).await;
            return Err(e);
        }

        let payment = NewPayment::for_order(order_id.as_str(), &order, method, currency);
        if let Err(e) = self
            .bounded(PersistStep::Payment, self.backend.create_payment(&payment))
            .await
        {
            // The order and its items stay persisted; the operator retries.
            warn!(order_id = %order_id, error = %e, "Payment failed after order was stored");
            return Err(e);
        }

        Ok(created)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use harvest_core::{Money, OrderItemSnapshot, OrderStatus};
    use harvest_store::MemoryBackend;

    fn request() -> CheckoutRequest {
        let items = vec![OrderItemSnapshot {
            item_id: "latte".into(),
            name: "Latte".into(),
            unit_price: Money::from_cents(450),
            quantity: 1,
            line_total: Money::from_cents(450),
            notes: None,
        }];
        CheckoutRequest {
            order: NewOrder {
                ticket_id: "t-1".into(),
                items,
                subtotal: Money::from_cents(450),
                tax: Money::from_cents(32),
                total: Money::from_cents(482),
                status: OrderStatus::Paid,
                notes: None,
                payment_method: Some(PaymentMethod::Card),
                tendered: None,
                change: None,
                created_at: Utc::now(),
            },
            method: PaymentMethod::Card,
            currency: "USD".into(),
        }
    }

    fn saga(backend: &Arc<MemoryBackend>) -> ClientSaga {
        ClientSaga::new(backend.clone(), Duration::from_millis(200))
    }

    #[tokio::test]
    async fn test_happy_path_writes_all_three() {
        let backend = Arc::new(MemoryBackend::new());
        let created = saga(&backend).submit(request()).await.unwrap();

        assert_eq!(backend.orders().len(), 1);
        assert_eq!(backend.order_items(&created.order_id).len(), 1);
        let payments = backend.payments();
        assert_eq!(payments.len(), 1);
        assert_eq!(payments[0].order_id, created.order_id);
        assert_eq!(payments[0].amount.cents(), 482);
        assert_eq!(backend.calls(PersistStep::DeleteOrder), 0);
    }

    #[tokio::test]
    async fn test_order_failure_stops_immediately() {
        let backend = Arc::new(MemoryBackend::new());
        backend.fail_once(PersistStep::Order, "rejected");

        let err = saga(&backend).submit(request()).await.unwrap_err();
        assert_eq!(err.step(), Some(PersistStep::Order));
        assert_eq!(backend.calls(PersistStep::OrderItems), 0);
        assert_eq!(backend.calls(PersistStep::Payment), 0);
        assert_eq!(backend.calls(PersistStep::DeleteOrder), 0);
    }

    #[tokio::test]
    async fn test_items_failure_compensates_once() {
        let backend = Arc::new(MemoryBackend::new());
        backend.fail_once(PersistStep::OrderItems, "items rejected");

        let err = saga(&backend).submit(request()).await.unwrap_err();
        assert_eq!(
            err,
            StoreError::persistence(PersistStep::OrderItems, "items rejected")
        );
        assert_eq!(backend.calls(PersistStep::DeleteOrder), 1);
        assert_eq!(backend.deleted_orders().len(), 1);
        assert!(backend.orders().is_empty());
        assert_eq!(backend.calls(PersistStep::Payment), 0);
    }

    #[tokio::test]
    async fn test_compensation_failure_does_not_mask_items_error() {
        let backend = Arc::new(MemoryBackend::new());
        backend.fail_once(PersistStep::OrderItems, "items rejected");
        backend.fail_once(PersistStep::DeleteOrder, "delete rejected");

        let err = saga(&backend).submit(request()).await.unwrap_err();
        assert_eq!(err.step(), Some(PersistStep::OrderItems));
        assert_eq!(backend.calls(PersistStep::DeleteOrder), 1);
    }

    #[tokio::test]
    async fn test_payment_failure_keeps_order() {
        let backend = Arc::new(MemoryBackend::new());
        backend.fail_once(PersistStep::Payment, "card declined");

        let err = saga(&backend).submit(request()).await.unwrap_err();
        assert_eq!(err.step(), Some(PersistStep::Payment));
        assert_eq!(backend.orders().len(), 1);
        assert_eq!(backend.calls(PersistStep::DeleteOrder), 0);
    }

    #[tokio::test]
    async fn test_slow_call_times_out_with_step() {
        let backend = Arc::new(MemoryBackend::new());
        backend.set_latency(PersistStep::OrderItems, Duration::from_secs(5));
        let saga = ClientSaga::new(backend.clone(), Duration::from_millis(20));

        let err = saga.submit(request()).await.unwrap_err();
        assert_eq!(
            err,
            StoreError::Timeout {
                step: PersistStep::OrderItems,
                after_ms: 20
            }
        );
        // Items timed out after the order existed, so it is compensated.
        assert_eq!(backend.calls(PersistStep::DeleteOrder), 1);
    }
}
