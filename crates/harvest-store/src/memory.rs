//! # In-Memory Backend
//!
//! Process-local tables behind the [`OrderBackend`] trait. Used by the demo
//! binary and as the test double for the checkout saga.
//!
//! ## Test Hooks
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  calls(step)            how many times a step was invoked (spy)        │
//! │  fail_once(step, msg)   next call of that step fails, then recovers    │
//! │  fail_always(step, msg) every call of that step fails                  │
//! │  set_latency(step, d)   each call of that step sleeps first            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A call is counted before its latency and failure hooks run, so a failed
//! or timed-out call still shows up in `calls`.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tracing::debug;
use uuid::Uuid;

use harvest_core::{
    summarize, CreatedOrder, MenuItem, NewOrder, NewPayment, OrderItemSnapshot, OrderSummary,
    SalesSummary, SUMMARY_WINDOW,
};

use crate::backend::OrderBackend;
use crate::error::{PersistStep, StoreError, StoreResult};

/// An order row as stored by the memory backend.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredOrder {
    pub order_id: String,
    pub order: NewOrder,
}

#[derive(Debug, Default)]
struct Tables {
    menu: Vec<MenuItem>,
    orders: Vec<StoredOrder>,
    order_items: HashMap<String, Vec<OrderItemSnapshot>>,
    payments: Vec<NewPayment>,
    deleted_orders: Vec<String>,
}

#[derive(Debug, Clone)]
enum Failure {
    Once(String),
    Always(String),
}

#[derive(Debug, Default)]
pub struct MemoryBackend {
    tables: Mutex<Tables>,
    calls: Mutex<HashMap<PersistStep, usize>>,
    failures: Mutex<HashMap<PersistStep, Failure>>,
    latency: Mutex<HashMap<PersistStep, Duration>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populates the menu table.
    pub fn with_menu(self, items: impl IntoIterator<Item = MenuItem>) -> Self {
        lock(&self.tables).menu.extend(items);
        self
    }

    // -------------------------------------------------------------------------
    // Test hooks
    // -------------------------------------------------------------------------

    /// The next call of `step` fails with a Persistence error.
    pub fn fail_once(&self, step: PersistStep, message: impl Into<String>) {
        lock(&self.failures).insert(step, Failure::Once(message.into()));
    }

    /// Every call of `step` fails until [`clear_failures`](Self::clear_failures).
    pub fn fail_always(&self, step: PersistStep, message: impl Into<String>) {
        lock(&self.failures).insert(step, Failure::Always(message.into()));
    }

    pub fn clear_failures(&self) {
        lock(&self.failures).clear();
    }

    /// Each call of `step` sleeps for `delay` before doing anything else.
    pub fn set_latency(&self, step: PersistStep, delay: Duration) {
        lock(&self.latency).insert(step, delay);
    }

    /// Number of times `step` has been invoked.
    pub fn calls(&self, step: PersistStep) -> usize {
        lock(&self.calls).get(&step).copied().unwrap_or(0)
    }

    /// Number of calls across all steps.
    pub fn total_calls(&self) -> usize {
        lock(&self.calls).values().sum()
    }

    // -------------------------------------------------------------------------
    // Table snapshots
    // -------------------------------------------------------------------------

    pub fn orders(&self) -> Vec<StoredOrder> {
        lock(&self.tables).orders.clone()
    }

    pub fn order_items(&self, order_id: &str) -> Vec<OrderItemSnapshot> {
        lock(&self.tables)
            .order_items
            .get(order_id)
            .cloned()
            .unwrap_or_default()
    }

    pub fn payments(&self) -> Vec<NewPayment> {
        lock(&self.tables).payments.clone()
    }

    /// Order ids removed through `delete_order`, in call order.
    pub fn deleted_orders(&self) -> Vec<String> {
        lock(&self.tables).deleted_orders.clone()
    }

    /// Records the call, applies latency, then any injected failure.
    async fn enter(&self, step: PersistStep) -> StoreResult<()> {
        *lock(&self.calls).entry(step).or_insert(0) += 1;

        let delay = lock(&self.latency).get(&step).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let mut failures = lock(&self.failures);
        match failures.get(&step).cloned() {
            Some(Failure::Once(message)) => {
                failures.remove(&step);
                debug!(step = %step, "Injected one-shot failure");
                Err(StoreError::persistence(step, message))
            }
            Some(Failure::Always(message)) => Err(StoreError::persistence(step, message)),
            None => Ok(()),
        }
    }

    fn summaries(tables: &Tables, limit: usize) -> Vec<OrderSummary> {
        tables
            .orders
            .iter()
            .rev()
            .take(limit)
            .map(|stored| {
                let item_count = tables
                    .order_items
                    .get(&stored.order_id)
                    .map(|items| items.iter().map(|i| i.quantity).sum())
                    .unwrap_or(0);
                OrderSummary {
                    order_id: stored.order_id.clone(),
                    subtotal: stored.order.subtotal,
                    tax: stored.order.tax,
                    total: stored.order.total,
                    status: stored.order.status,
                    payment_method: stored.order.payment_method,
                    notes: stored.order.notes.clone(),
                    item_count,
                    created_at: stored.order.created_at,
                }
            })
            .collect()
    }
}

#[async_trait]
impl OrderBackend for MemoryBackend {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn list_menu_items(&self) -> StoreResult<Vec<MenuItem>> {
        self.enter(PersistStep::Menu).await?;
        let mut items = lock(&self.tables).menu.clone();
        items.sort_by(|a, b| a.category.cmp(&b.category).then_with(|| a.name.cmp(&b.name)));
        Ok(items)
    }

    async fn upsert_menu_item(&self, item: &MenuItem) -> StoreResult<MenuItem> {
        self.enter(PersistStep::Menu).await?;
        let mut tables = lock(&self.tables);
        match tables.menu.iter().position(|m| m.id == item.id) {
            Some(idx) => tables.menu[idx] = item.clone(),
            None => tables.menu.push(item.clone()),
        }
        Ok(item.clone())
    }

    async fn delete_menu_item(&self, id: &str) -> StoreResult<()> {
        self.enter(PersistStep::Menu).await?;
        lock(&self.tables).menu.retain(|m| m.id != id);
        Ok(())
    }

    async fn create_order(&self, order: &NewOrder) -> StoreResult<CreatedOrder> {
        self.enter(PersistStep::Order).await?;
        let order_id = Uuid::new_v4().to_string();
        lock(&self.tables).orders.push(StoredOrder {
            order_id: order_id.clone(),
            order: order.clone(),
        });
        debug!(order_id = %order_id, total = %order.total, "Order stored in memory");
        Ok(CreatedOrder { order_id })
    }

    async fn create_order_items(
        &self,
        order_id: &str,
        items: &[OrderItemSnapshot],
    ) -> StoreResult<()> {
        self.enter(PersistStep::OrderItems).await?;
        let mut tables = lock(&self.tables);
        if !tables.orders.iter().any(|o| o.order_id == order_id) {
            return Err(StoreError::persistence(
                PersistStep::OrderItems,
                format!("order {} does not exist", order_id),
            ));
        }
        tables
            .order_items
            .entry(order_id.to_string())
            .or_default()
            .extend_from_slice(items);
        Ok(())
    }

    async fn delete_order(&self, order_id: &str) -> StoreResult<()> {
        self.enter(PersistStep::DeleteOrder).await?;
        let mut tables = lock(&self.tables);
        tables.orders.retain(|o| o.order_id != order_id);
        tables.order_items.remove(order_id);
        tables.deleted_orders.push(order_id.to_string());
        Ok(())
    }

    async fn create_payment(&self, payment: &NewPayment) -> StoreResult<()> {
        self.enter(PersistStep::Payment).await?;
        lock(&self.tables).payments.push(payment.clone());
        Ok(())
    }

    async fn list_orders(&self, limit: usize) -> StoreResult<Vec<OrderSummary>> {
        self.enter(PersistStep::Orders).await?;
        Ok(Self::summaries(&lock(&self.tables), limit))
    }

    async fn sales_summary(&self) -> StoreResult<SalesSummary> {
        self.enter(PersistStep::Summary).await?;
        let recent = Self::summaries(&lock(&self.tables), SUMMARY_WINDOW);
        Ok(summarize(&recent))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use harvest_core::{Money, OrderStatus, PaymentMethod};

    fn sample_order(total_cents: i64) -> NewOrder {
        NewOrder {
            ticket_id: Uuid::new_v4().to_string(),
            items: Vec::new(),
            subtotal: Money::from_cents(total_cents),
            tax: Money::zero(),
            total: Money::from_cents(total_cents),
            status: OrderStatus::Paid,
            notes: None,
            payment_method: Some(PaymentMethod::Card),
            tendered: None,
            change: None,
            created_at: Utc::now(),
        }
    }

    fn snapshot(id: &str, qty: i64) -> OrderItemSnapshot {
        OrderItemSnapshot {
            item_id: id.to_string(),
            name: id.to_string(),
            unit_price: Money::from_cents(100),
            quantity: qty,
            line_total: Money::from_cents(100 * qty),
            notes: None,
        }
    }

    #[tokio::test]
    async fn test_menu_sorted_by_category_then_name() {
        let backend = MemoryBackend::new().with_menu(vec![
            MenuItem::new("2", "Scone", Money::from_cents(350), "Bakery"),
            MenuItem::new("1", "Latte", Money::from_cents(450), "Coffee"),
            MenuItem::new("3", "Brownie", Money::from_cents(300), "Bakery"),
        ]);
        let names: Vec<String> = backend
            .list_menu_items()
            .await
            .unwrap()
            .into_iter()
            .map(|m| m.name)
            .collect();
        assert_eq!(names, vec!["Brownie", "Scone", "Latte"]);
    }

    #[tokio::test]
    async fn test_upsert_replaces_by_id() {
        let backend = MemoryBackend::new();
        let mut item = MenuItem::new("m1", "Latte", Money::from_cents(450), "Coffee");
        backend.upsert_menu_item(&item).await.unwrap();
        item.price = Money::from_cents(475);
        backend.upsert_menu_item(&item).await.unwrap();

        let menu = backend.list_menu_items().await.unwrap();
        assert_eq!(menu.len(), 1);
        assert_eq!(menu[0].price.cents(), 475);

        backend.delete_menu_item("m1").await.unwrap();
        assert!(backend.list_menu_items().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_order_lifecycle_and_spy() {
        let backend = MemoryBackend::new();
        let created = backend.create_order(&sample_order(1113)).await.unwrap();
        backend
            .create_order_items(&created.order_id, &[snapshot("a", 2), snapshot("b", 1)])
            .await
            .unwrap();

        let listed = backend.list_orders(10).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].item_count, 3);
        assert_eq!(backend.calls(PersistStep::Order), 1);
        assert_eq!(backend.calls(PersistStep::OrderItems), 1);
        assert_eq!(backend.total_calls(), 3);

        backend.delete_order(&created.order_id).await.unwrap();
        assert!(backend.orders().is_empty());
        assert!(backend.order_items(&created.order_id).is_empty());
        assert_eq!(backend.deleted_orders(), vec![created.order_id]);
    }

    #[tokio::test]
    async fn test_items_for_unknown_order_rejected() {
        let backend = MemoryBackend::new();
        let err = backend
            .create_order_items("missing", &[snapshot("a", 1)])
            .await
            .unwrap_err();
        assert_eq!(err.step(), Some(PersistStep::OrderItems));
    }

    #[tokio::test]
    async fn test_fail_once_recovers() {
        let backend = MemoryBackend::new();
        backend.fail_once(PersistStep::Order, "boom");

        let err = backend.create_order(&sample_order(100)).await.unwrap_err();
        assert_eq!(err, StoreError::persistence(PersistStep::Order, "boom"));
        assert!(backend.create_order(&sample_order(100)).await.is_ok());
        assert_eq!(backend.calls(PersistStep::Order), 2);
    }

    #[tokio::test]
    async fn test_fail_always_until_cleared() {
        let backend = MemoryBackend::new();
        backend.fail_always(PersistStep::Orders, "down");
        assert!(backend.list_orders(5).await.is_err());
        assert!(backend.list_orders(5).await.is_err());
        backend.clear_failures();
        assert!(backend.list_orders(5).await.is_ok());
    }

    #[tokio::test]
    async fn test_list_orders_newest_first_with_limit() {
        let backend = MemoryBackend::new();
        for cents in [100, 200, 300] {
            backend.create_order(&sample_order(cents)).await.unwrap();
        }
        let listed = backend.list_orders(2).await.unwrap();
        let totals: Vec<i64> = listed.iter().map(|o| o.total.cents()).collect();
        assert_eq!(totals, vec![300, 200]);

        let summary = backend.sales_summary().await.unwrap();
        assert_eq!(summary.total_revenue.cents(), 600);
        assert_eq!(summary.count, 3);
    }
}
