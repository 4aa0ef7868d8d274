//! # Backend Trait
//!
//! The request/response contract the POS needs from its hosted backend.
//!
//! ## Implementations
//! ```text
//! ┌──────────────────┬──────────────────────────────────────────────────────┐
//! │ RestBackend      │ PostgREST-style hosted tables over HTTPS             │
//! │ MemoryBackend    │ In-process tables; call-count spy, failure injection │
//! │ OfflineBackend   │ Nothing configured; every call is a Configuration    │
//! │                  │ error                                                │
//! └──────────────────┴──────────────────────────────────────────────────────┘
//! ```
//!
//! The backend is always passed in explicitly (`Arc<dyn OrderBackend>`);
//! there is no global client.

use async_trait::async_trait;
use harvest_core::{
    CreatedOrder, MenuItem, NewOrder, NewPayment, OrderItemSnapshot, OrderSummary, SalesSummary,
};

use crate::error::StoreResult;

#[async_trait]
pub trait OrderBackend: Send + Sync {
    /// Short name for logs ("rest", "memory", "offline").
    fn name(&self) -> &'static str;

    /// All menu items, ordered by category then name.
    async fn list_menu_items(&self) -> StoreResult<Vec<MenuItem>>;

    /// Creates or replaces a menu item by id and returns the stored row.
    async fn upsert_menu_item(&self, item: &MenuItem) -> StoreResult<MenuItem>;

    async fn delete_menu_item(&self, id: &str) -> StoreResult<()>;

    /// Creates the order header. The backend assigns the id.
    async fn create_order(&self, order: &NewOrder) -> StoreResult<CreatedOrder>;

    /// Writes the line snapshots for an existing order in one batch.
    async fn create_order_items(
        &self,
        order_id: &str,
        items: &[OrderItemSnapshot],
    ) -> StoreResult<()>;

    /// Deletes an order. Used only as the compensating action at checkout.
    async fn delete_order(&self, order_id: &str) -> StoreResult<()>;

    async fn create_payment(&self, payment: &NewPayment) -> StoreResult<()>;

    /// Most recent orders first.
    async fn list_orders(&self, limit: usize) -> StoreResult<Vec<OrderSummary>>;

    /// Revenue and count over the most recent `SUMMARY_WINDOW` orders.
    async fn sales_summary(&self) -> StoreResult<SalesSummary>;
}
