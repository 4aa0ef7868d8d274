//! Backend used when nothing is configured.
//!
//! Every call fails with [`StoreError::Configuration`]. Callers decide how
//! to degrade: the register serves the fallback menu and empty reports, and
//! rejects checkout.

use async_trait::async_trait;
use harvest_core::{
    CreatedOrder, MenuItem, NewOrder, NewPayment, OrderItemSnapshot, OrderSummary, SalesSummary,
};

use crate::backend::OrderBackend;
use crate::error::{StoreError, StoreResult};

#[derive(Debug, Clone)]
pub struct OfflineBackend {
    reason: String,
}

impl OfflineBackend {
    pub fn new(reason: impl Into<String>) -> Self {
        OfflineBackend {
            reason: reason.into(),
        }
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }

    fn unavailable<T>(&self) -> StoreResult<T> {
        Err(StoreError::Configuration(self.reason.clone()))
    }
}

#[async_trait]
impl OrderBackend for OfflineBackend {
    fn name(&self) -> &'static str {
        "offline"
    }

    async fn list_menu_items(&self) -> StoreResult<Vec<MenuItem>> {
        self.unavailable()
    }

    async fn upsert_menu_item(&self, _item: &MenuItem) -> StoreResult<MenuItem> {
        self.unavailable()
    }

    async fn delete_menu_item(&self, _id: &str) -> StoreResult<()> {
        self.unavailable()
    }

    async fn create_order(&self, _order: &NewOrder) -> StoreResult<CreatedOrder> {
        self.unavailable()
    }

    async fn create_order_items(
        &self,
        _order_id: &str,
        _items: &[OrderItemSnapshot],
    ) -> StoreResult<()> {
        self.unavailable()
    }

    async fn delete_order(&self, _order_id: &str) -> StoreResult<()> {
        self.unavailable()
    }

    async fn create_payment(&self, _payment: &NewPayment) -> StoreResult<()> {
        self.unavailable()
    }

    async fn list_orders(&self, _limit: usize) -> StoreResult<Vec<OrderSummary>> {
        self.unavailable()
    }

    async fn sales_summary(&self) -> StoreResult<SalesSummary> {
        self.unavailable()
    }
}
