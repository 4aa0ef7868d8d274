//! # Report Commands
//!
//! Recent orders list and the sales overview cards. Both are read-only and
//! degrade to empty results when the backend is unavailable.

use serde::Serialize;
use tracing::warn;

use harvest_core::{Money, OrderSummary, SalesSummary, DEFAULT_ORDER_LIST_LIMIT, SUMMARY_WINDOW};
use harvest_store::OrderBackend;

use crate::state::RegisterConfig;

/// Overview cards on the orders page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesOverview {
    pub total_revenue: Money,
    pub count: u64,
    pub average_ticket: Money,
    pub revenue_display: String,
    pub average_display: String,
}

impl SalesOverview {
    fn build(summary: SalesSummary, config: &RegisterConfig) -> Self {
        let fmt = config.currency_format();
        let average = summary.average_ticket();
        SalesOverview {
            total_revenue: summary.total_revenue,
            count: summary.count,
            average_ticket: average,
            revenue_display: fmt.format(summary.total_revenue),
            average_display: fmt.format(average),
        }
    }
}

/// Newest orders first, at most `limit` (default 50).
pub async fn recent_orders(backend: &dyn OrderBackend, limit: Option<usize>) -> Vec<OrderSummary> {
    let limit = limit
        .unwrap_or(DEFAULT_ORDER_LIST_LIMIT)
        .clamp(1, SUMMARY_WINDOW);
    match backend.list_orders(limit).await {
        Ok(orders) => orders,
        Err(e) => {
            warn!(error = %e, "Orders unavailable; showing none");
            Vec::new()
        }
    }
}

/// Revenue, order count and average over the recent window.
pub async fn sales_overview(backend: &dyn OrderBackend, config: &RegisterConfig) -> SalesOverview {
    let summary = match backend.sales_summary().await {
        Ok(summary) => summary,
        Err(e) => {
            warn!(error = %e, "Sales summary unavailable; showing zero");
            SalesSummary::default()
        }
    };
    SalesOverview::build(summary, config)
}
