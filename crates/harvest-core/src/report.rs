//! Sales summary aggregation for the overview screen.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::types::{OrderStatus, OrderSummary};

/// Revenue and order count over a window of recent orders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SalesSummary {
    pub total_revenue: Money,
    pub count: u64,
}

impl SalesSummary {
    /// Mean order value, rounded half away from zero. Zero when there are no orders.
    pub fn average_ticket(&self) -> Money {
        if self.count == 0 {
            return Money::zero();
        }
        let count = self.count as i64;
        let cents = self.total_revenue.cents();
        let half = count / 2;
        let rounded = if cents >= 0 {
            (cents + half) / count
        } else {
            (cents - half) / count
        };
        Money::from_cents(rounded)
    }
}

/// Sums the persisted totals of `orders`. Voided orders are not revenue.
pub fn summarize(orders: &[OrderSummary]) -> SalesSummary {
    orders
        .iter()
        .filter(|o| o.status != OrderStatus::Voided)
        .fold(SalesSummary::default(), |acc, o| SalesSummary {
            total_revenue: acc.total_revenue + o.total,
            count: acc.count + 1,
        })
}
