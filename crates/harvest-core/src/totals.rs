//! # Totals
//!
//! The single pure function every screen uses to turn ticket lines into
//! money. Keeping it in one place means the ticket pane, the payment screen
//! and the persisted order can never disagree about a total.
//!
//! ```text
//! subtotal = Σ unit_price × quantity          (Money, exact)
//! tax      = subtotal × tax_rate              (PreciseMoney, exact)
//! total    = subtotal + tax                   (PreciseMoney, exact)
//!
//! rounded(): each of the three is rounded to cents independently,
//!            total is NOT re-derived from the rounded parts.
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::{Money, PreciseMoney};
use crate::ticket::LineItem;
use crate::types::TaxRate;

/// Full-precision totals for a set of lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Totals {
    pub subtotal: Money,
    pub tax: PreciseMoney,
    pub total: PreciseMoney,
    pub tax_rate: TaxRate,
}

/// Totals rounded to cents, ready for display or persistence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct RoundedTotals {
    pub subtotal: Money,
    pub tax: Money,
    pub total: Money,
}

impl Totals {
    /// Rounds each figure to cents.
    pub fn rounded(&self) -> RoundedTotals {
        RoundedTotals {
            subtotal: self.subtotal,
            tax: self.tax.round_to_cents(),
            total: self.total.round_to_cents(),
        }
    }
}

/// Computes subtotal, tax and total for `items` at `tax_rate`.
///
/// ```rust
/// use harvest_core::{compute_totals, LineItem, Money, TaxRate};
///
/// let lines = vec![
///     LineItem::new("latte", "Latte", Money::from_cents(450), 1),
///     LineItem::new("muffin", "Muffin", Money::from_cents(295), 2),
/// ];
/// let totals = compute_totals(&lines, TaxRate::from_bps(700));
/// assert_eq!(totals.subtotal.cents(), 1040);
/// assert_eq!(totals.tax.micro_cents(), 72_800_000);
/// assert_eq!(totals.rounded().total.cents(), 1113);
/// ```
pub fn compute_totals(items: &[LineItem], tax_rate: TaxRate) -> Totals {
    let subtotal: Money = items.iter().map(LineItem::line_total).sum();
    let tax = subtotal.calculate_tax(tax_rate);
    let total = subtotal.to_precise() + tax;

    Totals {
        subtotal,
        tax,
        total,
        tax_rate,
    }
}

/// Change owed for a cash tender; never negative.
pub fn change_due(total: Money, tendered: Money) -> Money {
    if tendered > total {
        tendered - total
    } else {
        Money::zero()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(id: &str, cents: i64, qty: i64) -> LineItem {
        LineItem::new(id, id, Money::from_cents(cents), qty)
    }

    #[test]
    fn test_cafe_scenario() {
        let lines = vec![line("latte", 450, 1), line("muffin", 295, 2)];
        let totals = compute_totals(&lines, TaxRate::from_bps(700));

        assert_eq!(totals.subtotal.cents(), 1040);
        assert!((totals.tax.as_f64() - 0.728).abs() < 1e-9);
        assert!((totals.total.as_f64() - 11.128).abs() < 1e-9);

        let rounded = totals.rounded();
        assert_eq!(rounded.subtotal.cents(), 1040);
        assert_eq!(rounded.tax.cents(), 73);
        assert_eq!(rounded.total.cents(), 1113);
    }

    #[test]
    fn test_empty_lines_total_zero() {
        let totals = compute_totals(&[], TaxRate::from_bps(700));
        assert!(totals.subtotal.is_zero());
        assert_eq!(totals.tax, PreciseMoney::zero());
        assert_eq!(totals.total, PreciseMoney::zero());
    }

    #[test]
    fn test_identities_hold_for_varied_inputs() {
        // Deterministic sweep over prices, quantities and rates.
        let rates = [0u32, 50_000, 70_000, 82_500, 88_750, 100_000, 200_000];
        for (seed, ppm) in rates.iter().enumerate() {
            let lines: Vec<LineItem> = (1..=12)
                .map(|i| {
                    let cents = ((i * 137 + seed as i64 * 61) % 1_500) + 25;
                    let qty = (i + seed as i64) % 7 + 1;
                    line(&format!("item-{i}"), cents, qty)
                })
                .collect();

            let rate = TaxRate::from_ppm(*ppm);
            let totals = compute_totals(&lines, rate);

            let expected_subtotal: f64 = lines
                .iter()
                .map(|l| l.unit_price.to_major_f64() * l.quantity as f64)
                .sum();
            let subtotal = totals.subtotal.to_major_f64();
            assert!((subtotal - expected_subtotal).abs() < 1e-9);
            assert!((totals.tax.as_f64() - subtotal * rate.fraction()).abs() < 1e-9);
            assert!((totals.total.as_f64() - (subtotal + totals.tax.as_f64())).abs() < 1e-9);
        }
    }

    #[test]
    fn test_rounding_happens_once() {
        // Three lines of $0.05 at 7%: tax 0.0105 → $0.01, total 0.1605 → $0.16.
        let lines = vec![line("a", 5, 1), line("b", 5, 1), line("c", 5, 1)];
        let rounded = compute_totals(&lines, TaxRate::from_bps(700)).rounded();
        assert_eq!(rounded.tax.cents(), 1);
        assert_eq!(rounded.total.cents(), 16);
    }

    #[test]
    fn test_change_due() {
        let total = Money::from_cents(1113);
        assert_eq!(change_due(total, Money::from_cents(2000)).cents(), 887);
        assert_eq!(change_due(total, Money::from_cents(1113)).cents(), 0);
        assert_eq!(change_due(total, Money::from_cents(500)).cents(), 0);
    }
}
