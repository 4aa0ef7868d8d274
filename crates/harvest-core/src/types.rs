//! # Domain Types
//!
//! Core domain types used throughout the Harvest POS.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    MenuItem     │   │    NewOrder     │   │   NewPayment    │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (catalog)   │   │  subtotal/tax/  │   │  order_id (FK)  │       │
//! │  │  name           │   │  total (2 dp)   │   │  amount = total │       │
//! │  │  price          │   │  status, notes  │   │  method         │       │
//! │  │  category       │   │  items snapshot │   │  currency       │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    TaxRate      │   │  OrderStatus    │   │ PaymentMethod   │       │
//! │  │  ppm (u32)      │   │  Pending        │   │  Cash           │       │
//! │  │  70_000 = 7%    │   │  Paid           │   │  Card           │       │
//! │  └─────────────────┘   │  Voided         │   │  Mobile         │       │
//! │                        └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Snapshot Pattern
//! Order items copy name and price from the ticket line, which itself copied
//! them from the menu when the item was added. Later menu edits never change
//! a ticket or an order.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::Money;

// =============================================================================
// Tax Rate
// =============================================================================

/// Tax rate in parts per million (ppm) of the taxed amount.
///
/// 7% is 70,000 ppm and 8.875% is 88,750 ppm. Six decimal places of the
/// fraction are held exactly; the fallible constructors reject anything
/// finer, or outside 0..=100%, instead of rounding it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TaxRate(u32);

/// ppm in a rate of 100%.
const PPM_PER_UNIT: u32 = 1_000_000;

impl TaxRate {
    /// Creates a tax rate from parts per million, capped at 100%.
    #[inline]
    pub const fn from_ppm(ppm: u32) -> Self {
        if ppm > PPM_PER_UNIT {
            TaxRate(PPM_PER_UNIT)
        } else {
            TaxRate(ppm)
        }
    }

    /// Creates a tax rate from basis points (`700` = 7%).
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        Self::from_ppm(bps.saturating_mul(100))
    }

    /// Creates a tax rate from a percentage (`8.875` = 8.875%).
    ///
    /// ```rust
    /// use harvest_core::types::TaxRate;
    ///
    /// assert_eq!(TaxRate::from_percentage(8.875).unwrap().ppm(), 88_750);
    /// assert!(TaxRate::from_percentage(8.87505).is_err());
    /// assert!(TaxRate::from_percentage(120.0).is_err());
    /// ```
    pub fn from_percentage(pct: f64) -> Result<Self, ValidationError> {
        Self::from_scaled(pct, 10_000.0, 4, "100")
    }

    /// Creates a tax rate from a decimal fraction (`0.08875` = 8.875%).
    pub fn from_fraction(fraction: f64) -> Result<Self, ValidationError> {
        Self::from_scaled(fraction, PPM_PER_UNIT as f64, 6, "1")
    }

    fn from_scaled(
        value: f64,
        ppm_per_input: f64,
        places: usize,
        max: &str,
    ) -> Result<Self, ValidationError> {
        let scaled = value * ppm_per_input;
        if !scaled.is_finite() || scaled < 0.0 || scaled > PPM_PER_UNIT as f64 {
            return Err(ValidationError::OutOfRange {
                field: "tax_rate".to_string(),
                min: "0".to_string(),
                max: max.to_string(),
            });
        }
        let ppm = scaled.round();
        // Tolerates binary float noise only (0.08875 * 1e6 = 88750.00000000001).
        if (scaled - ppm).abs() > 1e-6 {
            return Err(ValidationError::TooPrecise {
                field: "tax_rate".to_string(),
                places,
            });
        }
        Ok(TaxRate(ppm as u32))
    }

    /// Returns the rate in parts per million.
    #[inline]
    pub const fn ppm(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a decimal fraction (display only).
    #[inline]
    pub fn fraction(&self) -> f64 {
        self.0 as f64 / PPM_PER_UNIT as f64
    }

    /// Returns the rate as a percentage (display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 10_000.0
    }

    #[inline]
    pub const fn zero() -> Self {
        TaxRate(0)
    }
}

impl Default for TaxRate {
    fn default() -> Self {
        TaxRate::from_ppm(crate::DEFAULT_TAX_RATE_PPM)
    }
}

// =============================================================================
// Menu Item
// =============================================================================

/// An item on the cafe menu.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct MenuItem {
    /// Catalog identifier. Also the merge key for ticket lines.
    pub id: String,

    /// Display name shown on the menu grid and ticket.
    pub name: String,

    /// Current price.
    pub price: Money,

    /// Menu section ("Coffee", "Bakery", ...).
    pub category: String,

    /// Inactive items stay in the table but are hidden from order taking.
    pub is_active: bool,

    /// Optional picture for the menu card.
    pub image_url: Option<String>,
}

impl MenuItem {
    /// Creates an active menu item without an image.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        price: Money,
        category: impl Into<String>,
    ) -> Self {
        MenuItem {
            id: id.into(),
            name: name.into(),
            price,
            category: category.into(),
            is_active: true,
            image_url: None,
        }
    }
}

// =============================================================================
// Order Status
// =============================================================================

/// The status of a persisted order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Recorded, payment not yet taken.
    #[default]
    Pending,
    /// Paid at the register.
    Paid,
    /// Cancelled after the fact.
    Voided,
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderStatus::Pending => write!(f, "pending"),
            OrderStatus::Paid => write!(f, "paid"),
            OrderStatus::Voided => write!(f, "voided"),
        }
    }
}

// =============================================================================
// Payment Method / Status
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Physical cash; tendered amount and change apply.
    Cash,
    /// Card on an external terminal.
    #[default]
    Card,
    /// Phone wallet / QR payment.
    Mobile,
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaymentMethod::Cash => write!(f, "cash"),
            PaymentMethod::Card => write!(f, "card"),
            PaymentMethod::Mobile => write!(f, "mobile"),
        }
    }
}

impl std::str::FromStr for PaymentMethod {
    type Err = crate::ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "cash" => Ok(PaymentMethod::Cash),
            "card" | "credit" | "debit" => Ok(PaymentMethod::Card),
            "mobile" | "wallet" | "qr" => Ok(PaymentMethod::Mobile),
            other => Err(crate::ValidationError::Unrecognised {
                field: "method".to_string(),
                value: other.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    #[default]
    Completed,
    Refunded,
}

// =============================================================================
// Order (create request + persisted record)
// =============================================================================

/// Line snapshot written alongside an order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemSnapshot {
    /// Catalog id of the item.
    pub item_id: String,
    pub name: String,
    pub unit_price: Money,
    pub quantity: i64,
    /// unit_price × quantity.
    pub line_total: Money,
    pub notes: Option<String>,
}

/// Order-creation request built from a ticket at checkout.
///
/// Monetary fields are already rounded to cents; this is the persistence
/// boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct NewOrder {
    /// Ticket the order was taken on (for the receipt and support).
    pub ticket_id: String,
    pub items: Vec<OrderItemSnapshot>,
    pub subtotal: Money,
    pub tax: Money,
    pub total: Money,
    pub status: OrderStatus,
    pub notes: Option<String>,
    pub payment_method: Option<PaymentMethod>,
    /// Cash handed over, when known.
    pub tendered: Option<Money>,
    /// Change returned, when cash was tendered.
    pub change: Option<Money>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

/// Result of a successful order creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CreatedOrder {
    /// Identifier assigned by the persistence layer.
    pub order_id: String,
}

/// Row of the recent orders list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct OrderSummary {
    pub order_id: String,
    pub subtotal: Money,
    pub tax: Money,
    pub total: Money,
    pub status: OrderStatus,
    pub payment_method: Option<PaymentMethod>,
    pub notes: Option<String>,
    /// Sum of line quantities, when the backend returns lines.
    pub item_count: i64,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Payment
// =============================================================================

/// Payment-creation request. `amount` always equals the order total.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct NewPayment {
    pub order_id: String,
    pub amount: Money,
    pub method: PaymentMethod,
    /// ISO 4217 code, fixed per installation.
    pub currency: String,
    pub status: PaymentStatus,
}

impl NewPayment {
    /// Completed payment for the full order total.
    pub fn for_order(
        order_id: impl Into<String>,
        order: &NewOrder,
        method: PaymentMethod,
        currency: impl Into<String>,
    ) -> Self {
        NewPayment {
            order_id: order_id.into(),
            amount: order.total,
            method,
            currency: currency.into(),
            status: PaymentStatus::Completed,
        }
    }
}
