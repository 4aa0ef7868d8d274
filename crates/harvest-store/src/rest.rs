//! # REST Backend
//!
//! Talks to a hosted PostgREST-style backend over HTTPS.
//!
//! ## Tables
//! ```text
//! ┌──────────────┬──────────────────────────────────────────────────────────┐
//! │ menu_items   │ id, name, price, category, is_active, image_url          │
//! │ orders       │ id, ticket_id, subtotal, tax, total, status, notes,      │
//! │              │ payment_method, tendered, change, created_at             │
//! │ order_items  │ order_id → orders.id, item_id, name, unit_price,         │
//! │              │ quantity, line_total, notes                              │
//! │ payments     │ order_id → orders.id, amount, method, currency, status   │
//! └──────────────┴──────────────────────────────────────────────────────────┘
//! ```
//!
//! Numeric columns travel as JSON numbers in major units (`4.5`), so rows
//! are converted to and from [`Money`] at this boundary only.
//!
//! Every request carries the key twice, as `apikey` and as a Bearer token.
//! Writes ask for `Prefer: return=representation` so the assigned id comes
//! back in the response body.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use harvest_core::{
    summarize, CreatedOrder, MenuItem, Money, NewOrder, NewPayment, OrderItemSnapshot,
    OrderStatus, OrderSummary, PaymentMethod, PaymentStatus, SalesSummary, SUMMARY_WINDOW,
};

use crate::backend::OrderBackend;
use crate::config::BackendConfig;
use crate::error::{PersistStep, StoreError, StoreResult};

const REST_PATH: &str = "rest/v1";
const PREFER: &str = "Prefer";

// =============================================================================
// Row DTOs
// =============================================================================

#[derive(Debug, Deserialize)]
struct MenuItemRow {
    id: serde_json::Value,
    name: String,
    price: f64,
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    is_active: Option<bool>,
    #[serde(default)]
    image_url: Option<String>,
}

impl MenuItemRow {
    fn into_menu_item(self) -> StoreResult<MenuItem> {
        Ok(MenuItem {
            id: id_string(PersistStep::Menu, &self.id)?,
            name: self.name,
            price: Money::from_major_f64(self.price),
            category: self.category.unwrap_or_else(|| "Other".to_string()),
            is_active: self.is_active.unwrap_or(true),
            image_url: self.image_url,
        })
    }
}

#[derive(Debug, Serialize)]
struct MenuItemWrite<'a> {
    id: &'a str,
    name: &'a str,
    price: f64,
    category: &'a str,
    is_active: bool,
    image_url: Option<&'a str>,
}

impl<'a> From<&'a MenuItem> for MenuItemWrite<'a> {
    fn from(item: &'a MenuItem) -> Self {
        MenuItemWrite {
            id: &item.id,
            name: &item.name,
            price: item.price.to_major_f64(),
            category: &item.category,
            is_active: item.is_active,
            image_url: item.image_url.as_deref(),
        }
    }
}

#[derive(Debug, Serialize)]
struct OrderInsert<'a> {
    ticket_id: &'a str,
    subtotal: f64,
    tax: f64,
    total: f64,
    status: OrderStatus,
    notes: Option<&'a str>,
    payment_method: Option<PaymentMethod>,
    tendered: Option<f64>,
    change: Option<f64>,
    created_at: DateTime<Utc>,
}

impl<'a> From<&'a NewOrder> for OrderInsert<'a> {
    fn from(order: &'a NewOrder) -> Self {
        OrderInsert {
            ticket_id: &order.ticket_id,
            subtotal: order.subtotal.to_major_f64(),
            tax: order.tax.to_major_f64(),
            total: order.total.to_major_f64(),
            status: order.status,
            notes: order.notes.as_deref(),
            payment_method: order.payment_method,
            tendered: order.tendered.map(|m| m.to_major_f64()),
            change: order.change.map(|m| m.to_major_f64()),
            created_at: order.created_at,
        }
    }
}

#[derive(Debug, Deserialize)]
struct IdRow {
    id: serde_json::Value,
}

#[derive(Debug, Serialize)]
struct OrderItemInsert<'a> {
    order_id: &'a str,
    item_id: &'a str,
    name: &'a str,
    unit_price: f64,
    quantity: i64,
    line_total: f64,
    notes: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct PaymentInsert<'a> {
    order_id: &'a str,
    amount: f64,
    method: PaymentMethod,
    currency: &'a str,
    status: PaymentStatus,
}

#[derive(Debug, Deserialize)]
struct QuantityRow {
    quantity: i64,
}

#[derive(Debug, Deserialize)]
struct OrderRow {
    id: serde_json::Value,
    #[serde(default)]
    subtotal: Option<f64>,
    #[serde(default)]
    tax: Option<f64>,
    #[serde(default)]
    total: Option<f64>,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    payment_method: Option<String>,
    #[serde(default)]
    notes: Option<String>,
    #[serde(default)]
    created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    order_items: Option<Vec<QuantityRow>>,
}

impl OrderRow {
    fn into_summary(self) -> StoreResult<OrderSummary> {
        let money = |v: Option<f64>| Money::from_major_f64(v.unwrap_or(0.0));
        Ok(OrderSummary {
            order_id: id_string(PersistStep::Orders, &self.id)?,
            subtotal: money(self.subtotal),
            tax: money(self.tax),
            total: money(self.total),
            status: parse_status(self.status.as_deref()),
            payment_method: self.payment_method.and_then(|m| m.parse().ok()),
            notes: self.notes,
            item_count: self
                .order_items
                .map(|rows| rows.iter().map(|r| r.quantity).sum())
                .unwrap_or(0),
            created_at: self.created_at.unwrap_or_else(Utc::now),
        })
    }
}

#[derive(Debug, Deserialize)]
struct TotalRow {
    #[serde(default)]
    total: Option<f64>,
    #[serde(default)]
    status: Option<String>,
}

/// Ids may be uuid strings or bigint serials depending on the table setup.
fn id_string(step: PersistStep, value: &serde_json::Value) -> StoreResult<String> {
    match value {
        serde_json::Value::String(s) => Ok(s.clone()),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        other => Err(StoreError::persistence(
            step,
            format!("unexpected id in response: {}", other),
        )),
    }
}

/// Statuses written by other tools are free text; unknown ones read as pending.
fn parse_status(status: Option<&str>) -> OrderStatus {
    match status.map(|s| s.trim().to_lowercase()) {
        Some(s) if s == "paid" || s == "completed" => OrderStatus::Paid,
        Some(s) if s == "voided" || s == "void" || s == "cancelled" => OrderStatus::Voided,
        _ => OrderStatus::Pending,
    }
}

// =============================================================================
// Client
// =============================================================================

#[derive(Debug, Clone)]
pub struct RestBackend {
    client: reqwest::Client,
    base_url: Url,
}

impl RestBackend {
    /// Builds the HTTP client with the auth headers baked in.
    pub fn new(config: &BackendConfig) -> StoreResult<Self> {
        let base_url = Url::parse(&format!("{}/{}/", config.url.trim_end_matches('/'), REST_PATH))
            .map_err(|e| StoreError::Configuration(format!("invalid backend URL: {}", e)))?;

        let key = HeaderValue::from_str(&config.api_key)
            .map_err(|_| StoreError::Configuration("invalid backend key".to_string()))?;
        let bearer = HeaderValue::from_str(&format!("Bearer {}", config.api_key))
            .map_err(|_| StoreError::Configuration("invalid backend key".to_string()))?;

        let mut headers = HeaderMap::new();
        headers.insert("apikey", key);
        headers.insert(AUTHORIZATION, bearer);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| StoreError::Configuration(format!("failed to build HTTP client: {}", e)))?;

        Ok(RestBackend { client, base_url })
    }

    /// `{base}/rest/v1/{table}?{query}`
    fn endpoint(&self, step: PersistStep, table: &str, query: &[(&str, String)]) -> StoreResult<Url> {
        let mut url = self
            .base_url
            .join(table)
            .map_err(|e| StoreError::persistence(step, e.to_string()))?;
        if !query.is_empty() {
            url.query_pairs_mut()
                .extend_pairs(query.iter().map(|(k, v)| (*k, v.as_str())));
        }
        Ok(url)
    }

    async fn send(&self, step: PersistStep, request: RequestBuilder) -> StoreResult<Response> {
        let response = request
            .send()
            .await
            .map_err(|e| StoreError::persistence(step, e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        warn!(step = %step, status = status.as_u16(), body = %body, "Backend rejected request");
        Err(StoreError::persistence(
            step,
            format!("HTTP {}: {}", status.as_u16(), body.trim()),
        ))
    }

    async fn read_json<T: DeserializeOwned>(step: PersistStep, response: Response) -> StoreResult<T> {
        response
            .json::<T>()
            .await
            .map_err(|e| StoreError::persistence(step, format!("unexpected response: {}", e)))
    }
}

#[async_trait]
impl OrderBackend for RestBackend {
    fn name(&self) -> &'static str {
        "rest"
    }

    async fn list_menu_items(&self) -> StoreResult<Vec<MenuItem>> {
        let step = PersistStep::Menu;
        let url = self.endpoint(
            step,
            "menu_items",
            &[
                ("select", "*".to_string()),
                ("order", "category.asc,name.asc".to_string()),
            ],
        )?;
        let response = self.send(step, self.client.get(url)).await?;
        let rows: Vec<MenuItemRow> = Self::read_json(step, response).await?;
        rows.into_iter().map(MenuItemRow::into_menu_item).collect()
    }

    async fn upsert_menu_item(&self, item: &MenuItem) -> StoreResult<MenuItem> {
        let step = PersistStep::Menu;
        let url = self.endpoint(step, "menu_items", &[])?;
        let request = self
            .client
            .post(url)
            .header(PREFER, "resolution=merge-duplicates,return=representation")
            .json(&[MenuItemWrite::from(item)]);
        let response = self.send(step, request).await?;
        let rows: Vec<MenuItemRow> = Self::read_json(step, response).await?;
        match rows.into_iter().next() {
            Some(row) => row.into_menu_item(),
            None => Ok(item.clone()),
        }
    }

    async fn delete_menu_item(&self, id: &str) -> StoreResult<()> {
        let step = PersistStep::Menu;
        let url = self.endpoint(step, "menu_items", &[("id", format!("eq.{}", id))])?;
        self.send(step, self.client.delete(url)).await?;
        Ok(())
    }

    async fn create_order(&self, order: &NewOrder) -> StoreResult<CreatedOrder> {
        let step = PersistStep::Order;
        let url = self.endpoint(step, "orders", &[("select", "id".to_string())])?;
        let request = self
            .client
            .post(url)
            .header(PREFER, "return=representation")
            .json(&OrderInsert::from(order));
        let response = self.send(step, request).await?;
        let rows: Vec<IdRow> = Self::read_json(step, response).await?;
        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| StoreError::persistence(step, "no row returned for created order"))?;
        let order_id = id_string(step, &row.id)?;
        debug!(order_id = %order_id, "Order created");
        Ok(CreatedOrder { order_id })
    }

    async fn create_order_items(
        &self,
        order_id: &str,
        items: &[OrderItemSnapshot],
    ) -> StoreResult<()> {
        let step = PersistStep::OrderItems;
        let url = self.endpoint(step, "order_items", &[])?;
        let rows: Vec<OrderItemInsert<'_>> = items
            .iter()
            .map(|item| OrderItemInsert {
                order_id,
                item_id: &item.item_id,
                name: &item.name,
                unit_price: item.unit_price.to_major_f64(),
                quantity: item.quantity,
                line_total: item.line_total.to_major_f64(),
                notes: item.notes.as_deref(),
            })
            .collect();
        self.send(step, self.client.post(url).json(&rows)).await?;
        Ok(())
    }

    async fn delete_order(&self, order_id: &str) -> StoreResult<()> {
        let step = PersistStep::DeleteOrder;
        let url = self.endpoint(step, "orders", &[("id", format!("eq.{}", order_id))])?;
        self.send(step, self.client.delete(url)).await?;
        Ok(())
    }

    async fn create_payment(&self, payment: &NewPayment) -> StoreResult<()> {
        let step = PersistStep::Payment;
        let url = self.endpoint(step, "payments", &[])?;
        let body = PaymentInsert {
            order_id: &payment.order_id,
            amount: payment.amount.to_major_f64(),
            method: payment.method,
            currency: &payment.currency,
            status: payment.status,
        };
        self.send(step, self.client.post(url).json(&body)).await?;
        Ok(())
    }

    async fn list_orders(&self, limit: usize) -> StoreResult<Vec<OrderSummary>> {
        let step = PersistStep::Orders;
        let url = self.endpoint(
            step,
            "orders",
            &[
                ("select", "*,order_items(quantity)".to_string()),
                ("order", "created_at.desc".to_string()),
                ("limit", limit.to_string()),
            ],
        )?;
        let response = self.send(step, self.client.get(url)).await?;
        let rows: Vec<OrderRow> = Self::read_json(step, response).await?;
        rows.into_iter().map(OrderRow::into_summary).collect()
    }

    async fn sales_summary(&self) -> StoreResult<SalesSummary> {
        let step = PersistStep::Summary;
        let url = self.endpoint(
            step,
            "orders",
            &[
                ("select", "total,status".to_string()),
                ("order", "created_at.desc".to_string()),
                ("limit", SUMMARY_WINDOW.to_string()),
            ],
        )?;
        let response = self.send(step, self.client.get(url)).await?;
        let rows: Vec<TotalRow> = Self::read_json(step, response).await?;

        let orders: Vec<OrderSummary> = rows
            .into_iter()
            .map(|row| {
                let total = Money::from_major_f64(row.total.unwrap_or(0.0));
                OrderSummary {
                    order_id: String::new(),
                    subtotal: total,
                    tax: Money::zero(),
                    total,
                    status: parse_status(row.status.as_deref()),
                    payment_method: None,
                    notes: None,
                    item_count: 0,
                    created_at: Utc::now(),
                }
            })
            .collect();
        Ok(summarize(&orders))
    }
}
