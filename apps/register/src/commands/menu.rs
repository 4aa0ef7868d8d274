//! # Menu Commands
//!
//! Loads the catalog for the menu grid and handles menu management.
//!
//! Reads degrade: if the backend cannot list the menu, the register keeps
//! taking orders from a built-in sample menu. Writes do not degrade; a
//! failed save or delete is reported to the operator.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use harvest_core::validation::{menu_item_from_input, validate_menu_item};
use harvest_core::{MenuItem, Money};
use harvest_store::OrderBackend;

use crate::error::RegisterResult;

/// Where the catalog came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MenuSource {
    Live,
    Fallback,
}

/// Menu shown in the grid.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Catalog {
    pub items: Vec<MenuItem>,
    pub source: MenuSource,
    /// Persistent notice when the backend is not configured at all.
    pub banner: Option<String>,
}

/// Grid filters. Empty fields match everything.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuQuery {
    pub category: Option<String>,
    pub search: Option<String>,
    #[serde(default)]
    pub include_inactive: bool,
}

/// Menu management form as typed by the operator.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItemForm {
    /// None creates a new item.
    pub id: Option<String>,
    pub name: String,
    pub price: String,
    pub category: String,
    #[serde(default = "default_active")]
    pub is_active: bool,
    pub image_url: Option<String>,
}

fn default_active() -> bool {
    true
}

/// Sample menu used when the backend is unreachable.
pub fn fallback_menu() -> Vec<MenuItem> {
    [
        ("m1", "Pumpkin Spice Latte", 525, "Coffee"),
        ("m2", "Caramel Apple Cider", 450, "Tea"),
        ("m3", "Maple Cold Brew", 500, "Coffee"),
        ("m4", "Butternut Squash Soup", 625, "Food"),
        ("m5", "Cranberry Scone", 350, "Bakery"),
        ("m6", "Pecan Pie Slice", 425, "Bakery"),
        ("m7", "Chai Latte", 475, "Tea"),
        ("m8", "Turkey Panini", 795, "Food"),
    ]
    .into_iter()
    .map(|(id, name, cents, category)| MenuItem::new(id, name, Money::from_cents(cents), category))
    .collect()
}

impl Catalog {
    /// Lists the live menu, falling back to [`fallback_menu`] on any error.
    pub async fn load(backend: &dyn OrderBackend) -> Catalog {
        match backend.list_menu_items().await {
            Ok(mut items) => {
                items.sort_by(|a, b| a.category.cmp(&b.category).then_with(|| a.name.cmp(&b.name)));
                info!(count = items.len(), backend = backend.name(), "Menu loaded");
                Catalog {
                    items,
                    source: MenuSource::Live,
                    banner: None,
                }
            }
            Err(e) => {
                warn!(error = %e, "Menu unavailable; using sample menu");
                let banner = e
                    .is_configuration()
                    .then(|| format!("{e}. Showing the sample menu."));
                Catalog::fallback(banner)
            }
        }
    }

    pub fn fallback(banner: Option<String>) -> Catalog {
        Catalog {
            items: fallback_menu(),
            source: MenuSource::Fallback,
            banner,
        }
    }

    pub fn find(&self, id: &str) -> Option<&MenuItem> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Items matching `query`, in catalog order.
    pub fn query(&self, query: &MenuQuery) -> Vec<&MenuItem> {
        let category = query
            .category
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty());
        let search = query
            .search
            .as_deref()
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty());

        self.items
            .iter()
            .filter(|item| query.include_inactive || item.is_active)
            .filter(|item| category.map_or(true, |c| item.category.eq_ignore_ascii_case(c)))
            .filter(|item| {
                search
                    .as_deref()
                    .map_or(true, |s| item.name.to_lowercase().contains(s))
            })
            .collect()
    }

    /// Distinct categories in first-seen order.
    pub fn categories(&self) -> Vec<String> {
        let mut seen: Vec<String> = Vec::new();
        for item in &self.items {
            if !seen.contains(&item.category) {
                seen.push(item.category.clone());
            }
        }
        seen
    }
}

/// Creates or updates a menu item.
pub async fn save_menu_item(
    backend: &dyn OrderBackend,
    form: MenuItemForm,
) -> RegisterResult<MenuItem> {
    let id = form
        .id
        .filter(|id| !id.trim().is_empty())
        .unwrap_or_else(|| Uuid::new_v4().to_string());
    let mut item = menu_item_from_input(&id, &form.name, &form.price, &form.category)?;
    item.is_active = form.is_active;
    item.image_url = form.image_url.filter(|url| !url.trim().is_empty());
    validate_menu_item(&item)?;

    let saved = backend.upsert_menu_item(&item).await?;
    info!(item_id = %saved.id, name = %saved.name, "Menu item saved");
    Ok(saved)
}

pub async fn delete_menu_item(backend: &dyn OrderBackend, id: &str) -> RegisterResult<()> {
    backend.delete_menu_item(id).await?;
    info!(item_id = %id, "Menu item deleted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RegisterError;
    use harvest_core::ValidationError;
    use harvest_store::{MemoryBackend, OfflineBackend, PersistStep};

    fn form(id: Option<&str>, name: &str, price: &str) -> MenuItemForm {
        MenuItemForm {
            id: id.map(str::to_string),
            name: name.to_string(),
            price: price.to_string(),
            category: "Coffee".to_string(),
            is_active: true,
            image_url: None,
        }
    }

    #[tokio::test]
    async fn test_live_menu_sorted() {
        let backend = MemoryBackend::new().with_menu(vec![
            MenuItem::new("b", "Scone", Money::from_cents(350), "Bakery"),
            MenuItem::new("c2", "Mocha", Money::from_cents(500), "Coffee"),
            MenuItem::new("c1", "Americano", Money::from_cents(300), "Coffee"),
        ]);
        let catalog = Catalog::load(&backend).await;

        assert_eq!(catalog.source, MenuSource::Live);
        let ids: Vec<&str> = catalog.items.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "c1", "c2"]);
        assert_eq!(catalog.categories(), vec!["Bakery", "Coffee"]);
    }

    #[tokio::test]
    async fn test_read_failure_falls_back_without_banner() {
        let backend = MemoryBackend::new();
        backend.fail_once(PersistStep::Menu, "HTTP 503");
        let catalog = Catalog::load(&backend).await;

        assert_eq!(catalog.source, MenuSource::Fallback);
        assert_eq!(catalog.items.len(), 8);
        assert!(catalog.banner.is_none());
    }

    #[tokio::test]
    async fn test_unconfigured_backend_sets_banner() {
        let backend = OfflineBackend::new("HARVEST_BACKEND_URL is not set");
        let catalog = Catalog::load(&backend).await;

        assert_eq!(catalog.source, MenuSource::Fallback);
        let banner = catalog.banner.unwrap();
        assert!(banner.contains("not configured"));
    }

    #[test]
    fn test_query_filters() {
        let mut catalog = Catalog::fallback(None);
        catalog.items[0].is_active = false;

        let coffee = catalog.query(&MenuQuery {
            category: Some("coffee".into()),
            ..Default::default()
        });
        assert_eq!(coffee.len(), 1);
        assert_eq!(coffee[0].id, "m3");

        let lattes = catalog.query(&MenuQuery {
            search: Some("LATTE".into()),
            include_inactive: true,
            ..Default::default()
        });
        assert_eq!(lattes.len(), 2);

        assert_eq!(catalog.query(&MenuQuery::default()).len(), 7);
    }

    #[tokio::test]
    async fn test_save_new_item_gets_id() {
        let backend = MemoryBackend::new();
        let saved = save_menu_item(&backend, form(None, "Cortado", "3.75"))
            .await
            .unwrap();

        assert!(!saved.id.is_empty());
        assert_eq!(saved.price.cents(), 375);
        assert_eq!(Catalog::load(&backend).await.items.len(), 1);
    }

    #[tokio::test]
    async fn test_save_rejects_bad_input_without_calling_backend() {
        let backend = MemoryBackend::new();
        let err = save_menu_item(&backend, form(Some("x"), "Cortado", "-1"))
            .await
            .unwrap_err();

        assert!(matches!(err, RegisterError::Validation(ValidationError::Negative { .. })));
        assert_eq!(backend.total_calls(), 0);
    }

    #[tokio::test]
    async fn test_write_failures_propagate() {
        let backend = OfflineBackend::new("no backend");
        assert!(save_menu_item(&backend, form(Some("x"), "Cortado", "3.75"))
            .await
            .is_err());
        assert!(delete_menu_item(&backend, "x").await.is_err());
    }
}
