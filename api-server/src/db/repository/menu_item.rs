//! MenuItem Repository

use super::{BaseRepository, RepoError, RepoResult, new_record_id, now_rfc3339, parse_record_id};
use crate::db::models::{MenuItem, MenuItemCreate, MenuItemUpdate};
use rust_decimal::Decimal;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const MENU_ITEM_TABLE: &str = "menu_item";

#[derive(Clone)]
pub struct MenuItemRepository {
    base: BaseRepository,
}

impl MenuItemRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find menu items for a restaurant
    ///
    /// `available_only` 为顾客视图；经理看全量
    pub async fn find_by_restaurant(
        &self,
        restaurant: &str,
        available_only: bool,
    ) -> RepoResult<Vec<MenuItem>> {
        let sql = if available_only {
            "SELECT * FROM menu_item WHERE restaurant = $restaurant AND available = true ORDER BY name"
        } else {
            "SELECT * FROM menu_item WHERE restaurant = $restaurant ORDER BY name"
        };
        let mut result = self
            .base
            .db()
            .query(sql)
            .bind(("restaurant", restaurant.to_string()))
            .await?;
        let items: Vec<MenuItem> = result.take(0)?;
        Ok(items)
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<MenuItem>> {
        let record_id = parse_record_id(MENU_ITEM_TABLE, id)?;
        let item: Option<MenuItem> = self.base.db().select(record_id).await?;
        Ok(item)
    }

    pub async fn create(&self, restaurant: &str, data: MenuItemCreate) -> RepoResult<MenuItem> {
        if data.price < Decimal::ZERO {
            return Err(RepoError::Validation("price must be non-negative".into()));
        }

        let id = new_record_id(MENU_ITEM_TABLE);
        let item = MenuItem {
            id: None,
            restaurant: restaurant.to_string(),
            name: data.name,
            description: data.description,
            price: data.price,
            available: data.available.unwrap_or(true),
            created_at: Some(now_rfc3339()),
        };

        let created: Option<MenuItem> = self.base.db().create(id).content(item).await?;
        created.ok_or_else(|| RepoError::Database("Menu item creation returned nothing".into()))
    }

    pub async fn update(&self, id: &str, data: MenuItemUpdate) -> RepoResult<MenuItem> {
        if let Some(price) = data.price
            && price < Decimal::ZERO
        {
            return Err(RepoError::Validation("price must be non-negative".into()));
        }

        let record_id = parse_record_id(MENU_ITEM_TABLE, id)?;

        let mut item: MenuItem = self
            .base
            .db()
            .select(record_id.clone())
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Menu item {} not found", id)))?;

        if let Some(name) = data.name {
            item.name = name;
        }
        if let Some(description) = data.description {
            item.description = Some(description);
        }
        if let Some(price) = data.price {
            item.price = price;
        }
        if let Some(available) = data.available {
            item.available = available;
        }

        item.id = None;

        let updated: Option<MenuItem> = self.base.db().update(record_id).content(item).await?;
        updated.ok_or_else(|| RepoError::NotFound(format!("Menu item {} not found", id)))
    }

    pub async fn delete(&self, id: &str) -> RepoResult<bool> {
        let record_id = parse_record_id(MENU_ITEM_TABLE, id)?;
        let deleted: Option<MenuItem> = self.base.db().delete(record_id).await?;
        Ok(deleted.is_some())
    }
}
