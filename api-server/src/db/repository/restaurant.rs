//! Restaurant Repository

use super::{BaseRepository, RepoError, RepoResult, new_record_id, now_rfc3339, parse_record_id};
use crate::db::models::{Restaurant, RestaurantCreate, RestaurantUpdate};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const RESTAURANT_TABLE: &str = "restaurant";

#[derive(Clone)]
pub struct RestaurantRepository {
    base: BaseRepository,
}

impl RestaurantRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find all active restaurants
    pub async fn find_all_active(&self) -> RepoResult<Vec<Restaurant>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM restaurant WHERE is_active = true ORDER BY created_at DESC")
            .await?;
        let restaurants: Vec<Restaurant> = result.take(0)?;
        Ok(restaurants)
    }

    /// Find all restaurants including inactive (admin 视图)
    pub async fn find_all(&self) -> RepoResult<Vec<Restaurant>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM restaurant ORDER BY created_at DESC")
            .await?;
        let restaurants: Vec<Restaurant> = result.take(0)?;
        Ok(restaurants)
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Restaurant>> {
        let record_id = parse_record_id(RESTAURANT_TABLE, id)?;
        let restaurant: Option<Restaurant> = self.base.db().select(record_id).await?;
        Ok(restaurant)
    }

    pub async fn create(&self, data: RestaurantCreate) -> RepoResult<Restaurant> {
        let id = new_record_id(RESTAURANT_TABLE);
        let restaurant = Restaurant {
            id: None,
            name: data.name,
            address: data.address,
            contact_info: data.contact_info,
            location: data.location,
            is_active: true,
            created_at: Some(now_rfc3339()),
        };

        let created: Option<Restaurant> = self.base.db().create(id).content(restaurant).await?;
        created.ok_or_else(|| RepoError::Database("Restaurant creation returned nothing".into()))
    }

    pub async fn update(&self, id: &str, data: RestaurantUpdate) -> RepoResult<Restaurant> {
        let record_id = parse_record_id(RESTAURANT_TABLE, id)?;

        let mut restaurant: Restaurant = self
            .base
            .db()
            .select(record_id.clone())
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Restaurant {} not found", id)))?;

        if let Some(name) = data.name {
            restaurant.name = name;
        }
        if let Some(address) = data.address {
            restaurant.address = address;
        }
        if let Some(contact_info) = data.contact_info {
            restaurant.contact_info = contact_info;
        }
        if let Some(location) = data.location {
            restaurant.location = Some(location);
        }
        if let Some(is_active) = data.is_active {
            restaurant.is_active = is_active;
        }

        // content 里不带 id，避免与记录自身的 id 冲突
        restaurant.id = None;

        let updated: Option<Restaurant> = self
            .base
            .db()
            .update(record_id)
            .content(restaurant)
            .await?;
        updated.ok_or_else(|| RepoError::NotFound(format!("Restaurant {} not found", id)))
    }

    /// 软删除：置 is_active = false
    pub async fn deactivate(&self, id: &str) -> RepoResult<Restaurant> {
        let record_id = parse_record_id(RESTAURANT_TABLE, id)?;
        let mut result = self
            .base
            .db()
            .query("UPDATE $id SET is_active = false")
            .bind(("id", record_id))
            .await?;
        let restaurants: Vec<Restaurant> = result.take(0)?;
        restaurants
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("Restaurant {} not found", id)))
    }
}
