//! Database Models
//!
//! 实体 + Create/Update DTO。引用字段一律存 "table:id" 字符串，
//! 主键 `id` 用 RecordId (序列化为字符串)。

// Serde helpers
pub mod serde_helpers;

// Auth
pub mod user;

// Catalog
pub mod menu_item;
pub mod restaurant;

// Cart & Orders
pub mod cart;
pub mod delivery;
pub mod order;

// Re-exports
pub use cart::{CartEntry, CartLine, CartView};
pub use delivery::DeliveryRecord;
pub use menu_item::{MenuItem, MenuItemCreate, MenuItemUpdate};
pub use order::{Order, OrderDetail, OrderLineItem};
pub use restaurant::{Restaurant, RestaurantCreate, RestaurantUpdate};
pub use user::{User, UserCreate, UserResponse};
