//! Cart Repository
//!
//! cart_item 主键是 `(customer, menu_item)` 的确定性组合键，
//! 新增数量走单条 UPSERT，不存在"先查再插"的窗口期。
//! 合计只在读取时重算，任何存储的合计都不可信。

use super::{BaseRepository, RepoError, RepoResult, now_rfc3339, parse_record_id};
use crate::db::models::{CartEntry, CartLine, CartView, MenuItem};
use crate::orders::money;
use surrealdb::{RecordId, Surreal};
use surrealdb::engine::local::Db;

const CART_ITEM_TABLE: &str = "cart_item";
const MENU_ITEM_TABLE: &str = "menu_item";

/// 组合键：cart_item:⟨customer-key⟩_⟨menu-key⟩
fn entry_record_id(customer: &RecordId, menu_item: &RecordId) -> RecordId {
    RecordId::from_table_key(
        CART_ITEM_TABLE,
        format!("{}_{}", customer.key(), menu_item.key()),
    )
}

#[derive(Clone)]
pub struct CartRepository {
    base: BaseRepository,
}

impl CartRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Add quantity to the customer's cart (atomic upsert)
    ///
    /// 已有行累加数量，否则创建；menu_item 不存在或已下架返回 NotFound。
    pub async fn add_item(
        &self,
        customer: &str,
        menu_item: &str,
        quantity: i64,
    ) -> RepoResult<CartEntry> {
        if quantity <= 0 {
            return Err(RepoError::Validation("quantity must be positive".into()));
        }

        let customer_id = parse_record_id("user", customer)?;
        let menu_id = parse_record_id(MENU_ITEM_TABLE, menu_item)?;

        // 校验菜品存在且可售
        let item: Option<MenuItem> = self.base.db().select(menu_id.clone()).await?;
        match item {
            Some(item) if item.available => {}
            _ => {
                return Err(RepoError::NotFound(format!(
                    "Menu item {} not found or unavailable",
                    menu_item
                )));
            }
        }

        let entry_id = entry_record_id(&customer_id, &menu_id);
        let mut result = self
            .base
            .db()
            .query(
                "UPSERT $entry SET \
                    customer = $customer, \
                    menu_item = $menu_item, \
                    quantity = (quantity ?? 0) + $quantity, \
                    updated_at = $now",
            )
            .bind(("entry", entry_id))
            .bind(("customer", customer.to_string()))
            .bind(("menu_item", menu_item.to_string()))
            .bind(("quantity", quantity))
            .bind(("now", now_rfc3339()))
            .await?;
        let entries: Vec<CartEntry> = result.take(0)?;
        entries
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::Database("Cart upsert returned nothing".into()))
    }

    /// Set quantity of a cart entry
    ///
    /// quantity <= 0 删除该行 (幂等)；quantity > 0 更新，行不存在返回 NotFound。
    /// 只允许操作属于 `customer` 的行。
    pub async fn set_quantity(
        &self,
        customer: &str,
        entry: &str,
        quantity: i64,
    ) -> RepoResult<Option<CartEntry>> {
        let entry_id = parse_record_id(CART_ITEM_TABLE, entry)?;

        if quantity <= 0 {
            // 幂等删除：行不存在也算成功
            self.base
                .db()
                .query("DELETE $entry WHERE customer = $customer")
                .bind(("entry", entry_id))
                .bind(("customer", customer.to_string()))
                .await?
                .check()?;
            return Ok(None);
        }

        let mut result = self
            .base
            .db()
            .query(
                "UPDATE $entry SET quantity = $quantity, updated_at = $now \
                 WHERE customer = $customer",
            )
            .bind(("entry", entry_id))
            .bind(("quantity", quantity))
            .bind(("now", now_rfc3339()))
            .bind(("customer", customer.to_string()))
            .await?;
        let entries: Vec<CartEntry> = result.take(0)?;
        entries
            .into_iter()
            .next()
            .map(Some)
            .ok_or_else(|| RepoError::NotFound(format!("Cart entry {} not found", entry)))
    }

    /// 购物车行 (原始存储，不含菜品信息)
    pub async fn entries(&self, customer: &str) -> RepoResult<Vec<CartEntry>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM cart_item WHERE customer = $customer ORDER BY updated_at")
            .bind(("customer", customer.to_string()))
            .await?;
        let entries: Vec<CartEntry> = result.take(0)?;
        Ok(entries)
    }

    /// Cart contents with current menu name/price and computed totals
    ///
    /// 纯计算视图：每行小计与合计都在读取时重算。
    /// 菜品已被删除的行跳过 (与原系统行为一致)。
    pub async fn contents(&self, customer: &str) -> RepoResult<CartView> {
        let entries = self.entries(customer).await?;
        if entries.is_empty() {
            return Ok(CartView::empty());
        }

        let mut items = Vec::with_capacity(entries.len());
        let mut subtotals = Vec::with_capacity(entries.len());

        for entry in entries {
            let menu_id = parse_record_id(MENU_ITEM_TABLE, &entry.menu_item)?;
            let menu: Option<MenuItem> = self.base.db().select(menu_id).await?;
            let Some(menu) = menu else {
                continue;
            };

            let subtotal = money::line_subtotal(menu.price, entry.quantity);
            subtotals.push(subtotal);
            items.push(CartLine {
                entry_id: entry.id.map(|id| id.to_string()).unwrap_or_default(),
                menu_item: entry.menu_item,
                name: menu.name,
                unit_price: menu.price,
                quantity: entry.quantity,
                subtotal,
            });
        }

        Ok(CartView {
            total: money::sum_lines(subtotals),
            items,
        })
    }

    /// Clear all entries of the customer's cart (幂等)
    pub async fn clear(&self, customer: &str) -> RepoResult<()> {
        self.base
            .db()
            .query("DELETE cart_item WHERE customer = $customer")
            .bind(("customer", customer.to_string()))
            .await?
            .check()?;
        Ok(())
    }
}
