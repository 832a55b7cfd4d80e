//! Checkout - 购物车结算
//!
//! 把顾客购物车原子地转换为 订单 + 订单行 (+ 配送单)，并清空购物车。
//! 全部写入在一个 SurrealDB 事务里：任何一步失败则整体回滚，
//! 不存在"行已建而订单未提交"的中间态。

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shared::{DeliveryStatus, OrderStatus, OrderType};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use crate::db::models::{DeliveryRecord, Order, OrderDetail, OrderLineItem};
use crate::db::repository::{
    self, CartRepository, DeliveryRepository, OrderRepository, RestaurantRepository,
    order::ORDER_TABLE,
};
use crate::orders::money;
use crate::utils::{AppError, AppResult};

/// 结算请求
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaceOrderRequest {
    /// 餐厅 ("restaurant:xxx")
    pub restaurant: String,
    pub order_type: OrderType,
    /// order_type = delivery 时必填
    #[serde(default)]
    pub delivery_address: Option<String>,
}

/// 结算服务
#[derive(Clone)]
pub struct CheckoutService {
    db: Surreal<Db>,
}

impl CheckoutService {
    pub fn new(db: Surreal<Db>) -> Self {
        Self { db }
    }

    /// Place an order from the customer's cart
    ///
    /// 1. 空购物车 / 外送缺地址 → Validation
    /// 2. 事务内：创建订单 (placed)、按当前菜单价快照创建订单行、
    ///    外送单 (pending)、清空购物车
    /// 3. 之后菜单改价不影响已建订单行 (快照价)
    pub async fn place_order(
        &self,
        customer: &str,
        request: PlaceOrderRequest,
    ) -> AppResult<OrderDetail> {
        if request.order_type == OrderType::Delivery
            && request
                .delivery_address
                .as_deref()
                .is_none_or(|addr| addr.trim().is_empty())
        {
            return Err(AppError::validation(
                "delivery_address is required for delivery orders",
            ));
        }

        let restaurants = RestaurantRepository::new(self.db.clone());
        let restaurant = restaurants
            .find_by_id(&request.restaurant)
            .await?
            .filter(|r| r.is_active)
            .ok_or_else(|| {
                AppError::not_found(format!("Restaurant {} not found", request.restaurant))
            })?;

        let carts = CartRepository::new(self.db.clone());
        let cart = carts.contents(customer).await?;
        if cart.is_empty() {
            return Err(AppError::validation("cart is empty"));
        }

        let now = repository::now_rfc3339();
        let order_rid = repository::new_record_id(ORDER_TABLE);
        let order_ref = order_rid.to_string();

        // 快照：订单行记录下单时刻的菜品名与单价
        let items: Vec<OrderLineItem> = cart
            .items
            .iter()
            .map(|line| OrderLineItem {
                id: None,
                order_id: order_ref.clone(),
                menu_item: line.menu_item.clone(),
                name: line.name.clone(),
                quantity: line.quantity,
                unit_price: line.unit_price,
            })
            .collect();
        let total: Decimal =
            money::sum_lines(items.iter().map(|i| money::line_subtotal(i.unit_price, i.quantity)));

        let order = Order {
            id: None,
            customer: customer.to_string(),
            restaurant: request.restaurant.clone(),
            order_type: request.order_type,
            status: OrderStatus::Placed,
            delivery_address: request.delivery_address.clone(),
            total,
            created_at: Some(now.clone()),
            updated_at: Some(now.clone()),
        };

        let delivery = (request.order_type == OrderType::Delivery).then(|| DeliveryRecord {
            id: None,
            order_id: order_ref.clone(),
            status: DeliveryStatus::Pending,
            pickup_location: Some(restaurant.address.clone()),
            delivery_address: request.delivery_address.clone().unwrap_or_default(),
            agent: None,
            created_at: Some(now.clone()),
            updated_at: Some(now),
        });

        // 原子提交：订单 + 订单行 + 配送单 + 清空购物车
        let mut query = self
            .db
            .query("BEGIN TRANSACTION")
            .query("CREATE $order_rid CONTENT $order");
        for (i, _) in items.iter().enumerate() {
            query = query.query(format!("CREATE order_item CONTENT $item{}", i));
        }
        if delivery.is_some() {
            query = query.query("CREATE delivery CONTENT $delivery");
        }
        query = query
            .query("DELETE cart_item WHERE customer = $customer")
            .query("COMMIT TRANSACTION")
            .bind(("order_rid", order_rid.clone()))
            .bind(("order", order))
            .bind(("customer", customer.to_string()));
        for (i, item) in items.into_iter().enumerate() {
            query = query.bind((format!("item{}", i), item));
        }
        if let Some(delivery) = delivery {
            query = query.bind(("delivery", delivery));
        }

        query
            .await
            .map_err(|e| AppError::database(e.to_string()))?
            .check()
            .map_err(|e| AppError::database(format!("Checkout transaction failed: {}", e)))?;

        // 事务已提交，读回完整订单
        let orders = OrderRepository::new(self.db.clone());
        let order = orders
            .find_by_id(&order_ref)
            .await?
            .ok_or_else(|| AppError::database("Order vanished after checkout".to_string()))?;
        let items = orders.line_items(&order_ref).await?;
        let delivery = DeliveryRepository::new(self.db.clone())
            .find_by_order(&order_ref)
            .await?;

        tracing::info!(
            order = %order_ref,
            customer = %customer,
            total = %order.total,
            order_type = %order.order_type,
            "Order placed"
        );

        Ok(OrderDetail {
            order,
            items,
            delivery,
        })
    }
}
