//! 结算流程测试
//!
//! 内存引擎 + 服务直测，不走 HTTP 层。

use api_server::AppError;
use api_server::db::DbService;
use api_server::db::models::{MenuItemCreate, RestaurantCreate, UserCreate};
use api_server::db::repository::{
    CartRepository, MenuItemRepository, OrderRepository, RestaurantRepository, UserRepository,
};
use api_server::orders::{CheckoutService, PlaceOrderRequest};
use rust_decimal::Decimal;
use shared::{DeliveryStatus, OrderStatus, OrderType, UserRole};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

fn dec(s: &str) -> Decimal {
    s.parse().unwrap()
}

async fn open_db() -> Surreal<Db> {
    DbService::open_in_memory().await.unwrap().into_inner()
}

async fn seed_customer(db: &Surreal<Db>, email: &str) -> String {
    let user = UserRepository::new(db.clone())
        .create(UserCreate {
            name: "Test Customer".into(),
            email: email.into(),
            phone: None,
            password_hash: "not-a-real-hash".into(),
            role: UserRole::Customer,
            restaurant: None,
        })
        .await
        .unwrap();
    user.id.unwrap().to_string()
}

async fn seed_restaurant(db: &Surreal<Db>) -> String {
    let restaurant = RestaurantRepository::new(db.clone())
        .create(RestaurantCreate {
            name: "Golden Wok".into(),
            address: "12 Noodle St".into(),
            contact_info: "555-0100".into(),
            location: None,
        })
        .await
        .unwrap();
    restaurant.id.unwrap().to_string()
}

async fn seed_menu_item(db: &Surreal<Db>, restaurant: &str, name: &str, price: &str) -> String {
    let item = MenuItemRepository::new(db.clone())
        .create(
            restaurant,
            MenuItemCreate {
                name: name.into(),
                description: None,
                price: dec(price),
                available: Some(true),
            },
        )
        .await
        .unwrap();
    item.id.unwrap().to_string()
}

#[tokio::test]
async fn empty_cart_checkout_is_rejected() {
    let db = open_db().await;
    let customer = seed_customer(&db, "alice@example.com").await;
    let restaurant = seed_restaurant(&db).await;

    let result = CheckoutService::new(db.clone())
        .place_order(
            &customer,
            PlaceOrderRequest {
                restaurant,
                order_type: OrderType::Pickup,
                delivery_address: None,
            },
        )
        .await;

    assert!(matches!(result, Err(AppError::Validation(_))));

    // 失败的结算不留下任何订单
    let orders = OrderRepository::new(db.clone()).find_all().await.unwrap();
    assert!(orders.is_empty());
}

#[tokio::test]
async fn delivery_order_requires_address() {
    let db = open_db().await;
    let customer = seed_customer(&db, "alice@example.com").await;
    let restaurant = seed_restaurant(&db).await;
    let burger = seed_menu_item(&db, &restaurant, "Burger", "9.50").await;
    CartRepository::new(db.clone())
        .add_item(&customer, &burger, 1)
        .await
        .unwrap();

    let service = CheckoutService::new(db.clone());

    // 完全没给地址
    let result = service
        .place_order(
            &customer,
            PlaceOrderRequest {
                restaurant: restaurant.clone(),
                order_type: OrderType::Delivery,
                delivery_address: None,
            },
        )
        .await;
    assert!(matches!(result, Err(AppError::Validation(_))));

    // 给了但只有空白
    let result = service
        .place_order(
            &customer,
            PlaceOrderRequest {
                restaurant,
                order_type: OrderType::Delivery,
                delivery_address: Some("   ".into()),
            },
        )
        .await;
    assert!(matches!(result, Err(AppError::Validation(_))));
}

#[tokio::test]
async fn checkout_totals_snapshot_and_clears_cart() {
    let db = open_db().await;
    let customer = seed_customer(&db, "alice@example.com").await;
    let restaurant = seed_restaurant(&db).await;
    let burger = seed_menu_item(&db, &restaurant, "Burger", "9.50").await;
    let fries = seed_menu_item(&db, &restaurant, "Fries", "3.00").await;

    let carts = CartRepository::new(db.clone());
    carts.add_item(&customer, &burger, 2).await.unwrap();
    carts.add_item(&customer, &fries, 1).await.unwrap();

    let detail = CheckoutService::new(db.clone())
        .place_order(
            &customer,
            PlaceOrderRequest {
                restaurant: restaurant.clone(),
                order_type: OrderType::Delivery,
                delivery_address: Some("34 Elm Ave".into()),
            },
        )
        .await
        .unwrap();

    // 9.50 × 2 + 3.00 × 1 = 22.00
    assert_eq!(detail.order.total, dec("22.00"));
    assert_eq!(detail.order.status, OrderStatus::Placed);
    assert_eq!(detail.items.len(), 2);

    let delivery = detail.delivery.expect("delivery order must have a delivery record");
    assert_eq!(delivery.status, DeliveryStatus::Pending);
    assert_eq!(delivery.delivery_address, "34 Elm Ave");
    assert!(delivery.agent.is_none());

    // 购物车已在同一事务里清空，且只产生了这一张订单
    let cart = carts.contents(&customer).await.unwrap();
    assert!(cart.is_empty());
    let orders = OrderRepository::new(db.clone()).find_all().await.unwrap();
    assert_eq!(orders.len(), 1);
}

#[tokio::test]
async fn price_change_after_checkout_keeps_snapshot() {
    let db = open_db().await;
    let customer = seed_customer(&db, "alice@example.com").await;
    let restaurant = seed_restaurant(&db).await;
    let burger = seed_menu_item(&db, &restaurant, "Burger", "9.50").await;

    CartRepository::new(db.clone())
        .add_item(&customer, &burger, 2)
        .await
        .unwrap();

    let detail = CheckoutService::new(db.clone())
        .place_order(
            &customer,
            PlaceOrderRequest {
                restaurant,
                order_type: OrderType::Pickup,
                delivery_address: None,
            },
        )
        .await
        .unwrap();
    let order_id = detail.order.id.unwrap().to_string();

    // 改价不影响已下订单的快照价
    MenuItemRepository::new(db.clone())
        .update(
            &burger,
            api_server::db::models::MenuItemUpdate {
                name: None,
                description: None,
                price: Some(dec("12.00")),
                available: None,
            },
        )
        .await
        .unwrap();

    let items = OrderRepository::new(db.clone())
        .line_items(&order_id)
        .await
        .unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].unit_price, dec("9.50"));

    let order = OrderRepository::new(db.clone())
        .find_by_id(&order_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(order.total, dec("19.00"));
}

#[tokio::test]
async fn pickup_order_has_no_delivery_record() {
    let db = open_db().await;
    let customer = seed_customer(&db, "alice@example.com").await;
    let restaurant = seed_restaurant(&db).await;
    let burger = seed_menu_item(&db, &restaurant, "Burger", "9.50").await;
    let fries = seed_menu_item(&db, &restaurant, "Fries", "3.00").await;

    let carts = CartRepository::new(db.clone());
    carts.add_item(&customer, &burger, 2).await.unwrap();
    carts.add_item(&customer, &fries, 1).await.unwrap();

    let detail = CheckoutService::new(db.clone())
        .place_order(
            &customer,
            PlaceOrderRequest {
                restaurant,
                order_type: OrderType::Pickup,
                delivery_address: None,
            },
        )
        .await
        .unwrap();

    assert!(detail.delivery.is_none());
    assert_eq!(detail.items.len(), 2);
    assert_eq!(detail.order.total, dec("22.00"));
}

#[tokio::test]
async fn deactivated_restaurant_rejects_orders() {
    let db = open_db().await;
    let customer = seed_customer(&db, "alice@example.com").await;
    let restaurant = seed_restaurant(&db).await;
    let fries = seed_menu_item(&db, &restaurant, "Fries", "3.00").await;

    CartRepository::new(db.clone())
        .add_item(&customer, &fries, 1)
        .await
        .unwrap();

    RestaurantRepository::new(db.clone())
        .deactivate(&restaurant)
        .await
        .unwrap();

    let result = CheckoutService::new(db.clone())
        .place_order(
            &customer,
            PlaceOrderRequest {
                restaurant,
                order_type: OrderType::Pickup,
                delivery_address: None,
            },
        )
        .await;

    assert!(matches!(result, Err(AppError::NotFound(_))));
}
