//! 购物车行为测试
//!
//! 加购累加、改量、删行、清空，总价始终现算。

use api_server::db::DbService;
use api_server::db::models::{MenuItemCreate, MenuItemUpdate, RestaurantCreate, UserCreate};
use api_server::db::repository::{
    CartRepository, MenuItemRepository, RepoError, RestaurantRepository, UserRepository,
};
use rust_decimal::Decimal;
use shared::UserRole;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

fn dec(s: &str) -> Decimal {
    s.parse().unwrap()
}

struct Fixture {
    db: Surreal<Db>,
    customer: String,
    burger: String,
    fries: String,
}

async fn setup() -> Fixture {
    let db = DbService::open_in_memory().await.unwrap().into_inner();

    let customer = UserRepository::new(db.clone())
        .create(UserCreate {
            name: "Alice".into(),
            email: "alice@example.com".into(),
            phone: None,
            password_hash: "not-a-real-hash".into(),
            role: UserRole::Customer,
            restaurant: None,
        })
        .await
        .unwrap()
        .id
        .unwrap()
        .to_string();

    let restaurant = RestaurantRepository::new(db.clone())
        .create(RestaurantCreate {
            name: "Golden Wok".into(),
            address: "12 Noodle St".into(),
            contact_info: "555-0100".into(),
            location: None,
        })
        .await
        .unwrap()
        .id
        .unwrap()
        .to_string();

    let menu = MenuItemRepository::new(db.clone());
    let burger = menu
        .create(
            &restaurant,
            MenuItemCreate {
                name: "Burger".into(),
                description: None,
                price: dec("9.50"),
                available: Some(true),
            },
        )
        .await
        .unwrap()
        .id
        .unwrap()
        .to_string();
    let fries = menu
        .create(
            &restaurant,
            MenuItemCreate {
                name: "Fries".into(),
                description: None,
                price: dec("3.00"),
                available: Some(true),
            },
        )
        .await
        .unwrap()
        .id
        .unwrap()
        .to_string();

    Fixture {
        db,
        customer,
        burger,
        fries,
    }
}

#[tokio::test]
async fn adding_same_item_accumulates_quantity() {
    let fx = setup().await;
    let carts = CartRepository::new(fx.db.clone());

    carts.add_item(&fx.customer, &fx.burger, 1).await.unwrap();
    carts.add_item(&fx.customer, &fx.burger, 2).await.unwrap();

    let cart = carts.contents(&fx.customer).await.unwrap();
    assert_eq!(cart.items.len(), 1);
    assert_eq!(cart.items[0].quantity, 3);
    assert_eq!(cart.items[0].subtotal, dec("28.50"));
    assert_eq!(cart.total, dec("28.50"));
}

#[tokio::test]
async fn total_is_recomputed_on_every_read() {
    let fx = setup().await;
    let carts = CartRepository::new(fx.db.clone());

    carts.add_item(&fx.customer, &fx.burger, 2).await.unwrap();
    carts.add_item(&fx.customer, &fx.fries, 1).await.unwrap();
    assert_eq!(carts.contents(&fx.customer).await.unwrap().total, dec("22.00"));

    // 改价后读购物车立刻反映新价 (快照只在下单时定格)
    MenuItemRepository::new(fx.db.clone())
        .update(
            &fx.burger,
            MenuItemUpdate {
                name: None,
                description: None,
                price: Some(dec("10.00")),
                available: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(carts.contents(&fx.customer).await.unwrap().total, dec("23.00"));
}

#[tokio::test]
async fn zero_quantity_removes_the_line() {
    let fx = setup().await;
    let carts = CartRepository::new(fx.db.clone());

    carts.add_item(&fx.customer, &fx.burger, 2).await.unwrap();
    let cart = carts.contents(&fx.customer).await.unwrap();
    let entry_id = cart.items[0].entry_id.clone();

    let removed = carts
        .set_quantity(&fx.customer, &entry_id, 0)
        .await
        .unwrap();
    assert!(removed.is_none());
    assert!(carts.contents(&fx.customer).await.unwrap().is_empty());

    // 再删一次也是成功 (幂等)
    carts
        .set_quantity(&fx.customer, &entry_id, 0)
        .await
        .unwrap();
}

#[tokio::test]
async fn negative_add_quantity_is_rejected() {
    let fx = setup().await;
    let carts = CartRepository::new(fx.db.clone());

    let result = carts.add_item(&fx.customer, &fx.burger, -1).await;
    assert!(matches!(result, Err(RepoError::Validation(_))));
}

#[tokio::test]
async fn unavailable_item_cannot_be_added() {
    let fx = setup().await;

    MenuItemRepository::new(fx.db.clone())
        .update(
            &fx.burger,
            MenuItemUpdate {
                name: None,
                description: None,
                price: None,
                available: Some(false),
            },
        )
        .await
        .unwrap();

    let result = CartRepository::new(fx.db.clone())
        .add_item(&fx.customer, &fx.burger, 1)
        .await;
    assert!(matches!(result, Err(RepoError::NotFound(_))));
}

#[tokio::test]
async fn clear_removes_everything_and_is_idempotent() {
    let fx = setup().await;
    let carts = CartRepository::new(fx.db.clone());

    carts.add_item(&fx.customer, &fx.burger, 1).await.unwrap();
    carts.add_item(&fx.customer, &fx.fries, 2).await.unwrap();

    carts.clear(&fx.customer).await.unwrap();
    assert!(carts.contents(&fx.customer).await.unwrap().is_empty());

    // 空车再清一次不报错
    carts.clear(&fx.customer).await.unwrap();
}

#[tokio::test]
async fn delisted_item_is_dropped_from_the_view() {
    let fx = setup().await;
    let carts = CartRepository::new(fx.db.clone());

    carts.add_item(&fx.customer, &fx.burger, 1).await.unwrap();
    carts.add_item(&fx.customer, &fx.fries, 1).await.unwrap();

    // 菜品被删除后，残留的购物车行不再出现在视图里
    MenuItemRepository::new(fx.db.clone())
        .delete(&fx.burger)
        .await
        .unwrap();

    let cart = carts.contents(&fx.customer).await.unwrap();
    assert_eq!(cart.items.len(), 1);
    assert_eq!(cart.items[0].name, "Fries");
    assert_eq!(cart.total, dec("3.00"));
}

#[tokio::test]
async fn signup_email_collision_is_a_duplicate() {
    let fx = setup().await;
    let users = UserRepository::new(fx.db.clone());

    let result = users
        .create(UserCreate {
            name: "Impostor".into(),
            email: "alice@example.com".into(),
            phone: None,
            password_hash: "not-a-real-hash".into(),
            role: UserRole::Customer,
            restaurant: None,
        })
        .await;
    assert!(matches!(result, Err(RepoError::Duplicate(_))));
}
