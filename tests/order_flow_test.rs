//! # 下单全流程集成测试
//!
//! 覆盖从注册、登录、加购到结账的完整业务场景，
//! 以及单活跃会话策略对旧令牌的影响。

use migration::MigratorTrait;
use pretty_assertions::assert_eq;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};

use shop_api::{
    auth::AuthService,
    cart::CartService,
    catalog::{CatalogService, CreateItemRequest},
    checkout::CheckoutService,
    orders::OrdersService,
};

/// 创建内存数据库并应用全部迁移
///
/// SQLite 内存库按连接隔离，连接池限制为单连接。
async fn setup() -> DatabaseConnection {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options.max_connections(1);
    let db = Database::connect(options)
        .await
        .expect("连接内存数据库失败");
    migration::Migrator::up(&db, None)
        .await
        .expect("应用迁移失败");
    db
}

async fn seed_item(db: &DatabaseConnection, name: &str, price: f64) -> i32 {
    CatalogService::new(db)
        .create_item(CreateItemRequest {
            name: name.to_string(),
            price,
            description: None,
            image_url: None,
        })
        .await
        .expect("创建商品失败")
        .id
}

/// alice 场景：重复加购合并数量，结账冻结总额并清空购物车
#[tokio::test]
async fn test_alice_shopping_scenario() {
    let db = setup().await;
    let auth = AuthService::new(&db);
    let cart = CartService::new(&db);
    let checkout = CheckoutService::new(&db);
    let orders = OrdersService::new(&db);

    let book_id = seed_item(&db, "book", 20.0).await;
    let pen_id = seed_item(&db, "pen", 3.5).await;

    // 注册并登录
    auth.signup("alice", "s3cret").await.unwrap();
    let login = auth.login("alice", "s3cret").await.unwrap();
    let alice_id = auth.sessions().validate(&login.token).await.unwrap();
    assert_eq!(alice_id, login.user_id);

    // 加购 book 两次（合并为数量 2），pen 一次
    cart.add_item(alice_id, book_id).await.unwrap();
    cart.add_item(alice_id, book_id).await.unwrap();
    cart.add_item(alice_id, pen_id).await.unwrap();

    let view = cart.get_cart(alice_id).await.unwrap();
    assert_eq!(view.items.len(), 2);
    let quantity_of = |item_id: i32| {
        view.items
            .iter()
            .find(|line| line.item_id == item_id)
            .map(|line| line.quantity)
            .unwrap()
    };
    assert_eq!(quantity_of(book_id), 2);
    assert_eq!(quantity_of(pen_id), 1);

    // 结账：总额 = 20×2 + 3.5×1
    let order = checkout.checkout(alice_id, None).await.unwrap();
    assert!((order.total - 43.5).abs() < f64::EPSILON);
    assert_eq!(order.items.len(), 2);

    // 购物车已清空但仍然存在
    let after = cart.get_cart(alice_id).await.unwrap();
    assert_eq!(after.id, view.id);
    assert!(after.items.is_empty());

    // 订单可查询
    let listed = orders.list_orders(alice_id).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, order.id);
}

/// bob 场景：第二次登录使第一次的令牌失效
#[tokio::test]
async fn test_bob_relogin_invalidates_first_token() {
    let db = setup().await;
    let auth = AuthService::new(&db);

    auth.signup("bob", "hunter2").await.unwrap();

    let first = auth.login("bob", "hunter2").await.unwrap();
    let second = auth.login("bob", "hunter2").await.unwrap();

    // T1 失效，T2 有效
    assert!(
        auth.sessions()
            .validate(&first.token)
            .await
            .unwrap_err()
            .is_unauthenticated()
    );
    assert_eq!(
        auth.sessions().validate(&second.token).await.unwrap(),
        second.user_id
    );
}

/// 订单删除与清空跨服务联动
#[tokio::test]
async fn test_order_admin_flow() {
    let db = setup().await;
    let auth = AuthService::new(&db);
    let cart = CartService::new(&db);
    let checkout = CheckoutService::new(&db);
    let orders = OrdersService::new(&db);

    let item_id = seed_item(&db, "gadget", 10.0).await;

    let alice = auth.signup("alice", "pw").await.unwrap();

    cart.add_item(alice.id, item_id).await.unwrap();
    let first = checkout.checkout(alice.id, None).await.unwrap();

    cart.add_item(alice.id, item_id).await.unwrap();
    checkout.checkout(alice.id, None).await.unwrap();

    orders.delete_order(first.id, alice.id).await.unwrap();
    assert_eq!(orders.list_orders(alice.id).await.unwrap().len(), 1);

    assert_eq!(orders.clear_orders(alice.id).await.unwrap(), 1);
    assert!(orders.list_orders(alice.id).await.unwrap().is_empty());
}
