//! # 结账引擎测试

use entity::{cart_items, items, orders};
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};

use crate::{
    cart::CartService,
    checkout::CheckoutService,
    error::ShopError,
    testing::fixtures::{ItemFixture, UserFixture},
    testing::helpers::create_test_db,
};

#[tokio::test]
async fn test_checkout_freezes_total_and_clears_cart() {
    let db = create_test_db().await.unwrap();
    let user = UserFixture::new().insert(&db).await;
    let coffee = ItemFixture::new().name("coffee").price(4.5).insert(&db).await;
    let mug = ItemFixture::new().name("mug").price(12.0).insert(&db).await;
    let cart = CartService::new(&db);
    let checkout = CheckoutService::new(&db);

    cart.add_item_qty(user.id, coffee.id, 2).await.unwrap();
    cart.add_item(user.id, mug.id).await.unwrap();

    let order = checkout.checkout(user.id, None).await.unwrap();
    assert_eq!(order.user_id, user.id);
    assert!((order.total - (4.5 * 2.0 + 12.0)).abs() < f64::EPSILON);
    assert_eq!(order.items.len(), 2);

    // 订单行保存数量与价格快照
    let coffee_line = order
        .items
        .iter()
        .find(|line| line.item_id == coffee.id)
        .unwrap();
    assert_eq!(coffee_line.quantity, 2);
    assert_eq!(coffee_line.price, 4.5);

    // 购物车行已清空，购物车本身保留
    let cart_after = cart.get_cart(user.id).await.unwrap();
    assert!(cart_after.items.is_empty());
}

#[tokio::test]
async fn test_checkout_uses_live_catalog_price() {
    let db = create_test_db().await.unwrap();
    let user = UserFixture::new().insert(&db).await;
    let item = ItemFixture::new().price(10.0).insert(&db).await;
    let cart = CartService::new(&db);
    let checkout = CheckoutService::new(&db);

    cart.add_item(user.id, item.id).await.unwrap();

    // 加购后目录涨价，订单按结账时刻现价计算
    let mut price_update: items::ActiveModel =
        items::Entity::find_by_id(item.id)
            .one(&db)
            .await
            .unwrap()
            .unwrap()
            .into();
    price_update.price = sea_orm::Set(15.0);
    sea_orm::ActiveModelTrait::update(price_update, &db)
        .await
        .unwrap();

    let order = checkout.checkout(user.id, None).await.unwrap();
    assert_eq!(order.total, 15.0);
    assert_eq!(order.items[0].price, 15.0);
}

#[tokio::test]
async fn test_empty_cart_rejected() {
    let db = create_test_db().await.unwrap();
    let user = UserFixture::new().insert(&db).await;
    let item = ItemFixture::new().insert(&db).await;
    let cart = CartService::new(&db);
    let checkout = CheckoutService::new(&db);

    // 从未加购：NotFound
    assert!(
        checkout
            .checkout(user.id, None)
            .await
            .unwrap_err()
            .is_not_found()
    );

    // 加购后移除：购物车存在但为空，InvalidState
    cart.add_item(user.id, item.id).await.unwrap();
    cart.remove_item(user.id, item.id).await.unwrap();

    assert!(matches!(
        checkout.checkout(user.id, None).await.unwrap_err(),
        ShopError::InvalidState { .. }
    ));

    // 两次失败都不应产生订单
    assert_eq!(orders::Entity::find().count(&db).await.unwrap(), 0);
}

#[tokio::test]
async fn test_checkout_by_cart_id_enforces_ownership() {
    let db = create_test_db().await.unwrap();
    let alice = UserFixture::new().username("alice").insert(&db).await;
    let mallory = UserFixture::new().username("mallory").insert(&db).await;
    let item = ItemFixture::new().insert(&db).await;
    let cart = CartService::new(&db);
    let checkout = CheckoutService::new(&db);

    cart.add_item(alice.id, item.id).await.unwrap();
    let alice_cart = cart.get_cart(alice.id).await.unwrap();

    assert!(matches!(
        checkout
            .checkout(mallory.id, Some(alice_cart.id))
            .await
            .unwrap_err(),
        ShopError::Forbidden { .. }
    ));

    assert!(
        checkout
            .checkout(alice.id, Some(9999))
            .await
            .unwrap_err()
            .is_not_found()
    );

    // 属主用显式 cart_id 正常结账
    let order = checkout
        .checkout(alice.id, Some(alice_cart.id))
        .await
        .unwrap();
    assert_eq!(order.user_id, alice.id);
}

#[tokio::test]
async fn test_failed_checkout_rolls_back_entirely() {
    let db = create_test_db().await.unwrap();
    let user = UserFixture::new().insert(&db).await;
    let keep = ItemFixture::new().name("keep").price(5.0).insert(&db).await;
    let gone = ItemFixture::new().name("gone").price(7.0).insert(&db).await;
    let cart = CartService::new(&db);
    let checkout = CheckoutService::new(&db);

    cart.add_item(user.id, keep.id).await.unwrap();
    cart.add_item(user.id, gone.id).await.unwrap();

    // 加购后商品从目录下架，结账在事务内撞上悬空行
    items::Entity::delete_by_id(gone.id).exec(&db).await.unwrap();

    let err = checkout.checkout(user.id, None).await.unwrap_err();
    assert!(err.is_not_found());

    // 事务整体回滚：没有订单，购物车行原样保留
    assert_eq!(orders::Entity::find().count(&db).await.unwrap(), 0);
    let remaining = cart_items::Entity::find()
        .filter(cart_items::Column::ItemId.is_in([keep.id, gone.id]))
        .count(&db)
        .await
        .unwrap();
    assert_eq!(remaining, 2);
}

#[tokio::test]
async fn test_cart_is_reusable_after_checkout() {
    let db = create_test_db().await.unwrap();
    let user = UserFixture::new().insert(&db).await;
    let item = ItemFixture::new().price(3.0).insert(&db).await;
    let cart = CartService::new(&db);
    let checkout = CheckoutService::new(&db);

    cart.add_item(user.id, item.id).await.unwrap();
    let first_cart_id = cart.get_cart(user.id).await.unwrap().id;

    checkout.checkout(user.id, None).await.unwrap();

    // 同一个购物车行复用，不新建
    cart.add_item(user.id, item.id).await.unwrap();
    let second = cart.get_cart(user.id).await.unwrap();
    assert_eq!(second.id, first_cart_id);
    assert_eq!(second.items.len(), 1);
    assert_eq!(second.items[0].quantity, 1);
}
