//! # 购物车引擎
//!
//! 每个用户单一购物车的生命周期管理：加购（合并数量）、
//! 移除（幂等）与查询。多行变更都在单个数据库事务内完成。

use entity::{cart_items, carts, items};
use sea_orm::sea_query::{Expr, OnConflict};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    Set, TransactionTrait,
};
use serde::Serialize;
use tracing::debug;

use crate::error::{Result, ShopError, is_unique_violation};

/// 购物车行项目（含商品目录快照）
///
/// `item` 为空表示商品已从目录下架但仍留在购物车中，
/// 这类悬空行由结账阶段统一拒绝。
#[derive(Debug, Clone, Serialize)]
pub struct CartItemDetail {
    pub id: i32,
    pub cart_id: i32,
    pub item_id: i32,
    pub quantity: i32,
    pub item: Option<items::Model>,
}

/// 购物车响应（含全部行项目）
#[derive(Debug, Clone, Serialize)]
pub struct CartResponse {
    pub id: i32,
    pub user_id: i32,
    pub items: Vec<CartItemDetail>,
}

/// 购物车服务
pub struct CartService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> CartService<'a> {
    #[must_use]
    pub const fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// 加购一件商品（数量 1），重复加购合并数量
    pub async fn add_item(&self, user_id: i32, item_id: i32) -> Result<cart_items::Model> {
        self.add_item_qty(user_id, item_id, 1).await
    }

    /// 加购指定数量的商品
    ///
    /// 单个事务内完成"取或建购物车 + 行项目合并"，任一步失败
    /// 整体回滚，不会留下半成品状态。
    pub async fn add_item_qty(
        &self,
        user_id: i32,
        item_id: i32,
        quantity: i32,
    ) -> Result<cart_items::Model> {
        if quantity < 1 {
            return Err(ShopError::invalid_state("quantity must be at least 1"));
        }

        // 商品存在性校验放在变更事务之前
        items::Entity::find_by_id(item_id)
            .one(self.db)
            .await?
            .ok_or_else(|| ShopError::not_found("item not found"))?;

        let txn = self.db.begin().await?;

        let cart = fetch_or_create_cart(&txn, user_id).await?;

        // (cart_id, item_id) 唯一索引上的原子 upsert：
        // 冲突时在一条语句内把数量加上去，消除"先查后插"竞态
        cart_items::Entity::insert(cart_items::ActiveModel {
            cart_id: Set(cart.id),
            item_id: Set(item_id),
            quantity: Set(quantity),
            ..Default::default()
        })
        .on_conflict(
            OnConflict::columns([cart_items::Column::CartId, cart_items::Column::ItemId])
                .value(
                    cart_items::Column::Quantity,
                    Expr::col(cart_items::Column::Quantity).add(quantity),
                )
                .to_owned(),
        )
        .exec(&txn)
        .await?;

        // upsert 后重读合并结果
        let merged = cart_items::Entity::find()
            .filter(cart_items::Column::CartId.eq(cart.id))
            .filter(cart_items::Column::ItemId.eq(item_id))
            .one(&txn)
            .await?
            .ok_or_else(|| ShopError::database("cart item missing after upsert"))?;

        txn.commit().await?;

        debug!(user_id, item_id, quantity = merged.quantity, "加购完成");
        Ok(merged)
    }

    /// 从购物车移除商品（幂等）
    ///
    /// 购物车不存在或行项目不存在都视为成功。
    pub async fn remove_item(&self, user_id: i32, item_id: i32) -> Result<()> {
        let Some(cart) = find_cart_by_user(self.db, user_id).await? else {
            return Ok(());
        };

        let result = cart_items::Entity::delete_many()
            .filter(cart_items::Column::CartId.eq(cart.id))
            .filter(cart_items::Column::ItemId.eq(item_id))
            .exec(self.db)
            .await?;

        debug!(user_id, item_id, rows = result.rows_affected, "移除商品");
        Ok(())
    }

    /// 查询用户自己的购物车
    ///
    /// 用户从未加购（无购物车行）时返回 `NotFound`，
    /// 调用方应将其渲染为空购物车而非错误。
    pub async fn get_cart(&self, user_id: i32) -> Result<CartResponse> {
        let cart = find_cart_by_user(self.db, user_id)
            .await?
            .ok_or_else(|| ShopError::not_found("cart not found"))?;

        load_cart_detail(self.db, cart).await
    }

    /// 按主键查询购物车，强制所有权
    pub async fn get_cart_by_id(&self, cart_id: i32, requesting_user_id: i32) -> Result<CartResponse> {
        let cart = carts::Entity::find_by_id(cart_id)
            .one(self.db)
            .await?
            .ok_or_else(|| ShopError::not_found("cart not found"))?;

        if cart.user_id != requesting_user_id {
            return Err(ShopError::forbidden(
                "cart does not belong to the authenticated user",
            ));
        }

        load_cart_detail(self.db, cart).await
    }

    /// 列出全部购物车（含行项目）
    pub async fn list_carts(&self) -> Result<Vec<CartResponse>> {
        let carts = carts::Entity::find().all(self.db).await?;

        let mut responses = Vec::with_capacity(carts.len());
        for cart in carts {
            responses.push(load_cart_detail(self.db, cart).await?);
        }
        Ok(responses)
    }
}

/// 按用户查购物车
pub(crate) async fn find_cart_by_user<C: ConnectionTrait>(
    conn: &C,
    user_id: i32,
) -> Result<Option<carts::Model>> {
    Ok(carts::Entity::find()
        .filter(carts::Column::UserId.eq(user_id))
        .one(conn)
        .await?)
}

/// 取或建用户购物车
///
/// user_id 唯一约束下，并发首次加购时插入可能冲突；
/// 冲突即"别人已建好"，重读既有行而不是报错。
async fn fetch_or_create_cart<C: ConnectionTrait>(conn: &C, user_id: i32) -> Result<carts::Model> {
    if let Some(cart) = find_cart_by_user(conn, user_id).await? {
        return Ok(cart);
    }

    let insert = carts::ActiveModel {
        user_id: Set(user_id),
        ..Default::default()
    }
    .insert(conn)
    .await;

    match insert {
        Ok(cart) => {
            debug!(user_id, cart_id = cart.id, "已为用户创建购物车");
            Ok(cart)
        }
        Err(err) if is_unique_violation(&err) => find_cart_by_user(conn, user_id)
            .await?
            .ok_or_else(|| ShopError::database("cart missing after unique conflict")),
        Err(err) => Err(err.into()),
    }
}

/// 装配购物车响应：行项目与商品目录行关联查询
pub(crate) async fn load_cart_detail<C: ConnectionTrait>(
    conn: &C,
    cart: carts::Model,
) -> Result<CartResponse> {
    let lines = cart_items::Entity::find()
        .filter(cart_items::Column::CartId.eq(cart.id))
        .find_also_related(items::Entity)
        .all(conn)
        .await?;

    let items = lines
        .into_iter()
        .map(|(line, item)| CartItemDetail {
            id: line.id,
            cart_id: line.cart_id,
            item_id: line.item_id,
            quantity: line.quantity,
            item,
        })
        .collect();

    Ok(CartResponse {
        id: cart.id,
        user_id: cart.user_id,
        items,
    })
}
