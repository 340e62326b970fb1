//! # 订单查询与管理
//!
//! 订单为写一次实体：只有查询与删除，没有更新操作。
//! 删除遵循先子后父的引用完整性顺序，且在单事务内完成。

use entity::{items, order_items, orders};
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter, TransactionTrait,
};
use serde::Serialize;
use tracing::info;

use crate::error::{Result, ShopError};

/// 订单行（含快照价格与商品目录行，若商品仍在目录中）
#[derive(Debug, Clone, Serialize)]
pub struct OrderItemDetail {
    pub id: i32,
    pub order_id: i32,
    pub item_id: i32,
    pub quantity: i32,
    /// 结账时刻的单价快照
    pub price: f64,
    pub item: Option<items::Model>,
}

/// 订单响应（含全部订单行）
#[derive(Debug, Clone, Serialize)]
pub struct OrderResponse {
    pub id: i32,
    pub user_id: i32,
    pub total: f64,
    pub created_at: chrono::NaiveDateTime,
    pub items: Vec<OrderItemDetail>,
}

/// 订单服务
pub struct OrdersService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> OrdersService<'a> {
    #[must_use]
    pub const fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// 列出用户的全部订单（插入序）
    pub async fn list_orders(&self, user_id: i32) -> Result<Vec<OrderResponse>> {
        let orders = orders::Entity::find()
            .filter(orders::Column::UserId.eq(user_id))
            .all(self.db)
            .await?;

        let mut responses = Vec::with_capacity(orders.len());
        for order in orders {
            responses.push(load_order_detail(self.db, order).await?);
        }
        Ok(responses)
    }

    /// 按 id 查询订单，强制所有权
    pub async fn get_order(&self, order_id: i32, user_id: i32) -> Result<OrderResponse> {
        let order = self.find_owned(order_id, user_id).await?;
        load_order_detail(self.db, order).await
    }

    /// 删除单个订单
    ///
    /// 先删订单行再删订单，同一事务。
    pub async fn delete_order(&self, order_id: i32, user_id: i32) -> Result<()> {
        let order = self.find_owned(order_id, user_id).await?;

        let txn = self.db.begin().await?;

        order_items::Entity::delete_many()
            .filter(order_items::Column::OrderId.eq(order.id))
            .exec(&txn)
            .await?;

        orders::Entity::delete_by_id(order.id).exec(&txn).await?;

        txn.commit().await?;

        info!(user_id, order_id, "订单已删除");
        Ok(())
    }

    /// 清空用户的全部订单，返回删除的订单数
    ///
    /// 没有订单时平凡成功（返回 0）。
    pub async fn clear_orders(&self, user_id: i32) -> Result<u64> {
        let order_ids: Vec<i32> = orders::Entity::find()
            .filter(orders::Column::UserId.eq(user_id))
            .all(self.db)
            .await?
            .into_iter()
            .map(|order| order.id)
            .collect();

        if order_ids.is_empty() {
            return Ok(0);
        }

        let txn = self.db.begin().await?;

        order_items::Entity::delete_many()
            .filter(order_items::Column::OrderId.is_in(order_ids))
            .exec(&txn)
            .await?;

        let deleted = orders::Entity::delete_many()
            .filter(orders::Column::UserId.eq(user_id))
            .exec(&txn)
            .await?;

        txn.commit().await?;

        info!(user_id, count = deleted.rows_affected, "用户订单已清空");
        Ok(deleted.rows_affected)
    }

    /// 查订单并校验所有权
    async fn find_owned(&self, order_id: i32, user_id: i32) -> Result<orders::Model> {
        let order = orders::Entity::find_by_id(order_id)
            .one(self.db)
            .await?
            .ok_or_else(|| ShopError::not_found("order not found"))?;

        if order.user_id != user_id {
            return Err(ShopError::forbidden(
                "order does not belong to the authenticated user",
            ));
        }

        Ok(order)
    }
}

/// 装配订单响应：订单行与商品目录行关联查询
pub(crate) async fn load_order_detail<C: ConnectionTrait>(
    conn: &C,
    order: orders::Model,
) -> Result<OrderResponse> {
    let lines = order_items::Entity::find()
        .filter(order_items::Column::OrderId.eq(order.id))
        .find_also_related(items::Entity)
        .all(conn)
        .await?;

    let items = lines
        .into_iter()
        .map(|(line, item)| OrderItemDetail {
            id: line.id,
            order_id: line.order_id,
            item_id: line.item_id,
            quantity: line.quantity,
            price: line.price,
            item,
        })
        .collect();

    Ok(OrderResponse {
        id: order.id,
        user_id: order.user_id,
        total: order.total,
        created_at: order.created_at,
        items,
    })
}
