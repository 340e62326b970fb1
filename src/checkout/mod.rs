//! # 结账引擎
//!
//! 将非空购物车原子地转换为不可变订单：按结账时刻的目录
//! 现价计算总额，写入订单与订单行快照，并清空购物车行。
//! 购物车行与订单写入在同一事务内，绝不出现半提交状态。

use entity::{cart_items, carts, items, order_items, orders};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    Set, TransactionTrait,
};
use tracing::info;

use crate::{
    cart::find_cart_by_user,
    error::{Result, ShopError},
    orders::{OrderResponse, load_order_detail},
};

/// 结账服务
pub struct CheckoutService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> CheckoutService<'a> {
    #[must_use]
    pub const fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// 结账
    ///
    /// `cart_id` 给定时校验所有权，否则取调用者自己的购物车。
    /// 总额取结账时刻的目录现价（购物车记录意向，订单固化价格）。
    /// 订单行写入与购物车清空在一个事务内，任一步失败整体回滚。
    pub async fn checkout(&self, user_id: i32, cart_id: Option<i32>) -> Result<OrderResponse> {
        // 1. 解析目标购物车
        let cart = match cart_id {
            Some(id) => {
                let cart = carts::Entity::find_by_id(id)
                    .one(self.db)
                    .await?
                    .ok_or_else(|| ShopError::not_found("cart not found"))?;
                if cart.user_id != user_id {
                    return Err(ShopError::forbidden(
                        "cart does not belong to the authenticated user",
                    ));
                }
                cart
            }
            None => find_cart_by_user(self.db, user_id)
                .await?
                .ok_or_else(|| ShopError::not_found("cart not found"))?,
        };

        // 2. 空购物车在进入变更事务前拒绝
        let line_count = cart_items::Entity::find()
            .filter(cart_items::Column::CartId.eq(cart.id))
            .count(self.db)
            .await?;
        if line_count == 0 {
            return Err(ShopError::invalid_state("cart is empty"));
        }

        let txn = self.db.begin().await?;

        // 3. 事务内重读行项目并关联当前目录价格
        let lines = cart_items::Entity::find()
            .filter(cart_items::Column::CartId.eq(cart.id))
            .find_also_related(items::Entity)
            .all(&txn)
            .await?;
        if lines.is_empty() {
            // 与空判相隔的窗口里被并发清空
            return Err(ShopError::invalid_state("cart is empty"));
        }

        let mut total = 0.0_f64;
        let mut snapshots = Vec::with_capacity(lines.len());
        for (line, item) in lines {
            // 悬空行（商品已下架）让整个结账回滚
            let item = item.ok_or_else(|| {
                ShopError::not_found(format!("item {} no longer exists", line.item_id))
            })?;
            total += item.price * f64::from(line.quantity);
            snapshots.push((line.item_id, line.quantity, item.price));
        }

        // 4. 订单 + 订单行 + 清空购物车，单事务提交
        let order = orders::ActiveModel {
            user_id: Set(cart.user_id),
            total: Set(total),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        order_items::Entity::insert_many(snapshots.into_iter().map(
            |(item_id, quantity, price)| order_items::ActiveModel {
                order_id: Set(order.id),
                item_id: Set(item_id),
                quantity: Set(quantity),
                price: Set(price),
                ..Default::default()
            },
        ))
        .exec(&txn)
        .await?;

        // 购物车行清空，购物车本身保留复用
        cart_items::Entity::delete_many()
            .filter(cart_items::Column::CartId.eq(cart.id))
            .exec(&txn)
            .await?;

        txn.commit().await?;

        info!(user_id, order_id = order.id, total, "订单创建成功");

        // 5. 提交后重读订单及其行
        load_order_detail(self.db, order).await
    }
}

#[cfg(test)]
mod tests;
