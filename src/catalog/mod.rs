//! # 商品目录服务
//!
//! 商品的创建、查询与删除。目录本身不参与购物车/订单的
//! 一致性难点，但加购与结账都依赖这里的存在性校验。

use chrono::Utc;
use entity::items;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set};
use serde::Deserialize;
use tracing::info;

use crate::error::{Result, ShopError};

/// 创建商品请求
#[derive(Debug, Clone, Deserialize)]
pub struct CreateItemRequest {
    pub name: String,
    pub price: f64,
    pub description: Option<String>,
    pub image_url: Option<String>,
}

/// 商品目录服务
pub struct CatalogService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> CatalogService<'a> {
    #[must_use]
    pub const fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// 创建商品。价格必须非负。
    pub async fn create_item(&self, req: CreateItemRequest) -> Result<items::Model> {
        if req.price < 0.0 {
            return Err(ShopError::invalid_state("price must be non-negative"));
        }

        let now = Utc::now().naive_utc();
        let item = items::ActiveModel {
            name: Set(req.name),
            price: Set(req.price),
            description: Set(req.description),
            image_url: Set(req.image_url),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(self.db)
        .await?;

        info!(item_id = item.id, name = %item.name, "商品创建成功");
        Ok(item)
    }

    /// 列出全部商品
    pub async fn list_items(&self) -> Result<Vec<items::Model>> {
        Ok(items::Entity::find().all(self.db).await?)
    }

    /// 按 id 查询商品
    pub async fn get_item(&self, item_id: i32) -> Result<items::Model> {
        items::Entity::find_by_id(item_id)
            .one(self.db)
            .await?
            .ok_or_else(|| ShopError::not_found("item not found"))
    }

    /// 删除商品
    ///
    /// 已在购物车或订单中的引用不受影响：购物车的悬空行
    /// 由结账阶段拒绝，订单行保存的是历史快照。
    pub async fn delete_item(&self, item_id: i32) -> Result<()> {
        // 先确认存在，缺失时报告 NotFound 而不是静默成功
        self.get_item(item_id).await?;

        items::Entity::delete_by_id(item_id).exec(self.db).await?;

        info!(item_id, "商品已删除");
        Ok(())
    }
}
