//! # 会话存储
//!
//! 签发、验证与吊销不透明的 Bearer 令牌。策略为单活跃会话：
//! 签发新令牌时删除该用户的全部旧会话行。

use chrono::{Duration, Utc};
use entity::sessions;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
    TransactionTrait,
};
use tracing::debug;
use uuid::Uuid;

use crate::error::{Result, ShopError};

/// 会话存储
///
/// 持有注入的数据库连接，绝不使用进程级全局句柄。
pub struct SessionStore<'a> {
    db: &'a DatabaseConnection,
    ttl: Option<Duration>,
}

impl<'a> SessionStore<'a> {
    /// 创建会话存储，令牌不过期
    #[must_use]
    pub const fn new(db: &'a DatabaseConnection) -> Self {
        Self { db, ttl: None }
    }

    /// 创建会话存储并指定令牌有效期
    #[must_use]
    pub const fn with_ttl(db: &'a DatabaseConnection, ttl: Option<Duration>) -> Self {
        Self { db, ttl }
    }

    /// 为用户签发新令牌
    ///
    /// 同一事务内先删除该用户全部既有会话再插入新行，
    /// 旧令牌立即失效（登出其他设备）。
    pub async fn issue(&self, user_id: i32) -> Result<String> {
        let token = Uuid::new_v4().to_string();
        let now = Utc::now().naive_utc();

        let txn = self.db.begin().await?;

        sessions::Entity::delete_many()
            .filter(sessions::Column::UserId.eq(user_id))
            .exec(&txn)
            .await?;

        sessions::ActiveModel {
            user_id: Set(user_id),
            token: Set(token.clone()),
            created_at: Set(now),
            expires_at: Set(self.ttl.map(|ttl| now + ttl)),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;

        debug!(user_id, "已签发新会话令牌");
        Ok(token)
    }

    /// 验证令牌并返回所属用户 id
    ///
    /// 过期的会话行不主动删除，由外部周期清理。
    pub async fn validate(&self, token: &str) -> Result<i32> {
        let session = sessions::Entity::find()
            .filter(sessions::Column::Token.eq(token))
            .one(self.db)
            .await?
            .ok_or_else(|| ShopError::unauthenticated("invalid token"))?;

        if let Some(expires_at) = session.expires_at {
            if expires_at < Utc::now().naive_utc() {
                return Err(ShopError::unauthenticated("token expired"));
            }
        }

        Ok(session.user_id)
    }

    /// 吊销令牌（幂等：未知令牌不报错）
    pub async fn revoke(&self, token: &str) -> Result<()> {
        let result = sessions::Entity::delete_many()
            .filter(sessions::Column::Token.eq(token))
            .exec(self.db)
            .await?;

        debug!(rows = result.rows_affected, "会话已吊销");
        Ok(())
    }
}
