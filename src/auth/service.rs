//! # 认证服务
//!
//! 注册、登录、登出的业务逻辑，供外层 HTTP handler 复用。

use chrono::{Duration, Utc};
use entity::users;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
};
use serde::Serialize;
use tracing::{info, warn};

use crate::{
    auth::{password, session::SessionStore},
    config::AppConfig,
    error::{Result, ShopError, is_unique_violation},
};

/// 登录响应
#[derive(Debug, Clone, Serialize)]
pub struct LoginOutput {
    pub token: String,
    pub user_id: i32,
}

/// 用户响应（不含密码散列）
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: i32,
    pub username: String,
    pub created_at: chrono::NaiveDateTime,
}

impl From<users::Model> for UserResponse {
    fn from(user: users::Model) -> Self {
        Self {
            id: user.id,
            username: user.username,
            created_at: user.created_at,
        }
    }
}

/// 认证服务
pub struct AuthService<'a> {
    db: &'a DatabaseConnection,
    sessions: SessionStore<'a>,
    bcrypt_cost: Option<u32>,
}

impl<'a> AuthService<'a> {
    /// 创建认证服务：会话不过期，bcrypt 使用默认成本
    #[must_use]
    pub const fn new(db: &'a DatabaseConnection) -> Self {
        Self {
            db,
            sessions: SessionStore::new(db),
            bcrypt_cost: None,
        }
    }

    /// 按应用配置创建认证服务
    #[must_use]
    pub fn from_config(db: &'a DatabaseConnection, config: &AppConfig) -> Self {
        let ttl = config.auth.session_ttl_hours.map(Duration::hours);
        Self {
            db,
            sessions: SessionStore::with_ttl(db, ttl),
            bcrypt_cost: config.auth.bcrypt_cost,
        }
    }

    /// 会话存储句柄，供外层令牌校验中间件使用
    #[must_use]
    pub const fn sessions(&self) -> &SessionStore<'a> {
        &self.sessions
    }

    /// 用户注册
    ///
    /// 用户名唯一约束冲突映射为 `Conflict`。
    pub async fn signup(&self, username: &str, password_plain: &str) -> Result<users::Model> {
        let password_hash = password::hash_password(password_plain, self.bcrypt_cost)?;
        let now = Utc::now().naive_utc();

        let insert = users::ActiveModel {
            username: Set(username.to_string()),
            password_hash: Set(password_hash),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(self.db)
        .await;

        match insert {
            Ok(user) => {
                info!(user_id = user.id, username, "用户注册成功");
                Ok(user)
            }
            Err(err) if is_unique_violation(&err) => {
                Err(ShopError::conflict("username taken"))
            }
            Err(err) => Err(err.into()),
        }
    }

    /// 用户登录，签发新令牌并使旧令牌全部失效
    ///
    /// 用户名不存在与密码错误返回同一错误信息，不泄露账户存在性。
    pub async fn login(&self, username: &str, password_plain: &str) -> Result<LoginOutput> {
        let user = users::Entity::find()
            .filter(users::Column::Username.eq(username))
            .one(self.db)
            .await?
            .ok_or_else(|| {
                warn!(username, "登录失败: 用户不存在");
                ShopError::unauthenticated("invalid username or password")
            })?;

        if !password::verify_password(password_plain, &user.password_hash)? {
            warn!(username, "登录失败: 密码错误");
            return Err(ShopError::unauthenticated("invalid username or password"));
        }

        let token = self.sessions.issue(user.id).await?;

        info!(user_id = user.id, username, "登录成功");
        Ok(LoginOutput {
            token,
            user_id: user.id,
        })
    }

    /// 登出（幂等）
    pub async fn logout(&self, token: &str) -> Result<()> {
        self.sessions.revoke(token).await
    }

    /// 列出所有用户（不含密码散列）
    pub async fn list_users(&self) -> Result<Vec<UserResponse>> {
        let users = users::Entity::find().all(self.db).await?;
        Ok(users.into_iter().map(UserResponse::from).collect())
    }
}
