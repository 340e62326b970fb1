//! # 测试数据 Fixtures
//!
//! 提供测试用的数据构建器和预设数据

use chrono::Utc;
use entity::{items, sessions, users};
use sea_orm::{ActiveModelTrait, ConnectionTrait, Set};

/// 用户测试数据构建器
pub struct UserFixture {
    pub username: String,
    pub password_hash: String,
}

impl Default for UserFixture {
    fn default() -> Self {
        Self {
            username: "test_user".to_string(),
            // 占位散列；需要真实登录流程的测试应走 AuthService::signup
            password_hash: "hashed_password_123".to_string(),
        }
    }
}

impl UserFixture {
    /// 创建新的用户 fixture
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// 设置用户名
    #[must_use]
    pub fn username(mut self, username: &str) -> Self {
        self.username = username.to_string();
        self
    }

    /// 插入数据库并返回模型
    pub async fn insert<C: ConnectionTrait>(self, conn: &C) -> users::Model {
        let now = Utc::now().naive_utc();
        users::ActiveModel {
            username: Set(self.username),
            password_hash: Set(self.password_hash),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(conn)
        .await
        .expect("插入测试用户失败")
    }
}

/// 商品测试数据构建器
pub struct ItemFixture {
    pub name: String,
    pub price: f64,
    pub description: Option<String>,
    pub image_url: Option<String>,
}

impl Default for ItemFixture {
    fn default() -> Self {
        Self {
            name: "test_item".to_string(),
            price: 9.99,
            description: Some("A test item".to_string()),
            image_url: None,
        }
    }
}

impl ItemFixture {
    /// 创建新的商品 fixture
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// 设置名称
    #[must_use]
    pub fn name(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    /// 设置价格
    #[must_use]
    pub fn price(mut self, price: f64) -> Self {
        self.price = price;
        self
    }

    /// 插入数据库并返回模型
    pub async fn insert<C: ConnectionTrait>(self, conn: &C) -> items::Model {
        let now = Utc::now().naive_utc();
        items::ActiveModel {
            name: Set(self.name),
            price: Set(self.price),
            description: Set(self.description),
            image_url: Set(self.image_url),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(conn)
        .await
        .expect("插入测试商品失败")
    }
}

/// 直接插入一条会话行（绕过 SessionStore，用于构造过期会话等场景）
pub async fn insert_session_row<C: ConnectionTrait>(
    conn: &C,
    user_id: i32,
    token: &str,
    expires_at: Option<chrono::NaiveDateTime>,
) -> sessions::Model {
    sessions::ActiveModel {
        user_id: Set(user_id),
        token: Set(token.to_string()),
        created_at: Set(Utc::now().naive_utc()),
        expires_at: Set(expires_at),
        ..Default::default()
    }
    .insert(conn)
    .await
    .expect("插入测试会话失败")
}
