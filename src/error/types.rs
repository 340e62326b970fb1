//! # 错误类型定义

use thiserror::Error;

use super::ErrorCategory;

/// 应用主要错误类型
///
/// 每个变体对应一类稳定的错误语义，外层（如 HTTP 层）
/// 可以据此映射状态码；核心自身不关心具体映射。
#[derive(Debug, Error)]
pub enum ShopError {
    /// 被引用的实体不存在或对调用者不可见
    #[error("资源未找到: {message}")]
    NotFound { message: String },

    /// 实体存在但不属于调用者
    #[error("没有权限: {message}")]
    Forbidden { message: String },

    /// 唯一性冲突（如用户名已存在）
    #[error("唯一性冲突: {message}")]
    Conflict { message: String },

    /// 操作前置条件不满足（如对空购物车结账）
    #[error("业务状态错误: {message}")]
    InvalidState { message: String },

    /// 认证失败：缺失、无效或过期的令牌，错误的凭据
    #[error("认证错误: {message}")]
    Unauthenticated { message: String },

    /// 数据库相关错误
    #[error("数据库错误: {message}")]
    Database {
        message: String,
        #[source]
        source: Option<anyhow::Error>,
    },

    /// 配置相关错误
    #[error("配置错误: {message}")]
    Config {
        message: String,
        #[source]
        source: Option<anyhow::Error>,
    },

    /// 系统内部错误
    #[error("内部错误: {message}")]
    Internal {
        message: String,
        #[source]
        source: Option<anyhow::Error>,
    },

    /// 带上下文的错误包装
    #[error("{context}")]
    Context {
        context: String,
        #[source]
        source: Box<ShopError>,
    },
}

impl ShopError {
    /// 创建"未找到"错误
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    /// 创建"无权限"错误
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden {
            message: message.into(),
        }
    }

    /// 创建"唯一性冲突"错误
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    /// 创建"业务状态"错误
    pub fn invalid_state(message: impl Into<String>) -> Self {
        Self::InvalidState {
            message: message.into(),
        }
    }

    /// 创建"认证"错误
    pub fn unauthenticated(message: impl Into<String>) -> Self {
        Self::Unauthenticated {
            message: message.into(),
        }
    }

    /// 创建数据库错误
    pub fn database(message: impl Into<String>) -> Self {
        Self::Database {
            message: message.into(),
            source: None,
        }
    }

    /// 创建带底层原因的数据库错误
    pub fn database_with_source(
        message: impl Into<String>,
        source: impl Into<anyhow::Error>,
    ) -> Self {
        Self::Database {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// 创建配置错误
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            source: None,
        }
    }

    /// 创建内部错误
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
            source: None,
        }
    }

    /// 错误分类：客户端错误或服务端错误
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::NotFound { .. }
            | Self::Forbidden { .. }
            | Self::Conflict { .. }
            | Self::InvalidState { .. }
            | Self::Unauthenticated { .. } => ErrorCategory::Client,
            Self::Database { .. } | Self::Config { .. } | Self::Internal { .. } => {
                ErrorCategory::Server
            }
            Self::Context { source, .. } => source.category(),
        }
    }

    /// 是否为"未找到"错误
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// 是否为认证错误
    #[must_use]
    pub const fn is_unauthenticated(&self) -> bool {
        matches!(self, Self::Unauthenticated { .. })
    }
}

impl From<sea_orm::DbErr> for ShopError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database {
            message: err.to_string(),
            source: Some(err.into()),
        }
    }
}

impl From<bcrypt::BcryptError> for ShopError {
    fn from(err: bcrypt::BcryptError) -> Self {
        Self::Internal {
            message: format!("密码散列失败: {err}"),
            source: Some(err.into()),
        }
    }
}
