//! # 认证模块
//!
//! 密码散列、会话存储与登录/注册业务逻辑

pub mod password;
pub mod service;
pub mod session;

pub use service::{AuthService, LoginOutput, UserResponse};
pub use session::SessionStore;
