//! # Shop API Core Library
//!
//! 订单管理后端核心库：购物车、会话与原子化结账

pub mod auth;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod config;
pub mod database;
pub mod error;
pub mod logging;
pub mod orders;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

// Re-export commonly used types
pub use config::AppConfig;
pub use error::{Result, ShopError};
