//! # 配置管理模块
//!
//! 处理应用配置加载与验证

use serde::Deserialize;
use std::env;
use std::path::Path;

use crate::error::{Result, ShopError};

/// 应用配置
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// 数据库配置
    pub database: DatabaseConfig,
    /// 认证配置
    #[serde(default)]
    pub auth: AuthConfig,
    /// 日志级别（如 "info"、"debug"）
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

/// 数据库配置
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// 数据库连接 URL，如 `sqlite://data/shop.db`
    pub url: String,
}

/// 认证配置
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthConfig {
    /// 会话有效期（小时），不设置则会话永不过期
    pub session_ttl_hours: Option<i64>,
    /// bcrypt 散列成本，不设置则使用 `bcrypt::DEFAULT_COST`
    pub bcrypt_cost: Option<u32>,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database: DatabaseConfig {
                url: "sqlite://data/shop.db".to_string(),
            },
            auth: AuthConfig::default(),
            log_level: default_log_level(),
        }
    }
}

/// 加载配置文件
///
/// 按以下顺序取配置文件路径：`SHOP_CONFIG_PATH` 环境变量，
/// 其次 `config/config.{RUST_ENV}.toml`；文件不存在时回退到默认配置。
/// `DATABASE_URL` 环境变量始终覆盖文件中的数据库地址。
pub fn load_config() -> Result<AppConfig> {
    let config_file = if let Ok(path) = env::var("SHOP_CONFIG_PATH") {
        path
    } else {
        let env_name = env::var("RUST_ENV").unwrap_or_else(|_| "dev".to_string());
        format!("config/config.{env_name}.toml")
    };

    let mut config = if Path::new(&config_file).exists() {
        read_config_file(Path::new(&config_file))?
    } else {
        AppConfig::default()
    };

    // 环境变量覆盖
    if let Ok(url) = env::var("DATABASE_URL") {
        config.database.url = url;
    }

    validate_config(&config)?;

    Ok(config)
}

/// 读取并解析一个 TOML 配置文件
fn read_config_file(path: &Path) -> Result<AppConfig> {
    let config_content = std::fs::read_to_string(path).map_err(|e| ShopError::Config {
        message: format!("读取配置文件失败: {}", path.display()),
        source: Some(e.into()),
    })?;

    toml::from_str(&config_content).map_err(|e| ShopError::Config {
        message: format!("解析配置文件失败: {}", path.display()),
        source: Some(e.into()),
    })
}

/// 验证配置有效性
fn validate_config(config: &AppConfig) -> Result<()> {
    if config.database.url.is_empty() {
        return Err(ShopError::config("数据库URL不能为空"));
    }

    if let Some(hours) = config.auth.session_ttl_hours {
        if hours <= 0 {
            return Err(ShopError::config(format!(
                "无效的会话有效期: {hours} 小时"
            )));
        }
    }

    if let Some(cost) = config.auth.bcrypt_cost {
        // bcrypt 合法成本区间
        if !(4..=31).contains(&cost) {
            return Err(ShopError::config(format!("无效的bcrypt成本: {cost}")));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = AppConfig::default();
        assert!(validate_config(&config).is_ok());
        assert_eq!(config.log_level, "info");
        assert!(config.auth.session_ttl_hours.is_none());
    }

    #[test]
    fn test_parse_toml_config() {
        let config: AppConfig = toml::from_str(
            r#"
            log_level = "debug"

            [database]
            url = "sqlite::memory:"

            [auth]
            session_ttl_hours = 24
            "#,
        )
        .unwrap();

        assert_eq!(config.database.url, "sqlite::memory:");
        assert_eq!(config.auth.session_ttl_hours, Some(24));
        assert_eq!(config.log_level, "debug");
    }

    #[test]
    fn test_read_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.test.toml");
        std::fs::write(
            &path,
            "[database]\nurl = \"sqlite://data/test.db\"\n\n[auth]\nbcrypt_cost = 6\n",
        )
        .unwrap();

        let config = read_config_file(&path).unwrap();
        assert_eq!(config.database.url, "sqlite://data/test.db");
        assert_eq!(config.auth.bcrypt_cost, Some(6));

        // 语法错误的文件报配置错误
        std::fs::write(&path, "not valid toml [").unwrap();
        assert!(read_config_file(&path).is_err());
    }

    #[test]
    fn test_invalid_ttl_rejected() {
        let config = AppConfig {
            auth: AuthConfig {
                session_ttl_hours: Some(0),
                bcrypt_cost: None,
            },
            ..AppConfig::default()
        };
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_invalid_bcrypt_cost_rejected() {
        let config = AppConfig {
            auth: AuthConfig {
                session_ttl_hours: None,
                bcrypt_cost: Some(99),
            },
            ..AppConfig::default()
        };
        assert!(validate_config(&config).is_err());
    }
}
