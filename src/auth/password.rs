//! # 密码散列模块
//!
//! bcrypt 单向散列与校验。散列结果自带盐，无需单独存储。

use bcrypt::{DEFAULT_COST, hash, verify};

use crate::error::Result;

/// 散列明文密码
///
/// `cost` 为空时使用 `bcrypt::DEFAULT_COST`。
pub fn hash_password(plain: &str, cost: Option<u32>) -> Result<String> {
    Ok(hash(plain, cost.unwrap_or(DEFAULT_COST))?)
}

/// 校验明文密码与散列是否匹配
pub fn verify_password(plain: &str, digest: &str) -> Result<bool> {
    Ok(verify(plain, digest)?)
}
