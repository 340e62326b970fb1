//! # 错误处理系统测试

use super::{Context, ErrorCategory, ShopError};

#[test]
fn test_error_constructors() {
    let err = ShopError::not_found("Item not found");
    assert!(err.is_not_found());
    assert!(err.to_string().contains("Item not found"));

    let err = ShopError::unauthenticated("Invalid token");
    assert!(err.is_unauthenticated());
}

#[test]
fn test_error_categories() {
    assert_eq!(
        ShopError::not_found("x").category(),
        ErrorCategory::Client
    );
    assert_eq!(
        ShopError::forbidden("x").category(),
        ErrorCategory::Client
    );
    assert_eq!(ShopError::conflict("x").category(), ErrorCategory::Client);
    assert_eq!(
        ShopError::invalid_state("x").category(),
        ErrorCategory::Client
    );
    assert_eq!(
        ShopError::unauthenticated("x").category(),
        ErrorCategory::Client
    );
    assert_eq!(ShopError::database("x").category(), ErrorCategory::Server);
    assert_eq!(ShopError::internal("x").category(), ErrorCategory::Server);
}

#[test]
fn test_context_wrapping() {
    let result: Result<(), ShopError> = Err(ShopError::database("connection lost"));
    let wrapped = result.context("while clearing cart");

    let err = wrapped.unwrap_err();
    assert!(err.to_string().contains("while clearing cart"));
    // 分类穿透 Context 包装
    assert_eq!(err.category(), ErrorCategory::Server);
}

#[test]
fn test_db_err_conversion() {
    let db_err = sea_orm::DbErr::Custom("boom".to_string());
    let err: ShopError = db_err.into();
    assert_eq!(err.category(), ErrorCategory::Server);
    assert!(err.to_string().contains("boom"));
}
