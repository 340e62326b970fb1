//! # 实体定义测试
//!
//! 测试所有 Sea-ORM 实体定义的正确性

#[cfg(test)]
mod tests {
    use crate::{cart_items, carts, items, order_items, orders, sessions, users};
    use sea_orm::Set;

    #[tokio::test]
    async fn test_user_creation() {
        // 测试用户实体可以正常创建
        let user = users::ActiveModel {
            username: Set("alice".to_string()),
            password_hash: Set("$2b$12$hash".to_string()),
            ..Default::default()
        };

        assert_eq!(user.username.as_ref(), "alice");
        assert_eq!(user.password_hash.as_ref(), "$2b$12$hash");
    }

    #[tokio::test]
    async fn test_session_creation() {
        // 测试会话实体，expires_at 可为空（不过期）
        let session = sessions::ActiveModel {
            user_id: Set(1),
            token: Set("opaque-token".to_string()),
            expires_at: Set(None),
            ..Default::default()
        };

        assert_eq!(session.user_id.as_ref(), &1);
        assert_eq!(session.token.as_ref(), "opaque-token");
        assert_eq!(session.expires_at.as_ref(), &None);
    }

    #[tokio::test]
    async fn test_item_creation() {
        // 测试商品实体
        let item = items::ActiveModel {
            name: Set("Keyboard".to_string()),
            price: Set(49.99),
            description: Set(Some("Mechanical keyboard".to_string())),
            image_url: Set(None),
            ..Default::default()
        };

        assert_eq!(item.name.as_ref(), "Keyboard");
        assert_eq!(item.price.as_ref(), &49.99);
    }

    #[tokio::test]
    async fn test_cart_and_cart_item_creation() {
        // 测试购物车与购物车条目实体
        let cart = carts::ActiveModel {
            user_id: Set(1),
            ..Default::default()
        };
        let cart_item = cart_items::ActiveModel {
            cart_id: Set(1),
            item_id: Set(2),
            quantity: Set(3),
            ..Default::default()
        };

        assert_eq!(cart.user_id.as_ref(), &1);
        assert_eq!(cart_item.quantity.as_ref(), &3);
    }

    #[tokio::test]
    async fn test_order_creation() {
        // 测试订单与订单条目实体，price 为快照价格
        let order = orders::ActiveModel {
            user_id: Set(1),
            total: Set(129.97),
            ..Default::default()
        };
        let order_item = order_items::ActiveModel {
            order_id: Set(1),
            item_id: Set(2),
            quantity: Set(2),
            price: Set(49.99),
            ..Default::default()
        };

        assert_eq!(order.total.as_ref(), &129.97);
        assert_eq!(order_item.price.as_ref(), &49.99);
    }

    #[test]
    fn test_user_serialization_hides_password_hash() {
        // password_hash 不应出现在序列化结果中
        let user = users::Model {
            id: 1,
            username: "alice".to_string(),
            password_hash: "secret".to_string(),
            created_at: chrono::Utc::now().naive_utc(),
            updated_at: chrono::Utc::now().naive_utc(),
        };

        let json = serde_json::to_string(&user).unwrap();
        assert!(json.contains("alice"));
        assert!(!json.contains("secret"));
    }
}
