//! # Entity 模块
//!
//! 包含所有 Sea-ORM 实体定义

pub mod users;
pub mod sessions;
pub mod items;
pub mod carts;
pub mod cart_items;
pub mod orders;
pub mod order_items;

pub use users::Entity as Users;
pub use sessions::Entity as Sessions;
pub use items::Entity as Items;
pub use carts::Entity as Carts;
pub use cart_items::Entity as CartItems;
pub use orders::Entity as Orders;
pub use order_items::Entity as OrderItems;

#[cfg(test)]
mod tests;
