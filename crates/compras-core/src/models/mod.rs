//! Data models for purchases, lists, the persisted store and configuration.

pub mod config;
pub mod purchase;
pub mod store;

pub use purchase::{
    month_key, purchase_id, LineItem, Purchase, DEFAULT_CATEGORIES, DEFAULT_CATEGORY,
    DEFAULT_STORE_NAME,
};
pub use store::{override_key, ShoppingList, Store};
