//! Local-first data layer for a small storefront: user accounts and
//! sessions, a product catalog with categories, per-user shopping carts and
//! order history. Every collection is stored as one JSON document under a
//! fixed key in a pluggable key-value store; there is no server and no
//! background work — every operation is a synchronous read-modify-write.

pub mod cart;
pub mod categories;
pub mod config;
pub mod error;
pub mod models;
pub mod orders;
pub mod products;
pub mod session;
pub mod store;
pub mod users;
pub mod validators;

pub use error::{Error, Result};
