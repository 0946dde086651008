pub mod auth;
pub mod cart;
pub mod inventory;
pub mod orders;
pub mod products;
