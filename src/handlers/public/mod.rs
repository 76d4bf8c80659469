// handlers/public/mod.rs - Handlers reachable without authentication
pub mod auth;
pub mod health;
pub mod root;

pub use health::health;
pub use root::root;
