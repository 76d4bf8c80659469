pub mod app;
pub mod auth;
pub mod cli;
pub mod config;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod store;
