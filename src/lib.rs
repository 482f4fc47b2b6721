//! RPG hero API: heroes, quests and items over SQLite, with an inventory carry-capacity rule.

pub mod config;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod migration;
pub mod models;
pub mod rate_limit;
pub mod response;
pub mod routes;
pub mod seed;
pub mod service;
pub mod sql;
pub mod state;
pub mod store;

pub use config::{Environment, Settings};
pub use error::{AppError, ConfigError, FieldError};
pub use migration::apply_migrations;
pub use routes::app;
pub use state::AppState;
pub use store::{connect, connect_in_memory, ensure_database_exists};
