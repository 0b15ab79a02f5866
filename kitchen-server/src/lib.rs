//! Saangee's Kitchen - Order Server
//!
//! # Architecture
//!
//! ```text
//! kitchen-server/src/
//! ├── core/          # config, state, HTTP server
//! ├── auth/          # token validation, access tiers
//! ├── api/           # HTTP routes and handlers
//! ├── db/            # SQLite pool, migrations, repositories
//! ├── views/         # cooking / bagging / payment aggregation
//! └── utils/         # errors, logging, local-day time handling
//! ```
//!
//! The data flow: the menu calendar and catalog feed the client's cart
//! (`shared::cart`); at checkout the server re-derives every price from
//! the current catalog (`shared::pricing`) inside one transaction; the
//! per-day views aggregate whatever the order store holds.

pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod utils;
pub mod views;

// Re-export common types
pub use auth::{AdminUser, CurrentUser, JwtConfig, JwtService};
pub use crate::core::server::{build_app, build_router};
pub use crate::core::{Config, Server, ServerState};
pub use db::DbService;
pub use utils::{AppError, AppResponse, AppResult};
pub use utils::logger::{init_logger, init_logger_with_file};

/// Load `.env` and initialize logging; call once at process start.
pub fn setup_environment() {
    dotenv::dotenv().ok();
    let config = Config::from_env();
    init_logger_with_file(
        std::env::var("LOG_LEVEL").ok().as_deref(),
        config.log_dir.as_deref(),
    );
}
