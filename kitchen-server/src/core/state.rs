use std::sync::Arc;

use crate::auth::{JwtConfig, JwtService};
use crate::core::Config;
use crate::db::DbService;
use crate::utils::AppError;

/// Server state: the explicitly constructed resource handle passed to
/// every handler. Database pool and token service are built once here
/// and shared by `Clone` (cheap: pool handle + `Arc`); tests construct
/// their own state around a temporary database.
#[derive(Clone)]
pub struct ServerState {
    pub config: Config,
    pub db: DbService,
    pub jwt: Arc<JwtService>,
}

impl ServerState {
    pub fn new(config: Config, db: DbService, jwt: Arc<JwtService>) -> Self {
        Self { config, db, jwt }
    }

    /// Initialize all services from configuration: ensure the working
    /// directory, open the database (running migrations), set up token
    /// validation.
    pub async fn initialize(config: &Config) -> Result<Self, AppError> {
        if let Err(e) = std::fs::create_dir_all(&config.work_dir) {
            tracing::warn!(dir = %config.work_dir, error = %e, "could not create work dir");
        }

        let db = DbService::new(&config.database_path).await?;
        let jwt = Arc::new(JwtService::new(config.jwt.clone()));

        Ok(Self::new(config.clone(), db, jwt))
    }

    /// Test constructor: state over an existing database with a known
    /// token secret.
    pub fn for_tests(db: DbService, jwt_config: JwtConfig) -> Self {
        let mut config = Config::from_env();
        config.jwt = jwt_config.clone();
        Self::new(config, db, Arc::new(JwtService::new(jwt_config)))
    }
}
