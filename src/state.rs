use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::config::AppConfig;

#[derive(Clone)]
pub struct AppState {
    pub orm: DatabaseConnection,
    /// HMAC secret used to verify identity tokens.
    pub jwt_secret: Arc<str>,
}

impl AppState {
    pub fn new(orm: DatabaseConnection, config: &AppConfig) -> Self {
        Self {
            orm,
            jwt_secret: Arc::from(config.jwt_secret.as_str()),
        }
    }
}
