use sea_orm::DatabaseConnection;

use super::security_config::SecurityConfig;

/// Shared application resources, wrapped in `web::Data` at the HTTP boundary.
#[derive(Debug, Clone)]
pub struct AppState {
    db: Option<DatabaseConnection>,
    pub security: SecurityConfig,
}

impl AppState {
    pub fn new(db: DatabaseConnection, security: SecurityConfig) -> Self {
        Self {
            db: Some(db),
            security,
        }
    }

    /// State without a database, for handlers and tests that never touch storage.
    pub fn new_without_db(security: SecurityConfig) -> Self {
        Self { db: None, security }
    }

    pub fn db(&self) -> Option<&DatabaseConnection> {
        self.db.as_ref()
    }
}
