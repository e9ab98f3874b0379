//! Process configuration loaded from environment variables at start-up.

use std::env;

use time::Duration;

use crate::config::db::{must_var, DbKind};
use crate::error::AppError;

/// Token lifetime when `JWT_EXPIRATION` is unset.
pub const DEFAULT_TOKEN_TTL: Duration = Duration::days(7);

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub db_kind: DbKind,
    pub jwt_secret: String,
    pub token_ttl: Duration,
    pub cookie_secure: bool,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, AppError> {
        let host = env::var("BACKEND_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());

        let port_str = env::var("BACKEND_PORT").unwrap_or_else(|_| "3001".to_string());
        let port = port_str.parse::<u16>().map_err(|_| {
            AppError::config(format!(
                "BACKEND_PORT must be a valid port number, got '{port_str}'"
            ))
        })?;

        let db_kind = match env::var("DB_KIND") {
            Ok(raw) => raw.parse::<DbKind>()?,
            Err(_) => DbKind::Postgres,
        };

        let jwt_secret = must_var("BACKEND_JWT_SECRET")?;
        if jwt_secret.len() < 32 {
            return Err(AppError::config(
                "BACKEND_JWT_SECRET must be at least 32 bytes",
            ));
        }

        let token_ttl = match env::var("JWT_EXPIRATION") {
            Ok(raw) => parse_expiration(&raw)?,
            Err(_) => DEFAULT_TOKEN_TTL,
        };

        let cookie_secure = env::var("COOKIE_SECURE")
            .map(|v| !matches!(v.trim().to_ascii_lowercase().as_str(), "false" | "0" | "no"))
            .unwrap_or(true);

        Ok(Self {
            host,
            port,
            db_kind,
            jwt_secret,
            token_ttl,
            cookie_secure,
        })
    }
}

/// Parse `<n><unit>` where unit is one of `s`, `m`, `h`, `d`.
pub fn parse_expiration(raw: &str) -> Result<Duration, AppError> {
    let raw = raw.trim();
    let invalid = || {
        AppError::config(format!(
            "JWT_EXPIRATION must look like 30m, 12h or 7d, got '{raw}'"
        ))
    };

    let unit = raw.chars().last().ok_or_else(invalid)?;
    let amount: i64 = raw[..raw.len() - unit.len_utf8()]
        .parse()
        .map_err(|_| invalid())?;
    if amount <= 0 {
        return Err(invalid());
    }

    match unit {
        's' => Ok(Duration::seconds(amount)),
        'm' => Ok(Duration::minutes(amount)),
        'h' => Ok(Duration::hours(amount)),
        'd' => Ok(Duration::days(amount)),
        _ => Err(invalid()),
    }
}
