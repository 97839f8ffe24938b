use presence_core::export::ExportLocale;
use presence_core::presence::StatusProfile;
use presence_core::settings::{parse_timezone, PresenceSettings};

use crate::auth::jwt::JwtConfig;

/// Credentials of the admin account created at startup when missing.
#[derive(Debug, Clone)]
pub struct BootstrapAdmin {
    pub username: String,
    pub password: String,
}

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Upper bound on connection draining after a shutdown signal.
    pub shutdown_timeout_secs: u64,
    /// JWT token configuration (secret, expiry).
    pub jwt: JwtConfig,
    /// Time zone, status profile and export locale.
    pub presence: PresenceSettings,
    /// Admin account to create if it does not exist yet.
    pub bootstrap_admin: Option<BootstrapAdmin>,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                     | Default                    |
    /// |-----------------------------|----------------------------|
    /// | `HOST`                      | `0.0.0.0`                  |
    /// | `PORT`                      | `3000`                     |
    /// | `CORS_ORIGINS`              | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS`      | `30`                       |
    /// | `SHUTDOWN_TIMEOUT_SECS`     | `30`                       |
    /// | `PRESENCE_TIMEZONE`         | `Asia/Tokyo`               |
    /// | `STATUS_PROFILE`            | `self-report`              |
    /// | `EXPORT_LOCALE`             | `ja`                       |
    /// | `BOOTSTRAP_ADMIN_USERNAME`  | unset                      |
    /// | `BOOTSTRAP_ADMIN_PASSWORD`  | unset                      |
    ///
    /// # Panics
    ///
    /// Panics on any value that fails to parse.
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let shutdown_timeout_secs: u64 = std::env::var("SHUTDOWN_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("SHUTDOWN_TIMEOUT_SECS must be a valid u64");

        let jwt = JwtConfig::from_env();

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            shutdown_timeout_secs,
            jwt,
            presence: presence_settings_from_env(),
            bootstrap_admin: bootstrap_admin_from_env(),
        }
    }
}

fn presence_settings_from_env() -> PresenceSettings {
    let defaults = PresenceSettings::default();

    let timezone = match std::env::var("PRESENCE_TIMEZONE") {
        Ok(name) => parse_timezone(&name).unwrap_or_else(|e| panic!("PRESENCE_TIMEZONE: {e}")),
        Err(_) => defaults.timezone,
    };

    let profile = match std::env::var("STATUS_PROFILE") {
        Ok(name) => name
            .parse::<StatusProfile>()
            .unwrap_or_else(|e| panic!("STATUS_PROFILE: {e}")),
        Err(_) => defaults.profile,
    };

    let export_locale = match std::env::var("EXPORT_LOCALE") {
        Ok(name) => name
            .parse::<ExportLocale>()
            .unwrap_or_else(|e| panic!("EXPORT_LOCALE: {e}")),
        Err(_) => defaults.export_locale,
    };

    PresenceSettings {
        timezone,
        profile,
        export_locale,
    }
}

fn bootstrap_admin_from_env() -> Option<BootstrapAdmin> {
    let username = std::env::var("BOOTSTRAP_ADMIN_USERNAME").ok()?;
    let password = std::env::var("BOOTSTRAP_ADMIN_PASSWORD")
        .expect("BOOTSTRAP_ADMIN_PASSWORD must be set when BOOTSTRAP_ADMIN_USERNAME is");
    assert!(
        !password.is_empty(),
        "BOOTSTRAP_ADMIN_PASSWORD must not be empty"
    );
    Some(BootstrapAdmin { username, password })
}
