use serde::Deserialize;

use crate::auth::tokens::TokenSettings;

/// Longest accepted token lifetime: ten years of minutes.
pub const MAX_TOKEN_LIFETIME_MINUTES: u64 = 10 * 365 * 24 * 60;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Database connection URL (e.g. sqlite://marquee.db?mode=rwc, postgres://...)
    pub database_url: String,

    /// Key used to sign minted access and refresh tokens
    pub token_secret: String,

    /// Access token lifetime in minutes (default: 60)
    pub access_token_lifetime_minutes: u64,

    /// Refresh token lifetime in minutes (default: 43200, i.e. 30 days)
    pub refresh_token_lifetime_minutes: u64,

    /// Reject access tokens past their expiry when resolving a bearer (default: true)
    pub enforce_access_token_expiry: bool,

    /// Minimum accepted password length (default: 6)
    pub min_password_length: usize,

    /// Server host (default: 127.0.0.1)
    pub server_host: String,

    /// Server port (default: 3000)
    pub server_port: u16,

    /// Environment: development, production, test
    pub environment: String,
}

impl Config {
    /// Load configuration from environment variables (with .env support).
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        // Load .env file if present (ignore errors if missing)
        let _ = dotenvy::dotenv();

        let config = Config {
            database_url: std::env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite://marquee.db?mode=rwc".to_string()),
            token_secret: std::env::var("TOKEN_SECRET")
                .unwrap_or_else(|_| "marquee-dev-secret-change-me".to_string()),
            access_token_lifetime_minutes: std::env::var("ACCESS_TOKEN_LIFETIME_MINUTES")
                .unwrap_or_else(|_| "60".to_string())
                .parse()
                .unwrap_or(60),
            refresh_token_lifetime_minutes: std::env::var("REFRESH_TOKEN_LIFETIME_MINUTES")
                .unwrap_or_else(|_| "43200".to_string())
                .parse()
                .unwrap_or(43_200),
            enforce_access_token_expiry: !matches!(
                std::env::var("ENFORCE_ACCESS_TOKEN_EXPIRY")
                    .unwrap_or_default()
                    .to_lowercase()
                    .as_str(),
                "false" | "0" | "no"
            ),
            min_password_length: std::env::var("MIN_PASSWORD_LENGTH")
                .unwrap_or_else(|_| "6".to_string())
                .parse()
                .unwrap_or(6),
            server_host: std::env::var("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            server_port: std::env::var("SERVER_PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .unwrap_or(3000),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
        };

        config.validate()?;
        Ok(config)
    }

    /// Reject token lifetimes that would make refresh meaningless.
    pub fn validate(&self) -> Result<(), String> {
        if self.access_token_lifetime_minutes == 0 || self.refresh_token_lifetime_minutes == 0 {
            return Err("token lifetimes must be at least one minute".to_string());
        }
        for (name, minutes) in [
            ("ACCESS_TOKEN_LIFETIME_MINUTES", self.access_token_lifetime_minutes),
            ("REFRESH_TOKEN_LIFETIME_MINUTES", self.refresh_token_lifetime_minutes),
        ] {
            if minutes > MAX_TOKEN_LIFETIME_MINUTES {
                return Err(format!(
                    "{} ({}) exceeds the maximum of {} minutes",
                    name, minutes, MAX_TOKEN_LIFETIME_MINUTES
                ));
            }
        }
        if self.access_token_lifetime_minutes >= self.refresh_token_lifetime_minutes {
            return Err(format!(
                "ACCESS_TOKEN_LIFETIME_MINUTES ({}) must be shorter than REFRESH_TOKEN_LIFETIME_MINUTES ({})",
                self.access_token_lifetime_minutes, self.refresh_token_lifetime_minutes
            ));
        }
        Ok(())
    }

    /// Token lifetimes and signing key for the [`TokenHandler`](crate::TokenHandler).
    pub fn token_settings(&self) -> TokenSettings {
        TokenSettings::new(
            self.token_secret.clone(),
            self.access_token_lifetime_minutes,
            self.refresh_token_lifetime_minutes,
            self.enforce_access_token_expiry,
        )
    }

    /// Check if running in development mode.
    pub fn is_dev(&self) -> bool {
        self.environment == "development"
    }

    /// Get the full server address.
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}
