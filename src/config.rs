use anyhow::Context;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_minutes: i64,
}

/// Default accounts created on startup when missing.
#[derive(Debug, Clone, Deserialize)]
pub struct SeedConfig {
    pub enabled: bool,
    pub admin_email: String,
    pub admin_password: String,
    pub client_email: String,
    pub client_password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub jwt: JwtConfig,
    pub seed: SeedConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET").context("JWT_SECRET must be set")?,
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "gigboard".into()),
            audience: std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "gigboard-admin".into()),
            ttl_minutes: std::env::var("JWT_TTL_MINUTES")
                .ok()
                .and_then(|v| v.parse::<i64>().ok())
                .unwrap_or(60),
        };
        let seed = SeedConfig {
            enabled: std::env::var("SEED_DEFAULT_USERS")
                .map(|v| !matches!(v.to_lowercase().as_str(), "0" | "false" | "no"))
                .unwrap_or(true),
            admin_email: std::env::var("SEED_ADMIN_EMAIL").unwrap_or_else(|_| "admin@test.com".into()),
            admin_password: std::env::var("SEED_ADMIN_PASSWORD")
                .unwrap_or_else(|_| "admin1234".into()),
            client_email: std::env::var("SEED_CLIENT_EMAIL").unwrap_or_else(|_| "user@test.com".into()),
            client_password: std::env::var("SEED_CLIENT_PASSWORD")
                .unwrap_or_else(|_| "secret12".into()),
        };
        let host = std::env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".into());
        let port = std::env::var("APP_PORT")
            .ok()
            .and_then(|v| v.parse::<u16>().ok())
            .unwrap_or(8080);
        Ok(Self {
            database_url,
            host,
            port,
            jwt,
            seed,
        })
    }
}
