//! Runtime configuration, read from the environment (and `.env` via dotenvy).

use anyhow::{Context, Result};

#[derive(Debug, Clone)]
pub struct Config {
    /// SQLite connection URL
    pub database_url: String,
    pub max_connections: u32,
    pub port: u16,
    /// Optional NATS server for domain events
    pub nats_url: Option<String>,
    /// Shop's WhatsApp number, digits only with country code
    pub whatsapp_number: String,
    pub admin_username: String,
    /// Only used to bootstrap the first admin account
    pub admin_password: Option<String>,
    pub admin_session_ttl_hours: i64,
    pub seed_catalog: bool,
    /// Units each starter product is seeded with
    pub seed_stock: i32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: "sqlite://visage.db?mode=rwc".into(),
            max_connections: 5,
            port: 5000,
            nats_url: None,
            whatsapp_number: "5519981896803".into(),
            admin_username: "admin".into(),
            admin_password: None,
            admin_session_ttl_hours: 12,
            seed_catalog: true,
            seed_stock: 20,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();
        Ok(Self {
            database_url: std::env::var("DATABASE_URL").unwrap_or(defaults.database_url),
            max_connections: parse_var("DATABASE_MAX_CONNECTIONS")?.unwrap_or(defaults.max_connections),
            port: parse_var("PORT")?.unwrap_or(defaults.port),
            nats_url: std::env::var("NATS_URL").ok().filter(|s| !s.is_empty()),
            whatsapp_number: std::env::var("WHATSAPP_NUMBER").unwrap_or(defaults.whatsapp_number),
            admin_username: std::env::var("ADMIN_USERNAME").unwrap_or(defaults.admin_username),
            admin_password: std::env::var("ADMIN_PASSWORD").ok().filter(|s| !s.is_empty()),
            admin_session_ttl_hours: parse_var("ADMIN_SESSION_TTL_HOURS")?.unwrap_or(defaults.admin_session_ttl_hours),
            seed_catalog: parse_var("SEED_CATALOG")?.unwrap_or(defaults.seed_catalog),
            seed_stock: parse_var("SEED_STOCK")?.unwrap_or(defaults.seed_stock),
        })
    }
}

fn parse_var<T>(name: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(name) {
        Ok(raw) if !raw.trim().is_empty() => raw.trim().parse().map(Some).with_context(|| format!("invalid value for {}", name)),
        _ => Ok(None),
    }
}
