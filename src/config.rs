use crate::error::{Error, Result};
use dotenvy::dotenv;
use std::env;
use std::sync::OnceLock;

#[derive(Debug, Clone)]
pub struct Config {
    pub server_address: String,
    pub database_url: String,
    pub db_max_connections: u32,
    pub db_acquire_timeout_secs: u64,
    pub jwt_secret: String,
    pub gemini_api_key: String,
    pub frontend_url: String,
    pub smtp_host: String,
    pub smtp_port: u16,
    pub smtp_username: String,
    pub smtp_password: String,
    pub mail_from: String,
    pub open_rps: u32,
    pub api_rps: u32,
}

pub static CONFIG: OnceLock<Config> = OnceLock::new();

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();

        Ok(Self {
            server_address: get_env("SERVER_ADDRESS")?,
            database_url: get_env("DATABASE_URL")?,
            db_max_connections: get_env_parse_or("DB_MAX_CONNECTIONS", 20)?,
            db_acquire_timeout_secs: get_env_parse_or("DB_ACQUIRE_TIMEOUT_SECS", 5)?,
            jwt_secret: get_env("JWT_SECRET")?,
            gemini_api_key: get_env("GEMINI_API_KEY")?,
            frontend_url: get_env("FRONTEND_URL")?,
            smtp_host: get_env("SMTP_HOST")?,
            smtp_port: get_env_parse("SMTP_PORT")?,
            smtp_username: get_env("SMTP_USER")?,
            smtp_password: get_env("SMTP_PASS")?,
            mail_from: get_env("MAIL_FROM")?,
            open_rps: get_env_parse("OPEN_RPS")?,
            api_rps: get_env_parse("API_RPS")?,
        })
    }
}

fn get_env(name: &str) -> Result<String> {
    env::var(name).map_err(|_| Error::Config(format!("Missing environment variable: {}", name)))
}

fn get_env_parse<T>(name: &str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let raw = get_env(name)?;
    raw.parse()
        .map_err(|e| Error::Config(format!("Invalid value for {}: {}", name, e)))
}

/// Like `get_env_parse`, but tunables fall back to a default instead of
/// failing startup.
fn get_env_parse_or<T>(name: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) => raw
            .parse()
            .map_err(|e| Error::Config(format!("Invalid value for {}: {}", name, e))),
        Err(_) => Ok(default),
    }
}

pub fn init_config() -> Result<()> {
    let config = Config::from_env()?;
    CONFIG
        .set(config)
        .map_err(|_| Error::Config("Configuration has already been initialized".to_string()))?;
    Ok(())
}

pub fn get_config() -> &'static Config {
    CONFIG
        .get()
        .expect("Configuration has not been initialized")
}
