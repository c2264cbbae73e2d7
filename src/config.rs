use std::env;

use actix_web::cookie::Key;

const DEFAULT_DATABASE_URL: &str = "sqlite://./data/barberia.db";
const DEFAULT_BARBER_PASSWORD: &str = "1234";
const DEFAULT_PORT: u16 = 5000;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("SESSION_SECRET must be at least 64 bytes long (got {0})")]
    SecretTooShort(usize),
}

#[derive(Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub barber_password: String,
    pub session_key: Key,
    pub cookie_secure: bool,
    pub static_dir: String,
}

impl AppConfig {
    /// Reads the configuration from the environment, loading `.env` first
    /// when one is present.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let database_url =
            env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string());
        let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = env::var("PORT")
            .ok()
            .and_then(|value| value.parse().ok())
            .unwrap_or(DEFAULT_PORT);

        let barber_password =
            env::var("BARBER_PASSWORD").unwrap_or_else(|_| DEFAULT_BARBER_PASSWORD.to_string());
        if barber_password == DEFAULT_BARBER_PASSWORD {
            log::warn!("BARBER_PASSWORD not set. Using default password '1234'. Set BARBER_PASSWORD in production.");
        }

        let session_key = match env::var("SESSION_SECRET") {
            Ok(secret) => session_key_from_secret(&secret)?,
            Err(_) => {
                log::warn!("SESSION_SECRET not set. Generating a random key; sessions will not survive a restart.");
                Key::generate()
            }
        };

        let cookie_secure = env::var("SESSION_COOKIE_SECURE")
            .map(|value| matches!(value.trim(), "1" | "true" | "yes"))
            .unwrap_or(false);

        let static_dir = env::var("STATIC_DIR").unwrap_or_else(|_| "./static".to_string());

        Ok(Self {
            database_url,
            host,
            port,
            barber_password,
            session_key,
            cookie_secure,
            static_dir,
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn session_key_from_secret(secret: &str) -> Result<Key, ConfigError> {
    Key::try_from(secret.as_bytes()).map_err(|_| ConfigError::SecretTooShort(secret.len()))
}
