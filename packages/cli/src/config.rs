// ABOUTME: Server configuration loaded from environment variables
// ABOUTME: Covers the listen port, CORS origin, and database location

use std::env;
use std::num::ParseIntError;
use std::path::PathBuf;

const DEFAULT_PORT: u16 = 4400;
const DEFAULT_CORS_ORIGIN: &str = "http://localhost:5173";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid PLANLINE_PORT value: {0}")]
    InvalidPort(#[from] ParseIntError),
    #[error("PLANLINE_PORT {0} is outside the usable range (1-65535)")]
    PortOutOfRange(u16),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub cors_origin: String,
    /// Overrides the default ~/.planline/planline.db location
    pub database_path: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Config {
            port: listen_port()?,
            cors_origin: env::var("CORS_ORIGIN")
                .unwrap_or_else(|_| DEFAULT_CORS_ORIGIN.to_string()),
            database_path: env::var("PLANLINE_DB").ok().map(PathBuf::from),
        })
    }
}

fn listen_port() -> Result<u16, ConfigError> {
    let port = match env::var("PLANLINE_PORT") {
        Ok(raw) => raw.parse::<u16>()?,
        Err(_) => DEFAULT_PORT,
    };

    if port == 0 {
        return Err(ConfigError::PortOutOfRange(port));
    }

    Ok(port)
}
