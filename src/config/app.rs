use url::Url;
use crate::config::env::*;
use crate::config::roster::Roster;

#[derive(Clone)]
pub struct AppConfig {
    pub server_port: u16,
    pub roster: Roster,
}

#[derive(Clone)]
pub struct DatabaseConfig {
    pub url: Url,
    pub max_connections: u32
}

impl AppConfig {
    pub fn from_env() -> Self {
        let server_port = get_env_value_or_default("SERVER_PORT", 8080);
        let roster = Roster::from_env();
        Self {
            server_port,
            roster,
        }
    }
}

impl DatabaseConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            url: get_env_mandatory_value("DATABASE_URL")?,
            max_connections: get_env_value_or_default("DATABASE_MAX_CONNECTIONS", 10)
        })
    }
}
