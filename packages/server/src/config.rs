use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct CorsConfig {
    pub allow_origins: Vec<String>,
    pub max_age: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub cors: CorsConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    /// Default: 100.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Default: 5.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
    /// Connect and acquire timeout. Default: 8 seconds.
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
}

impl DatabaseConfig {
    pub fn with_url(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            max_connections: default_max_connections(),
            min_connections: default_min_connections(),
            connect_timeout_secs: default_connect_timeout_secs(),
        }
    }
}

fn default_max_connections() -> u32 {
    100
}
fn default_min_connections() -> u32 {
    5
}
fn default_connect_timeout_secs() -> u64 {
    8
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    /// Lifetime of issued tokens. Default: 7 days.
    #[serde(default = "default_token_ttl_days")]
    pub token_ttl_days: i64,
}

fn default_token_ttl_days() -> i64 {
    7
}

/// Scoring behaviour knobs.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct ScoringConfig {
    /// Create the participant row when a fish is verified for an angler who
    /// never joined the competition. When `false`, such verifications leave
    /// every competition record untouched. Default: false.
    #[serde(default)]
    pub auto_enroll: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    #[serde(default)]
    pub scoring: ScoringConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let s = Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 3000)?
            .set_default("server.cors.allow_origins", Vec::<String>::new())?
            .set_default("server.cors.max_age", 3600)?
            // Load from config/config.toml
            .add_source(File::with_name("config/config").required(false))
            // Override from environment (e.g., CATCHBOARD__AUTH__JWT_SECRET)
            .add_source(Environment::with_prefix("CATCHBOARD").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}
