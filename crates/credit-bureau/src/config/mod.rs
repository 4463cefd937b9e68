use std::env;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use crate::credit::provider::{
    FixedScoreProvider, RandomScoreProvider, ScoreProvider, MAX_BUREAU_SCORE, MIN_BUREAU_SCORE,
};

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the credit bureau service.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub bureau: BureauConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::parse(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let fallback_score = match env::var("CREDIT_FALLBACK_SCORE") {
            Ok(raw) => FallbackScore::parse(&raw)?,
            Err(_) => FallbackScore::Random,
        };

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            bureau: BureauConfig { fallback_score },
        })
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Bureau behavior knobs.
#[derive(Debug, Clone)]
pub struct BureauConfig {
    pub fallback_score: FallbackScore,
}

/// How a score is produced for an identity with nothing on file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackScore {
    Random,
    Fixed(i32),
}

impl FallbackScore {
    pub fn parse(raw: &str) -> Result<Self, ConfigError> {
        let value = raw.trim();
        if value.eq_ignore_ascii_case("random") {
            return Ok(Self::Random);
        }

        let score = value
            .parse::<i32>()
            .map_err(|_| ConfigError::InvalidFallbackScore(raw.to_string()))?;
        if !(MIN_BUREAU_SCORE..=MAX_BUREAU_SCORE).contains(&score) {
            return Err(ConfigError::InvalidFallbackScore(raw.to_string()));
        }
        Ok(Self::Fixed(score))
    }

    pub fn provider(self) -> Arc<dyn ScoreProvider> {
        match self {
            FallbackScore::Random => Arc::new(RandomScoreProvider),
            FallbackScore::Fixed(score) => Arc::new(FixedScoreProvider(score)),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("APP_PORT must be a valid u16")]
    InvalidPort,
    #[error("APP_HOST must parse to an IPv4 or IPv6 address")]
    InvalidHost { source: std::net::AddrParseError },
    #[error("CREDIT_FALLBACK_SCORE must be 'random' or a score between 300 and 850 (got '{0}')")]
    InvalidFallbackScore(String),
}
