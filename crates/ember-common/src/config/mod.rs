//! Configuration loading

mod app_config;

pub use app_config::{
    AppConfig, AppSettings, ConfigError, CorsConfig, DatabaseConfig, Environment, GeocoderConfig,
    JwtConfig, RateLimitConfig, ServerConfig, SnowflakeConfig, StorageConfig,
};
