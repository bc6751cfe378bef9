use std::env;
use std::net::{IpAddr, Ipv4Addr};
use std::str::FromStr;

use crate::constants::DEFAULT_PROFILE_BACKGROUND;
use crate::pipeline::embedding::SkipGramConfig;
use crate::pipeline::ClusterConfig;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: IpAddr,
    pub port: u16,
    pub log_level: String,
    pub enable_file_logs: bool,
    pub log_dir: String,
    pub cors_origin: String,
    pub source: SourceConfig,
    pub cluster: ClusterConfig,
    pub enrich: EnrichConfig,
    pub refresh: RefreshConfig,
}

#[derive(Debug, Clone)]
pub struct SourceConfig {
    pub base_url: String,
    pub timeout_secs: u64,
    pub retry_attempts: u32,
    pub retry_delay_ms: u64,
}

#[derive(Debug, Clone)]
pub struct EnrichConfig {
    pub timeout_secs: u64,
    pub default_background: String,
}

#[derive(Debug, Clone)]
pub struct RefreshConfig {
    pub enabled: bool,
    pub cron: String,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            host: env_or_parse("HOST", IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1))),
            port: env_or_parse("PORT", 3000_u16),
            log_level: env_or("RUST_LOG", "info"),
            enable_file_logs: env_or_bool("ENABLE_FILE_LOGS", false),
            log_dir: env_or("LOG_DIR", "./logs"),
            cors_origin: env_or("CORS_ORIGIN", "*"),
            source: SourceConfig {
                base_url: env_or("SOURCE_BASE_URL", "https://potato.tf"),
                timeout_secs: env_or_parse("SOURCE_TIMEOUT_SECS", 30_u64),
                retry_attempts: env_or_parse("SOURCE_RETRY_ATTEMPTS", 3_u32),
                retry_delay_ms: env_or_parse("SOURCE_RETRY_DELAY_MS", 2000_u64),
            },
            cluster: ClusterConfig {
                n_clusters: env_or_parse("CLUSTER_COUNT", 30_usize),
                variance: env_or_parse("CLUSTER_VARIANCE", 0.95_f64),
                n_init: env_or_parse("CLUSTER_N_INIT", 10_usize),
                kmeans_seed: env_or_parse("CLUSTER_KMEANS_SEED", 0_u64),
                embedding: SkipGramConfig {
                    vector_size: env_or_parse("CLUSTER_VECTOR_SIZE", 200_usize),
                    window: env_or_parse("CLUSTER_WINDOW", 20_usize),
                    epochs: env_or_parse("CLUSTER_EPOCHS", 20_usize),
                    negative: env_or_parse("CLUSTER_NEGATIVE", 5_usize),
                    hs: env_or_bool("CLUSTER_HS", true),
                    seed: env_opt_parse("CLUSTER_EMBEDDING_SEED"),
                    ..SkipGramConfig::default()
                },
            },
            enrich: EnrichConfig {
                timeout_secs: env_or_parse("ENRICH_TIMEOUT_SECS", 15_u64),
                default_background: env_or("ENRICH_DEFAULT_BACKGROUND", DEFAULT_PROFILE_BACKGROUND),
            },
            refresh: RefreshConfig {
                enabled: env_or_bool("REFRESH_ENABLED", true),
                cron: env_or("REFRESH_CRON", "0 0 * * * *"),
            },
        }
    }
}

pub fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

pub fn env_or_parse<T>(key: &str, default: T) -> T
where
    T: FromStr + Copy,
{
    env_opt_parse(key).unwrap_or(default)
}

/// Like [`env_or_parse`] but distinguishes "unset" from a value.
pub fn env_opt_parse<T: FromStr>(key: &str) -> Option<T> {
    let raw = env::var(key).ok()?;
    match raw.trim().parse::<T>() {
        Ok(v) => Some(v),
        Err(_) => {
            tracing::warn!(key, value = %raw, "Failed to parse env var, using default");
            None
        }
    }
}

pub fn env_or_bool(key: &str, default: bool) -> bool {
    match env::var(key) {
        Ok(raw) => match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => true,
            "0" | "false" | "no" | "off" => false,
            _ => default,
        },
        Err(_) => default,
    }
}
