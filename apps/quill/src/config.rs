//! Application configuration loaded from environment variables.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use clap::ValueEnum;
use quill_core::ports::StorageScope;
use quill_core::services::{AuthConfig, PostsConfig};
use quill_infra::RemoteConfig;
use quill_infra::remote::DEFAULT_REMOTE_URL;

#[cfg(feature = "redis")]
use quill_infra::RedisConfig;

/// Which backend holds the snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StorageKind {
    /// Files under the data directory.
    Durable,
    /// Process memory; gone when the command exits.
    Session,
    /// Redis at `REDIS_URL`.
    Redis,
}

impl StorageKind {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "durable" | "local" | "file" => Some(Self::Durable),
            "session" | "memory" => Some(Self::Session),
            "redis" => Some(Self::Redis),
            _ => None,
        }
    }

    pub fn scope(&self) -> StorageScope {
        match self {
            StorageKind::Session => StorageScope::Session,
            StorageKind::Durable | StorageKind::Redis => StorageScope::Durable,
        }
    }
}

impl Default for StorageKind {
    fn default() -> Self {
        match StorageScope::default() {
            StorageScope::Session => StorageKind::Session,
            StorageScope::Durable => StorageKind::Durable,
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub storage: StorageKind,
    pub data_dir: PathBuf,
    pub remote_url: String,
    pub remote_limit: usize,
    pub latency: Duration,
    pub logout_latency: Duration,
    #[cfg(feature = "redis")]
    pub redis: RedisConfig,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let storage = match env::var("QUILL_STORAGE") {
            Ok(value) => StorageKind::parse(&value).unwrap_or_else(|| {
                tracing::warn!(value = %value, "Unknown QUILL_STORAGE, using durable storage");
                StorageKind::Durable
            }),
            Err(_) => StorageKind::default(),
        };

        Self {
            storage,
            data_dir: env::var("QUILL_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(".quill")),
            remote_url: env::var("QUILL_REMOTE_URL")
                .unwrap_or_else(|_| DEFAULT_REMOTE_URL.to_string()),
            remote_limit: env::var("QUILL_REMOTE_LIMIT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(10),
            latency: Duration::from_millis(
                env::var("QUILL_LATENCY_MS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(500),
            ),
            logout_latency: Duration::from_millis(
                env::var("QUILL_LOGOUT_LATENCY_MS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(300),
            ),
            #[cfg(feature = "redis")]
            redis: RedisConfig::from_env(),
        }
    }

    /// Drop all simulated latency.
    pub fn without_latency(mut self) -> Self {
        self.latency = Duration::ZERO;
        self.logout_latency = Duration::ZERO;
        self
    }

    pub fn auth(&self) -> AuthConfig {
        AuthConfig {
            latency: self.latency,
            logout_latency: self.logout_latency,
        }
    }

    pub fn posts(&self) -> PostsConfig {
        PostsConfig {
            latency: self.latency,
            remote_limit: self.remote_limit,
            ..PostsConfig::default()
        }
    }

    pub fn remote(&self) -> RemoteConfig {
        RemoteConfig {
            base_url: self.remote_url.clone(),
            ..RemoteConfig::default()
        }
    }
}
