use anyhow::Result;
use figment::{providers::{Env, Format, Serialized, Toml}, Figment};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub load: LoadConfig,
    pub log: LogConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Must stay above the 120 s duration cap or long runs get cut off.
    pub request_timeout_secs: u64,
    pub enable_cors: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            request_timeout_secs: 150,
            enable_cors: false,
        }
    }
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        Ok(format!("{}:{}", self.host, self.port).parse()?)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// Level for this crate's events; `debug` adds per-unit completion events.
    /// `RUST_LOG` overrides the whole filter.
    pub level: String,
    pub json: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: true,
        }
    }
}

/// Operational knobs of the load engine. The profile bounds themselves
/// (duration, memory) are fixed and live in `domain::profile`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadConfig {
    /// Scratch file written by the I/O churn loop
    pub scratch_path: PathBuf,
    /// Random bytes generated per append (written hex-encoded, so twice this on disk)
    pub io_block_bytes: usize,
    /// Pause between I/O iterations
    pub io_pause_ms: u64,
    /// PBKDF2 rounds per CPU burn iteration
    pub kdf_iterations: u32,
    /// Scratch file is truncated once it grows past this size
    pub scratch_cap_bytes: u64,
    /// Reported host name; falls back to the OS hostname
    #[serde(default)]
    pub host_name: Option<String>,
}

impl Default for LoadConfig {
    fn default() -> Self {
        Self {
            scratch_path: PathBuf::from("/tmp/stress.txt"),
            io_block_bytes: 1024,
            io_pause_ms: 5,
            kdf_iterations: 100_000,
            scratch_cap_bytes: 64 * 1024 * 1024,
            host_name: None,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let figment = Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file("config/default.toml"))
            .merge(Env::prefixed("LOADGEN__").split("__"));
        Ok(figment.extract()?)
    }
}
