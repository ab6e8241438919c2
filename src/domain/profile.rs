use serde::Serialize;
use std::time::Duration;

// ============================================================================
// Bounds and defaults
// ============================================================================

pub const MIN_DURATION_SECS: u64 = 1;
pub const MAX_DURATION_SECS: u64 = 120;
pub const DEFAULT_DURATION_SECS: u64 = 10;

pub const MIN_WORKERS: usize = 1;
pub const DEFAULT_WORKERS: usize = 1;

pub const MIN_MEMORY_MB: usize = 0;
pub const MAX_MEMORY_MB: usize = 512;
pub const DEFAULT_MEMORY_MB: usize = 0;

/// Raw, untrusted load parameters as they arrive on the query string or form.
///
/// Every field stays a string so that garbage never rejects the request;
/// interpretation happens in [`LoadProfile::resolve`].
#[derive(Debug, Clone, Default)]
pub struct LoadParams {
    pub duration: Option<String>,
    pub workers: Option<String>,
    /// `memMB` on the wire
    pub mem_mb: Option<String>,
    pub io: Option<String>,
}

/// The effective, clamped load of one invocation.
///
/// Only constructible through [`LoadProfile::resolve`], so every value held
/// here is already inside its bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LoadProfile {
    duration_secs: u64,
    worker_count: usize,
    memory_mb: usize,
    io_enabled: bool,
}

impl LoadParams {
    /// Build from decoded key/value pairs, keeping the first value of a
    /// repeated key and ignoring unknown keys.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut params = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_ref() {
                "duration" => &mut params.duration,
                "workers" => &mut params.workers,
                "memMB" => &mut params.mem_mb,
                "io" => &mut params.io,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value.into());
            }
        }
        params
    }
}

impl LoadProfile {
    /// Resolve request parameters against the host's processor count.
    ///
    /// Missing or unparseable numbers fall back to their defaults, then each
    /// value is clamped with `max(lower, min(upper, value))`. This never fails.
    pub fn resolve(params: &LoadParams, available_processors: usize) -> Self {
        let max_workers = available_processors.max(MIN_WORKERS);

        Self {
            duration_secs: resolve_field(
                params.duration.as_deref(),
                DEFAULT_DURATION_SECS as f64,
                MIN_DURATION_SECS as f64,
                MAX_DURATION_SECS as f64,
            ) as u64,
            worker_count: resolve_field(
                params.workers.as_deref(),
                DEFAULT_WORKERS as f64,
                MIN_WORKERS as f64,
                max_workers as f64,
            ) as usize,
            memory_mb: resolve_field(
                params.mem_mb.as_deref(),
                DEFAULT_MEMORY_MB as f64,
                MIN_MEMORY_MB as f64,
                MAX_MEMORY_MB as f64,
            ) as usize,
            io_enabled: params.io.as_deref() == Some("1"),
        }
    }

    pub fn duration_secs(&self) -> u64 {
        self.duration_secs
    }

    pub fn duration(&self) -> Duration {
        Duration::from_secs(self.duration_secs)
    }

    pub fn worker_count(&self) -> usize {
        self.worker_count
    }

    pub fn memory_mb(&self) -> usize {
        self.memory_mb
    }

    pub fn io_enabled(&self) -> bool {
        self.io_enabled
    }
}

/// Parse a numeric parameter leniently.
///
/// Accepts anything `f64` parses (`"3"`, `" 2.5 "`, `"1e2"`, `"Infinity"`).
/// Empty and NaN count as unparseable; infinities are left for the clamp.
fn parse_number(raw: Option<&str>) -> Option<f64> {
    let trimmed = raw?.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|v| !v.is_nan())
}

fn resolve_field(raw: Option<&str>, default: f64, lower: f64, upper: f64) -> f64 {
    let value = parse_number(raw).unwrap_or(default).trunc();
    lower.max(upper.min(value))
}
