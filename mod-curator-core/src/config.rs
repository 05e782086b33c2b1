use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info};

/// One pipeline run: where to read the tracked list, where the curated list lives,
/// and how to pace the catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    pub input: PathBuf,
    pub output: PathBuf,
    #[serde(default)]
    pub fetch: FetchConfig,
    /// Compute everything but leave the curated list untouched.
    #[serde(default)]
    pub dry_run: bool,
}

impl SyncConfig {
    pub fn trace_loaded(&self) {
        info!(
            input = %self.input.display(),
            output = %self.output.display(),
            batch_size = self.fetch.batch_size,
            batch_pause_ms = self.fetch.batch_pause_ms,
            period = self.fetch.updated_period.as_str(),
            "Loaded SyncConfig"
        );
        debug!(?self, "SyncConfig loaded (full debug)");
    }
}

/// Pacing of the batch fetch executor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    #[serde(default = "default_batch_pause_ms")]
    pub batch_pause_ms: u64,
    #[serde(default)]
    pub updated_period: UpdatedPeriod,
    #[serde(default)]
    pub on_rate_limit: RateLimitPolicy,
    /// Treat an empty `files` or `changelogs` collection as incomplete.
    #[serde(default)]
    pub repair_empty: bool,
}

fn default_batch_size() -> usize {
    5
}

fn default_batch_pause_ms() -> u64 {
    1000
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            batch_size: default_batch_size(),
            batch_pause_ms: default_batch_pause_ms(),
            updated_period: UpdatedPeriod::default(),
            on_rate_limit: RateLimitPolicy::default(),
            repair_empty: false,
        }
    }
}

impl FetchConfig {
    pub fn batch_pause(&self) -> Duration {
        Duration::from_millis(self.batch_pause_ms)
    }
}

/// Trailing window of the change signal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum UpdatedPeriod {
    #[default]
    #[serde(rename = "1d")]
    Day,
    #[serde(rename = "1w")]
    Week,
    #[serde(rename = "1m")]
    Month,
}

impl UpdatedPeriod {
    pub fn as_str(&self) -> &'static str {
        match self {
            UpdatedPeriod::Day => "1d",
            UpdatedPeriod::Week => "1w",
            UpdatedPeriod::Month => "1m",
        }
    }
}

/// What to do when the catalog rate-limits the primary info call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "kebab-case")]
pub enum RateLimitPolicy {
    /// Abort the whole run; nothing is written.
    #[default]
    Abort,
    /// Sleep and retry the same call, then abort once retries run out.
    BackoffAndRetry {
        #[serde(default = "default_max_retries")]
        max_retries: u32,
        #[serde(default = "default_initial_delay_ms")]
        initial_delay_ms: u64,
        /// Upper bound on any single wait, including a server `Retry-After` hint.
        #[serde(default = "default_max_delay_ms")]
        max_delay_ms: u64,
    },
}

fn default_max_retries() -> u32 {
    3
}

fn default_initial_delay_ms() -> u64 {
    2000
}

fn default_max_delay_ms() -> u64 {
    60_000
}

impl RateLimitPolicy {
    /// Delay before retry number `attempt` (0-based), or `None` once retries are spent.
    /// A server-provided hint wins over the exponential schedule; both are capped at `max_delay_ms`.
    pub fn retry_delay(&self, attempt: u32, hint: Option<Duration>) -> Option<Duration> {
        match self {
            RateLimitPolicy::Abort => None,
            RateLimitPolicy::BackoffAndRetry {
                max_retries,
                initial_delay_ms,
                max_delay_ms,
            } => {
                if attempt >= *max_retries {
                    return None;
                }
                let exponential = initial_delay_ms.saturating_mul(1u64 << attempt.min(16));
                let delay = hint.unwrap_or(Duration::from_millis(exponential));
                Some(delay.min(Duration::from_millis(*max_delay_ms)))
            }
        }
    }
}
