use std::env;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Load .env file (silently ignores if missing).
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|s| !s.is_empty())
}

/// Read a profiled env var: tries {PROFILE}_{KEY} first, falls back to {KEY}.
fn profiled_env_opt(profile: &str, key: &str) -> Option<String> {
    if !profile.is_empty() {
        let prefixed = format!("{}_{}", profile, key);
        if let Some(v) = env_opt(&prefixed) {
            return Some(v);
        }
    }
    env_opt(key)
}

fn profiled_env_or(profile: &str, key: &str, default: &str) -> String {
    profiled_env_opt(profile, key).unwrap_or_else(|| default.to_string())
}

fn profiled_env_usize(profile: &str, key: &str, default: usize) -> usize {
    profiled_env_opt(profile, key)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn profiled_env_bool(profile: &str, key: &str, default: bool) -> bool {
    match profiled_env_opt(profile, key) {
        Some(v) => matches!(v.to_ascii_lowercase().as_str(), "true" | "1" | "yes" | "on"),
        None => default,
    }
}

// ── Top-level config ──────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Active profile name (empty = default).
    pub profile: String,
    pub eval: EvalConfig,
    pub runtime: RuntimeConfig,
}

impl Config {
    /// Build config from environment variables (call `load_dotenv()` first).
    /// Profile is read from `RULEBOX_PROFILE` env var. When set (e.g. `PROD`),
    /// every key is first looked up as `{PROFILE}_{KEY}`, falling back to `{KEY}`.
    pub fn from_env() -> Self {
        let profile = env_or("RULEBOX_PROFILE", "").to_uppercase();
        Self::for_profile(&profile)
    }

    /// Build config for a specific named profile (empty string = default).
    pub fn for_profile(profile: &str) -> Self {
        let p = profile.to_uppercase();
        let p = p.as_str();
        Self {
            profile: p.to_string(),
            eval: EvalConfig::from_env_profiled(p),
            runtime: RuntimeConfig::from_env_profiled(p),
        }
    }

    pub fn profile_label(&self) -> &str {
        if self.profile.is_empty() { "default" } else { &self.profile }
    }

    /// Print a summary for startup logs.
    pub fn log_summary(&self) {
        tracing::info!("Config loaded (profile: {}):", self.profile_label());
        tracing::info!(
            "  eval:        parallel={}, min_parallel_batch={}",
            self.eval.parallel,
            self.eval.min_parallel_batch
        );
        tracing::info!(
            "  runtime:     worker_threads={}, log_filter={}, rules_path={}",
            self.runtime.worker_threads,
            self.runtime.log_filter,
            self.runtime
                .rules_path
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "(none)".to_string())
        );
    }
}

// ── Evaluation ────────────────────────────────────────────────

/// Batch evaluation settings carried by every rule set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvalConfig {
    /// Allow data-parallel evaluation of batches.
    pub parallel: bool,
    /// Batches smaller than this are evaluated on the calling thread.
    pub min_parallel_batch: usize,
}

pub const DEFAULT_MIN_PARALLEL_BATCH: usize = 64;

impl Default for EvalConfig {
    fn default() -> Self {
        Self {
            parallel: true,
            min_parallel_batch: DEFAULT_MIN_PARALLEL_BATCH,
        }
    }
}

impl EvalConfig {
    fn from_env_profiled(p: &str) -> Self {
        Self {
            parallel: profiled_env_bool(p, "PARALLEL_EVAL", true),
            min_parallel_batch: profiled_env_usize(p, "MIN_PARALLEL_BATCH", DEFAULT_MIN_PARALLEL_BATCH),
        }
    }

    /// Sequential evaluation regardless of batch size.
    pub fn sequential() -> Self {
        Self {
            parallel: false,
            ..Self::default()
        }
    }

    /// Whether a batch of `len` texts should be fanned out across workers.
    pub fn should_parallelize(&self, len: usize) -> bool {
        self.parallel && len > 1 && len >= self.min_parallel_batch
    }
}

// ── Runtime ───────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuntimeConfig {
    /// Worker threads for the global pool (0 = one per core).
    pub worker_threads: usize,
    /// Fallback tracing filter when `RUST_LOG` is unset.
    pub log_filter: String,
    /// Default rule file or directory.
    pub rules_path: Option<PathBuf>,
}

impl RuntimeConfig {
    fn from_env_profiled(p: &str) -> Self {
        Self {
            worker_threads: profiled_env_usize(p, "WORKER_THREADS", 0),
            log_filter: profiled_env_or(p, "LOG_FILTER", "warn"),
            rules_path: profiled_env_opt(p, "RULES_PATH").map(PathBuf::from),
        }
    }
}
