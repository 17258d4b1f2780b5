//! Optional TOML overlay for the tunables in [`cluster_core::ClusterConfig`].
//! Every field is optional; anything left unset keeps its built-in default.
//! Layering order (lowest to highest precedence) is: built-in defaults,
//! this file, `CLUSTER_*` environment variables, then CLI flags.

use cluster_core::ClusterError;
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Default, Deserialize)]
pub struct FileConfig {
    pub max_queue_size: Option<usize>,
    pub min_queue_length: Option<usize>,
    pub max_tasks_to_steal: Option<u32>,
    pub max_steal_count: Option<u32>,

    pub metrics_interval_ms: Option<u64>,
    pub heartbeat_interval_ms: Option<u64>,
    pub election_interval_ms: Option<u64>,
    pub steal_interval_ms: Option<u64>,
    pub worker_poll_interval_ms: Option<u64>,
    pub heartbeat_timeout_ms: Option<u64>,
    pub steal_timeout_ms: Option<u64>,
}

impl FileConfig {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ClusterError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            ClusterError::Config(format!("failed to read config file {}: {e}", path.display()))
        })?;
        toml::from_str(&content)
            .map_err(|e| ClusterError::Config(format!("invalid config file {}: {e}", path.display())))
    }

    /// Apply every set field onto `cfg`, in place.
    pub fn apply(&self, cfg: &mut cluster_core::ClusterConfig) {
        if let Some(v) = self.max_queue_size {
            cfg.max_queue_size = v;
        }
        if let Some(v) = self.min_queue_length {
            cfg.min_queue_length = v;
        }
        if let Some(v) = self.max_tasks_to_steal {
            cfg.max_tasks_to_steal = v;
        }
        if let Some(v) = self.max_steal_count {
            cfg.max_steal_count = v;
        }
        if let Some(v) = self.metrics_interval_ms {
            cfg.metrics_interval_ms = v;
        }
        if let Some(v) = self.heartbeat_interval_ms {
            cfg.heartbeat_interval_ms = v;
        }
        if let Some(v) = self.election_interval_ms {
            cfg.election_interval_ms = v;
        }
        if let Some(v) = self.steal_interval_ms {
            cfg.steal_interval_ms = v;
        }
        if let Some(v) = self.worker_poll_interval_ms {
            cfg.worker_poll_interval_ms = v;
        }
        if let Some(v) = self.heartbeat_timeout_ms {
            cfg.heartbeat_timeout_ms = v;
        }
        if let Some(v) = self.steal_timeout_ms {
            cfg.steal_timeout_ms = v;
        }
    }
}

/// Apply `CLUSTER_*` environment variable overrides, in place. Malformed
/// values are ignored rather than treated as fatal, since they're almost
/// always leftover unrelated environment noise.
pub fn apply_env_overrides(cfg: &mut cluster_core::ClusterConfig) {
    macro_rules! env_override {
        ($var:literal, $field:ident) => {
            if let Ok(value) = std::env::var($var) {
                if let Ok(parsed) = value.parse() {
                    cfg.$field = parsed;
                }
            }
        };
    }

    env_override!("CLUSTER_MAX_QUEUE_SIZE", max_queue_size);
    env_override!("CLUSTER_MIN_QUEUE_LENGTH", min_queue_length);
    env_override!("CLUSTER_MAX_TASKS_TO_STEAL", max_tasks_to_steal);
    env_override!("CLUSTER_MAX_STEAL_COUNT", max_steal_count);
    env_override!("CLUSTER_METRICS_INTERVAL_MS", metrics_interval_ms);
    env_override!("CLUSTER_HEARTBEAT_INTERVAL_MS", heartbeat_interval_ms);
    env_override!("CLUSTER_ELECTION_INTERVAL_MS", election_interval_ms);
    env_override!("CLUSTER_STEAL_INTERVAL_MS", steal_interval_ms);
    env_override!("CLUSTER_WORKER_POLL_INTERVAL_MS", worker_poll_interval_ms);
    env_override!("CLUSTER_HEARTBEAT_TIMEOUT_MS", heartbeat_timeout_ms);
    env_override!("CLUSTER_STEAL_TIMEOUT_MS", steal_timeout_ms);
}
