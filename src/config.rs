//! Run configuration.
//!
//! Loaded from an optional TOML file; every key has a default, so an empty file (or no
//! file) is a valid configuration. The binary applies command-line overrides on top.

use crate::coagulate_error::{CoagulateError, Result};
use crate::community::CoagulateOptions;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CoagulateConfig {
    /// Seconds between periodic checkpoint writes.
    pub checkpoint_interval_secs: f64,
    /// Seconds between stall checks.
    pub convergence_check_interval_secs: f64,
    /// Objective change below which a stall check triggers a split.
    pub convergence_threshold: f64,
    /// Seconds between progress log lines.
    pub progress_interval_secs: f64,
    /// Index advance after a successful merge.
    pub advance_on_success: usize,
    /// Index advance after a no-op step.
    pub advance_on_failure: usize,
    /// Multi-member communities sampled when choosing a split target; `0` samples all.
    pub split_sample_size: usize,
    /// Divide the split score by `log10(|nodes|)`.
    pub split_size_normalization: bool,
    /// Skip periodic writes unless the objective improved since the last one.
    pub checkpoint_only_on_improvement: bool,
    /// Only score candidates adjacent to the target.
    pub require_adjacency: bool,
    /// Candidate count at which scoring fans out across threads.
    pub parallel_min_candidates: usize,
    /// Merges plus splits between full recomputations of the objective aggregates.
    pub recompute_every: u64,
    /// Jump to a random index after each periodic checkpoint.
    pub randomize_index_after_checkpoint: bool,
    /// Seed for split sampling and index jumps; derived from the clock when absent.
    pub rng_seed: Option<u64>,
    /// Stop after this many optimization steps.
    pub max_steps: Option<u64>,
    /// Stop after this many seconds.
    pub max_duration_secs: Option<f64>,
}

impl Default for CoagulateConfig {
    fn default() -> Self {
        Self {
            checkpoint_interval_secs: 300.0,
            convergence_check_interval_secs: 10.0,
            convergence_threshold: 1e-3,
            progress_interval_secs: 10.0,
            advance_on_success: 3,
            advance_on_failure: 1,
            split_sample_size: 64,
            split_size_normalization: true,
            checkpoint_only_on_improvement: true,
            require_adjacency: true,
            parallel_min_candidates: 256,
            recompute_every: 1000,
            randomize_index_after_checkpoint: true,
            rng_seed: None,
            max_steps: None,
            max_duration_secs: None,
        }
    }
}

impl CoagulateConfig {
    /// Load from a TOML file and validate.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| CoagulateError::io(path, e))?;
        let config: CoagulateConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the control loop cannot run with.
    pub fn validate(&self) -> Result<()> {
        let intervals = [
            ("checkpoint_interval_secs", self.checkpoint_interval_secs),
            ("convergence_check_interval_secs", self.convergence_check_interval_secs),
            ("progress_interval_secs", self.progress_interval_secs),
        ];
        for (name, secs) in intervals {
            if !(secs.is_finite() && secs > 0.0) {
                return Err(CoagulateError::InvalidConfig(format!(
                    "{name} must be a positive number of seconds, got {secs}"
                )));
            }
        }
        if let Some(secs) = self.max_duration_secs {
            if !(secs.is_finite() && secs >= 0.0) {
                return Err(CoagulateError::InvalidConfig(format!(
                    "max_duration_secs must be non-negative, got {secs}"
                )));
            }
        }
        if !(self.convergence_threshold.is_finite() && self.convergence_threshold >= 0.0) {
            return Err(CoagulateError::InvalidConfig(format!(
                "convergence_threshold must be non-negative, got {}",
                self.convergence_threshold
            )));
        }
        if self.advance_on_success == 0 || self.advance_on_failure == 0 {
            return Err(CoagulateError::InvalidConfig(
                "index advances must be at least 1".into(),
            ));
        }
        if self.recompute_every == 0 {
            return Err(CoagulateError::InvalidConfig(
                "recompute_every must be at least 1".into(),
            ));
        }
        Ok(())
    }

    pub fn checkpoint_interval(&self) -> Duration {
        Duration::from_secs_f64(self.checkpoint_interval_secs)
    }

    pub fn convergence_check_interval(&self) -> Duration {
        Duration::from_secs_f64(self.convergence_check_interval_secs)
    }

    pub fn progress_interval(&self) -> Duration {
        Duration::from_secs_f64(self.progress_interval_secs)
    }

    pub fn max_duration(&self) -> Option<Duration> {
        self.max_duration_secs.map(Duration::from_secs_f64)
    }

    pub fn coagulate_options(&self) -> CoagulateOptions {
        CoagulateOptions {
            require_adjacency: self.require_adjacency,
            parallel_min_candidates: self.parallel_min_candidates,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        CoagulateConfig::default().validate().unwrap();
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let cfg: CoagulateConfig = toml::from_str(
            "checkpoint_interval_secs = 60\nconvergence_threshold = 0.01\nrng_seed = 9\n",
        )
        .unwrap();
        assert_eq!(cfg.checkpoint_interval_secs, 60.0);
        assert_eq!(cfg.convergence_threshold, 0.01);
        assert_eq!(cfg.rng_seed, Some(9));
        assert_eq!(cfg.advance_on_success, 3);
        assert!(cfg.require_adjacency);
    }

    #[test]
    fn unknown_key_rejected() {
        assert!(toml::from_str::<CoagulateConfig>("checkpoint_every = 3\n").is_err());
    }

    #[test]
    fn zero_interval_rejected() {
        let cfg = CoagulateConfig {
            convergence_check_interval_secs: 0.0,
            ..Default::default()
        };
        assert!(matches!(cfg.validate(), Err(CoagulateError::InvalidConfig(_))));
    }

    #[test]
    fn nan_threshold_rejected() {
        let cfg = CoagulateConfig {
            convergence_threshold: f64::NAN,
            ..Default::default()
        };
        assert!(cfg.validate().is_err());
    }
}
