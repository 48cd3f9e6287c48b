//! Control loop: drives greedy steps, stall-triggered splits, periodic checkpoints and
//! shutdown.
//!
//! One thread owns the [`Partition`] for the whole run. Each iteration performs one
//! [`coagulate`] step and then polls the convergence, checkpoint and progress tickers and
//! the shutdown flag without blocking. Every exit path writes a final checkpoint before
//! returning.

mod ticker;

use crate::checkpoint;
use crate::coagulate_error::{CoagulateError, Result};
use crate::community::{CoagulateOptions, Partition, coagulate, pick_split_target};
use crate::config::CoagulateConfig;
use crate::graph::GraphStore;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Instant, SystemTime, UNIX_EPOCH};
use ticker::Ticker;

/// Why [`ControlLoop::run`] returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The shutdown flag was raised.
    Shutdown,
    /// `max_steps` was reached.
    StepLimit,
    /// `max_duration_secs` elapsed.
    TimeLimit,
}

/// Counters describing a finished run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub reason: StopReason,
    pub steps: u64,
    pub merges: u64,
    pub splits: u64,
    pub checkpoints: u64,
    /// Full recomputations of the objective aggregates.
    pub recomputations: u64,
    pub communities: usize,
    pub objective: f64,
}

/// Owns the partition for one run and drives it until told to stop.
pub struct ControlLoop<'g, G: GraphStore> {
    graph: &'g G,
    partition: Partition,
    config: CoagulateConfig,
    output: PathBuf,
    shutdown: Arc<AtomicBool>,
    rng: SmallRng,
}

impl<'g, G: GraphStore> ControlLoop<'g, G> {
    /// `output` is where checkpoints go; `shutdown` is polled once per iteration.
    ///
    /// # Errors
    /// [`CoagulateError::EmptyGraph`] when `partition` has no communities, or any
    /// [`CoagulateConfig::validate`] failure.
    pub fn new(
        graph: &'g G,
        partition: Partition,
        config: CoagulateConfig,
        output: impl AsRef<Path>,
        shutdown: Arc<AtomicBool>,
    ) -> Result<Self> {
        config.validate()?;
        if partition.count() == 0 {
            return Err(CoagulateError::EmptyGraph);
        }
        let seed = config.rng_seed.unwrap_or_else(clock_seed);
        log::debug!("control loop seed {seed}");
        Ok(Self {
            graph,
            partition,
            config,
            output: output.as_ref().to_path_buf(),
            shutdown,
            rng: SmallRng::seed_from_u64(seed),
        })
    }

    pub fn partition(&self) -> &Partition {
        &self.partition
    }

    pub fn into_partition(self) -> Partition {
        self.partition
    }

    /// Run until shutdown or a configured limit, then write the final checkpoint.
    pub fn run(&mut self) -> Result<RunSummary> {
        let opts = self.config.coagulate_options();
        let start = Instant::now();
        let mut convergence = Ticker::new(self.config.convergence_check_interval(), start);
        let mut checkpoint_tick = Ticker::new(self.config.checkpoint_interval(), start);
        let mut progress = Ticker::new(self.config.progress_interval(), start);

        let mut summary = RunSummary {
            reason: StopReason::Shutdown,
            steps: 0,
            merges: 0,
            splits: 0,
            checkpoints: 0,
            recomputations: 0,
            communities: self.partition.count(),
            objective: self.partition.objective(),
        };
        let mut index = 0usize;
        let mut last_checked = self.partition.objective();
        let mut last_written: Option<f64> = None;
        let mut since_recompute = 0u64;

        let reason = loop {
            if self.shutdown.load(Ordering::SeqCst) {
                log::info!("shutdown requested, writing final checkpoint");
                break StopReason::Shutdown;
            }
            if self.config.max_steps.is_some_and(|max| summary.steps >= max) {
                break StopReason::StepLimit;
            }
            if self
                .config
                .max_duration()
                .is_some_and(|limit| start.elapsed() >= limit)
            {
                break StopReason::TimeLimit;
            }

            index = self.step(index, &opts, &mut summary, &mut since_recompute)?;

            let now = Instant::now();
            if progress.poll(now) {
                log::info!(
                    "{} communities, Q = {:.6} ({} merges, {} splits)",
                    self.partition.count(),
                    self.partition.objective(),
                    summary.merges,
                    summary.splits
                );
            }
            if convergence.poll(now) {
                let value = self.partition.objective();
                if (value - last_checked).abs() < self.config.convergence_threshold {
                    since_recompute += self.escape_stall(&mut summary)?;
                }
                last_checked = self.partition.objective();
            }
            if checkpoint_tick.poll(now) {
                let value = self.partition.objective();
                let improved = last_written.is_none_or(|w| value > w);
                if improved || !self.config.checkpoint_only_on_improvement {
                    checkpoint::write_checkpoint(&self.output, &self.partition)?;
                    summary.checkpoints += 1;
                    last_written = Some(value);
                    if self.config.randomize_index_after_checkpoint {
                        index = self.rng.gen_range(0..self.partition.count());
                    }
                } else {
                    log::debug!("objective unchanged since last checkpoint, skipping write");
                }
            }
        };

        checkpoint::write_checkpoint(&self.output, &self.partition)?;
        summary.checkpoints += 1;
        summary.reason = reason;
        summary.communities = self.partition.count();
        summary.objective = self.partition.objective();
        log::info!(
            "stopped ({reason:?}) after {} steps: {} communities, Q = {:.6}",
            summary.steps,
            summary.communities,
            summary.objective
        );
        Ok(summary)
    }

    /// One greedy step at `index mod count`; returns the next index.
    fn step(
        &mut self,
        index: usize,
        opts: &CoagulateOptions,
        summary: &mut RunSummary,
        since_recompute: &mut u64,
    ) -> Result<usize> {
        let target = index % self.partition.count();
        let outcome = coagulate(&mut self.partition, target, opts)?;
        summary.steps += 1;
        let next = if outcome.merged() {
            summary.merges += 1;
            *since_recompute += 1;
            target + self.config.advance_on_success
        } else {
            target + self.config.advance_on_failure
        };

        if *since_recompute >= self.config.recompute_every {
            let drift = self.partition.recompute_aggregates();
            log::debug!("recomputed objective aggregates, corrected drift {drift:.3e}");
            summary.recomputations += 1;
            *since_recompute = 0;
        }
        #[cfg(feature = "check-invariants")]
        self.partition.validate(self.graph)?;
        Ok(next)
    }

    /// Split the weakest sampled community. Returns how many splits happened (0 or 1).
    fn escape_stall(&mut self, summary: &mut RunSummary) -> Result<u64> {
        let target = pick_split_target(
            &self.partition,
            self.config.split_sample_size,
            self.config.split_size_normalization,
            &mut self.rng,
        );
        let Some(target) = target else {
            log::debug!("stalled with only singletons, nothing to split");
            return Ok(0);
        };
        let size = self.partition.communities()[target].len();
        self.partition.split(target, self.graph)?;
        summary.splits += 1;
        log::info!(
            "stalled at Q = {:.6}; split a community of {size} nodes",
            self.partition.objective()
        );
        Ok(1)
    }
}

fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::AdjacencyGraph;

    fn two_triangles() -> AdjacencyGraph {
        AdjacencyGraph::from_edges(&[(0, 1), (1, 2), (0, 2), (3, 4), (4, 5), (3, 5), (2, 3)])
    }

    fn quick_config() -> CoagulateConfig {
        CoagulateConfig {
            checkpoint_interval_secs: 3600.0,
            convergence_check_interval_secs: 3600.0,
            progress_interval_secs: 3600.0,
            rng_seed: Some(1),
            ..Default::default()
        }
    }

    #[test]
    fn step_limit_writes_final_checkpoint() {
        let g = two_triangles();
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out.txt");
        let p = Partition::initialize(&g).unwrap();
        let cfg = CoagulateConfig {
            max_steps: Some(50),
            ..quick_config()
        };
        let mut cl = ControlLoop::new(&g, p, cfg, &out, Arc::new(AtomicBool::new(false))).unwrap();
        let summary = cl.run().unwrap();
        assert_eq!(summary.reason, StopReason::StepLimit);
        assert_eq!(summary.steps, 50);
        assert_eq!(summary.checkpoints, 1);
        assert_eq!(summary.communities, 2);
        assert!(out.exists());
        cl.partition().validate(&g).unwrap();
    }

    #[test]
    fn raised_flag_stops_before_first_step() {
        let g = two_triangles();
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out.txt");
        let p = Partition::initialize(&g).unwrap();
        let mut cl = ControlLoop::new(&g, p, quick_config(), &out, Arc::new(AtomicBool::new(true)))
            .unwrap();
        let summary = cl.run().unwrap();
        assert_eq!(summary.reason, StopReason::Shutdown);
        assert_eq!(summary.steps, 0);
        assert!(out.exists());
    }

    #[test]
    fn empty_partition_rejected() {
        let g = AdjacencyGraph::from_edges(&[]);
        let p = Partition::initialize(&g).unwrap();
        assert_eq!(p.count(), 0);
        let cfg = CoagulateConfig {
            max_steps: Some(5),
            ..quick_config()
        };
        let res = ControlLoop::new(&g, p, cfg, "unused", Arc::new(AtomicBool::new(false)));
        assert!(matches!(res, Err(CoagulateError::EmptyGraph)));
    }

    #[test]
    fn invalid_config_rejected() {
        let g = two_triangles();
        let p = Partition::initialize(&g).unwrap();
        let cfg = CoagulateConfig {
            advance_on_failure: 0,
            ..quick_config()
        };
        assert!(ControlLoop::new(&g, p, cfg, "unused", Arc::new(AtomicBool::new(false))).is_err());
    }
}
