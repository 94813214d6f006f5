//! The mini-batch training driver: epoch iteration, learning-rate decay,
//! the momentum ramp, per-epoch evaluation and reporting, and the
//! epochs-after-overfit early stop.

use std::time::Instant;

use ndarray::s;
use rand::RngCore;

use crate::config::ExperimentConfig;
use crate::data::Dataset;
use crate::debug::check_gradients;
use crate::error::Result;
use crate::metrics::num_errors;
use crate::network::Mlp;
use crate::reporting::{EpochRecord, EpochSink};

/// Momentum after `epoch` epochs of a linear ramp from `initial` to `final`
/// over `ramp_epochs`, held at `final` afterwards.
pub fn momentum_at(initial: f64, final_momentum: f64, ramp_epochs: usize, epoch: usize) -> f64 {
    if ramp_epochs == 0 || epoch >= ramp_epochs {
        return final_momentum;
    }
    let fraction = epoch as f64 / ramp_epochs as f64;
    (1.0 - fraction) * initial + fraction * final_momentum
}

/// Early-stopping bookkeeping: after the first zero-error epoch the
/// configured number of grace epochs must elapse before stopping, and any
/// epoch with training errors resets the countdown to its maximum.
#[derive(Clone, Copy, Debug)]
pub struct OverfitWatch {
    grace: usize,
    remaining: usize,
}

impl OverfitWatch {
    pub fn new(grace: usize) -> Self {
        OverfitWatch {
            grace,
            remaining: grace,
        }
    }

    /// Feed one epoch's training error count; returns true when training
    /// should stop.
    pub fn observe(&mut self, train_errors: usize) -> bool {
        if train_errors > 0 {
            self.remaining = self.grace;
            return false;
        }
        if self.remaining == 0 {
            return true;
        }
        self.remaining -= 1;
        false
    }

    pub fn remaining(&self) -> usize {
        self.remaining
    }
}

/// What a finished (or early-stopped) run looked like.
#[derive(Clone, Debug)]
pub struct TrainingSummary {
    pub epochs_run: usize,
    pub final_train_errors: usize,
    pub final_test_errors: usize,
    pub stopped_early: bool,
    /// Entries flagged by the optional gradient check; diagnostic only.
    pub gradient_warnings: usize,
}

/// Drives mini-batch training of an [`Mlp`] against a train/test split.
pub struct Trainer {
    pub config: ExperimentConfig,
}

impl Trainer {
    pub fn new(config: ExperimentConfig) -> Self {
        Trainer { config }
    }

    /// Run the configured number of epochs. Within an epoch the training set
    /// is sliced into fixed-order contiguous mini-batches (the last one may
    /// be short); momentum state accumulates across those calls, so batch
    /// order is part of the reproducibility contract.
    pub fn fit<S: EpochSink>(
        &self,
        mlp: &mut Mlp,
        train: &Dataset,
        test: &Dataset,
        rng: &mut dyn RngCore,
        sink: &mut S,
    ) -> Result<TrainingSummary> {
        let cfg = &self.config;
        cfg.validate()?;

        let samples = train.len();
        let mut learning_rate = cfg.learning_rate;
        let mut momentum = cfg.momentum_initial;
        let mut watch = OverfitWatch::new(cfg.num_epochs_after_overfit);
        let mut summary = TrainingSummary {
            epochs_run: 0,
            final_train_errors: 0,
            final_test_errors: 0,
            stopped_early: false,
            gradient_warnings: 0,
        };

        for epoch in 0..cfg.num_epochs {
            if epoch == 2 && cfg.check_gradient {
                let count = samples.min(10);
                let report = check_gradients(
                    mlp,
                    train.features.slice(s![..count, ..]),
                    train.labels.slice(s![..count, ..]),
                    rng,
                )?;
                summary.gradient_warnings = report.mismatches.len();
            }

            let start = Instant::now();
            let mut index = 0;
            while index < samples {
                let end = (index + cfg.minibatch_size).min(samples);
                mlp.train(
                    train.features.slice(s![index..end, ..]),
                    train.labels.slice(s![index..end, ..]),
                    learning_rate,
                    momentum,
                    rng,
                )?;
                index = end;
            }
            let elapsed_secs = start.elapsed().as_secs_f64();

            learning_rate *= cfg.rate_decay;
            momentum = momentum_at(cfg.momentum_initial, cfg.momentum_final, cfg.momentum_t, epoch);

            let train_errors = num_errors(
                train.labels.view(),
                mlp.predict(train.features.view())?.view(),
            );
            let test_errors = num_errors(
                test.labels.view(),
                mlp.predict(test.features.view())?.view(),
            );

            sink.record(&EpochRecord {
                epoch,
                train_errors,
                test_errors,
                learning_rate,
                momentum,
                elapsed_secs,
            })?;

            summary.epochs_run = epoch + 1;
            summary.final_train_errors = train_errors;
            summary.final_test_errors = test_errors;

            if watch.observe(train_errors) {
                summary.stopped_early = true;
                break;
            }
        }

        Ok(summary)
    }
}
