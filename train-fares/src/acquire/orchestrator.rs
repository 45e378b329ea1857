//! Drives a provider over the planned tasks until they are done or it gives up.

use std::collections::VecDeque;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info, warn};

use crate::domain::{MissingService, RequestTask};
use crate::ledger::{RecordLedger, RecordSink, StorageError, write_missing_services};

use super::clock::{Clock, SystemClock};
use super::config::{AcquireConfig, Selection};
use super::error::AcquireError;
use super::plan::plan_tasks;
use super::progress::Progress;
use super::provider::ServiceProvider;
use super::stop::StopSignal;

/// Where a run is, or where it ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunPhase {
    Planning,
    Running,
    /// Every task succeeded.
    Drained,
    /// Too many consecutive failures.
    Aborted,
    /// Stopped from outside before the tasks ran out.
    Cancelled,
}

/// Summary of a finished run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub phase: RunPhase,
    pub planned: usize,
    pub completed: usize,
    pub records_written: usize,
    /// Tasks still pending when the run ended.
    pub missing: Vec<MissingService>,
}

/// Mutable bookkeeping for the running phase.
#[derive(Debug)]
struct RunState {
    phase: RunPhase,
    pending: VecDeque<RequestTask>,
    consecutive_failures: u32,
    completed: usize,
}

impl RunState {
    fn new(tasks: Vec<RequestTask>) -> Self {
        Self {
            phase: RunPhase::Running,
            pending: tasks.into(),
            consecutive_failures: 0,
            completed: 0,
        }
    }

    /// Index of the next task to try, if any remain.
    fn pick(&self, selection: Selection, rng: &mut impl Rng) -> Option<usize> {
        if self.pending.is_empty() {
            return None;
        }
        match selection {
            Selection::Random => Some(rng.gen_range(0..self.pending.len())),
            Selection::Sequential => Some(0),
        }
    }

    fn record_success(&mut self, idx: usize) {
        self.pending.remove(idx);
        self.consecutive_failures = 0;
        self.completed += 1;
    }

    fn record_failure(&mut self, idx: usize, selection: Selection) {
        self.consecutive_failures += 1;
        if selection == Selection::Sequential
            && let Some(task) = self.pending.remove(idx)
        {
            self.pending.push_back(task);
        }
    }

    fn breaker_tripped(&self, threshold: u32) -> bool {
        self.consecutive_failures > threshold
    }

    fn missing(&self) -> Vec<MissingService> {
        self.pending.iter().map(RequestTask::to_missing).collect()
    }
}

/// Runs one acquisition against a provider.
///
/// # Example
///
/// ```no_run
/// # use train_fares::acquire::{AcquireConfig, Orchestrator, ReplayProvider};
/// # use train_fares::domain::Operator;
/// # async fn run(config: AcquireConfig) -> Result<(), train_fares::acquire::AcquireError> {
/// let provider = ReplayProvider::new("fixtures", Operator::parse("AVLO").unwrap());
/// let report = Orchestrator::new(&provider, config).run().await?;
/// println!("{:?}: {} records", report.phase, report.records_written);
/// # Ok(())
/// # }
/// ```
pub struct Orchestrator<'a, P, C = SystemClock> {
    provider: &'a P,
    ledger: RecordLedger,
    config: AcquireConfig,
    clock: C,
    rng: StdRng,
    stop: StopSignal,
}

impl<'a, P: ServiceProvider> Orchestrator<'a, P> {
    pub fn new(provider: &'a P, config: AcquireConfig) -> Self {
        Self {
            provider,
            ledger: RecordLedger::new(&config.ledger_path),
            config,
            clock: SystemClock,
            rng: StdRng::from_entropy(),
            stop: StopSignal::new(),
        }
    }
}

impl<'a, P: ServiceProvider, C: Clock> Orchestrator<'a, P, C> {
    pub fn with_clock<C2: Clock>(self, clock: C2) -> Orchestrator<'a, P, C2> {
        Orchestrator {
            provider: self.provider,
            ledger: self.ledger,
            config: self.config,
            clock,
            rng: self.rng,
            stop: self.stop,
        }
    }

    /// Make random selection reproducible.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn with_stop_signal(mut self, stop: StopSignal) -> Self {
        self.stop = stop;
        self
    }

    /// The tasks a run would attempt right now.
    pub fn plan(&self) -> Result<Vec<RequestTask>, AcquireError> {
        plan_tasks(&self.ledger, &self.config, self.clock.now().date())
    }

    /// Plan, then request every task until drained, aborted or stopped.
    ///
    /// The missing-services report is written only when the run aborts.
    pub async fn run(self) -> Result<RunReport, AcquireError> {
        let tasks = self.plan()?;
        let writer = self.ledger.open_writer()?;
        self.run_tasks(tasks, writer).await
    }

    /// Request `tasks` in order of the configured selection, appending every
    /// offer to `sink`.
    ///
    /// The sink is closed however requesting ends. A failed append is
    /// returned in preference to a failed close.
    pub async fn run_tasks<S: RecordSink>(
        mut self,
        tasks: Vec<RequestTask>,
        mut sink: S,
    ) -> Result<RunReport, AcquireError> {
        let planned = tasks.len();
        let mut state = RunState::new(tasks);

        let driven = self.drive(&mut state, &mut sink).await;
        let closed = sink.close();
        if let Err(e) = driven {
            if let Err(close_err) = &closed {
                warn!(error = %close_err, "closing the ledger after a failed append also failed");
            }
            return Err(e.into());
        }
        let records_written = closed?;

        let missing = state.missing();
        match state.phase {
            RunPhase::Aborted => {
                warn!(
                    failures = state.consecutive_failures,
                    pending = missing.len(),
                    path = %self.config.missing_path.display(),
                    "too many consecutive failures, giving up"
                );
                write_missing_services(&self.config.missing_path, self.provider.operator(), &missing)?;
            }
            RunPhase::Cancelled => info!(pending = missing.len(), "acquisition stopped"),
            _ => info!(records = records_written, "acquisition complete"),
        }

        Ok(RunReport {
            phase: state.phase,
            planned,
            completed: state.completed,
            records_written,
            missing,
        })
    }

    async fn drive(&mut self, state: &mut RunState, sink: &mut impl RecordSink) -> Result<(), StorageError> {
        let selection = self.config.selection;
        let progress = Progress::start(state.pending.len());

        while let Some(idx) = state.pick(selection, &mut self.rng) {
            if self.stop.is_stopped() {
                state.phase = RunPhase::Cancelled;
                return Ok(());
            }

            let task = state.pending[idx].clone();
            debug!(
                origin = %task.origin,
                destination = %task.destination,
                travel_date = %task.travel_date,
                "requesting services"
            );

            let outcome = self
                .provider
                .fetch(&task.origin, &task.destination, task.travel_date)
                .await;

            match outcome.into_offers() {
                Ok(offers) => {
                    let observed_at = self.clock.now();
                    let found = offers.len();
                    for offer in offers {
                        sink.append(&offer.into_record(&task, observed_at))?;
                    }
                    state.record_success(idx);
                    debug!(origin = %task.origin, destination = %task.destination, found, "stored services");
                    progress.report(state.pending.len());
                }
                Err(kind) => {
                    state.record_failure(idx, selection);
                    warn!(
                        origin = %task.origin,
                        destination = %task.destination,
                        travel_date = %task.travel_date,
                        failures = state.consecutive_failures,
                        error = %kind,
                        "request failed"
                    );
                    if state.breaker_tripped(self.config.failure_threshold) {
                        state.phase = RunPhase::Aborted;
                        return Ok(());
                    }
                }
            }
        }

        state.phase = RunPhase::Drained;
        Ok(())
    }
}

#[cfg(test)]
#[path = "orchestrator_tests.rs"]
mod tests;
