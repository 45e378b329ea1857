//! Unit tests for the acquisition run loop.

use super::*;
use crate::acquire::FetchOutcome;
use crate::domain::{DateRange, Fare, Offer, Operator, Route, StationId, TripRecord};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use std::collections::{HashSet, VecDeque};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tempfile::tempdir;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn station(s: &str) -> StationId {
    StationId::parse(s).unwrap()
}

fn offer(dep: (u32, u32), price: &str) -> Offer {
    Offer {
        departure: NaiveTime::from_hms_opt(dep.0, dep.1, 0).unwrap(),
        arrival: NaiveTime::from_hms_opt(dep.0 + 2, dep.1, 0).unwrap(),
        fare: Fare::parse(price),
        operator: Operator::parse("AVLO").unwrap(),
    }
}

fn found() -> FetchOutcome {
    FetchOutcome::Offers(vec![offer((7, 0), "25,50")])
}

fn failed() -> FetchOutcome {
    FetchOutcome::fault("timeout")
}

struct FixedClock(NaiveDateTime);

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}

fn clock() -> FixedClock {
    FixedClock(date(2024, 4, 20).and_hms_opt(10, 15, 42).unwrap())
}

type Call = (StationId, StationId, NaiveDate);

/// Provider replaying a fixed list of outcomes, then `fallback` forever.
struct ScriptedProvider {
    operator: Operator,
    script: Mutex<VecDeque<FetchOutcome>>,
    fallback: FetchOutcome,
    calls: Mutex<Vec<Call>>,
    stop_after: Option<(usize, StopSignal)>,
}

impl ScriptedProvider {
    fn new(script: Vec<FetchOutcome>, fallback: FetchOutcome) -> Self {
        Self {
            operator: Operator::parse("AVLO").unwrap(),
            script: Mutex::new(script.into()),
            fallback,
            calls: Mutex::new(Vec::new()),
            stop_after: None,
        }
    }

    fn always(outcome: FetchOutcome) -> Self {
        Self::new(Vec::new(), outcome)
    }

    /// Raise `stop` once `calls` requests have been made.
    fn stopping_after(mut self, calls: usize, stop: StopSignal) -> Self {
        self.stop_after = Some((calls, stop));
        self
    }

    fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }
}

impl ServiceProvider for ScriptedProvider {
    fn operator(&self) -> &Operator {
        &self.operator
    }

    async fn fetch(
        &self,
        origin: &StationId,
        destination: &StationId,
        travel_date: NaiveDate,
    ) -> FetchOutcome {
        let made = {
            let mut calls = self.calls.lock().unwrap();
            calls.push((origin.clone(), destination.clone(), travel_date));
            calls.len()
        };
        if let Some((after, stop)) = &self.stop_after
            && made >= *after
        {
            stop.stop();
        }
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| self.fallback.clone())
    }
}

/// Two directions over two days: four tasks.
fn config(ledger: &Path) -> AcquireConfig {
    let route = Route::new(station("Madrid"), station("Barcelona"));
    let window = DateRange::new(date(2024, 5, 1), date(2024, 5, 2)).unwrap();
    AcquireConfig::new(vec![route.clone(), route.reversed()], window, ledger)
}

fn ledger_lines(path: &Path) -> Vec<String> {
    std::fs::read_to_string(path)
        .unwrap()
        .lines()
        .map(str::to_string)
        .collect()
}

#[tokio::test]
async fn drains_when_every_request_succeeds() {
    let dir = tempdir().unwrap();
    let ledger_path = dir.path().join("data/trains.txt");
    let config = config(&ledger_path);
    let missing_path = config.missing_path.clone();
    let provider = ScriptedProvider::always(found());

    let report = Orchestrator::new(&provider, config)
        .with_clock(clock())
        .with_seed(7)
        .run()
        .await
        .unwrap();

    assert_eq!(report.phase, RunPhase::Drained);
    assert_eq!(report.planned, 4);
    assert_eq!(report.completed, 4);
    assert_eq!(report.records_written, 4);
    assert!(report.missing.is_empty());
    assert_eq!(provider.calls().len(), 4);

    let ledger = RecordLedger::new(&ledger_path);
    assert!(ledger.exists());
    assert_eq!(ledger.load_keys().unwrap().len(), 4);
    assert!(!missing_path.exists());
}

#[tokio::test]
async fn records_are_stamped_with_observation_time() {
    let dir = tempdir().unwrap();
    let ledger_path = dir.path().join("trains.txt");
    let provider = ScriptedProvider::always(FetchOutcome::Offers(vec![
        offer((7, 0), "25,50"),
        offer((9, 30), "Completo"),
    ]));

    Orchestrator::new(&provider, config(&ledger_path))
        .with_clock(clock())
        .run()
        .await
        .unwrap();

    let lines = ledger_lines(&ledger_path);
    assert_eq!(lines.len(), 1 + 8);
    assert!(lines[1..].iter().all(|l| l.ends_with("|20/04/2024|10:15")));
    assert!(lines.iter().any(|l| l.contains("|Completo|")));
}

#[tokio::test]
async fn aborts_after_too_many_consecutive_failures() {
    let dir = tempdir().unwrap();
    let ledger_path = dir.path().join("trains.txt");
    let config = config(&ledger_path);
    let missing_path = config.missing_path.clone();
    let provider = ScriptedProvider::always(failed());

    let report = Orchestrator::new(&provider, config)
        .with_clock(clock())
        .run()
        .await
        .unwrap();

    assert_eq!(report.phase, RunPhase::Aborted);
    assert_eq!(provider.calls().len(), 21);
    assert_eq!(report.completed, 0);
    assert_eq!(report.records_written, 0);
    assert_eq!(report.missing.len(), 4);

    assert_eq!(ledger_lines(&ledger_path).len(), 1);

    let missing = ledger_lines(&missing_path);
    assert_eq!(missing[0], "origin_station|destination_station|operator|travel_date");
    assert_eq!(missing.len(), 5);
    assert!(missing.contains(&"Madrid|Barcelona|AVLO|01/05/2024".to_string()));
    assert!(missing.contains(&"Barcelona|Madrid|AVLO|02/05/2024".to_string()));
}

#[tokio::test]
async fn success_resets_the_failure_counter() {
    let dir = tempdir().unwrap();
    let ledger_path = dir.path().join("trains.txt");

    let mut script = Vec::new();
    for _ in 0..4 {
        script.extend(std::iter::repeat_with(failed).take(20));
        script.push(found());
    }
    let provider = ScriptedProvider::new(script, failed());

    let report = Orchestrator::new(&provider, config(&ledger_path))
        .with_clock(clock())
        .run()
        .await
        .unwrap();

    assert_eq!(report.phase, RunPhase::Drained);
    assert_eq!(provider.calls().len(), 84);
    assert_eq!(report.completed, 4);
}

#[tokio::test]
async fn empty_offer_list_counts_as_failure() {
    let dir = tempdir().unwrap();
    let ledger_path = dir.path().join("trains.txt");
    let config = config(&ledger_path).with_failure_threshold(0);
    let provider = ScriptedProvider::new(vec![FetchOutcome::Offers(vec![])], found());

    let report = Orchestrator::new(&provider, config)
        .with_clock(clock())
        .run()
        .await
        .unwrap();

    assert_eq!(report.phase, RunPhase::Aborted);
    assert_eq!(provider.calls().len(), 1);
    assert_eq!(report.missing.len(), 4);
}

#[tokio::test]
async fn stop_signal_cancels_between_tasks() {
    let dir = tempdir().unwrap();
    let ledger_path = dir.path().join("trains.txt");
    let config = config(&ledger_path);
    let missing_path = config.missing_path.clone();
    let stop = StopSignal::new();
    let provider = ScriptedProvider::always(found()).stopping_after(2, stop.clone());

    let report = Orchestrator::new(&provider, config)
        .with_clock(clock())
        .with_stop_signal(stop)
        .run()
        .await
        .unwrap();

    assert_eq!(report.phase, RunPhase::Cancelled);
    assert_eq!(provider.calls().len(), 2);
    assert_eq!(report.completed, 2);
    assert_eq!(report.records_written, 2);
    assert_eq!(report.missing.len(), 2);
    assert_eq!(ledger_lines(&ledger_path).len(), 3);
    assert!(!missing_path.exists());
}

#[tokio::test]
async fn start_before_today_is_fatal() {
    let dir = tempdir().unwrap();
    let ledger_path = dir.path().join("trains.txt");
    let provider = ScriptedProvider::always(found());
    let late = FixedClock(date(2024, 5, 2).and_hms_opt(8, 0, 0).unwrap());

    let err = Orchestrator::new(&provider, config(&ledger_path))
        .with_clock(late)
        .run()
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        AcquireError::Validation(crate::acquire::ValidationError::StartBeforeToday { .. })
    ));
    assert!(provider.calls().is_empty());
    assert!(!ledger_path.exists());
}

#[tokio::test]
async fn sequential_selection_moves_failures_to_the_back() {
    let dir = tempdir().unwrap();
    let ledger_path = dir.path().join("trains.txt");
    let route = Route::new(station("Madrid"), station("Sevilla"));
    let window = DateRange::new(date(2024, 5, 1), date(2024, 5, 3)).unwrap();
    let config = AcquireConfig::new(vec![route], window, &ledger_path)
        .with_selection(Selection::Sequential);
    let provider = ScriptedProvider::new(vec![failed()], found());

    let report = Orchestrator::new(&provider, config)
        .with_clock(clock())
        .run()
        .await
        .unwrap();

    assert_eq!(report.phase, RunPhase::Drained);
    let days: Vec<_> = provider.calls().into_iter().map(|(_, _, d)| d).collect();
    assert_eq!(
        days,
        vec![date(2024, 5, 1), date(2024, 5, 2), date(2024, 5, 3), date(2024, 5, 1)]
    );
}

#[tokio::test]
async fn same_seed_same_order() {
    let mut orders = Vec::new();
    for _ in 0..2 {
        let dir = tempdir().unwrap();
        let provider = ScriptedProvider::always(found());
        Orchestrator::new(&provider, config(&dir.path().join("trains.txt")))
            .with_clock(clock())
            .with_seed(42)
            .run()
            .await
            .unwrap();
        orders.push(provider.calls());
    }
    assert_eq!(orders[0], orders[1]);

    let unique: HashSet<_> = orders[0].iter().cloned().collect();
    assert_eq!(unique.len(), 4);
}

#[tokio::test]
async fn second_run_skips_searched_tasks_without_repeats() {
    let dir = tempdir().unwrap();
    let ledger_path = dir.path().join("trains.txt");

    let first = ScriptedProvider::always(found());
    Orchestrator::new(&first, config(&ledger_path))
        .with_clock(clock())
        .run()
        .await
        .unwrap();

    let second = ScriptedProvider::always(found());
    let report = Orchestrator::new(&second, config(&ledger_path).with_repeat_services(false))
        .with_clock(clock())
        .run()
        .await
        .unwrap();

    assert_eq!(report.phase, RunPhase::Drained);
    assert_eq!(report.planned, 0);
    assert!(second.calls().is_empty());
}

/// Sink that can refuse appends or its close, and notes being closed.
#[derive(Default)]
struct BrokenSink {
    fail_appends: bool,
    fail_close: bool,
    appended: usize,
    closed: Arc<AtomicBool>,
}

impl RecordSink for BrokenSink {
    fn append(&mut self, _record: &TripRecord) -> Result<(), StorageError> {
        if self.fail_appends {
            return Err(StorageError::io(
                Path::new("append"),
                std::io::Error::other("no space left on device"),
            ));
        }
        self.appended += 1;
        Ok(())
    }

    fn close(self) -> Result<usize, StorageError> {
        self.closed.store(true, Ordering::SeqCst);
        if self.fail_close {
            return Err(StorageError::io(
                Path::new("close"),
                std::io::Error::other("flush failed"),
            ));
        }
        Ok(self.appended)
    }
}

fn failed_at(result: Result<RunReport, AcquireError>) -> std::path::PathBuf {
    match result {
        Err(AcquireError::Storage(StorageError::Io { path, .. })) => path,
        other => panic!("expected a storage error, got {other:?}"),
    }
}

#[tokio::test]
async fn append_failure_ends_the_run_and_closes_the_sink() {
    let dir = tempdir().unwrap();
    let config = config(&dir.path().join("trains.txt"));
    let missing_path = config.missing_path.clone();
    let provider = ScriptedProvider::always(found());
    let closed = Arc::new(AtomicBool::new(false));
    let sink = BrokenSink {
        fail_appends: true,
        closed: Arc::clone(&closed),
        ..BrokenSink::default()
    };

    let orchestrator = Orchestrator::new(&provider, config).with_clock(clock());
    let tasks = orchestrator.plan().unwrap();
    let result = orchestrator.run_tasks(tasks, sink).await;

    assert_eq!(failed_at(result), Path::new("append"));
    assert!(closed.load(Ordering::SeqCst));
    assert_eq!(provider.calls().len(), 1);
    assert!(!missing_path.exists());
}

#[tokio::test]
async fn append_failure_wins_over_close_failure() {
    let dir = tempdir().unwrap();
    let provider = ScriptedProvider::always(found());
    let closed = Arc::new(AtomicBool::new(false));
    let sink = BrokenSink {
        fail_appends: true,
        fail_close: true,
        closed: Arc::clone(&closed),
        ..BrokenSink::default()
    };

    let orchestrator = Orchestrator::new(&provider, config(&dir.path().join("trains.txt"))).with_clock(clock());
    let tasks = orchestrator.plan().unwrap();
    let result = orchestrator.run_tasks(tasks, sink).await;

    assert_eq!(failed_at(result), Path::new("append"));
    assert!(closed.load(Ordering::SeqCst));
}

#[tokio::test]
async fn close_failure_after_a_clean_run_is_reported() {
    let dir = tempdir().unwrap();
    let provider = ScriptedProvider::always(found());
    let sink = BrokenSink {
        fail_close: true,
        ..BrokenSink::default()
    };

    let orchestrator = Orchestrator::new(&provider, config(&dir.path().join("trains.txt"))).with_clock(clock());
    let tasks = orchestrator.plan().unwrap();
    let result = orchestrator.run_tasks(tasks, sink).await;

    assert_eq!(failed_at(result), Path::new("close"));
    assert_eq!(provider.calls().len(), 4);
}

#[test]
fn run_state_bookkeeping() {
    let route = Route::new(station("Madrid"), station("Sevilla"));
    let tasks: Vec<_> = [1, 2, 3]
        .into_iter()
        .map(|d| RequestTask::new(&route, date(2024, 5, d), date(2024, 4, 20)))
        .collect();
    let mut state = RunState::new(tasks.clone());
    let mut rng = StdRng::seed_from_u64(1);

    assert_eq!(state.pick(Selection::Sequential, &mut rng), Some(0));
    state.record_failure(0, Selection::Sequential);
    assert_eq!(state.pending.back(), Some(&tasks[0]));
    assert_eq!(state.consecutive_failures, 1);
    assert!(state.breaker_tripped(0));
    assert!(!state.breaker_tripped(1));

    state.record_success(0);
    assert_eq!(state.consecutive_failures, 0);
    assert_eq!(state.completed, 1);
    assert_eq!(state.pending.len(), 2);

    let idx = state.pick(Selection::Random, &mut rng).unwrap();
    assert!(idx < 2);
    assert_eq!(state.missing().len(), 2);
}
