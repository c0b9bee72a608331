//! System scheduler — ordered execution, lifecycle hooks, fault benching.
//!
//! Systems run in registration order (or at an explicitly requested index),
//! once per tick. A fault in one system's hook does not abort the tick for
//! the others: the fault is reported and the system is benched until it is
//! removed and re-added.

use thiserror::Error;
use tracing::error;

use sim_store::EntityStore;

use crate::system::{System, SystemFault, SystemState, TickContext};

/// Errors raised by scheduler registration and ticking.
#[derive(Debug, Error)]
pub enum SchedulerError {
    /// A system with this id is already scheduled.
    #[error("system '{0}' is already registered")]
    DuplicateSystemId(String),

    /// No scheduled system carries this id.
    #[error("unknown system: {0}")]
    UnknownSystem(String),

    /// An update was attempted on a destroyed system. Fail-fast: this is a
    /// programming error, not a recoverable fault.
    #[error("system '{0}' has been destroyed and cannot update")]
    SystemDestroyed(String),
}

/// Outcome of one scheduler tick.
#[derive(Debug)]
pub struct TickReport {
    /// 0-based index of the tick that just ran.
    pub tick: u64,
    /// Faults caught during the tick, in system order. Each named system has
    /// been benched.
    pub faults: Vec<(String, SystemFault)>,
}

struct ScheduledSystem {
    id: String,
    system: Box<dyn System>,
    state: SystemState,
}

/// An ordered sequence of systems, keyed by id, driven once per tick.
#[derive(Default)]
pub struct SystemScheduler {
    systems: Vec<ScheduledSystem>,
    ticks: u64,
    elapsed: f64,
}

impl SystemScheduler {
    /// Create an empty scheduler.
    #[must_use]
    pub fn new() -> Self {
        Self {
            systems: Vec::new(),
            ticks: 0,
            elapsed: 0.0,
        }
    }

    /// Schedule a system under a unique id.
    ///
    /// With `index` given, the system is inserted there and subsequent
    /// systems shift; otherwise it is appended. An index past the end
    /// appends.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulerError::DuplicateSystemId`] if the id collides with
    /// an existing entry.
    pub fn add_system(
        &mut self,
        id: impl Into<String>,
        system: Box<dyn System>,
        index: Option<usize>,
    ) -> Result<(), SchedulerError> {
        let id = id.into();
        if self.systems.iter().any(|entry| entry.id == id) {
            return Err(SchedulerError::DuplicateSystemId(id));
        }
        let position = index.unwrap_or(self.systems.len()).min(self.systems.len());
        self.systems.insert(
            position,
            ScheduledSystem {
                id,
                system,
                state: SystemState::Uninitialized,
            },
        );
        Ok(())
    }

    /// Remove a system, running its teardown hook first.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulerError::UnknownSystem`] if no system carries the id.
    pub fn remove_system(&mut self, id: &str, store: &mut EntityStore) -> Result<(), SchedulerError> {
        let position = self
            .systems
            .iter()
            .position(|entry| entry.id == id)
            .ok_or_else(|| SchedulerError::UnknownSystem(id.to_string()))?;
        let mut entry = self.systems.remove(position);
        self.teardown_entry(&mut entry, store);
        Ok(())
    }

    /// Advance the simulation by one tick: every scheduled system runs its
    /// update hook, in order, with init fired exactly once before a system's
    /// first update. Benched systems are skipped.
    ///
    /// Returns a [`TickReport`] carrying the 0-based tick index and any
    /// faults caught during the tick.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulerError::SystemDestroyed`] if a destroyed entry is
    /// encountered; this cannot happen through the public API and indicates
    /// a bug in the caller.
    pub fn tick(&mut self, dt: f64, store: &mut EntityStore) -> Result<TickReport, SchedulerError> {
        let tick = self.ticks;
        let elapsed = self.elapsed;
        let mut faults = Vec::new();

        for entry in &mut self.systems {
            match entry.state {
                SystemState::Faulted => continue,
                SystemState::Destroyed => {
                    return Err(SchedulerError::SystemDestroyed(entry.id.clone()));
                }
                SystemState::Uninitialized | SystemState::Running => {}
            }

            let mut ctx = TickContext {
                delta_time: dt,
                elapsed_time: elapsed,
                store: &mut *store,
            };

            if entry.state == SystemState::Uninitialized {
                if let Err(fault) = entry.system.init(&mut ctx) {
                    error!(system = %entry.id, %fault, "system init faulted, benching");
                    entry.state = SystemState::Faulted;
                    faults.push((entry.id.clone(), fault));
                    continue;
                }
                entry.state = SystemState::Running;
            }

            if let Err(fault) = entry.system.update(&mut ctx) {
                error!(system = %entry.id, %fault, "system update faulted, benching");
                entry.state = SystemState::Faulted;
                faults.push((entry.id.clone(), fault));
            }
        }

        self.ticks += 1;
        self.elapsed += dt;
        Ok(TickReport { tick, faults })
    }

    /// Tear down and remove all systems, in current order.
    pub fn clear(&mut self, store: &mut EntityStore) {
        let mut entries = std::mem::take(&mut self.systems);
        for entry in &mut entries {
            self.teardown_entry(entry, store);
        }
    }

    /// Returns `true` if a system with this id is scheduled.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.systems.iter().any(|entry| entry.id == id)
    }

    /// Ids of all scheduled systems, in execution order.
    #[must_use]
    pub fn system_ids(&self) -> Vec<String> {
        self.systems.iter().map(|entry| entry.id.clone()).collect()
    }

    /// Number of scheduled systems.
    #[must_use]
    pub fn len(&self) -> usize {
        self.systems.len()
    }

    /// Returns `true` if no systems are scheduled.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.systems.is_empty()
    }

    /// Number of completed ticks; also the index of the next tick.
    #[must_use]
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Seconds accumulated across all completed ticks.
    #[must_use]
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    fn teardown_entry(&mut self, entry: &mut ScheduledSystem, store: &mut EntityStore) {
        // Teardown runs at most once; a destroyed entry never re-enters the
        // schedule.
        if entry.state == SystemState::Destroyed {
            return;
        }
        entry.state = SystemState::Destroyed;
        let mut ctx = TickContext {
            delta_time: 0.0,
            elapsed_time: self.elapsed,
            store,
        };
        entry.system.teardown(&mut ctx);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use sim_component::ComponentRegistry;

    use super::*;

    type Log = Arc<Mutex<Vec<String>>>;

    struct Recorder {
        name: &'static str,
        log: Log,
        fail_update: bool,
    }

    impl Recorder {
        fn new(name: &'static str, log: &Log) -> Self {
            Self {
                name,
                log: Arc::clone(log),
                fail_update: false,
            }
        }

        fn failing(name: &'static str, log: &Log) -> Self {
            Self {
                name,
                log: Arc::clone(log),
                fail_update: true,
            }
        }

        fn record(&self, hook: &str) {
            self.log.lock().unwrap().push(format!("{}:{hook}", self.name));
        }
    }

    impl System for Recorder {
        fn init(&mut self, _ctx: &mut TickContext<'_>) -> Result<(), SystemFault> {
            self.record("init");
            Ok(())
        }

        fn update(&mut self, _ctx: &mut TickContext<'_>) -> Result<(), SystemFault> {
            if self.fail_update {
                return Err(SystemFault::new("boom"));
            }
            self.record("update");
            Ok(())
        }

        fn teardown(&mut self, _ctx: &mut TickContext<'_>) {
            self.record("teardown");
        }
    }

    fn make_store() -> EntityStore {
        EntityStore::new(Arc::new(ComponentRegistry::new()))
    }

    fn entries(log: &Log) -> Vec<String> {
        log.lock().unwrap().clone()
    }

    #[test]
    fn test_tick_runs_systems_in_registration_order() {
        let log: Log = Arc::default();
        let mut store = make_store();
        let mut scheduler = SystemScheduler::new();
        scheduler.add_system("a", Box::new(Recorder::new("a", &log)), None).unwrap();
        scheduler.add_system("b", Box::new(Recorder::new("b", &log)), None).unwrap();

        scheduler.tick(0.05, &mut store).unwrap();
        scheduler.tick(0.05, &mut store).unwrap();

        assert_eq!(
            entries(&log),
            vec!["a:init", "a:update", "b:init", "b:update", "a:update", "b:update"]
        );
    }

    #[test]
    fn test_explicit_index_shifts_subsequent_systems() {
        let log: Log = Arc::default();
        let mut store = make_store();
        let mut scheduler = SystemScheduler::new();
        scheduler.add_system("a", Box::new(Recorder::new("a", &log)), None).unwrap();
        scheduler.add_system("b", Box::new(Recorder::new("b", &log)), None).unwrap();
        scheduler.add_system("c", Box::new(Recorder::new("c", &log)), Some(0)).unwrap();

        assert_eq!(scheduler.system_ids(), vec!["c", "a", "b"]);

        scheduler.tick(0.05, &mut store).unwrap();
        assert_eq!(
            entries(&log),
            vec!["c:init", "c:update", "a:init", "a:update", "b:init", "b:update"]
        );
    }

    #[test]
    fn test_index_past_end_appends() {
        let log: Log = Arc::default();
        let mut scheduler = SystemScheduler::new();
        scheduler.add_system("a", Box::new(Recorder::new("a", &log)), None).unwrap();
        scheduler.add_system("b", Box::new(Recorder::new("b", &log)), Some(99)).unwrap();
        assert_eq!(scheduler.system_ids(), vec!["a", "b"]);
    }

    #[test]
    fn test_duplicate_system_id_fails() {
        let log: Log = Arc::default();
        let mut scheduler = SystemScheduler::new();
        scheduler.add_system("a", Box::new(Recorder::new("a", &log)), None).unwrap();
        let err = scheduler
            .add_system("a", Box::new(Recorder::new("a", &log)), None)
            .unwrap_err();
        assert!(matches!(err, SchedulerError::DuplicateSystemId(_)));
        assert_eq!(scheduler.len(), 1);
    }

    #[test]
    fn test_removed_system_stops_updating() {
        let log: Log = Arc::default();
        let mut store = make_store();
        let mut scheduler = SystemScheduler::new();
        scheduler.add_system("a", Box::new(Recorder::new("a", &log)), None).unwrap();
        scheduler.add_system("b", Box::new(Recorder::new("b", &log)), None).unwrap();

        scheduler.tick(0.05, &mut store).unwrap();
        scheduler.remove_system("a", &mut store).unwrap();
        scheduler.tick(0.05, &mut store).unwrap();

        let log = entries(&log);
        assert!(log.contains(&"a:teardown".to_string()));
        assert_eq!(log.iter().filter(|e| *e == "a:update").count(), 1);
        assert_eq!(log.iter().filter(|e| *e == "b:update").count(), 2);
    }

    #[test]
    fn test_remove_unknown_system_fails() {
        let mut store = make_store();
        let mut scheduler = SystemScheduler::new();
        let err = scheduler.remove_system("ghost", &mut store).unwrap_err();
        assert!(matches!(err, SchedulerError::UnknownSystem(_)));
    }

    #[test]
    fn test_fault_benches_system_without_aborting_tick() {
        let log: Log = Arc::default();
        let mut store = make_store();
        let mut scheduler = SystemScheduler::new();
        scheduler.add_system("bad", Box::new(Recorder::failing("bad", &log)), None).unwrap();
        scheduler.add_system("good", Box::new(Recorder::new("good", &log)), None).unwrap();

        let report = scheduler.tick(0.05, &mut store).unwrap();
        assert_eq!(report.faults.len(), 1);
        assert_eq!(report.faults[0].0, "bad");
        // The fault did not stop the rest of the tick.
        assert!(entries(&log).contains(&"good:update".to_string()));

        // Benched: no further faults reported, no further runs.
        let report = scheduler.tick(0.05, &mut store).unwrap();
        assert!(report.faults.is_empty());

        // Re-adding restores the system.
        scheduler.remove_system("bad", &mut store).unwrap();
        scheduler.add_system("bad", Box::new(Recorder::new("bad", &log)), None).unwrap();
        scheduler.tick(0.05, &mut store).unwrap();
        assert!(entries(&log).contains(&"bad:update".to_string()));
    }

    #[test]
    fn test_tick_report_indices_start_at_zero() {
        let mut store = make_store();
        let mut scheduler = SystemScheduler::new();
        let report = scheduler.tick(0.05, &mut store).unwrap();
        assert_eq!(report.tick, 0);
        let report = scheduler.tick(0.05, &mut store).unwrap();
        assert_eq!(report.tick, 1);
        assert_eq!(scheduler.ticks(), 2);
    }

    #[test]
    fn test_elapsed_time_accumulates_from_zero() {
        struct ElapsedProbe {
            seen: Arc<Mutex<Vec<f64>>>,
        }
        impl System for ElapsedProbe {
            fn update(&mut self, ctx: &mut TickContext<'_>) -> Result<(), SystemFault> {
                self.seen.lock().unwrap().push(ctx.elapsed_time);
                Ok(())
            }
        }

        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut store = make_store();
        let mut scheduler = SystemScheduler::new();
        scheduler
            .add_system("probe", Box::new(ElapsedProbe { seen: Arc::clone(&seen) }), None)
            .unwrap();

        scheduler.tick(0.5, &mut store).unwrap();
        scheduler.tick(0.5, &mut store).unwrap();
        scheduler.tick(0.5, &mut store).unwrap();
        assert_eq!(*seen.lock().unwrap(), vec![0.0, 0.5, 1.0]);
    }

    #[test]
    fn test_clear_tears_down_all_in_order() {
        let log: Log = Arc::default();
        let mut store = make_store();
        let mut scheduler = SystemScheduler::new();
        scheduler.add_system("a", Box::new(Recorder::new("a", &log)), None).unwrap();
        scheduler.add_system("b", Box::new(Recorder::new("b", &log)), None).unwrap();

        scheduler.clear(&mut store);
        assert!(scheduler.is_empty());
        assert_eq!(entries(&log), vec!["a:teardown", "b:teardown"]);
    }
}
