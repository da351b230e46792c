//! In-memory doubles backed by a shared fake process table, so liveness,
//! termination and pattern search behave like a real OS without spawning
//! anything.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use pinhold_core::domain::{Direction, Level, LevelBatch, LineGroupKey, PinNumber};
use pinhold_core::error::PinholdError;
use pinhold_core::ports::{
    HolderRegistry, HolderSpawner, LevelProbe, LineInfoProbe, ProcessControl, ShadowStore,
};
use pinhold_core::settings::Settings;
use pinhold_runtime::{HolderSupervisor, LineReader, PinService};

/// One simulated holder process.
struct FakeHolder {
    assignments: Vec<String>,
    alive: bool,
}

/// Simulated OS process table shared by all doubles.
pub struct ProcessTable {
    inner: Mutex<TableInner>,
}

struct TableInner {
    next_pid: u32,
    holders: HashMap<u32, FakeHolder>,
}

impl ProcessTable {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            inner: Mutex::new(TableInner {
                next_pid: 1000,
                holders: HashMap::new(),
            }),
        })
    }

    /// Start a simulated holder carrying the given `pin=level` assignments.
    pub fn spawn_holder(&self, assignments: Vec<String>) -> u32 {
        let mut inner = self.inner.lock().expect("poisoned");
        let pid = inner.next_pid;
        inner.next_pid += 1;
        inner.holders.insert(
            pid,
            FakeHolder {
                assignments,
                alive: true,
            },
        );
        pid
    }

    pub fn kill(&self, pid: u32) {
        if let Some(holder) = self.inner.lock().expect("poisoned").holders.get_mut(&pid) {
            holder.alive = false;
        }
    }

    pub fn is_alive(&self, pid: u32) -> bool {
        self.inner
            .lock()
            .expect("poisoned")
            .holders
            .get(&pid)
            .is_some_and(|h| h.alive)
    }

    pub fn live_count(&self) -> usize {
        self.inner
            .lock()
            .expect("poisoned")
            .holders
            .values()
            .filter(|h| h.alive)
            .count()
    }

    /// Pids of live holders carrying an assignment for `pin`.
    pub fn live_holders_for(&self, pin: PinNumber) -> Vec<u32> {
        let prefix = format!("{pin}=");
        self.inner
            .lock()
            .expect("poisoned")
            .holders
            .iter()
            .filter(|(_, h)| h.alive && h.assignments.iter().any(|a| a.starts_with(&prefix)))
            .map(|(pid, _)| *pid)
            .collect()
    }

    pub fn assignments_of(&self, pid: u32) -> Option<Vec<String>> {
        self.inner
            .lock()
            .expect("poisoned")
            .holders
            .get(&pid)
            .map(|h| h.assignments.clone())
    }

    fn find_live(&self, matches: impl Fn(&FakeHolder) -> bool) -> Option<u32> {
        self.inner
            .lock()
            .expect("poisoned")
            .holders
            .iter()
            .filter(|(_, h)| h.alive && matches(h))
            .map(|(pid, _)| *pid)
            .min() // deterministic pick
    }
}

/// Process control double over the fake table.
pub struct FakeControl {
    table: Arc<ProcessTable>,
}

impl FakeControl {
    pub fn new(table: Arc<ProcessTable>) -> Arc<Self> {
        Arc::new(Self { table })
    }
}

#[async_trait]
impl ProcessControl for FakeControl {
    async fn is_alive(&self, pid: u32) -> bool {
        self.table.is_alive(pid)
    }

    // Every live table entry is a holder; pid reuse is not simulated.
    async fn is_holder(&self, pid: u32) -> bool {
        self.table.is_alive(pid)
    }

    async fn terminate(&self, pid: u32) -> Result<(), PinholdError> {
        self.table.kill(pid);
        Ok(())
    }

    async fn find_by_pin(&self, pin: PinNumber) -> Option<u32> {
        let prefix = format!("{pin}=");
        self.table
            .find_live(|h| h.assignments.iter().any(|a| a.starts_with(&prefix)))
    }
}

/// Spawner double over the fake table.
///
/// `report_pid(false)` simulates a backend that cannot name the pid at
/// spawn time, exercising the supervisor's bounded discovery path.
pub struct FakeSpawner {
    table: Arc<ProcessTable>,
    report_pid: AtomicBool,
    fail: AtomicBool,
    find_calls: AtomicU32,
}

impl FakeSpawner {
    pub fn new(table: Arc<ProcessTable>) -> Arc<Self> {
        Arc::new(Self {
            table,
            report_pid: AtomicBool::new(true),
            fail: AtomicBool::new(false),
            find_calls: AtomicU32::new(0),
        })
    }

    pub fn report_pid(&self, report: bool) {
        self.report_pid.store(report, Ordering::SeqCst);
    }

    pub fn set_fail(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    /// How many times the supervisor fell back to pattern search.
    pub fn find_calls(&self) -> u32 {
        self.find_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl HolderSpawner for FakeSpawner {
    async fn spawn(&self, batch: &LevelBatch) -> Result<Option<u32>, PinholdError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(PinholdError::Spawn("simulated spawn failure".to_string()));
        }
        let pid = self.table.spawn_holder(batch.assignments());
        if self.report_pid.load(Ordering::SeqCst) {
            Ok(Some(pid))
        } else {
            Ok(None)
        }
    }

    async fn find_holder(&self, batch: &LevelBatch) -> Option<u32> {
        self.find_calls.fetch_add(1, Ordering::SeqCst);
        let assignments = batch.assignments();
        self.table
            .find_live(|h| assignments.iter().all(|a| h.assignments.contains(a)))
    }
}

/// In-memory shadow store.
pub struct MemoryShadow {
    levels: Mutex<HashMap<PinNumber, Level>>,
}

impl MemoryShadow {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            levels: Mutex::new(HashMap::new()),
        })
    }
}

#[async_trait]
impl ShadowStore for MemoryShadow {
    async fn get_level(&self, pin: PinNumber) -> Result<Option<Level>, PinholdError> {
        Ok(self.levels.lock().expect("poisoned").get(&pin).copied())
    }

    async fn set_level(&self, pin: PinNumber, level: Level) -> Result<(), PinholdError> {
        self.levels.lock().expect("poisoned").insert(pin, level);
        Ok(())
    }

    async fn set_levels(&self, levels: &[(PinNumber, Level)]) -> Result<(), PinholdError> {
        let mut map = self.levels.lock().expect("poisoned");
        for (pin, level) in levels {
            map.insert(*pin, *level);
        }
        Ok(())
    }

    async fn clear(&self) -> Result<(), PinholdError> {
        self.levels.lock().expect("poisoned").clear();
        Ok(())
    }
}

/// In-memory registry verifying liveness against the fake table.
pub struct MemoryRegistry {
    entries: Mutex<HashMap<LineGroupKey, u32>>,
    table: Arc<ProcessTable>,
}

impl MemoryRegistry {
    pub fn new(table: Arc<ProcessTable>) -> Arc<Self> {
        Arc::new(Self {
            entries: Mutex::new(HashMap::new()),
            table,
        })
    }

    pub fn entry(&self, key: &LineGroupKey) -> Option<u32> {
        self.entries.lock().expect("poisoned").get(key).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().expect("poisoned").len()
    }
}

#[async_trait]
impl HolderRegistry for MemoryRegistry {
    async fn lookup(&self, key: &LineGroupKey) -> Result<Option<u32>, PinholdError> {
        let mut entries = self.entries.lock().expect("poisoned");
        match entries.get(key).copied() {
            Some(pid) if self.table.is_alive(pid) => Ok(Some(pid)),
            Some(_) => {
                entries.remove(key); // stale, silently discarded
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn record(&self, key: &LineGroupKey, pid: u32) -> Result<(), PinholdError> {
        self.entries.lock().expect("poisoned").insert(key.clone(), pid);
        Ok(())
    }

    async fn remove(&self, key: &LineGroupKey) -> Result<(), PinholdError> {
        self.entries.lock().expect("poisoned").remove(key);
        Ok(())
    }

    async fn groups_overlapping(
        &self,
        pins: &[PinNumber],
    ) -> Result<Vec<(LineGroupKey, u32)>, PinholdError> {
        let mut entries = self.entries.lock().expect("poisoned");
        entries.retain(|_, pid| self.table.is_alive(*pid));
        Ok(entries
            .iter()
            .filter(|(key, _)| key.overlaps_pins(pins))
            .map(|(key, pid)| (key.clone(), *pid))
            .collect())
    }
}

/// Scripted line-info probe; unconfigured pins report input.
pub struct FakeInfo {
    directions: Mutex<HashMap<PinNumber, Direction>>,
}

impl FakeInfo {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            directions: Mutex::new(HashMap::new()),
        })
    }

    pub fn set(&self, pin: PinNumber, direction: Direction) {
        self.directions.lock().expect("poisoned").insert(pin, direction);
    }
}

#[async_trait]
impl LineInfoProbe for FakeInfo {
    async fn direction(&self, pin: PinNumber) -> Direction {
        self.directions
            .lock()
            .expect("poisoned")
            .get(&pin)
            .copied()
            .unwrap_or(Direction::Input)
    }
}

/// Scripted level probe; unconfigured pins read as unavailable.
pub struct FakeLevel {
    raws: Mutex<HashMap<PinNumber, String>>,
}

impl FakeLevel {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            raws: Mutex::new(HashMap::new()),
        })
    }

    pub fn set(&self, pin: PinNumber, raw: impl Into<String>) {
        self.raws.lock().expect("poisoned").insert(pin, raw.into());
    }
}

#[async_trait]
impl LevelProbe for FakeLevel {
    async fn read_raw(&self, pin: PinNumber) -> Option<String> {
        self.raws.lock().expect("poisoned").get(&pin).cloned()
    }
}

/// Everything a supervision test needs, wired over one process table.
pub struct Harness {
    pub table: Arc<ProcessTable>,
    pub shadow: Arc<MemoryShadow>,
    pub registry: Arc<MemoryRegistry>,
    pub control: Arc<FakeControl>,
    pub spawner: Arc<FakeSpawner>,
    pub info: Arc<FakeInfo>,
    pub level: Arc<FakeLevel>,
}

impl Harness {
    pub fn new() -> Self {
        let table = ProcessTable::new();
        Self {
            shadow: MemoryShadow::new(),
            registry: MemoryRegistry::new(table.clone()),
            control: FakeControl::new(table.clone()),
            spawner: FakeSpawner::new(table.clone()),
            info: FakeInfo::new(),
            level: FakeLevel::new(),
            table,
        }
    }

    /// Fast polling intervals so discovery tests stay quick.
    pub fn settings() -> Settings {
        Settings {
            discovery_polls: Some(3),
            discovery_poll_ms: Some(1),
            terminate_polls: Some(2),
            terminate_poll_ms: Some(1),
            ..Settings::default()
        }
    }

    pub fn supervisor(&self) -> HolderSupervisor {
        HolderSupervisor::new(
            self.shadow.clone(),
            self.registry.clone(),
            self.control.clone(),
            self.spawner.clone(),
            &Self::settings(),
        )
    }

    pub fn reader(&self) -> LineReader {
        LineReader::new(self.shadow.clone(), self.info.clone(), self.level.clone())
    }

    pub fn service(&self) -> PinService {
        PinService::new(self.reader(), self.supervisor())
    }
}
