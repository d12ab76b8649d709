//! Deterministic countdowns for tests and simulations.
//!
//! Nothing happens until [`ManualClock::advance`] is called; each call is one
//! tick interval elapsing for every active countdown created by the clock.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use crate::countdown::{Countdown, CountdownFactory, ExpireCallback, TickCallback};

struct ManualRun {
    key: u64,
    next_remaining: u32,
    active: Arc<AtomicBool>,
    on_tick: TickCallback,
    on_expire: Option<ExpireCallback>,
}

#[derive(Default)]
struct ClockState {
    runs: Vec<ManualRun>,
    next_key: u64,
    started: Vec<u32>,
}

/// Shared handle; clones drive the same set of countdowns.
#[derive(Clone, Default)]
pub struct ManualClock {
    state: Arc<Mutex<ClockState>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, ClockState> {
        // Callbacks never touch the clock, so a poisoned lock still holds consistent data
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Elapse one tick interval. Returns how many callbacks were delivered.
    pub fn advance(&self) -> usize {
        let mut state = self.lock();
        let mut delivered = 0;

        for run in state.runs.iter_mut() {
            if !run.active.load(Ordering::Acquire) {
                continue;
            }

            let remaining = run.next_remaining;
            (run.on_tick)(remaining);
            delivered += 1;

            if remaining == 0 {
                run.active.store(false, Ordering::Release);
                if let Some(on_expire) = run.on_expire.take() {
                    on_expire();
                    delivered += 1;
                }
            } else {
                run.next_remaining = remaining - 1;
            }
        }

        state.runs.retain(|run| run.active.load(Ordering::Acquire));
        delivered
    }

    pub fn advance_by(&self, steps: u32) -> usize {
        (0..steps).map(|_| self.advance()).sum()
    }

    /// Advance until no countdown is left running.
    pub fn run_until_idle(&self) -> usize {
        let mut delivered = 0;
        while self.active_count() > 0 {
            delivered += self.advance();
        }
        delivered
    }

    pub fn active_count(&self) -> usize {
        self.lock()
            .runs
            .iter()
            .filter(|run| run.active.load(Ordering::Acquire))
            .count()
    }

    /// Durations of every countdown started so far, in start order.
    pub fn started(&self) -> Vec<u32> {
        self.lock().started.clone()
    }

    fn register(&self, duration_seconds: u32, on_tick: TickCallback, on_expire: ExpireCallback) -> (u64, Arc<AtomicBool>) {
        let mut state = self.lock();
        state.next_key += 1;
        let key = state.next_key;
        let active = Arc::new(AtomicBool::new(true));

        state.started.push(duration_seconds);
        state.runs.push(ManualRun {
            key,
            next_remaining: duration_seconds,
            active: active.clone(),
            on_tick,
            on_expire: Some(on_expire),
        });

        (key, active)
    }

    fn remove(&self, key: u64) {
        self.lock().runs.retain(|run| run.key != key);
    }
}

impl CountdownFactory for ManualClock {
    fn create(&self, duration_seconds: u32) -> Box<dyn Countdown> {
        Box::new(ManualCountdown {
            duration_seconds,
            clock: self.clone(),
            run: None,
        })
    }
}

pub struct ManualCountdown {
    duration_seconds: u32,
    clock: ManualClock,
    run: Option<(u64, Arc<AtomicBool>)>,
}

impl Countdown for ManualCountdown {
    // The interval is meaningless here: one advance() is one interval
    fn start(&mut self, _tick_interval: Duration, on_tick: TickCallback, on_expire: ExpireCallback) {
        self.cancel();
        self.run = Some(self.clock.register(self.duration_seconds, on_tick, on_expire));
    }

    fn cancel(&mut self) {
        if let Some((key, active)) = self.run.take() {
            active.store(false, Ordering::Release);
            self.clock.remove(key);
        }
    }

    fn is_active(&self) -> bool {
        self.run
            .as_ref()
            .is_some_and(|(_, active)| active.load(Ordering::Acquire))
    }
}

impl Drop for ManualCountdown {
    fn drop(&mut self) {
        self.cancel();
    }
}
