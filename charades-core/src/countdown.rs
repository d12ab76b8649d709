//! Cancelable countdowns.
//!
//! A [`Countdown`] counts from its duration down to zero, calling `on_tick`
//! once per interval and `on_expire` once at the end. Implementations may
//! run on any thread; the session hands them callbacks that only enqueue a
//! [`TimerSignal`], and the host replays those signals on the session's own
//! task.

use anyhow::{Context, Result};
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

/// Generation number of one countdown started by a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(pub u64);

impl fmt::Display for TimerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "timer-{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerSignal {
    Tick { timer: TimerId, seconds_remaining: u32 },
    Expired { timer: TimerId },
}

impl TimerSignal {
    pub fn timer(&self) -> TimerId {
        match self {
            TimerSignal::Tick { timer, .. } => *timer,
            TimerSignal::Expired { timer } => *timer,
        }
    }
}

pub type TickCallback = Box<dyn FnMut(u32) + Send + 'static>;
pub type ExpireCallback = Box<dyn FnOnce() + Send + 'static>;

pub trait Countdown: Send {
    /// Begin counting. Starting an already running countdown cancels the
    /// previous run first.
    fn start(&mut self, tick_interval: Duration, on_tick: TickCallback, on_expire: ExpireCallback);

    /// Stop delivery of further ticks and the expiration. Idempotent.
    fn cancel(&mut self);

    fn is_active(&self) -> bool;
}

/// Scheduler abstraction: creates one countdown per requested duration.
pub trait CountdownFactory: Send {
    fn create(&self, duration_seconds: u32) -> Box<dyn Countdown>;
}

/// Countdown backed by a task on a tokio runtime.
pub struct TokioCountdown {
    duration_seconds: u32,
    runtime: Handle,
    active: Arc<AtomicBool>,
    task: Option<JoinHandle<()>>,
}

impl TokioCountdown {
    pub fn new(duration_seconds: u32, runtime: Handle) -> Self {
        Self {
            duration_seconds,
            runtime,
            active: Arc::new(AtomicBool::new(false)),
            task: None,
        }
    }
}

impl Countdown for TokioCountdown {
    fn start(&mut self, tick_interval: Duration, mut on_tick: TickCallback, on_expire: ExpireCallback) {
        self.cancel();

        // Fresh flag per run so a stale task can never observe a restart
        let active = Arc::new(AtomicBool::new(true));
        self.active = active.clone();

        let duration = self.duration_seconds;
        let period = tick_interval.max(Duration::from_millis(1));

        self.task = Some(self.runtime.spawn(async move {
            let mut interval = tokio::time::interval(period);
            for remaining in (0..=duration).rev() {
                interval.tick().await;
                if !active.load(Ordering::Acquire) {
                    return;
                }
                on_tick(remaining);
            }

            if active.swap(false, Ordering::AcqRel) {
                on_expire();
            }
        }));
    }

    fn cancel(&mut self) {
        self.active.store(false, Ordering::Release);
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }

    fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }
}

impl Drop for TokioCountdown {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[derive(Clone)]
pub struct TokioCountdownFactory {
    runtime: Handle,
}

impl TokioCountdownFactory {
    pub fn new(runtime: Handle) -> Self {
        Self { runtime }
    }

    /// Use the runtime the caller is running on.
    pub fn from_current() -> Result<Self> {
        let runtime = Handle::try_current().context("No tokio runtime available for countdowns")?;
        Ok(Self::new(runtime))
    }
}

impl CountdownFactory for TokioCountdownFactory {
    fn create(&self, duration_seconds: u32) -> Box<dyn Countdown> {
        Box::new(TokioCountdown::new(duration_seconds, self.runtime.clone()))
    }
}
