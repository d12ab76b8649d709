#![allow(dead_code)]

use charades_core::{ManualClock, Session, SessionConfig, SessionObserver, TimerSignal};
use charades_types::{Category, SessionEvent};
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;

/// Session wired to a manual clock and an event collector.
pub struct TestSession {
    pub session: Session,
    pub signals: mpsc::UnboundedReceiver<TimerSignal>,
    pub clock: ManualClock,
    pub events: EventCollector,
}

impl TestSession {
    /// Advance the clock `steps` intervals and deliver the resulting signals.
    pub fn advance(&mut self, steps: u32) {
        self.clock.advance_by(steps);
        self.deliver_signals();
    }

    pub fn deliver_signals(&mut self) {
        while let Ok(signal) = self.signals.try_recv() {
            self.session.handle_timer_signal(signal);
        }
    }
}

pub fn colors_category() -> Category {
    Category::new("Colors", ["Red", "Blue"]).unwrap()
}

pub fn create_session_with(categories: Vec<Category>, total_rounds: u32) -> TestSession {
    let clock = ManualClock::new();
    let config = SessionConfig::default()
        .with_categories(categories)
        .with_total_rounds(total_rounds)
        .with_round_duration(60)
        .with_seed(42);

    let (mut session, signals) = Session::new(config, clock.clone()).unwrap();
    let events = EventCollector::new();
    session.set_observer(Some(Box::new(events.clone())));

    TestSession {
        session,
        signals,
        clock,
        events,
    }
}

/// Colors category, 5 rounds.
pub fn create_colors_session() -> TestSession {
    create_session_with(vec![colors_category()], 5)
}

/// Colors session with teams "A" and "B", category selected, events cleared.
pub fn create_team_session(total_rounds: u32) -> TestSession {
    let mut test = create_session_with(vec![colors_category()], total_rounds);
    test.session.create_teams("A", "B");
    test.session.select_category("Colors").unwrap();
    test.events.clear();
    test
}

/// Event collector for testing event emissions
#[derive(Clone)]
pub struct EventCollector {
    events: Arc<Mutex<Vec<SessionEvent>>>,
}

impl EventCollector {
    pub fn new() -> Self {
        Self {
            events: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn get_events(&self) -> Vec<SessionEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn clear(&self) {
        self.events.lock().unwrap().clear();
    }

    pub fn last_event(&self) -> Option<SessionEvent> {
        self.events.lock().unwrap().last().cloned()
    }

    pub fn event_count(&self) -> usize {
        self.events.lock().unwrap().len()
    }

    pub fn count_where(&self, check_fn: impl Fn(&SessionEvent) -> bool) -> usize {
        self.events.lock().unwrap().iter().filter(|e| check_fn(e)).count()
    }

    pub fn has_event_type(&self, check_fn: impl Fn(&SessionEvent) -> bool) -> bool {
        self.events.lock().unwrap().iter().any(check_fn)
    }

    pub fn kinds(&self) -> Vec<&'static str> {
        self.events.lock().unwrap().iter().map(|e| e.kind()).collect()
    }
}

impl SessionObserver for EventCollector {
    fn handle_event(&mut self, event: SessionEvent) {
        self.events.lock().unwrap().push(event);
    }
}
