use charades_types::Category;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Empty means the built-in categories are used.
    pub categories: Vec<Category>,
    pub total_rounds: u32,
    pub tick_interval: Duration,
    pub round_duration_seconds: u32,
    /// Seed for word draws; `None` seeds from entropy.
    pub rng_seed: Option<u64>,
}

impl SessionConfig {
    pub fn with_categories(mut self, categories: Vec<Category>) -> Self {
        self.categories = categories;
        self
    }

    pub fn with_total_rounds(mut self, total_rounds: u32) -> Self {
        self.total_rounds = total_rounds;
        self
    }

    pub fn with_tick_interval(mut self, tick_interval: Duration) -> Self {
        self.tick_interval = tick_interval;
        self
    }

    pub fn with_round_duration(mut self, seconds: u32) -> Self {
        self.round_duration_seconds = seconds;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng_seed = Some(seed);
        self
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            categories: Vec::new(),
            total_rounds: 5,
            tick_interval: Duration::from_millis(1000),
            round_duration_seconds: 60,
            rng_seed: None,
        }
    }
}
