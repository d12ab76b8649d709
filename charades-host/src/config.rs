use anyhow::{Context, Result};
use charades_core::{SessionConfig, load_word_lists};
use std::env;
use std::str::FromStr;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub total_rounds: u32,
    pub tick_interval_ms: u64,
    pub round_seconds: u32,
    pub words_dir: Option<String>,
    pub seed: Option<u64>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key/value source; unset keys take their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();
        Ok(Self {
            total_rounds: parse_var(&lookup, "CHARADES_TOTAL_ROUNDS")?
                .unwrap_or(defaults.total_rounds),
            tick_interval_ms: parse_var(&lookup, "CHARADES_TICK_INTERVAL_MS")?
                .unwrap_or(defaults.tick_interval_ms),
            round_seconds: parse_var(&lookup, "CHARADES_ROUND_SECONDS")?
                .unwrap_or(defaults.round_seconds),
            words_dir: lookup("CHARADES_WORDS_DIR").filter(|dir| !dir.trim().is_empty()),
            seed: parse_var(&lookup, "CHARADES_SEED")?,
        })
    }

    /// Session settings, with categories loaded from `words_dir` when set.
    pub fn session_config(&self) -> Result<SessionConfig> {
        let categories = match &self.words_dir {
            Some(dir) => load_word_lists(dir)?,
            None => Vec::new(),
        };

        let mut config = SessionConfig::default()
            .with_categories(categories)
            .with_total_rounds(self.total_rounds)
            .with_tick_interval(Duration::from_millis(self.tick_interval_ms))
            .with_round_duration(self.round_seconds);
        if let Some(seed) = self.seed {
            config = config.with_seed(seed);
        }
        Ok(config)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            total_rounds: 5,
            tick_interval_ms: 1000,
            round_seconds: 60,
            words_dir: None,
            seed: None,
        }
    }
}

fn parse_var<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    lookup(key)
        .map(|value| {
            value
                .trim()
                .parse()
                .with_context(|| format!("Invalid {key}: {value:?}"))
        })
        .transpose()
}
