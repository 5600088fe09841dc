use chrono::Duration;
use std::{env, path::PathBuf};

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_DATA_DIR: &str = "data";
const DEFAULT_REMINDER_INTERVAL_HOURS: i64 = 24;
const MAX_REMINDER_INTERVAL_SECS: i64 = 366 * 24 * 60 * 60;

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub data_dir: PathBuf,
    pub reminder_interval: Duration,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let port = lookup("PORT")
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(DEFAULT_PORT);
        let data_dir = lookup("APP_DATA_DIR")
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR));
        let reminder_interval = lookup("REMINDER_INTERVAL_SECS")
            .and_then(|value| value.parse::<i64>().ok())
            .filter(|secs| (1..=MAX_REMINDER_INTERVAL_SECS).contains(secs))
            .and_then(Duration::try_seconds)
            .unwrap_or_else(|| Duration::hours(DEFAULT_REMINDER_INTERVAL_HOURS));

        Self {
            port,
            data_dir,
            reminder_interval,
        }
    }
}
