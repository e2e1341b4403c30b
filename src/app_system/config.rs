use thiserror::Error;

const DEFAULT_ACTOR_BUFFER_SIZE: usize = 32;
const DEFAULT_EVENT_CHANNEL_CAPACITY: usize = 256;
const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ConfigError {
    #[error("{var} must be a positive integer, got {value:?}")]
    InvalidNumber { var: &'static str, value: String },
}

/// Runtime settings, read from the environment (and `.env` when present).
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Mailbox size of each resource actor (env: ACTOR_BUFFER_SIZE)
    pub actor_buffer_size: usize,
    /// Events a subscriber may lag behind per topic (env: EVENT_CHANNEL_CAPACITY)
    pub event_channel_capacity: usize,
    /// Fallback log filter when RUST_LOG is unset (env: LOG_LEVEL)
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            actor_buffer_size: DEFAULT_ACTOR_BUFFER_SIZE,
            event_channel_capacity: DEFAULT_EVENT_CHANNEL_CAPACITY,
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        Ok(Self {
            actor_buffer_size: positive(&lookup, "ACTOR_BUFFER_SIZE", defaults.actor_buffer_size)?,
            event_channel_capacity: positive(&lookup, "EVENT_CHANNEL_CAPACITY", defaults.event_channel_capacity)?,
            log_level: lookup("LOG_LEVEL").filter(|s| !s.is_empty()).unwrap_or(defaults.log_level),
        })
    }
}

fn positive(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
    default: usize,
) -> Result<usize, ConfigError> {
    match lookup(var) {
        None => Ok(default),
        Some(value) => match value.trim().parse::<usize>() {
            Ok(n) if n > 0 => Ok(n),
            _ => Err(ConfigError::InvalidNumber { var, value }),
        },
    }
}
