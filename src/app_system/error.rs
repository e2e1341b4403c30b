use thiserror::Error;
use super::ConfigError;

/// Errors that stop the process during startup or shutdown.
#[derive(Debug, Error)]
pub enum SystemError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("Seeding failed: {0}")]
    Seed(String),
    #[error("Actor task failed: {0}")]
    ActorTaskFailed(String),
}
