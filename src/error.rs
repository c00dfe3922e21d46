use std::io;

use azrm_azure::types::{AzureError, CommandError};

use crate::output::OutputError;
use crate::settings::ConfigError;

/// Everything that can end an invocation with a non-zero exit status.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Command(#[from] CommandError),

    #[error("Cannot read input '{origin}': {error}")]
    Input {
        origin: String,
        #[source]
        error: io::Error,
    },

    #[error("Input '{origin}' is not a valid object: {message}")]
    InvalidObject { origin: String, message: String },

    #[error("Only one of {0} can read from stdin ('-')")]
    StdinReused(String),

    #[error("Cannot write output: {0}")]
    Output(#[from] OutputError),
}

impl From<AzureError> for AppError {
    fn from(e: AzureError) -> Self {
        AppError::Command(CommandError::from(e))
    }
}

impl AppError {
    pub fn exit_code(&self) -> u8 {
        1
    }
}
