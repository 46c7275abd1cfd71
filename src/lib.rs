pub mod config;
pub mod gateway;
pub mod store;
pub mod ui;

use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum StudioError {
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("API key not found")]
    MissingCredential,

    #[error("Gateway error: {0}")]
    Gateway(String),

    #[error("No result: {0}")]
    EmptyResult(String),

    #[error("Media error: {0}")]
    Media(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Channel error: {0}")]
    Channel(String),

    #[error("Model load error: {0}")]
    ModelLoad(String),
}

impl From<std::io::Error> for StudioError {
    fn from(e: std::io::Error) -> Self {
        StudioError::Storage(e.to_string())
    }
}

impl From<serde_json::Error> for StudioError {
    fn from(e: serde_json::Error) -> Self {
        StudioError::Serialization(e.to_string())
    }
}

impl StudioError {
    /// Check if this error is recoverable
    pub fn is_recoverable(&self) -> bool {
        match self {
            // Transient remote failures, the user can simply retry
            StudioError::Gateway(_) => true,
            StudioError::EmptyResult(_) => true,
            StudioError::Media(_) => true,
            StudioError::Storage(_) => false,
            StudioError::Serialization(_) => false,
            // Requires editing the environment and restarting
            StudioError::MissingCredential => false,
            StudioError::Config(_) => false,
            StudioError::Channel(_) => false,
            StudioError::ModelLoad(_) => false,
        }
    }

    /// Get a user-friendly description
    pub fn user_message(&self) -> String {
        match self {
            StudioError::Storage(_) => "Local data could not be read or written.".to_string(),
            StudioError::Serialization(_) => "Local data is in an unexpected format.".to_string(),
            StudioError::MissingCredential => {
                "No API key configured. Set GEMINI_API_KEY and restart.".to_string()
            }
            StudioError::Gateway(_) => "The AI service request failed. Please try again.".to_string(),
            StudioError::EmptyResult(_) => "The AI service returned no result.".to_string(),
            StudioError::Media(_) => "The selected file could not be used.".to_string(),
            StudioError::Config(_) => "Configuration error. Please check settings.".to_string(),
            StudioError::Channel(_) => {
                "Internal communication error. Please restart the application.".to_string()
            }
            StudioError::ModelLoad(_) => {
                "Failed to load a local model. Please verify model files are present.".to_string()
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, StudioError>;
