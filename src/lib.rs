pub mod audio;
pub mod capture;
pub mod llm;
pub mod messages;
pub mod ui;

use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum BanterError {
    #[error("Speech recognition is not available on this system")]
    RecognizerUnavailable,

    #[error("Recognizer error: {0}")]
    RecognizerError(String),

    #[error("Audio device error: {0}")]
    AudioDeviceError(String),

    #[error("Inference error: {0}")]
    InferenceError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Runtime error: {0}")]
    RuntimeError(String),
}

impl BanterError {
    /// Check if this error is recoverable
    pub fn is_recoverable(&self) -> bool {
        match self {
            // The platform has no speech backend at all
            BanterError::RecognizerUnavailable => false,
            // Backend hiccups clear on the next session
            BanterError::RecognizerError(_) => true,
            // Hardware/device errors may require user intervention
            BanterError::AudioDeviceError(_) => false,
            // Typically transient: endpoint down, stream dropped
            BanterError::InferenceError(_) => true,
            BanterError::ConfigError(_) => false,
            BanterError::RuntimeError(_) => false,
        }
    }

    /// Get a user-friendly description
    pub fn user_message(&self) -> String {
        match self {
            BanterError::RecognizerUnavailable => {
                "Speech recognition is not supported on this system.".to_string()
            }
            BanterError::RecognizerError(_) => {
                "Speech recognition failed. Please try again.".to_string()
            }
            BanterError::AudioDeviceError(_) => {
                "Microphone unavailable. Voice visualization is disabled.".to_string()
            }
            BanterError::InferenceError(_) => {
                "The assistant could not finish its reply. Please try again.".to_string()
            }
            BanterError::ConfigError(_) => {
                "Configuration error. Please check settings.".to_string()
            }
            BanterError::RuntimeError(_) => {
                "Failed to start background tasks. Please restart the application.".to_string()
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, BanterError>;
