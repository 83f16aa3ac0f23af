//! Error handling module for PanZoom

use thiserror::Error;

/// Main error type for PanZoom operations
#[derive(Error, Debug)]
pub enum PanZoomError {
    /// Settings failed validation before anything was spawned
    #[error("Invalid settings: {message}")]
    Validation { message: String },

    /// No supported images were found
    #[error("No images found in: {path} (supported: png, jpg, jpeg, webp, bmp, tiff)")]
    EmptyInput { path: String },

    /// Transition name is not in the catalog
    #[error("Unknown transition: {name}. Run `panzoom transitions` for the list, or use \"random\"")]
    UnknownTransition { name: String },

    /// The ffmpeg binary could not be resolved
    #[error("FFmpeg not found: {message}. Please install FFmpeg (https://ffmpeg.org/download.html) or pass --ffmpeg")]
    EngineNotFound { message: String },

    /// The engine exited abnormally
    #[error("Render failed (exit code {}): {diagnostics}", code.map(|c| c.to_string()).unwrap_or_else(|| "none".to_string()))]
    RenderFailed {
        code: Option<i32>,
        diagnostics: String,
    },

    /// The render was cancelled by the caller
    #[error("Render cancelled")]
    Cancelled,

    /// Config file could not be read or parsed
    #[error("Config error in {path}: {message}")]
    Config { path: String, message: String },

    /// I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl PanZoomError {
    /// Shorthand for a validation failure
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Whether re-running the same render could plausibly succeed.
    ///
    /// Only engine failures qualify; everything else needs the input fixed first.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::RenderFailed { .. })
    }
}

/// Result type alias for PanZoom operations
pub type PanZoomResult<T> = std::result::Result<T, PanZoomError>;
