//! Error types for the OCR bridge

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// Sentinel returned to legacy callers when the engine cannot be initialized
pub const ENGINE_INIT_SENTINEL: &str = "Error: Could not initialize tesseract.";

/// Sentinel returned to legacy callers when the image cannot be decoded
pub const IMAGE_READ_SENTINEL: &str = "Error: Could not read image.";

/// Sentinel returned to legacy callers when recognition itself fails
pub const RECOGNITION_SENTINEL: &str = "Error: Could not recognize text.";

#[derive(Error, Debug)]
pub enum OcrError {
    #[error("failed to initialize OCR engine for language '{language}': {message}")]
    EngineInit { language: String, message: String },

    #[error("failed to read image at {}", path.display())]
    ImageRead { path: PathBuf },

    #[error("text recognition failed: {0}")]
    Recognition(String),

    #[error("configuration error: {0}")]
    Config(String),
}

/// Boundary-stable tag for an [`OcrError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    EngineInit,
    ImageRead,
    Recognition,
    Config,
}

impl ErrorKind {
    /// Status code used by the C ABI (`0` is reserved for success)
    pub fn code(self) -> i32 {
        match self {
            ErrorKind::EngineInit => 1,
            ErrorKind::ImageRead => 2,
            ErrorKind::Recognition => 3,
            ErrorKind::Config => 5,
        }
    }
}

impl OcrError {
    pub fn engine_init(language: &str, message: impl Into<String>) -> Self {
        OcrError::EngineInit {
            language: language.to_string(),
            message: message.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            OcrError::EngineInit { .. } => ErrorKind::EngineInit,
            OcrError::ImageRead { .. } => ErrorKind::ImageRead,
            OcrError::Recognition(_) => ErrorKind::Recognition,
            OcrError::Config(_) => ErrorKind::Config,
        }
    }

    /// Legacy string form, for callers that still sniff the `Error:` prefix
    pub fn sentinel(&self) -> &'static str {
        match self {
            OcrError::EngineInit { .. } => ENGINE_INIT_SENTINEL,
            OcrError::ImageRead { .. } => IMAGE_READ_SENTINEL,
            OcrError::Recognition(_) | OcrError::Config(_) => RECOGNITION_SENTINEL,
        }
    }
}

pub type Result<T> = std::result::Result<T, OcrError>;
