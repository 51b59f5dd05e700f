//! Native OCR bridge for OmniOCR
//!
//! Exposes Tesseract (engine) and Leptonica (image decoding) to managed
//! mobile runtimes. Each call initializes an engine for the requested
//! language, decodes the image, runs recognition and releases both native
//! handles before returning.
//!
//! Entry points:
//! - [`recognize`]: tagged `Result` API for Rust callers
//! - [`recognize_text`]: legacy string contract with `Error: ...` sentinels
//! - `ffi`: C ABI used by Kotlin/Native on iOS
//! - `android` (feature `android`): JNI exports for `org.omniocr.ocrcore.OcrBridge`

mod boundary;
mod bridge;
mod config;
mod engine;
mod error;
pub mod ffi;
#[cfg(feature = "tesseract")]
mod tesseract;
#[cfg(feature = "android")]
pub mod android;

pub use bridge::Bridge;
pub use config::{BridgeConfig, EngineSettings, TESSDATA_ENV};
pub use engine::{OcrBackend, TextRecognizer};
pub use error::{
    ErrorKind, OcrError, Result, ENGINE_INIT_SENTINEL, IMAGE_READ_SENTINEL, RECOGNITION_SENTINEL,
};
#[cfg(feature = "tesseract")]
pub use tesseract::{TesseractBackend, TesseractEngine};

/// Tesseract bridge configured from the environment
#[cfg(feature = "tesseract")]
pub fn default_bridge() -> Bridge<TesseractBackend> {
    Bridge::new(TesseractBackend::new(), BridgeConfig::from_env().engine)
}

/// Recognize the text in `image_path` with the Tesseract language `language`
#[cfg(feature = "tesseract")]
pub fn recognize(image_path: &str, language: &str) -> Result<String> {
    default_bridge().recognize(std::path::Path::new(image_path), language)
}

/// Legacy contract: recognized text, or a sentinel error string
#[cfg(feature = "tesseract")]
pub fn recognize_text(image_path: &str, language: &str) -> String {
    default_bridge().recognize_text(std::path::Path::new(image_path), language)
}
