//! Outcome mapping shared by the interop exports
//!
//! Both the C ABI and JNI layers first turn their raw arguments into
//! `Option<(path, language)>` (None when any argument is null) and then ask
//! this module what to hand back. Keeping the mapping here lets it be tested
//! without a JVM.

use crate::bridge::Bridge;
use crate::engine::OcrBackend;
use crate::error::{OcrError, Result};
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::path::PathBuf;
use tracing::{error, warn};

/// Thrown by the checked JNI export on recognition failures
pub const OCR_EXCEPTION_CLASS: &str = "org/omniocr/ocrcore/OcrException";

/// Thrown by the checked JNI export when an argument is null
pub const ILLEGAL_ARGUMENT_CLASS: &str = "java/lang/IllegalArgumentException";

/// Decoded arguments of one call
pub type CallArgs = (PathBuf, String);

/// What an export returns to its caller
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// A string result (recognized text or legacy sentinel)
    Text(String),
    /// A null return
    Null,
    /// Raise `class` with `message`, return null
    Throw { class: &'static str, message: String },
}

/// Run `f`, turning a panic into a recognition error so it never unwinds
/// across the boundary
pub(crate) fn guarded<F>(f: F) -> Result<String>
where
    F: FnOnce() -> Result<String>,
{
    panic::catch_unwind(AssertUnwindSafe(f)).unwrap_or_else(|payload| {
        let message = panic_message(payload.as_ref());
        error!("panic inside OCR bridge: {}", message);
        Err(OcrError::Recognition(format!("panic: {}", message)))
    })
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// Legacy contract: text or sentinel; null only for a null argument
pub(crate) fn legacy_reply<B: OcrBackend>(bridge: &Bridge<B>, args: Option<CallArgs>) -> Reply {
    let Some((path, language)) = args else {
        warn!("legacy OCR call with a null argument");
        return Reply::Null;
    };

    match guarded(|| bridge.recognize(&path, &language)) {
        Ok(text) => Reply::Text(text),
        Err(e) => Reply::Text(e.sentinel().to_string()),
    }
}

/// Checked contract: text, or an exception carrying the error kind
#[cfg_attr(not(feature = "android"), allow(dead_code))]
pub(crate) fn checked_reply<B: OcrBackend>(bridge: &Bridge<B>, args: Option<CallArgs>) -> Reply {
    let Some((path, language)) = args else {
        return Reply::Throw {
            class: ILLEGAL_ARGUMENT_CLASS,
            message: "imagePath and langCode must not be null".to_string(),
        };
    };

    match guarded(|| bridge.recognize(&path, &language)) {
        Ok(text) => Reply::Text(text),
        Err(e) => Reply::Throw {
            class: OCR_EXCEPTION_CLASS,
            message: format!("{:?}: {}", e.kind(), e),
        },
    }
}
