//! Tesseract + Leptonica backend via `leptess`

use crate::config::EngineSettings;
use crate::engine::{OcrBackend, TextRecognizer};
use crate::error::{OcrError, Result};
use leptess::leptonica::{self, Pix};
use leptess::tesseract::TessApi;
use std::ffi::{CStr, CString};
use std::path::Path;
use tracing::debug;

/// Backend creating a fresh `TessApi` per call.
///
/// `TessApi` ends the engine when dropped and `Pix` destroys its image when
/// dropped, so both handles follow the bridge's scoped release.
#[derive(Debug, Default, Clone, Copy)]
pub struct TesseractBackend;

impl TesseractBackend {
    pub fn new() -> Self {
        Self
    }

    /// Whether an engine can be initialized for `language` with these settings
    pub fn is_available(settings: &EngineSettings, language: &str) -> bool {
        Self.init_engine(settings, language).is_ok()
    }
}

/// Initialized Tesseract engine
pub struct TesseractEngine {
    api: TessApi,
    language: String,
}

impl TextRecognizer for TesseractEngine {
    type Image = Pix;

    fn set_variable(&mut self, name: &str, value: &str) -> Result<()> {
        let invalid = |what: &str| {
            OcrError::engine_init(&self.language, format!("invalid {} for variable '{}'", what, name))
        };
        let c_name = CString::new(name).map_err(|_| invalid("name"))?;
        let c_value = CString::new(value).map_err(|_| invalid("value"))?;

        self.api
            .raw
            .set_variable(&c_name, &c_value)
            .map_err(|e| OcrError::engine_init(&self.language, format!("failed to set '{}': {:?}", name, e)))
    }

    fn set_image(&mut self, image: &Pix) {
        self.api.set_image(image);
    }

    fn utf8_text(&mut self) -> Result<String> {
        // The raw call reports a NULL result instead of unwrapping it
        let text = self
            .api
            .raw
            .get_utf8_text()
            .map_err(|e| OcrError::Recognition(format!("engine returned no text: {:?}", e)))?;
        let text: &CStr = text.as_ref();

        text.to_str()
            .map(str::to_owned)
            .map_err(|e| OcrError::Recognition(format!("engine produced invalid UTF-8: {}", e)))
    }
}

impl OcrBackend for TesseractBackend {
    type Image = Pix;
    type Engine = TesseractEngine;

    fn init_engine(&self, settings: &EngineSettings, language: &str) -> Result<TesseractEngine> {
        if language.contains('\0') {
            return Err(OcrError::engine_init(language, "language code contains a NUL byte"));
        }

        let data_path = match settings.data_path.as_deref() {
            Some(dir) => Some(tessdata_dir(dir).map_err(|m| OcrError::engine_init(language, m))?),
            None => None,
        };

        debug!(language, ?data_path, "initializing tesseract");
        let api = TessApi::new(data_path, language)
            .map_err(|e| OcrError::engine_init(language, format!("tesseract init returned {:?}", e)))?;

        Ok(TesseractEngine {
            api,
            language: language.to_string(),
        })
    }

    fn read_image(&self, path: &Path) -> Result<Pix> {
        debug!(path = %path.display(), "decoding image");
        leptonica::pix_read(path).map_err(|e| {
            debug!("pix_read failed: {:?}", e);
            OcrError::ImageRead { path: path.to_path_buf() }
        })
    }
}

/// Tessdata directory as the `&str` leptess wants; it unwraps a `CString` internally
fn tessdata_dir(dir: &Path) -> std::result::Result<&str, String> {
    let dir_str = dir
        .to_str()
        .ok_or_else(|| format!("tessdata path is not UTF-8: {}", dir.display()))?;
    if dir_str.contains('\0') {
        return Err("tessdata path contains a NUL byte".to_string());
    }
    Ok(dir_str)
}
