//! Collaborator traits for the OCR engine and image decoder

use crate::config::EngineSettings;
use crate::error::Result;
use std::path::Path;

/// Initialized OCR engine handle.
///
/// Implementors release the native engine in `Drop`; the bridge relies on
/// that to free it on every exit path.
pub trait TextRecognizer {
    type Image;

    /// Set an engine parameter after init
    fn set_variable(&mut self, name: &str, value: &str) -> Result<()>;

    /// Bind a decoded image for the next recognition
    fn set_image(&mut self, image: &Self::Image);

    /// Run recognition on the bound image and return its UTF-8 text
    fn utf8_text(&mut self) -> Result<String>;
}

/// The pair of external collaborators the bridge drives: an OCR engine
/// factory and an image decoder.
pub trait OcrBackend {
    /// Decoded image handle, released in `Drop`
    type Image;
    type Engine: TextRecognizer<Image = Self::Image>;

    /// Create an engine for `language`, using the tessdata location in `settings`
    fn init_engine(&self, settings: &EngineSettings, language: &str) -> Result<Self::Engine>;

    /// Decode the image file at `path`
    fn read_image(&self, path: &Path) -> Result<Self::Image>;
}

impl<B: OcrBackend + ?Sized> OcrBackend for &B {
    type Image = B::Image;
    type Engine = B::Engine;

    fn init_engine(&self, settings: &EngineSettings, language: &str) -> Result<Self::Engine> {
        (**self).init_engine(settings, language)
    }

    fn read_image(&self, path: &Path) -> Result<Self::Image> {
        (**self).read_image(path)
    }
}
