use crate::config::EngineSettings;
use crate::engine::{OcrBackend, TextRecognizer};
use crate::error::Result;
use std::path::Path;
use tracing::{debug, warn};

/// Progress of a single recognition call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    Idle,
    EngineReady,
    ImageLoaded,
    Recognized,
}

/// Adapter driving init engine -> load image -> recognize against a backend.
///
/// Every call acquires its own engine and image and releases both before
/// returning. Handles are plain owned values, so release happens in `Drop`
/// on success, on early return and during unwinding alike. The image is
/// declared after the engine and is therefore dropped first.
pub struct Bridge<B> {
    backend: B,
    settings: EngineSettings,
}

impl<B: OcrBackend> Bridge<B> {
    pub fn new(backend: B, settings: EngineSettings) -> Self {
        Self { backend, settings }
    }

    /// Recognize the text in the image at `image_path` using `language`
    pub fn recognize(&self, image_path: &Path, language: &str) -> Result<String> {
        let mut stage = Stage::Idle;
        debug!(?stage, language, path = %image_path.display(), "starting recognition");

        let result = self.run(image_path, language, &mut stage);

        match &result {
            Ok(text) => debug!(?stage, chars = text.chars().count(), "recognition finished"),
            Err(e) => warn!(reached = ?stage, kind = ?e.kind(), "recognition failed: {}", e),
        }
        result
    }

    /// Legacy contract: recognized text, or a sentinel error string
    pub fn recognize_text(&self, image_path: &Path, language: &str) -> String {
        match self.recognize(image_path, language) {
            Ok(text) => text,
            Err(e) => e.sentinel().to_string(),
        }
    }

    fn run(&self, image_path: &Path, language: &str, stage: &mut Stage) -> Result<String> {
        let mut engine = self.backend.init_engine(&self.settings, language)?;
        for (name, value) in &self.settings.variables {
            engine.set_variable(name, value)?;
        }
        *stage = Stage::EngineReady;

        let image = self.backend.read_image(image_path)?;
        *stage = Stage::ImageLoaded;

        engine.set_image(&image);
        let text = engine.utf8_text()?;
        *stage = Stage::Recognized;

        Ok(text)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::error::{OcrError, ENGINE_INIT_SENTINEL, IMAGE_READ_SENTINEL};
    use std::panic::{self, AssertUnwindSafe};
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum Fault {
        None,
        Init,
        Variable,
        Decode,
        Recognize,
        PanicInRecognize,
    }

    #[derive(Default)]
    pub struct Counters {
        pub engine_inits: AtomicUsize,
        pub engine_drops: AtomicUsize,
        pub image_reads: AtomicUsize,
        pub image_drops: AtomicUsize,
    }

    impl Counters {
        fn get(counter: &AtomicUsize) -> usize {
            counter.load(Ordering::SeqCst)
        }
    }

    /// Backend that records every acquire/release and can fail on demand
    pub struct FakeBackend {
        pub fault: Fault,
        pub counters: Arc<Counters>,
    }

    impl FakeBackend {
        pub fn new(fault: Fault) -> Self {
            Self {
                fault,
                counters: Arc::new(Counters::default()),
            }
        }
    }

    pub struct FakeImage {
        path: PathBuf,
        counters: Arc<Counters>,
    }

    impl Drop for FakeImage {
        fn drop(&mut self) {
            self.counters.image_drops.fetch_add(1, Ordering::SeqCst);
        }
    }

    pub struct FakeEngine {
        language: String,
        bound: Option<PathBuf>,
        variables: Vec<(String, String)>,
        fault: Fault,
        counters: Arc<Counters>,
    }

    impl Drop for FakeEngine {
        fn drop(&mut self) {
            self.counters.engine_drops.fetch_add(1, Ordering::SeqCst);
        }
    }

    impl TextRecognizer for FakeEngine {
        type Image = FakeImage;

        fn set_variable(&mut self, name: &str, value: &str) -> Result<()> {
            if self.fault == Fault::Variable {
                return Err(OcrError::engine_init(&self.language, format!("unknown variable {}", name)));
            }
            self.variables.push((name.to_string(), value.to_string()));
            Ok(())
        }

        fn set_image(&mut self, image: &FakeImage) {
            self.bound = Some(image.path.clone());
        }

        fn utf8_text(&mut self) -> Result<String> {
            match self.fault {
                Fault::Recognize => Err(OcrError::Recognition("engine returned null".into())),
                Fault::PanicInRecognize => panic!("recognizer blew up"),
                _ => {
                    let bound = self.bound.as_ref().ok_or_else(|| {
                        OcrError::Recognition("no image bound".into())
                    })?;
                    if bound.to_string_lossy().contains("blank") {
                        return Ok(String::new());
                    }
                    let vars: Vec<_> = self.variables.iter().map(|(k, v)| format!("{}={}", k, v)).collect();
                    Ok(format!("[{}] {} {}", self.language, bound.display(), vars.join(",")))
                }
            }
        }
    }

    impl OcrBackend for FakeBackend {
        type Image = FakeImage;
        type Engine = FakeEngine;

        fn init_engine(&self, _settings: &EngineSettings, language: &str) -> Result<FakeEngine> {
            if self.fault == Fault::Init || language == "xx-invalid" {
                return Err(OcrError::engine_init(language, "no traineddata"));
            }
            self.counters.engine_inits.fetch_add(1, Ordering::SeqCst);
            Ok(FakeEngine {
                language: language.to_string(),
                bound: None,
                variables: Vec::new(),
                fault: self.fault,
                counters: self.counters.clone(),
            })
        }

        fn read_image(&self, path: &Path) -> Result<FakeImage> {
            self.counters.image_reads.fetch_add(1, Ordering::SeqCst);
            if self.fault == Fault::Decode || path.starts_with("/nonexistent.png") {
                return Err(OcrError::ImageRead { path: path.to_path_buf() });
            }
            Ok(FakeImage {
                path: path.to_path_buf(),
                counters: self.counters.clone(),
            })
        }
    }

    fn bridge(fault: Fault) -> (Bridge<FakeBackend>, Arc<Counters>) {
        let backend = FakeBackend::new(fault);
        let counters = backend.counters.clone();
        (Bridge::new(backend, EngineSettings::default()), counters)
    }

    #[test]
    fn test_success_releases_each_handle_once() {
        let (bridge, c) = bridge(Fault::None);

        let text = bridge.recognize(Path::new("/tmp/sample.png"), "eng").unwrap();
        assert_eq!(text, "[eng] /tmp/sample.png ");

        assert_eq!(Counters::get(&c.engine_inits), 1);
        assert_eq!(Counters::get(&c.engine_drops), 1);
        assert_eq!(Counters::get(&c.image_reads), 1);
        assert_eq!(Counters::get(&c.image_drops), 1);
    }

    #[test]
    fn test_init_failure_never_touches_image_decoder() {
        let (bridge, c) = bridge(Fault::Init);

        let out = bridge.recognize_text(Path::new("/tmp/sample.png"), "eng");
        assert!(out.starts_with(ENGINE_INIT_SENTINEL));

        assert_eq!(Counters::get(&c.image_reads), 0);
        assert_eq!(Counters::get(&c.engine_drops), 0);
        assert_eq!(Counters::get(&c.image_drops), 0);
    }

    #[test]
    fn test_invalid_language_scenario() {
        let (bridge, c) = bridge(Fault::None);

        let err = bridge.recognize(Path::new("/tmp/sample.png"), "xx-invalid").unwrap_err();
        assert!(matches!(err, OcrError::EngineInit { ref language, .. } if language == "xx-invalid"));
        assert_eq!(
            bridge.recognize_text(Path::new("/tmp/sample.png"), "xx-invalid"),
            ENGINE_INIT_SENTINEL
        );
        assert_eq!(Counters::get(&c.image_reads), 0);
    }

    #[test]
    fn test_decode_failure_releases_engine_once() {
        let (bridge, c) = bridge(Fault::Decode);

        let out = bridge.recognize_text(Path::new("/tmp/sample.png"), "eng");
        assert_eq!(out, IMAGE_READ_SENTINEL);

        assert_eq!(Counters::get(&c.engine_inits), 1);
        assert_eq!(Counters::get(&c.engine_drops), 1);
        assert_eq!(Counters::get(&c.image_drops), 0);
    }

    #[test]
    fn test_nonexistent_image_scenario() {
        let (bridge, _) = bridge(Fault::None);

        let err = bridge.recognize(Path::new("/nonexistent.png"), "eng").unwrap_err();
        assert!(matches!(err, OcrError::ImageRead { ref path } if path == Path::new("/nonexistent.png")));
    }

    #[test]
    fn test_recognition_failure_releases_both_once() {
        let (bridge, c) = bridge(Fault::Recognize);

        let err = bridge.recognize(Path::new("/tmp/sample.png"), "eng").unwrap_err();
        assert!(matches!(err, OcrError::Recognition(_)));

        assert_eq!(Counters::get(&c.engine_drops), 1);
        assert_eq!(Counters::get(&c.image_drops), 1);
    }

    #[test]
    fn test_panic_during_recognition_still_releases() {
        let (bridge, c) = bridge(Fault::PanicInRecognize);

        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            bridge.recognize(Path::new("/tmp/sample.png"), "eng")
        }));
        assert!(outcome.is_err());

        assert_eq!(Counters::get(&c.engine_drops), 1);
        assert_eq!(Counters::get(&c.image_drops), 1);
    }

    #[test]
    fn test_variable_rejection_is_init_failure() {
        let backend = FakeBackend::new(Fault::Variable);
        let c = backend.counters.clone();
        let mut settings = EngineSettings::default();
        settings.variables.insert("bogus".into(), "1".into());
        let bridge = Bridge::new(backend, settings);

        let err = bridge.recognize(Path::new("/tmp/sample.png"), "eng").unwrap_err();
        assert!(matches!(err, OcrError::EngineInit { .. }));
        assert_eq!(Counters::get(&c.image_reads), 0);
        assert_eq!(Counters::get(&c.engine_drops), 1);
    }

    #[test]
    fn test_variables_applied_in_key_order() {
        let mut settings = EngineSettings::default();
        settings.variables.insert("tessedit_pageseg_mode".into(), "6".into());
        settings.variables.insert("load_system_dawg".into(), "0".into());
        let bridge = Bridge::new(FakeBackend::new(Fault::None), settings);

        let text = bridge.recognize(Path::new("/tmp/sample.png"), "eng").unwrap();
        assert!(text.ends_with("load_system_dawg=0,tessedit_pageseg_mode=6"));
    }

    #[test]
    fn test_empty_text_is_success() {
        let (bridge, _) = bridge(Fault::None);
        let text = bridge.recognize(Path::new("/tmp/blank.png"), "eng").unwrap();
        assert!(text.is_empty());
    }

    #[test]
    fn test_repeated_calls_are_identical_and_independent() {
        let (bridge, c) = bridge(Fault::None);

        let first = bridge.recognize_text(Path::new("/tmp/sample.png"), "eng");
        let second = bridge.recognize_text(Path::new("/tmp/sample.png"), "eng");
        assert_eq!(first, second);

        assert_eq!(Counters::get(&c.engine_inits), 2);
        assert_eq!(Counters::get(&c.engine_drops), 2);
        assert_eq!(Counters::get(&c.image_drops), 2);
    }

    #[test]
    fn test_borrowed_backend() {
        let backend = FakeBackend::new(Fault::None);
        let bridge = Bridge::new(&backend, EngineSettings::default());
        assert!(bridge.recognize(Path::new("/tmp/sample.png"), "deu").is_ok());
        assert_eq!(Counters::get(&backend.counters.engine_drops), 1);
    }
}
