//! Directory batch OCR (`omniocr batch`)

use crate::postprocess::normalize_text;
use anyhow::{Context, Result};
use omniocr_bridge::{Bridge, OcrBackend};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// File extensions picked up from the input directory
const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];

/// Outcome of a batch run
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BatchSummary {
    pub succeeded: usize,
    pub failed: usize,
}

/// Images directly inside `dir`, sorted by file name
pub fn collect_images(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut images = Vec::new();
    for entry in std::fs::read_dir(dir).with_context(|| format!("reading {}", dir.display()))? {
        let path = entry?.path();
        let is_image = path.is_file()
            && path
                .extension()
                .and_then(|e| e.to_str())
                .map(|e| IMAGE_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
                .unwrap_or(false);
        if is_image {
            images.push(path);
        }
    }
    images.sort();
    Ok(images)
}

/// Recognize every image in `input_dir`, writing `<stem>.txt` into `output_dir`.
///
/// Images are processed one after another, each with its own engine. A failed
/// image gets `ERROR: <message>` as its output and does not stop the run.
pub fn run_batch<B: OcrBackend>(
    bridge: &Bridge<B>,
    input_dir: &Path,
    output_dir: &Path,
    lang: &str,
    postprocess: bool,
) -> Result<BatchSummary> {
    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("creating {}", output_dir.display()))?;

    let images = collect_images(input_dir)?;
    info!("batch OCR: {} image(s) in {:?}", images.len(), input_dir);

    let mut summary = BatchSummary::default();
    for image in &images {
        let stem = image.file_stem().unwrap_or_default().to_string_lossy();
        let out_path = output_dir.join(format!("{}.txt", stem));

        let content = match bridge.recognize(image, lang) {
            Ok(text) => {
                summary.succeeded += 1;
                if postprocess {
                    normalize_text(&text)
                } else {
                    text
                }
            }
            Err(e) => {
                warn!("OCR failed for {:?}: {}", image, e);
                summary.failed += 1;
                format!("ERROR: {}", e)
            }
        };

        std::fs::write(&out_path, content)
            .with_context(|| format!("writing {}", out_path.display()))?;
    }

    Ok(summary)
}
