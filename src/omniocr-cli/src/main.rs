//! OmniOCR - desktop front-end for the native OCR bridge

mod batch;
mod postprocess;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use omniocr_bridge::{Bridge, BridgeConfig, ErrorKind, OcrError, TesseractBackend};
use postprocess::normalize_text;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "omniocr")]
#[command(about = "Extract text from images with Tesseract")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run OCR on an image and print or save the result
    Ocr {
        /// Input image file
        input: PathBuf,

        /// Tesseract language code (e.g. eng, fas, eng+fas)
        #[arg(short, long, default_value = "eng")]
        lang: String,

        /// Save the recognized text to this file instead of printing it
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Directory containing <lang>.traineddata
        #[arg(long)]
        tessdata: Option<PathBuf>,

        /// Print a JSON object instead of plain text
        #[arg(long)]
        json: bool,

        /// Normalize Persian characters and collapse whitespace
        #[arg(long)]
        postprocess: bool,
    },

    /// Run OCR on every .png/.jpg/.jpeg image in a directory
    Batch {
        /// Directory containing the images
        input_dir: PathBuf,

        /// Directory receiving one <name>.txt per image
        #[arg(short, long, default_value = "ocr_output")]
        output_dir: PathBuf,

        /// Tesseract language code
        #[arg(short, long, default_value = "fas")]
        lang: String,

        /// Directory containing <lang>.traineddata
        #[arg(long)]
        tessdata: Option<PathBuf>,

        /// Write the raw engine text instead of the normalized text
        #[arg(long)]
        raw: bool,
    },

    /// Check that the engine initializes for a language
    Check {
        /// Tesseract language code
        #[arg(short, long, default_value = "eng")]
        lang: String,

        /// Directory containing <lang>.traineddata
        #[arg(long)]
        tessdata: Option<PathBuf>,
    },
}

/// JSON shape printed by `ocr --json`
#[derive(Debug, Serialize)]
struct OcrReport {
    ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    kind: Option<ErrorKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl From<&std::result::Result<String, OcrError>> for OcrReport {
    fn from(result: &std::result::Result<String, OcrError>) -> Self {
        match result {
            Ok(text) => Self {
                ok: true,
                text: Some(text.clone()),
                kind: None,
                error: None,
            },
            Err(e) => Self {
                ok: false,
                text: None,
                kind: Some(e.kind()),
                error: Some(e.to_string()),
            },
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();

    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Ocr { input, lang, output, tessdata, json, postprocess } => {
            cmd_ocr(config, &input, &lang, output, tessdata, json, postprocess)?;
        }
        Commands::Batch { input_dir, output_dir, lang, tessdata, raw } => {
            cmd_batch(config, &input_dir, &output_dir, &lang, tessdata, !raw)?;
        }
        Commands::Check { lang, tessdata } => {
            cmd_check(config, &lang, tessdata)?;
        }
    }

    Ok(())
}

/// Explicit `--config`, else `<config_dir>/omniocr/config.toml` if present, else defaults
fn load_config(explicit: Option<&Path>) -> Result<BridgeConfig> {
    if let Some(path) = explicit {
        return BridgeConfig::load(path).with_context(|| format!("loading {}", path.display()));
    }

    let default_path = dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("omniocr")
        .join("config.toml");

    if default_path.exists() {
        debug!("using config {:?}", default_path);
        Ok(BridgeConfig::load(&default_path)?)
    } else {
        Ok(BridgeConfig::from_env())
    }
}

fn cmd_ocr(
    mut config: BridgeConfig,
    input: &Path,
    lang: &str,
    output: Option<PathBuf>,
    tessdata: Option<PathBuf>,
    json: bool,
    postprocess: bool,
) -> Result<()> {
    if !input.exists() {
        bail!("file not found: {}", input.display());
    }

    if let Some(dir) = tessdata {
        config.engine.data_path = Some(dir);
    }

    info!("running OCR on {:?} (lang: {})", input, lang);
    let bridge = Bridge::new(TesseractBackend::new(), config.engine);
    let mut result = bridge.recognize(input, lang);
    if postprocess {
        result = result.map(|text| normalize_text(&text));
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&OcrReport::from(&result))?);
        if let Err(e) = result {
            bail!("OCR failed: {}", e);
        }
        return Ok(());
    }

    let text = result?;
    match output {
        Some(path) => {
            std::fs::write(&path, &text)
                .with_context(|| format!("writing {}", path.display()))?;
            println!("OCR result saved to {}", path.display());
        }
        None => {
            println!("--- OCR Result ---");
            println!("{}", text);
        }
    }

    Ok(())
}

fn cmd_batch(
    mut config: BridgeConfig,
    input_dir: &Path,
    output_dir: &Path,
    lang: &str,
    tessdata: Option<PathBuf>,
    postprocess: bool,
) -> Result<()> {
    if !input_dir.is_dir() {
        bail!("directory not found: {}", input_dir.display());
    }

    if let Some(dir) = tessdata {
        config.engine.data_path = Some(dir);
    }

    let bridge = Bridge::new(TesseractBackend::new(), config.engine);
    let summary = batch::run_batch(&bridge, input_dir, output_dir, lang, postprocess)?;

    println!(
        "processed {} image(s): {} ok, {} failed",
        summary.succeeded + summary.failed,
        summary.succeeded,
        summary.failed
    );
    println!("results written to {}", output_dir.display());

    Ok(())
}

fn cmd_check(mut config: BridgeConfig, lang: &str, tessdata: Option<PathBuf>) -> Result<()> {
    if let Some(dir) = tessdata {
        config.engine.data_path = Some(dir);
    }

    println!("checking OCR engine...\n");
    println!(
        "  tessdata: {}",
        config
            .engine
            .data_path
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "engine default".to_string())
    );

    let ok = TesseractBackend::is_available(&config.engine, lang);
    println!("  tesseract ({}): {}", lang, if ok { "OK" } else { "NOT AVAILABLE" });
    println!();

    if ok {
        println!("all checks passed!");
        Ok(())
    } else {
        println!("WARNING: could not initialize tesseract for '{}'.", lang);
        println!("Install the language pack or point --tessdata at a directory containing {}.traineddata.", lang);
        bail!("tesseract not available for '{}'", lang)
    }
}
