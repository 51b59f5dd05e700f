//! Bridge configuration
//!
//! TOML-backed settings for the OCR engine. The exported entry points build a
//! fresh config from the environment on every call, so nothing is cached
//! between invocations.

use crate::error::{OcrError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Environment variable naming the tessdata directory
pub const TESSDATA_ENV: &str = "OMNIOCR_TESSDATA";

/// Top-level configuration file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BridgeConfig {
    #[serde(default)]
    pub engine: EngineSettings,
}

/// Settings handed to the OCR engine at init
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EngineSettings {
    /// Directory holding `<lang>.traineddata` files (None = engine default lookup)
    pub data_path: Option<PathBuf>,

    /// Engine parameters applied right after init, e.g. `tessedit_pageseg_mode = "6"`
    #[serde(default)]
    pub variables: BTreeMap<String, String>,
}

impl BridgeConfig {
    /// Load configuration from a TOML file, then apply environment overrides
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            OcrError::Config(format!("failed to read {}: {}", path.display(), e))
        })?;
        let mut config = Self::from_toml_str(&content)?;
        config.apply_env();
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| OcrError::Config(format!("invalid config: {}", e)))
    }

    /// Defaults plus environment overrides
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_env();
        config
    }

    fn apply_env(&mut self) {
        if let Some(dir) = std::env::var_os(TESSDATA_ENV).filter(|v| !v.is_empty()) {
            self.engine.data_path = Some(PathBuf::from(dir));
        }
    }
}
