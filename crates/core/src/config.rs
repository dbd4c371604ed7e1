use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Image normalization settings applied before OCR.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PreprocessConfig {
    /// Edge length of the square image handed to OCR.
    pub size: u32,
    /// Gaussian blur sigma. 1.1 is what a 5x5 kernel with automatic sigma uses.
    pub blur_sigma: f32,
    /// Fixed binarization cutoff; `None` selects the threshold automatically.
    pub fixed_cutoff: Option<u8>,
}

impl Default for PreprocessConfig {
    fn default() -> Self {
        Self { size: 1000, blur_sigma: 1.1, fixed_cutoff: None }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OcrEngine {
    /// The `tesseract` executable found on `PATH` (or at `command`).
    TesseractCli,
    /// In-process Tesseract through leptess.
    Leptess,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct OcrConfig {
    pub engine: OcrEngine,
    pub lang: String,
    /// Tesseract page segmentation mode. 6 = assume a single uniform block of text.
    pub page_seg_mode: u8,
    pub data_path: Option<PathBuf>,
    pub command: String,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            engine: OcrEngine::TesseractCli,
            lang: "eng".to_string(),
            page_seg_mode: 6,
            data_path: None,
            command: "tesseract".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub path: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { path: PathBuf::from("report.csv") }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct LabscanConfig {
    pub preprocess: PreprocessConfig,
    pub ocr: OcrConfig,
    pub output: OutputConfig,
}

impl LabscanConfig {
    pub fn from_toml(toml_content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(toml_content)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }
}
