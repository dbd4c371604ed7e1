use labscan_core::{OcrConfig, OcrEngine};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Command;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OcrError {
    #[error("OCR engine error: {0}")]
    Engine(String),
    #[error("OCR engine not available: {0}")]
    NotAvailable(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Abstraction over an OCR backend.
/// Implementations accept PNG image bytes and return the recognized text,
/// which may be empty.
pub trait OcrBackend {
    fn recognize(&self, image_bytes: &[u8]) -> Result<String, OcrError>;
}

impl<T: OcrBackend + ?Sized> OcrBackend for Box<T> {
    fn recognize(&self, image_bytes: &[u8]) -> Result<String, OcrError> {
        (**self).recognize(image_bytes)
    }
}

/// Pick the backend named in the configuration.
pub fn recognizer_from_config(config: &OcrConfig) -> Result<Box<dyn OcrBackend>, OcrError> {
    match config.engine {
        OcrEngine::TesseractCli => Ok(Box::new(TesseractCliRecognizer::from_config(config))),
        #[cfg(feature = "tesseract")]
        OcrEngine::Leptess => Ok(Box::new(tesseract_backend::TesseractRecognizer::from_config(
            config,
        ))),
        #[cfg(not(feature = "tesseract"))]
        OcrEngine::Leptess => Err(OcrError::NotAvailable(
            "leptess engine requires the `tesseract` feature".to_string(),
        )),
    }
}

// ── Mock backend (always available, used for tests) ───────────────────────────

/// Returns a pre-set string, so extraction can be exercised without
/// Tesseract installed.
pub struct MockRecognizer {
    pub text: String,
}

impl MockRecognizer {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

impl OcrBackend for MockRecognizer {
    fn recognize(&self, _image_bytes: &[u8]) -> Result<String, OcrError> {
        Ok(self.text.clone())
    }
}

// ── Tesseract CLI backend ─────────────────────────────────────────────────────

/// Runs the `tesseract` executable on a temporary PNG and reads stdout.
pub struct TesseractCliRecognizer {
    command: String,
    lang: String,
    page_seg_mode: u8,
    data_path: Option<PathBuf>,
}

impl TesseractCliRecognizer {
    pub fn from_config(config: &OcrConfig) -> Self {
        Self {
            command: config.command.clone(),
            lang: config.lang.clone(),
            page_seg_mode: config.page_seg_mode,
            data_path: config.data_path.clone(),
        }
    }

    fn args(&self, input: &Path) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec![
            input.into(),
            "stdout".into(),
            "--psm".into(),
            self.page_seg_mode.to_string().into(),
            "-l".into(),
            self.lang.clone().into(),
        ];
        if let Some(dir) = &self.data_path {
            args.push("--tessdata-dir".into());
            args.push(dir.into());
        }
        args
    }
}

impl OcrBackend for TesseractCliRecognizer {
    fn recognize(&self, image_bytes: &[u8]) -> Result<String, OcrError> {
        let tmpdir = tempfile::TempDir::with_prefix("labscan")?;
        let input = tmpdir.path().join("input.png");
        std::fs::write(&input, image_bytes)?;

        tracing::debug!(command = %self.command, psm = self.page_seg_mode, "running tesseract");
        let output = Command::new(&self.command)
            .args(self.args(&input))
            .output()
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => {
                    OcrError::NotAvailable(format!("`{}` not found on PATH", self.command))
                }
                _ => OcrError::Io(e),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(OcrError::Engine(format!(
                "{} exited with {}: {}",
                self.command,
                output.status,
                stderr.trim()
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

// ── Tesseract backend (optional, gated behind `tesseract` feature) ─────────────

#[cfg(feature = "tesseract")]
pub mod tesseract_backend {
    use super::{OcrBackend, OcrError};
    use labscan_core::OcrConfig;
    use leptess::{LepTess, Variable};

    pub struct TesseractRecognizer {
        data_path: Option<String>,
        lang: String,
        page_seg_mode: u8,
    }

    impl TesseractRecognizer {
        pub fn from_config(config: &OcrConfig) -> Self {
            Self {
                data_path: config
                    .data_path
                    .as_ref()
                    .map(|p| p.to_string_lossy().into_owned()),
                lang: config.lang.clone(),
                page_seg_mode: config.page_seg_mode,
            }
        }
    }

    impl OcrBackend for TesseractRecognizer {
        fn recognize(&self, image_bytes: &[u8]) -> Result<String, OcrError> {
            let mut lt = LepTess::new(self.data_path.as_deref(), &self.lang)
                .map_err(|e| OcrError::Engine(e.to_string()))?;
            lt.set_variable(Variable::TesseditPagesegMode, &self.page_seg_mode.to_string())
                .map_err(|e| OcrError::Engine(e.to_string()))?;
            lt.set_image_from_mem(image_bytes)
                .map_err(|e| OcrError::Engine(e.to_string()))?;
            lt.get_utf8_text().map_err(|e| OcrError::Engine(e.to_string()))
        }
    }
}
