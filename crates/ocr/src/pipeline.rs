use std::path::Path;
use thiserror::Error;

use labscan_core::{PreprocessConfig, ReportResult};

use crate::extract::{ExtractError, Extractor};
use crate::inference::{InferenceError, NoopExtractor, StructuredExtractor, TokenPrediction};
use crate::normalize::{extract_patient_name, normalize_fields};
use crate::preprocess::{self, PreparedImage, PreprocessError};
use crate::recognizer::{OcrBackend, OcrError};

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Image preprocessing failed: {0}")]
    Preprocess(#[from] PreprocessError),
    #[error("OCR recognition failed: {0}")]
    Ocr(#[from] OcrError),
    #[error("Lab value extraction failed: {0}")]
    Extract(#[from] ExtractError),
    #[error("Structured inference failed: {0}")]
    Inference(#[from] InferenceError),
}

/// Everything one report run produced.
#[derive(Debug)]
pub struct PipelineOutput {
    /// Raw OCR text output.
    pub ocr_text: String,
    /// OCR text after label normalization.
    pub normalized_text: String,
    /// Patient name and lab values.
    pub report: ReportResult,
    /// Per-token predictions from the structured extractor, if any.
    pub predictions: Vec<TokenPrediction>,
}

/// Orchestrates: preprocess → OCR → normalize → extract → structured inference.
pub struct ReportPipeline<R: OcrBackend, S: StructuredExtractor = NoopExtractor> {
    recognizer: R,
    structured: S,
    preprocess: PreprocessConfig,
}

impl<R: OcrBackend> ReportPipeline<R> {
    pub fn new(recognizer: R, preprocess: PreprocessConfig) -> Self {
        Self { recognizer, structured: NoopExtractor, preprocess }
    }
}

impl<R: OcrBackend, S: StructuredExtractor> ReportPipeline<R, S> {
    /// Replace the structured extractor.
    pub fn with_structured<T: StructuredExtractor>(self, structured: T) -> ReportPipeline<R, T> {
        ReportPipeline {
            recognizer: self.recognizer,
            structured,
            preprocess: self.preprocess,
        }
    }

    /// Process a report image on disk.
    pub fn process_file(&self, path: &Path) -> Result<PipelineOutput, PipelineError> {
        tracing::info!("Preprocessing {}", path.display());
        let prepared = preprocess::prepare_for_ocr(path, &self.preprocess)?;
        self.process_prepared(&prepared)
    }

    /// Process raw image bytes.
    pub fn process_bytes(&self, data: &[u8]) -> Result<PipelineOutput, PipelineError> {
        let prepared = preprocess::prepare_for_ocr_from_bytes(data, &self.preprocess)?;
        self.process_prepared(&prepared)
    }

    fn process_prepared(&self, prepared: &PreparedImage) -> Result<PipelineOutput, PipelineError> {
        tracing::debug!(threshold = prepared.threshold, "image binarized");

        let ocr_text = self.recognizer.recognize(&prepared.to_png()?)?;
        if ocr_text.trim().is_empty() {
            tracing::warn!("OCR produced no text");
        }

        let mut output = process_text(&ocr_text)?;

        output.predictions = self.structured.predict(&prepared.resized, &output.ocr_text)?;
        if !output.predictions.is_empty() {
            tracing::debug!(tokens = output.predictions.len(), "structured predictions computed");
        }

        Ok(output)
    }
}

/// Run only the text stages (normalize → extract) on text that was
/// recognized elsewhere.
pub fn process_text(ocr_text: &str) -> Result<PipelineOutput, PipelineError> {
    let normalized_text = normalize_fields(ocr_text);
    let values = Extractor::extract(&normalized_text)?;
    let report = ReportResult::new(extract_patient_name(&normalized_text), values);
    tracing::info!(
        patient = %report.patient_name,
        parameters = report.values.len(),
        "report extracted"
    );
    Ok(PipelineOutput {
        ocr_text: ocr_text.to_string(),
        normalized_text,
        report,
        predictions: Vec::new(),
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────
