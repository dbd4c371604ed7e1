//! Optional structured (layout-aware) token classification.
//!
//! The regex extractor is the source of truth for report values. A
//! [`StructuredExtractor`] runs alongside it and produces per-token label
//! predictions; nothing merges those predictions into the report.

use image::DynamicImage;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum InferenceError {
    #[error("Model returned {rows} logit rows for {tokens} tokens")]
    ShapeMismatch { rows: usize, tokens: usize },
    #[error("Model returned no logits for token {0}")]
    EmptyLogits(usize),
    #[error("Model error: {0}")]
    Model(String),
}

/// The label index a model assigned to one token of the OCR text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenPrediction {
    pub token: String,
    pub label: usize,
}

/// Produces per-token label predictions from the report image and its OCR text.
pub trait StructuredExtractor {
    fn predict(&self, image: &DynamicImage, text: &str)
        -> Result<Vec<TokenPrediction>, InferenceError>;
}

/// Default extractor: predicts nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopExtractor;

impl StructuredExtractor for NoopExtractor {
    fn predict(&self, _image: &DynamicImage, _text: &str) -> Result<Vec<TokenPrediction>, InferenceError> {
        Ok(Vec::new())
    }
}

/// A pretrained token-classification model together with its processor:
/// image + tokens in, one row of logits per token out.
pub trait TokenClassifier {
    fn logits(&self, image: &DynamicImage, tokens: &[&str]) -> Result<Vec<Vec<f32>>, InferenceError>;
}

/// Runs a [`TokenClassifier`] over whitespace-separated tokens and keeps the
/// highest-scoring label for each.
pub struct ClassifierExtractor<C: TokenClassifier> {
    classifier: C,
}

impl<C: TokenClassifier> ClassifierExtractor<C> {
    pub fn new(classifier: C) -> Self {
        Self { classifier }
    }
}

impl<C: TokenClassifier> StructuredExtractor for ClassifierExtractor<C> {
    fn predict(&self, image: &DynamicImage, text: &str) -> Result<Vec<TokenPrediction>, InferenceError> {
        let tokens: Vec<&str> = text.split_whitespace().collect();
        if tokens.is_empty() {
            return Ok(Vec::new());
        }

        let logits = self.classifier.logits(image, &tokens)?;
        if logits.len() != tokens.len() {
            return Err(InferenceError::ShapeMismatch { rows: logits.len(), tokens: tokens.len() });
        }

        tokens
            .iter()
            .zip(&logits)
            .enumerate()
            .map(|(i, (token, row))| {
                let label = argmax(row).ok_or(InferenceError::EmptyLogits(i))?;
                Ok(TokenPrediction { token: token.to_string(), label })
            })
            .collect()
    }
}

/// Index of the largest score. Ties go to the lowest index; NaN never wins.
pub fn argmax(scores: &[f32]) -> Option<usize> {
    scores
        .iter()
        .enumerate()
        .filter(|(_, s)| !s.is_nan())
        .fold(None, |best: Option<(usize, f32)>, (i, &s)| match best {
            Some((_, b)) if b >= s => best,
            _ => Some((i, s)),
        })
        .map(|(i, _)| i)
}
