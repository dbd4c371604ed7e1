pub mod extract;
pub mod inference;
pub mod normalize;
pub mod pipeline;
pub mod preprocess;
pub mod recognizer;

pub use extract::{fix_confusions, ExtractError, Extractor, ParameterPattern, PARAMETER_TABLE};
pub use inference::{
    argmax, ClassifierExtractor, InferenceError, NoopExtractor, StructuredExtractor,
    TokenClassifier, TokenPrediction,
};
pub use normalize::{
    extract_patient_name, normalize_fields, CANONICAL_PATIENT_LABEL, PATIENT_NAME_SYNONYMS,
};
pub use pipeline::{process_text, PipelineError, PipelineOutput, ReportPipeline};
pub use preprocess::{otsu_threshold, prepare_for_ocr, PreparedImage, PreprocessError};
pub use recognizer::{
    recognizer_from_config, MockRecognizer, OcrBackend, OcrError, TesseractCliRecognizer,
};
