pub mod config;
pub mod report;
pub mod value;

pub use config::{ConfigError, LabscanConfig, OcrConfig, OcrEngine, OutputConfig, PreprocessConfig};
pub use report::{ExtractedValues, Parameter, ReportResult, UNKNOWN_PATIENT};
pub use value::{LabValue, ValueError};
