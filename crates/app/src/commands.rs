use anyhow::{Context, Result};
use labscan_core::LabscanConfig;
use labscan_ocr::pipeline::{process_text, PipelineOutput};
use labscan_ocr::{recognizer_from_config, ReportPipeline};
use std::path::{Path, PathBuf};

use crate::Opts;

const CONFIG_FILE_NAME: &str = "labscan.toml";

pub fn run(opts: &Opts) -> Result<()> {
    let config = load_config(opts.config.as_deref())?;
    let output_path = opts.output.clone().unwrap_or_else(|| config.output.path.clone());

    let output = extract(opts, &config)?;

    labscan_export::write_report_to_path(&output_path, &output.report)
        .with_context(|| format!("failed to write {}", output_path.display()))?;

    Ok(())
}

fn extract(opts: &Opts, config: &LabscanConfig) -> Result<PipelineOutput> {
    if let Some(text_path) = &opts.text {
        let text = std::fs::read_to_string(text_path)
            .with_context(|| format!("failed to read {}", text_path.display()))?;
        return Ok(process_text(&text)?);
    }

    let image = opts.image.as_deref().context("a report image is required")?;
    let recognizer = recognizer_from_config(&config.ocr)?;
    let pipeline = ReportPipeline::new(recognizer, config.preprocess.clone());
    pipeline
        .process_file(image)
        .with_context(|| format!("failed to process {}", image.display()))
}

/// An explicit `--config` must exist; the per-user default is optional.
fn load_config(explicit: Option<&Path>) -> Result<LabscanConfig> {
    if let Some(path) = explicit {
        return LabscanConfig::load(path).context("failed to load config");
    }

    match default_config_path() {
        Some(path) if path.exists() => {
            tracing::info!("Using config {}", path.display());
            LabscanConfig::load(&path).context("failed to load config")
        }
        _ => Ok(LabscanConfig::default()),
    }
}

fn default_config_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("com", "labscan", "labscan")
        .map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
}
