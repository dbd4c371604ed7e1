use labscan_core::{ExtractedValues, LabValue, Parameter, ReportResult, UNKNOWN_PATIENT};
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

/// Header row of every report CSV. One data row per extracted parameter
/// follows, each repeating the patient name.
pub const CSV_HEADER: [&str; 3] = ["Patient Name", "Parameter", "Value"];

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Unexpected header: {0}")]
    BadHeader(String),
    #[error("Unknown parameter: {0}")]
    UnknownParameter(String),
    #[error("Invalid value: {0}")]
    InvalidValue(String),
    #[error("Duplicate parameter row: {0}")]
    DuplicateParameter(Parameter),
    #[error("Rows belong to different patients: '{0}' and '{1}'")]
    MixedPatients(String, String),
}

pub fn write_report<W: Write>(writer: W, report: &ReportResult) -> Result<(), ExportError> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(CSV_HEADER)?;
    for (parameter, value) in report.values.iter() {
        wtr.write_record([
            report.patient_name.as_str(),
            parameter.name(),
            value.to_string().as_str(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

/// Write the report to `path`, replacing any existing file. A failure part
/// way through leaves whatever was written.
pub fn write_report_to_path(path: &Path, report: &ReportResult) -> Result<(), ExportError> {
    let file = File::create(path)?;
    write_report(file, report)?;
    tracing::info!(rows = report.values.len(), "Report written to {}", path.display());
    Ok(())
}

/// Read back a report CSV written by [`write_report`].
pub fn read_report<R: Read>(data: R) -> Result<ReportResult, ExportError> {
    let mut reader = csv::ReaderBuilder::new().has_headers(true).from_reader(data);

    let headers = reader.headers()?;
    if headers.iter().ne(CSV_HEADER) {
        return Err(ExportError::BadHeader(headers.iter().collect::<Vec<_>>().join(",")));
    }

    let mut patient: Option<String> = None;
    let mut values = ExtractedValues::new();

    for result in reader.records() {
        let record = result?;
        let name = record.get(0).unwrap_or_default();
        let parameter_field = record.get(1).unwrap_or_default();
        let value_field = record.get(2).unwrap_or_default();

        match &patient {
            Some(p) if p != name => {
                return Err(ExportError::MixedPatients(p.clone(), name.to_string()));
            }
            Some(_) => {}
            None => patient = Some(name.to_string()),
        }

        let parameter = Parameter::from_str(parameter_field)
            .map_err(|_| ExportError::UnknownParameter(parameter_field.to_string()))?;
        let value = LabValue::parse(value_field)
            .map_err(|_| ExportError::InvalidValue(value_field.to_string()))?;
        if values.insert(parameter, value).is_some() {
            return Err(ExportError::DuplicateParameter(parameter));
        }
    }

    Ok(ReportResult {
        patient_name: patient.unwrap_or_else(|| UNKNOWN_PATIENT.to_string()),
        values,
    })
}
