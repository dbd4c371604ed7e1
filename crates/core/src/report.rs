use std::fmt;

use crate::value::LabValue;

/// Patient name recorded when the report carries no recognizable name.
pub const UNKNOWN_PATIENT: &str = "Unknown";

/// The lab parameters recognized on a complete blood count report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Parameter {
    Hemoglobin,
    Rbc,
    Pcv,
    Mcv,
    Mch,
    Mchc,
    Rdw,
    Wbc,
    Neutrophils,
    Lymphocytes,
    Eosinophils,
    Monocytes,
    Basophils,
    Platelets,
}

impl Parameter {
    /// Every parameter, in report table order.
    pub const ALL: [Parameter; 14] = [
        Parameter::Hemoglobin,
        Parameter::Rbc,
        Parameter::Pcv,
        Parameter::Mcv,
        Parameter::Mch,
        Parameter::Mchc,
        Parameter::Rdw,
        Parameter::Wbc,
        Parameter::Neutrophils,
        Parameter::Lymphocytes,
        Parameter::Eosinophils,
        Parameter::Monocytes,
        Parameter::Basophils,
        Parameter::Platelets,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Parameter::Hemoglobin => "Hemoglobin",
            Parameter::Rbc => "RBC",
            Parameter::Pcv => "PCV",
            Parameter::Mcv => "MCV",
            Parameter::Mch => "MCH",
            Parameter::Mchc => "MCHC",
            Parameter::Rdw => "RDW",
            Parameter::Wbc => "WBC",
            Parameter::Neutrophils => "Neutrophils",
            Parameter::Lymphocytes => "Lymphocytes",
            Parameter::Eosinophils => "Eosinophils",
            Parameter::Monocytes => "Monocytes",
            Parameter::Basophils => "Basophils",
            Parameter::Platelets => "Platelets",
        }
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for Parameter {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Parameter::ALL
            .into_iter()
            .find(|p| p.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("Unknown lab parameter: '{s}'"))
    }
}

/// Parameter readings in the order they were found. Holds at most one
/// value per parameter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedValues(Vec<(Parameter, LabValue)>);

impl ExtractedValues {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a reading. A second reading for the same parameter replaces the
    /// first in place and returns the old value.
    pub fn insert(&mut self, parameter: Parameter, value: LabValue) -> Option<LabValue> {
        match self.0.iter_mut().find(|(p, _)| *p == parameter) {
            Some((_, slot)) => Some(std::mem::replace(slot, value)),
            None => {
                self.0.push((parameter, value));
                None
            }
        }
    }

    pub fn get(&self, parameter: Parameter) -> Option<LabValue> {
        self.0.iter().find(|(p, _)| *p == parameter).map(|(_, v)| *v)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Parameter, LabValue)> + '_ {
        self.0.iter().copied()
    }
}

impl FromIterator<(Parameter, LabValue)> for ExtractedValues {
    fn from_iter<I: IntoIterator<Item = (Parameter, LabValue)>>(iter: I) -> Self {
        let mut values = ExtractedValues::new();
        for (p, v) in iter {
            values.insert(p, v);
        }
        values
    }
}

/// The structured output of one report: who it belongs to and what was read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportResult {
    pub patient_name: String,
    pub values: ExtractedValues,
}

impl ReportResult {
    /// Build a result, falling back to [`UNKNOWN_PATIENT`] when no name was found.
    pub fn new(patient_name: Option<String>, values: ExtractedValues) -> Self {
        let patient_name = patient_name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| UNKNOWN_PATIENT.to_string());
        Self { patient_name, values }
    }
}
