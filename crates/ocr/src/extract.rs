use std::sync::OnceLock;

use labscan_core::{ExtractedValues, LabValue, Parameter};
use regex::Regex;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Unparseable value for {parameter}: '{raw}'")]
    InvalidValue { parameter: Parameter, raw: String },
}

/// How one parameter is written on a report: label variants and the unit
/// suffixes that may follow the number. Both are regex fragments.
#[derive(Debug, Clone, Copy)]
pub struct ParameterPattern {
    pub parameter: Parameter,
    pub labels: &'static [&'static str],
    pub units: &'static [&'static str],
}

const PERCENT: &[&str] = &["%"];
const PER_CMM: &[&str] = &[
    r"cells/cu\.?\s?mm",
    r"/cu\.?\s?mm",
    r"/cmm",
    r"/µL",
    r"/uL",
    r"x\s?10\^?3/µL",
    r"x\s?10\^?3/uL",
];

/// One entry per recognized parameter, in report order. Longer labels come
/// first within an alternation so "RBC Count" wins over "RBC".
pub const PARAMETER_TABLE: &[ParameterPattern] = &[
    ParameterPattern {
        parameter: Parameter::Hemoglobin,
        labels: &["Haemoglobin", "Hemoglobin", "Hb"],
        units: &[r"g/dL", r"gm/dL", r"gms?%", r"g%"],
    },
    ParameterPattern {
        parameter: Parameter::Rbc,
        labels: &[r"Total\s+RBC\s+Count", r"RBC\s+Count", "RBC"],
        units: &[
            r"mill(?:ion)?s?/cu\.?\s?mm",
            r"mill(?:ion)?s?/cmm",
            r"mill(?:ion)?s?/µL",
            r"x\s?10\^?6/µL",
            r"x\s?10\^?6/uL",
        ],
    },
    ParameterPattern {
        parameter: Parameter::Pcv,
        labels: &[r"Packed\s+Cell\s+Volume", "Haematocrit", "Hematocrit", "PCV", "HCT"],
        units: PERCENT,
    },
    ParameterPattern {
        parameter: Parameter::Mcv,
        labels: &["MCV"],
        units: &["fL", r"cu\s?microns?"],
    },
    ParameterPattern {
        parameter: Parameter::Mch,
        labels: &["MCH"],
        units: &["pg"],
    },
    ParameterPattern {
        parameter: Parameter::Mchc,
        labels: &["MCHC"],
        units: &[r"g/dL", r"gm/dL", "%"],
    },
    ParameterPattern {
        parameter: Parameter::Rdw,
        labels: &[r"RDW[\s\-]?CV", "RDW"],
        units: PERCENT,
    },
    ParameterPattern {
        parameter: Parameter::Wbc,
        labels: &[
            r"Total\s+WBC\s+Count",
            r"WBC\s+Count",
            r"Total\s+Leu[ck]ocyte\s+Count",
            "TLC",
            "WBC",
        ],
        units: PER_CMM,
    },
    ParameterPattern {
        parameter: Parameter::Neutrophils,
        labels: &["Neutrophils?"],
        units: PERCENT,
    },
    ParameterPattern {
        parameter: Parameter::Lymphocytes,
        labels: &["Lymphocytes?"],
        units: PERCENT,
    },
    ParameterPattern {
        parameter: Parameter::Eosinophils,
        labels: &["Eosinophils?"],
        units: PERCENT,
    },
    ParameterPattern {
        parameter: Parameter::Monocytes,
        labels: &["Monocytes?"],
        units: PERCENT,
    },
    ParameterPattern {
        parameter: Parameter::Basophils,
        labels: &["Basophils?"],
        units: PERCENT,
    },
    ParameterPattern {
        parameter: Parameter::Platelets,
        labels: &[r"Platelet\s+Count", "Platelets?"],
        units: PER_CMM,
    },
];

impl ParameterPattern {
    /// `<label>[:\s]*(<number>)\s*<unit>?`, case-insensitive except for the
    /// number, where only a leading digit may be followed by the
    /// confusable letters `O`, `I` and `l`. Commas are only accepted as
    /// digit grouping (`7,500`, `2,50,000`), ending in a group of three.
    pub fn pattern(&self) -> String {
        format!(
            r"(?i)\b(?:{})[:\s]*(?-i:(?P<value>(?:\d[\dOIl]{{0,2}}(?:,[\dOIl]{{2}})*,[\dOIl]{{3}}|\d[\dOIl]*)(?:\.[\dOIl]+)?))\s*(?P<unit>{})?",
            self.labels.join("|"),
            self.units.join("|"),
        )
    }
}

// ── Compiled regex cache ─────────────────────────────────────────────────────

fn compiled_table() -> &'static [(Parameter, Regex)] {
    static TABLE: OnceLock<Vec<(Parameter, Regex)>> = OnceLock::new();
    TABLE.get_or_init(|| {
        PARAMETER_TABLE
            .iter()
            .map(|p| (p.parameter, Regex::new(&p.pattern()).expect("invalid regex")))
            .collect()
    })
}

// ── Public extraction API ─────────────────────────────────────────────────────

pub struct Extractor;

impl Extractor {
    /// Pull every recognizable lab value out of OCR text. Parameters that do
    /// not appear are left out; a matched value that still is not a number
    /// after confusion fixes is an error.
    pub fn extract(text: &str) -> Result<ExtractedValues, ExtractError> {
        let mut values = ExtractedValues::new();
        for (parameter, re) in compiled_table() {
            let Some(c) = re.captures(text) else {
                continue;
            };
            let Some(raw) = c.name("value") else {
                continue;
            };
            let raw = raw.as_str();
            let fixed = fix_confusions(raw);
            let value = LabValue::parse(&fixed).map_err(|_| ExtractError::InvalidValue {
                parameter: *parameter,
                raw: raw.to_string(),
            })?;
            tracing::debug!(
                %parameter,
                raw,
                %value,
                unit = c.name("unit").map(|u| u.as_str()).unwrap_or(""),
                "matched lab value"
            );
            values.insert(*parameter, value);
        }
        Ok(values)
    }
}

/// Strip thousands separators and undo common OCR letter/digit swaps.
pub fn fix_confusions(raw: &str) -> String {
    raw.chars()
        .filter(|&c| c != ',')
        .map(|c| match c {
            'O' => '0',
            'l' | 'I' => '1',
            other => other,
        })
        .collect()
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn value_of(text: &str, p: Parameter) -> Option<LabValue> {
        Extractor::extract(text).unwrap().get(p)
    }

    #[test]
    fn table_covers_every_parameter_once() {
        assert_eq!(PARAMETER_TABLE.len(), Parameter::ALL.len());
        for (entry, p) in PARAMETER_TABLE.iter().zip(Parameter::ALL) {
            assert_eq!(entry.parameter, p);
        }
        assert_eq!(compiled_table().len(), Parameter::ALL.len());
    }

    #[test]
    fn hemoglobin_decimal() {
        let v = value_of("Hemoglobin: 13.5 g/dL", Parameter::Hemoglobin).unwrap();
        assert!(v.is_decimal());
        assert_eq!(v.to_string(), "13.5");
    }

    #[test]
    fn wbc_thousands_separator_is_integer() {
        let v = value_of("WBC: 7,500/cmm", Parameter::Wbc).unwrap();
        assert_eq!(v, LabValue::Integer(7500));
    }

    #[test]
    fn platelets_letter_o_becomes_zero() {
        let v = value_of("Platelets: 25O,OOO", Parameter::Platelets).unwrap();
        assert_eq!(v, LabValue::Integer(250000));
    }

    #[test]
    fn letter_l_becomes_one() {
        let v = value_of("Lymphocytes: 3l %", Parameter::Lymphocytes).unwrap();
        assert_eq!(v, LabValue::Integer(31));
    }

    #[test]
    fn label_is_case_insensitive() {
        let v = value_of("HEMOGLOBIN 12.1", Parameter::Hemoglobin).unwrap();
        assert_eq!(v.to_string(), "12.1");
        let v = value_of("platelet count 310000 /cumm", Parameter::Platelets).unwrap();
        assert_eq!(v, LabValue::Integer(310000));
    }

    #[test]
    fn no_separator_between_label_and_value() {
        let v = value_of("MCV88", Parameter::Mcv).unwrap();
        assert_eq!(v, LabValue::Integer(88));
    }

    #[test]
    fn mchc_does_not_leak_into_mch() {
        let values = Extractor::extract("MCHC: 33").unwrap();
        assert_eq!(values.get(Parameter::Mchc), Some(LabValue::Integer(33)));
        assert_eq!(values.get(Parameter::Mch), None);
    }

    #[test]
    fn first_match_wins() {
        let v = value_of("WBC: 6000\nWBC: 9000", Parameter::Wbc).unwrap();
        assert_eq!(v, LabValue::Integer(6000));
    }

    #[test]
    fn empty_or_unlabelled_text_yields_nothing() {
        assert!(Extractor::extract("").unwrap().is_empty());
        assert!(Extractor::extract("City Diagnostics\nThank you for visiting").unwrap().is_empty());
    }

    #[test]
    fn full_report() {
        let text = "\
Patient Name: John Smith
Haemoglobin 14.2 g/dL
Total RBC Count 4.8 mill/cumm
PCV 42.5 %
MCV 88.5 fL
MCH 29.6 pg
MCHC 33.4 g/dL
RDW-CV 13.1 %
Total WBC Count 8,200 /cumm
Neutrophils 62 %
Lymphocytes 30 %
Eosinophils 4 %
Monocytes 3 %
Basophils 1 %
Platelet Count 2,50,000 /cumm";
        let values = Extractor::extract(text).unwrap();
        assert_eq!(values.len(), 14);
        let order: Vec<Parameter> = values.iter().map(|(p, _)| p).collect();
        assert_eq!(order, Parameter::ALL.to_vec());
        assert_eq!(values.get(Parameter::Rbc).unwrap().to_string(), "4.8");
        assert_eq!(values.get(Parameter::Mch).unwrap().to_string(), "29.6");
        assert_eq!(values.get(Parameter::Rdw).unwrap().to_string(), "13.1");
        assert_eq!(values.get(Parameter::Wbc), Some(LabValue::Integer(8200)));
        assert_eq!(values.get(Parameter::Basophils), Some(LabValue::Integer(1)));
        assert_eq!(values.get(Parameter::Platelets), Some(LabValue::Integer(250000)));
    }

    #[test]
    fn comma_does_not_join_adjacent_numbers() {
        assert_eq!(value_of("WBC 7500,13.5", Parameter::Wbc), Some(LabValue::Integer(7500)));
        assert_eq!(value_of("WBC 7500,135", Parameter::Wbc), Some(LabValue::Integer(7500)));
        assert_eq!(value_of("Hemoglobin 13.5, 14.0", Parameter::Hemoglobin).unwrap().to_string(), "13.5");
    }

    #[test]
    fn grouped_digits_with_decimal_part() {
        let v = value_of("Platelets 1,234.5", Parameter::Platelets).unwrap();
        assert_eq!(v.to_string(), "1234.5");
        let v = value_of("Platelet Count 2,50,000 /cumm", Parameter::Platelets).unwrap();
        assert_eq!(v, LabValue::Integer(250000));
    }

    #[test]
    fn overflow_is_an_error() {
        let err = Extractor::extract("WBC: 99999999999999999999999").unwrap_err();
        assert!(matches!(err, ExtractError::InvalidValue { parameter: Parameter::Wbc, .. }));
    }

    #[test]
    fn fix_confusions_table() {
        assert_eq!(fix_confusions("25O,OOO"), "250000");
        assert_eq!(fix_confusions("1l.I"), "111.1");
        assert_eq!(fix_confusions("13.5"), "13.5");
    }

    #[test]
    fn no_panic_on_garbage_input() {
        let _ = Extractor::extract("!@#$%^&*()\n\0\x01\x02 WBC: ,,,");
    }
}
