use regex::Regex;
use std::sync::OnceLock;

/// The label every patient-name variant is rewritten to.
pub const CANONICAL_PATIENT_LABEL: &str = "Patient Name";

/// Label variants seen on report templates, applied in this order.
/// None of them occurs inside the canonical label, which keeps
/// normalization idempotent.
pub const PATIENT_NAME_SYNONYMS: &[&str] = &[
    "Patient's Name",
    "Patients Name",
    "Name of Patient",
    "Name Of Patient",
    "Pt. Name",
    "Pt Name",
    "Patient Nm",
];

/// Rewrite every known patient-name label variant to [`CANONICAL_PATIENT_LABEL`].
///
/// Each synonym is checked against the text as rewritten so far, so several
/// variants in one report are all normalized.
pub fn normalize_fields(text: &str) -> String {
    let mut out = text.to_string();
    for synonym in PATIENT_NAME_SYNONYMS {
        if out.contains(synonym) {
            tracing::debug!(synonym, "normalizing patient name label");
            out = out.replace(synonym, CANONICAL_PATIENT_LABEL);
        }
    }
    out
}

fn re_patient_name() -> &'static Regex {
    static R: OnceLock<Regex> = OnceLock::new();
    R.get_or_init(|| {
        Regex::new(r"Patient Name[ \t]*[:\-]?[ \t]*([\p{L}.']+(?: [\p{L}.']+)*)")
            .expect("invalid regex")
    })
}

/// Read the name that follows the canonical label on normalized text.
///
/// Words are taken up to the first run of two spaces or any other separator,
/// which is where the next column of the report usually starts. A last word
/// followed by `:` is the next column's label and is dropped.
pub fn extract_patient_name(normalized: &str) -> Option<String> {
    let c = re_patient_name().captures(normalized)?;
    let m = c.get(1)?;
    let mut name = m.as_str().trim();
    if normalized[m.end()..].trim_start_matches([' ', '\t']).starts_with(':') {
        name = name.rsplit_once(' ').map_or("", |(head, _)| head).trim_end();
    }
    if name.chars().any(|ch| ch.is_alphabetic()) {
        Some(name.to_string())
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_synonym_becomes_canonical() {
        for synonym in PATIENT_NAME_SYNONYMS {
            assert_eq!(normalize_fields(synonym), CANONICAL_PATIENT_LABEL, "synonym {synonym}");
        }
    }

    #[test]
    fn normalization_is_idempotent() {
        let samples = [
            "Pt. Name: John Smith\nHemoglobin: 13.5",
            "Name of Patient - A B\nPatient's Name: C D",
            "Patient Name: already canonical",
            "no label here",
        ];
        for s in samples {
            let once = normalize_fields(s);
            assert_eq!(normalize_fields(&once), once);
        }
        for synonym in PATIENT_NAME_SYNONYMS {
            let once = normalize_fields(synonym);
            assert_eq!(normalize_fields(&once), once);
        }
    }

    #[test]
    fn multiple_synonyms_all_fire() {
        let text = "Pt Name: A\nName of Patient: B";
        assert_eq!(normalize_fields(text), "Patient Name: A\nPatient Name: B");
    }

    #[test]
    fn other_text_untouched() {
        let text = "Hemoglobin: 13.5 g/dL\nRemarks: none";
        assert_eq!(normalize_fields(text), text);
    }

    #[test]
    fn canonical_label_contains_no_synonym() {
        for synonym in PATIENT_NAME_SYNONYMS {
            assert!(!CANONICAL_PATIENT_LABEL.contains(synonym));
            assert!(!synonym.contains(CANONICAL_PATIENT_LABEL));
        }
    }

    #[test]
    fn patient_name_after_colon() {
        let text = normalize_fields("City Lab\nPt. Name: Mr. John Smith\nAge: 45");
        assert_eq!(extract_patient_name(&text).as_deref(), Some("Mr. John Smith"));
    }

    #[test]
    fn patient_name_stops_at_column_gap() {
        let text = "Patient Name : Jane O'Neil    Sex: F";
        assert_eq!(extract_patient_name(text).as_deref(), Some("Jane O'Neil"));
    }

    #[test]
    fn patient_name_keeps_accented_letters() {
        let text = "Patient Name: José Núñez\nAge: 52";
        assert_eq!(extract_patient_name(text).as_deref(), Some("José Núñez"));
    }

    #[test]
    fn patient_name_drops_next_column_label() {
        assert_eq!(
            extract_patient_name("Patient Name: John Smith Age: 45").as_deref(),
            Some("John Smith")
        );
        assert_eq!(
            extract_patient_name("Patient Name: John Smith Age: 45 Sex: M").as_deref(),
            Some("John Smith")
        );
        assert_eq!(
            extract_patient_name("Patient Name: Ann Lee Sex : F").as_deref(),
            Some("Ann Lee")
        );
    }

    #[test]
    fn patient_name_that_is_only_a_label_is_missing() {
        assert_eq!(extract_patient_name("Patient Name: Age: 45"), None);
    }

    #[test]
    fn patient_name_missing() {
        assert_eq!(extract_patient_name("Hemoglobin: 13.5"), None);
        assert_eq!(extract_patient_name("Patient Name: 12345"), None);
    }
}
