//! Patient record types.
//!
//! A [`PatientForm`] is what staff submit; [`NewPatient`] is the same data after
//! validation; a [`PatientRecord`] is what the session stores once the history has been
//! extracted and summarised.

use crate::constants::{GENDER_PLACEHOLDER, TIMESTAMP_FORMAT};
use crate::{PatientError, PatientResult};
use chrono::NaiveDateTime;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    pub const ALL: [Gender; 3] = [Gender::Male, Gender::Female, Gender::Other];

    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
            Gender::Other => "Other",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Gender {
    type Err = PatientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Gender::ALL
            .into_iter()
            .find(|g| g.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| PatientError::InvalidGender(trimmed.to_string()))
    }
}

/// An uploaded document as received from the client.
#[derive(Clone)]
pub struct Upload {
    pub filename: String,
    pub bytes: Vec<u8>,
}

impl fmt::Debug for Upload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Upload")
            .field("filename", &self.filename)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// The "Add New Patient Record" form exactly as submitted.
#[derive(Debug, Clone, Default)]
pub struct PatientForm {
    pub name: String,
    pub id: String,
    pub age: u32,
    /// One of `Male`, `Female`, `Other`, or the `Select` placeholder.
    pub gender: String,
    pub history: Option<Upload>,
}

/// Validated form data, ready for extraction and summarisation.
#[derive(Debug, Clone)]
pub struct NewPatient {
    pub name: String,
    pub id: String,
    pub age: u32,
    pub gender: Gender,
    pub history: Upload,
}

impl NewPatient {
    /// Validates a submitted form.
    ///
    /// Name, id and an uploaded file are required, and the gender must be chosen.
    ///
    /// # Errors
    ///
    /// Returns `PatientError::MissingRequiredFields` if any required field is blank, the
    /// upload is missing or empty, or the gender is still the placeholder, and
    /// `PatientError::InvalidGender` for an unrecognised gender.
    pub fn from_form(form: PatientForm) -> PatientResult<Self> {
        let name = form.name.trim();
        let id = form.id.trim();
        let gender = form.gender.trim();

        let history = match form.history {
            Some(upload) if !upload.bytes.is_empty() => upload,
            _ => return Err(PatientError::MissingRequiredFields),
        };

        if name.is_empty()
            || id.is_empty()
            || gender.is_empty()
            || gender.eq_ignore_ascii_case(GENDER_PLACEHOLDER)
        {
            return Err(PatientError::MissingRequiredFields);
        }

        Ok(Self {
            name: name.to_string(),
            id: id.to_string(),
            age: form.age,
            gender: gender.parse()?,
            history,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatientRecord {
    pub id: String,
    pub name: String,
    pub age: u32,
    pub gender: Gender,
    /// Full text extracted from the uploaded history.
    pub text: String,
    pub summary: String,
    pub prescription: Option<String>,
    pub timestamp: NaiveDateTime,
}

impl PatientRecord {
    pub fn new(
        patient: &NewPatient,
        text: String,
        summary: String,
        timestamp: NaiveDateTime,
    ) -> Self {
        Self {
            id: patient.id.clone(),
            name: patient.name.clone(),
            age: patient.age,
            gender: patient.gender,
            text,
            summary,
            prescription: None,
            timestamp,
        }
    }

    /// The timestamp as shown to staff, e.g. `2024-11-09 14:03:27`.
    pub fn last_updated(&self) -> String {
        self.timestamp.format(TIMESTAMP_FORMAT).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upload() -> Option<Upload> {
        Some(Upload {
            filename: "history.pdf".into(),
            bytes: b"%PDF-1.5".to_vec(),
        })
    }

    fn form() -> PatientForm {
        PatientForm {
            name: " Jane Doe ".into(),
            id: " P-001 ".into(),
            age: 42,
            gender: "Female".into(),
            history: upload(),
        }
    }

    #[test]
    fn test_gender_parse() {
        assert_eq!("Male".parse::<Gender>().unwrap(), Gender::Male);
        assert_eq!("female".parse::<Gender>().unwrap(), Gender::Female);
        assert_eq!(" OTHER ".parse::<Gender>().unwrap(), Gender::Other);
        assert!(matches!(
            "Unknown".parse::<Gender>(),
            Err(PatientError::InvalidGender(ref g)) if g == "Unknown"
        ));
        assert_eq!(Gender::Female.to_string(), "Female");
    }

    #[test]
    fn test_from_form_trims_fields() {
        let patient = NewPatient::from_form(form()).unwrap();

        assert_eq!(patient.name, "Jane Doe");
        assert_eq!(patient.id, "P-001");
        assert_eq!(patient.age, 42);
        assert_eq!(patient.gender, Gender::Female);
        assert_eq!(patient.history.filename, "history.pdf");
    }

    #[test]
    fn test_from_form_requires_name_and_id() {
        let mut f = form();
        f.name = "   ".into();
        assert!(matches!(
            NewPatient::from_form(f),
            Err(PatientError::MissingRequiredFields)
        ));

        let mut f = form();
        f.id = String::new();
        assert!(matches!(
            NewPatient::from_form(f),
            Err(PatientError::MissingRequiredFields)
        ));
    }

    #[test]
    fn test_from_form_requires_upload() {
        let mut f = form();
        f.history = None;
        assert!(matches!(
            NewPatient::from_form(f),
            Err(PatientError::MissingRequiredFields)
        ));

        let mut f = form();
        f.history = Some(Upload {
            filename: "empty.pdf".into(),
            bytes: Vec::new(),
        });
        assert!(matches!(
            NewPatient::from_form(f),
            Err(PatientError::MissingRequiredFields)
        ));
    }

    #[test]
    fn test_from_form_rejects_placeholder_gender() {
        let mut f = form();
        f.gender = "Select".into();
        assert!(matches!(
            NewPatient::from_form(f),
            Err(PatientError::MissingRequiredFields)
        ));
    }

    #[test]
    fn test_from_form_rejects_unknown_gender() {
        let mut f = form();
        f.gender = "Robot".into();
        assert!(matches!(
            NewPatient::from_form(f),
            Err(PatientError::InvalidGender(_))
        ));
    }

    #[test]
    fn test_zero_age_is_allowed() {
        let mut f = form();
        f.age = 0;
        assert_eq!(NewPatient::from_form(f).unwrap().age, 0);
    }

    #[test]
    fn test_record_last_updated_format() {
        let patient = NewPatient::from_form(form()).unwrap();
        let timestamp =
            NaiveDateTime::parse_from_str("2024-11-09 14:03:27", "%Y-%m-%d %H:%M:%S").unwrap();

        let record = PatientRecord::new(&patient, "text".into(), "summary".into(), timestamp);

        assert_eq!(record.last_updated(), "2024-11-09 14:03:27");
        assert_eq!(record.prescription, None);
    }

    #[test]
    fn test_upload_debug_hides_bytes() {
        let debug = format!("{:?}", upload().unwrap());
        assert!(debug.contains("history.pdf"));
        assert!(debug.contains("len: 8"));
        assert!(!debug.contains("PDF-1.5"));
    }
}
