//! Server-side validation of the patient and medical-record forms.
//!
//! Raw form input (everything is a string on the wire) is checked and
//! converted into the typed field structs the repository layer takes.
//! All problems are collected so the caller can show every message at
//! once instead of failing on the first.

use std::str::FromStr;
use std::sync::LazyLock;

use chrono::{Local, NaiveDate};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::models::{Gender, MedicalRecordFields, PatientFields};

pub const NAME_MIN: usize = 2;
pub const NAME_MAX: usize = 100;
pub const ADDRESS_MAX: usize = 200;
pub const VISIT_TEXT_MAX: usize = 500;
pub const NOTES_MAX: usize = 1000;

// 7-15 digits, optional leading "+"
static PHONE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\+?[0-9]{7,15}$").unwrap());
// Syntactic check only; deliverability is not our problem
static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap());

/// One failed field with a user-facing message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Raw patient form as submitted. Empty strings count as absent.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PatientForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub dob: String,
    #[serde(default)]
    pub gender: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub email: String,
}

/// Raw medical-record form as submitted.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MedicalRecordForm {
    #[serde(default)]
    pub record_date: String,
    #[serde(default)]
    pub reason: String,
    #[serde(default)]
    pub diagnosis: String,
    #[serde(default)]
    pub treatment: String,
    #[serde(default)]
    pub notes: String,
}

pub fn check_patient(form: &PatientForm) -> Result<PatientFields, Vec<FieldError>> {
    let mut errors = Vec::new();

    let name = form.name.trim().to_string();
    let len = name.chars().count();
    if !(NAME_MIN..=NAME_MAX).contains(&len) {
        errors.push(FieldError::new(
            "name",
            format!("name must be between {NAME_MIN} and {NAME_MAX} characters"),
        ));
    }

    let dob = parse_optional_date("dob", &form.dob, &mut errors);
    if let Some(d) = dob {
        if d > today() {
            errors.push(FieldError::new("dob", "date of birth cannot be in the future"));
        }
    }

    let gender = match form.gender.trim() {
        "" => None,
        raw => match Gender::from_str(raw) {
            Ok(g) => Some(g),
            Err(_) => {
                errors.push(FieldError::new("gender", format!("unknown gender: {raw}")));
                None
            }
        },
    };

    let address = optional_bounded("address", &form.address, ADDRESS_MAX, &mut errors);

    let phone = match form.phone.trim() {
        "" => None,
        raw if PHONE_RE.is_match(raw) => Some(raw.to_string()),
        _ => {
            errors.push(FieldError::new(
                "phone",
                "phone must be 7-15 digits, optionally starting with \"+\"",
            ));
            None
        }
    };

    let email = match form.email.trim() {
        "" => None,
        raw if EMAIL_RE.is_match(raw) => Some(raw.to_string()),
        _ => {
            errors.push(FieldError::new("email", "invalid email format"));
            None
        }
    };

    if !errors.is_empty() {
        return Err(errors);
    }

    Ok(PatientFields {
        name,
        dob,
        gender,
        address,
        phone,
        email,
    })
}

pub fn check_medical_record(
    form: &MedicalRecordForm,
) -> Result<MedicalRecordFields, Vec<FieldError>> {
    let mut errors = Vec::new();

    let record_date = if form.record_date.trim().is_empty() {
        errors.push(FieldError::new("record_date", "record date is required"));
        None
    } else {
        let parsed = parse_optional_date("record_date", &form.record_date, &mut errors);
        if let Some(d) = parsed {
            if d > today() {
                errors.push(FieldError::new(
                    "record_date",
                    "record date cannot be in the future",
                ));
            }
        }
        parsed
    };

    let reason = optional_bounded("reason", &form.reason, VISIT_TEXT_MAX, &mut errors);
    let diagnosis = optional_bounded("diagnosis", &form.diagnosis, VISIT_TEXT_MAX, &mut errors);
    let treatment = optional_bounded("treatment", &form.treatment, VISIT_TEXT_MAX, &mut errors);
    let notes = optional_bounded("notes", &form.notes, NOTES_MAX, &mut errors);

    match record_date {
        Some(record_date) if errors.is_empty() => Ok(MedicalRecordFields {
            record_date,
            reason,
            diagnosis,
            treatment,
            notes,
        }),
        _ => Err(errors),
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn parse_optional_date(
    field: &'static str,
    raw: &str,
    errors: &mut Vec<FieldError>,
) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        Ok(d) => Some(d),
        Err(_) => {
            errors.push(FieldError::new(field, "expected a date like 2024-03-09"));
            None
        }
    }
}

fn optional_bounded(
    field: &'static str,
    raw: &str,
    max: usize,
    errors: &mut Vec<FieldError>,
) -> Option<String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if raw.chars().count() > max {
        errors.push(FieldError::new(
            field,
            format!("{field} cannot exceed {max} characters"),
        ));
    }
    Some(raw.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn valid_patient() -> PatientForm {
        PatientForm {
            name: "Ana Maria".into(),
            dob: "1988-04-02".into(),
            gender: "female".into(),
            address: "Calle 12 #34".into(),
            phone: "+14155550123".into(),
            email: "ana@example.com".into(),
        }
    }

    #[test]
    fn valid_patient_form_converts() {
        let fields = check_patient(&valid_patient()).unwrap();
        assert_eq!(fields.name, "Ana Maria");
        assert_eq!(fields.gender, Some(Gender::Female));
        assert_eq!(fields.phone.as_deref(), Some("+14155550123"));
    }

    #[test]
    fn name_is_required() {
        let form = PatientForm {
            name: "  ".into(),
            ..Default::default()
        };
        let errors = check_patient(&form).unwrap_err();
        assert!(errors.iter().any(|e| e.field == "name"));
    }

    #[test]
    fn single_char_name_rejected() {
        let form = PatientForm {
            name: "A".into(),
            ..Default::default()
        };
        assert!(check_patient(&form).is_err());
    }

    #[test]
    fn phone_validation_matches_the_contract() {
        for (phone, ok) in [("+14155550123", true), ("abc", false), ("", true)] {
            let form = PatientForm {
                name: "Ana".into(),
                phone: phone.into(),
                ..Default::default()
            };
            assert_eq!(check_patient(&form).is_ok(), ok, "phone {phone:?}");
        }
    }

    #[test]
    fn too_few_digits_rejected() {
        let form = PatientForm {
            name: "Ana".into(),
            phone: "123456".into(),
            ..Default::default()
        };
        assert!(check_patient(&form).is_err());
    }

    #[test]
    fn future_dob_rejected() {
        let tomorrow = (today() + Duration::days(1)).to_string();
        let form = PatientForm {
            name: "Ana".into(),
            dob: tomorrow,
            ..Default::default()
        };
        let errors = check_patient(&form).unwrap_err();
        assert!(errors.iter().any(|e| e.field == "dob"));
    }

    #[test]
    fn bad_email_rejected_empty_allowed() {
        let form = PatientForm {
            name: "Ana".into(),
            email: "not-an-email".into(),
            ..Default::default()
        };
        assert!(check_patient(&form).is_err());

        let form = PatientForm {
            name: "Ana".into(),
            ..Default::default()
        };
        assert!(check_patient(&form).is_ok());
    }

    #[test]
    fn all_errors_are_collected() {
        let form = PatientForm {
            name: "".into(),
            phone: "abc".into(),
            email: "nope".into(),
            ..Default::default()
        };
        let errors = check_patient(&form).unwrap_err();
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn record_date_today_passes_future_fails() {
        let form = MedicalRecordForm {
            record_date: today().to_string(),
            ..Default::default()
        };
        assert!(check_medical_record(&form).is_ok());

        let form = MedicalRecordForm {
            record_date: (today() + Duration::days(1)).to_string(),
            ..Default::default()
        };
        assert!(check_medical_record(&form).is_err());
    }

    #[test]
    fn record_date_is_required() {
        let errors = check_medical_record(&MedicalRecordForm::default()).unwrap_err();
        assert!(errors.iter().any(|e| e.field == "record_date"));
    }

    #[test]
    fn notes_bound_is_larger_than_visit_text_bound() {
        let form = MedicalRecordForm {
            record_date: "2024-01-01".into(),
            reason: "x".repeat(501),
            notes: "y".repeat(501),
            ..Default::default()
        };
        // reason over 500 fails, notes under 1000 passes
        let errors = check_medical_record(&form).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "reason");
    }
}
