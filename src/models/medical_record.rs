use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A medical visit record. Always owned by exactly one patient;
/// removed with it when the patient is deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MedicalRecord {
    pub id: i64,
    pub patient_id: i64,
    pub record_date: NaiveDate,
    pub reason: Option<String>,
    pub diagnosis: Option<String>,
    pub treatment: Option<String>,
    pub notes: Option<String>,
}

/// Mutable fields of a medical record. `patient_id` is not here —
/// a record never moves between patients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MedicalRecordFields {
    pub record_date: NaiveDate,
    pub reason: Option<String>,
    pub diagnosis: Option<String>,
    pub treatment: Option<String>,
    pub notes: Option<String>,
}

impl MedicalRecord {
    pub fn from_fields(id: i64, patient_id: i64, fields: MedicalRecordFields) -> Self {
        Self {
            id,
            patient_id,
            record_date: fields.record_date,
            reason: fields.reason,
            diagnosis: fields.diagnosis,
            treatment: fields.treatment,
            notes: fields.notes,
        }
    }
}

/// A record joined with its owning patient's name, as the edit view
/// loads it.
#[derive(Debug, Clone, Serialize)]
pub struct MedicalRecordWithPatient {
    #[serde(flatten)]
    pub record: MedicalRecord,
    pub patient_name: String,
}
