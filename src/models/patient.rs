use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::enums::Gender;

/// A patient row as stored. The id is assigned by SQLite on insert
/// and never changes afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Patient {
    pub id: i64,
    pub name: String,
    pub dob: Option<NaiveDate>,
    pub gender: Option<Gender>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
}

/// The mutable fields of a patient — what a create or full-replace
/// update carries. Validated by `validate::check_patient` before any
/// repository call sees it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PatientFields {
    pub name: String,
    pub dob: Option<NaiveDate>,
    pub gender: Option<Gender>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
}

impl Patient {
    pub fn from_fields(id: i64, fields: PatientFields) -> Self {
        Self {
            id,
            name: fields.name,
            dob: fields.dob,
            gender: fields.gender,
            address: fields.address,
            phone: fields.phone,
            email: fields.email,
        }
    }
}

/// One page of a patient listing plus the pagination math the
/// list view needs.
#[derive(Debug, Clone, Serialize)]
pub struct PatientPage {
    pub patients: Vec<Patient>,
    pub page: u32,
    pub page_size: u32,
    pub total_count: u32,
    pub total_pages: u32,
}
