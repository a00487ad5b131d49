//! Medical-record CRUD endpoints, always scoped to a parent patient.
//!
//! `GET,POST /add_medical_record/:patient_id`
//! `GET,POST /edit_medical_record/:id`
//! `POST /delete_medical_record/:id`

use axum::extract::{Path, State};
use axum::response::{IntoResponse, Redirect, Response};
use axum::{Form, Json};
use serde::Serialize;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::db::repository;
use crate::models::MedicalRecordWithPatient;
use crate::validate::{self, MedicalRecordForm};

#[derive(Serialize)]
pub struct AddRecordView {
    pub patient_id: i64,
    pub patient_name: String,
}

/// `GET /add_medical_record/:patient_id` — who the record is for.
pub async fn add_form(
    State(ctx): State<ApiContext>,
    Path(patient_id): Path<i64>,
) -> Result<Json<AddRecordView>, ApiError> {
    let conn = ctx.open_db()?;
    let patient = repository::get_patient(&conn, patient_id)?
        .ok_or_else(|| ApiError::NotFound("Patient not found".into()))?;

    Ok(Json(AddRecordView {
        patient_id: patient.id,
        patient_name: patient.name,
    }))
}

/// `POST /add_medical_record/:patient_id` — the patient must exist
/// before anything is validated or written.
pub async fn add(
    State(ctx): State<ApiContext>,
    Path(patient_id): Path<i64>,
    Form(form): Form<MedicalRecordForm>,
) -> Result<Response, ApiError> {
    let conn = ctx.open_db()?;
    if repository::get_patient(&conn, patient_id)?.is_none() {
        return Err(ApiError::NotFound("Patient not found".into()));
    }

    let fields = validate::check_medical_record(&form).map_err(ApiError::Validation)?;
    let id = repository::insert_record(&conn, patient_id, &fields)?;
    tracing::info!(record_id = id, patient_id, "medical record created");

    Ok(Redirect::to(&format!("/patient_details/{patient_id}")).into_response())
}

/// `GET /edit_medical_record/:id` — the record joined with the owning
/// patient's name, for form prefill.
pub async fn edit_form(
    State(ctx): State<ApiContext>,
    Path(id): Path<i64>,
) -> Result<Json<MedicalRecordWithPatient>, ApiError> {
    let conn = ctx.open_db()?;
    let record = repository::get_record_with_patient(&conn, id)?
        .ok_or_else(|| ApiError::NotFound("Medical record not found".into()))?;
    Ok(Json(record))
}

/// `POST /edit_medical_record/:id` — full replace of the mutable
/// fields; the record keeps its patient. The target must exist before
/// the body is even validated.
pub async fn edit(
    State(ctx): State<ApiContext>,
    Path(id): Path<i64>,
    Form(form): Form<MedicalRecordForm>,
) -> Result<Response, ApiError> {
    let mut conn = ctx.open_db()?;
    let record = repository::get_record(&conn, id)?
        .ok_or_else(|| ApiError::NotFound("Medical record not found".into()))?;

    let fields = validate::check_medical_record(&form).map_err(ApiError::Validation)?;
    repository::update_record(&mut conn, id, &fields)?;
    tracing::info!(record_id = id, "medical record updated");

    Ok(Redirect::to(&format!("/patient_details/{}", record.patient_id)).into_response())
}

/// `POST /delete_medical_record/:id` — removes one record only; the
/// parent patient is untouched.
pub async fn delete(
    State(ctx): State<ApiContext>,
    Path(id): Path<i64>,
) -> Result<Response, ApiError> {
    let mut conn = ctx.open_db()?;
    let record = repository::get_record(&conn, id)?
        .ok_or_else(|| ApiError::NotFound("Medical record not found".into()))?;
    repository::delete_record(&mut conn, id)?;
    tracing::info!(record_id = id, patient_id = record.patient_id, "medical record deleted");

    Ok(Redirect::to(&format!("/patient_details/{}", record.patient_id)).into_response())
}
