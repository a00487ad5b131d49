//! Patient CRUD endpoints.
//!
//! `GET /` — paged, searchable listing
//! `GET,POST /add_patient` — creation
//! `GET /patient_details/:id` — patient plus owned records
//! `GET,POST /edit_patient/:id` — full-replace update
//! `POST /delete_patient/:id` — cascade delete

use axum::extract::{Path, Query, State};
use axum::response::{IntoResponse, Redirect, Response};
use axum::{Form, Json};
use serde::{Deserialize, Serialize};

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::db::repository;
use crate::models::{Gender, MedicalRecord, Patient, PatientPage};
use crate::validate::{self, PatientForm};

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub search: Option<String>,
    pub page: Option<u32>,
}

#[derive(Serialize)]
pub struct PatientListResponse {
    pub search: Option<String>,
    #[serde(flatten)]
    pub page: PatientPage,
}

/// `GET /` — patient list, name-ordered, optional substring search.
pub async fn index(
    State(ctx): State<ApiContext>,
    Query(query): Query<ListQuery>,
) -> Result<Json<PatientListResponse>, ApiError> {
    let conn = ctx.open_db()?;
    let page = repository::list_patients(
        &conn,
        query.search.as_deref(),
        query.page.unwrap_or(1),
        ctx.config.page_size,
    )?;

    Ok(Json(PatientListResponse {
        search: query.search,
        page,
    }))
}

#[derive(Serialize)]
pub struct AddPatientView {
    pub genders: Vec<&'static str>,
}

/// `GET /add_patient` — the one piece of server-supplied form data:
/// the gender choices.
pub async fn add_form() -> Json<AddPatientView> {
    Json(AddPatientView {
        genders: [Gender::Unspecified, Gender::Male, Gender::Female, Gender::Other]
            .iter()
            .map(Gender::as_str)
            .collect(),
    })
}

/// `POST /add_patient` — validate, insert, back to the list.
pub async fn add(
    State(ctx): State<ApiContext>,
    Form(form): Form<PatientForm>,
) -> Result<Response, ApiError> {
    let fields = validate::check_patient(&form).map_err(ApiError::Validation)?;

    let conn = ctx.open_db()?;
    let id = repository::insert_patient(&conn, &fields)?;
    tracing::info!(patient_id = id, "patient created");

    Ok(Redirect::to("/").into_response())
}

#[derive(Serialize)]
pub struct PatientDetailsResponse {
    pub patient: Patient,
    pub medical_records: Vec<MedicalRecord>,
}

/// `GET /patient_details/:id` — the patient with its records,
/// most recent visit first.
pub async fn details(
    State(ctx): State<ApiContext>,
    Path(id): Path<i64>,
) -> Result<Json<PatientDetailsResponse>, ApiError> {
    let conn = ctx.open_db()?;
    let patient = repository::get_patient(&conn, id)?
        .ok_or_else(|| ApiError::NotFound("Patient not found".into()))?;
    let medical_records = repository::records_for_patient(&conn, id)?;

    Ok(Json(PatientDetailsResponse {
        patient,
        medical_records,
    }))
}

/// `GET /edit_patient/:id` — current values, for form prefill.
pub async fn edit_form(
    State(ctx): State<ApiContext>,
    Path(id): Path<i64>,
) -> Result<Json<Patient>, ApiError> {
    let conn = ctx.open_db()?;
    let patient = repository::get_patient(&conn, id)?
        .ok_or_else(|| ApiError::NotFound("Patient not found".into()))?;
    Ok(Json(patient))
}

/// `POST /edit_patient/:id` — full replace of the mutable fields.
/// The target must exist before the body is even validated.
pub async fn edit(
    State(ctx): State<ApiContext>,
    Path(id): Path<i64>,
    Form(form): Form<PatientForm>,
) -> Result<Response, ApiError> {
    let mut conn = ctx.open_db()?;
    if repository::get_patient(&conn, id)?.is_none() {
        return Err(ApiError::NotFound("Patient not found".into()));
    }

    let fields = validate::check_patient(&form).map_err(ApiError::Validation)?;
    repository::update_patient(&mut conn, id, &fields)?;
    tracing::info!(patient_id = id, "patient updated");

    Ok(Redirect::to(&format!("/patient_details/{id}")).into_response())
}

/// `POST /delete_patient/:id` — removes the patient and, through the
/// cascade, every record it owns. Absent ids are reported, not ignored.
pub async fn delete(
    State(ctx): State<ApiContext>,
    Path(id): Path<i64>,
) -> Result<Response, ApiError> {
    let mut conn = ctx.open_db()?;
    if !repository::delete_patient(&mut conn, id)? {
        return Err(ApiError::NotFound("Patient not found".into()));
    }
    tracing::info!(patient_id = id, "patient and owned records deleted");

    Ok(Redirect::to("/").into_response())
}
