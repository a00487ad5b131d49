use std::str::FromStr;

use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension};

use crate::db::DatabaseError;
use crate::models::{Gender, Patient, PatientFields, PatientPage};

/// Insert a new patient and return the assigned id.
pub fn insert_patient(conn: &Connection, fields: &PatientFields) -> Result<i64, DatabaseError> {
    conn.execute(
        "INSERT INTO patients (name, dob, gender, address, phone, email)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            fields.name,
            fields.dob,
            fields.gender.map(|g| g.as_str()),
            fields.address,
            fields.phone,
            fields.email,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn get_patient(conn: &Connection, id: i64) -> Result<Option<Patient>, DatabaseError> {
    let row = conn
        .query_row(
            "SELECT id, name, dob, gender, address, phone, email
             FROM patients WHERE id = ?1",
            params![id],
            patient_row,
        )
        .optional()?;

    row.map(patient_from_row).transpose()
}

/// One page of patients ordered by name ascending, optionally filtered
/// by a case-insensitive substring match on the name.
///
/// Pages are 1-based; a page past the end (or page 0) yields an empty
/// page, never an error. The returned totals always describe the full
/// filtered set so the caller can do pagination math.
pub fn list_patients(
    conn: &Connection,
    search: Option<&str>,
    page: u32,
    page_size: u32,
) -> Result<PatientPage, DatabaseError> {
    let search = search.unwrap_or("").trim();
    let pattern = format!("%{search}%");

    let total_count: u32 = conn.query_row(
        "SELECT COUNT(*) FROM patients WHERE LOWER(name) LIKE LOWER(?1)",
        params![pattern],
        |row| row.get(0),
    )?;
    let total_pages = total_count.div_ceil(page_size.max(1));

    let mut patients = Vec::new();
    if page >= 1 {
        let offset = u64::from(page - 1) * u64::from(page_size);
        let mut stmt = conn.prepare(
            "SELECT id, name, dob, gender, address, phone, email
             FROM patients WHERE LOWER(name) LIKE LOWER(?1)
             ORDER BY name ASC, id ASC LIMIT ?2 OFFSET ?3",
        )?;
        let rows = stmt.query_map(params![pattern, page_size, offset], patient_row)?;
        for row in rows {
            patients.push(patient_from_row(row?)?);
        }
    }

    Ok(PatientPage {
        patients,
        page,
        page_size,
        total_count,
        total_pages,
    })
}

/// Full replace of the mutable fields. Returns false when no such
/// patient exists; nothing is changed in that case.
pub fn update_patient(
    conn: &mut Connection,
    id: i64,
    fields: &PatientFields,
) -> Result<bool, DatabaseError> {
    let tx = conn.transaction()?;
    let changed = tx.execute(
        "UPDATE patients SET name = ?2, dob = ?3, gender = ?4, address = ?5,
         phone = ?6, email = ?7 WHERE id = ?1",
        params![
            id,
            fields.name,
            fields.dob,
            fields.gender.map(|g| g.as_str()),
            fields.address,
            fields.phone,
            fields.email,
        ],
    )?;
    tx.commit()?;
    Ok(changed > 0)
}

/// Delete a patient. The `ON DELETE CASCADE` on medical_records removes
/// the owned records in the same transaction, so either the patient and
/// all its records go, or nothing does. Returns false when absent.
pub fn delete_patient(conn: &mut Connection, id: i64) -> Result<bool, DatabaseError> {
    let tx = conn.transaction()?;
    let deleted = tx.execute("DELETE FROM patients WHERE id = ?1", params![id])?;
    tx.commit()?;
    Ok(deleted > 0)
}

// Internal row type — gender parsed outside the rusqlite closure
struct PatientRow {
    id: i64,
    name: String,
    dob: Option<NaiveDate>,
    gender: Option<String>,
    address: Option<String>,
    phone: Option<String>,
    email: Option<String>,
}

fn patient_row(row: &rusqlite::Row<'_>) -> Result<PatientRow, rusqlite::Error> {
    Ok(PatientRow {
        id: row.get(0)?,
        name: row.get(1)?,
        dob: row.get(2)?,
        gender: row.get(3)?,
        address: row.get(4)?,
        phone: row.get(5)?,
        email: row.get(6)?,
    })
}

fn patient_from_row(row: PatientRow) -> Result<Patient, DatabaseError> {
    Ok(Patient {
        id: row.id,
        name: row.name,
        dob: row.dob,
        gender: row.gender.as_deref().map(Gender::from_str).transpose()?,
        address: row.address,
        phone: row.phone,
        email: row.email,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::open_memory_database;

    fn fields(name: &str) -> PatientFields {
        PatientFields {
            name: name.to_string(),
            dob: NaiveDate::from_ymd_opt(1988, 4, 2),
            gender: Some(Gender::Female),
            address: Some("Calle 12 #34".into()),
            phone: Some("+14155550123".into()),
            email: Some("ana@example.com".into()),
        }
    }

    #[test]
    fn insert_then_get_round_trips() {
        let conn = open_memory_database().unwrap();
        let f = fields("Ana");
        let id = insert_patient(&conn, &f).unwrap();

        let got = get_patient(&conn, id).unwrap().unwrap();
        assert_eq!(got, Patient::from_fields(id, f));
    }

    #[test]
    fn get_missing_patient_is_none() {
        let conn = open_memory_database().unwrap();
        assert!(get_patient(&conn, 404).unwrap().is_none());
    }

    #[test]
    fn list_pages_partition_the_filtered_set() {
        let conn = open_memory_database().unwrap();
        for name in ["Carla", "Ana", "Beto"] {
            insert_patient(&conn, &fields(name)).unwrap();
        }

        let p1 = list_patients(&conn, None, 1, 2).unwrap();
        let p2 = list_patients(&conn, None, 2, 2).unwrap();
        let names1: Vec<_> = p1.patients.iter().map(|p| p.name.as_str()).collect();
        let names2: Vec<_> = p2.patients.iter().map(|p| p.name.as_str()).collect();

        assert_eq!(names1, ["Ana", "Beto"]);
        assert_eq!(names2, ["Carla"]);
        assert_eq!(p1.total_count, 3);
        assert_eq!(p1.total_pages, 2);
    }

    #[test]
    fn out_of_range_page_is_empty_not_an_error() {
        let conn = open_memory_database().unwrap();
        insert_patient(&conn, &fields("Ana")).unwrap();

        let page = list_patients(&conn, None, 9, 10).unwrap();
        assert!(page.patients.is_empty());
        assert_eq!(page.total_count, 1);
        assert_eq!(page.total_pages, 1);
    }

    #[test]
    fn search_is_case_insensitive_substring() {
        let conn = open_memory_database().unwrap();
        for name in ["Ana Maria", "Mariana", "Beto"] {
            insert_patient(&conn, &fields(name)).unwrap();
        }

        let page = list_patients(&conn, Some("MARI"), 1, 10).unwrap();
        let names: Vec<_> = page.patients.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["Ana Maria", "Mariana"]);
    }

    #[test]
    fn update_replaces_all_mutable_fields() {
        let conn = &mut open_memory_database().unwrap();
        let id = insert_patient(conn, &fields("Ana")).unwrap();

        let replacement = PatientFields {
            name: "Ana Lucia".into(),
            dob: None,
            gender: None,
            address: None,
            phone: None,
            email: None,
        };
        assert!(update_patient(conn, id, &replacement).unwrap());

        let got = get_patient(conn, id).unwrap().unwrap();
        assert_eq!(got, Patient::from_fields(id, replacement));
    }

    #[test]
    fn update_of_missing_patient_changes_nothing() {
        let conn = &mut open_memory_database().unwrap();
        let id = insert_patient(conn, &fields("Ana")).unwrap();
        let before = get_patient(conn, id).unwrap();

        assert!(!update_patient(conn, id + 1, &fields("Ghost")).unwrap());

        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM patients", [], |r| r.get(0))
            .unwrap();
        assert_eq!(count, 1);
        assert_eq!(get_patient(conn, id).unwrap(), before);
    }

    #[test]
    fn delete_missing_patient_reports_absent() {
        let conn = &mut open_memory_database().unwrap();
        assert!(!delete_patient(conn, 77).unwrap());
    }
}
