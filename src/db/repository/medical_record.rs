use rusqlite::{params, Connection, OptionalExtension};

use crate::db::DatabaseError;
use crate::models::{MedicalRecord, MedicalRecordFields, MedicalRecordWithPatient};

/// Insert a record for an existing patient and return the assigned id.
///
/// The caller checks the patient exists first (to report NotFound);
/// the foreign key is the backstop if the patient vanished in between.
pub fn insert_record(
    conn: &Connection,
    patient_id: i64,
    fields: &MedicalRecordFields,
) -> Result<i64, DatabaseError> {
    conn.execute(
        "INSERT INTO medical_records (patient_id, record_date, reason, diagnosis, treatment, notes)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            patient_id,
            fields.record_date,
            fields.reason,
            fields.diagnosis,
            fields.treatment,
            fields.notes,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn get_record(conn: &Connection, id: i64) -> Result<Option<MedicalRecord>, DatabaseError> {
    let record = conn
        .query_row(
            "SELECT id, patient_id, record_date, reason, diagnosis, treatment, notes
             FROM medical_records WHERE id = ?1",
            params![id],
            record_row,
        )
        .optional()?;
    Ok(record)
}

/// A record joined with its owning patient's name, as the edit view
/// loads it in one query.
pub fn get_record_with_patient(
    conn: &Connection,
    id: i64,
) -> Result<Option<MedicalRecordWithPatient>, DatabaseError> {
    let row = conn
        .query_row(
            "SELECT mr.id, mr.patient_id, mr.record_date, mr.reason, mr.diagnosis,
                    mr.treatment, mr.notes, p.name
             FROM medical_records mr
             JOIN patients p ON mr.patient_id = p.id
             WHERE mr.id = ?1",
            params![id],
            |row| {
                Ok(MedicalRecordWithPatient {
                    record: record_row(row)?,
                    patient_name: row.get(7)?,
                })
            },
        )
        .optional()?;
    Ok(row)
}

/// All records for a patient, most recent first. An unknown patient id
/// simply yields an empty list.
pub fn records_for_patient(
    conn: &Connection,
    patient_id: i64,
) -> Result<Vec<MedicalRecord>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, patient_id, record_date, reason, diagnosis, treatment, notes
         FROM medical_records WHERE patient_id = ?1
         ORDER BY record_date DESC, id DESC",
    )?;
    let rows = stmt.query_map(params![patient_id], record_row)?;

    let mut records = Vec::new();
    for row in rows {
        records.push(row?);
    }
    Ok(records)
}

/// Full replace of the mutable fields. Returns false when absent.
pub fn update_record(
    conn: &mut Connection,
    id: i64,
    fields: &MedicalRecordFields,
) -> Result<bool, DatabaseError> {
    let tx = conn.transaction()?;
    let changed = tx.execute(
        "UPDATE medical_records SET record_date = ?2, reason = ?3, diagnosis = ?4,
         treatment = ?5, notes = ?6 WHERE id = ?1",
        params![
            id,
            fields.record_date,
            fields.reason,
            fields.diagnosis,
            fields.treatment,
            fields.notes,
        ],
    )?;
    tx.commit()?;
    Ok(changed > 0)
}

/// Delete one record; never touches the parent patient. Returns false
/// when absent.
pub fn delete_record(conn: &mut Connection, id: i64) -> Result<bool, DatabaseError> {
    let tx = conn.transaction()?;
    let deleted = tx.execute("DELETE FROM medical_records WHERE id = ?1", params![id])?;
    tx.commit()?;
    Ok(deleted > 0)
}

fn record_row(row: &rusqlite::Row<'_>) -> Result<MedicalRecord, rusqlite::Error> {
    Ok(MedicalRecord {
        id: row.get(0)?,
        patient_id: row.get(1)?,
        record_date: row.get(2)?,
        reason: row.get(3)?,
        diagnosis: row.get(4)?,
        treatment: row.get(5)?,
        notes: row.get(6)?,
    })
}
