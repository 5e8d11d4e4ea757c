use crate::models::{
    BogieChecksheetCreate, BogieChecksheetRecord, Page, WheelSpecificationCreate,
    WheelSpecificationFilter, WheelSpecificationRecord,
};
use chrono::Utc;
use rusqlite::types::Value as SqlValue;
use rusqlite::{ffi, params, params_from_iter, Connection, OptionalExtension, Row};
use serde::Serialize;
use serde_json::Value;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use thiserror::Error;

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Form with formNumber '{0}' already exists.")]
    Conflict(String),
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Store lock poisoned")]
    LockPoisoned,
}

/// Shared handle to the form database. Clones share one connection, and every
/// operation holds its lock for the whole statement sequence.
#[derive(Clone)]
pub struct FormStore {
    conn: Arc<Mutex<Connection>>,
}

impl FormStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;

        conn.busy_timeout(BUSY_TIMEOUT)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "synchronous", "NORMAL")?;

        Self::init(conn)
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self, StoreError> {
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS bogie_checksheets (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                form_number TEXT NOT NULL UNIQUE,
                inspection_by TEXT NOT NULL,
                inspection_date TEXT NOT NULL,
                bmbc_checksheet TEXT,
                bogie_checksheet_details TEXT,
                bogie_details TEXT,
                created_at TEXT NOT NULL
            );
            CREATE TABLE IF NOT EXISTS wheel_specifications (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                form_number TEXT NOT NULL UNIQUE,
                submitted_by TEXT NOT NULL,
                submitted_date TEXT NOT NULL,
                fields TEXT,
                created_at TEXT NOT NULL
            );",
        )?;

        Ok(FormStore {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.conn.lock().map_err(|_| StoreError::LockPoisoned)
    }

    pub fn create_bogie_checksheet(
        &self,
        form: &BogieChecksheetCreate,
    ) -> Result<BogieChecksheetRecord, StoreError> {
        let bmbc = to_blob(&form.bmbc_checksheet)?;
        let checksheet = to_blob(&form.bogie_checksheet)?;
        let details = to_blob(&form.bogie_details)?;

        let conn = self.lock()?;
        // The lookup only gives a cheap early answer; the UNIQUE column decides.
        if find_bogie_checksheet(&conn, &form.form_number)?.is_some() {
            return Err(StoreError::Conflict(form.form_number.clone()));
        }

        let inserted = conn.execute(
            "INSERT INTO bogie_checksheets (form_number, inspection_by, inspection_date, bmbc_checksheet, bogie_checksheet_details, bogie_details, created_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                &form.form_number,
                &form.inspection_by,
                form.inspection_date,
                bmbc,
                checksheet,
                details,
                Utc::now(),
            ],
        );
        map_conflict(inserted, &form.form_number)?;

        let record = conn.query_row(
            &format!("{BOGIE_COLUMNS} WHERE id = ?1"),
            [conn.last_insert_rowid()],
            bogie_from_row,
        )?;
        Ok(record)
    }

    pub fn find_bogie_checksheet(
        &self,
        form_number: &str,
    ) -> Result<Option<BogieChecksheetRecord>, StoreError> {
        let conn = self.lock()?;
        find_bogie_checksheet(&conn, form_number)
    }

    pub fn create_wheel_specification(
        &self,
        form: &WheelSpecificationCreate,
    ) -> Result<WheelSpecificationRecord, StoreError> {
        let fields = to_blob(&form.fields)?;

        let conn = self.lock()?;
        if find_wheel_specification(&conn, &form.form_number)?.is_some() {
            return Err(StoreError::Conflict(form.form_number.clone()));
        }

        let inserted = conn.execute(
            "INSERT INTO wheel_specifications (form_number, submitted_by, submitted_date, fields, created_at) VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                &form.form_number,
                &form.submitted_by,
                form.submitted_date,
                fields,
                Utc::now(),
            ],
        );
        map_conflict(inserted, &form.form_number)?;

        let record = conn.query_row(
            &format!("{WHEEL_COLUMNS} WHERE id = ?1"),
            [conn.last_insert_rowid()],
            wheel_from_row,
        )?;
        Ok(record)
    }

    pub fn find_wheel_specification(
        &self,
        form_number: &str,
    ) -> Result<Option<WheelSpecificationRecord>, StoreError> {
        let conn = self.lock()?;
        find_wheel_specification(&conn, form_number)
    }

    /// Lists wheel specifications in insertion order. No match is an empty
    /// list, not an error.
    pub fn list_wheel_specifications(
        &self,
        filter: &WheelSpecificationFilter,
        page: Page,
    ) -> Result<Vec<WheelSpecificationRecord>, StoreError> {
        let mut clauses = Vec::new();
        let mut values: Vec<SqlValue> = Vec::new();

        if let Some(form_number) = &filter.form_number {
            clauses.push("form_number = ?");
            values.push(SqlValue::Text(form_number.clone()));
        }
        if let Some(submitted_by) = &filter.submitted_by {
            clauses.push("submitted_by = ?");
            values.push(SqlValue::Text(submitted_by.clone()));
        }
        if let Some(submitted_date) = filter.submitted_date {
            clauses.push("submitted_date = ?");
            values.push(SqlValue::Text(submitted_date.format("%Y-%m-%d").to_string()));
        }

        let mut sql = WHEEL_COLUMNS.to_string();
        if !clauses.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&clauses.join(" AND "));
        }
        sql.push_str(" ORDER BY id LIMIT ? OFFSET ?");
        values.push(SqlValue::Integer(i64::from(page.limit)));
        values.push(SqlValue::Integer(i64::from(page.skip)));

        let conn = self.lock()?;
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(params_from_iter(values.iter()), wheel_from_row)?;

        let mut records = Vec::new();
        for record in rows {
            records.push(record?);
        }
        Ok(records)
    }
}

const BOGIE_COLUMNS: &str = "SELECT id, form_number, inspection_by, inspection_date, bmbc_checksheet, bogie_checksheet_details, bogie_details, created_at FROM bogie_checksheets";

const WHEEL_COLUMNS: &str = "SELECT id, form_number, submitted_by, submitted_date, fields, created_at FROM wheel_specifications";

fn to_blob<T: Serialize>(section: &Option<T>) -> Result<Option<Value>, StoreError> {
    Ok(section.as_ref().map(serde_json::to_value).transpose()?)
}

fn map_conflict(result: rusqlite::Result<usize>, form_number: &str) -> Result<(), StoreError> {
    match result {
        Ok(_) => Ok(()),
        // Only a UNIQUE violation means a duplicate form number.
        Err(rusqlite::Error::SqliteFailure(err, _))
            if err.extended_code == ffi::SQLITE_CONSTRAINT_UNIQUE =>
        {
            Err(StoreError::Conflict(form_number.to_string()))
        }
        Err(err) => Err(err.into()),
    }
}

// A JSON `null` written by some other client reads back as an absent blob.
fn blob_at(row: &Row<'_>, idx: usize) -> rusqlite::Result<Option<Value>> {
    Ok(row.get::<_, Option<Value>>(idx)?.filter(|v| !v.is_null()))
}

fn bogie_from_row(row: &Row<'_>) -> rusqlite::Result<BogieChecksheetRecord> {
    Ok(BogieChecksheetRecord {
        id: row.get(0)?,
        form_number: row.get(1)?,
        inspection_by: row.get(2)?,
        inspection_date: row.get(3)?,
        bmbc_checksheet: blob_at(row, 4)?,
        bogie_checksheet: blob_at(row, 5)?,
        bogie_details: blob_at(row, 6)?,
        created_at: row.get(7)?,
    })
}

fn wheel_from_row(row: &Row<'_>) -> rusqlite::Result<WheelSpecificationRecord> {
    Ok(WheelSpecificationRecord {
        id: row.get(0)?,
        form_number: row.get(1)?,
        submitted_by: row.get(2)?,
        submitted_date: row.get(3)?,
        fields: blob_at(row, 4)?,
        created_at: row.get(5)?,
    })
}

fn find_bogie_checksheet(
    conn: &Connection,
    form_number: &str,
) -> Result<Option<BogieChecksheetRecord>, StoreError> {
    Ok(conn
        .query_row(
            &format!("{BOGIE_COLUMNS} WHERE form_number = ?1"),
            [form_number],
            bogie_from_row,
        )
        .optional()?)
}

fn find_wheel_specification(
    conn: &Connection,
    form_number: &str,
) -> Result<Option<WheelSpecificationRecord>, StoreError> {
    Ok(conn
        .query_row(
            &format!("{WHEEL_COLUMNS} WHERE form_number = ?1"),
            [form_number],
            wheel_from_row,
        )
        .optional()?)
}
