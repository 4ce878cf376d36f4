use std::convert::TryFrom;

use rusqlite::{named_params, Connection, OptionalExtension, Row};

use crate::error::{AppError, AppResult};
use crate::models::assignment::AssignmentRecord;

const BASE_SELECT: &str = r#"
    SELECT
        id,
        person,
        role,
        week_start,
        days,
        project_id,
        project_name,
        project_short,
        address,
        address_detail,
        color,
        confirmed,
        positionen,
        created_at,
        updated_at
    FROM assignments
"#;

#[derive(Debug, Clone)]
pub struct AssignmentRow {
    pub id: String,
    pub person: String,
    pub role: String,
    pub week_start: String,
    pub days: String,
    pub project_id: String,
    pub project_name: String,
    pub project_short: String,
    pub address: Option<String>,
    pub address_detail: Option<String>,
    pub color: Option<String>,
    pub confirmed: bool,
    pub positionen: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl AssignmentRow {
    pub fn from_record(record: &AssignmentRecord) -> AppResult<Self> {
        Ok(Self {
            id: record.id.clone(),
            person: record.person.clone(),
            role: record.role.clone(),
            week_start: record.week_start.clone(),
            days: serde_json::to_string(&record.days)?,
            project_id: record.project_id.clone(),
            project_name: record.project_name.clone(),
            project_short: record.project_short.clone(),
            address: record.address.clone(),
            address_detail: record.address_detail.clone(),
            color: record.color.clone(),
            confirmed: record.confirmed,
            positionen: serialize_vec(&record.positionen)?,
            created_at: record.created_at.clone(),
            updated_at: record.updated_at.clone(),
        })
    }

    pub fn into_record(self) -> AppResult<AssignmentRecord> {
        Ok(AssignmentRecord {
            id: self.id,
            person: self.person,
            role: self.role,
            week_start: self.week_start,
            days: serde_json::from_str(&self.days)?,
            project_id: self.project_id,
            project_name: self.project_name,
            project_short: self.project_short,
            address: self.address,
            address_detail: self.address_detail,
            color: self.color,
            confirmed: self.confirmed,
            positionen: deserialize_vec(self.positionen)?,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

impl TryFrom<&Row<'_>> for AssignmentRow {
    type Error = rusqlite::Error;

    fn try_from(row: &Row<'_>) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.get("id")?,
            person: row.get("person")?,
            role: row.get("role")?,
            week_start: row.get("week_start")?,
            days: row.get("days")?,
            project_id: row.get("project_id")?,
            project_name: row.get("project_name")?,
            project_short: row.get("project_short")?,
            address: row.get("address")?,
            address_detail: row.get("address_detail")?,
            color: row.get("color")?,
            confirmed: row.get::<_, i64>("confirmed")? != 0,
            positionen: row.get("positionen")?,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }
}

pub struct AssignmentRepository;

impl AssignmentRepository {
    pub fn insert(conn: &Connection, row: &AssignmentRow) -> AppResult<()> {
        conn.execute(
            r#"
                INSERT INTO assignments (
                    id,
                    person,
                    role,
                    week_start,
                    days,
                    project_id,
                    project_name,
                    project_short,
                    address,
                    address_detail,
                    color,
                    confirmed,
                    positionen,
                    created_at,
                    updated_at
                ) VALUES (
                    :id,
                    :person,
                    :role,
                    :week_start,
                    :days,
                    :project_id,
                    :project_name,
                    :project_short,
                    :address,
                    :address_detail,
                    :color,
                    :confirmed,
                    :positionen,
                    :created_at,
                    :updated_at
                )
            "#,
            named_params! {
                ":id": &row.id,
                ":person": &row.person,
                ":role": &row.role,
                ":week_start": &row.week_start,
                ":days": &row.days,
                ":project_id": &row.project_id,
                ":project_name": &row.project_name,
                ":project_short": &row.project_short,
                ":address": &row.address,
                ":address_detail": &row.address_detail,
                ":color": &row.color,
                ":confirmed": row.confirmed as i64,
                ":positionen": &row.positionen,
                ":created_at": &row.created_at,
                ":updated_at": &row.updated_at,
            },
        )?;

        Ok(())
    }

    pub fn update(conn: &Connection, row: &AssignmentRow) -> AppResult<()> {
        let affected = conn.execute(
            r#"
                UPDATE assignments SET
                    person = :person,
                    role = :role,
                    week_start = :week_start,
                    days = :days,
                    project_id = :project_id,
                    project_name = :project_name,
                    project_short = :project_short,
                    address = :address,
                    address_detail = :address_detail,
                    color = :color,
                    confirmed = :confirmed,
                    positionen = :positionen,
                    updated_at = :updated_at
                WHERE id = :id
            "#,
            named_params! {
                ":id": &row.id,
                ":person": &row.person,
                ":role": &row.role,
                ":week_start": &row.week_start,
                ":days": &row.days,
                ":project_id": &row.project_id,
                ":project_name": &row.project_name,
                ":project_short": &row.project_short,
                ":address": &row.address,
                ":address_detail": &row.address_detail,
                ":color": &row.color,
                ":confirmed": row.confirmed as i64,
                ":positionen": &row.positionen,
                ":updated_at": &row.updated_at,
            },
        )?;

        if affected == 0 {
            return Err(AppError::not_found());
        }

        Ok(())
    }

    pub fn delete(conn: &Connection, id: &str) -> AppResult<()> {
        let affected = conn.execute("DELETE FROM assignments WHERE id = ?1", [id])?;
        if affected == 0 {
            return Err(AppError::not_found());
        }
        Ok(())
    }

    pub fn find_by_id(conn: &Connection, id: &str) -> AppResult<Option<AssignmentRow>> {
        let mut stmt = conn.prepare(&format!("{} WHERE id = ?1", BASE_SELECT))?;
        let row = stmt
            .query_row([id], |row| AssignmentRow::try_from(row))
            .optional()?;
        Ok(row)
    }

    /// Assignments of one 5-day window, in insertion order. Insertion order is
    /// what the grid and the conflict list key their output ordering on;
    /// `rowid` breaks ties between records created within the same clock tick.
    pub fn list_for_week(conn: &Connection, week_start: &str) -> AppResult<Vec<AssignmentRow>> {
        let mut stmt = conn.prepare(&format!(
            "{} WHERE week_start = ?1 ORDER BY created_at ASC, rowid ASC",
            BASE_SELECT
        ))?;
        let rows = stmt
            .query_map([week_start], |row| AssignmentRow::try_from(row))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    pub fn list_all(conn: &Connection) -> AppResult<Vec<AssignmentRow>> {
        let mut stmt = conn.prepare(&format!(
            "{} ORDER BY week_start ASC, created_at ASC, rowid ASC",
            BASE_SELECT
        ))?;
        let rows = stmt
            .query_map([], |row| AssignmentRow::try_from(row))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }
}

fn serialize_vec(values: &[String]) -> AppResult<Option<String>> {
    if values.is_empty() {
        Ok(None)
    } else {
        Ok(Some(serde_json::to_string(values)?))
    }
}

fn deserialize_vec(raw: Option<String>) -> AppResult<Vec<String>> {
    match raw {
        Some(value) if !value.is_empty() => Ok(serde_json::from_str(&value)?),
        _ => Ok(Vec::new()),
    }
}
