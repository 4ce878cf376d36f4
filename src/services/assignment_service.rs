use chrono::Utc;
use tracing::{debug, info};

use crate::db::repositories::assignment_repository::{AssignmentRepository, AssignmentRow};
use crate::db::DbPool;
use crate::error::{AppError, AppResult};
use crate::models::assignment::{
    AssignmentCreateInput, AssignmentRecord, AssignmentUpdateInput, WEEK_DAY_COUNT,
};
use crate::services::week_grid;

#[derive(Clone)]
pub struct AssignmentService {
    db: DbPool,
}

impl AssignmentService {
    pub fn new(db: DbPool) -> Self {
        Self { db }
    }

    pub fn create_assignment(&self, input: AssignmentCreateInput) -> AppResult<AssignmentRecord> {
        let mut record = build_record_from_create(input)?;
        let now = Utc::now().to_rfc3339();
        record.id = uuid::Uuid::new_v4().to_string();
        record.created_at = now.clone();
        record.updated_at = now;

        validate_record(&record)?;

        let row = AssignmentRow::from_record(&record)?;
        self.db
            .with_connection(|conn| AssignmentRepository::insert(conn, &row))?;
        info!(assignment_id = %record.id, person = %record.person, "assignment created");
        Ok(record)
    }

    pub fn update_assignment(
        &self,
        id: &str,
        update: AssignmentUpdateInput,
    ) -> AppResult<AssignmentRecord> {
        let mut existing = self.get_assignment(id)?;
        apply_update(&mut existing, update)?;
        existing.updated_at = Utc::now().to_rfc3339();
        validate_record(&existing)?;

        let row = AssignmentRow::from_record(&existing)?;
        self.db
            .with_connection(|conn| AssignmentRepository::update(conn, &row))?;
        info!(assignment_id = %existing.id, "assignment updated");
        Ok(existing)
    }

    pub fn delete_assignment(&self, id: &str) -> AppResult<()> {
        self.db
            .with_connection(|conn| AssignmentRepository::delete(conn, id))?;
        info!(assignment_id = %id, "assignment deleted");
        Ok(())
    }

    pub fn get_assignment(&self, id: &str) -> AppResult<AssignmentRecord> {
        let row = self
            .db
            .with_connection(|conn| AssignmentRepository::find_by_id(conn, id))?
            .ok_or_else(AppError::not_found)?;
        let record = row.into_record()?;
        debug!(assignment_id = %record.id, "assignment fetched");
        Ok(record)
    }

    pub fn list_for_week(&self, week_start: &str) -> AppResult<Vec<AssignmentRecord>> {
        week_grid::parse_week_start(week_start)?;
        let rows = self
            .db
            .with_connection(|conn| AssignmentRepository::list_for_week(conn, week_start))?;
        let assignments = rows
            .into_iter()
            .map(|row| row.into_record())
            .collect::<AppResult<Vec<_>>>()?;
        debug!(week_start, count = assignments.len(), "assignments listed for week");
        Ok(assignments)
    }

    pub fn list_assignments(&self) -> AppResult<Vec<AssignmentRecord>> {
        let rows = self
            .db
            .with_connection(|conn| AssignmentRepository::list_all(conn))?;
        let assignments = rows
            .into_iter()
            .map(|row| row.into_record())
            .collect::<AppResult<Vec<_>>>()?;
        debug!(count = assignments.len(), "assignments listed");
        Ok(assignments)
    }
}

fn build_record_from_create(mut input: AssignmentCreateInput) -> AppResult<AssignmentRecord> {
    let person = normalize_required(&input.person, "Person darf nicht leer sein")?;
    let role = input.role.trim().to_string();
    let week_start = normalize_week_start(&input.week_start)?;
    let days = normalize_days(input.days)?;
    let project_id = normalize_required(&input.project_id, "Projekt-ID darf nicht leer sein")?;
    let project_name =
        normalize_required(&input.project_name, "Projektname darf nicht leer sein")?;
    let project_short =
        normalize_required(&input.project_short, "Projektkürzel darf nicht leer sein")?;
    let address = normalize_optional_string(input.address.take());
    let address_detail = normalize_optional_string(input.address_detail.take());
    let color = normalize_color(input.color.take())?;
    let confirmed = input.confirmed.unwrap_or(false);
    let positionen = normalize_positionen(input.positionen.take().unwrap_or_default());

    Ok(AssignmentRecord {
        id: String::new(),
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
        created_at: String::new(),
        updated_at: String::new(),
    })
}

fn apply_update(record: &mut AssignmentRecord, update: AssignmentUpdateInput) -> AppResult<()> {
    if let Some(person) = update.person {
        record.person = normalize_required(&person, "Person darf nicht leer sein")?;
    }

    if let Some(role) = update.role {
        record.role = role.trim().to_string();
    }

    if let Some(week_start) = update.week_start {
        record.week_start = normalize_week_start(&week_start)?;
    }

    if let Some(days) = update.days {
        record.days = normalize_days(days)?;
    }

    if let Some(project_id) = update.project_id {
        record.project_id = normalize_required(&project_id, "Projekt-ID darf nicht leer sein")?;
    }

    if let Some(project_name) = update.project_name {
        record.project_name =
            normalize_required(&project_name, "Projektname darf nicht leer sein")?;
    }

    if let Some(project_short) = update.project_short {
        record.project_short =
            normalize_required(&project_short, "Projektkürzel darf nicht leer sein")?;
    }

    if let Some(address) = update.address {
        record.address = normalize_optional_string(address);
    }

    if let Some(address_detail) = update.address_detail {
        record.address_detail = normalize_optional_string(address_detail);
    }

    if let Some(color) = update.color {
        record.color = normalize_color(color)?;
    }

    if let Some(confirmed) = update.confirmed {
        record.confirmed = confirmed;
    }

    if let Some(positionen) = update.positionen {
        record.positionen = normalize_positionen(positionen.unwrap_or_default());
    }

    Ok(())
}

fn validate_record(record: &AssignmentRecord) -> AppResult<()> {
    if record.days.len() != WEEK_DAY_COUNT {
        return Err(AppError::validation(
            "Anwesenheit muss genau 5 Tageswerte enthalten",
        ));
    }
    Ok(())
}

fn normalize_required(value: &str, message: &str) -> AppResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::validation(message));
    }
    Ok(trimmed.to_string())
}

fn normalize_week_start(value: &str) -> AppResult<String> {
    let date = week_grid::parse_week_start(value.trim())?;
    Ok(week_grid::format_week_start(date))
}

fn normalize_days(days: Vec<bool>) -> AppResult<Vec<bool>> {
    if days.len() != WEEK_DAY_COUNT {
        return Err(AppError::validation(
            "Anwesenheit muss genau 5 Tageswerte enthalten",
        ));
    }
    Ok(days)
}

fn normalize_optional_string(value: Option<String>) -> Option<String> {
    value.and_then(|val| {
        let trimmed = val.trim().to_string();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed)
        }
    })
}

fn normalize_color(value: Option<String>) -> AppResult<Option<String>> {
    match normalize_optional_string(value) {
        Some(color) => {
            let valid_len = color.len() == 4 || color.len() == 7;
            if !color.starts_with('#')
                || !valid_len
                || !color[1..].chars().all(|c| c.is_ascii_hexdigit())
            {
                return Err(AppError::validation(
                    "Farbe muss ein Hex-Wert wie #aabbcc sein",
                ));
            }
            Ok(Some(color.to_lowercase()))
        }
        None => Ok(None),
    }
}

fn normalize_positionen(values: Vec<String>) -> Vec<String> {
    values
        .into_iter()
        .filter_map(|value| {
            let trimmed = value.trim().to_string();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed)
            }
        })
        .collect()
}
