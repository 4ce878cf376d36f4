use std::collections::{HashMap, HashSet};

use chrono::{Datelike, Days, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::db::repositories::assignment_repository::AssignmentRepository;
use crate::db::DbPool;
use crate::error::{AppError, AppResult};
use crate::models::assignment::{AssignmentRecord, WEEK_DAY_COUNT};
use crate::models::calendar::{MonthCell, WorkloadTier};
use crate::services::week_grid;

/// 6 weeks of 7 cells, the fixed frame the month calendar renders into.
pub const MONTH_CELL_COUNT: usize = 42;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthPlan {
    pub year: i32,
    pub month: u32,
    pub cells: Vec<MonthCell>,
}

/// Month workload calendar, derived from the same assignment records as the
/// weekly grid so the two views cannot disagree.
#[derive(Clone)]
pub struct MonthService {
    db: DbPool,
}

impl MonthService {
    pub fn new(db: DbPool) -> Self {
        Self { db }
    }

    pub fn month_overview(&self, year: i32, month: u32) -> AppResult<MonthPlan> {
        let rows = self
            .db
            .with_connection(|conn| AssignmentRepository::list_all(conn))?;
        let assignments = rows
            .into_iter()
            .map(|row| row.into_record())
            .collect::<AppResult<Vec<_>>>()?;

        let cells = build_month_cells(&assignments, year, month)?;
        debug!(target: "app::planning", year, month, "month overview built");

        Ok(MonthPlan { year, month, cells })
    }
}

/// Lays out the 42-cell frame: leading blanks up to the Monday-based weekday
/// of the 1st, one cell per day of the month with the distinct-person worker
/// count and its tier, trailing blanks to fill the last week row.
pub fn build_month_cells(
    assignments: &[AssignmentRecord],
    year: i32,
    month: u32,
) -> AppResult<Vec<MonthCell>> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| AppError::validation("Ungültiger Monat"))?;
    let day_count = days_in_month(first);

    let persons_by_date = persons_per_date(assignments);

    let mut cells = Vec::with_capacity(MONTH_CELL_COUNT);
    let leading = first.weekday().num_days_from_monday() as usize;
    for _ in 0..leading {
        cells.push(MonthCell::blank());
    }

    for day in 1..=day_count {
        let date = NaiveDate::from_ymd_opt(year, month, day)
            .ok_or_else(|| AppError::validation("Ungültiger Monat"))?;
        let worker_count = persons_by_date
            .get(&date)
            .map(|persons| persons.len())
            .unwrap_or(0);
        cells.push(MonthCell {
            day: Some(day),
            worker_count,
            tier: WorkloadTier::from_count(worker_count),
        });
    }

    while cells.len() < MONTH_CELL_COUNT {
        cells.push(MonthCell::blank());
    }

    Ok(cells)
}

fn persons_per_date(assignments: &[AssignmentRecord]) -> HashMap<NaiveDate, HashSet<String>> {
    let mut persons_by_date: HashMap<NaiveDate, HashSet<String>> = HashMap::new();

    for assignment in assignments {
        if assignment.days.len() != WEEK_DAY_COUNT {
            warn!(
                target: "app::planning",
                assignment_id = %assignment.id,
                day_count = assignment.days.len(),
                "skipping assignment with malformed day vector"
            );
            continue;
        }

        let week_start = match week_grid::parse_week_start(&assignment.week_start) {
            Ok(date) => date,
            Err(_) => {
                warn!(
                    target: "app::planning",
                    assignment_id = %assignment.id,
                    week_start = %assignment.week_start,
                    "skipping assignment with unparseable week start"
                );
                continue;
            }
        };

        for day_index in 0..WEEK_DAY_COUNT {
            if !assignment.is_present(day_index) {
                continue;
            }
            if let Some(date) = week_start.checked_add_days(Days::new(day_index as u64)) {
                persons_by_date
                    .entry(date)
                    .or_default()
                    .insert(assignment.person.clone());
            }
        }
    }

    persons_by_date
}

fn days_in_month(first: NaiveDate) -> u32 {
    let (next_year, next_month) = if first.month() == 12 {
        (first.year() + 1, 1)
    } else {
        (first.year(), first.month() + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .map(|next_first| next_first.pred_opt().map(|d| d.day()).unwrap_or(28))
        .unwrap_or(28)
}
