use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::db::repositories::assignment_repository::AssignmentRepository;
use crate::db::DbPool;
use crate::error::AppResult;
use crate::models::assignment::{AssignmentRecord, WEEK_DAY_COUNT};
use crate::models::calendar::{BarSpan, ConflictInfo, PersonRow, WeekDay};
use crate::services::week_grid;

/// Everything the weekly grid needs for one window: the day columns, one row
/// per person and the double bookings. Rows and conflicts come from a single
/// shared grouping pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekPlan {
    pub week_start: String,
    pub week: Vec<WeekDay>,
    pub rows: Vec<PersonRow>,
    pub conflicts: Vec<ConflictInfo>,
}

#[derive(Clone)]
pub struct PlanningService {
    db: DbPool,
}

impl PlanningService {
    pub fn new(db: DbPool) -> Self {
        Self { db }
    }

    pub fn week_overview(&self, week_start: NaiveDate) -> AppResult<WeekPlan> {
        let week = week_grid::build_week_days(week_start)?;
        let week_key = week_grid::format_week_start(week_start);

        let rows = self
            .db
            .with_connection(|conn| AssignmentRepository::list_for_week(conn, &week_key))?;
        let assignments = rows
            .into_iter()
            .map(|row| row.into_record())
            .collect::<AppResult<Vec<_>>>()?;

        let person_rows = group_by_person(&assignments);
        let conflicts = detect_conflicts(&person_rows, &week);
        debug!(
            target: "app::planning",
            week_start = %week_key,
            persons = person_rows.len(),
            conflicts = conflicts.len(),
            "week overview built"
        );

        Ok(WeekPlan {
            week_start: week_key,
            week,
            rows: person_rows,
            conflicts,
        })
    }
}

/// Groups assignments into one row per person. Row order follows the first
/// appearance of each person in the input, the first-seen role is kept, and
/// every well-formed assignment lands in exactly one row. Records without
/// exactly 5 day flags are skipped, not reported.
pub fn group_by_person(assignments: &[AssignmentRecord]) -> Vec<PersonRow> {
    let mut index_by_person: HashMap<String, usize> = HashMap::new();
    let mut rows: Vec<PersonRow> = Vec::new();

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

        match index_by_person.get(&assignment.person) {
            Some(&index) => rows[index].assignments.push(assignment.clone()),
            None => {
                index_by_person.insert(assignment.person.clone(), rows.len());
                rows.push(PersonRow {
                    person: assignment.person.clone(),
                    role: assignment.role.clone(),
                    assignments: vec![assignment.clone()],
                });
            }
        }
    }

    rows
}

/// Scans the grouped rows for double bookings: one `ConflictInfo` per
/// (person, day) slot with two or more simultaneous assignments, listing all
/// colliding projects in assignment order. Pure and total over grouped input.
pub fn detect_conflicts(rows: &[PersonRow], week: &[WeekDay]) -> Vec<ConflictInfo> {
    let mut conflicts = Vec::new();

    for row in rows {
        if row.assignments.len() < 2 {
            continue;
        }

        for (day_index, day) in week.iter().enumerate() {
            let projects: Vec<String> = row
                .assignments
                .iter()
                .filter(|assignment| assignment.is_present(day_index))
                .map(|assignment| assignment.project_short.clone())
                .collect();

            if projects.len() >= 2 {
                conflicts.push(ConflictInfo {
                    person: row.person.clone(),
                    day_index,
                    day_label: day.short_label.clone(),
                    projects,
                });
            }
        }
    }

    conflicts
}

/// Maximal runs of consecutive present days in one assignment. Each run is one
/// contiguous bar in the grid; edge rounding comes from the run boundaries.
pub fn bar_spans(assignment: &AssignmentRecord) -> Vec<BarSpan> {
    let mut spans = Vec::new();
    let mut run_start: Option<usize> = None;

    for day_index in 0..assignment.days.len() {
        match (assignment.is_present(day_index), run_start) {
            (true, None) => run_start = Some(day_index),
            (false, Some(start)) => {
                spans.push(BarSpan {
                    start_day: start,
                    end_day: day_index - 1,
                });
                run_start = None;
            }
            _ => {}
        }
    }

    if let Some(start) = run_start {
        spans.push(BarSpan {
            start_day: start,
            end_day: assignment.days.len() - 1,
        });
    }

    spans
}
