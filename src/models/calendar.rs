use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::assignment::AssignmentRecord;

/// One workday column of the weekly grid. Derived, never persisted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WeekDay {
    pub key: String,
    pub short_label: String,
    /// `dd.mm.` display form, e.g. `03.02.`
    pub date_label: String,
    pub day_number: u32,
    pub date: NaiveDate,
}

/// One row of the weekly grid: a person with all their assignments for the
/// week. Row order follows first appearance in the input; the first-seen role
/// wins when a person appears under two roles.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PersonRow {
    pub person: String,
    pub role: String,
    pub assignments: Vec<AssignmentRecord>,
}

/// A double booking: one person, one day, two or more projects at once.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ConflictInfo {
    pub person: String,
    pub day_index: usize,
    pub day_label: String,
    /// Short names of the colliding projects, in assignment order.
    pub projects: Vec<String>,
}

/// A maximal run of consecutive present days within a single assignment.
/// The renderer draws one contiguous bar per span; edge rounding falls out of
/// the run boundaries, independent of other bars stacked in the same cell.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct BarSpan {
    pub start_day: usize,
    pub end_day: usize,
}

impl BarSpan {
    pub fn contains(&self, day_index: usize) -> bool {
        (self.start_day..=self.end_day).contains(&day_index)
    }

    pub fn rounded_left(&self, day_index: usize) -> bool {
        day_index == self.start_day
    }

    pub fn rounded_right(&self, day_index: usize) -> bool {
        day_index == self.end_day
    }
}

/// Workload colour tier of a month-calendar cell, keyed by the number of
/// distinct persons on site that day.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum WorkloadTier {
    Empty,
    Low,
    Mid,
    High,
}

impl WorkloadTier {
    pub fn from_count(worker_count: usize) -> Self {
        match worker_count {
            0 => WorkloadTier::Empty,
            1 => WorkloadTier::Low,
            2..=3 => WorkloadTier::Mid,
            _ => WorkloadTier::High,
        }
    }
}

/// One cell of the 42-cell month calendar. Leading and trailing filler cells
/// carry no day.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MonthCell {
    #[serde(default)]
    pub day: Option<u32>,
    pub worker_count: usize,
    pub tier: WorkloadTier,
}

impl MonthCell {
    pub fn blank() -> Self {
        Self {
            day: None,
            worker_count: 0,
            tier: WorkloadTier::Empty,
        }
    }
}
