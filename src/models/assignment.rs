use serde::{Deserialize, Serialize};

/// Number of workdays in one planning window (Mo–Fr). A day is the atomic
/// scheduling unit; half days and spans crossing week boundaries are out of
/// scope for this model.
pub const WEEK_DAY_COUNT: usize = 5;

/// One person's presence on one project across a 5-day window.
///
/// `person` doubles as the grouping key; there is no separate person entity.
/// `days` is index-aligned to the week's workdays, `true` = present. Overlap
/// between assignments is allowed and is what the conflict detector reports.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentRecord {
    pub id: String,
    pub person: String,
    pub role: String,
    /// ISO date (`YYYY-MM-DD`) of the Monday the window starts on.
    pub week_start: String,
    pub days: Vec<bool>,
    pub project_id: String,
    pub project_name: String,
    pub project_short: String,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub address_detail: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    /// Presentation only: unconfirmed assignments render dimmed.
    pub confirmed: bool,
    /// Free-text line items shown in the detail view.
    #[serde(default)]
    pub positionen: Vec<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl AssignmentRecord {
    pub fn is_present(&self, day_index: usize) -> bool {
        self.days.get(day_index).copied().unwrap_or(false)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentCreateInput {
    pub person: String,
    pub role: String,
    pub week_start: String,
    pub days: Vec<bool>,
    pub project_id: String,
    pub project_name: String,
    pub project_short: String,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub address_detail: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub confirmed: Option<bool>,
    #[serde(default)]
    pub positionen: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentUpdateInput {
    #[serde(default)]
    pub person: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub week_start: Option<String>,
    #[serde(default)]
    pub days: Option<Vec<bool>>,
    #[serde(default)]
    pub project_id: Option<String>,
    #[serde(default)]
    pub project_name: Option<String>,
    #[serde(default)]
    pub project_short: Option<String>,
    #[serde(default)]
    pub address: Option<Option<String>>,
    #[serde(default)]
    pub address_detail: Option<Option<String>>,
    #[serde(default)]
    pub color: Option<Option<String>>,
    #[serde(default)]
    pub confirmed: Option<bool>,
    #[serde(default)]
    pub positionen: Option<Option<Vec<String>>>,
}
