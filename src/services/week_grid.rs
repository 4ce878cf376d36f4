use chrono::{Datelike, Days, NaiveDate};
use serde_json::json;

use crate::error::{AppError, AppResult};
use crate::models::assignment::WEEK_DAY_COUNT;
use crate::models::calendar::WeekDay;

/// Positional workday labels. The grid always shows Mo..Fr regardless of the
/// actual weekday of the configured start date; the label is the column, not
/// the calendar.
const SHORT_LABELS: [&str; WEEK_DAY_COUNT] = ["Mo", "Di", "Mi", "Do", "Fr"];

pub fn parse_week_start(value: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|err| {
        AppError::validation_with_details(
            "Ungültiges Datumsformat für Wochenstart",
            json!({ "value": value, "error": err.to_string() }),
        )
    })
}

pub fn format_week_start(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Builds the 5 ordered workday columns of one planning window. Dates are
/// `week_start + 0..4` days; month-boundary carry is plain date arithmetic.
pub fn build_week_days(week_start: NaiveDate) -> AppResult<Vec<WeekDay>> {
    let mut days = Vec::with_capacity(WEEK_DAY_COUNT);
    for (index, short_label) in SHORT_LABELS.iter().enumerate() {
        let date = week_start
            .checked_add_days(Days::new(index as u64))
            .ok_or_else(|| AppError::validation("Datum außerhalb des darstellbaren Bereichs"))?;
        days.push(WeekDay {
            key: short_label.to_lowercase(),
            short_label: short_label.to_string(),
            date_label: format!("{:02}.{:02}.", date.day(), date.month()),
            day_number: date.day(),
            date,
        });
    }
    Ok(days)
}
