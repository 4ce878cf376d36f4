use chrono::NaiveDate;
use einsatzplan::db::DbPool;
use einsatzplan::models::assignment::AssignmentCreateInput;
use einsatzplan::services::assignment_service::AssignmentService;
use einsatzplan::services::planning_service::{bar_spans, PlanningService};
use tempfile::tempdir;

fn create(
    service: &AssignmentService,
    person: &str,
    role: &str,
    project_short: &str,
    days: [bool; 5],
) {
    service
        .create_assignment(AssignmentCreateInput {
            person: person.into(),
            role: role.into(),
            week_start: "2026-02-02".into(),
            days: days.to_vec(),
            project_id: format!("p-{}", project_short.to_lowercase()),
            project_name: format!("{} (Bauvorhaben)", project_short),
            project_short: project_short.into(),
            address: Some("Schwentnerring 14, 21147 Hamburg".into()),
            color: Some("#f59e0b".into()),
            ..Default::default()
        })
        .expect("create assignment");
}

#[test]
fn week_overview_derives_rows_and_conflicts_from_stored_assignments() {
    let dir = tempdir().expect("temp dir");
    einsatzplan::utils::logger::init_logging(dir.path()).expect("logger");
    let pool = DbPool::new(dir.path().join("einsatzplan.sqlite")).expect("db pool");

    let assignments = AssignmentService::new(pool.clone());
    let planning = PlanningService::new(pool.clone());

    // Mehmet is double-booked on Wednesday; Ali and Stefan share a project
    // but never a day with anyone.
    create(
        &assignments,
        "Mehmet",
        "Elektriker",
        "Schwentnerring",
        [true, true, true, false, false],
    );
    create(
        &assignments,
        "Mehmet",
        "Elektriker",
        "Elektro-Auftrag",
        [false, false, true, true, false],
    );
    create(
        &assignments,
        "Ali",
        "Trockenbauer",
        "Schwentnerring",
        [false, false, true, true, true],
    );
    create(
        &assignments,
        "Stefan",
        "Maler",
        "Schwentnerring",
        [true, true, false, false, false],
    );

    let monday = NaiveDate::from_ymd_opt(2026, 2, 2).expect("monday");
    let plan = planning.week_overview(monday).expect("week overview");

    assert_eq!(plan.week.len(), 5);
    assert_eq!(plan.week[0].date_label, "02.02.");
    assert_eq!(plan.week[4].date_label, "06.02.");

    // Row order follows first appearance; every assignment lands exactly once.
    let persons: Vec<&str> = plan.rows.iter().map(|row| row.person.as_str()).collect();
    assert_eq!(persons, vec!["Mehmet", "Ali", "Stefan"]);
    let total: usize = plan.rows.iter().map(|row| row.assignments.len()).sum();
    assert_eq!(total, 4);

    assert_eq!(plan.conflicts.len(), 1);
    let conflict = &plan.conflicts[0];
    assert_eq!(conflict.person, "Mehmet");
    assert_eq!(conflict.day_index, 2);
    assert_eq!(conflict.day_label, "Mi");
    assert_eq!(conflict.projects, vec!["Schwentnerring", "Elektro-Auftrag"]);

    // Layout: Mehmet's first assignment renders as one Mo-Mi bar.
    let mehmet = &plan.rows[0];
    let spans = bar_spans(&mehmet.assignments[0]);
    assert_eq!(spans.len(), 1);
    assert_eq!((spans[0].start_day, spans[0].end_day), (0, 2));
    assert!(spans[0].rounded_left(0));
    assert!(spans[0].rounded_right(2));
    assert!(!spans[0].rounded_left(1));
    assert!(!spans[0].rounded_right(1));
}

#[test]
fn week_overview_ignores_other_weeks() {
    let dir = tempdir().expect("temp dir");
    let pool = DbPool::new(dir.path().join("einsatzplan.sqlite")).expect("db pool");

    let assignments = AssignmentService::new(pool.clone());
    let planning = PlanningService::new(pool.clone());

    create(
        &assignments,
        "Ali",
        "Trockenbauer",
        "Schwentnerring",
        [true, true, true, true, true],
    );
    assignments
        .create_assignment(AssignmentCreateInput {
            person: "Ali".into(),
            role: "Trockenbauer".into(),
            week_start: "2026-02-09".into(),
            days: vec![true, true, true, true, true],
            project_id: "p-altbau".into(),
            project_name: "Altbau Harburg".into(),
            project_short: "Altbau".into(),
            ..Default::default()
        })
        .expect("create assignment in next week");

    let monday = NaiveDate::from_ymd_opt(2026, 2, 2).expect("monday");
    let plan = planning.week_overview(monday).expect("week overview");

    assert_eq!(plan.rows.len(), 1);
    assert_eq!(plan.rows[0].assignments.len(), 1);
    assert_eq!(plan.rows[0].assignments[0].project_short, "Schwentnerring");
    assert!(plan.conflicts.is_empty());
}

#[test]
fn empty_week_yields_empty_plan() {
    let dir = tempdir().expect("temp dir");
    let pool = DbPool::new(dir.path().join("einsatzplan.sqlite")).expect("db pool");
    let planning = PlanningService::new(pool);

    let monday = NaiveDate::from_ymd_opt(2026, 2, 2).expect("monday");
    let plan = planning.week_overview(monday).expect("week overview");

    assert_eq!(plan.week.len(), 5);
    assert!(plan.rows.is_empty());
    assert!(plan.conflicts.is_empty());
}
