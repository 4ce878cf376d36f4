use einsatzplan::db::repositories::assignment_repository::{AssignmentRepository, AssignmentRow};
use einsatzplan::db::DbPool;
use einsatzplan::error::AppError;
use einsatzplan::models::assignment::{AssignmentCreateInput, AssignmentUpdateInput};
use einsatzplan::services::assignment_service::AssignmentService;
use tempfile::tempdir;

fn sample_input() -> AssignmentCreateInput {
    AssignmentCreateInput {
        person: "Mehmet".into(),
        role: "Elektriker".into(),
        week_start: "2026-02-02".into(),
        days: vec![true, true, true, false, false],
        project_id: "p-schwentnerring".into(),
        project_name: "Schwentnerring 14".into(),
        project_short: "Schwentnerring".into(),
        address: Some("Schwentnerring 14, 21147 Hamburg".into()),
        address_detail: Some("2. OG links".into()),
        color: Some("#3b82f6".into()),
        positionen: Some(vec![
            "Unterverteilung setzen".into(),
            "Leitungen ziehen".into(),
        ]),
        ..Default::default()
    }
}

#[test]
fn records_survive_a_pool_round_trip() {
    let dir = tempdir().expect("temp dir");
    let db_path = dir.path().join("einsatzplan.sqlite");

    let created = {
        let pool = DbPool::new(&db_path).expect("db pool");
        let service = AssignmentService::new(pool);
        service.create_assignment(sample_input()).expect("create")
    };

    // Fresh pool over the same file: schema is idempotent, migrations rerun
    // cleanly and the record is still there.
    let pool = DbPool::new(&db_path).expect("reopened db pool");
    let service = AssignmentService::new(pool);
    let fetched = service.get_assignment(&created.id).expect("get");

    assert_eq!(fetched, created);
    assert_eq!(fetched.positionen.len(), 2);
    assert_eq!(fetched.address_detail.as_deref(), Some("2. OG links"));
}

#[test]
fn pool_creates_missing_parent_directories() {
    let dir = tempdir().expect("temp dir");
    let db_path = dir.path().join("daten").join("planung").join("einsatzplan.sqlite");

    let pool = DbPool::new(&db_path).expect("db pool");
    pool.with_connection(|_| Ok(())).expect("connection");

    assert!(db_path.exists());
}

#[test]
fn equal_timestamps_list_in_insertion_order() {
    let dir = tempdir().expect("temp dir");
    let pool = DbPool::new(dir.path().join("einsatzplan.sqlite")).expect("db pool");

    // Two records sharing one created_at, with ids chosen so that sorting by
    // id would reverse them. Insertion order must win regardless.
    let row = |id: &str, person: &str| AssignmentRow {
        id: id.into(),
        person: person.into(),
        role: "Monteur".into(),
        week_start: "2026-02-02".into(),
        days: "[true,false,false,false,false]".into(),
        project_id: "p-schwentnerring".into(),
        project_name: "Schwentnerring 14".into(),
        project_short: "Schwentnerring".into(),
        address: None,
        address_detail: None,
        color: None,
        confirmed: false,
        positionen: None,
        created_at: "2026-02-02T07:00:00+00:00".into(),
        updated_at: "2026-02-02T07:00:00+00:00".into(),
    };

    pool.with_connection(|conn| {
        AssignmentRepository::insert(conn, &row("zz-zuerst", "Mehmet"))?;
        AssignmentRepository::insert(conn, &row("aa-danach", "Ali"))?;
        Ok(())
    })
    .expect("insert rows");

    let week = pool
        .with_connection(|conn| AssignmentRepository::list_for_week(conn, "2026-02-02"))
        .expect("list for week");
    let week_ids: Vec<&str> = week.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(week_ids, vec!["zz-zuerst", "aa-danach"]);

    let all = pool
        .with_connection(|conn| AssignmentRepository::list_all(conn))
        .expect("list all");
    let all_ids: Vec<&str> = all.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(all_ids, vec!["zz-zuerst", "aa-danach"]);
}

#[test]
fn update_of_missing_record_is_not_found() {
    let dir = tempdir().expect("temp dir");
    let pool = DbPool::new(dir.path().join("einsatzplan.sqlite")).expect("db pool");
    let service = AssignmentService::new(pool);

    let result = service.update_assignment(
        "fehlt",
        AssignmentUpdateInput {
            confirmed: Some(true),
            ..Default::default()
        },
    );
    assert!(matches!(result, Err(AppError::NotFound)));

    let result = service.delete_assignment("fehlt");
    assert!(matches!(result, Err(AppError::NotFound)));
}

#[test]
fn list_for_week_rejects_malformed_dates() {
    let dir = tempdir().expect("temp dir");
    let pool = DbPool::new(dir.path().join("einsatzplan.sqlite")).expect("db pool");
    let service = AssignmentService::new(pool);

    let result = service.list_for_week("02.02.2026");
    assert!(matches!(result, Err(AppError::Validation { .. })));
}

#[test]
fn list_all_orders_by_week_then_insertion() {
    let dir = tempdir().expect("temp dir");
    let pool = DbPool::new(dir.path().join("einsatzplan.sqlite")).expect("db pool");
    let service = AssignmentService::new(pool);

    service
        .create_assignment(AssignmentCreateInput {
            week_start: "2026-02-09".into(),
            ..sample_input()
        })
        .expect("later week");
    service
        .create_assignment(sample_input())
        .expect("earlier week");

    let all = service.list_assignments().expect("list all");
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].week_start, "2026-02-02");
    assert_eq!(all[1].week_start, "2026-02-09");
}
