//! Integration tests for `Directory`.

mod common;

use assert_matches::assert_matches;
use chrono::{Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use presence_core::error::CoreError;
use presence_core::export::{ExportLocale, BOM};
use presence_core::geo::GeoLocation;
use presence_core::settings::PresenceSettings;
use presence_db::models::department::CreateDepartment;
use presence_db::models::employee::{CreateEmployee, UpdateEmployee};
use presence_db::StoreError;
use presence_engine::EngineError;

use common::{env, env_with};

// ---------------------------------------------------------------------------
// Department tree
// ---------------------------------------------------------------------------

#[tokio::test]
async fn status_set_on_employee_without_one_shows_in_department_tree() {
    let env = env();
    let sales = env.department("Sales").await;
    let eng = env.department("Engineering").await;
    let colleague = env.employee(eng, "Ken").await;
    let emp = env.employee(eng, "Yuki").await;
    assert!(env.presence.get_status(emp.id).await.is_err());

    let saved = env
        .presence
        .set_status(emp.id, "on-site", Some("at my desk"), GeoLocation::default())
        .await
        .unwrap();
    assert_eq!(saved.status, "on-site");
    assert_eq!(saved.comment.as_deref(), Some("at my desk"));
    assert_eq!(saved.last_updated, env.clock.now());

    let tree = env.directory.get_departments_with_employees().await.unwrap();
    let ids: Vec<_> = tree.iter().map(|d| d.department.id).collect();
    assert_eq!(ids, vec![sales, eng]);
    assert!(tree[0].employees.is_empty());

    let members = &tree[1].employees;
    assert_eq!(members.len(), 2);
    assert_eq!(members[0].employee.id, colleague.id);
    assert_eq!(members[0].status, None);
    assert_eq!(members[1].employee.id, emp.id);
    assert_eq!(members[1].status.as_ref(), Some(&saved));
}

#[tokio::test]
async fn inactive_employees_are_left_out_of_the_tree() {
    let env = env();
    let eng = env.department("Engineering").await;
    let stays = env.employee(eng, "Mio").await;
    let leaves = env.employee(eng, "Sota").await;

    env.directory.deactivate_employee(leaves.id).await.unwrap();

    let tree = env.directory.get_departments_with_employees().await.unwrap();
    let ids: Vec<_> = tree[0].employees.iter().map(|e| e.employee.id).collect();
    assert_eq!(ids, vec![stays.id]);

    // Still listed and readable individually.
    assert_eq!(env.directory.list_employees().await.unwrap().len(), 2);
    let detail = env.directory.get_employee_with_status(leaves.id).await.unwrap();
    assert!(!detail.employee.is_active);
}

#[tokio::test]
async fn tree_serializes_with_null_status() {
    let env = env();
    let eng = env.department("Engineering").await;
    env.employee(eng, "Hina").await;

    let tree = env.directory.get_departments_with_employees().await.unwrap();
    let json = serde_json::to_value(&tree).unwrap();

    assert_eq!(json[0]["name"], "Engineering");
    assert_eq!(json[0]["icon"], "building");
    assert_eq!(json[0]["employees"][0]["first_name"], "Hina");
    assert!(json[0]["employees"][0]["status"].is_null());
}

// ---------------------------------------------------------------------------
// Employee detail and admin writes
// ---------------------------------------------------------------------------

#[tokio::test]
async fn employee_detail_embeds_department_and_status() {
    let env = env();
    let eng = env.department("Engineering").await;
    let emp = env.employee(eng, "Rin").await;
    env.presence
        .set_status(emp.id, "remote", None, GeoLocation::default())
        .await
        .unwrap();

    let detail = env.directory.get_employee_with_status(emp.id).await.unwrap();
    assert_eq!(detail.employee, emp);
    assert_eq!(detail.department.map(|d| d.id), Some(eng));
    assert_eq!(detail.status.map(|s| s.status), Some("remote".to_string()));

    let err = env.directory.get_employee_with_status(999).await.unwrap_err();
    assert_matches!(err, EngineError::Core(CoreError::NotFound { .. }));
}

#[tokio::test]
async fn create_employee_validates_input() {
    let env = env();
    let eng = env.department("Engineering").await;

    let err = env
        .directory
        .create_employee(CreateEmployee {
            first_name: String::new(),
            last_name: "Kato".to_string(),
            first_name_ja: "".to_string(),
            last_name_ja: "加藤".to_string(),
            email: "not-an-email".to_string(),
            position: "Engineer".to_string(),
            position_ja: "エンジニア".to_string(),
            department_id: eng,
            profile_image_url: None,
        })
        .await
        .unwrap_err();
    assert_matches!(err, EngineError::Core(CoreError::Validation(_)));

    let err = env
        .directory
        .create_department(CreateDepartment {
            name: String::new(),
            name_ja: "空".to_string(),
            icon: None,
        })
        .await
        .unwrap_err();
    assert_matches!(err, EngineError::Core(CoreError::Validation(_)));
}

#[tokio::test]
async fn duplicate_email_surfaces_as_store_conflict() {
    let env = env();
    let eng = env.department("Engineering").await;
    let first = env.employee(eng, "Akira").await;
    let second = env.employee(eng, "Daiki").await;

    let err = env
        .directory
        .update_employee(
            second.id,
            UpdateEmployee {
                email: Some(first.email.clone()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert_matches!(err, EngineError::Store(StoreError::Conflict { .. }));

    let err = env
        .directory
        .update_employee(999, UpdateEmployee::default())
        .await
        .unwrap_err();
    assert_matches!(err, EngineError::Core(CoreError::NotFound { .. }));
}

// ---------------------------------------------------------------------------
// CSV export
// ---------------------------------------------------------------------------

#[tokio::test]
async fn export_round_trips_dates_times_and_status() {
    let env = env();
    let eng = env.department("Engineering").await;
    let emp = env.employee(eng, "Kenta").await;

    for (day, status) in [(5, "on-site"), (6, "remote")] {
        env.clock.set(Utc.with_ymd_and_hms(2024, 2, day, 0, 5, 3).unwrap());
        env.attendance
            .clock_in(emp.id, status, GeoLocation::named("Tokyo HQ"))
            .await
            .unwrap();
        env.clock.advance(Duration::minutes(510));
        env.attendance
            .clock_out(emp.id, GeoLocation::default())
            .await
            .unwrap();
    }

    let csv = env
        .directory
        .export_monthly_attendance_csv(emp.id, 2024, 2)
        .await
        .unwrap();
    assert!(csv.starts_with(BOM));

    let body = csv.trim_start_matches(BOM);
    let mut reader = csv::Reader::from_reader(body.as_bytes());
    let headers = reader.headers().unwrap().clone();
    assert_eq!(&headers[0], "日付");

    let rows: Vec<csv::StringRecord> = reader.records().map(Result::unwrap).collect();
    assert_eq!(rows.len(), 2);

    // Newest first.
    let first = &rows[0];
    assert_eq!(
        NaiveDate::parse_from_str(&first[0], "%Y/%m/%d").unwrap(),
        NaiveDate::from_ymd_opt(2024, 2, 6).unwrap()
    );
    assert_eq!(
        NaiveTime::parse_from_str(&first[1], "%H:%M:%S").unwrap(),
        NaiveTime::from_hms_opt(9, 5, 3).unwrap()
    );
    assert_eq!(
        NaiveTime::parse_from_str(&first[2], "%H:%M:%S").unwrap(),
        NaiveTime::from_hms_opt(17, 35, 3).unwrap()
    );
    assert_eq!(&first[3], "8時間30分");
    assert_eq!(&first[4], "remote");
    assert_eq!(&first[5], "Tokyo HQ");
    assert_eq!(&first[6], "");
    assert_eq!(&rows[1][4], "on-site");
}

#[tokio::test]
async fn english_export_uses_english_headers() {
    let env = env_with(PresenceSettings {
        export_locale: ExportLocale::En,
        ..PresenceSettings::default()
    });
    let eng = env.department("Engineering").await;
    let emp = env.employee(eng, "Mao").await;
    env.attendance
        .clock_in(emp.id, "on-site", GeoLocation::default())
        .await
        .unwrap();

    let csv = env
        .directory
        .export_monthly_attendance_csv(emp.id, 2024, 2)
        .await
        .unwrap();
    let mut lines = csv.trim_start_matches(BOM).lines();
    assert_eq!(
        lines.next(),
        Some("date,clock-in time,clock-out time,work duration,status,clock-in location,clock-out location")
    );
    assert_eq!(lines.next(), Some("2024-02-05,09:00:00,,,on-site,,"));
    assert_eq!(lines.next(), None);
}

#[tokio::test]
async fn export_of_empty_month_is_header_only() {
    let env = env();
    let csv = env
        .directory
        .export_monthly_attendance_csv(1, 2023, 12)
        .await
        .unwrap();
    assert_eq!(csv.trim_start_matches(BOM).lines().count(), 1);

    let err = env
        .directory
        .export_monthly_attendance_csv(1, 2024, 13)
        .await
        .unwrap_err();
    assert_matches!(err, EngineError::Core(CoreError::Validation(_)));
}
