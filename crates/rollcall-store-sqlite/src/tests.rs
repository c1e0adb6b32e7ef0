//! Integration tests for `SqliteStore` against an in-memory database.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use rollcall_core::{
  model::{AttendanceStatus, NewAttendance, NewClass, NewStudent},
  store::{AttendanceStore, FailureKind, StoreError},
};

use crate::{Error, SqliteStore};

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn new_class(name: &str) -> NewClass {
  NewClass {
    name:     name.into(),
    teacher:  "Prof. Smith".into(),
    schedule: Some("Mon 09:00".into()),
  }
}

fn new_student(code: &str, name: &str, class_id: Option<i64>) -> NewStudent {
  NewStudent {
    code: code.into(),
    name: name.into(),
    email: None,
    class_id,
  }
}

fn date(d: u32) -> NaiveDate { NaiveDate::from_ymd_opt(2024, 3, d).unwrap() }

fn at(d: u32, h: u32, m: u32) -> DateTime<Utc> {
  Utc.with_ymd_and_hms(2024, 3, d, h, m, 0).unwrap()
}

fn present(student_id: i64, class_id: i64, ts: DateTime<Utc>) -> NewAttendance {
  NewAttendance {
    student_id,
    class_id,
    date: ts.date_naive(),
    status: AttendanceStatus::Present,
    timestamp: ts,
  }
}

// ─── Classes ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn add_and_list_classes() {
  let s = store().await;
  let a = s.add_class(new_class("Physics 301")).await.unwrap();
  let b = s.add_class(new_class("Chemistry 202")).await.unwrap();
  assert_ne!(a, b);

  let classes = s.list_classes().await.unwrap();
  assert_eq!(classes.len(), 2);
  assert_eq!(classes[0].id, a);
  assert_eq!(classes[0].name, "Physics 301");
  assert_eq!(classes[0].schedule.as_deref(), Some("Mon 09:00"));
}

// ─── Students ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn list_students_all_and_by_class() {
  let s = store().await;
  let a = s.add_class(new_class("A")).await.unwrap();
  let b = s.add_class(new_class("B")).await.unwrap();
  s.add_student(new_student("ST1", "Ada", Some(a))).await.unwrap();
  s.add_student(new_student("ST2", "Brian", Some(b))).await.unwrap();
  s.add_student(new_student("ST3", "Chloe", None)).await.unwrap();

  let all = s.list_students(None).await.unwrap();
  assert_eq!(all.len(), 3);
  assert_eq!(all[2].class_id, None);

  let in_a = s.list_students(Some(a)).await.unwrap();
  assert_eq!(in_a.len(), 1);
  assert_eq!(in_a[0].code, "ST1");
  assert_eq!(in_a[0].class_id, Some(a));
}

#[tokio::test]
async fn student_codes_are_normalized() {
  let s = store().await;
  s.add_student(new_student("  st42 ", "Dana", None)).await.unwrap();
  let all = s.list_students(None).await.unwrap();
  assert_eq!(all[0].code, "ST42");
}

#[tokio::test]
async fn duplicate_student_code_is_a_conflict() {
  let s = store().await;
  s.add_student(new_student("ST1", "Ada", None)).await.unwrap();

  let err = s
    .add_student(new_student("st1", "Someone Else", None))
    .await
    .unwrap_err();
  assert!(matches!(&err, Error::DuplicateStudentCode(c) if c == "ST1"));
  assert_eq!(err.kind(), FailureKind::Conflict);
  assert_eq!(s.list_students(None).await.unwrap().len(), 1);
}

#[tokio::test]
async fn student_with_unknown_class_is_rejected() {
  let s = store().await;
  let err = s
    .add_student(new_student("ST1", "Ada", Some(404)))
    .await
    .unwrap_err();
  assert_eq!(err.kind(), FailureKind::MissingReference);
}

// ─── Attendance ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn class_attendance_is_ordered_by_timestamp() {
  let s = store().await;
  let class = s.add_class(new_class("A")).await.unwrap();
  let ada = s.add_student(new_student("ST1", "Ada", Some(class))).await.unwrap();
  let bri = s.add_student(new_student("ST2", "Brian", Some(class))).await.unwrap();

  let late = s.record_attendance(present(ada, class, at(5, 9, 20))).await.unwrap();
  let early = s.record_attendance(present(bri, class, at(5, 9, 1))).await.unwrap();
  // Another day, must not show up.
  s.record_attendance(present(ada, class, at(6, 9, 0))).await.unwrap();

  let sheet = s.class_attendance(class, date(5)).await.unwrap();
  assert_eq!(sheet.len(), 2);
  assert_eq!(sheet[0].record.id, early);
  assert_eq!(sheet[0].sid, "ST2");
  assert_eq!(sheet[0].name, "Brian");
  assert_eq!(sheet[1].record.id, late);
  assert_eq!(sheet[1].record.timestamp, at(5, 9, 20));
  assert_eq!(sheet[1].record.status, AttendanceStatus::Present);
}

#[tokio::test]
async fn student_attendance_is_most_recent_first() {
  let s = store().await;
  let a = s.add_class(new_class("Physics 301")).await.unwrap();
  let b = s.add_class(new_class("Chemistry 202")).await.unwrap();
  let ada = s.add_student(new_student("ST1", "Ada", Some(a))).await.unwrap();

  s.record_attendance(present(ada, a, at(4, 9, 0))).await.unwrap();
  s.record_attendance(present(ada, b, at(6, 9, 0))).await.unwrap();
  s.record_attendance(present(ada, a, at(5, 9, 0))).await.unwrap();

  let history = s.student_attendance(ada).await.unwrap();
  let dates: Vec<_> = history.iter().map(|e| e.record.date).collect();
  assert_eq!(dates, [date(6), date(5), date(4)]);
  assert_eq!(history[0].class_name, "Chemistry 202");
  assert_eq!(history[1].class_name, "Physics 301");
}

#[tokio::test]
async fn duplicate_check_ins_are_stored() {
  let s = store().await;
  let class = s.add_class(new_class("A")).await.unwrap();
  let ada = s.add_student(new_student("ST1", "Ada", Some(class))).await.unwrap();

  s.record_attendance(present(ada, class, at(5, 9, 0))).await.unwrap();
  s.record_attendance(present(ada, class, at(5, 9, 1))).await.unwrap();

  assert_eq!(s.class_attendance(class, date(5)).await.unwrap().len(), 2);
}

#[tokio::test]
async fn attendance_for_unknown_student_is_rejected() {
  let s = store().await;
  let class = s.add_class(new_class("A")).await.unwrap();
  let err = s
    .record_attendance(present(999, class, at(5, 9, 0)))
    .await
    .unwrap_err();
  assert!(matches!(err, Error::MissingReference(_)));
}

#[tokio::test]
async fn other_statuses_roundtrip() {
  let s = store().await;
  let class = s.add_class(new_class("A")).await.unwrap();
  let ada = s.add_student(new_student("ST1", "Ada", Some(class))).await.unwrap();

  let mut input = present(ada, class, at(5, 9, 0));
  input.status = AttendanceStatus::Excused;
  s.record_attendance(input).await.unwrap();

  let sheet = s.class_attendance(class, date(5)).await.unwrap();
  assert_eq!(sheet[0].record.status, AttendanceStatus::Excused);
}

// ─── Seeding ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn seed_fills_an_empty_store_once() {
  let s = store().await;
  assert!(s.seed_sample_data().await.unwrap());
  assert!(!s.seed_sample_data().await.unwrap());

  let classes = s.list_classes().await.unwrap();
  assert_eq!(classes.len(), 5);
  assert_eq!(classes[0].name, "Computer Science 101");

  let roster = s.list_students(Some(classes[0].id)).await.unwrap();
  let codes: Vec<_> = roster.iter().map(|s| s.code.as_str()).collect();
  assert_eq!(codes, ["ST92731", "ST84521", "ST73642"]);
}

#[tokio::test]
async fn seed_skips_a_store_with_classes() {
  let s = store().await;
  s.add_class(new_class("Existing")).await.unwrap();
  assert!(!s.seed_sample_data().await.unwrap());
  assert_eq!(s.list_classes().await.unwrap().len(), 1);
  assert!(s.list_students(None).await.unwrap().is_empty());
}
