use std::future::Future;
use std::sync::Arc;

use birthday_reminder_bot::database::connection::DatabaseManager;
use birthday_reminder_bot::database::models::{Employee, NewEmployee, Position};
use birthday_reminder_bot::error::{BotError, Result};
use birthday_reminder_bot::services::birthday::{BirthdayScanJob, BirthdayService};
use birthday_reminder_bot::services::notifier::Notifier;
use chrono::{Datelike, NaiveDate, Timelike};
use teloxide::types::ChatId;
use tempfile::TempDir;
use tokio::sync::{Mutex, Notify};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Sent {
    Text { to: ChatId, text: String },
    Photo { to: ChatId, photo: String, caption: String },
}

/// Records every announcement; deliveries to `failing` chats error out.
#[derive(Default)]
struct RecordingNotifier {
    sent: Arc<Mutex<Vec<Sent>>>,
    failing: Vec<ChatId>,
}

impl RecordingNotifier {
    fn check(&self, to: ChatId) -> Result<()> {
        if self.failing.contains(&to) {
            return Err(BotError::Dispatch(teloxide::RequestError::Api(
                teloxide::ApiError::Unknown("chat not found".to_string()),
            )));
        }
        Ok(())
    }
}

impl Notifier for RecordingNotifier {
    fn send_text(&self, to: ChatId, text: String) -> impl Future<Output = Result<()>> + Send {
        async move {
            self.check(to)?;
            self.sent.lock().await.push(Sent::Text { to, text });
            Ok(())
        }
    }

    fn send_photo(
        &self,
        to: ChatId,
        photo: String,
        caption: String,
    ) -> impl Future<Output = Result<()>> + Send {
        async move {
            self.check(to)?;
            self.sent.lock().await.push(Sent::Photo { to, photo, caption });
            Ok(())
        }
    }
}

/// Holds every delivery until released.
struct BlockingNotifier {
    entered: Arc<Notify>,
    release: Arc<Notify>,
}

impl Notifier for BlockingNotifier {
    fn send_text(&self, _to: ChatId, _text: String) -> impl Future<Output = Result<()>> + Send {
        async move {
            self.entered.notify_one();
            self.release.notified().await;
            Ok(())
        }
    }

    fn send_photo(
        &self,
        to: ChatId,
        _photo: String,
        caption: String,
    ) -> impl Future<Output = Result<()>> + Send {
        self.send_text(to, caption)
    }
}

async fn setup_test_db() -> (Arc<DatabaseManager>, TempDir) {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let db_url = format!("sqlite://{}", temp_dir.path().join("test.db").display());

    let db = DatabaseManager::new(&db_url)
        .await
        .expect("Failed to create test database");
    db.run_migrations().await.expect("Failed to run migrations");
    Position::create(&db.pool, "Engineer").await.unwrap();

    (Arc::new(db), temp_dir)
}

async fn add_employee(db: &DatabaseManager, first: &str, last: &str, birth: NaiveDate, photo: Option<&str>) {
    let new = NewEmployee {
        first_name: first.to_string(),
        last_name: last.to_string(),
        birth_date: birth,
        position_name: "Engineer".to_string(),
        photo_reference: photo.map(str::to_string),
    };
    Employee::insert(&db.pool, &new).await.unwrap();
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[tokio::test]
async fn test_scan_sends_photo_to_every_admin() {
    let (db, _temp_dir) = setup_test_db().await;
    add_employee(&db, "Anna", "Lee", date(1990, 7, 4), Some("p1")).await;
    add_employee(&db, "Cara", "Moss", date(1990, 7, 5), None).await;

    let notifier = RecordingNotifier::default();
    let sent = notifier.sent.clone();
    let admins = vec![ChatId(11), ChatId(22)];
    let job = BirthdayScanJob::new(notifier, db, admins.clone(), chrono_tz::Asia::Tashkent);

    let report = job.scan_on(date(2024, 7, 4)).await.unwrap();
    assert_eq!(report.matches, 1);
    assert_eq!(report.delivered, 2);
    assert_eq!(report.failed, 0);

    let sent = sent.lock().await;
    assert_eq!(sent.len(), 2);
    for (message, admin) in sent.iter().zip(&admins) {
        match message {
            Sent::Photo { to, photo, caption } => {
                assert_eq!(to, admin);
                assert_eq!(photo, "p1");
                assert!(caption.contains("Anna Lee"));
                assert!(caption.contains("Engineer"));
            }
            other => panic!("Expected a photo announcement, got {other:?}"),
        }
    }
}

#[tokio::test]
async fn test_scan_falls_back_to_text_without_photo() {
    let (db, _temp_dir) = setup_test_db().await;
    add_employee(&db, "Ben", "Ash", date(1985, 12, 31), None).await;

    let notifier = RecordingNotifier::default();
    let sent = notifier.sent.clone();
    let job = BirthdayScanJob::new(notifier, db, vec![ChatId(11)], chrono_tz::UTC);

    let report = job.scan_on(date(2025, 12, 31)).await.unwrap();
    assert_eq!(report.delivered, 1);

    let sent = sent.lock().await;
    match sent.as_slice() {
        [Sent::Text { to, text }] => {
            assert_eq!(*to, ChatId(11));
            assert!(text.contains("Ben Ash"));
        }
        other => panic!("Expected one text announcement, got {other:?}"),
    }
}

#[tokio::test]
async fn test_scan_with_no_birthdays_sends_nothing() {
    let (db, _temp_dir) = setup_test_db().await;
    add_employee(&db, "Anna", "Lee", date(1990, 7, 4), Some("p1")).await;

    let notifier = RecordingNotifier::default();
    let sent = notifier.sent.clone();
    let job = BirthdayScanJob::new(notifier, db, vec![ChatId(11)], chrono_tz::UTC);

    let report = job.scan_on(date(2024, 3, 1)).await.unwrap();
    assert_eq!(report.matches, 0);
    assert!(sent.lock().await.is_empty());
}

#[tokio::test]
async fn test_delivery_failure_does_not_stop_scan() {
    let (db, _temp_dir) = setup_test_db().await;
    add_employee(&db, "Anna", "Lee", date(1990, 7, 4), Some("p1")).await;
    add_employee(&db, "Ben", "Ash", date(2001, 7, 4), None).await;

    let notifier = RecordingNotifier {
        failing: vec![ChatId(11)],
        ..Default::default()
    };
    let sent = notifier.sent.clone();
    let job = BirthdayScanJob::new(notifier, db, vec![ChatId(11), ChatId(22)], chrono_tz::UTC);

    let report = job.scan_on(date(2024, 7, 4)).await.unwrap();
    assert_eq!(report.matches, 2);
    assert_eq!(report.failed, 2);
    assert_eq!(report.delivered, 2);

    let sent = sent.lock().await;
    assert_eq!(sent.len(), 2);
    assert!(sent.iter().all(|s| match s {
        Sent::Text { to, .. } | Sent::Photo { to, .. } => *to == ChatId(22),
    }));
}

#[tokio::test]
async fn test_overlapping_trigger_is_skipped() {
    let (db, _temp_dir) = setup_test_db().await;
    // trigger() reads the clock itself; cover the next day too in case the
    // run straddles midnight. 2000 is a leap year, so any calendar day exists.
    let today = chrono::Utc::now().date_naive();
    let tomorrow = today.succ_opt().unwrap();
    add_employee(&db, "Anna", "Lee", date(2000, today.month(), today.day()), None).await;
    add_employee(&db, "Ben", "Ash", date(2000, tomorrow.month(), tomorrow.day()), None).await;

    let entered = Arc::new(Notify::new());
    let release = Arc::new(Notify::new());
    let notifier = BlockingNotifier {
        entered: entered.clone(),
        release: release.clone(),
    };
    let job = Arc::new(BirthdayScanJob::new(notifier, db, vec![ChatId(11)], chrono_tz::UTC));
    let status = job.status();

    let running = {
        let job = job.clone();
        tokio::spawn(async move { job.trigger().await })
    };

    entered.notified().await;
    assert!(status.read().await.running);
    assert_eq!(job.trigger().await, None);

    release.notify_one();
    let report = running.await.unwrap().expect("first run should finish");
    assert!(report.date == today || report.date == tomorrow);
    assert_eq!(report.matches, 1);
    assert_eq!(report.delivered, 1);

    let status = status.read().await;
    assert!(!status.running);
    assert!(status.last_run.is_some());
    assert_eq!(status.last_report, Some(report));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_service_schedules_daily_at_configured_time() {
    let (db, _temp_dir) = setup_test_db().await;
    let job = BirthdayScanJob::new(RecordingNotifier::default(), db, vec![ChatId(11)], chrono_tz::Asia::Tashkent);

    let mut service = BirthdayService::new(job, 16, 52).await.unwrap();
    assert_eq!(service.cron_expression(), "0 52 16 * * *");

    assert_eq!(service.next_run().await.unwrap(), None);
    service.start().await.unwrap();

    // 16:52 in Tashkent (UTC+5, no DST) is 11:52 UTC
    let next = service.next_run().await.unwrap().expect("job should be scheduled");
    let local = next.with_timezone(&chrono_tz::Asia::Tashkent);
    assert_eq!((local.hour(), local.minute(), local.second()), (16, 52, 0));
    assert_eq!((next.hour(), next.minute()), (11, 52));
    let now = chrono::Utc::now();
    assert!(next > now);
    assert!(next - now <= chrono::Duration::hours(24));

    let report = service.scan_now().await.expect("manual scan should run");
    assert_eq!(report.matches, 0);
    assert_eq!(service.status().read().await.last_report, Some(report));

    service.stop().await.unwrap();
}
