use std::sync::Arc;

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use chrono_tz::Tz;
use serde::Serialize;
use teloxide::types::ChatId;
use tokio::sync::{Mutex, RwLock};
use tokio_cron_scheduler::{Job, JobScheduler};
use uuid::Uuid;

use crate::database::{connection::DatabaseManager, models::*};
use crate::error::Result;
use crate::services::notifier::Notifier;
use crate::utils::datetime::local_date;
use crate::utils::logging::{log_dispatch_error, log_system_event};

/// Outcome of one birthday scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScanReport {
    pub date: NaiveDate,
    pub matches: usize,
    pub delivered: usize,
    pub failed: usize,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ScanStatus {
    pub running: bool,
    pub last_run: Option<DateTime<Utc>>,
    pub last_report: Option<ScanReport>,
}

pub type ScanStatusHandle = Arc<RwLock<ScanStatus>>;

pub fn birthday_message(employee: &BirthdayMatch) -> String {
    format!(
        "🎂 Today is the birthday of {} {} ({})!",
        employee.first_name, employee.last_name, employee.position_name
    )
}

/// Looks up today's birthdays and announces each one to every admin.
pub struct BirthdayScanJob<N> {
    notifier: N,
    db: Arc<DatabaseManager>,
    recipients: Vec<ChatId>,
    timezone: Tz,
    in_flight: Mutex<()>,
    status: ScanStatusHandle,
}

impl<N: Notifier> BirthdayScanJob<N> {
    pub fn new(notifier: N, db: Arc<DatabaseManager>, recipients: Vec<ChatId>, timezone: Tz) -> Self {
        Self {
            notifier,
            db,
            recipients,
            timezone,
            in_flight: Mutex::new(()),
            status: ScanStatusHandle::default(),
        }
    }

    pub fn status(&self) -> ScanStatusHandle {
        self.status.clone()
    }

    /// Runs a scan for today's date in the configured timezone.
    ///
    /// Returns `None` when a previous run is still in flight or the scan
    /// could not read the employee table.
    pub async fn trigger(&self) -> Option<ScanReport> {
        tracing::debug!("Birthday scan triggered");

        let Ok(_running) = self.in_flight.try_lock() else {
            tracing::warn!("Birthday scan already running, skipping this trigger");
            return None;
        };

        self.status.write().await.running = true;
        let today = local_date(Utc::now(), self.timezone);
        let result = self.scan_on(today).await;

        let mut status = self.status.write().await;
        status.running = false;
        status.last_run = Some(Utc::now());

        match result {
            Ok(report) => {
                log_system_event(
                    "Birthday scan finished",
                    Some(&format!(
                        "{}: {} birthdays, {} delivered, {} failed",
                        report.date, report.matches, report.delivered, report.failed
                    )),
                );
                status.last_report = Some(report.clone());
                Some(report)
            }
            Err(e) => {
                tracing::error!("Birthday scan for {} failed: {}", today, e);
                None
            }
        }
    }

    /// Announces every employee born on `date`'s month and day.
    /// Delivery failures are logged and counted, never propagated.
    pub async fn scan_on(&self, date: NaiveDate) -> Result<ScanReport> {
        let employees = Employee::born_on(&self.db.pool, date.month(), date.day()).await?;

        let mut report = ScanReport {
            date,
            matches: employees.len(),
            delivered: 0,
            failed: 0,
        };

        for employee in &employees {
            let message = birthday_message(employee);
            let subject = format!("{} {}", employee.first_name, employee.last_name);

            for recipient in &self.recipients {
                tracing::info!("Sending birthday reminder for {} to admin {}", subject, recipient.0);

                let sent = match &employee.photo_reference {
                    Some(photo) => {
                        self.notifier
                            .send_photo(*recipient, photo.clone(), message.clone())
                            .await
                    }
                    None => self.notifier.send_text(*recipient, message.clone()).await,
                };

                match sent {
                    Ok(()) => report.delivered += 1,
                    Err(e) => {
                        log_dispatch_error(recipient.0, &subject, &e.to_string());
                        report.failed += 1;
                    }
                }
            }
        }

        Ok(report)
    }
}

/// Fires the birthday scan once a day at a fixed local time.
pub struct BirthdayService<N> {
    job: Arc<BirthdayScanJob<N>>,
    scheduler: JobScheduler,
    scheduled: Option<Uuid>,
    hour: u32,
    minute: u32,
}

impl<N: Notifier + 'static> BirthdayService<N> {
    pub async fn new(
        job: BirthdayScanJob<N>,
        hour: u32,
        minute: u32,
    ) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        let scheduler = JobScheduler::new().await?;

        Ok(Self {
            job: Arc::new(job),
            scheduler,
            scheduled: None,
            hour,
            minute,
        })
    }

    pub fn cron_expression(&self) -> String {
        daily_cron(self.hour, self.minute)
    }

    pub async fn start(&mut self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let job = self.job.clone();
        let timezone = job.timezone;

        let scan_job = Job::new_async_tz(self.cron_expression().as_str(), timezone, move |_uuid, _l| {
            let job = job.clone();
            Box::pin(async move {
                job.trigger().await;
            })
        })?;

        self.scheduled = Some(self.scheduler.add(scan_job).await?);
        self.scheduler.start().await?;

        tracing::info!(
            "Birthday service started - scanning daily at {:02}:{:02} {}",
            self.hour,
            self.minute,
            timezone
        );
        Ok(())
    }

    pub async fn stop(&mut self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.scheduler.shutdown().await?;
        Ok(())
    }

    /// Next instant the daily scan fires, or `None` before [`start`](Self::start).
    pub async fn next_run(&mut self) -> Result<Option<DateTime<Utc>>, Box<dyn std::error::Error + Send + Sync>> {
        let Some(id) = self.scheduled else {
            return Ok(None);
        };
        Ok(self.scheduler.next_tick_for_job(id).await?)
    }

    // Manual trigger for testing
    pub async fn scan_now(&self) -> Option<ScanReport> {
        self.job.trigger().await
    }

    pub fn status(&self) -> ScanStatusHandle {
        self.job.status()
    }
}

/// Six-field cron expression (`sec min hour dom month dow`) for a daily run.
pub fn daily_cron(hour: u32, minute: u32) -> String {
    format!("0 {minute} {hour} * * *")
}
