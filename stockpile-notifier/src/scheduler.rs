//! Daily scan scheduling
//!
//! The two aggregate scans run at fixed UTC times: expiry at 07:00, recipe
//! reminder at 11:00. The driver computes the next occurrence, sleeps until
//! it, invokes the handler with the wake-up instant, logs any failure, and
//! repeats. Invocation-level timeouts and redelivery belong to the
//! infrastructure around the worker, not here.

use crate::handlers::NotificationEngine;
use chrono::{DateTime, Duration as ChronoDuration, NaiveTime, Utc};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use stockpile_shared::error::StoreResult;
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;

/// Expiry scan fires daily at 07:00 UTC
pub const EXPIRY_SCAN_SCHEDULE: DailySchedule = DailySchedule { hour: 7, minute: 0 };

/// Recipe reminder fires daily at 11:00 UTC
pub const RECIPE_SCAN_SCHEDULE: DailySchedule = DailySchedule { hour: 11, minute: 0 };

/// A fixed time-of-day in UTC
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DailySchedule {
    /// Hour of day, 0..=23
    pub hour: u32,

    /// Minute of hour, 0..=59
    pub minute: u32,
}

impl DailySchedule {
    /// Returns the next occurrence strictly after `now`
    pub fn next_after(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        let seconds_into_day = i64::from(self.hour) * 3600 + i64::from(self.minute) * 60;
        let day_start = now.date_naive().and_time(NaiveTime::MIN).and_utc();

        let mut next = day_start + ChronoDuration::seconds(seconds_into_day);
        if next <= now {
            next += ChronoDuration::days(1);
        }
        next
    }
}

/// Runs one daily job until shutdown
///
/// The job receives the wake-up instant so its window math is anchored to
/// the actual invocation time.
pub async fn run_daily<F, Fut>(
    name: &'static str,
    schedule: DailySchedule,
    shutdown: CancellationToken,
    job: F,
) where
    F: Fn(DateTime<Utc>) -> Fut,
    Fut: Future<Output = StoreResult<()>>,
{
    loop {
        let now = Utc::now();
        let next = schedule.next_after(now);
        let wait = (next - now).to_std().unwrap_or(Duration::ZERO);
        tracing::debug!(job = name, next = %next, "Scheduled next run");

        tokio::select! {
            _ = shutdown.cancelled() => {
                tracing::info!(job = name, "Scheduler shutting down");
                break;
            }
            _ = sleep(wait) => {}
        }

        let run_at = Utc::now();
        tracing::info!(job = name, "Running scheduled scan");
        if let Err(e) = job(run_at).await {
            // Failed runs are logged and the schedule continues; the next
            // day's run is a fresh invocation
            tracing::error!(job = name, error = %e, "Scheduled scan failed");
        }
    }
}

/// Spawns both daily scan jobs
pub fn spawn_daily_jobs(
    engine: Arc<NotificationEngine>,
    shutdown: CancellationToken,
) -> Vec<JoinHandle<()>> {
    let expiry_engine = engine.clone();
    let expiry = tokio::spawn(run_daily(
        "expiry_scan",
        EXPIRY_SCAN_SCHEDULE,
        shutdown.clone(),
        move |now| {
            let engine = expiry_engine.clone();
            async move { engine.expiry_scan(now).await }
        },
    ));

    let recipe = tokio::spawn(run_daily(
        "recipe_reminder_scan",
        RECIPE_SCAN_SCHEDULE,
        shutdown,
        move |now| {
            let engine = engine.clone();
            async move { engine.recipe_reminder_scan(now).await }
        },
    ));

    vec![expiry, recipe]
}
