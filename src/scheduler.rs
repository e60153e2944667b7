use crate::model::Asset;
use crate::orchestrator::{Orchestrator, Outcome};
use chrono::{DateTime, NaiveTime, Timelike, Utc};
use chrono_tz::Tz;
use std::time::Duration;
use tokio::time::sleep;
use tracing::info;

/// Hourly tick settings.
#[derive(Debug, Clone)]
pub struct Schedule {
    pub timezone: Tz,
    pub window_start: NaiveTime,
    pub window_end: NaiveTime,
    pub wake_offset_seconds: u32,
    pub min_wait: Duration,
}

impl Schedule {
    /// Inclusive on both ends at minute resolution, so 21:30:59 still counts for a 21:30 end.
    pub fn is_active(&self, now: &DateTime<Tz>) -> bool {
        match NaiveTime::from_hms_opt(now.hour(), now.minute(), 0) {
            Some(hm) => self.window_start <= hm && hm <= self.window_end,
            None => false,
        }
    }

    /// Time until the top of the next hour plus the offset, never less than `min_wait`.
    pub fn next_wake_delay(&self, now: DateTime<Tz>) -> Duration {
        let next_run = (now + chrono::Duration::hours(1))
            .with_minute(0)
            .and_then(|t| t.with_second(0))
            .and_then(|t| t.with_nanosecond(0))
            .map(|t| t + chrono::Duration::seconds(i64::from(self.wake_offset_seconds)));

        next_run
            .and_then(|t| (t - now).to_std().ok())
            .map_or(self.min_wait, |wait| wait.max(self.min_wait))
    }
}

/// Runs analysis cycles until the process stops.
pub async fn run(orchestrator: Orchestrator, assets: Vec<Asset>, schedule: Schedule) {
    loop {
        let now = Utc::now().with_timezone(&schedule.timezone);
        if schedule.is_active(&now) {
            info!("Running cycle for {} assets at {}", assets.len(), now.format("%Y-%m-%d %H:%M:%S"));
            let outcomes = orchestrator.run_cycle(&assets, now).await;
            let delivered = outcomes
                .iter()
                .filter(|(_, o)| matches!(o, Outcome::Delivered { .. }))
                .count();
            info!("Cycle finished: {} delivered, {} skipped", delivered, outcomes.len() - delivered);
        } else {
            info!("Outside active window ({}), idle tick", now.format("%H:%M"));
        }

        let after = Utc::now().with_timezone(&schedule.timezone);
        let wait = schedule.next_wake_delay(after);
        info!("Sleeping {}s until next tick", wait.as_secs());
        sleep(wait).await;
    }
}
