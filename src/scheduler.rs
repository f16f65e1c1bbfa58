//! Trigger scheduler — fires the daily and weekly controller transitions.
//!
//! Two cron schedules evaluated in the configured fixed local offset. The loop
//! sleeps until the earliest upcoming fire time, invokes the controller, and
//! keeps going; a failed trigger is logged and the next one is unaffected.

use std::str::FromStr;
use std::sync::Arc;

use chrono::{DateTime, Datelike, FixedOffset, Utc, Weekday};
use cron::Schedule;

use crate::config::ScheduleConfig;
use crate::controller::ReminderController;
use crate::error::ConfigError;

/// Which transition a fire time belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerKind {
    Daily,
    Weekly,
}

/// The bot's two cron schedules, in local time.
pub struct TriggerSchedule {
    daily: Schedule,
    weekly: Schedule,
    offset: FixedOffset,
}

impl TriggerSchedule {
    pub fn new(config: &ScheduleConfig) -> Result<Self, ConfigError> {
        let daily_expr = format!("0 {} {} * * *", config.daily_minute, config.daily_hour);
        let weekly_expr = format!(
            "0 {} {} * * {}",
            config.reset_minute,
            config.reset_hour,
            cron_weekday(config.reset_weekday),
        );
        Ok(Self {
            daily: parse_schedule(&daily_expr)?,
            weekly: parse_schedule(&weekly_expr)?,
            offset: config.offset(),
        })
    }

    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    /// The earliest fire time strictly after `now`, with every trigger due at
    /// that instant. When daily and weekly coincide, weekly comes first so the
    /// daily trigger observes the freshly-cleared roster and stays silent.
    pub fn next_after(
        &self,
        now: DateTime<FixedOffset>,
    ) -> Option<(DateTime<FixedOffset>, Vec<TriggerKind>)> {
        let next_daily = self.daily.after(&now).next();
        let next_weekly = self.weekly.after(&now).next();

        match (next_daily, next_weekly) {
            (Some(d), Some(w)) if d == w => Some((d, vec![TriggerKind::Weekly, TriggerKind::Daily])),
            (Some(d), Some(w)) if d < w => Some((d, vec![TriggerKind::Daily])),
            (Some(_), Some(w)) => Some((w, vec![TriggerKind::Weekly])),
            (Some(d), None) => Some((d, vec![TriggerKind::Daily])),
            (None, Some(w)) => Some((w, vec![TriggerKind::Weekly])),
            (None, None) => None,
        }
    }
}

fn parse_schedule(expr: &str) -> Result<Schedule, ConfigError> {
    Schedule::from_str(expr).map_err(|e| ConfigError::InvalidSchedule {
        expr: expr.to_string(),
        message: e.to_string(),
    })
}

fn cron_weekday(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "Mon",
        Weekday::Tue => "Tue",
        Weekday::Wed => "Wed",
        Weekday::Thu => "Thu",
        Weekday::Fri => "Fri",
        Weekday::Sat => "Sat",
        Weekday::Sun => "Sun",
    }
}

/// Spawn the trigger loop background task.
pub fn spawn_trigger_loop(
    controller: Arc<ReminderController>,
    schedule: TriggerSchedule,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            let now = Utc::now().with_timezone(&schedule.offset());
            let Some((fire_at, kinds)) = schedule.next_after(now) else {
                tracing::error!("No upcoming trigger; scheduler exiting");
                return;
            };

            let wait = (fire_at - now)
                .to_std()
                .unwrap_or(std::time::Duration::ZERO);
            tracing::debug!(%fire_at, ?kinds, "Sleeping until next trigger");
            tokio::time::sleep(wait).await;

            for kind in kinds {
                match kind {
                    TriggerKind::Daily => {
                        if let Err(e) = controller.on_daily_trigger(fire_at.weekday()).await {
                            tracing::error!("Daily trigger failed: {e}");
                        }
                    }
                    TriggerKind::Weekly => {
                        if let Err(e) = controller.on_weekly_trigger().await {
                            tracing::error!("Weekly trigger failed: {e}");
                        }
                    }
                }
            }
        }
    })
}
