//! Reminder controller — the bot's state machine.
//!
//! The roster is either absent (`Unregistered`) or present (`Registered`);
//! registration replaces it wholesale, the weekly reset clears it. Each
//! transition is an explicit method returning success/failure so the whole
//! machine is unit-testable without a clock or a real channel.

use std::sync::Arc;

use chrono::Weekday;

use crate::channels::Notifier;
use crate::error::Error;
use crate::roster::resolver::ResidualIndexing;
use crate::roster::{format, parser, resolve};
use crate::store::RosterStore;

/// Outcome of an inbound roster message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Registration {
    /// The text passed the gate and the roster was saved.
    Accepted,
    /// Not a roster; state unchanged.
    Ignored,
}

/// Orchestrates store, resolver, formatter, and the outbound notifier.
pub struct ReminderController {
    store: Arc<dyn RosterStore>,
    notifier: Arc<dyn Notifier>,
    /// Broadcast target for scheduled pushes.
    group_id: String,
    indexing: ResidualIndexing,
}

impl ReminderController {
    pub fn new(
        store: Arc<dyn RosterStore>,
        notifier: Arc<dyn Notifier>,
        group_id: String,
        indexing: ResidualIndexing,
    ) -> Self {
        Self {
            store,
            notifier,
            group_id,
            indexing,
        }
    }

    /// Handle an inbound text message. Returns the outcome and the reply text
    /// for the sender; a non-roster message always gets the fixed generic
    /// acknowledgement.
    pub async fn on_roster_message(&self, text: &str) -> Result<(Registration, String), Error> {
        if !parser::is_roster_message(text) {
            tracing::debug!("Inbound message is not a roster");
            return Ok((Registration::Ignored, format::non_roster_reply().to_string()));
        }

        let roster = parser::parse(text);
        self.store.save(&roster).await?;
        tracing::info!(
            emergency = roster.emergency.len(),
            morning = roster.morning_in_house.len(),
            afternoon = roster.afternoon_in_house.len(),
            residual = roster.residual.len(),
            "Weekly roster registered"
        );
        Ok((Registration::Accepted, format::registration_ack().to_string()))
    }

    /// Handle an on-demand "show me this week" query. Returns the reply text.
    pub async fn on_summary_query(&self) -> Result<String, Error> {
        let roster = self.store.load().await?;
        if roster.is_empty() {
            return Ok(format::not_registered_reply().to_string());
        }
        Ok(format::weekly_summary(&roster, self.indexing))
    }

    /// Daily trigger: announce the weekday's assignments to the group.
    /// Returns `true` if a message was pushed; an empty roster is log-only.
    pub async fn on_daily_trigger(&self, weekday: Weekday) -> Result<bool, Error> {
        let roster = self.store.load().await?;
        if roster.is_empty() {
            tracing::info!("No roster registered; skipping daily reminder");
            return Ok(false);
        }

        let assignment = resolve(&roster, weekday, self.indexing);
        let message = format::daily_message(&assignment);
        self.notifier.push(&self.group_id, &message).await?;
        tracing::info!(?weekday, "Daily reminder pushed");
        Ok(true)
    }

    /// Weekly trigger: clear the roster (unconditionally, even if already
    /// empty) and solicit re-registration.
    pub async fn on_weekly_trigger(&self) -> Result<(), Error> {
        self.store.clear().await?;
        self.notifier.push(&self.group_id, format::reset_notice()).await?;
        tracing::info!("Weekly roster reset");
        Ok(())
    }
}
