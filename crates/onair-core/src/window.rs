//! Live-window arithmetic over the persisted schedule.
//!
//! Each campaign's effective window is `[start - buffer, end + buffer]`,
//! where a missing end falls back to `start + default_duration`. Both bounds
//! are inclusive. All comparisons happen in UTC.

use chrono::{DateTime, TimeDelta, Utc};

use crate::campaign::{Campaign, ScheduleDocument};

/// A closed UTC interval during which polling should run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LiveWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl LiveWindow {
    #[must_use]
    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        self.start <= at && at <= self.end
    }
}

/// Buffer and fallback duration used to turn campaigns into windows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowPolicy {
    pub buffer: TimeDelta,
    pub default_duration: TimeDelta,
}

impl WindowPolicy {
    #[must_use]
    pub fn from_minutes(buffer_minutes: u32, default_duration_minutes: u32) -> Self {
        Self {
            buffer: TimeDelta::minutes(i64::from(buffer_minutes)),
            default_duration: TimeDelta::minutes(i64::from(default_duration_minutes)),
        }
    }

    #[must_use]
    pub fn from_config(config: &crate::AppConfig) -> Self {
        Self::from_minutes(
            config.schedule_buffer_minutes,
            config.default_live_duration_minutes,
        )
    }

    /// The buffered window for a single campaign.
    #[must_use]
    pub fn effective_window(&self, campaign: &Campaign) -> LiveWindow {
        let start = campaign.scheduled_start_at;
        let end = campaign
            .scheduled_end_at
            .unwrap_or(start + self.default_duration);
        LiveWindow {
            start: start - self.buffer,
            end: end + self.buffer,
        }
    }

    /// Whether `now` falls inside any campaign's window.
    ///
    /// `schedule` is `None` when the schedule document is missing or could not
    /// be read. In that case this returns `true`: an unknown schedule must not
    /// silently suppress stock checks.
    #[must_use]
    pub fn is_within_any_window(
        &self,
        schedule: Option<&ScheduleDocument>,
        now: DateTime<Utc>,
    ) -> bool {
        let Some(schedule) = schedule else {
            return true;
        };
        schedule
            .campaigns
            .iter()
            .any(|c| self.effective_window(c).contains(now))
    }

    /// Envelope of the windows of every campaign starting on `now`'s UTC day.
    ///
    /// Returns the earliest window start and the latest window end across
    /// those campaigns. Gaps between campaigns are not reported. Returns
    /// `None` when nothing starts today or when no schedule is available.
    #[must_use]
    pub fn todays_window(
        &self,
        schedule: Option<&ScheduleDocument>,
        now: DateTime<Utc>,
    ) -> Option<LiveWindow> {
        let schedule = schedule?;
        let day_start = now
            .date_naive()
            .and_hms_opt(0, 0, 0)?
            .and_utc();
        let day_end = day_start + TimeDelta::days(1);

        schedule
            .campaigns
            .iter()
            .filter(|c| day_start <= c.scheduled_start_at && c.scheduled_start_at < day_end)
            .map(|c| self.effective_window(c))
            .reduce(|acc, w| LiveWindow {
                start: acc.start.min(w.start),
                end: acc.end.max(w.end),
            })
    }
}

/// Whether a campaign starting at `start` is due within `lead` of `now`.
///
/// Campaigns whose start has already passed count as due.
#[must_use]
pub fn starts_within_lead(start: DateTime<Utc>, now: DateTime<Utc>, lead: TimeDelta) -> bool {
    start <= now + lead
}
