use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{info, warn};

pub const CHANNEL_ID: &str = "mood-tracker-channel";

#[derive(Debug, Error)]
pub enum ReminderError {
    #[error("notification permission request failed: {0}")]
    Permission(String),
    #[error("unknown notification channel `{0}`")]
    UnknownChannel(String),
    #[error("invalid trigger: {0}")]
    InvalidTrigger(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelConfig {
    pub id: String,
    pub name: String,
    pub description: String,
    pub high_importance: bool,
    pub sound: bool,
    pub vibration: bool,
}

impl ChannelConfig {
    pub fn mood_reminders() -> Self {
        Self {
            id: CHANNEL_ID.to_string(),
            name: "Mood reminders".to_string(),
            description: "Channel for daily reminders".to_string(),
            high_importance: true,
            sound: true,
            vibration: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationContent {
    pub channel_id: String,
    pub title: String,
    pub body: String,
}

impl NotificationContent {
    pub fn mood_reminder() -> Self {
        Self {
            channel_id: CHANNEL_ID.to_string(),
            title: "Log your mood".to_string(),
            body: "How are you feeling today?".to_string(),
        }
    }
}

/// Fires first at `first_fire`, then every `repeat_every`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trigger {
    pub first_fire: DateTime<Utc>,
    pub repeat_every: Duration,
}

impl Trigger {
    pub fn every(interval: Duration, now: DateTime<Utc>) -> Result<Self, ReminderError> {
        let first_fire = now.checked_add_signed(interval).ok_or_else(|| {
            ReminderError::InvalidTrigger(format!("first fire {interval} from now is out of range"))
        })?;
        Ok(Self {
            first_fire,
            repeat_every: interval,
        })
    }
}

/// Local notification facility used at startup.
#[async_trait]
pub trait NotificationScheduler: Send + Sync {
    /// A denied request is reported as `ReminderError::Permission`.
    async fn request_permission(&self) -> Result<(), ReminderError>;
    /// Creates or replaces the channel with the same id.
    async fn create_channel(&self, config: &ChannelConfig) -> Result<(), ReminderError>;
    async fn schedule_notification(
        &self,
        content: &NotificationContent,
        trigger: &Trigger,
    ) -> Result<(), ReminderError>;
}

/// Runs once per process: permission, channel, recurring reminder. Every step
/// is attempted regardless of the previous outcome and failures are only
/// logged.
pub async fn bootstrap(
    scheduler: &dyn NotificationScheduler,
    interval: Duration,
    now: DateTime<Utc>,
) {
    match scheduler.request_permission().await {
        Ok(()) => info!("notification permission granted"),
        Err(err) => warn!("{err}"),
    }

    if let Err(err) = scheduler.create_channel(&ChannelConfig::mood_reminders()).await {
        warn!("failed to create notification channel: {err}");
    }

    let trigger = match Trigger::every(interval, now) {
        Ok(trigger) => trigger,
        Err(err) => {
            warn!("failed to schedule mood reminder: {err}");
            return;
        }
    };
    match scheduler
        .schedule_notification(&NotificationContent::mood_reminder(), &trigger)
        .await
    {
        Ok(()) => info!(
            first_fire = %trigger.first_fire,
            every_secs = interval.num_seconds(),
            "mood reminder scheduled"
        ),
        Err(err) => warn!("failed to schedule mood reminder: {err}"),
    }
}

/// In-process scheduler: each scheduled notification becomes a tokio task that
/// emits the reminder through the log on every tick.
#[derive(Debug, Default)]
pub struct LocalScheduler {
    channels: Mutex<HashMap<String, ChannelConfig>>,
}

impl LocalScheduler {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl NotificationScheduler for LocalScheduler {
    async fn request_permission(&self) -> Result<(), ReminderError> {
        Ok(())
    }

    async fn create_channel(&self, config: &ChannelConfig) -> Result<(), ReminderError> {
        self.channels
            .lock()
            .await
            .insert(config.id.clone(), config.clone());
        Ok(())
    }

    async fn schedule_notification(
        &self,
        content: &NotificationContent,
        trigger: &Trigger,
    ) -> Result<(), ReminderError> {
        if !self.channels.lock().await.contains_key(&content.channel_id) {
            return Err(ReminderError::UnknownChannel(content.channel_id.clone()));
        }
        let period = trigger
            .repeat_every
            .to_std()
            .ok()
            .filter(|period| !period.is_zero())
            .ok_or_else(|| {
                ReminderError::InvalidTrigger("repeat interval must be positive".into())
            })?;
        let delay = (trigger.first_fire - Utc::now()).to_std().unwrap_or_default();

        let content = content.clone();
        tokio::spawn(async move {
            let start = tokio::time::Instant::now() + delay;
            let mut ticker = tokio::time::interval_at(start, period);
            loop {
                ticker.tick().await;
                info!(channel = %content.channel_id, title = %content.title, "{}", content.body);
            }
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::sync::Mutex as StdMutex;

    #[derive(Default)]
    struct RecordingScheduler {
        calls: StdMutex<Vec<String>>,
        scheduled: StdMutex<Vec<(NotificationContent, Trigger)>>,
        deny: bool,
    }

    #[async_trait]
    impl NotificationScheduler for RecordingScheduler {
        async fn request_permission(&self) -> Result<(), ReminderError> {
            self.calls.lock().unwrap().push("permission".into());
            if self.deny {
                Err(ReminderError::Permission("user declined".into()))
            } else {
                Ok(())
            }
        }

        async fn create_channel(&self, config: &ChannelConfig) -> Result<(), ReminderError> {
            self.calls.lock().unwrap().push(format!("channel:{}", config.id));
            Ok(())
        }

        async fn schedule_notification(
            &self,
            content: &NotificationContent,
            trigger: &Trigger,
        ) -> Result<(), ReminderError> {
            self.calls.lock().unwrap().push("schedule".into());
            self.scheduled
                .lock()
                .unwrap()
                .push((content.clone(), trigger.clone()));
            Ok(())
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 4, 1, 12, 0, 0).unwrap()
    }

    #[tokio::test]
    async fn bootstrap_runs_steps_in_order() {
        let scheduler = RecordingScheduler::default();
        bootstrap(&scheduler, Duration::seconds(120), now()).await;

        assert_eq!(
            *scheduler.calls.lock().unwrap(),
            vec!["permission", "channel:mood-tracker-channel", "schedule"]
        );
        let scheduled = scheduler.scheduled.lock().unwrap();
        let (content, trigger) = &scheduled[0];
        assert_eq!(content.channel_id, CHANNEL_ID);
        assert_eq!(trigger.first_fire, now() + Duration::seconds(120));
        assert_eq!(trigger.repeat_every, Duration::seconds(120));
    }

    #[tokio::test]
    async fn denied_permission_does_not_stop_scheduling() {
        let scheduler = RecordingScheduler {
            deny: true,
            ..Default::default()
        };
        bootstrap(&scheduler, Duration::hours(24), now()).await;
        assert_eq!(scheduler.scheduled.lock().unwrap().len(), 1);
    }

    #[test]
    fn trigger_past_the_calendar_range_is_rejected() {
        let interval = Duration::seconds(1_000_000_000_000_000);
        assert!(matches!(
            Trigger::every(interval, now()),
            Err(ReminderError::InvalidTrigger(_))
        ));
    }

    #[tokio::test]
    async fn out_of_range_interval_skips_scheduling() {
        let scheduler = RecordingScheduler::default();
        bootstrap(&scheduler, Duration::seconds(1_000_000_000_000_000), now()).await;

        assert_eq!(
            *scheduler.calls.lock().unwrap(),
            vec!["permission", "channel:mood-tracker-channel"]
        );
        assert!(scheduler.scheduled.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn local_scheduler_upserts_channels() {
        let scheduler = LocalScheduler::new();
        let mut config = ChannelConfig::mood_reminders();
        scheduler.create_channel(&config).await.unwrap();
        config.name = "Renamed".into();
        scheduler.create_channel(&config).await.unwrap();

        let channels = scheduler.channels.lock().await;
        assert_eq!(channels.len(), 1);
        assert_eq!(channels[CHANNEL_ID].name, "Renamed");
    }

    #[tokio::test]
    async fn local_scheduler_requires_known_channel_and_positive_interval() {
        let scheduler = LocalScheduler::new();
        let content = NotificationContent::mood_reminder();
        let trigger = Trigger::every(Duration::seconds(60), Utc::now()).unwrap();
        assert!(matches!(
            scheduler.schedule_notification(&content, &trigger).await,
            Err(ReminderError::UnknownChannel(_))
        ));

        scheduler
            .create_channel(&ChannelConfig::mood_reminders())
            .await
            .unwrap();
        let zero = Trigger::every(Duration::zero(), Utc::now()).unwrap();
        assert!(matches!(
            scheduler.schedule_notification(&content, &zero).await,
            Err(ReminderError::InvalidTrigger(_))
        ));
        assert!(scheduler.schedule_notification(&content, &trigger).await.is_ok());
    }
}
