//! Daily publish scheduling.

use std::sync::Arc;

use chrono::{
    DateTime, Duration, FixedOffset, LocalResult, NaiveDateTime, NaiveTime, TimeZone, Utc,
};
use chrono_tz::Tz;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use autobot_core::defaults::SCHEDULE_DOMAIN;
use autobot_core::{
    require_user, CreateScheduledPostRequest, Error, IdentityProvider, PostStatus, Result,
    ScheduleConfig, ScheduleRepository, ScheduledPost,
};

static OFFSET: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([+-])(\d{2}):(\d{2})$").expect("valid regex"));

/// Zone a publish time is interpreted in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishZone {
    /// IANA zone with its daylight saving rules.
    Named(Tz),
    Offset(FixedOffset),
}

/// Parse an `HH:MM` wall-clock time.
pub fn parse_publish_time(value: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(value.trim(), "%H:%M")
        .map_err(|_| Error::InvalidArgument(format!("invalid publish time '{}', expected HH:MM", value)))
}

/// Resolve an IANA zone name or a `±HH:MM` offset.
pub fn resolve_timezone(name: &str) -> Result<PublishZone> {
    let name = name.trim();
    if let Ok(tz) = name.parse::<Tz>() {
        return Ok(PublishZone::Named(tz));
    }

    let unknown = || Error::InvalidArgument(format!("unknown timezone: {}", name));
    let caps = OFFSET.captures(name).ok_or_else(unknown)?;
    let hours: i32 = caps[2].parse().map_err(|_| unknown())?;
    let mins: i32 = caps[3].parse().map_err(|_| unknown())?;
    if hours > 14 || mins >= 60 {
        return Err(unknown());
    }
    let seconds = (hours * 60 + mins) * 60;
    let seconds = if &caps[1] == "-" { -seconds } else { seconds };
    FixedOffset::east_opt(seconds)
        .map(PublishZone::Offset)
        .ok_or_else(unknown)
}

/// Next occurrence of `publish_time` in `timezone` strictly after `now`.
///
/// A wall-clock time repeated by a DST fall-back resolves to its first
/// occurrence. One skipped by a spring-forward jump moves an hour later.
pub fn next_publish_time(
    publish_time: NaiveTime,
    timezone: &str,
    now: DateTime<Utc>,
) -> Result<DateTime<Utc>> {
    match resolve_timezone(timezone)? {
        PublishZone::Named(tz) => next_in_zone(&tz, publish_time, now),
        PublishZone::Offset(offset) => next_in_zone(&offset, publish_time, now),
    }
}

fn next_in_zone<Z: TimeZone>(
    zone: &Z,
    publish_time: NaiveTime,
    now: DateTime<Utc>,
) -> Result<DateTime<Utc>> {
    let today = now.with_timezone(zone).date_naive();
    (0..=2)
        .filter_map(|days| localize(zone, (today + Duration::days(days)).and_time(publish_time)))
        .find(|candidate| *candidate > now)
        .ok_or_else(|| Error::Internal("no valid local publish time".to_string()))
}

fn localize<Z: TimeZone>(zone: &Z, local: NaiveDateTime) -> Option<DateTime<Utc>> {
    match zone.from_local_datetime(&local) {
        LocalResult::Single(at) => Some(at.with_timezone(&Utc)),
        LocalResult::Ambiguous(earliest, _) => Some(earliest.with_timezone(&Utc)),
        LocalResult::None => zone
            .from_local_datetime(&(local + Duration::hours(1)))
            .earliest()
            .map(|at| at.with_timezone(&Utc)),
    }
}

/// Schedule configuration and post queue for the signed-in user.
pub struct PublishScheduler {
    repo: Arc<dyn ScheduleRepository>,
    identity: Arc<dyn IdentityProvider>,
    default_timezone: String,
}

impl PublishScheduler {
    pub fn new(
        repo: Arc<dyn ScheduleRepository>,
        identity: Arc<dyn IdentityProvider>,
        default_timezone: impl Into<String>,
    ) -> Self {
        Self {
            repo,
            identity,
            default_timezone: default_timezone.into(),
        }
    }

    /// Store a schedule, filling blank timezone and domain with defaults.
    #[instrument(skip(self, config), fields(subsystem = "blogger", component = "schedule", op = "save_config", blog_id = %config.blog_id))]
    pub async fn save_config(&self, mut config: ScheduleConfig) -> Result<ScheduleConfig> {
        let user_id = require_user(self.identity.as_ref()).await?;
        if config.blog_id.trim().is_empty() {
            return Err(Error::InvalidArgument("blog id must not be empty".to_string()));
        }
        if config.timezone.trim().is_empty() {
            config.timezone = self.default_timezone.clone();
        }
        if config.domain.trim().is_empty() {
            config.domain = SCHEDULE_DOMAIN.to_string();
        }
        resolve_timezone(&config.timezone)?;

        self.repo.save_config(user_id, &config).await?;
        info!(%user_id, enabled = config.enabled, "Saved publish schedule");
        Ok(config)
    }

    pub async fn get_config(&self, blog_id: &str) -> Result<Option<ScheduleConfig>> {
        let user_id = require_user(self.identity.as_ref()).await?;
        self.repo.get_config(user_id, blog_id).await
    }

    /// Queue the next post for an enabled schedule.
    #[instrument(skip(self), fields(subsystem = "blogger", component = "schedule", op = "schedule_next"))]
    pub async fn schedule_next(&self, blog_id: &str, now: DateTime<Utc>) -> Result<ScheduledPost> {
        let user_id = require_user(self.identity.as_ref()).await?;
        let config = self
            .repo
            .get_config(user_id, blog_id)
            .await?
            .ok_or_else(|| Error::NotFound(format!("publish schedule for blog {}", blog_id)))?;

        if !config.enabled {
            return Err(Error::InvalidArgument(format!(
                "publish schedule for blog {} is disabled",
                blog_id
            )));
        }

        let scheduled_at = next_publish_time(config.publish_time, &config.timezone, now)?;
        debug!(%scheduled_at, timezone = %config.timezone, "Computed next publish time");

        let post = self
            .repo
            .create_scheduled_post(
                user_id,
                CreateScheduledPostRequest {
                    blog_id: config.blog_id,
                    scheduled_at,
                    title: None,
                    content: None,
                    keywords: config.keywords,
                },
            )
            .await?;
        info!(%user_id, post_id = %post.id, %scheduled_at, "Queued scheduled post");
        Ok(post)
    }

    pub async fn list_due(&self, now: DateTime<Utc>) -> Result<Vec<ScheduledPost>> {
        let user_id = require_user(self.identity.as_ref()).await?;
        self.repo.list_due(user_id, now).await
    }

    pub async fn update_status(&self, id: Uuid, status: PostStatus) -> Result<()> {
        let user_id = require_user(self.identity.as_ref()).await?;
        self.repo.update_status(user_id, id, status).await?;
        debug!(%user_id, post_id = %id, status = status.as_str(), "Updated scheduled post");
        Ok(())
    }
}
