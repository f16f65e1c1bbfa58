//! Configuration types.
//!
//! Everything comes from environment variables, matching how the bot is
//! deployed (container with a secrets file). `LINE_*` and `PORT` follow the
//! platform's conventional names; bot-specific knobs are prefixed `TOBAN_`.

use chrono::{FixedOffset, Weekday};
use secrecy::SecretString;

use crate::error::ConfigError;
use crate::roster::resolver::ResidualIndexing;

/// Bot configuration.
#[derive(Debug, Clone)]
pub struct BotConfig {
    /// LINE channel secret (webhook signature key).
    pub channel_secret: SecretString,
    /// LINE channel access token (Messaging API auth).
    pub channel_access_token: SecretString,
    /// Group (or room/user) ID that scheduled pushes broadcast to.
    pub group_id: String,
    /// Sender user ID allowed to register rosters and query summaries.
    /// `*` accepts anyone.
    pub allowed_source: String,
    /// HTTP port for the webhook server.
    pub port: u16,
    /// Path to the roster database. `None` keeps the roster in memory only.
    pub db_path: Option<String>,
    /// Scheduling knobs.
    pub schedule: ScheduleConfig,
    /// Residual list layout convention.
    pub residual_indexing: ResidualIndexing,
}

/// When the daily and weekly triggers fire, in a fixed local UTC offset.
#[derive(Debug, Clone)]
pub struct ScheduleConfig {
    pub daily_hour: u8,
    pub daily_minute: u8,
    pub reset_weekday: Weekday,
    pub reset_hour: u8,
    pub reset_minute: u8,
    /// Local time offset from UTC, in hours. Defaults to +9 (Asia/Tokyo).
    pub utc_offset_hours: i8,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            daily_hour: 7,
            daily_minute: 30,
            reset_weekday: Weekday::Sun,
            reset_hour: 20,
            reset_minute: 0,
            utc_offset_hours: 9,
        }
    }
}

impl ScheduleConfig {
    /// The configured local offset.
    pub fn offset(&self) -> FixedOffset {
        // Validated range in from_env; default is always in range.
        FixedOffset::east_opt(i32::from(self.utc_offset_hours) * 3600)
            .unwrap_or_else(|| FixedOffset::east_opt(9 * 3600).unwrap())
    }
}

impl BotConfig {
    /// Build config from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        let channel_secret = require_env("LINE_CHANNEL_SECRET")?;
        let channel_access_token = require_env("LINE_CHANNEL_ACCESS_TOKEN")?;
        let group_id = require_env("LINE_GROUP_ID")?;

        let allowed_source = std::env::var("TOBAN_ALLOWED_SOURCE").unwrap_or_else(|_| "*".into());

        let port: u16 = env_parsed("PORT", 5000)?;
        let db_path = std::env::var("TOBAN_DB_PATH").ok().filter(|s| !s.is_empty());

        let residual_indexing = match std::env::var("TOBAN_RESIDUAL_LAYOUT").ok().as_deref() {
            None | Some("paired") => ResidualIndexing::Paired,
            Some("split_halves") => ResidualIndexing::SplitHalves,
            Some(other) => {
                return Err(ConfigError::InvalidValue {
                    key: "TOBAN_RESIDUAL_LAYOUT".into(),
                    message: format!("expected 'paired' or 'split_halves', got '{other}'"),
                });
            }
        };

        let defaults = ScheduleConfig::default();
        let reset_weekday = match std::env::var("TOBAN_RESET_WEEKDAY") {
            Ok(s) => s.parse::<Weekday>().map_err(|_| ConfigError::InvalidValue {
                key: "TOBAN_RESET_WEEKDAY".into(),
                message: format!("'{s}' is not a weekday name"),
            })?,
            Err(_) => defaults.reset_weekday,
        };

        let schedule = ScheduleConfig {
            daily_hour: env_parsed("TOBAN_DAILY_HOUR", defaults.daily_hour)?,
            daily_minute: env_parsed("TOBAN_DAILY_MINUTE", defaults.daily_minute)?,
            reset_weekday,
            reset_hour: env_parsed("TOBAN_RESET_HOUR", defaults.reset_hour)?,
            reset_minute: env_parsed("TOBAN_RESET_MINUTE", defaults.reset_minute)?,
            utc_offset_hours: env_parsed("TOBAN_UTC_OFFSET_HOURS", defaults.utc_offset_hours)?,
        };

        validate_clock("TOBAN_DAILY_HOUR", schedule.daily_hour, 23)?;
        validate_clock("TOBAN_DAILY_MINUTE", schedule.daily_minute, 59)?;
        validate_clock("TOBAN_RESET_HOUR", schedule.reset_hour, 23)?;
        validate_clock("TOBAN_RESET_MINUTE", schedule.reset_minute, 59)?;
        if !(-12..=14).contains(&schedule.utc_offset_hours) {
            return Err(ConfigError::InvalidValue {
                key: "TOBAN_UTC_OFFSET_HOURS".into(),
                message: format!("offset {} out of range -12..=14", schedule.utc_offset_hours),
            });
        }

        Ok(Self {
            channel_secret: SecretString::from(channel_secret),
            channel_access_token: SecretString::from(channel_access_token),
            group_id,
            allowed_source,
            port,
            db_path,
            schedule,
            residual_indexing,
        })
    }
}

fn require_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

fn env_parsed<T: std::str::FromStr>(key: &str, default: T) -> Result<T, ConfigError> {
    match std::env::var(key) {
        Ok(s) => s.parse().map_err(|_| ConfigError::InvalidValue {
            key: key.to_string(),
            message: format!("could not parse '{s}'"),
        }),
        Err(_) => Ok(default),
    }
}

fn validate_clock(key: &str, value: u8, max: u8) -> Result<(), ConfigError> {
    if value > max {
        return Err(ConfigError::InvalidValue {
            key: key.to_string(),
            message: format!("{value} out of range 0..={max}"),
        });
    }
    Ok(())
}
