//! User-facing calendar settings.
//!
//! Settings are plain serde data so they can be loaded from a JSON file by the
//! CLI or passed from JavaScript by the WASM bindings. Every field has a
//! default; missing fields fall back to them.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::error::{CalendarError, Result};
use crate::lanes::OverlapPolicy;
use crate::week::{Week, WeekStartDay};

pub const DEFAULT_LOCALE: &str = "fr-FR";
pub const DEFAULT_TIMEZONE: &str = "Europe/Paris";
/// Height of one lane, in pixels.
pub const DEFAULT_ROW_HEIGHT: f64 = 64.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalendarSettings {
    pub locale: String,
    /// IANA timezone name.
    pub timezone: String,
    /// Overrides the locale-derived first day of the week.
    pub week_start: Option<WeekStartDay>,
    pub overlap_policy: OverlapPolicy,
    pub row_height: f64,
}

impl Default for CalendarSettings {
    fn default() -> Self {
        Self {
            locale: DEFAULT_LOCALE.to_string(),
            timezone: DEFAULT_TIMEZONE.to_string(),
            week_start: None,
            overlap_policy: OverlapPolicy::default(),
            row_height: DEFAULT_ROW_HEIGHT,
        }
    }
}

impl CalendarSettings {
    /// Parse settings from JSON, filling missing fields with defaults.
    ///
    /// # Errors
    /// Returns `CalendarError::InvalidSettings` for malformed JSON or invalid
    /// values.
    pub fn from_json(json: &str) -> Result<Self> {
        let settings: CalendarSettings = serde_json::from_str(json)
            .map_err(|e| CalendarError::InvalidSettings(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        self.timezone()?;
        if !self.row_height.is_finite() || self.row_height <= 0.0 {
            return Err(CalendarError::InvalidSettings(format!(
                "row_height must be a positive number, got {}",
                self.row_height
            )));
        }
        Ok(())
    }

    /// # Errors
    /// Returns `CalendarError::InvalidTimezone` if the name is not a valid IANA
    /// identifier.
    pub fn timezone(&self) -> Result<Tz> {
        self.timezone
            .parse()
            .map_err(|_| CalendarError::InvalidTimezone(self.timezone.clone()))
    }

    /// Explicit week start, or the one implied by the locale.
    pub fn week_start(&self) -> WeekStartDay {
        self.week_start
            .unwrap_or_else(|| WeekStartDay::from_locale(&self.locale))
    }

    /// The week containing `now`, moved by `offset` weeks.
    ///
    /// # Errors
    /// Returns `CalendarError::InvalidTimezone` for a bad timezone and
    /// `CalendarError::InvalidSettings` when the offset leaves the supported
    /// date range.
    pub fn week(&self, now: DateTime<Utc>, offset: i64) -> Result<Week> {
        Week::containing(now, self.timezone()?, self.week_start())
            .offset(offset)
            .ok_or_else(|| {
                CalendarError::InvalidSettings(format!("week offset {} is out of range", offset))
            })
    }
}
