//! Engine configuration passed explicitly by callers.
//!
//! There is no global state: adapters build an [`EngineConfig`] (from defaults,
//! a JSON document, or flags) and hand it to each call.

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SlotError};
use crate::rules::RulePolicy;
use crate::slots::SlotDuration;
use crate::zone;

pub const DEFAULT_TIMEZONE: &str = "America/Santiago";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Length of generated slots.
    pub slot_minutes: SlotDuration,
    /// IANA zone slot times are expressed in.
    pub timezone: String,
    /// Grid and opening hours for new schedule entries.
    pub rules: RulePolicy,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            slot_minutes: SlotDuration::default(),
            timezone: DEFAULT_TIMEZONE.to_string(),
            rules: RulePolicy::default(),
        }
    }
}

impl EngineConfig {
    /// Parse a JSON document; missing fields take their defaults.
    ///
    /// # Errors
    /// Returns `SlotError::InvalidConfig` on malformed JSON or out-of-range
    /// values, and `SlotError::InvalidTimezone` on an unknown zone.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: EngineConfig =
            serde_json::from_str(json).map_err(|e| SlotError::InvalidConfig(e.to_string()))?;
        config.tz()?;
        Ok(config)
    }

    pub fn tz(&self) -> Result<Tz> {
        zone::parse_timezone(&self.timezone)
    }
}
