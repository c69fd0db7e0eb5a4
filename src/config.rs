//! Engine configuration file support.
//!
//! Capacity constants, the slot-grid shape, and lifecycle deadlines are
//! configuration, not derived data. Defaults match the institutional
//! timetable the crate targets (40 h/week faculty, 50 h/week classrooms,
//! hourly weekday slots 08:00-18:00); a TOML file overrides any subset.

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::algorithms::CapacityModel;
use crate::models::{generate_slots, Day, TimeSlot};

/// Error loading engine configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file '{path}': {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

/// Engine configuration from file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub capacity: CapacitySettings,
    #[serde(default)]
    pub slots: SlotSettings,
    #[serde(default)]
    pub lifecycle: LifecycleSettings,
}

/// Weekly capacity constants used for utilization percentages.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CapacitySettings {
    #[serde(default = "default_faculty_weekly_hours")]
    pub faculty_weekly_hours: f64,
    #[serde(default = "default_classroom_weekly_hours")]
    pub classroom_weekly_hours: f64,
}

fn default_faculty_weekly_hours() -> f64 {
    40.0
}

fn default_classroom_weekly_hours() -> f64 {
    50.0
}

impl Default for CapacitySettings {
    fn default() -> Self {
        Self {
            faculty_weekly_hours: default_faculty_weekly_hours(),
            classroom_weekly_hours: default_classroom_weekly_hours(),
        }
    }
}

impl CapacitySettings {
    pub fn capacity_model(&self) -> CapacityModel {
        CapacityModel::new(self.faculty_weekly_hours, self.classroom_weekly_hours)
    }
}

/// Shape of the generated time-slot grid.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlotSettings {
    #[serde(default = "default_slot_days")]
    pub days: Vec<Day>,
    #[serde(default = "default_start_hour")]
    pub start_hour: u8,
    #[serde(default = "default_end_hour")]
    pub end_hour: u8,
    #[serde(default = "default_slot_minutes")]
    pub slot_minutes: u32,
}

fn default_slot_days() -> Vec<Day> {
    Day::WEEKDAYS.to_vec()
}

fn default_start_hour() -> u8 {
    8
}

fn default_end_hour() -> u8 {
    18
}

fn default_slot_minutes() -> u32 {
    60
}

impl Default for SlotSettings {
    fn default() -> Self {
        Self {
            days: default_slot_days(),
            start_hour: default_start_hour(),
            end_hour: default_end_hour(),
            slot_minutes: default_slot_minutes(),
        }
    }
}

impl SlotSettings {
    pub fn generate(&self) -> Vec<TimeSlot> {
        generate_slots(&self.days, self.start_hour, self.end_hour, self.slot_minutes)
    }
}

/// Deadlines for lifecycle operations that reach the repository boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LifecycleSettings {
    #[serde(default = "default_io_timeout_secs")]
    pub io_timeout_secs: u64,
}

fn default_io_timeout_secs() -> u64 {
    30
}

impl Default for LifecycleSettings {
    fn default() -> Self {
        Self {
            io_timeout_secs: default_io_timeout_secs(),
        }
    }
}

impl LifecycleSettings {
    pub fn io_timeout(&self) -> Duration {
        Duration::from_secs(self.io_timeout_secs)
    }
}

impl EngineConfig {
    /// Load engine configuration from a TOML file.
    ///
    /// # Arguments
    /// * `path` - Path to the configuration file
    ///
    /// # Returns
    /// * `Ok(EngineConfig)` if successful
    /// * `Err(ConfigError)` if the file cannot be read or parsed
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        toml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_constants() {
        let config = EngineConfig::default();
        assert_eq!(config.capacity.faculty_weekly_hours, 40.0);
        assert_eq!(config.capacity.classroom_weekly_hours, 50.0);
        assert_eq!(config.slots.generate().len(), 50);
        assert_eq!(config.lifecycle.io_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn partial_toml_fills_in_defaults() {
        let config: EngineConfig = toml::from_str(
            r#"
            [capacity]
            faculty_weekly_hours = 20.0

            [slots]
            days = ["Monday", "Wednesday"]
            "#,
        )
        .unwrap();

        assert_eq!(config.capacity.faculty_weekly_hours, 20.0);
        assert_eq!(config.capacity.classroom_weekly_hours, 50.0);
        assert_eq!(config.slots.days, vec![Day::Monday, Day::Wednesday]);
        assert_eq!(config.slots.start_hour, 8);
        assert_eq!(config.lifecycle.io_timeout_secs, 30);
    }
}
