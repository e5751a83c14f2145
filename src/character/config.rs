//! Character configuration: input tuning and per-state data.

use super::data::CharacterStateData;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Stick deflection below which analog input reads as neutral.
pub const DEFAULT_INPUT_THRESHOLD: f32 = 0.1;

/// Errors raised while loading or applying a character configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse character config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Input threshold {value} is outside [0, 1)")]
    InvalidThreshold { value: f32 },

    #[error("State data given for unknown state '{name}'")]
    UnknownState { name: String },
}

/// Data for one named state.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StateDataEntry {
    pub name: String,
    pub data: CharacterStateData,
}

/// Configuration consumed by [`CharacterControllerBuilder`](super::CharacterControllerBuilder).
///
/// `state_data` is the explicit list of (name, data) pairs registered for
/// the catalog; states without an entry use [`CharacterStateData::default`].
///
/// ```rust
/// use fighter_fsm::character::CharacterConfig;
///
/// let config = CharacterConfig::from_json(
///     r#"{
///         "input_threshold": 0.2,
///         "state_data": [{ "name": "Idle", "data": { "animation": "idle_loop" } }]
///     }"#,
/// )
/// .unwrap();
///
/// assert_eq!(config.input_threshold, 0.2);
/// assert_eq!(config.data_for("Idle").animation.as_deref(), Some("idle_loop"));
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CharacterConfig {
    pub input_threshold: f32,
    pub state_data: Vec<StateDataEntry>,
}

impl Default for CharacterConfig {
    fn default() -> Self {
        Self {
            input_threshold: DEFAULT_INPUT_THRESHOLD,
            state_data: Vec::new(),
        }
    }
}

impl CharacterConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate_threshold()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Data registered for `name`, or the default when there is none.
    ///
    /// The last entry wins when a name appears more than once.
    pub fn data_for(&self, name: &str) -> CharacterStateData {
        self.state_data
            .iter()
            .rev()
            .find(|entry| entry.name == name)
            .map(|entry| entry.data.clone())
            .unwrap_or_default()
    }

    /// Set the data for `name`, replacing an earlier entry.
    pub fn set_data(&mut self, name: impl Into<String>, data: CharacterStateData) {
        let name = name.into();
        match self.state_data.iter_mut().find(|entry| entry.name == name) {
            Some(entry) => entry.data = data,
            None => self.state_data.push(StateDataEntry { name, data }),
        }
    }

    pub(crate) fn validate_threshold(&self) -> Result<(), ConfigError> {
        if (0.0..1.0).contains(&self.input_threshold) {
            Ok(())
        } else {
            Err(ConfigError::InvalidThreshold {
                value: self.input_threshold,
            })
        }
    }

    /// Check every entry names one of `known`.
    pub fn validate(&self, mut known: impl FnMut(&str) -> bool) -> Result<(), ConfigError> {
        self.validate_threshold()?;
        match self.state_data.iter().find(|entry| !known(&entry.name)) {
            Some(entry) => Err(ConfigError::UnknownState {
                name: entry.name.clone(),
            }),
            None => Ok(()),
        }
    }
}
