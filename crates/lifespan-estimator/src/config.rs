//! Configuration for estimation runs
//!
//! [`EstimatorConfig`] holds the tunable constants of the bound estimator and
//! is passed explicitly to every estimation. [`BatchOptions`] controls how a
//! batch of estimates is turned into events.

use crate::EstimatorError;
use serde::{Deserialize, Serialize};

/// Upper limit accepted for any of the year constants
pub const MAX_CONFIG_YEARS: i32 = 200;

/// Tunable constants for the bound estimator
///
/// # Examples
///
/// ```
/// use lifespan_estimator::EstimatorConfig;
///
/// let config = EstimatorConfig::default();
/// assert_eq!(config.max_plausible_lifespan, 100);
///
/// let config = EstimatorConfig::from_toml_str("max_sibling_age_spread = 5").unwrap();
/// assert_eq!(config.max_sibling_age_spread, 5);
/// assert_eq!(config.average_generation_gap, 20);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EstimatorConfig {
    /// Longest plausible life, in years
    /// Default: 100
    #[serde(default = "default_lifespan")]
    pub max_plausible_lifespan: i32,

    /// Largest plausible age difference between siblings, in years
    /// Default: 20
    #[serde(default = "default_sibling_spread")]
    pub max_sibling_age_spread: i32,

    /// Average years between the births of parent and child
    /// Default: 20
    #[serde(default = "default_generation_gap")]
    pub average_generation_gap: i32,

    /// Deepest generation visited when walking ancestors or descendants
    /// Default: unlimited
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_generations: Option<u32>,
}

fn default_lifespan() -> i32 {
    100
}

fn default_sibling_spread() -> i32 {
    20
}

fn default_generation_gap() -> i32 {
    20
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            max_plausible_lifespan: default_lifespan(),
            max_sibling_age_spread: default_sibling_spread(),
            average_generation_gap: default_generation_gap(),
            max_generations: None,
        }
    }
}

impl EstimatorConfig {
    /// Check that every year constant lies in `0..=200`
    pub fn validate(&self) -> Result<(), EstimatorError> {
        let fields = [
            ("max_plausible_lifespan", self.max_plausible_lifespan),
            ("max_sibling_age_spread", self.max_sibling_age_spread),
            ("average_generation_gap", self.average_generation_gap),
        ];
        for (name, value) in fields {
            if !(0..=MAX_CONFIG_YEARS).contains(&value) {
                return Err(EstimatorError::Config(format!(
                    "{} must be between 0 and {}, got {}",
                    name, MAX_CONFIG_YEARS, value
                )));
            }
        }
        Ok(())
    }

    /// Parse and validate a TOML table
    pub fn from_toml_str(s: &str) -> Result<Self, EstimatorError> {
        let config: Self =
            toml::from_str(s).map_err(|e| EstimatorError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }
}

/// Whether, and how, a missing event is added
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EventMode {
    /// Do not add the event
    Skip,
    /// Add the event without a date
    WithoutDate,
    /// Add the event with the estimated date
    #[default]
    WithDate,
}

impl EventMode {
    /// True unless the event is skipped
    pub fn adds_event(self) -> bool {
        self != EventMode::Skip
    }
}

/// How an estimated date is qualified when it is written
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DateStyle {
    /// "abt" for both births and deaths
    #[default]
    About,
    /// "aft" for births, "bef" for deaths
    Extremes,
}

/// Options for planning and applying a batch of estimates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchOptions {
    /// Title of the source cited by generated events
    /// Default: "Calculated Date Estimates"
    #[serde(default = "default_source_text")]
    pub source_text: String,

    /// Birth events for people without one
    #[serde(default)]
    pub add_birth: EventMode,

    /// Death events for people without one
    #[serde(default)]
    pub add_death: EventMode,

    /// Modifier used on written dates
    #[serde(default)]
    pub date_style: DateStyle,

    /// Remove events generated by an earlier run before applying
    /// Default: true
    #[serde(default = "default_remove_previous")]
    pub remove_previous: bool,
}

/// Source title used when none is configured
pub const DEFAULT_SOURCE_TEXT: &str = "Calculated Date Estimates";

fn default_source_text() -> String {
    DEFAULT_SOURCE_TEXT.to_string()
}

fn default_remove_previous() -> bool {
    true
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            source_text: default_source_text(),
            add_birth: EventMode::default(),
            add_death: EventMode::default(),
            date_style: DateStyle::default(),
            remove_previous: default_remove_previous(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = EstimatorConfig::default();
        assert_eq!(config.max_plausible_lifespan, 100);
        assert_eq!(config.max_sibling_age_spread, 20);
        assert_eq!(config.average_generation_gap, 20);
        assert_eq!(config.max_generations, None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_out_of_range() {
        let config = EstimatorConfig {
            max_plausible_lifespan: -1,
            ..EstimatorConfig::default()
        };
        assert!(matches!(config.validate(), Err(EstimatorError::Config(_))));

        let config = EstimatorConfig {
            average_generation_gap: 201,
            ..EstimatorConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_toml_partial_table() {
        let config =
            EstimatorConfig::from_toml_str("max_plausible_lifespan = 110\nmax_generations = 6")
                .unwrap();
        assert_eq!(config.max_plausible_lifespan, 110);
        assert_eq!(config.max_generations, Some(6));
        assert_eq!(config.max_sibling_age_spread, 20);
    }

    #[test]
    fn test_toml_invalid_value() {
        assert!(EstimatorConfig::from_toml_str("max_sibling_age_spread = 500").is_err());
        assert!(EstimatorConfig::from_toml_str("max_sibling_age_spread = \"x\"").is_err());
    }

    #[test]
    fn test_batch_options_defaults() {
        let options = BatchOptions::default();
        assert_eq!(options.source_text, "Calculated Date Estimates");
        assert_eq!(options.add_birth, EventMode::WithDate);
        assert_eq!(options.date_style, DateStyle::About);
        assert!(options.remove_previous);
    }

    #[test]
    fn test_batch_options_toml() {
        let options: BatchOptions = toml::from_str(
            "add_death = \"skip\"\nadd_birth = \"without-date\"\ndate_style = \"extremes\"",
        )
        .unwrap();
        assert_eq!(options.add_death, EventMode::Skip);
        assert_eq!(options.add_birth, EventMode::WithoutDate);
        assert_eq!(options.date_style, DateStyle::Extremes);
        assert_eq!(options.source_text, DEFAULT_SOURCE_TEXT);
    }
}
