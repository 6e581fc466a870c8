//! Main NavConfig and conversion methods.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::arbiter::ArbiterConfig;
use crate::core::CadenceConfig;
use crate::history::HistoryConfig;
use crate::navigation::{LocomotionConfig, StrategyConfig};
use crate::report::ReportConfig;
use crate::sensor::{ObstructionConfig, SensorConfig};
use crate::target::SelectorConfig;
use crate::tone::ToneConfig;

use super::error::ConfigLoadError;

/// Full engine configuration loaded from YAML
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Default)]
pub struct NavConfig {
    /// Locomotion settings (speeds, thresholds, progress cues)
    #[serde(default)]
    pub navigation: LocomotionConfig,

    /// Strategy escalation settings
    #[serde(default)]
    pub strategy: StrategyConfig,

    /// Position history settings
    #[serde(default)]
    pub history: HistoryConfig,

    /// Ray sensor settings
    #[serde(default)]
    pub sensor: SensorConfig,

    /// Obstruction monitor settings
    #[serde(default)]
    pub obstruction: ObstructionConfig,

    /// Announcement cooldowns
    #[serde(default)]
    pub arbiter: ArbiterConfig,

    /// Tone channel settings
    #[serde(default)]
    pub tones: ToneConfig,

    /// Tick intervals
    #[serde(default)]
    pub cadence: CadenceConfig,

    /// Target priority settings
    #[serde(default)]
    pub selector: SelectorConfig,

    /// On-demand report ranges
    #[serde(default)]
    pub reports: ReportConfig,
}

impl NavConfig {
    /// Load configuration from a YAML file
    pub fn load(path: &Path) -> Result<Self, ConfigLoadError> {
        let contents =
            std::fs::read_to_string(path).map_err(|e| ConfigLoadError::Io(e.to_string()))?;
        Self::from_yaml(&contents)
    }

    /// Load from default config path (configs/dhvani.yaml)
    pub fn load_default() -> Result<Self, ConfigLoadError> {
        let path = Path::new("configs/dhvani.yaml");
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Parse from YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigLoadError> {
        let config: Self =
            serde_yaml::from_str(yaml).map_err(|e| ConfigLoadError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize back to YAML
    pub fn to_yaml(&self) -> Result<String, ConfigLoadError> {
        serde_yaml::to_string(self).map_err(|e| ConfigLoadError::Parse(e.to_string()))
    }

    /// Convert to LocomotionConfig with the strategy section applied
    pub fn to_locomotion_config(&self) -> LocomotionConfig {
        self.navigation.clone().with_strategy(self.strategy.clone())
    }

    /// Reject combinations that would silently disable detection.
    pub fn validate(&self) -> Result<(), ConfigLoadError> {
        let nav = &self.navigation;
        let history = &self.history;

        if self.strategy.cycle_limit == 0 {
            return Err(ConfigLoadError::Invalid(
                "strategy.cycle_limit must be at least 1".to_string(),
            ));
        }
        if history.capacity < history.oscillation_window {
            return Err(ConfigLoadError::Invalid(format!(
                "history.capacity ({}) is smaller than history.oscillation_window ({})",
                history.capacity, history.oscillation_window
            )));
        }
        if history.loop_min_age >= history.capacity {
            return Err(ConfigLoadError::Invalid(format!(
                "history.loop_min_age ({}) must be below history.capacity ({})",
                history.loop_min_age, history.capacity
            )));
        }
        if !(nav.turn_smoothing > 0.0 && nav.turn_smoothing <= 1.0) {
            return Err(ConfigLoadError::Invalid(format!(
                "navigation.turn_smoothing ({}) must be in (0, 1]",
                nav.turn_smoothing
            )));
        }
        for (name, speed) in [
            ("forward_speed", nav.forward_speed),
            ("strafe_speed", nav.strafe_speed),
            ("max_rotate", nav.max_rotate),
            ("behind_turn", nav.behind_turn),
        ] {
            if !(0.0..=1.0).contains(&speed) {
                return Err(ConfigLoadError::Invalid(format!(
                    "navigation.{} ({}) must be in [0, 1]",
                    name, speed
                )));
            }
        }
        if nav.door_wait_distance >= nav.probe_range || nav.avoid_distance >= nav.probe_range {
            return Err(ConfigLoadError::Invalid(
                "navigation.probe_range must exceed the door wait and avoid distances".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config_is_valid() {
        let config = NavConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.to_locomotion_config().strategy.cycle_limit, 2);
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let yaml = r#"
navigation:
  forward_speed: 0.6
strategy:
  cycle_limit: 3
cadence:
  navigation_tone: 15
"#;
        let config = NavConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.navigation.forward_speed, 0.6);
        assert_eq!(config.navigation.arrival_distance, 2500.0);
        assert_eq!(config.cadence.navigation_tone, 15);
        assert_eq!(config.cadence.radar, 30);
        assert_eq!(config.history.capacity, 30);

        let locomotion = config.to_locomotion_config();
        assert_eq!(locomotion.strategy.cycle_limit, 3);
        assert_eq!(locomotion.strategy.backtrack_ticks, 90);
    }

    #[test]
    fn test_empty_yaml() {
        let config = NavConfig::from_yaml("{}").unwrap();
        assert_eq!(config, NavConfig::default());
    }

    #[test]
    fn test_parse_error() {
        let err = NavConfig::from_yaml("navigation: [1, 2").unwrap_err();
        assert!(matches!(err, ConfigLoadError::Parse(_)));
        assert_eq!(err.code(), "CONFIG_PARSE");
    }

    #[test]
    fn test_invalid_combination() {
        let err = NavConfig::from_yaml("history:\n  capacity: 10\n").unwrap_err();
        assert!(matches!(err, ConfigLoadError::Invalid(_)));

        let err = NavConfig::from_yaml("strategy:\n  cycle_limit: 0\n").unwrap_err();
        assert!(err.to_string().contains("cycle_limit"));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "arbiter:\n  high_cooldown_ms: 500").unwrap();

        let config = NavConfig::load(file.path()).unwrap();
        assert_eq!(config.arbiter.high_cooldown_ms, 500);
        assert_eq!(config.arbiter.critical_cooldown_ms, 600);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = NavConfig::load(&dir.path().join("absent.yaml")).unwrap_err();
        assert!(matches!(err, ConfigLoadError::Io(_)));
    }

    #[test]
    fn test_yaml_round_trip_preserves_values() {
        let mut config = NavConfig::default();
        config.navigation.interact_key = "E".to_string();
        config.tones.radar_enabled = false;

        let yaml = config.to_yaml().unwrap();
        let parsed = NavConfig::from_yaml(&yaml).unwrap();
        assert_eq!(parsed.navigation.interact_key, "E");
        assert!(!parsed.tones.radar_enabled);
    }
}
