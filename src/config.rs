use std::path::Path;

use tracing::warn;

use crate::ai::QLearningConfig;
use crate::error::ConfigError;
use crate::training::trainer::TrainerConfig;

/// Board dimensions shared by both binaries.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Columns.
    pub m: usize,
    /// Rows.
    pub n: usize,
    /// Marks in a row needed to win.
    pub k: usize,
    /// Play gomoku (19x19, five in a row) regardless of m, n and k.
    pub gomoku: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            m: 3,
            n: 3,
            k: 3,
            gomoku: false,
        }
    }
}

impl GameConfig {
    /// Effective `(m, n, k)`.
    pub fn dimensions(&self) -> (usize, usize, usize) {
        if self.gomoku {
            (19, 19, 5)
        } else {
            (self.m, self.n, self.k)
        }
    }
}

/// Top-level application configuration, loadable from TOML.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub game: GameConfig,
    pub agent: QLearningConfig,
    pub training: TrainerConfig,
}

impl AppConfig {
    /// Load configuration from a TOML file. Values are not validated, so
    /// callers can apply overrides before calling [`AppConfig::validate`].
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration from a TOML file, falling back to defaults if the file
    /// does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            warn!(path = %path.display(), "Config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let (m, n, k) = self.game.dimensions();
        if m == 0 || n == 0 || k == 0 {
            return Err(ConfigError::Validation(
                "game.m, game.n and game.k must be > 0".into(),
            ));
        }
        if k > m && k > n {
            return Err(ConfigError::Validation(format!(
                "game.k ({k}) must fit in a row or a column of a {m}x{n} board"
            )));
        }

        let rates = [
            ("agent.learning_rate", self.agent.learning_rate),
            ("agent.discount_factor", self.agent.discount_factor),
            ("agent.exploration_factor", self.agent.exploration_factor),
        ];
        for (name, value) in rates {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::Validation(format!(
                    "{name} must be in [0, 1]"
                )));
            }
        }

        if self.training.save_interval == 0 {
            return Err(ConfigError::Validation(
                "training.save_interval must be > 0".into(),
            ));
        }
        if self.training.log_interval == 0 {
            return Err(ConfigError::Validation(
                "training.log_interval must be > 0".into(),
            ));
        }
        if self.training.max_agent_failures == 0 {
            return Err(ConfigError::Validation(
                "training.max_agent_failures must be > 0".into(),
            ));
        }
        if self.agent.learn && self.training.model_path.as_os_str().is_empty() {
            return Err(ConfigError::Validation(
                "training.model_path must be set when learning".into(),
            ));
        }

        Ok(())
    }

    /// Generate a TOML string with all default values (useful for creating
    /// example config files).
    pub fn default_toml() -> String {
        toml::to_string_pretty(&AppConfig::default()).expect("default config serializes")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::PathBuf;

    #[test]
    fn test_default_config_is_valid() {
        let config = AppConfig::default();
        config.validate().expect("default config should be valid");
        assert_eq!(config.game.dimensions(), (3, 3, 3));
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let toml_str = r#"
[agent]
learning_rate = 0.5
"#;
        let config: AppConfig = toml::from_str(toml_str).unwrap();
        assert!((config.agent.learning_rate - 0.5).abs() < 1e-9);
        assert!((config.agent.discount_factor - 0.8).abs() < 1e-9);
        assert_eq!(config.training.rounds, 10_000);
        assert_eq!(config.game, GameConfig::default());
    }

    #[test]
    fn test_empty_toml_uses_all_defaults() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_gomoku_overrides_dimensions() {
        let game = GameConfig {
            m: 4,
            n: 4,
            k: 3,
            gomoku: true,
        };
        assert_eq!(game.dimensions(), (19, 19, 5));
    }

    #[test]
    fn test_validation_rejects_unwinnable_board() {
        let mut config = AppConfig::default();
        config.game.k = 4;
        assert!(config.validate().is_err());

        // A line fitting one axis is enough
        config.game.m = 4;
        config.validate().unwrap();
    }

    #[test]
    fn test_validation_rejects_zero_dimension() {
        let mut config = AppConfig::default();
        config.game.n = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_rates_out_of_range() {
        let mut config = AppConfig::default();
        config.agent.exploration_factor = 1.5;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.agent.learning_rate = -0.1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_zero_intervals() {
        let mut config = AppConfig::default();
        config.training.save_interval = 0;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.training.max_agent_failures = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_requires_model_path_when_learning() {
        let mut config = AppConfig::default();
        config.training.model_path = PathBuf::new();
        assert!(config.validate().is_err());

        config.agent.learn = false;
        config.validate().unwrap();
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let config = AppConfig::load_or_default(Path::new("nonexistent_config.toml")).unwrap();
        assert_eq!(config.training.rounds, 10_000);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test_config.toml");
        let mut f = std::fs::File::create(&path).unwrap();
        writeln!(
            f,
            r#"
[game]
m = 7
n = 6
k = 4

[training]
rounds = 500
model_path = "c4.json"
"#
        )
        .unwrap();

        let config = AppConfig::load(&path).unwrap();
        assert_eq!(config.game.dimensions(), (7, 6, 4));
        assert_eq!(config.training.rounds, 500);
        assert_eq!(config.training.model_path, PathBuf::from("c4.json"));
        assert_eq!(config.agent, QLearningConfig::default());
    }

    #[test]
    fn test_load_rejects_malformed_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "[game\n").unwrap();
        assert!(matches!(AppConfig::load(&path), Err(ConfigError::TomlParse(_))));
    }

    #[test]
    fn test_load_defers_validation_to_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("partial.toml");
        std::fs::write(&path, "[game]\nk = 5\n").unwrap();

        let mut config = AppConfig::load(&path).unwrap();
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));

        config.game.m = 5;
        config.validate().unwrap();
        assert_eq!(config.game.dimensions(), (5, 3, 5));
    }

    #[test]
    fn test_default_toml_roundtrips() {
        let toml_str = AppConfig::default_toml();
        let config: AppConfig = toml::from_str(&toml_str).unwrap();
        config.validate().expect("roundtripped config should be valid");
        assert_eq!(config, AppConfig::default());
    }
}
