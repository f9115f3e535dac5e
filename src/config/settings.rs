//! Configuration settings for Planvoice.

use crate::error::{ConfigError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure.
///
/// The action word lists are data, not code: they can be edited in the TOML
/// file without touching the classification logic.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub sanitizer: SanitizerConfig,
    /// Words that refine the classifier's "interact" class.
    pub interact_actions: InteractActions,
    /// Words that map to the `show` action.
    pub show_actions: Vec<String>,
    /// Words that map to the `trigger` action.
    pub trigger_actions: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sanitizer: SanitizerConfig::default(),
            interact_actions: InteractActions::default(),
            show_actions: vec![
                "show".to_string(),
                "display".to_string(),
                "list".to_string(),
                "view".to_string(),
                "see".to_string(),
            ],
            trigger_actions: vec![
                "launch".to_string(),
                "start".to_string(),
                "activate".to_string(),
                "pause".to_string(),
                "stop".to_string(),
                "run".to_string(),
            ],
        }
    }
}

impl Config {
    /// Load configuration from a TOML file. Tildes in the path are expanded.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let expanded = shellexpand::tilde(&path.to_string_lossy().into_owned()).into_owned();
        let content = std::fs::read_to_string(expanded).map_err(ConfigError::ReadFile)?;
        Self::from_str(&content)
    }

    /// Parse configuration from a TOML string.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from default locations or use defaults.
    pub fn load() -> Result<Self> {
        let config_paths = [
            // Current directory
            PathBuf::from("planvoice.toml"),
            PathBuf::from("config.toml"),
            // User config directory
            dirs::config_dir()
                .map(|p| p.join("planvoice/config.toml"))
                .unwrap_or_default(),
            // Home directory
            dirs::home_dir()
                .map(|p| p.join(".planvoice/config.toml"))
                .unwrap_or_default(),
        ];

        for path in &config_paths {
            if path.exists() {
                tracing::info!("Loading config from: {}", path.display());
                return Self::from_file(path);
            }
        }

        tracing::info!("No config file found, using defaults");
        Ok(Config::default())
    }

    /// Validate the configuration.
    fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.sanitizer.granularity_threshold) {
            return Err(ConfigError::Invalid(
                "sanitizer.granularity_threshold must be in [0, 1]".to_string(),
            )
            .into());
        }
        if !(0.0..=1.0).contains(&self.sanitizer.budget_anchor_threshold) {
            return Err(ConfigError::Invalid(
                "sanitizer.budget_anchor_threshold must be in [0, 1]".to_string(),
            )
            .into());
        }

        // A word in two categories would make action classification ambiguous.
        let lists: [(&str, &[String]); 5] = [
            ("interact_actions.create", &self.interact_actions.create),
            ("interact_actions.modify", &self.interact_actions.modify),
            ("interact_actions.decision", &self.interact_actions.decision),
            ("show_actions", &self.show_actions),
            ("trigger_actions", &self.trigger_actions),
        ];
        for (name, list) in &lists {
            if list.is_empty() {
                return Err(ConfigError::MissingField(name.to_string()).into());
            }
        }
        for (i, (name_a, list_a)) in lists.iter().enumerate() {
            for (name_b, list_b) in lists.iter().skip(i + 1) {
                if let Some(word) = list_a
                    .iter()
                    .find(|w| list_b.iter().any(|x| x.eq_ignore_ascii_case(w)))
                {
                    return Err(ConfigError::Invalid(format!(
                        "word '{word}' appears in both {name_a} and {name_b}"
                    ))
                    .into());
                }
            }
        }

        Ok(())
    }
}

/// Thresholds for the tag sanitizer's fuzzy repairs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SanitizerConfig {
    /// Minimum similarity for relabeling a tag as a granularity mention.
    pub granularity_threshold: f64,
    /// Minimum similarity for treating a token as a "budget" anchor word.
    pub budget_anchor_threshold: f64,
}

impl Default for SanitizerConfig {
    fn default() -> Self {
        Self {
            granularity_threshold: 0.85,
            budget_anchor_threshold: 0.9,
        }
    }
}

/// Sub-groups of the "interact" action class.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InteractActions {
    pub create: Vec<String>,
    pub modify: Vec<String>,
    pub decision: Vec<String>,
}

impl Default for InteractActions {
    fn default() -> Self {
        Self {
            create: vec![
                "create".to_string(),
                "add".to_string(),
                "make".to_string(),
                "new".to_string(),
                "build".to_string(),
            ],
            modify: vec![
                "modify".to_string(),
                "change".to_string(),
                "edit".to_string(),
                "update".to_string(),
                "adjust".to_string(),
                "set".to_string(),
            ],
            decision: vec![
                "approve".to_string(),
                "reject".to_string(),
                "decide".to_string(),
                "confirm".to_string(),
                "accept".to_string(),
                "decline".to_string(),
            ],
        }
    }
}
