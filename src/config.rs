//! Settings loaded from `.rubystubs/settings.toml`.
//!
//! Every field has a default, so a partial file (or no file at all) is valid.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Directory holding the local configuration.
pub const LOCAL_DIR: &str = ".rubystubs";
const SETTINGS_FILE: &str = "settings.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to access '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid settings in '{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Failed to serialize settings: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Configuration file already exists: {0} (use --force to overwrite)")]
    AlreadyExists(PathBuf),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Directory containing one sub-directory per snapshot.
    pub stubs_root: PathBuf,

    /// Directory-name prefix in front of the version digits (`rubystubs33`).
    pub snapshot_prefix: String,

    /// Snapshot used when `--snapshot` is not given. Newest when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_version: Option<String>,

    pub completion: CompletionConfig,
    pub lint: LintConfig,
    pub logging: LoggingConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            stubs_root: PathBuf::from("vsix/stubs"),
            snapshot_prefix: "rubystubs".to_string(),
            default_version: None,
            completion: CompletionConfig::default(),
            lint: LintConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompletionConfig {
    pub max_results: usize,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self { max_results: 50 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LintConfig {
    /// Superclasses and mixins accepted without a declaration in the snapshot.
    pub builtin_roots: Vec<String>,

    /// Rule codes to skip, e.g. `"documented-params"`.
    pub disabled_rules: Vec<String>,
}

impl Default for LintConfig {
    fn default() -> Self {
        let builtin_roots = [
            "BasicObject",
            "Object",
            "Module",
            "Class",
            "Kernel",
            "Comparable",
            "Enumerable",
            "Exception",
            "StandardError",
            "Struct",
            "Data",
            "Delegator",
        ];
        Self {
            builtin_roots: builtin_roots.iter().map(|s| s.to_string()).collect(),
            disabled_rules: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Level applied to every target without an explicit entry.
    pub default: String,

    /// Per-target levels, e.g. `parser = "debug"`.
    pub modules: BTreeMap<String, String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            default: "warn".to_string(),
            modules: BTreeMap::new(),
        }
    }
}

impl Settings {
    /// Path of the settings file relative to the working directory.
    pub fn default_config_path() -> PathBuf {
        Path::new(LOCAL_DIR).join(SETTINGS_FILE)
    }

    /// Load from the default location, falling back to defaults when absent.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::default_config_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Err carries a warning for the user when no settings file exists yet.
    pub fn check_init() -> Result<(), String> {
        let path = Self::default_config_path();
        if path.exists() {
            Ok(())
        } else {
            Err(format!(
                "No configuration found at {} (run 'rubystubs init' to create one)",
                path.display()
            ))
        }
    }

    /// Write the default settings to `.rubystubs/settings.toml`.
    pub fn init_config_file(force: bool) -> Result<PathBuf, ConfigError> {
        Self::init_config_file_at(Path::new(LOCAL_DIR), force)
    }

    pub fn init_config_file_at(dir: &Path, force: bool) -> Result<PathBuf, ConfigError> {
        let path = dir.join(SETTINGS_FILE);
        if path.exists() && !force {
            return Err(ConfigError::AlreadyExists(path));
        }
        std::fs::create_dir_all(dir).map_err(|source| ConfigError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
        let content = Self::default().to_toml()?;
        std::fs::write(&path, content).map_err(|source| ConfigError::Io {
            path: path.clone(),
            source,
        })?;
        Ok(path)
    }

    /// Resolve `stubs_root` against the project owning `config_path`.
    ///
    /// Relative roots from an explicit config file are anchored at the
    /// directory containing `.rubystubs/`, otherwise at the working directory.
    pub fn resolve_stubs_root(&self, config_path: Option<&Path>) -> PathBuf {
        if self.stubs_root.is_absolute() {
            return self.stubs_root.clone();
        }
        let Some(parent) = config_path.and_then(Path::parent) else {
            return self.stubs_root.clone();
        };
        let project_root = if parent.file_name().is_some_and(|name| name == LOCAL_DIR) {
            parent.parent().unwrap_or(parent)
        } else {
            parent
        };
        project_root.join(&self.stubs_root)
    }
}

impl LintConfig {
    pub fn is_rule_enabled(&self, code: &str) -> bool {
        !self.disabled_rules.iter().any(|rule| rule == code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn partial_file_keeps_defaults() {
        let settings = Settings::from_toml(
            r#"
stubs_root = "stubs"

[completion]
max_results = 10
"#,
        )
        .unwrap();

        assert_eq!(settings.stubs_root, PathBuf::from("stubs"));
        assert_eq!(settings.completion.max_results, 10);
        assert_eq!(settings.snapshot_prefix, "rubystubs");
        assert!(settings.lint.builtin_roots.contains(&"StandardError".to_string()));
    }

    #[test]
    fn default_settings_survive_toml() {
        let settings = Settings::default();
        let text = settings.to_toml().unwrap();
        assert_eq!(Settings::from_toml(&text).unwrap(), settings);
    }

    #[test]
    fn init_refuses_to_overwrite_without_force() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join(LOCAL_DIR);

        let path = Settings::init_config_file_at(&dir, false).unwrap();
        assert!(path.exists());

        let second = Settings::init_config_file_at(&dir, false);
        assert!(matches!(second, Err(ConfigError::AlreadyExists(_))));

        assert!(Settings::init_config_file_at(&dir, true).is_ok());
    }

    #[test]
    fn load_from_reports_invalid_toml() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("settings.toml");
        std::fs::write(&path, "stubs_root = [").unwrap();

        let result = Settings::load_from(&path);
        assert!(matches!(result, Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn stubs_root_is_anchored_at_project_root() {
        let settings = Settings::default();
        let config = Path::new("/work/project/.rubystubs/settings.toml");
        assert_eq!(
            settings.resolve_stubs_root(Some(config)),
            PathBuf::from("/work/project/vsix/stubs")
        );
        assert_eq!(
            settings.resolve_stubs_root(None),
            PathBuf::from("vsix/stubs")
        );
    }

    #[test]
    fn disabled_rules_are_respected() {
        let mut lint = LintConfig::default();
        lint.disabled_rules.push("file-naming".to_string());
        assert!(!lint.is_rule_enabled("file-naming"));
        assert!(lint.is_rule_enabled("dangling-alias"));
    }
}
