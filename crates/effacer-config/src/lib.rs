use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Configuration for effacer (~/.config/effacer/config.toml)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Replies to a `<bash-input>` record longer than this are effaced
    #[serde(default = "default_local_output_threshold")]
    pub local_output_threshold: usize,

    #[serde(default)]
    pub clipboard: ClipboardConfig,

    #[serde(default)]
    pub report: ReportConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClipboardConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Copied after a run; `{session_id}` is replaced with the new id
    #[serde(default = "default_resume_command")]
    pub resume_command: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            local_output_threshold: default_local_output_threshold(),
            clipboard: ClipboardConfig::default(),
            report: ReportConfig::default(),
        }
    }
}

impl Default for ClipboardConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            resume_command: default_resume_command(),
        }
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

fn default_local_output_threshold() -> usize {
    100
}

fn default_true() -> bool {
    true
}

fn default_resume_command() -> String {
    "claude --resume {session_id}".to_string()
}

impl ClipboardConfig {
    pub fn resume_command_for(&self, session_id: &str) -> String {
        self.resume_command.replace("{session_id}", session_id)
    }
}

impl Config {
    /// Load config from default location or create default if not found
    pub fn load() -> anyhow::Result<Self> {
        let path = Self::config_path();

        if path.exists() {
            Self::load_from(&path)
        } else {
            // Create default config file
            let config = Config::default();
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let content = toml::to_string_pretty(&config)?;
            std::fs::write(&path, content)?;
            Ok(config)
        }
    }

    /// Load config from an explicit file, which must exist
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("cannot read config {}: {}", path.display(), e))?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Get config file path
    pub fn config_path() -> PathBuf {
        if let Some(dirs) = directories::ProjectDirs::from("com", "effacer", "effacer") {
            dirs.config_dir().join("config.toml")
        } else {
            PathBuf::from("~/.effacer/config.toml")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.local_output_threshold, 100);
        assert!(config.clipboard.enabled);
        assert!(config.report.enabled);
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default();
        let toml_str = toml::to_string(&config).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.local_output_threshold, config.local_output_threshold);
        assert_eq!(parsed.clipboard.resume_command, config.clipboard.resume_command);
    }

    #[test]
    fn test_partial_config() {
        let toml_str = r#"
local_output_threshold = 200

[clipboard]
enabled = false
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.local_output_threshold, 200);
        assert!(!config.clipboard.enabled);
        assert_eq!(config.clipboard.resume_command, "claude --resume {session_id}");
        assert!(config.report.enabled);
    }

    #[test]
    fn test_resume_command() {
        let clipboard = ClipboardConfig::default();
        assert_eq!(
            clipboard.resume_command_for("abc-00effaced001"),
            "claude --resume abc-00effaced001"
        );
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[report]\nenabled = false\n").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert!(!config.report.enabled);

        assert!(Config::load_from(&dir.path().join("missing.toml")).is_err());
    }
}
