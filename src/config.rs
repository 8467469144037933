use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::models::Category;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub jira: JiraConfig,
    pub issue_types: IssueTypesConfig,
    pub git: GitConfig,
    /// Properties file holding the version and build number
    pub properties_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            jira: JiraConfig::default(),
            issue_types: IssueTypesConfig::default(),
            git: GitConfig::default(),
            properties_path: PathBuf::from("gradle.properties"),
        }
    }
}

/// Jira server settings. Credentials never live here.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct JiraConfig {
    pub server_url: Option<String>,
    /// Render issue keys as links to `<server>/browse/<key>`
    pub render_link: bool,
}

/// Issue type names per changelog bucket
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IssueTypesConfig {
    pub bug: Vec<String>,
    pub feature: Vec<String>,
    pub ignored: Vec<String>,
}

impl Default for IssueTypesConfig {
    fn default() -> Self {
        Self {
            bug: vec!["Bug".to_string(), "InstaBug".to_string()],
            feature: vec!["Story".to_string(), "Task".to_string()],
            ignored: vec!["Sub-task".to_string()],
        }
    }
}

impl IssueTypesConfig {
    /// Bucket for an issue type name. Unknown types count as added.
    pub fn categorize(&self, type_name: &str) -> Category {
        if self.bug.iter().any(|t| t == type_name) {
            Category::Fixed
        } else if self.ignored.iter().any(|t| t == type_name) {
            Category::Ignored
        } else {
            Category::Added
        }
    }

    /// Whether a type name appears in any of the lists
    pub fn is_configured(&self, type_name: &str) -> bool {
        self.bug
            .iter()
            .chain(&self.feature)
            .chain(&self.ignored)
            .any(|t| t == type_name)
    }
}

/// Git commands used to read commit subjects
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GitConfig {
    /// Shell command listing subjects since the last tag
    pub ticket_log_command: String,
    /// Shell command listing every commit subject
    pub full_log_command: String,
}

impl Default for GitConfig {
    fn default() -> Self {
        Self {
            ticket_log_command: r#"git log $(git describe --abbrev=0 --tag)..HEAD --format="%s""#
                .to_string(),
            full_log_command: "git log --pretty=%s".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from a YAML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            info!(path = %path.display(), "Config file not found, using defaults");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        info!(path = %path.display(), "Loaded configuration");

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.jira.server_url.is_none());
        assert!(!config.jira.render_link);
        assert_eq!(config.issue_types.bug, vec!["Bug", "InstaBug"]);
        assert_eq!(config.properties_path, PathBuf::from("gradle.properties"));
        assert!(config.git.ticket_log_command.contains("git describe"));
    }

    #[test]
    fn test_categorize() {
        let types = IssueTypesConfig::default();

        assert_eq!(types.categorize("Bug"), Category::Fixed);
        assert_eq!(types.categorize("InstaBug"), Category::Fixed);
        assert_eq!(types.categorize("Story"), Category::Added);
        assert_eq!(types.categorize("Sub-task"), Category::Ignored);
        // Unknown types default into added
        assert_eq!(types.categorize("Epic"), Category::Added);
        // Matching is case-sensitive
        assert_eq!(types.categorize("bug"), Category::Added);

        assert!(types.is_configured("Task"));
        assert!(!types.is_configured("Epic"));
    }

    #[test]
    fn test_parse_yaml() {
        let yaml = r#"
jira:
  server_url: https://example.atlassian.net
  render_link: true

issue_types:
  bug:
    - Defect
  ignored:
    - Sub-task
    - Spike

properties_path: app/version.properties
"#;

        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(
            config.jira.server_url.as_deref(),
            Some("https://example.atlassian.net")
        );
        assert!(config.jira.render_link);
        assert_eq!(config.issue_types.bug, vec!["Defect"]);
        assert_eq!(config.issue_types.feature, vec!["Story", "Task"]);
        assert_eq!(config.issue_types.ignored.len(), 2);
        assert_eq!(config.properties_path, PathBuf::from("app/version.properties"));
        assert_eq!(config.git.full_log_command, "git log --pretty=%s");
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let dir = tempdir().unwrap();
        let config = Config::load(dir.path().join("missing.yml")).unwrap();
        assert_eq!(config.issue_types.ignored, vec!["Sub-task"]);
    }

    #[test]
    fn test_partial_yaml_keeps_properties_default() {
        let config: Config = serde_yaml::from_str("jira:\n  render_link: true\n").unwrap();
        assert!(config.jira.render_link);
        assert_eq!(config.properties_path, PathBuf::from("gradle.properties"));
    }

    #[test]
    fn test_load_invalid_yaml() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.yml");
        fs::write(&path, "jira: [not, a, map").unwrap();
        assert!(Config::load(&path).is_err());
    }
}
