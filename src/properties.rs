use std::collections::HashMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::models::Release;

/// Flat `key=value` properties, as found in a gradle.properties file
#[derive(Debug, Clone, Default)]
pub struct Properties {
    values: HashMap<String, String>,
}

impl Properties {
    /// Load properties from a file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read properties file: {}", path.display()))?;

        let properties = Self::parse(&content);
        info!(path = %path.display(), count = properties.values.len(), "Loaded properties");

        Ok(properties)
    }

    /// Parse properties text. Blank lines and `#` comments are skipped;
    /// values keep any further `=` and lose surrounding whitespace and quotes.
    pub fn parse(content: &str) -> Self {
        let mut values = HashMap::new();

        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let (key, value) = line.split_once('=').unwrap_or((line, ""));
            let key = key.trim().to_string();
            let value = value.trim().trim_matches('"').to_string();

            debug!(key = %key, "Parsed property");
            values.insert(key, value);
        }

        Self { values }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Get a key that must be present
    pub fn require(&self, key: &str) -> Result<&str> {
        self.get(key)
            .with_context(|| format!("Missing required property: {}", key))
    }

    /// Release built from versionMajor, versionMinor and versionPatch
    pub fn release(&self) -> Result<Release> {
        Ok(Release::new(
            self.require("versionMajor")?,
            self.require("versionMinor")?,
            self.require("versionPatch")?,
        ))
    }

    pub fn build_number(&self) -> Result<&str> {
        self.require("buildNumber")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_parse_quoted_value() {
        let props = Properties::parse(r#"key = "1.2.3""#);
        assert_eq!(props.get("key"), Some("1.2.3"));
    }

    #[test]
    fn test_parse_skips_comments_and_blanks() {
        let props = Properties::parse("# comment\n\n  \nversionMajor=1\n#versionMinor=9\n");
        assert_eq!(props.get("versionMajor"), Some("1"));
        assert_eq!(props.get("versionMinor"), None);
    }

    #[test]
    fn test_parse_value_with_separator() {
        let props = Properties::parse("org.gradle.jvmargs=-Xmx2048m -Dfile.encoding=UTF-8");
        assert_eq!(
            props.get("org.gradle.jvmargs"),
            Some("-Xmx2048m -Dfile.encoding=UTF-8")
        );
    }

    #[test]
    fn test_parse_key_without_value() {
        let props = Properties::parse("android.useAndroidX");
        assert_eq!(props.get("android.useAndroidX"), Some(""));
    }

    #[test]
    fn test_release_and_build_number() {
        let props = Properties::parse(
            "versionMajor=2\nversionMinor = 5\nversionPatch=\"1\"\nbuildNumber=418\n",
        );

        assert_eq!(props.release().unwrap().name(), "2.5.1");
        assert_eq!(props.build_number().unwrap(), "418");
    }

    #[test]
    fn test_release_missing_key() {
        let props = Properties::parse("versionMajor=2\nversionMinor=5\n");
        let err = props.release().unwrap_err();
        assert!(err.to_string().contains("versionPatch"));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("gradle.properties");
        fs::write(&path, "versionMajor=1\nversionMinor=0\nversionPatch=0\n").unwrap();

        let props = Properties::load(&path).unwrap();
        assert_eq!(props.release().unwrap().name(), "1.0.0");
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempdir().unwrap();
        assert!(Properties::load(dir.path().join("nope.properties")).is_err());
    }
}
