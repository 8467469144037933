use serde::{Deserialize, Serialize};

/// A release derived from the version properties
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Release {
    name: String,
}

impl Release {
    pub fn new(major: &str, minor: &str, patch: &str) -> Self {
        Self {
            name: format!("{}.{}.{}", major, minor, patch),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Named fix-version reference as Jira returns and accepts it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionRef {
    pub name: String,
}

/// Issue type as reported by Jira
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IssueType {
    pub name: String,
}

/// The subset of issue fields the changelog needs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IssueFields {
    #[serde(default)]
    pub summary: String,
    pub issuetype: IssueType,
    #[serde(rename = "fixVersions", default)]
    pub fix_versions: Vec<VersionRef>,
}

/// An issue fetched from Jira
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Issue {
    pub key: String,
    pub fields: IssueFields,
}

impl Issue {
    pub fn type_name(&self) -> &str {
        &self.fields.issuetype.name
    }

    pub fn summary(&self) -> &str {
        &self.fields.summary
    }

    /// Existing fix-versions with the release appended, unless already present
    pub fn fix_versions_with(&self, release: &Release) -> Vec<VersionRef> {
        let mut versions = self.fields.fix_versions.clone();
        if !versions.iter().any(|v| v.name == release.name()) {
            versions.push(VersionRef {
                name: release.name().to_string(),
            });
        }
        versions
    }
}

/// A version defined on a Jira project
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectVersion {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
}

/// Changelog bucket an issue lands in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Added,
    Fixed,
    Ignored,
}
