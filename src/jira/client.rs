use reqwest::{Client, RequestBuilder, Response};
use serde::Serialize;
use tracing::{debug, info, instrument};

use super::error::{JiraError, Result};
use crate::models::{Issue, ProjectVersion, VersionRef};

const ISSUE_FIELDS: &str = "summary,issuetype,fixVersions";

/// Jira REST API client for issue and version bookkeeping
pub struct JiraClient {
    client: Client,
    base_url: String,
    user: String,
    token: String,
}

#[derive(Debug, Serialize)]
struct IssueUpdate<'a> {
    fields: FixVersionsField<'a>,
}

#[derive(Debug, Serialize)]
struct FixVersionsField<'a> {
    #[serde(rename = "fixVersions")]
    fix_versions: &'a [VersionRef],
}

#[derive(Debug, Serialize)]
struct CreateVersion<'a> {
    name: &'a str,
    project: &'a str,
}

impl JiraClient {
    /// Create a client using basic auth with a user and API token
    pub fn new(base_url: &str, user: String, token: String) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            user,
            token,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Web URL of an issue
    pub fn browse_url(&self, key: &str) -> String {
        format!("{}/browse/{}", self.base_url, key)
    }

    fn request(&self, builder: RequestBuilder) -> RequestBuilder {
        builder
            .basic_auth(&self.user, Some(&self.token))
            .header("Accept", "application/json")
    }

    async fn check(response: Response, target: &str) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(JiraError::from_status(status, target, body))
    }

    /// Fetch an issue by key
    #[instrument(skip(self))]
    pub async fn get_issue(&self, key: &str) -> Result<Issue> {
        let url = format!("{}/rest/api/2/issue/{}", self.base_url, key);
        let response = self
            .request(self.client.get(&url))
            .query(&[("fields", ISSUE_FIELDS)])
            .send()
            .await?;

        let issue: Issue = Self::check(response, key).await?.json().await?;

        debug!(issue_type = %issue.type_name(), "Fetched issue");

        Ok(issue)
    }

    /// Replace the fix-versions of an issue
    #[instrument(skip(self, versions), fields(count = versions.len()))]
    pub async fn update_fix_versions(&self, key: &str, versions: &[VersionRef]) -> Result<()> {
        let url = format!("{}/rest/api/2/issue/{}", self.base_url, key);
        let body = IssueUpdate {
            fields: FixVersionsField {
                fix_versions: versions,
            },
        };

        let response = self.request(self.client.put(&url)).json(&body).send().await?;
        Self::check(response, key).await?;

        debug!("Updated fix versions");

        Ok(())
    }

    /// List the versions defined on a project
    #[instrument(skip(self))]
    pub async fn project_versions(&self, project: &str) -> Result<Vec<ProjectVersion>> {
        let url = format!("{}/rest/api/2/project/{}/versions", self.base_url, project);
        let response = self.request(self.client.get(&url)).send().await?;

        let target = format!("project {}", project);
        let versions: Vec<ProjectVersion> = Self::check(response, &target).await?.json().await?;

        debug!(count = versions.len(), "Fetched project versions");

        Ok(versions)
    }

    /// Create a version on a project
    #[instrument(skip(self))]
    pub async fn create_version(&self, project: &str, name: &str) -> Result<ProjectVersion> {
        let url = format!("{}/rest/api/2/version", self.base_url);
        let body = CreateVersion { name, project };

        let response = self.request(self.client.post(&url)).json(&body).send().await?;

        let target = format!("project {}", project);
        let version: ProjectVersion = Self::check(response, &target).await?.json().await?;

        info!(id = ?version.id, "Created version");

        Ok(version)
    }
}
