use tracing::{debug, error, info, warn};

use crate::changelog::ChangelogSections;
use crate::config::IssueTypesConfig;
use crate::git::{collect_projects, scan_for_tickets};
use crate::jira::JiraClient;
use crate::models::{Category, Release};

/// A unit of work that failed and was skipped
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    pub target: String,
    pub reason: String,
}

/// What a release run did, including everything it had to skip
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    pub issues_found: usize,
    pub projects: Vec<String>,
    pub versions_created: Vec<String>,
    pub issues_tagged: usize,
    pub issues_ignored: usize,
    pub failures: Vec<Failure>,
}

impl RunSummary {
    fn fail(&mut self, target: impl Into<String>, reason: impl Into<String>) {
        self.failures.push(Failure {
            target: target.into(),
            reason: reason.into(),
        });
    }
}

/// Syncs a release onto Jira and collects changelog sections
pub struct ReleasePipeline {
    jira: JiraClient,
    types: IssueTypesConfig,
    render_link: bool,
}

impl ReleasePipeline {
    pub fn new(jira: JiraClient, types: IssueTypesConfig) -> Self {
        Self {
            jira,
            types,
            render_link: false,
        }
    }

    pub fn with_links(mut self, render_link: bool) -> Self {
        self.render_link = render_link;
        self
    }

    /// Run the whole flow over a commit log
    pub async fn run(&self, log: &str, release: &Release) -> (ChangelogSections, RunSummary) {
        let mut summary = RunSummary::default();

        let issues = scan_for_tickets(log);
        let projects = collect_projects(&issues);
        summary.issues_found = issues.len();

        info!(
            release = release.name(),
            issues = issues.len(),
            projects = projects.len(),
            "Starting release sync"
        );

        self.sync_versions(&projects, release, &mut summary).await;
        summary.projects = projects;
        let sections = self.process_issues(&issues, release, &mut summary).await;

        (sections, summary)
    }

    /// Make sure every project has the release version, creating it if absent
    pub async fn sync_versions(
        &self,
        projects: &[String],
        release: &Release,
        summary: &mut RunSummary,
    ) {
        for project in projects {
            let versions = match self.jira.project_versions(project).await {
                Ok(versions) => versions,
                Err(e) => {
                    warn!(project = %project, error = %e, "Could not find project");
                    summary.fail(format!("project {}", project), e.to_string());
                    continue;
                }
            };

            if versions.iter().any(|v| v.name == release.name()) {
                info!(project = %project, version = release.name(), "Version exists, not creating one");
                continue;
            }

            info!(project = %project, version = release.name(), "Version not found, creating it");

            match self.jira.create_version(project, release.name()).await {
                Ok(_) => summary.versions_created.push(project.clone()),
                Err(e) => {
                    if e.is_unauthorized() {
                        error!(
                            project = %project,
                            "Not able to create version, check that the Jira user has admin rights"
                        );
                    } else {
                        error!(project = %project, error = %e, "Not able to create version");
                    }
                    summary.fail(format!("project {}", project), e.to_string());
                }
            }
        }
    }

    /// Tag each issue with the release and bucket it for the changelog
    pub async fn process_issues(
        &self,
        issues: &[String],
        release: &Release,
        summary: &mut RunSummary,
    ) -> ChangelogSections {
        let mut sections = ChangelogSections::default();
        let link_base = self.render_link.then(|| self.jira.base_url());

        for key in issues {
            let issue = match self.jira.get_issue(key).await {
                Ok(issue) => issue,
                Err(e) => {
                    warn!(issue = %key, error = %e, "{} not found", key);
                    summary.fail(key.clone(), e.to_string());
                    continue;
                }
            };

            let versions = issue.fix_versions_with(release);
            match self.jira.update_fix_versions(&issue.key, &versions).await {
                Ok(()) => summary.issues_tagged += 1,
                Err(e) => {
                    error!(issue = %issue.key, error = %e, "Failed to set fix version");
                    summary.fail(issue.key.clone(), e.to_string());
                }
            }

            if !self.types.is_configured(issue.type_name()) {
                debug!(issue = %issue.key, issue_type = %issue.type_name(), "Unlisted issue type, treating as added");
            }

            if sections.push(&issue, &self.types, link_base) == Category::Ignored {
                summary.issues_ignored += 1;
            }
        }

        sections
    }
}
