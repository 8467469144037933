pub mod changelog;
pub mod config;
pub mod conventional;
pub mod git;
pub mod github;
pub mod jira;
pub mod models;
pub mod pipeline;
pub mod properties;

pub use changelog::{assemble, render_issue, ChangelogSections};
pub use config::Config;
pub use conventional::{build_changelog, write_changelog, CommitGroups};
pub use github::GitHubClient;
pub use jira::{JiraClient, JiraError};
pub use models::*;
pub use pipeline::{Failure, ReleasePipeline, RunSummary};
pub use properties::Properties;
