use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use changelog_sync::git::{run_log, run_log_strict};
use changelog_sync::github::parse_repo;
use changelog_sync::{
    assemble, build_changelog, write_changelog, Config, GitHubClient, JiraClient, Properties,
    ReleasePipeline, RunSummary,
};

#[derive(Parser)]
#[command(name = "changelog-sync")]
#[command(about = "Sync Jira fix versions from git history and generate changelogs")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to config file
    #[arg(long, global = true, default_value = ".changelog-sync/config.yml")]
    config: PathBuf,
}

#[derive(Subcommand)]
enum Commands {
    /// Tag Jira issues referenced since the last tag and print the changelog
    Release {
        /// Build type shown in the changelog heading (e.g. Alpha, Beta)
        #[arg(default_value = "Release")]
        build_type: String,

        /// Properties file with the version and build number
        #[arg(long)]
        properties: Option<PathBuf>,

        /// Jira server URL
        #[arg(long, env = "JIRA_URL")]
        jira_url: Option<String>,

        /// Jira user
        #[arg(long, env = "JIRA_USER")]
        jira_user: String,

        /// Jira API token
        #[arg(long, env = "JIRA_TOKEN", hide_env_values = true)]
        jira_token: String,

        /// Render issue keys as links
        #[arg(long)]
        link: bool,
    },

    /// Write a changelog from conventional commits and push it to GitHub
    Publish {
        /// GitHub access token
        #[arg(long, env = "INPUT_ACCESS_TOKEN", hide_env_values = true)]
        access_token: Option<String>,

        /// Repository (owner/repo)
        #[arg(long, env = "INPUT_REPO_NAME")]
        repo_name: Option<String>,

        /// Path of the changelog inside the repository
        #[arg(long, env = "INPUT_PATH")]
        path: Option<String>,

        /// Commit message for the update
        #[arg(long, env = "INPUT_COMMIT_MESSAGE")]
        commit_message: Option<String>,

        /// Local file the changelog is written to
        #[arg(long, default_value = "/github/home/CHANGELOG.md")]
        output: PathBuf,

        /// GitHub API root, for GitHub Enterprise
        #[arg(long, env = "GITHUB_API_URL")]
        api_url: Option<String>,

        /// Only write the local file
        #[arg(long)]
        skip_upload: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so stdout only carries the changelog
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("changelog_sync=info".parse()?),
        )
        .init();

    let cli = Cli::parse();
    let config = Config::load(&cli.config)?;

    match cli.command {
        Commands::Release {
            build_type,
            properties,
            jira_url,
            jira_user,
            jira_token,
            link,
        } => {
            run_release(
                config,
                build_type,
                properties,
                jira_url,
                jira_user,
                jira_token,
                link,
            )
            .await?;
        }
        Commands::Publish {
            access_token,
            repo_name,
            path,
            commit_message,
            output,
            api_url,
            skip_upload,
        } => {
            run_publish(
                config,
                access_token,
                repo_name,
                path,
                commit_message,
                output,
                api_url,
                skip_upload,
            )
            .await?;
        }
    }

    Ok(())
}

#[allow(clippy::too_many_arguments)]
async fn run_release(
    config: Config,
    build_type: String,
    properties: Option<PathBuf>,
    jira_url: Option<String>,
    jira_user: String,
    jira_token: String,
    link: bool,
) -> Result<()> {
    let properties_path = properties.unwrap_or(config.properties_path);
    let props = Properties::load(&properties_path)?;
    let release = props.release()?;
    let build_number = props.build_number()?;

    let server_url = jira_url
        .or(config.jira.server_url)
        .context("Jira server URL not set (use --jira-url, JIRA_URL or jira.server_url)")?;

    let jira = JiraClient::new(&server_url, jira_user, jira_token);
    let pipeline =
        ReleasePipeline::new(jira, config.issue_types).with_links(link || config.jira.render_link);

    let log = run_log(&config.git.ticket_log_command).unwrap_or_else(|e| {
        warn!(error = %e, "Could not read git history, no tickets scanned");
        String::new()
    });
    let (sections, summary) = pipeline.run(&log, &release).await;

    report(&summary);

    let today = chrono::Local::now().date_naive();
    let changelog = assemble(&release, &build_type, build_number, today, &sections);

    println!("{}", changelog);

    Ok(())
}

fn report(summary: &RunSummary) {
    info!(
        issues = summary.issues_found,
        projects = summary.projects.len(),
        versions_created = summary.versions_created.len(),
        tagged = summary.issues_tagged,
        ignored = summary.issues_ignored,
        failures = summary.failures.len(),
        "Release sync complete"
    );

    for failure in &summary.failures {
        warn!(unit = %failure.target, reason = %failure.reason, "Skipped");
    }
}

#[allow(clippy::too_many_arguments)]
async fn run_publish(
    config: Config,
    access_token: Option<String>,
    repo_name: Option<String>,
    path: Option<String>,
    commit_message: Option<String>,
    output: PathBuf,
    api_url: Option<String>,
    skip_upload: bool,
) -> Result<()> {
    // A failed git log must not overwrite the published changelog with an empty one
    let log = run_log_strict(&config.git.full_log_command)?;
    let changelog = build_changelog(&log);

    write_changelog(&output, &changelog)?;

    if skip_upload {
        info!("Skipping upload");
        return Ok(());
    }

    let token = access_token.context("INPUT_ACCESS_TOKEN not set")?;
    let repo_name = repo_name.context("INPUT_REPO_NAME not set")?;
    let path = path.context("INPUT_PATH not set")?;
    let commit_message = commit_message.context("INPUT_COMMIT_MESSAGE not set")?;

    let (owner, repo) = parse_repo(&repo_name)?;

    let github = match api_url {
        Some(url) => GitHubClient::with_base_uri(&token, &url)?,
        None => GitHubClient::new(&token)?,
    };
    github
        .update_file(owner, repo, &path, &commit_message, &changelog)
        .await?;

    info!(repo = %repo_name, path = %path, "Changelog published");

    Ok(())
}
