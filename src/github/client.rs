use anyhow::{Context, Result};
use octocrab::Octocrab;
use tracing::{debug, info};

/// GitHub API client for publishing files to a repository
pub struct GitHubClient {
    client: Octocrab,
}

impl GitHubClient {
    /// Create a new GitHub client with the given token
    pub fn new(token: &str) -> Result<Self> {
        let client = Octocrab::builder()
            .personal_token(token.to_string())
            .build()
            .context("Failed to create GitHub client")?;

        Ok(Self { client })
    }

    /// Create a client against a different API root, e.g. GitHub Enterprise
    pub fn with_base_uri(token: &str, base_uri: &str) -> Result<Self> {
        let client = Octocrab::builder()
            .personal_token(token.to_string())
            .base_uri(base_uri)
            .context("Invalid GitHub API base URI")?
            .build()
            .context("Failed to create GitHub client")?;

        Ok(Self { client })
    }

    /// Get the blob SHA of a file on the default branch
    pub async fn get_file_sha(&self, owner: &str, repo: &str, path: &str) -> Result<String> {
        debug!(owner, repo, path, "Fetching file contents");

        let content = self
            .client
            .repos(owner, repo)
            .get_content()
            .path(path)
            .send()
            .await
            .with_context(|| format!("Failed to get contents of {}", path))?;

        match content.items.first() {
            Some(item) => Ok(item.sha.clone()),
            None => anyhow::bail!("File not found: {}", path),
        }
    }

    /// Overwrite an existing file with new content in a single commit
    pub async fn update_file(
        &self,
        owner: &str,
        repo: &str,
        path: &str,
        message: &str,
        content: &str,
    ) -> Result<()> {
        let sha = self.get_file_sha(owner, repo, path).await?;

        info!(owner, repo, path, sha = %sha, "Updating file");

        let update = self
            .client
            .repos(owner, repo)
            .update_file(path, message, content, sha)
            .send()
            .await
            .with_context(|| format!("Failed to update {}", path))?;

        debug!(commit = ?update.commit.sha, "File updated");

        Ok(())
    }
}

/// Parse owner and repo from a repo string like "owner/repo"
pub fn parse_repo(repo: &str) -> Result<(&str, &str)> {
    let parts: Vec<&str> = repo.split('/').collect();
    if parts.len() != 2 || parts.iter().any(|p| p.is_empty()) {
        anyhow::bail!("Invalid repo format. Expected 'owner/repo', got: {}", repo);
    }
    Ok((parts[0], parts[1]))
}
