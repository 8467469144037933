use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

/// Subject prefixes that make it into the changelog
pub const CHANGELOG_PREFIXES: [&str; 5] = ["feat", "fix", "refactor", "test", "ci"];

const OTHER_PREFIXES: [&str; 3] = ["refactor", "test", "ci"];

const FOOTER: &str = "> Changelog generated through the projects' GitHub Actions.";

/// Commit subjects grouped by conventional type
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommitGroups {
    pub features: Vec<String>,
    pub bugs: Vec<String>,
    pub other: Vec<String>,
}

fn starts_with_any(line: &str, prefixes: &[&str]) -> bool {
    prefixes.iter().any(|p| line.starts_with(p))
}

/// Sort commit subjects and keep those with a changelog prefix
pub fn filter_commits<S: AsRef<str>>(subjects: &[S]) -> Vec<String> {
    let mut lines: Vec<String> = subjects
        .iter()
        .map(|s| s.as_ref().to_string())
        .filter(|line| starts_with_any(line, &CHANGELOG_PREFIXES))
        .collect();
    lines.sort();
    lines
}

impl CommitGroups {
    /// Bucket filtered subjects. `feat` → features, `fix` → bugs,
    /// `refactor`/`test`/`ci` → other.
    pub fn from_commits(commits: &[String]) -> Self {
        let mut groups = Self::default();
        for line in commits {
            if line.starts_with("feat") {
                groups.features.push(line.clone());
            } else if line.starts_with("fix") {
                groups.bugs.push(line.clone());
            } else if starts_with_any(line, &OTHER_PREFIXES) {
                groups.other.push(line.clone());
            }
        }
        groups
    }

    /// Render the changelog document
    pub fn render(&self) -> String {
        let mut md = String::from("# Changelog\n\n\n## Features\n\n");
        push_bullets(&mut md, &self.features);
        md.push_str("\n## Bugs\n\n");
        push_bullets(&mut md, &self.bugs);
        md.push_str("\n## Other\n\n");
        push_bullets(&mut md, &self.other);
        md.push_str("\n\n\n");
        md.push_str(FOOTER);
        md
    }
}

fn push_bullets(md: &mut String, lines: &[String]) {
    for line in lines {
        md.push_str(&format!("* {}\n", line));
    }
}

/// Build the changelog from raw `git log` output
pub fn build_changelog(log: &str) -> String {
    let subjects: Vec<&str> = log.lines().collect();
    let commits = filter_commits(&subjects);

    info!(count = commits.len(), "Writing conventional commits");

    CommitGroups::from_commits(&commits).render()
}

/// Write the changelog to a local file
pub fn write_changelog(path: impl AsRef<Path>, changelog: &str) -> Result<()> {
    let path = path.as_ref();
    fs::write(path, changelog)
        .with_context(|| format!("Failed to write changelog: {}", path.display()))?;

    info!(path = %path.display(), "Changelog written");

    Ok(())
}
