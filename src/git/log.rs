use std::process::Command;
use std::sync::OnceLock;

use anyhow::{Context, Result};
use regex::Regex;
use tracing::{debug, warn};

/// Project key: an uppercase letter followed by uppercase letters or digits
const PROJECT_PATTERN: &str = r"[A-Z][A-Z\d]+";

fn ticket_regex() -> &'static Regex {
    static TICKET: OnceLock<Regex> = OnceLock::new();
    TICKET.get_or_init(|| {
        Regex::new(&format!(r"{}-\d+", PROJECT_PATTERN)).expect("ticket pattern is valid")
    })
}

/// Run a git log shell command and return its stdout.
///
/// A non-zero exit is logged and whatever stdout was captured is still
/// returned. Only a failure to spawn the shell is an error.
pub fn run_log(command: &str) -> Result<String> {
    debug!(command, "Running git log");

    let output = Command::new("sh")
        .args(["-c", command])
        .output()
        .with_context(|| format!("Failed to run: {}", command))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        warn!(
            command,
            status = %output.status,
            stderr = %stderr.trim(),
            "git log exited with failure, using partial output"
        );
    }

    let log = String::from_utf8_lossy(&output.stdout).into_owned();

    debug!(lines = log.lines().count(), "Captured git log");

    Ok(log)
}

/// Run a git log shell command, failing on a non-zero exit
pub fn run_log_strict(command: &str) -> Result<String> {
    debug!(command, "Running git log");

    let output = Command::new("sh")
        .args(["-c", command])
        .output()
        .with_context(|| format!("Failed to run: {}", command))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        anyhow::bail!("git log failed ({}): {}", output.status, stderr.trim());
    }

    let log = String::from_utf8(output.stdout).context("Invalid UTF-8 in git log")?;

    debug!(lines = log.lines().count(), "Captured git log");

    Ok(log)
}

/// Extract unique issue references (e.g. `ABC-123`) from commit subjects,
/// in order of first appearance
pub fn scan_for_tickets(log: &str) -> Vec<String> {
    let mut tickets: Vec<String> = Vec::new();

    for line in log.lines() {
        for found in ticket_regex().find_iter(line) {
            let id = found.as_str();
            if !tickets.iter().any(|t| t == id) {
                tickets.push(id.to_string());
            }
        }
    }

    debug!(count = tickets.len(), "Scanned commits for tickets");

    tickets
}

/// Distinct project keys of the given issue references, first-seen order
pub fn collect_projects<S: AsRef<str>>(issues: &[S]) -> Vec<String> {
    let mut projects: Vec<String> = Vec::new();

    for issue in issues {
        let project = issue.as_ref().split('-').next().unwrap_or_default();
        if !projects.iter().any(|p| p == project) {
            projects.push(project.to_string());
        }
    }

    projects
}
