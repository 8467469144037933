use chrono::NaiveDate;

use crate::config::IssueTypesConfig;
use crate::models::{Category, Issue, Release};

/// Rendered changelog lines grouped by section
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangelogSections {
    pub added: Vec<String>,
    pub fixed: Vec<String>,
}

impl ChangelogSections {
    /// Classify an issue and push its rendered line. Returns the bucket used.
    pub fn push(
        &mut self,
        issue: &Issue,
        types: &IssueTypesConfig,
        link_base: Option<&str>,
    ) -> Category {
        let category = types.categorize(issue.type_name());
        match category {
            Category::Added => self.added.push(render_issue(issue, link_base)),
            Category::Fixed => self.fixed.push(render_issue(issue, link_base)),
            Category::Ignored => {}
        }
        category
    }

    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.fixed.is_empty()
    }
}

/// Render one issue as a markdown list line.
///
/// With `link_base` set the key links to `<link_base>/browse/<key>`.
pub fn render_issue(issue: &Issue, link_base: Option<&str>) -> String {
    match link_base {
        Some(base) => format!(
            " * [{key}]({base}/browse/{key}) {summary}\n",
            key = issue.key,
            base = base.trim_end_matches('/'),
            summary = issue.summary()
        ),
        None => format!(" * {} {}\n", issue.key, issue.summary()),
    }
}

/// Heading line for a release changelog
pub fn render_heading(
    release: &Release,
    build_type: &str,
    build_number: &str,
    date: NaiveDate,
) -> String {
    format!(
        "## [{}] {} {} - {}\n",
        release.name(),
        build_type,
        build_number,
        date.format("%Y-%m-%d")
    )
}

/// Added and Fixed sections; empty sections are left out
pub fn render_body(sections: &ChangelogSections) -> String {
    let mut md = String::new();

    if !sections.added.is_empty() {
        md.push_str("### Added\n");
        for line in &sections.added {
            md.push_str(line);
        }
        md.push('\n');
    }

    if !sections.fixed.is_empty() {
        md.push_str("### Fixed\n");
        for line in &sections.fixed {
            md.push_str(line);
        }
    }

    md
}

/// Full changelog document: heading followed by the sections
pub fn assemble(
    release: &Release,
    build_type: &str,
    build_number: &str,
    date: NaiveDate,
    sections: &ChangelogSections,
) -> String {
    let mut md = render_heading(release, build_type, build_number, date);
    md.push_str(&render_body(sections));
    md
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{IssueFields, IssueType};

    fn issue(key: &str, summary: &str, type_name: &str) -> Issue {
        Issue {
            key: key.to_string(),
            fields: IssueFields {
                summary: summary.to_string(),
                issuetype: IssueType {
                    name: type_name.to_string(),
                },
                fix_versions: Vec::new(),
            },
        }
    }

    #[test]
    fn test_render_plain() {
        let line = render_issue(&issue("ABC-1", "Fix crash", "Bug"), None);
        assert_eq!(line, " * ABC-1 Fix crash\n");
    }

    #[test]
    fn test_render_link() {
        let line = render_issue(
            &issue("ABC-1", "Fix crash", "Bug"),
            Some("https://example.atlassian.net/"),
        );
        assert_eq!(
            line,
            " * [ABC-1](https://example.atlassian.net/browse/ABC-1) Fix crash\n"
        );
    }

    #[test]
    fn test_ignored_contributes_nothing() {
        let mut sections = ChangelogSections::default();
        let category = sections.push(
            &issue("ABC-3", "Write tests", "Sub-task"),
            &IssueTypesConfig::default(),
            None,
        );

        assert_eq!(category, Category::Ignored);
        assert!(sections.is_empty());
        assert_eq!(render_body(&sections), "");
    }

    #[test]
    fn test_unknown_type_is_added() {
        let mut sections = ChangelogSections::default();
        sections.push(
            &issue("ABC-4", "Platform work", "Epic"),
            &IssueTypesConfig::default(),
            None,
        );

        assert_eq!(sections.added, vec![" * ABC-4 Platform work\n"]);
        assert!(sections.fixed.is_empty());
    }

    #[test]
    fn test_heading() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 7).unwrap();
        let heading = render_heading(&Release::new("1", "2", "3"), "Beta", "42", date);
        assert_eq!(heading, "## [1.2.3] Beta 42 - 2024-03-07\n");
    }

    #[test]
    fn test_assemble_both_sections() {
        let types = IssueTypesConfig::default();
        let mut sections = ChangelogSections::default();
        sections.push(&issue("ABC-1", "Fix crash", "Bug"), &types, None);
        sections.push(&issue("ABC-2", "Add export", "Story"), &types, None);
        sections.push(&issue("ABC-3", "Subtask", "Sub-task"), &types, None);

        let date = NaiveDate::from_ymd_opt(2024, 12, 24).unwrap();
        let md = assemble(&Release::new("1", "0", "0"), "Release", "7", date, &sections);

        assert_eq!(
            md,
            "## [1.0.0] Release 7 - 2024-12-24\n\
             ### Added\n * ABC-2 Add export\n\n\
             ### Fixed\n * ABC-1 Fix crash\n"
        );
    }

    #[test]
    fn test_assemble_fixed_only() {
        let mut sections = ChangelogSections::default();
        sections.fixed.push(" * ABC-1 Fix crash\n".to_string());

        let body = render_body(&sections);
        assert!(!body.contains("### Added"));
        assert!(body.starts_with("### Fixed\n"));
    }
}
