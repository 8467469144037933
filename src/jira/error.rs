use reqwest::StatusCode;
use thiserror::Error;

/// Failure talking to the Jira REST API
#[derive(Error, Debug)]
pub enum JiraError {
    #[error("{0} not found")]
    NotFound(String),

    #[error("not authorized ({status}) for {target}")]
    Unauthorized { status: StatusCode, target: String },

    #[error("Jira API error ({status}) for {target}: {body}")]
    Api {
        status: StatusCode,
        target: String,
        body: String,
    },

    #[error("request to Jira failed: {0}")]
    Http(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, JiraError>;

impl JiraError {
    /// Map a non-success response status onto an error variant
    pub fn from_status(status: StatusCode, target: impl Into<String>, body: String) -> Self {
        let target = target.into();
        match status {
            StatusCode::NOT_FOUND => JiraError::NotFound(target),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                JiraError::Unauthorized { status, target }
            }
            _ => JiraError::Api {
                status,
                target,
                body,
            },
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, JiraError::Unauthorized { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_status() {
        let err = JiraError::from_status(StatusCode::NOT_FOUND, "ABC-1", String::new());
        assert_eq!(err.to_string(), "ABC-1 not found");

        let err = JiraError::from_status(StatusCode::FORBIDDEN, "project ABC", String::new());
        assert!(err.is_unauthorized());

        let err = JiraError::from_status(StatusCode::BAD_REQUEST, "ABC-1", "bad field".into());
        assert!(err.to_string().contains("bad field"));
        assert!(!err.is_unauthorized());
    }
}
