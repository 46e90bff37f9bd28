use std::fmt;

/// Failures crossing the remote search boundary. Everything the transport
/// or decoder can throw is folded into one of these before it reaches the
/// controller; nothing propagates further up into presentation.
#[derive(Debug, Clone)]
pub enum SearchError {
    Transport { details: String },
    Timeout,
    Status { code: u16 },
    Decode { details: String },
}

impl SearchError {
    /// Generic text shown to the user. The underlying detail is logged,
    /// not displayed.
    pub fn user_message(&self) -> String {
        "search failed, retry".to_string()
    }
}

impl fmt::Display for SearchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchError::Transport { details } => write!(f, "transport error: {details}"),
            SearchError::Timeout => write!(f, "request timed out"),
            SearchError::Status { code } => write!(f, "search API returned status {code}"),
            SearchError::Decode { details } => write!(f, "malformed search response: {details}"),
        }
    }
}

impl std::error::Error for SearchError {}

impl From<reqwest::Error> for SearchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            SearchError::Timeout
        } else if err.is_decode() {
            SearchError::Decode {
                details: err.to_string(),
            }
        } else if let Some(status) = err.status() {
            SearchError::Status {
                code: status.as_u16(),
            }
        } else {
            SearchError::Transport {
                details: err.to_string(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message_is_generic() {
        let errors = [
            SearchError::Timeout,
            SearchError::Status { code: 500 },
            SearchError::Transport {
                details: "connection refused to 10.0.0.3:8000".to_string(),
            },
        ];
        for error in errors {
            let message = error.user_message();
            assert_eq!(message, "search failed, retry");
            // Internal detail stays out of the user-facing text
            assert!(!message.contains("10.0.0.3"));
        }
    }

    #[test]
    fn test_display_keeps_detail() {
        let error = SearchError::Status { code: 502 };
        assert_eq!(error.to_string(), "search API returned status 502");
    }
}
