use thiserror::Error;

/// Errors surfaced by the workflow runtime
#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error("Workflow runtime has shut down")]
    RuntimeClosed,

    #[error("Workflow runtime dropped the reply for {event}")]
    ReplyDropped { event: &'static str },
}

/// Failure reported by a save service.
///
/// The machine stores the display string in `context.error`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SaveError {
    #[error("Save rejected: {message}")]
    Rejected { message: String },

    #[error("Save service unavailable: {message}")]
    Unavailable { message: String },

    #[error("Save timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },
}

impl SaveError {
    pub fn rejected(message: impl Into<String>) -> Self {
        SaveError::Rejected {
            message: message.into(),
        }
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        SaveError::Unavailable {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_error_messages() {
        assert_eq!(
            SaveError::rejected("name taken").to_string(),
            "Save rejected: name taken"
        );
        assert_eq!(
            SaveError::Timeout { timeout_ms: 500 }.to_string(),
            "Save timed out after 500ms"
        );
    }
}
