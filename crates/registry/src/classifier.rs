use svcamount_types::ServiceDescriptor;
use thiserror::Error;

/// Maps a logical backing service name to its canonical service type.
pub trait ServiceClassifier: Send + Sync {
    fn classify(&self, service_name: &str) -> Result<ServiceDescriptor, ClassifyError>;
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClassifyError {
    #[error("unknown service '{name}' or not supported")]
    UnknownService { name: String },

    #[error("invalid service list entry '{entry}': {reason}")]
    InvalidEntry { entry: String, reason: String },
}

impl ClassifyError {
    pub fn unknown_service(name: impl Into<String>) -> Self {
        Self::UnknownService { name: name.into() }
    }

    pub fn invalid_entry(entry: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidEntry {
            entry: entry.into(),
            reason: reason.into(),
        }
    }
}
