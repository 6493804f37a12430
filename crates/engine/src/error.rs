use svcamount_api::{ConfigError, TransportError};
use svcamount_registry::ClassifyError;
use svcamount_resolver::ResolveError;
use thiserror::Error;

/// Everything that can go wrong between a service name and its usage report.
#[derive(Debug, Error)]
pub enum AmountError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Classify(#[from] ClassifyError),

    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error(transparent)]
    Transport(#[from] TransportError),
}

impl AmountError {
    /// Stable machine-readable reason.
    pub fn reason(&self) -> &'static str {
        match self {
            Self::Config(_) => "Configuration",
            Self::Classify(ClassifyError::UnknownService { .. }) => "UnknownService",
            Self::Classify(ClassifyError::InvalidEntry { .. }) => "InvalidServiceList",
            Self::Resolve(error) => error.reason(),
            Self::Transport(TransportError::Status { .. }) => "RemoteStatus",
            Self::Transport(TransportError::Build(_)) => "Configuration",
            Self::Transport(TransportError::Network { .. }) => "RemoteUnavailable",
            Self::Transport(TransportError::Json(_) | TransportError::Schema(_)) => "InvalidRemoteResponse",
        }
    }

    /// True when the caller's input (service name or binding) is at fault.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::Classify(ClassifyError::UnknownService { .. }) | Self::Resolve(_)
        )
    }
}
