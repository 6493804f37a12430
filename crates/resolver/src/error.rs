//! Error taxonomy for URI resolution.
//!
//! None of these are transient: each one means the binding is incomplete or
//! malformed, so callers surface them as-is and never retry.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("unknown service '{service_name}' of type '{service_type}' or not supported")]
    UnsupportedServiceType { service_type: String, service_name: String },

    #[error("{service_name}: required credential '{field}' is missing")]
    MissingCredential { field: &'static str, service_name: String },

    #[error("credential '{field}' is invalid: {reason}")]
    InvalidCredential { field: &'static str, reason: String },
}

impl ResolveError {
    pub fn unsupported_service_type(service_type: impl Into<String>, service_name: impl Into<String>) -> Self {
        Self::UnsupportedServiceType {
            service_type: service_type.into(),
            service_name: service_name.into(),
        }
    }

    pub fn missing_credential(field: &'static str, service_name: impl Into<String>) -> Self {
        Self::MissingCredential {
            field,
            service_name: service_name.into(),
        }
    }

    pub fn invalid_credential(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidCredential {
            field,
            reason: reason.into(),
        }
    }

    /// Stable identifier for the error kind, used in response bodies.
    pub fn reason(&self) -> &'static str {
        match self {
            Self::UnsupportedServiceType { .. } => "UnsupportedServiceType",
            Self::MissingCredential { .. } => "MissingCredential",
            Self::InvalidCredential { .. } => "InvalidCredential",
        }
    }

    /// Credential field the error refers to, when there is one.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            Self::UnsupportedServiceType { .. } => None,
            Self::MissingCredential { field, .. } | Self::InvalidCredential { field, .. } => Some(*field),
        }
    }
}
