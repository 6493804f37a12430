use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

mod usage;

pub use usage::{UsageItem, UsageReport};

/// Credential fields of a bound backing service instance.
///
/// Keys are unique and order is irrelevant. No entry is guaranteed to be
/// present, so every lookup is fallible.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CredentialSet(HashMap<String, String>);

impl CredentialSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the value stored under `field`, if any.
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.0.insert(field.into(), value.into())
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Field names only; values are credentials and stay out of logs.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for CredentialSet {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl From<HashMap<String, String>> for CredentialSet {
    fn from(map: HashMap<String, String>) -> Self {
        Self(map)
    }
}

/// A logical service name paired with the canonical type it classifies to.
///
/// The canonical type drives strategy selection; the logical name is carried
/// along for diagnostics and query decoration.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ServiceDescriptor {
    /// Logical service name as declared by the instance (e.g. "Spark")
    pub name: String,
    /// Canonical, lowercase service type (e.g. "spark", "hdfs")
    pub service_type: String,
}

impl ServiceDescriptor {
    pub fn new(name: impl Into<String>, service_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            service_type: service_type.into(),
        }
    }

    /// Logical name lowercased, as used in `service=` query parameters.
    pub fn lowercase_name(&self) -> String {
        self.name.to_lowercase()
    }
}

impl fmt::Display for ServiceDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.service_type)
    }
}

/// A provisioned backing service instance as submitted by callers.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BackingServiceInstance {
    /// Instance name, used only for diagnostics
    #[serde(default)]
    pub name: Option<String>,
    pub spec: InstanceSpec,
}

/// Binding details of a backing service instance.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InstanceSpec {
    /// Logical backing service name (e.g. "Kafka", "HDFS")
    pub backing_service_name: String,
    /// Credentials captured when the instance was provisioned
    #[serde(default)]
    pub creds: CredentialSet,
}

impl BackingServiceInstance {
    pub fn new(backing_service_name: impl Into<String>, creds: CredentialSet) -> Self {
        Self {
            name: None,
            spec: InstanceSpec {
                backing_service_name: backing_service_name.into(),
                creds,
            },
        }
    }
}

/// Error body returned to HTTP callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiResponse {
    /// HTTP status code mirrored in the body
    pub code: u16,
    /// Human-readable message
    pub message: String,
    /// Stable machine-readable reason
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl ApiResponse {
    pub fn new(code: u16, message: impl Into<String>, reason: Option<String>) -> Self {
        Self {
            code,
            message: message.into(),
            reason,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn credential_set_deserializes_from_plain_object() {
        let creds: CredentialSet = serde_json::from_value(json!({"topic": "events", "name": "db"})).expect("parses");
        assert_eq!(creds.get("topic"), Some("events"));
        assert_eq!(creds.get("missing"), None);
        assert_eq!(creds.len(), 2);
    }

    #[test]
    fn instance_creds_default_to_empty() {
        let instance: BackingServiceInstance =
            serde_json::from_value(json!({"spec": {"backing_service_name": "Kafka"}})).expect("parses");
        assert!(instance.spec.creds.is_empty());
        assert_eq!(instance.name, None);
    }

    #[test]
    fn descriptor_lowercases_logical_name() {
        let descriptor = ServiceDescriptor::new("SparkJob", "spark");
        assert_eq!(descriptor.lowercase_name(), "sparkjob");
        assert_eq!(descriptor.to_string(), "SparkJob (spark)");
    }

    #[test]
    fn api_response_skips_absent_reason() {
        let body = ApiResponse::new(400, "bad", None);
        assert_eq!(serde_json::to_value(&body).expect("serializes"), json!({"code": 400, "message": "bad"}));
    }
}
