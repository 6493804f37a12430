//! Per-service-type URI builders.
//!
//! Each strategy borrows the descriptor and credentials for the duration of a
//! single resolution and produces a path (plus query) relative to the amount
//! service base URL.

use std::str::FromStr;

use svcamount_types::{CredentialSet, ServiceDescriptor};
use tracing::debug;

use crate::encode::{path_segment, query_value};
use crate::error::ResolveError;

/// Length of the namespace marker (`root.`) prefixed to Yarn queue names.
pub const NAMESPACE_MARKER_LEN: usize = 5;

pub const YARN_QUEUE_FIELD: &str = "Yarn_Queue";
pub const HDFS_PATH_FIELD: &str = "HDFS_Path";
pub const DATABASE_NAME_FIELD: &str = "name";
pub const HIVE_DATABASE_FIELD: &str = "Hive_Database";
pub const HBASE_NAMESPACE_FIELD: &str = "HBase_NameSpace";
pub const KAFKA_TOPIC_FIELD: &str = "topic";

/// Produces the amount-service URI suffix for one backing service instance.
pub trait RemoteUri {
    fn uri(&self) -> Result<String, ResolveError>;
}

/// How the `Hive_Database` credential is laid out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum HiveDatabaseFormat {
    /// The field holds the database name.
    #[default]
    Plain,
    /// Legacy `<database>:<queue>` layout where the queue carries the
    /// namespace marker.
    Composite,
}

impl HiveDatabaseFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Plain => "plain",
            Self::Composite => "composite",
        }
    }
}

impl FromStr for HiveDatabaseFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "plain" => Ok(Self::Plain),
            "composite" => Ok(Self::Composite),
            other => Err(format!("unknown Hive database format '{other}'; expected 'plain' or 'composite'")),
        }
    }
}

fn required<'a>(credentials: &'a CredentialSet, field: &'static str, descriptor: &ServiceDescriptor) -> Result<&'a str, ResolveError> {
    let value = credentials
        .get(field)
        .ok_or_else(|| ResolveError::missing_credential(field, descriptor.name.as_str()))?;
    if value.trim().is_empty() {
        return Err(ResolveError::invalid_credential(field, "value is empty"));
    }
    Ok(value)
}

/// Removes the fixed-width namespace marker, refusing values too short to carry one.
fn strip_namespace_marker<'v>(field: &'static str, value: &'v str) -> Result<&'v str, ResolveError> {
    match value.get(NAMESPACE_MARKER_LEN..) {
        Some(rest) if !rest.is_empty() => Ok(rest),
        _ => {
            debug!(field, value, "credential too short for namespace marker");
            Err(ResolveError::invalid_credential(
                field,
                format!("no queue name after the {NAMESPACE_MARKER_LEN}-character namespace prefix"),
            ))
        }
    }
}

fn service_type(descriptor: &ServiceDescriptor) -> String {
    path_segment(&descriptor.service_type.trim().to_ascii_lowercase())
}

fn service_query(descriptor: &ServiceDescriptor) -> String {
    query_value(&descriptor.lowercase_name())
}

/// Spark and MapReduce jobs, keyed by Yarn queue.
#[derive(Debug, Clone, Copy)]
pub struct YarnQueue<'a> {
    descriptor: &'a ServiceDescriptor,
    credentials: &'a CredentialSet,
}

impl<'a> YarnQueue<'a> {
    pub fn new(descriptor: &'a ServiceDescriptor, credentials: &'a CredentialSet) -> Self {
        Self { descriptor, credentials }
    }
}

impl RemoteUri for YarnQueue<'_> {
    fn uri(&self) -> Result<String, ResolveError> {
        let queue = required(self.credentials, YARN_QUEUE_FIELD, self.descriptor)?;
        let queue = strip_namespace_marker(YARN_QUEUE_FIELD, queue)?;
        Ok(format!(
            "/{}/{}?service={}",
            service_type(self.descriptor),
            path_segment(queue),
            service_query(self.descriptor)
        ))
    }
}

/// HDFS directories; the path travels in the query string.
#[derive(Debug, Clone, Copy)]
pub struct HdfsPath<'a> {
    descriptor: &'a ServiceDescriptor,
    credentials: &'a CredentialSet,
}

impl<'a> HdfsPath<'a> {
    pub fn new(descriptor: &'a ServiceDescriptor, credentials: &'a CredentialSet) -> Self {
        Self { descriptor, credentials }
    }
}

impl RemoteUri for HdfsPath<'_> {
    fn uri(&self) -> Result<String, ResolveError> {
        let path = required(self.credentials, HDFS_PATH_FIELD, self.descriptor)?;
        Ok(format!(
            "/{}?service={}&path={}",
            service_type(self.descriptor),
            service_query(self.descriptor),
            query_value(path)
        ))
    }
}

/// Generic database family (MongoDB, Greenplum).
///
/// Keyed on the logical service name rather than the canonical type because
/// these services are proxied generically by the amount service.
#[derive(Debug, Clone, Copy)]
pub struct DatabaseName<'a> {
    descriptor: &'a ServiceDescriptor,
    credentials: &'a CredentialSet,
}

impl<'a> DatabaseName<'a> {
    pub fn new(descriptor: &'a ServiceDescriptor, credentials: &'a CredentialSet) -> Self {
        Self { descriptor, credentials }
    }
}

impl RemoteUri for DatabaseName<'_> {
    fn uri(&self) -> Result<String, ResolveError> {
        let name = required(self.credentials, DATABASE_NAME_FIELD, self.descriptor)?;
        Ok(format!("/{}/{}", path_segment(&self.descriptor.name), path_segment(name)))
    }
}

/// Hive databases.
#[derive(Debug, Clone, Copy)]
pub struct HiveDatabase<'a> {
    descriptor: &'a ServiceDescriptor,
    credentials: &'a CredentialSet,
    format: HiveDatabaseFormat,
}

impl<'a> HiveDatabase<'a> {
    pub fn new(descriptor: &'a ServiceDescriptor, credentials: &'a CredentialSet) -> Self {
        Self::with_format(descriptor, credentials, HiveDatabaseFormat::default())
    }

    pub fn with_format(descriptor: &'a ServiceDescriptor, credentials: &'a CredentialSet, format: HiveDatabaseFormat) -> Self {
        Self {
            descriptor,
            credentials,
            format,
        }
    }
}

impl RemoteUri for HiveDatabase<'_> {
    fn uri(&self) -> Result<String, ResolveError> {
        let value = required(self.credentials, HIVE_DATABASE_FIELD, self.descriptor)?;
        let (database, queue) = match self.format {
            HiveDatabaseFormat::Plain => (value, None),
            HiveDatabaseFormat::Composite => {
                let parts: Vec<&str> = value.split(':').collect();
                let [database, queue] = parts.as_slice() else {
                    debug!(field = HIVE_DATABASE_FIELD, value, "malformed composite hive database");
                    return Err(ResolveError::invalid_credential(
                        HIVE_DATABASE_FIELD,
                        format!("expected <database>:<queue>, found {} part(s)", parts.len()),
                    ));
                };
                if database.trim().is_empty() {
                    return Err(ResolveError::invalid_credential(HIVE_DATABASE_FIELD, "database name is empty"));
                }
                (*database, Some(strip_namespace_marker(HIVE_DATABASE_FIELD, *queue)?))
            }
        };

        let mut uri = format!(
            "/{}/{}?service={}",
            service_type(self.descriptor),
            path_segment(database),
            service_query(self.descriptor)
        );
        if let Some(queue) = queue {
            uri.push_str("&queue=");
            uri.push_str(&query_value(queue));
        }
        Ok(uri)
    }
}

/// HBase namespaces.
#[derive(Debug, Clone, Copy)]
pub struct HBaseNamespace<'a> {
    descriptor: &'a ServiceDescriptor,
    credentials: &'a CredentialSet,
}

impl<'a> HBaseNamespace<'a> {
    pub fn new(descriptor: &'a ServiceDescriptor, credentials: &'a CredentialSet) -> Self {
        Self { descriptor, credentials }
    }
}

impl RemoteUri for HBaseNamespace<'_> {
    fn uri(&self) -> Result<String, ResolveError> {
        let namespace = required(self.credentials, HBASE_NAMESPACE_FIELD, self.descriptor)?;
        Ok(format!(
            "/{}/{}?service={}",
            service_type(self.descriptor),
            path_segment(namespace),
            service_query(self.descriptor)
        ))
    }
}

/// Kafka topics.
#[derive(Debug, Clone, Copy)]
pub struct KafkaTopic<'a> {
    descriptor: &'a ServiceDescriptor,
    credentials: &'a CredentialSet,
}

impl<'a> KafkaTopic<'a> {
    pub fn new(descriptor: &'a ServiceDescriptor, credentials: &'a CredentialSet) -> Self {
        Self { descriptor, credentials }
    }
}

impl RemoteUri for KafkaTopic<'_> {
    fn uri(&self) -> Result<String, ResolveError> {
        let topic = required(self.credentials, KAFKA_TOPIC_FIELD, self.descriptor)?;
        Ok(format!(
            "/{}/{}?service={}",
            service_type(self.descriptor),
            path_segment(topic),
            service_query(self.descriptor)
        ))
    }
}
