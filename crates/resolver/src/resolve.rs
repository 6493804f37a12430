//! Service-type dispatch.

use std::fmt;

use svcamount_types::{CredentialSet, ServiceDescriptor};
use tracing::debug;

use crate::error::ResolveError;
use crate::strategy::{DatabaseName, HBaseNamespace, HdfsPath, HiveDatabase, HiveDatabaseFormat, KafkaTopic, RemoteUri, YarnQueue};

/// The fixed set of resolution strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StrategyKind {
    YarnQueue,
    HdfsPath,
    HiveDatabase,
    HBaseNamespace,
    KafkaTopic,
    DatabaseName,
}

impl StrategyKind {
    /// Selects the strategy for a canonical service type, ignoring ASCII case.
    pub fn for_service_type(service_type: &str) -> Option<Self> {
        match service_type.trim().to_ascii_lowercase().as_str() {
            "spark" | "mapreduce" => Some(Self::YarnQueue),
            "hdfs" => Some(Self::HdfsPath),
            "hive" => Some(Self::HiveDatabase),
            "hbase" => Some(Self::HBaseNamespace),
            "kafka" => Some(Self::KafkaTopic),
            "mongodb" | "greenplum" => Some(Self::DatabaseName),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::YarnQueue => "yarn_queue",
            Self::HdfsPath => "hdfs_path",
            Self::HiveDatabase => "hive_database",
            Self::HBaseNamespace => "hbase_namespace",
            Self::KafkaTopic => "kafka_topic",
            Self::DatabaseName => "database_name",
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A strategy bound to one descriptor and credential set.
#[derive(Debug, Clone, Copy)]
pub enum Strategy<'a> {
    YarnQueue(YarnQueue<'a>),
    HdfsPath(HdfsPath<'a>),
    HiveDatabase(HiveDatabase<'a>),
    HBaseNamespace(HBaseNamespace<'a>),
    KafkaTopic(KafkaTopic<'a>),
    DatabaseName(DatabaseName<'a>),
}

impl<'a> Strategy<'a> {
    pub fn kind(&self) -> StrategyKind {
        match self {
            Self::YarnQueue(_) => StrategyKind::YarnQueue,
            Self::HdfsPath(_) => StrategyKind::HdfsPath,
            Self::HiveDatabase(_) => StrategyKind::HiveDatabase,
            Self::HBaseNamespace(_) => StrategyKind::HBaseNamespace,
            Self::KafkaTopic(_) => StrategyKind::KafkaTopic,
            Self::DatabaseName(_) => StrategyKind::DatabaseName,
        }
    }
}

impl RemoteUri for Strategy<'_> {
    fn uri(&self) -> Result<String, ResolveError> {
        match self {
            Self::YarnQueue(strategy) => strategy.uri(),
            Self::HdfsPath(strategy) => strategy.uri(),
            Self::HiveDatabase(strategy) => strategy.uri(),
            Self::HBaseNamespace(strategy) => strategy.uri(),
            Self::KafkaTopic(strategy) => strategy.uri(),
            Self::DatabaseName(strategy) => strategy.uri(),
        }
    }
}

/// Stateless dispatcher from a service descriptor to a request URI suffix.
///
/// Holds only immutable options, so one instance can be shared freely
/// across threads. Each call builds and discards its own [`Strategy`].
#[derive(Debug, Clone, Copy, Default)]
pub struct Resolver {
    hive_format: HiveDatabaseFormat,
}

impl Resolver {
    pub fn new(hive_format: HiveDatabaseFormat) -> Self {
        Self { hive_format }
    }

    pub fn hive_format(&self) -> HiveDatabaseFormat {
        self.hive_format
    }

    /// Selects the strategy for `descriptor.service_type`.
    pub fn strategy<'a>(&self, descriptor: &'a ServiceDescriptor, credentials: &'a CredentialSet) -> Result<Strategy<'a>, ResolveError> {
        let kind = StrategyKind::for_service_type(&descriptor.service_type).ok_or_else(|| {
            ResolveError::unsupported_service_type(descriptor.service_type.as_str(), descriptor.name.as_str())
        })?;
        Ok(match kind {
            StrategyKind::YarnQueue => Strategy::YarnQueue(YarnQueue::new(descriptor, credentials)),
            StrategyKind::HdfsPath => Strategy::HdfsPath(HdfsPath::new(descriptor, credentials)),
            StrategyKind::HiveDatabase => {
                Strategy::HiveDatabase(HiveDatabase::with_format(descriptor, credentials, self.hive_format))
            }
            StrategyKind::HBaseNamespace => Strategy::HBaseNamespace(HBaseNamespace::new(descriptor, credentials)),
            StrategyKind::KafkaTopic => Strategy::KafkaTopic(KafkaTopic::new(descriptor, credentials)),
            StrategyKind::DatabaseName => Strategy::DatabaseName(DatabaseName::new(descriptor, credentials)),
        })
    }

    /// Builds the URI suffix to append to the amount service base URL.
    ///
    /// On success the suffix starts with `/`. On failure no partial URI is
    /// returned.
    pub fn resolve(&self, descriptor: &ServiceDescriptor, credentials: &CredentialSet) -> Result<String, ResolveError> {
        let strategy = self.strategy(descriptor, credentials)?;
        let uri = strategy.uri()?;
        debug_assert!(uri.starts_with('/'));
        debug!(
            service = %descriptor.name,
            service_type = %descriptor.service_type,
            strategy = %strategy.kind(),
            %uri,
            "resolved amount uri"
        );
        Ok(uri)
    }
}

/// Resolves with the default options (plain `Hive_Database` format).
pub fn resolve(service_name: &str, service_type: &str, credentials: &CredentialSet) -> Result<String, ResolveError> {
    Resolver::default().resolve(&ServiceDescriptor::new(service_name, service_type), credentials)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dispatch_table_is_case_insensitive() {
        assert_eq!(StrategyKind::for_service_type("Spark"), Some(StrategyKind::YarnQueue));
        assert_eq!(StrategyKind::for_service_type("MAPREDUCE"), Some(StrategyKind::YarnQueue));
        assert_eq!(StrategyKind::for_service_type("GreenPlum"), Some(StrategyKind::DatabaseName));
        assert_eq!(StrategyKind::for_service_type("HBase"), Some(StrategyKind::HBaseNamespace));
        assert_eq!(StrategyKind::for_service_type("redis"), None);
        assert_eq!(StrategyKind::for_service_type(""), None);
    }

    #[test]
    fn strategy_selection_follows_the_type_not_the_name() {
        let descriptor = ServiceDescriptor::new("kafka", "hdfs");
        let credentials = CredentialSet::new();
        let strategy = Resolver::default().strategy(&descriptor, &credentials).expect("hdfs is supported");
        assert_eq!(strategy.kind(), StrategyKind::HdfsPath);
    }

    #[test]
    fn resolver_applies_declared_hive_format() {
        let credentials: CredentialSet = [("Hive_Database", "db:root.q1")].into_iter().collect();
        let descriptor = ServiceDescriptor::new("Hive", "hive");

        let plain = Resolver::default().resolve(&descriptor, &credentials).expect("plain resolves");
        assert_eq!(plain, "/hive/db:root.q1?service=hive");

        let composite = Resolver::new(HiveDatabaseFormat::Composite)
            .resolve(&descriptor, &credentials)
            .expect("composite resolves");
        assert_eq!(composite, "/hive/db?service=hive&queue=q1");
    }

    #[test]
    fn unsupported_type_reports_type_and_name() {
        let err = resolve("Neo4j", "neo4j", &CredentialSet::new()).expect_err("unsupported");
        assert_eq!(err, ResolveError::unsupported_service_type("neo4j", "Neo4j"));
    }
}
