//! Service-type-to-URI resolution for the amount service.
//!
//! Given a logical service name, its canonical type and the credentials of a
//! bound instance, [`resolve`] picks one of six strategies and builds the
//! path (and query) that identifies the instance's quota on the remote
//! amount service:
//!
//! | canonical type(s) | strategy | URI |
//! |---|---|---|
//! | `spark`, `mapreduce` | [`YarnQueue`] | `/{type}/{queue}?service={name}` |
//! | `hdfs` | [`HdfsPath`] | `/{type}?service={name}&path={path}` |
//! | `hive` | [`HiveDatabase`] | `/{type}/{database}?service={name}` |
//! | `hbase` | [`HBaseNamespace`] | `/{type}/{namespace}?service={name}` |
//! | `kafka` | [`KafkaTopic`] | `/{type}/{topic}?service={name}` |
//! | `mongodb`, `greenplum` | [`DatabaseName`] | `/{name}/{database}` |
//!
//! Resolution is pure and synchronous.
//!
//! ```
//! use svcamount_resolver::resolve;
//! use svcamount_types::CredentialSet;
//!
//! let creds: CredentialSet = [("topic", "events")].into_iter().collect();
//! assert_eq!(resolve("mykafka", "kafka", &creds).unwrap(), "/kafka/events?service=mykafka");
//! ```

mod encode;
mod error;
mod resolve;
mod strategy;

pub use error::ResolveError;
pub use resolve::{Resolver, Strategy, StrategyKind, resolve};
pub use strategy::{
    DATABASE_NAME_FIELD, DatabaseName, HBASE_NAMESPACE_FIELD, HBaseNamespace, HDFS_PATH_FIELD, HIVE_DATABASE_FIELD, HdfsPath,
    HiveDatabase, HiveDatabaseFormat, KAFKA_TOPIC_FIELD, KafkaTopic, NAMESPACE_MARKER_LEN, RemoteUri, YARN_QUEUE_FIELD, YarnQueue,
};
