//! Environment-driven list of services the amount API knows about.
//!
//! The list is grouped by driver (the upstream that serves the amounts) and
//! written as `driver:svc,svc=type,...;driver:...`. A bare `svc` classifies
//! to itself; `alias=type` lets a logical name map onto a canonical type.

use std::env::{self, VarError};

use indexmap::IndexMap;
use serde::Serialize;
use svcamount_types::ServiceDescriptor;
use tracing::{debug, warn};

use crate::classifier::{ClassifyError, ServiceClassifier};

/// Environment variable holding the service list.
pub const SERVICES_ENV: &str = "SVCAMOUNT_SERVICES";

/// Services registered when [`SERVICES_ENV`] is unset or blank.
pub const DEFAULT_SERVICES: &str = "hadoop:hbase,hive,hdfs,kafka,spark,mapreduce;rds:mongodb,greenplum";

/// Service names grouped by driver.
pub type Drivers = IndexMap<String, Vec<String>>;

/// One registered backing service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceEntry {
    /// Logical service name, lowercase
    pub name: String,
    /// Canonical service type, lowercase
    pub service_type: String,
    /// Driver group the service was registered under
    pub driver: String,
}

/// Case-insensitive lookup table from service name to canonical type.
#[derive(Debug, Clone, Default)]
pub struct ServiceRegistry {
    entries: IndexMap<String, ServiceEntry>,
}

impl ServiceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from [`SERVICES_ENV`], falling back to [`DEFAULT_SERVICES`] when
    /// the variable is unset or blank.
    pub fn from_env() -> Result<Self, ClassifyError> {
        match env::var(SERVICES_ENV) {
            Ok(value) if !value.trim().is_empty() => Self::parse(&value),
            Ok(_) | Err(VarError::NotPresent) => Self::parse(DEFAULT_SERVICES),
            Err(VarError::NotUnicode(raw)) => Err(ClassifyError::invalid_entry(
                raw.to_string_lossy(),
                format!("{SERVICES_ENV} is not valid unicode"),
            )),
        }
    }

    /// Parse a `driver:svc,svc=type;driver:...` service list.
    pub fn parse(spec: &str) -> Result<Self, ClassifyError> {
        let mut registry = Self::new();
        for group in spec.split(';').map(str::trim).filter(|group| !group.is_empty()) {
            let (driver, services) = group
                .split_once(':')
                .ok_or_else(|| ClassifyError::invalid_entry(group, "expected '<driver>:<service>[,<service>...]'"))?;
            let driver = driver.trim();
            if driver.is_empty() {
                return Err(ClassifyError::invalid_entry(group, "driver name is empty"));
            }

            let mut names = Vec::new();
            for entry in services.split(',').map(str::trim).filter(|entry| !entry.is_empty()) {
                let (name, service_type) = match entry.split_once('=') {
                    Some((name, service_type)) => (name.trim(), service_type.trim()),
                    None => (entry, entry),
                };
                if name.is_empty() || service_type.is_empty() {
                    return Err(ClassifyError::invalid_entry(entry, "service name and type must be non-empty"));
                }
                names.push((name, service_type));
            }
            if names.is_empty() {
                return Err(ClassifyError::invalid_entry(group, "driver lists no services"));
            }
            registry.register(driver, names);
        }
        debug!(services = registry.len(), "service registry loaded");
        Ok(registry)
    }

    /// Register `(name, canonical type)` pairs under a driver.
    pub fn register<'a>(&mut self, driver: &str, services: impl IntoIterator<Item = (&'a str, &'a str)>) {
        for (name, service_type) in services {
            let key = name.to_lowercase();
            let entry = ServiceEntry {
                name: key.clone(),
                service_type: service_type.to_lowercase(),
                driver: driver.to_string(),
            };
            if let Some(previous) = self.entries.insert(key, entry) {
                warn!(
                    service = %previous.name,
                    previous_driver = %previous.driver,
                    driver = %driver,
                    "service registered twice; keeping the later entry"
                );
            }
        }
    }

    pub fn get(&self, service_name: &str) -> Option<&ServiceEntry> {
        self.entries.get(&service_name.trim().to_lowercase())
    }

    pub fn entries(&self) -> impl Iterator<Item = &ServiceEntry> {
        self.entries.values()
    }

    /// Registered services grouped by driver, in registration order.
    pub fn drivers(&self) -> Drivers {
        let mut drivers = Drivers::new();
        for entry in self.entries.values() {
            drivers.entry(entry.driver.clone()).or_default().push(entry.name.clone());
        }
        drivers
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl ServiceClassifier for ServiceRegistry {
    fn classify(&self, service_name: &str) -> Result<ServiceDescriptor, ClassifyError> {
        let entry = self
            .get(service_name)
            .ok_or_else(|| ClassifyError::unknown_service(service_name))?;
        Ok(ServiceDescriptor::new(service_name.trim(), entry.service_type.as_str()))
    }
}
