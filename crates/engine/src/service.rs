//! Classify -> resolve -> fetch, in one linear pass.

use reqwest::header::HeaderMap;
use svcamount_api::{AmountClient, AmountConfig, UsageFetcher};
use svcamount_registry::{ServiceClassifier, ServiceRegistry};
use svcamount_resolver::Resolver;
use svcamount_types::{BackingServiceInstance, CredentialSet, ServiceDescriptor, UsageReport};
use tracing::{debug, error};

use crate::error::AmountError;

/// Resolves backing service instances to usage reports.
///
/// Holds no per-request state; share it behind an `Arc` across tasks.
pub struct UsageService<C = ServiceRegistry, F = AmountClient> {
    classifier: C,
    resolver: Resolver,
    fetcher: F,
}

impl UsageService<ServiceRegistry, AmountClient> {
    /// Wire the environment-driven registry and the HTTP client from `config`.
    pub fn from_config(config: &AmountConfig) -> Result<Self, AmountError> {
        let registry = ServiceRegistry::parse(&config.services)?;
        let client = AmountClient::new(config)?;
        Ok(Self::new(registry, Resolver::new(config.hive_format), client))
    }
}

impl<C: ServiceClassifier, F: UsageFetcher> UsageService<C, F> {
    pub fn new(classifier: C, resolver: Resolver, fetcher: F) -> Self {
        Self {
            classifier,
            resolver,
            fetcher,
        }
    }

    pub fn classifier(&self) -> &C {
        &self.classifier
    }

    pub fn resolver(&self) -> &Resolver {
        &self.resolver
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    pub fn describe(&self, service_name: &str) -> Result<ServiceDescriptor, AmountError> {
        self.classifier.classify(service_name).map_err(|err| {
            error!(service = %service_name, error = %err, "service classification failed");
            AmountError::from(err)
        })
    }

    /// Classify `service_name` and build the amount service URI suffix.
    pub fn resolve_uri(&self, service_name: &str, credentials: &CredentialSet) -> Result<String, AmountError> {
        let descriptor = self.describe(service_name)?;
        self.resolver.resolve(&descriptor, credentials).map_err(|err| {
            error!(
                service = %descriptor.name,
                service_type = %descriptor.service_type,
                error = %err,
                "uri resolution failed"
            );
            AmountError::from(err)
        })
    }

    /// Fetch the usage report for a backing service instance.
    pub async fn usage_amount(&self, instance: &BackingServiceInstance, headers: &HeaderMap) -> Result<UsageReport, AmountError> {
        let service_name = instance.spec.backing_service_name.as_str();
        debug!(
            service = %service_name,
            instance = instance.name.as_deref().unwrap_or("-"),
            credential_fields = instance.spec.creds.len(),
            "usage amount requested"
        );
        let uri = self.resolve_uri(service_name, &instance.spec.creds)?;
        self.fetcher.fetch_usage(&uri, headers).await.map_err(|err| {
            error!(service = %service_name, error = %err, "usage fetch failed");
            AmountError::from(err)
        })
    }
}
