//! Service classification: logical backing service name -> canonical type.

mod catalog;
mod classifier;

pub use catalog::{DEFAULT_SERVICES, Drivers, SERVICES_ENV, ServiceEntry, ServiceRegistry};
pub use classifier::{ClassifyError, ServiceClassifier};
