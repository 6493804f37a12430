//! Usage amount engine.
//!
//! [`UsageService`] ties the service classifier, the URI resolver and the
//! amount client together.

mod error;
mod service;

pub use error::AmountError;
pub use service::UsageService;
