//! Amount service client utilities.
//!
//! This crate provides the configuration and the HTTP client used to talk to
//! the remote amount service:
//!
//! - Reading [`AmountConfig`] from the environment and normalizing the base
//!   URL onto a secure scheme
//! - Building requests with a consistent User-Agent and Accept header
//! - Fetching and decoding usage reports through [`UsageFetcher`]

mod client;
pub mod config;

pub use client::{AmountClient, TransportError, UsageFetcher};
pub use config::{AmountConfig, ConfigError};
