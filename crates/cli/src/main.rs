use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use svcamount_api::AmountConfig;
use svcamount_api::config::HIVE_FORMAT_ENV;
use svcamount_engine::UsageService;
use svcamount_registry::{ServiceClassifier, ServiceRegistry};
use svcamount_resolver::{HiveDatabaseFormat, Resolver};
use svcamount_types::{BackingServiceInstance, CredentialSet};
use tracing::info;

#[derive(Debug, Parser)]
#[command(name = "svcamount", version, about = "Resolve backing service bindings into usage amounts")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the HTTP server
    Serve {
        /// Listen address; overrides SVCAMOUNT_BIND
        #[arg(long)]
        bind: Option<String>,
    },
    /// Print the amount service URI for a service binding, without calling it
    Resolve {
        /// Logical backing service name (e.g. Kafka)
        service: String,
        /// Credential field, repeatable
        #[arg(long = "cred", value_name = "KEY=VALUE", value_parser = parse_credential)]
        creds: Vec<(String, String)>,
        /// Hive_Database layout; defaults to SVCAMOUNT_HIVE_FORMAT or plain
        #[arg(long)]
        hive_format: Option<HiveDatabaseFormat>,
    },
    /// Fetch the usage report for a service binding
    Usage {
        service: String,
        #[arg(long = "cred", value_name = "KEY=VALUE", value_parser = parse_credential)]
        creds: Vec<(String, String)>,
        /// Authorization header value forwarded to the amount service
        #[arg(long)]
        authorization: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Command::Serve { bind } => serve(bind).await,
        Command::Resolve {
            service,
            creds,
            hive_format,
        } => resolve(&service, creds, hive_format),
        Command::Usage {
            service,
            creds,
            authorization,
        } => usage(service, creds, authorization).await,
    }
}

fn init_tracing() {
    let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into());
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn parse_credential(raw: &str) -> Result<(String, String), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{raw}'"))?;
    if key.trim().is_empty() {
        return Err(format!("credential key is empty in '{raw}'"));
    }
    Ok((key.trim().to_string(), value.to_string()))
}

async fn serve(bind: Option<String>) -> Result<()> {
    let mut config = AmountConfig::from_env().context("load configuration")?;
    if let Some(bind) = bind {
        config.bind_address = bind.parse().with_context(|| format!("invalid bind address '{bind}'"))?;
    }
    let service = UsageService::from_config(&config).context("initialise usage service")?;
    info!(
        base_url = %config.base_url,
        services = service.classifier().len(),
        hive_format = config.hive_format.as_str(),
        "starting amount server"
    );

    let listener = tokio::net::TcpListener::bind(config.bind_address)
        .await
        .with_context(|| format!("bind {}", config.bind_address))?;
    let router = svcamount_server::router(Arc::new(service));
    svcamount_server::serve(listener, router, async {
        let _ = tokio::signal::ctrl_c().await;
    })
    .await
}

fn resolve(service: &str, creds: Vec<(String, String)>, hive_format: Option<HiveDatabaseFormat>) -> Result<()> {
    let hive_format = match hive_format {
        Some(format) => format,
        None => match std::env::var(HIVE_FORMAT_ENV) {
            Ok(raw) if !raw.trim().is_empty() => raw.parse().map_err(anyhow::Error::msg)?,
            _ => HiveDatabaseFormat::default(),
        },
    };
    let registry = ServiceRegistry::from_env().context("load service list")?;
    let descriptor = registry.classify(service)?;
    let credentials: CredentialSet = creds.into_iter().collect();
    let uri = Resolver::new(hive_format).resolve(&descriptor, &credentials)?;

    let out = serde_json::json!({
        "service": descriptor.name,
        "service_type": descriptor.service_type,
        "uri": uri,
    });
    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}

async fn usage(service: String, creds: Vec<(String, String)>, authorization: Option<String>) -> Result<()> {
    let config = AmountConfig::from_env().context("load configuration")?;
    let usage = UsageService::from_config(&config).context("initialise usage service")?;

    let mut headers = HeaderMap::new();
    if let Some(authorization) = authorization {
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&authorization).context("invalid authorization header value")?,
        );
    }
    let instance = BackingServiceInstance::new(service, creds.into_iter().collect());
    let report = usage.usage_amount(&instance, &headers).await?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
