use async_trait::async_trait;
use reqwest::header::{self, HeaderMap, HeaderValue};
use reqwest::{Client, Method, RequestBuilder};
use svcamount_types::UsageReport;
use svcamount_util::http::{BODY_PREVIEW_LIMIT, JsonParseError, parse_response_json_strict, truncate_response_preview};
use svcamount_util::redact_sensitive;
use thiserror::Error;
use tracing::{debug, warn};
use url::{Host, Url};

use crate::config::AmountConfig;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("failed to build http client: {0}")]
    Build(#[source] reqwest::Error),

    #[error("request to {url} failed: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("amount service returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error(transparent)]
    Json(#[from] JsonParseError),

    #[error("unexpected usage report shape: {0}")]
    Schema(#[from] serde_json::Error),
}

/// Fetches usage reports for resolved URI suffixes.
#[async_trait]
pub trait UsageFetcher: Send + Sync {
    /// GET `base_url + uri_suffix`, forwarding the caller's credentials.
    async fn fetch_usage(&self, uri_suffix: &str, forwarded: &HeaderMap) -> Result<UsageReport, TransportError>;
}

/// Thin wrapper around a configured `reqwest::Client` for the amount service.
#[derive(Debug, Clone)]
pub struct AmountClient {
    base_url: String,
    http: Client,
    user_agent: String,
}

impl AmountClient {
    pub fn new(config: &AmountConfig) -> Result<Self, TransportError> {
        let mut default_headers = HeaderMap::new();
        default_headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));

        let mut builder = Client::builder()
            .default_headers(default_headers)
            .timeout(config.request_timeout);
        if is_loopback_url(&config.base_url) {
            builder = builder.no_proxy();
        }
        let http = builder.build().map_err(TransportError::Build)?;

        Ok(Self {
            base_url: config.base_url.clone(),
            http,
            user_agent: format!("svcamount/{}; {}", env!("CARGO_PKG_VERSION"), std::env::consts::OS),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Full URL for a resolved suffix.
    pub fn url_for(&self, uri_suffix: &str) -> String {
        format!("{}{}", self.base_url, uri_suffix)
    }

    /// Build a request for a method and a resolved URI suffix.
    pub fn request(&self, method: Method, uri_suffix: &str) -> RequestBuilder {
        let url = self.url_for(uri_suffix);
        debug!(url = %redact_sensitive(&url), "building request");

        self.http
            .request(method, url)
            .header(header::USER_AGENT, &self.user_agent)
    }
}

fn is_loopback_url(base_url: &str) -> bool {
    Url::parse(base_url)
        .ok()
        .and_then(|url| match url.host()? {
            Host::Domain(domain) => Some(domain.eq_ignore_ascii_case("localhost")),
            Host::Ipv4(ip) => Some(ip.is_loopback()),
            Host::Ipv6(ip) => Some(ip.is_loopback()),
        })
        .unwrap_or(false)
}

#[async_trait]
impl UsageFetcher for AmountClient {
    async fn fetch_usage(&self, uri_suffix: &str, forwarded: &HeaderMap) -> Result<UsageReport, TransportError> {
        let mut request = self.request(Method::GET, uri_suffix);
        if let Some(authorization) = forwarded.get(header::AUTHORIZATION) {
            request = request.header(header::AUTHORIZATION, authorization.clone());
        }

        let url = self.url_for(uri_suffix);
        let response = request.send().await.map_err(|source| TransportError::Network {
            url: redact_sensitive(&url),
            source,
        })?;
        let status = response.status();
        let text = response.text().await.map_err(|source| TransportError::Network {
            url: redact_sensitive(&url),
            source,
        })?;

        if !status.is_success() {
            warn!(status = status.as_u16(), url = %redact_sensitive(&url), "amount service rejected request");
            return Err(TransportError::Status {
                status: status.as_u16(),
                body: truncate_response_preview(&text, BODY_PREVIEW_LIMIT),
            });
        }

        let value = parse_response_json_strict(&text, Some(status))?;
        let report: UsageReport = serde_json::from_value(value)?;
        debug!(items = report.items.len(), "usage report received");
        Ok(report)
    }
}
