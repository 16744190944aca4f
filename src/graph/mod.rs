pub mod auth;
pub mod groups;

use crate::config::ConfigManager;
use crate::error::{Asg365Error, Result};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

pub const GRAPH_API_ROOT: &str = "https://graph.microsoft.com";

/// Hard timeout for any single Graph round-trip. Lives here, on the HTTP
/// client, not in the aggregation logic.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Graph API version channel for device-management calls
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiVersion {
    V1,
    Beta,
}

impl ApiVersion {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApiVersion::V1 => "v1.0",
            ApiVersion::Beta => "beta",
        }
    }

    /// Parse the config.toml value. Unknown strings are a configuration
    /// error rather than a silent fallback.
    pub fn parse(s: &str) -> Result<Self> {
        match s {
            "v1.0" | "v1" => Ok(ApiVersion::V1),
            "beta" => Ok(ApiVersion::Beta),
            other => Err(Asg365Error::InvalidConfig(format!(
                "Unknown api_version '{}'. Valid values: beta, v1.0",
                other
            ))),
        }
    }
}

/// Graph API client handle.
///
/// Owns the bearer token for the lifetime of one report pipeline. Acquired
/// explicitly before the pipeline runs and dropped on every exit path, so no
/// ambient session state survives a report invocation.
pub struct GraphClient {
    client: Client,
    access_token: String,
    base_url: String,
    api_version: ApiVersion,
}

impl GraphClient {
    pub fn new(access_token: String, api_version: ApiVersion) -> Result<Self> {
        Self::with_base_url(access_token, GRAPH_API_ROOT.to_string(), api_version)
    }

    /// Construct against a non-default API root. Tests point this at a local
    /// mock server.
    pub fn with_base_url(
        access_token: String,
        base_url: String,
        api_version: ApiVersion,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            access_token,
            base_url,
            api_version,
        })
    }

    /// Create a GraphClient from ConfigManager and tenant name.
    /// Loads a cached token for the tenant; the api_version comes from
    /// config.toml and defaults to beta.
    pub async fn from_config(config: &ConfigManager, tenant_name: &str) -> Result<Self> {
        let graph_auth = auth::GraphAuth::new(config.clone());
        let access_token = graph_auth.get_access_token(tenant_name).await?;
        let api_version = ApiVersion::parse(&config.api_version()?)?;

        Self::new(access_token, api_version)
    }

    pub fn api_version(&self) -> &ApiVersion {
        &self.api_version
    }

    /// GET a device-management resource on the configured API version.
    ///
    /// One request, one page. A non-success status is returned as a
    /// GraphApiError with the Graph error body decoded; transport errors
    /// propagate unmodified. There is deliberately no retry or nextLink
    /// handling here.
    pub async fn get<T: for<'de> Deserialize<'de>>(&self, endpoint: &str) -> Result<T> {
        let url = format!(
            "{}/{}/{}",
            self.base_url,
            self.api_version.as_str(),
            endpoint.trim_start_matches('/')
        );
        self.get_url(&url).await
    }

    /// GET a directory resource. Group lookups are stable on v1.0 regardless
    /// of the device-management channel.
    pub async fn get_directory<T: for<'de> Deserialize<'de>>(&self, endpoint: &str) -> Result<T> {
        let url = format!(
            "{}/v1.0/{}",
            self.base_url,
            endpoint.trim_start_matches('/')
        );
        self.get_url(&url).await
    }

    async fn get_url<T: for<'de> Deserialize<'de>>(&self, url: &str) -> Result<T> {
        tracing::debug!(%url, "graph GET");

        let resp = self
            .client
            .get(url)
            .bearer_auth(&self.access_token)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let error_text = resp.text().await.unwrap_or_default();
            let enhanced_error = crate::error::enhance_graph_error(&error_text);
            return Err(Asg365Error::GraphApiError(format!(
                "HTTP {}: {}",
                status, enhanced_error
            )));
        }

        let data = resp.json::<T>().await?;
        Ok(data)
    }
}

/// Standard OData collection envelope: `value` array plus the nextLink this
/// tool knowingly ignores (single-page assumption).
#[derive(Debug, Deserialize)]
pub struct CollectionResponse<T> {
    pub value: Vec<T>,
    #[serde(rename = "@odata.nextLink")]
    pub next_link: Option<String>,
}
