//! Node endpoint discovery.
//!
//! A resolver list is a TOML document of literal `[[resolver]]` records and
//! `[[group]]` template records. Each candidate is asked in turn for a node
//! serving the requested network; the first answer wins.

use kas_script::{NetworkId, NetworkType};
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::error::RpcError;
use crate::types::{NodeDescriptor, ResolverConfig};

/// The built-in resolver list.
pub const DEFAULT_RESOLVERS: &str = include_str!("resolvers.toml");

#[derive(Debug, Deserialize)]
struct ResolverFile {
    #[serde(default)]
    resolver: Vec<ResolverRecord>,
    #[serde(default)]
    group: Vec<GroupRecord>,
}

#[derive(Debug, Deserialize)]
struct ResolverRecord {
    address: String,
    #[serde(default)]
    enable: Option<bool>,
}

#[derive(Debug, Deserialize)]
struct GroupRecord {
    template: String,
    nodes: Vec<String>,
    #[serde(default)]
    enable: Option<bool>,
}

/// Parse a resolver TOML document into the list of enabled URLs.
///
/// Literal resolvers come first, in file order, followed by each group's
/// expansion in file order.
pub fn parse_resolver_urls(toml_str: &str) -> Result<Vec<String>, RpcError> {
    let file: ResolverFile = toml::from_str(toml_str)?;

    let mut urls: Vec<String> = file
        .resolver
        .into_iter()
        .filter(|r| r.enable.unwrap_or(true))
        .map(|r| r.address)
        .collect();

    for group in file.group.into_iter().filter(|g| g.enable.unwrap_or(true)) {
        urls.extend(group.nodes.iter().map(|node| group.template.replace('*', node)));
    }

    Ok(urls)
}

/// Discovers a node endpoint through a list of resolver services.
#[derive(Debug, Clone)]
pub struct Resolver {
    urls: Vec<String>,
    config: ResolverConfig,
    client: reqwest::Client,
}

impl Resolver {
    /// Create a resolver over an explicit candidate list.
    pub fn new(urls: Vec<String>, config: ResolverConfig) -> Self {
        Self {
            urls,
            config,
            client: reqwest::Client::new(),
        }
    }

    /// Create a resolver from a TOML document.
    pub fn from_toml(toml_str: &str, config: ResolverConfig) -> Result<Self, RpcError> {
        Ok(Self::new(parse_resolver_urls(toml_str)?, config))
    }

    /// Candidate URLs in the order they are tried.
    pub fn urls(&self) -> &[String] {
        &self.urls
    }

    /// Endpoint path for a network, relative to a resolver URL.
    pub fn endpoint_path(&self, network_id: &NetworkId) -> Result<String, RpcError> {
        if network_id.network_type != NetworkType::Mainnet && network_id.suffix.is_none() {
            return Err(RpcError::InvalidNetworkId(format!(
                "{network_id} requires a suffix for endpoint resolution"
            )));
        }
        let transport = if self.config.tls { "tls" } else { "any" };
        Ok(format!("/v2/kaspa/{network_id}/{transport}/wrpc/json"))
    }

    /// Ask each candidate in turn for a node URL.
    ///
    /// # Returns
    /// The first advertised URL, or `ResolverExhausted` listing every
    /// candidate with its failure.
    pub async fn get_url(&self, network_id: &NetworkId) -> Result<String, RpcError> {
        let path = self.endpoint_path(network_id)?;
        let mut failures = Vec::new();

        for base in &self.urls {
            let url = format!("{}{}", base.trim_end_matches('/'), path);
            debug!(%url, "querying resolver");
            match self.fetch_node(&url).await {
                Ok(node) => {
                    info!(resolver = %base, node = %node.url, "resolved node endpoint");
                    return Ok(node.url);
                }
                Err(e) => {
                    warn!(resolver = %base, error = %e, "resolver failed");
                    failures.push((base.clone(), e.to_string()));
                }
            }
        }

        Err(RpcError::ResolverExhausted(failures))
    }

    async fn fetch_node(&self, url: &str) -> Result<NodeDescriptor, RpcError> {
        let resp = self
            .client
            .get(url)
            .timeout(self.config.timeout)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(RpcError::ServerError {
                status_code: status.as_u16(),
                message,
            });
        }

        let text = resp.text().await?;
        Ok(serde_json::from_str(&text)?)
    }
}

impl Default for Resolver {
    fn default() -> Self {
        let urls = parse_resolver_urls(DEFAULT_RESOLVERS).unwrap_or_default();
        Self::new(urls, ResolverConfig::default())
    }
}
