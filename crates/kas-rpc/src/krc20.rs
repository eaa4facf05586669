//! Read-only REST client for a KRC-20 indexer.

use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::RpcError;
use crate::types::{Krc20Config, Krc20Response, TokenBalance, TokenInfo};

const SUCCESS_MESSAGE: &str = "successful";

/// HTTP client for the KRC-20 indexer API.
#[derive(Debug, Clone)]
pub struct Krc20RpcClient {
    /// Client configuration.
    config: Krc20Config,
    /// Underlying HTTP client.
    client: reqwest::Client,
}

impl Krc20RpcClient {
    /// Create a new indexer client with the given configuration.
    pub fn new(config: Krc20Config) -> Self {
        let client = reqwest::Client::new();
        Self { config, client }
    }

    /// Get metadata of a token, or `None` if the indexer does not know it.
    pub async fn get_token_info(&self, tick: &str) -> Result<Option<TokenInfo>, RpcError> {
        let path = format!("krc20/token/{}", tick.to_uppercase());
        let mut records: Vec<TokenInfo> = self.do_request(&path).await?;
        Ok(if records.is_empty() {
            None
        } else {
            Some(records.swap_remove(0))
        })
    }

    /// List every token balance held by an address.
    pub async fn get_token_list(&self, address: &str) -> Result<Vec<TokenBalance>, RpcError> {
        let path = format!("krc20/address/{}/tokenlist", address);
        self.do_request(&path).await
    }

    /// Get the balance of one token held by an address.
    pub async fn get_token_balance(
        &self,
        address: &str,
        tick: &str,
    ) -> Result<Option<TokenBalance>, RpcError> {
        let path = format!("krc20/address/{}/token/{}", address, tick.to_uppercase());
        let records: Vec<TokenBalance> = self.do_request(&path).await?;
        Ok(records.into_iter().next())
    }

    /// Perform a GET request and unwrap the `{message, result}` envelope.
    async fn do_request<T: DeserializeOwned>(&self, path: &str) -> Result<Vec<T>, RpcError> {
        let url = format!("{}/{}", self.config.base_url.trim_end_matches('/'), path);
        debug!(%url, "indexer request");

        let resp = self.client.get(&url).send().await?;
        let status = resp.status();

        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(RpcError::ServerError {
                status_code: status.as_u16(),
                message,
            });
        }

        let text = resp.text().await?;
        let envelope: Krc20Response<T> = serde_json::from_str(&text)?;
        if envelope.message != SUCCESS_MESSAGE {
            return Err(RpcError::Indexer(envelope.message));
        }
        Ok(envelope.result)
    }
}
