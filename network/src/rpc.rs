//! HTTP implementation of the network client.
//!
//! Talks JSON to a relay network gateway. Every request carries a
//! per-request timeout so a hung gateway bounds the damage to the current
//! job run instead of wedging a worker task forever.

use std::time::Duration;

use futures_util::future::BoxFuture;
use futures_util::FutureExt;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::client::{NetworkClient, StakeOrder, StakedApp, StakedNode, TxReceipt};
use crate::NetworkError;

/// Default per-request timeout.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// JSON HTTP client for the relay network gateway.
pub struct RpcNetworkClient {
    /// Base URL of the gateway.
    base_url: String,
    /// Reusable HTTP client.
    client: reqwest::Client,
    /// Per-request timeout.
    timeout: Duration,
}

#[derive(Deserialize)]
struct NodesResponse {
    nodes: Vec<StakedNode>,
}

#[derive(Deserialize)]
struct AppsResponse {
    apps: Vec<StakedApp>,
}

impl RpcNetworkClient {
    /// Create a client pointing at a gateway URL.
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
            timeout: REQUEST_TIMEOUT,
        }
    }

    /// Override the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    async fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, NetworkError> {
        let url = format!("{}{}", self.base_url, path);
        let resp = self
            .client
            .post(&url)
            .json(body)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| NetworkError::Transport(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(NetworkError::Http {
                status: resp.status().as_u16(),
                url,
            });
        }

        resp.json()
            .await
            .map_err(|e| NetworkError::Decode(e.to_string()))
    }
}

impl NetworkClient for RpcNetworkClient {
    fn staked_nodes(&self) -> BoxFuture<'_, Result<Vec<StakedNode>, NetworkError>> {
        async move {
            let resp: NodesResponse = self
                .post_json("/v1/query/nodes", &serde_json::json!({ "staking_status": "staked" }))
                .await?;
            Ok(resp.nodes)
        }
        .boxed()
    }

    fn staked_apps(&self) -> BoxFuture<'_, Result<Vec<StakedApp>, NetworkError>> {
        async move {
            let resp: AppsResponse = self
                .post_json("/v1/query/apps", &serde_json::json!({ "staking_status": "staked" }))
                .await?;
            Ok(resp.apps)
        }
        .boxed()
    }

    fn submit_stake<'a>(
        &'a self,
        order: &'a StakeOrder,
    ) -> BoxFuture<'a, Result<TxReceipt, NetworkError>> {
        async move {
            tracing::debug!(chain = %order.chain_id, address = %order.address, "submitting stake");
            self.post_json("/v1/tx/app/stake", order).await
        }
        .boxed()
    }

    fn submit_unstake<'a>(
        &'a self,
        order: &'a StakeOrder,
    ) -> BoxFuture<'a, Result<TxReceipt, NetworkError>> {
        async move {
            tracing::debug!(chain = %order.chain_id, address = %order.address, "submitting unstake");
            self.post_json("/v1/tx/app/unstake", order).await
        }
        .boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let client = RpcNetworkClient::new("https://gateway.example/");
        assert_eq!(client.base_url, "https://gateway.example");
    }

    #[test]
    fn timeout_override_applies() {
        let client =
            RpcNetworkClient::new("https://gateway.example").with_timeout(Duration::from_secs(3));
        assert_eq!(client.timeout, Duration::from_secs(3));
    }
}
