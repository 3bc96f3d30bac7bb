//! Minimal Solana JSON-RPC client over reqwest.

use std::str::FromStr;
use std::time::{Duration, Instant};

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use serde::{Deserialize, Serialize};
use solana_sdk::{hash::Hash, signature::Signature, transaction::Transaction};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum RpcError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON-RPC error object; carries the server's message verbatim.
    #[error("RPC error: {0}")]
    Rpc(String),

    #[error("unexpected RPC response: {0}")]
    Decode(String),

    #[error("transaction failed: {0}")]
    TransactionFailed(String),

    #[error("timeout waiting for confirmation")]
    Timeout,
}

#[derive(Serialize)]
struct RpcRequest {
    jsonrpc: &'static str,
    id: u64,
    method: &'static str,
    params: serde_json::Value,
}

#[derive(Deserialize)]
struct RpcResponse {
    result: Option<serde_json::Value>,
    error: Option<serde_json::Value>,
}

pub struct Rpc {
    client: reqwest::Client,
    rpc_url: String,
}

impl Rpc {
    pub fn new(rpc_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            rpc_url: rpc_url.into(),
        }
    }

    pub fn url(&self) -> &str {
        &self.rpc_url
    }

    async fn call(
        &self,
        method: &'static str,
        params: serde_json::Value,
    ) -> Result<serde_json::Value, RpcError> {
        let request = RpcRequest {
            jsonrpc: "2.0",
            id: 1,
            method,
            params,
        };
        debug!("-> {}", method);

        let resp: RpcResponse = self
            .client
            .post(&self.rpc_url)
            .json(&request)
            .send()
            .await?
            .json()
            .await?;

        if let Some(err) = resp.error {
            let message = err["message"]
                .as_str()
                .map(str::to_string)
                .unwrap_or_else(|| err.to_string());
            return Err(RpcError::Rpc(message));
        }
        Ok(resp.result.unwrap_or_default())
    }

    pub async fn get_version(&self) -> Result<String, RpcError> {
        let version = self.call("getVersion", serde_json::json!([])).await?;
        Ok(version["solana-core"]
            .as_str()
            .unwrap_or("unknown")
            .to_string())
    }

    pub async fn get_minimum_balance_for_rent_exemption(
        &self,
        data_len: u64,
    ) -> Result<u64, RpcError> {
        self.call(
            "getMinimumBalanceForRentExemption",
            serde_json::json!([data_len, { "commitment": "confirmed" }]),
        )
        .await?
        .as_u64()
        .ok_or_else(|| RpcError::Decode("expected lamports u64".to_string()))
    }

    pub async fn get_latest_blockhash(&self) -> Result<Hash, RpcError> {
        let result = self
            .call(
                "getLatestBlockhash",
                serde_json::json!([{ "commitment": "confirmed" }]),
            )
            .await?;
        let bh = result["value"]["blockhash"]
            .as_str()
            .ok_or_else(|| RpcError::Decode("missing blockhash".to_string()))?;
        Hash::from_str(bh).map_err(|e| RpcError::Decode(format!("blockhash: {e}")))
    }

    pub async fn send_transaction(&self, tx: &Transaction) -> Result<Signature, RpcError> {
        let tx_bytes =
            bincode::serialize(tx).map_err(|e| RpcError::Decode(format!("serialize tx: {e}")))?;
        let tx_b64 = BASE64.encode(tx_bytes);

        let result = self
            .call(
                "sendTransaction",
                serde_json::json!([tx_b64, { "encoding": "base64", "skipPreflight": false, "preflightCommitment": "confirmed" }]),
            )
            .await?;
        let sig_str = result
            .as_str()
            .ok_or_else(|| RpcError::Decode("expected signature string".to_string()))?;
        Signature::from_str(sig_str).map_err(|e| RpcError::Decode(format!("signature: {e}")))
    }

    pub async fn wait_for_signature_confirmation(
        &self,
        sig: &Signature,
        timeout: Duration,
    ) -> Result<(), RpcError> {
        let start = Instant::now();
        loop {
            let result = self
                .call(
                    "getSignatureStatuses",
                    serde_json::json!([[sig.to_string()], { "searchTransactionHistory": true }]),
                )
                .await?;

            let value0 = &result["value"][0];
            if !value0.is_null() {
                if !value0["err"].is_null() {
                    return Err(RpcError::TransactionFailed(value0["err"].to_string()));
                }
                if let Some(status) = value0["confirmationStatus"].as_str() {
                    if status == "confirmed" || status == "finalized" {
                        return Ok(());
                    }
                }
            }

            if start.elapsed() > timeout {
                return Err(RpcError::Timeout);
            }
            tokio::time::sleep(Duration::from_millis(500)).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, method};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn mock_rpc(server: &MockServer, rpc_method: &str, body: serde_json::Value) {
        Mock::given(method("POST"))
            .and(body_partial_json(json!({ "method": rpc_method })))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_rent_exemption_query() {
        let server = MockServer::start().await;
        mock_rpc(
            &server,
            "getMinimumBalanceForRentExemption",
            json!({ "jsonrpc": "2.0", "id": 1, "result": 1_461_600 }),
        )
        .await;

        let rpc = Rpc::new(server.uri());
        assert_eq!(
            rpc.get_minimum_balance_for_rent_exemption(82).await.unwrap(),
            1_461_600
        );
    }

    #[tokio::test]
    async fn test_latest_blockhash() {
        let server = MockServer::start().await;
        let hash = Hash::new_unique();
        mock_rpc(
            &server,
            "getLatestBlockhash",
            json!({ "jsonrpc": "2.0", "id": 1, "result": {
                "context": { "slot": 1 },
                "value": { "blockhash": hash.to_string(), "lastValidBlockHeight": 150 }
            }}),
        )
        .await;

        let rpc = Rpc::new(server.uri());
        assert_eq!(rpc.get_latest_blockhash().await.unwrap(), hash);
    }

    #[tokio::test]
    async fn test_rpc_error_message_is_verbatim() {
        let server = MockServer::start().await;
        mock_rpc(
            &server,
            "getVersion",
            json!({ "jsonrpc": "2.0", "id": 1, "error": { "code": -32005, "message": "Node is behind by 42 slots" } }),
        )
        .await;

        let rpc = Rpc::new(server.uri());
        match rpc.get_version().await {
            Err(RpcError::Rpc(msg)) => assert_eq!(msg, "Node is behind by 42 slots"),
            other => panic!("expected RPC error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_confirmation_reports_transaction_error() {
        let server = MockServer::start().await;
        mock_rpc(
            &server,
            "getSignatureStatuses",
            json!({ "jsonrpc": "2.0", "id": 1, "result": {
                "context": { "slot": 1 },
                "value": [{ "slot": 1, "confirmations": null, "err": { "InstructionError": [2, { "Custom": 0 }] }, "confirmationStatus": "processed" }]
            }}),
        )
        .await;

        let rpc = Rpc::new(server.uri());
        let err = rpc
            .wait_for_signature_confirmation(&Signature::default(), Duration::from_secs(1))
            .await
            .unwrap_err();
        assert!(matches!(err, RpcError::TransactionFailed(ref m) if m.contains("InstructionError")));
    }

    #[tokio::test]
    async fn test_confirmation_times_out() {
        let server = MockServer::start().await;
        mock_rpc(
            &server,
            "getSignatureStatuses",
            json!({ "jsonrpc": "2.0", "id": 1, "result": { "context": { "slot": 1 }, "value": [null] } }),
        )
        .await;

        let rpc = Rpc::new(server.uri());
        let err = rpc
            .wait_for_signature_confirmation(&Signature::default(), Duration::ZERO)
            .await
            .unwrap_err();
        assert!(matches!(err, RpcError::Timeout));
    }
}
