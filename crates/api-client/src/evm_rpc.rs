// In crates/api-client/src/evm_rpc.rs

use crate::types::{RpcRequest, RpcResponse};
use crate::{Error, EvmRpcApi, Result, check_status, http_client};
use app_config::types::EvmSettings;
use async_trait::async_trait;
use core_types::Chain;
use reqwest::Client;

/// JSON-RPC client for the EVM chains, one endpoint per chain.
#[derive(Debug, Clone)]
pub struct EvmRpcClient {
    http_client: Client,
    ethereum_rpc_url: String,
    base_rpc_url: String,
}

impl EvmRpcClient {
    pub fn new(settings: &EvmSettings) -> Result<Self> {
        Ok(Self {
            http_client: http_client(settings.request_timeout_secs)?,
            ethereum_rpc_url: settings.ethereum_rpc_url.clone(),
            base_rpc_url: settings.base_rpc_url.clone(),
        })
    }

    fn rpc_url(&self, chain: Chain) -> Result<&str> {
        match chain {
            Chain::Ethereum => Ok(self.ethereum_rpc_url.as_str()),
            Chain::Base => Ok(self.base_rpc_url.as_str()),
            other => Err(Error::UnsupportedChain(other)),
        }
    }
}

#[async_trait]
impl EvmRpcApi for EvmRpcClient {
    async fn get_balance(&self, chain: Chain, address: &str) -> Result<String> {
        let url = self.rpc_url(chain)?;
        let payload = RpcRequest {
            jsonrpc: "2.0",
            method: "eth_getBalance",
            params: [address, "latest"],
            id: 1,
        };

        let response = self
            .http_client
            .post(url)
            .json(&payload)
            .send()
            .await
            .map_err(Error::RequestFailed)?;
        let response = check_status(response, "eth_getBalance")?;
        let text = response.text().await.map_err(Error::RequestFailed)?;

        parse_result(&text)
    }
}

fn parse_result(body: &str) -> Result<String> {
    let response: RpcResponse = serde_json::from_str(body).map_err(Error::DeserializationFailed)?;
    if let Some(error) = response.error {
        return Err(Error::RpcError { code: error.code, msg: error.message });
    }
    response
        .result
        .ok_or_else(|| Error::MalformedResponse("JSON-RPC response has no result".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_matches_json_rpc_shape() {
        let payload = RpcRequest {
            jsonrpc: "2.0",
            method: "eth_getBalance",
            params: ["0xabc", "latest"],
            id: 1,
        };
        assert_eq!(
            serde_json::to_string(&payload).unwrap(),
            r#"{"jsonrpc":"2.0","method":"eth_getBalance","params":["0xabc","latest"],"id":1}"#
        );
    }

    #[test]
    fn parses_result_and_error_objects() {
        assert_eq!(
            parse_result(r#"{"jsonrpc":"2.0","id":1,"result":"0x14d1120d7b160000"}"#).unwrap(),
            "0x14d1120d7b160000"
        );
        let err = parse_result(r#"{"jsonrpc":"2.0","id":1,"error":{"code":-32602,"message":"invalid argument"}}"#)
            .unwrap_err();
        assert!(matches!(err, Error::RpcError { code: -32602, .. }));
        assert!(matches!(parse_result(r#"{"jsonrpc":"2.0","id":1}"#), Err(Error::MalformedResponse(_))));
    }
}
