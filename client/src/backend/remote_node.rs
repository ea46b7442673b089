// ParaTime Deposit
// Copyright (C) 2019 Monadic GmbH <radicle@monadic.xyz>
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License version 3 as
// published by the Free Software Foundation.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! [backend::Backend] implementation for a remote runtime node
use jsonrpc_core::Params;
use jsonrpc_core_client::{transports::ws, RawClient, RpcError};
use parity_scale_codec::Encode as _;
use serde::{de::DeserializeOwned, Deserialize};
use serde_json::{json, Map, Value};
use url::Url;

use paratime_deposit_core::{
    Address, ChainContext, Gas, Namespace, Nonce, RuntimeError, Transaction,
    UnverifiedTransaction,
};

use crate::backend::{self, Round, RuntimeInfo};
use crate::error::BackendError;

/// Backend that talks JSON-RPC over a WebSocket connection to a runtime node.
///
/// All requests are scoped to the runtime given to [RemoteNode::create]. Byte strings and encoded
/// transactions are sent as hex strings.
#[derive(Clone)]
pub struct RemoteNode {
    rpc: RawClient,
    runtime_id: Namespace,
}

#[derive(Deserialize)]
struct InfoResponse {
    runtime_id: String,
    chain_context: String,
}

/// `data` of a JSON-RPC error raised by a runtime module.
#[derive(Deserialize)]
struct ModuleErrorData {
    module: String,
    code: u32,
}

impl RemoteNode {
    pub async fn create(url: &Url, runtime_id: Namespace) -> Result<Self, BackendError> {
        log::debug!("connecting to runtime node at {}", url);
        let rpc = ws::connect::<RawClient>(url).await.map_err(rpc_error)?;
        Ok(RemoteNode { rpc, runtime_id })
    }

    async fn call<T: DeserializeOwned>(
        &self,
        method: &str,
        params: Vec<(&str, Value)>,
    ) -> Result<T, BackendError> {
        let mut map = Map::new();
        map.insert("runtime_id".into(), json!(self.runtime_id.to_string()));
        for (key, value) in params {
            map.insert(key.into(), value);
        }
        let response = self
            .rpc
            .call_method(method, Params::Map(map))
            .await
            .map_err(rpc_error)?;
        Ok(serde_json::from_value(response)?)
    }
}

#[async_trait::async_trait]
impl backend::Backend for RemoteNode {
    async fn get_info(&self) -> Result<RuntimeInfo, BackendError> {
        let info: InfoResponse = self.call("runtime_getInfo", vec![]).await?;
        let runtime_id = info
            .runtime_id
            .parse::<Namespace>()
            .map_err(|err| BackendError::Other(format!("invalid runtime id: {}", err)))?;
        Ok(RuntimeInfo {
            runtime_id,
            chain_context: ChainContext::new(info.chain_context),
        })
    }

    async fn nonce(&self, round: Round, address: &Address) -> Result<Nonce, BackendError> {
        self.call(
            "accounts_nonce",
            vec![
                ("round", json!(round.as_u64())),
                ("address", json!(address.to_string())),
            ],
        )
        .await
    }

    async fn estimate_gas(&self, round: Round, tx: &Transaction) -> Result<Gas, BackendError> {
        self.call(
            "core_estimateGas",
            vec![
                ("round", json!(round.as_u64())),
                ("tx", json!(hex::encode(tx.encode()))),
            ],
        )
        .await
    }

    async fn submit_tx(&self, tx: &UnverifiedTransaction) -> Result<Vec<u8>, BackendError> {
        let result: String = self
            .call("runtime_submitTx", vec![("tx", json!(hex::encode(tx.encode())))])
            .await?;
        hex::decode(&result)
            .map_err(|err| BackendError::Other(format!("invalid call result: {}", err)))
    }
}

/// Turn errors raised by a runtime module into [BackendError::Rejected].
fn rpc_error(error: RpcError) -> BackendError {
    match error {
        RpcError::JsonRpcError(error) => {
            let module_error = error
                .data
                .clone()
                .and_then(|data| serde_json::from_value::<ModuleErrorData>(data).ok());
            match module_error {
                Some(data) => BackendError::Rejected(RuntimeError::from_module_code(
                    &data.module,
                    data.code,
                    error.message,
                )),
                None => BackendError::Rpc(error.to_string()),
            }
        }
        RpcError::Timeout => BackendError::Timeout,
        other => BackendError::Rpc(other.to_string()),
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn json_rpc_error(data: Option<Value>) -> RpcError {
        RpcError::JsonRpcError(jsonrpc_core::Error {
            code: jsonrpc_core::ErrorCode::ServerError(-1),
            message: "nonce mismatch".into(),
            data,
        })
    }

    #[test]
    fn module_errors_are_rejections() {
        let error = rpc_error(json_rpc_error(Some(json!({"module": "core", "code": 4}))));
        match error {
            BackendError::Rejected(RuntimeError::InvalidNonce) => (),
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn unknown_module_errors_keep_message() {
        let error = rpc_error(json_rpc_error(Some(
            json!({"module": "evm", "code": 7}),
        )));
        match error {
            BackendError::Rejected(RuntimeError::Module {
                module,
                code,
                message,
            }) => {
                assert_eq!(module, "evm");
                assert_eq!(code, 7);
                assert_eq!(message, "nonce mismatch");
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn other_errors_are_rpc_errors() {
        assert!(matches!(
            rpc_error(json_rpc_error(None)),
            BackendError::Rpc(_)
        ));
        assert!(matches!(rpc_error(RpcError::Timeout), BackendError::Timeout));
    }
}
