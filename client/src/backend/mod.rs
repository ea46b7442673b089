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

//! Define trait for client backends and provide emulator and remote node implementation
use paratime_deposit_core::{
    Address, ChainContext, Gas, Namespace, Nonce, Transaction, UnverifiedTransaction,
};

use crate::error::BackendError;

mod emulator;
mod remote_node;

pub use emulator::{gas_cost, Emulator, Method, Request, EMULATOR_CHAIN_CONTEXT};
pub use remote_node::RemoteNode;

/// Block round a query is run against.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Round {
    /// The latest round known to the node.
    Latest,
    Number(u64),
}

impl Round {
    /// Wire value of [Round::Latest].
    pub const LATEST: u64 = u64::MAX;

    pub fn as_u64(self) -> u64 {
        match self {
            Round::Latest => Self::LATEST,
            Round::Number(round) => round,
        }
    }
}

/// Information about the runtime a backend talks to.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RuntimeInfo {
    pub runtime_id: Namespace,
    /// Context signatures of transactions for this runtime must be bound to.
    pub chain_context: ChainContext,
}

/// Backend for talking to a runtime node.
///
/// Every method is a single request and response. Backends never retry.
#[async_trait::async_trait]
pub trait Backend {
    /// Fetch information about the runtime, including the chain context.
    async fn get_info(&self) -> Result<RuntimeInfo, BackendError>;

    /// Fetch the nonce of the account with `address` at `round`.
    async fn nonce(&self, round: Round, address: &Address) -> Result<Nonce, BackendError>;

    /// Simulate `tx` at `round` and return the gas it uses.
    ///
    /// The simulation fails if the gas limit of `tx` is lower than the gas it uses.
    async fn estimate_gas(&self, round: Round, tx: &Transaction) -> Result<Gas, BackendError>;

    /// Submit a signed transaction and return the result of the call once it has been
    /// executed.
    async fn submit_tx(&self, tx: &UnverifiedTransaction) -> Result<Vec<u8>, BackendError>;
}
