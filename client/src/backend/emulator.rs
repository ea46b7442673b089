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

//! Provides [Emulator] backend to run a deposit runtime in memory.

use parity_scale_codec::{DecodeAll as _, Encode as _};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use paratime_deposit_core::{
    message::Deposit, Address, ChainContext, Gas, Namespace, Nonce, Quantity, RuntimeError,
    Transaction, UnverifiedTransaction,
};

use crate::backend::{self, Round, RuntimeInfo};
use crate::error::BackendError;

/// Gas used by every transaction.
pub const GAS_BASE: Gas = 100;
/// Gas used per byte of the encoded transaction.
pub const GAS_PER_BYTE: Gas = 1;
/// Gas used per signature that is checked.
pub const GAS_PER_SIGNATURE: Gas = 1_000;
/// Gas used by a [Deposit] call on top of the other costs.
pub const GAS_DEPOSIT: Gas = 10_000;

/// Chain context reported by [Emulator::new].
pub const EMULATOR_CHAIN_CONTEXT: &str = "paratime-deposit emulator";

/// [backend::Backend] methods. Used to inject failures with [Emulator::set_failing].
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Method {
    GetInfo,
    Nonce,
    EstimateGas,
    SubmitTx,
}

/// A request received by the [Emulator].
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Request {
    GetInfo,
    Nonce(Address),
    EstimateGas(Transaction),
    SubmitTx(UnverifiedTransaction),
}

impl Request {
    pub fn method(&self) -> Method {
        match self {
            Request::GetInfo => Method::GetInfo,
            Request::Nonce(_) => Method::Nonce,
            Request::EstimateGas(_) => Method::EstimateGas,
            Request::SubmitTx(_) => Method::SubmitTx,
        }
    }
}

/// [backend::Backend] implementation that keeps the runtime state in memory.
///
/// # Differences with real backend
///
/// * Only [Deposit] calls are understood. Every other method is rejected with
///   [RuntimeError::InvalidMethod].
///
/// * A submitted transaction is executed immediately and on its own.
///
/// * Rounds are ignored. Every query runs against the current state.
///
/// * Consensus layer balances are set with [Emulator::fund_consensus] instead of being read
///   from a consensus layer.
#[derive(Clone)]
pub struct Emulator {
    info: RuntimeInfo,
    state: Arc<Mutex<EmulatorState>>,
}

/// Mutable state of the emulator.
#[derive(Default)]
struct EmulatorState {
    nonces: HashMap<Address, Nonce>,
    consensus_balances: HashMap<Address, Quantity>,
    runtime_balances: HashMap<Address, Quantity>,
    failing: HashSet<Method>,
    delay: Option<Duration>,
    requests: Vec<Request>,
}

impl Emulator {
    pub fn new() -> Self {
        let mut runtime_id = [0u8; 32];
        runtime_id[0] = 0x80;
        Self::with_runtime(
            Namespace::from_raw(runtime_id),
            ChainContext::new(EMULATOR_CHAIN_CONTEXT),
        )
    }

    pub fn with_runtime(runtime_id: Namespace, chain_context: ChainContext) -> Self {
        Emulator {
            info: RuntimeInfo {
                runtime_id,
                chain_context,
            },
            state: Arc::new(Mutex::new(EmulatorState::default())),
        }
    }

    pub fn chain_context(&self) -> &ChainContext {
        &self.info.chain_context
    }

    pub fn set_nonce(&self, address: Address, nonce: Nonce) {
        self.state().nonces.insert(address, nonce);
    }

    pub fn nonce_of(&self, address: &Address) -> Nonce {
        self.state().nonces.get(address).copied().unwrap_or(0)
    }

    /// Add `amount` to the consensus layer balance of `address`. Deposits are paid from this
    /// balance.
    pub fn fund_consensus(&self, address: Address, amount: impl Into<Quantity>) {
        let amount: Quantity = amount.into();
        let mut state = self.state();
        let balance = state.consensus_balances.entry(address).or_default();
        *balance = &*balance + &amount;
    }

    pub fn consensus_balance(&self, address: &Address) -> Quantity {
        self.state()
            .consensus_balances
            .get(address)
            .cloned()
            .unwrap_or_default()
    }

    /// Balance of `address` in the runtime. Deposits are credited to this balance.
    pub fn runtime_balance(&self, address: &Address) -> Quantity {
        self.state()
            .runtime_balances
            .get(address)
            .cloned()
            .unwrap_or_default()
    }

    /// If `failing` is true, every following request for `method` fails with
    /// [BackendError::Rpc] until the failure is turned off again.
    pub fn set_failing(&self, method: Method, failing: bool) {
        let mut state = self.state();
        if failing {
            state.failing.insert(method);
        } else {
            state.failing.remove(&method);
        }
    }

    /// Delay every following response by `delay`.
    pub fn set_delay(&self, delay: Option<Duration>) {
        self.state().delay = delay;
    }

    /// All requests received so far in the order they arrived.
    pub fn requests(&self) -> Vec<Request> {
        self.state().requests.clone()
    }

    /// Methods of all requests received so far.
    pub fn methods(&self) -> Vec<Method> {
        self.state().requests.iter().map(Request::method).collect()
    }

    /// Decoded bodies of all submitted transactions, including rejected ones.
    pub fn submitted(&self) -> Vec<Transaction> {
        self.state()
            .requests
            .iter()
            .filter_map(|request| match request {
                Request::SubmitTx(tx) => Transaction::decode_all(&mut &tx.body[..]).ok(),
                _ => None,
            })
            .collect()
    }

    fn state(&self) -> MutexGuard<'_, EmulatorState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Log `request` and wait for the configured delay. Fails if `request` is set to fail.
    async fn receive(&self, request: Request) -> Result<(), BackendError> {
        let method = request.method();
        let (failing, delay) = {
            let mut state = self.state();
            state.requests.push(request);
            (state.failing.contains(&method), state.delay)
        };
        if let Some(delay) = delay {
            async_std::task::sleep(delay).await;
        }
        if failing {
            Err(BackendError::Rpc(format!("{:?} request failed", method)))
        } else {
            Ok(())
        }
    }
}

impl Default for Emulator {
    fn default() -> Self {
        Self::new()
    }
}

/// Gas a transaction uses when it is executed.
pub fn gas_cost(tx: &Transaction) -> Gas {
    let size = tx.encoded_size() as Gas;
    let signatures = tx.auth_info.signer_info.len() as Gas;
    GAS_BASE
        .saturating_add(size.saturating_mul(GAS_PER_BYTE))
        .saturating_add(signatures.saturating_mul(GAS_PER_SIGNATURE))
        .saturating_add(GAS_DEPOSIT)
}

/// Check the parts of `tx` that do not depend on account state and return the deposit it
/// carries.
fn check_call(tx: &Transaction) -> Result<Deposit, RuntimeError> {
    if tx.call.method != Deposit::METHOD {
        return Err(RuntimeError::InvalidMethod);
    }
    let deposit = Deposit::decode_all(&mut &tx.call.body[..])
        .map_err(|_| RuntimeError::MalformedTransaction)?;
    if tx.auth_info.fee.gas < gas_cost(tx) {
        return Err(RuntimeError::OutOfGas);
    }
    Ok(deposit)
}

#[async_trait::async_trait]
impl backend::Backend for Emulator {
    async fn get_info(&self) -> Result<RuntimeInfo, BackendError> {
        self.receive(Request::GetInfo).await?;
        Ok(self.info.clone())
    }

    async fn nonce(&self, _round: Round, address: &Address) -> Result<Nonce, BackendError> {
        self.receive(Request::Nonce(*address)).await?;
        Ok(self.nonce_of(address))
    }

    async fn estimate_gas(&self, _round: Round, tx: &Transaction) -> Result<Gas, BackendError> {
        self.receive(Request::EstimateGas(tx.clone())).await?;
        check_call(tx)?;
        Ok(gas_cost(tx))
    }

    async fn submit_tx(&self, tx: &UnverifiedTransaction) -> Result<Vec<u8>, BackendError> {
        self.receive(Request::SubmitTx(tx.clone())).await?;
        let tx = tx.verify(&self.info.chain_context)?;
        let deposit = check_call(&tx)?;

        let signers = tx
            .auth_info
            .signer_info
            .iter()
            .map(|info| {
                Address::from_sigspec(&info.address_spec)
                    .map(|address| (address, info.nonce))
                    .map_err(|_| RuntimeError::InvalidSignature)
            })
            .collect::<Result<Vec<_>, _>>()?;
        let payer = match signers.first() {
            Some((address, _)) => *address,
            None => return Err(RuntimeError::MalformedTransaction.into()),
        };
        if tx.auth_info.fee.consensus_messages < 1 {
            return Err(RuntimeError::OutOfMessageSlots.into());
        }

        let mut state = self.state();
        for (address, nonce) in &signers {
            if state.nonces.get(address).copied().unwrap_or(0) != *nonce {
                return Err(RuntimeError::InvalidNonce.into());
            }
        }

        let balance = state
            .consensus_balances
            .get(&payer)
            .cloned()
            .unwrap_or_default();
        let remaining = balance
            .checked_sub(&deposit.amount.amount)
            .map_err(|_| RuntimeError::InsufficientBalance)?;
        state.consensus_balances.insert(payer, remaining);

        let recipient = deposit.to.unwrap_or(payer);
        let credited = state.runtime_balances.entry(recipient).or_default();
        *credited = &*credited + &deposit.amount.amount;

        for (address, _) in signers {
            *state.nonces.entry(address).or_insert(0) += 1;
        }
        Ok(Vec::new())
    }
}
