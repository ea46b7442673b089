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

//! Client to build, sign and submit deposits to a ParaTime runtime node.
//!
//! [Client] runs the transaction lifecycle against a [backend::Backend]. Use [Client::create] to
//! talk to a remote node and [Client::new_emulator] to run against an in-memory runtime.
//!
//! ```no_run
//! # use paratime_deposit_client::*;
//! # async fn example() -> Result<(), Error> {
//! let node_url = "ws://127.0.0.1:8546".parse().unwrap();
//! let runtime_id = "8000000000000000000000000000000000000000000000000000000000000000"
//!     .parse()
//!     .unwrap();
//! let client = Client::create(&node_url, runtime_id, ClientConfig::default()).await?;
//! let alice = ed25519::Pair::from_string("//Alice", None).unwrap();
//! let deposits = parse_deposits(&[(
//!     "oasis1qpupfu7e2n6pkezeaw0yhj8mcem8anj64ytrayne",
//!     "1_000_000_000_000_000_000",
//! )])?;
//! client.deposit_all(&alice, &deposits).await?;
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

pub use paratime_deposit_core::{
    ecdsa, ed25519, sr25519, Address, AddressError, BaseUnits, ChainContext, Denomination, Gas,
    Namespace, Nonce, ParseError, PublicKey, Quantity, QuantityError, RuntimeError, Signature,
    SignatureAddressSpec, Signer, SignerError,
};
pub use sp_core::crypto::Pair as CryptoPair;
pub use url::Url;

pub mod backend;
mod config;
mod deadline;
mod error;
pub mod gas;
pub mod message;
pub mod transaction;

pub use backend::{Emulator, RemoteNode};
pub use config::{ClientConfig, DEFAULT_HIGH_GAS_AMOUNT, DEFAULT_TIMEOUT};
pub use deadline::Deadline;
pub use error::{BackendError, Error, ErrorKind};
pub use message::Message;
pub use transaction::{Transaction, TransactionBuilder, UnverifiedTransaction};

use backend::{Backend, Round};

/// Client to submit transactions to a ParaTime runtime.
///
/// Cloning the client is cheap. All clones share the connection to the node.
#[derive(Clone)]
pub struct Client {
    backend: Arc<dyn Backend + Send + Sync>,
    config: ClientConfig,
}

impl Client {
    /// Connect to the runtime node at `url` and return a [Client] for the runtime `runtime_id`.
    ///
    /// Fails with [Error::Connect] if no connection can be established within
    /// [ClientConfig::timeout].
    pub async fn create(
        url: &Url,
        runtime_id: Namespace,
        config: ClientConfig,
    ) -> Result<Self, Error> {
        let deadline = Deadline::after(config.timeout);
        Self::create_before(&deadline, url, runtime_id, config).await
    }

    /// Same as [Client::create] but the connection must be established before `deadline`.
    pub async fn create_before(
        deadline: &Deadline,
        url: &Url,
        runtime_id: Namespace,
        config: ClientConfig,
    ) -> Result<Self, Error> {
        let backend = deadline
            .run(RemoteNode::create(url, runtime_id))
            .await
            .map_err(Error::Connect)?;
        Ok(Self::with_backend(Arc::new(backend), config))
    }

    /// Create a client that runs against `emulator`. The client shares state with `emulator`.
    pub fn new_emulator(emulator: &Emulator, config: ClientConfig) -> Self {
        Self::with_backend(Arc::new(emulator.clone()), config)
    }

    pub fn with_backend(backend: Arc<dyn Backend + Send + Sync>, config: ClientConfig) -> Self {
        Client { backend, config }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// New [Deadline] that passes after [ClientConfig::timeout].
    pub fn deadline(&self) -> Deadline {
        Deadline::after(self.config.timeout)
    }

    /// Fetch the chain context that transaction signatures are bound to.
    pub async fn chain_context(&self) -> Result<ChainContext, Error> {
        self.chain_context_before(&self.deadline()).await
    }

    async fn chain_context_before(&self, deadline: &Deadline) -> Result<ChainContext, Error> {
        let info = deadline
            .run(self.backend.get_info())
            .await
            .map_err(Error::ChainContext)?;
        Ok(info.chain_context)
    }

    /// Fetch the current nonce of the account with `address`.
    pub async fn account_nonce(&self, address: &Address) -> Result<Nonce, Error> {
        self.account_nonce_before(&self.deadline(), address).await
    }

    async fn account_nonce_before(
        &self,
        deadline: &Deadline,
        address: &Address,
    ) -> Result<Nonce, Error> {
        deadline
            .run(self.backend.nonce(Round::Latest, address))
            .await
            .map_err(|source| Error::Nonce {
                address: *address,
                source,
            })
    }

    /// Set the gas limit of `tx` to its estimated gas use plus `extra_gas`. See
    /// [gas::estimate_gas] for the behavior when estimation fails.
    pub async fn estimate_gas(&self, tx: &mut Transaction, extra_gas: Gas) -> Gas {
        gas::estimate_gas(
            self.backend.as_ref(),
            &self.deadline(),
            tx,
            self.config.high_gas_amount,
            extra_gas,
        )
        .await
    }

    /// Submit a signed transaction and return the result of the call.
    pub async fn submit_transaction(&self, tx: &UnverifiedTransaction) -> Result<Vec<u8>, Error> {
        self.deadline()
            .run(self.backend.submit_tx(tx))
            .await
            .map_err(Error::Submission)
    }

    /// Authenticate `tx` with `signer`, estimate its gas, sign and submit it.
    ///
    /// The chain context and the nonce of the signer are fetched for every call.
    pub async fn sign_and_submit_transaction<S: Signer + ?Sized>(
        &self,
        signer: &S,
        tx: Transaction,
        extra_gas: Gas,
    ) -> Result<Vec<u8>, Error> {
        self.sign_and_submit_transaction_before(&self.deadline(), signer, tx, extra_gas)
            .await
    }

    /// Same as [Client::sign_and_submit_transaction] but every request must finish before
    /// `deadline`.
    pub async fn sign_and_submit_transaction_before<S: Signer + ?Sized>(
        &self,
        deadline: &Deadline,
        signer: &S,
        mut tx: Transaction,
        extra_gas: Gas,
    ) -> Result<Vec<u8>, Error> {
        let chain_context = self.chain_context_before(deadline).await?;
        log::debug!("chain context: {}", chain_context);

        let address_spec = SignatureAddressSpec::from_public_key(signer.public_key());
        let address = Address::from_sigspec(&address_spec)
            .map_err(|err| SignerError::InvalidPublicKey(err.to_string()))?;
        let nonce = self.account_nonce_before(deadline, &address).await?;
        log::debug!("nonce of {}: {}", address, nonce);

        tx.append_auth_signature(address_spec, nonce);
        let gas = gas::estimate_gas(
            self.backend.as_ref(),
            deadline,
            &mut tx,
            self.config.high_gas_amount,
            extra_gas,
        )
        .await;
        log::debug!("gas limit: {}", gas);

        let mut tx_signer = tx.prepare_for_signing();
        tx_signer.append_sign(&chain_context, signer)?;
        let unverified = tx_signer.unverified_transaction();

        let result = deadline
            .run(self.backend.submit_tx(&unverified))
            .await
            .map_err(Error::Submission)?;
        log::debug!("transaction submitted");
        Ok(result)
    }

    /// Deposit `amount` from the consensus account of `signer` into the runtime account `to`.
    pub async fn deposit<S: Signer + ?Sized>(
        &self,
        signer: &S,
        to: Address,
        amount: BaseUnits,
    ) -> Result<Vec<u8>, Error> {
        self.deposit_before(&self.deadline(), signer, to, amount)
            .await
    }

    pub async fn deposit_before<S: Signer + ?Sized>(
        &self,
        deadline: &Deadline,
        signer: &S,
        to: Address,
        amount: BaseUnits,
    ) -> Result<Vec<u8>, Error> {
        let tx = transaction::deposit(Some(to), amount.clone()).into_transaction();
        let result = self
            .sign_and_submit_transaction_before(deadline, signer, tx, self.config.extra_gas)
            .await?;
        log::info!("Deposited {} to {}", amount, to);
        Ok(result)
    }

    /// Run one deposit after the other and return the results.
    ///
    /// All deposits share one [Deadline]. Stops at the first failure.
    pub async fn deposit_all<S: Signer + ?Sized>(
        &self,
        signer: &S,
        deposits: &[(Address, BaseUnits)],
    ) -> Result<Vec<Vec<u8>>, Error> {
        let deadline = self.deadline();
        let mut results = Vec::with_capacity(deposits.len());
        for (to, amount) in deposits {
            let result = self
                .deposit_before(&deadline, signer, *to, amount.clone())
                .await?;
            results.push(result);
        }
        Ok(results)
    }
}

/// Parse pairs of recipient address and amount of native tokens.
///
/// Fails on the first malformed value. Nothing is parsed lazily, so invalid input is reported
/// before any request is made.
pub fn parse_deposits<T: AsRef<str>>(
    deposits: &[(T, T)],
) -> Result<Vec<(Address, BaseUnits)>, Error> {
    deposits
        .iter()
        .map(|(to, amount)| {
            let to: Address = to.as_ref().parse().map_err(ParseError::from)?;
            let amount: Quantity = amount.as_ref().parse().map_err(ParseError::from)?;
            Ok((to, BaseUnits::native(amount)))
        })
        .collect()
}
