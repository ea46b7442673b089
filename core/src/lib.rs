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

//! Basic types used to build, sign and submit ParaTime deposit transactions.
//!
//! Nothing in this crate talks to the network. The client crate combines these types with a
//! backend to run the transaction lifecycle.

pub use sp_core::{ecdsa, ed25519, sr25519};

pub mod address;
pub use address::{Address, AddressError, SignatureAddressSpec};

mod context;
pub use context::ChainContext;

mod error;
pub use error::{ParseError, RuntimeError};

pub mod message;

mod namespace;
pub use namespace::{Namespace, NamespaceError};

pub mod quantity;
pub use quantity::{BaseUnits, Denomination, Quantity, QuantityError};

pub mod signer;
pub use signer::{PublicKey, Signature, Signer, SignerError};

pub mod transaction;
pub use transaction::{
    AuthInfo, AuthProof, Call, Fee, SignerInfo, Transaction, TransactionSigner,
    UnverifiedTransaction,
};

/// Per-account counter that orders the transactions of an account.
pub type Nonce = u64;

/// Units of gas a transaction may consume.
pub type Gas = u64;
