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

//! Provides [Transaction] and the types to sign and submit it.
//!
//! A transaction goes through three stages:
//!
//! 1. A draft [Transaction] that carries the call, the fee and one [SignerInfo] per signer.
//! 2. A [TransactionSigner] obtained with [Transaction::prepare_for_signing]. It holds the
//!    encoded draft and collects one signature per signer.
//! 3. An [UnverifiedTransaction] that is ready to be submitted.

use parity_scale_codec::{Decode, DecodeAll as _, Encode};

use crate::signer::{Signature, Signer, SignerError};
use crate::{BaseUnits, ChainContext, Gas, Nonce, RuntimeError, SignatureAddressSpec};

/// Version of the transaction format produced by this crate.
pub const LATEST_TRANSACTION_VERSION: u16 = 1;

#[derive(Decode, Encode, Clone, Debug, Eq, PartialEq)]
pub struct Transaction {
    pub version: u16,
    pub call: Call,
    pub auth_info: AuthInfo,
}

/// Method call with an encoded body.
#[derive(Decode, Encode, Clone, Debug, Eq, PartialEq)]
pub struct Call {
    pub method: String,
    pub body: Vec<u8>,
}

#[derive(Decode, Encode, Clone, Debug, Default, Eq, PartialEq)]
pub struct AuthInfo {
    pub signer_info: Vec<SignerInfo>,
    pub fee: Fee,
}

/// Transaction fee. It is paid by the first signer.
#[derive(Decode, Encode, Clone, Debug, Default, Eq, PartialEq)]
pub struct Fee {
    pub amount: BaseUnits,
    /// Maximum amount of gas the transaction may use.
    pub gas: Gas,
    /// Number of consensus layer messages the transaction may emit.
    pub consensus_messages: u32,
}

#[derive(Decode, Encode, Clone, Debug, Eq, PartialEq)]
pub struct SignerInfo {
    pub address_spec: SignatureAddressSpec,
    pub nonce: Nonce,
}

impl Transaction {
    /// Create a draft transaction calling `method` with `body` and no signers.
    pub fn new(method: impl Into<String>, body: impl Encode) -> Self {
        Transaction {
            version: LATEST_TRANSACTION_VERSION,
            call: Call {
                method: method.into(),
                body: body.encode(),
            },
            auth_info: AuthInfo::default(),
        }
    }

    /// Add a signer that authenticates with a signature for the given nonce.
    pub fn append_auth_signature(&mut self, address_spec: SignatureAddressSpec, nonce: Nonce) {
        self.auth_info.signer_info.push(SignerInfo {
            address_spec,
            nonce,
        });
    }

    /// Freeze the transaction and return a [TransactionSigner] that collects signatures for it.
    pub fn prepare_for_signing(&self) -> TransactionSigner {
        TransactionSigner {
            signer_info: self.auth_info.signer_info.clone(),
            body: self.encode(),
            signatures: vec![None; self.auth_info.signer_info.len()],
        }
    }
}

/// A transaction that is prepared for signing.
///
/// The transaction body is fixed. Only signatures can be added.
#[derive(Clone, Debug)]
pub struct TransactionSigner {
    signer_info: Vec<SignerInfo>,
    body: Vec<u8>,
    signatures: Vec<Option<Signature>>,
}

impl TransactionSigner {
    /// Sign the transaction body for the chain identified by `chain_context` and store the
    /// signature in the slot of `signer`.
    ///
    /// Fails with [SignerError::NotListed] if `signer` has no [SignerInfo] in the transaction.
    pub fn append_sign<S: Signer + ?Sized>(
        &mut self,
        chain_context: &ChainContext,
        signer: &S,
    ) -> Result<(), SignerError> {
        let address_spec = SignatureAddressSpec::from_public_key(signer.public_key());
        let index = self
            .signer_info
            .iter()
            .position(|info| info.address_spec == address_spec)
            .ok_or(SignerError::NotListed)?;
        let signature = signer.sign(&chain_context.tx_signature_context(), &self.body)?;
        self.signatures[index] = Some(signature);
        Ok(())
    }

    /// Body that the signers sign.
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Return the transaction in the form it is submitted in.
    ///
    /// Slots of signers that have not signed yet carry an empty signature.
    pub fn unverified_transaction(self) -> UnverifiedTransaction {
        UnverifiedTransaction {
            body: self.body,
            auth_proofs: self
                .signatures
                .into_iter()
                .map(|signature| AuthProof::Signature(signature.unwrap_or_default()))
                .collect(),
        }
    }
}

#[derive(Decode, Encode, Clone, Debug, Eq, PartialEq)]
pub enum AuthProof {
    Signature(Signature),
}

/// A signed transaction as it is submitted to a runtime node.
#[derive(Decode, Encode, Clone, Debug, Eq, PartialEq)]
pub struct UnverifiedTransaction {
    /// The encoded [Transaction].
    pub body: Vec<u8>,
    /// One proof per [SignerInfo] in the same order.
    pub auth_proofs: Vec<AuthProof>,
}

impl UnverifiedTransaction {
    /// Decode the transaction and check every signature against the signer it belongs to.
    pub fn verify(&self, chain_context: &ChainContext) -> Result<Transaction, RuntimeError> {
        let tx = Transaction::decode_all(&mut &self.body[..])
            .map_err(|_| RuntimeError::MalformedTransaction)?;
        if tx.auth_info.signer_info.len() != self.auth_proofs.len() {
            return Err(RuntimeError::MalformedTransaction);
        }

        let signature_context = chain_context.tx_signature_context();
        for (info, proof) in tx.auth_info.signer_info.iter().zip(&self.auth_proofs) {
            let AuthProof::Signature(signature) = proof;
            if !info
                .address_spec
                .public_key()
                .verify(&signature_context, &self.body, signature)
            {
                return Err(RuntimeError::InvalidSignature);
            }
        }
        Ok(tx)
    }
}
