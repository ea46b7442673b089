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

//! Provides the [Signer] abstraction over the supported key pairs.
//!
//! A signer never signs raw message bytes. It signs the SHA-512/256 digest of the signature
//! context followed by the message, see [signing_message]. The context binds a signature to its
//! purpose, for transactions it also binds it to a chain (see [crate::ChainContext]).

use parity_scale_codec::{Decode, Encode};
use sha2::{Digest as _, Sha512_256};
use sp_core::crypto::Pair as CryptoPair;
use sp_core::{ecdsa, ed25519, sr25519};
use std::convert::TryFrom;
use std::fmt;

/// Public key tagged with its signature scheme.
///
/// The set of schemes is closed. Everything that depends on the scheme matches on this type
/// exhaustively, so supporting a new scheme is a compile time checked change.
#[derive(Decode, Encode, Clone, Debug, Eq, PartialEq)]
pub enum PublicKey {
    Ed25519(ed25519::Public),
    Secp256k1(ecdsa::Public),
    Sr25519(sr25519::Public),
}

impl PublicKey {
    /// Name of the signature scheme.
    pub fn scheme(&self) -> &'static str {
        match self {
            PublicKey::Ed25519(_) => "ed25519",
            PublicKey::Secp256k1(_) => "secp256k1",
            PublicKey::Sr25519(_) => "sr25519",
        }
    }

    /// Raw public key bytes. Secp256k1 keys are in compressed form.
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            PublicKey::Ed25519(public) => public.as_ref(),
            PublicKey::Secp256k1(public) => public.as_ref(),
            PublicKey::Sr25519(public) => public.as_ref(),
        }
    }

    /// Returns `true` if `signature` was produced by the private key of `self` for `message`
    /// under `context`.
    pub fn verify(&self, context: &[u8], message: &[u8], signature: &Signature) -> bool {
        let digest = signing_message(context, message);
        let raw = signature.as_bytes();
        match self {
            PublicKey::Ed25519(public) => ed25519::Signature::try_from(raw)
                .map(|sig| ed25519::Pair::verify(&sig, digest, public))
                .unwrap_or(false),
            PublicKey::Secp256k1(public) => ecdsa::Signature::try_from(raw)
                .map(|sig| ecdsa::Pair::verify(&sig, digest, public))
                .unwrap_or(false),
            PublicKey::Sr25519(public) => sr25519::Signature::try_from(raw)
                .map(|sig| sr25519::Pair::verify(&sig, digest, public))
                .unwrap_or(false),
        }
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}:{}", self.scheme(), hex::encode(self.as_bytes()))
    }
}

/// Raw signature bytes as produced by a [Signer].
#[derive(Decode, Encode, Clone, Debug, Default, Eq, PartialEq)]
pub struct Signature(pub Vec<u8>);

impl Signature {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Errors a [Signer] may return or that occur while attaching a signature to a transaction.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum SignerError {
    /// The signer is not listed in the authentication info of the transaction.
    #[error("signer is not listed in the transaction authentication info")]
    NotListed,

    /// The public key of the signer cannot be used to derive an address.
    #[error("invalid public key: {0}")]
    InvalidPublicKey(String),

    /// The signer refused or failed to produce a signature.
    #[error("signer rejected the message: {0}")]
    Rejected(String),
}

/// Identity that signs messages under a signature context.
pub trait Signer {
    fn public_key(&self) -> PublicKey;

    fn sign(&self, context: &[u8], message: &[u8]) -> Result<Signature, SignerError>;
}

/// Return the digest a signer actually signs for `message` under `context`.
pub fn signing_message(context: &[u8], message: &[u8]) -> [u8; 32] {
    let mut hasher = Sha512_256::new();
    hasher.update(context);
    hasher.update(message);
    hasher.finalize().into()
}

impl Signer for ed25519::Pair {
    fn public_key(&self) -> PublicKey {
        PublicKey::Ed25519(CryptoPair::public(self))
    }

    fn sign(&self, context: &[u8], message: &[u8]) -> Result<Signature, SignerError> {
        let signature = CryptoPair::sign(self, &signing_message(context, message));
        Ok(Signature(AsRef::<[u8]>::as_ref(&signature).to_vec()))
    }
}

impl Signer for ecdsa::Pair {
    fn public_key(&self) -> PublicKey {
        PublicKey::Secp256k1(CryptoPair::public(self))
    }

    fn sign(&self, context: &[u8], message: &[u8]) -> Result<Signature, SignerError> {
        let signature = CryptoPair::sign(self, &signing_message(context, message));
        Ok(Signature(AsRef::<[u8]>::as_ref(&signature).to_vec()))
    }
}

impl Signer for sr25519::Pair {
    fn public_key(&self) -> PublicKey {
        PublicKey::Sr25519(CryptoPair::public(self))
    }

    fn sign(&self, context: &[u8], message: &[u8]) -> Result<Signature, SignerError> {
        let signature = CryptoPair::sign(self, &signing_message(context, message));
        Ok(Signature(AsRef::<[u8]>::as_ref(&signature).to_vec()))
    }
}

impl<S: Signer + ?Sized> Signer for Box<S> {
    fn public_key(&self) -> PublicKey {
        (**self).public_key()
    }

    fn sign(&self, context: &[u8], message: &[u8]) -> Result<Signature, SignerError> {
        (**self).sign(context, message)
    }
}
