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

//! Account addresses and their derivation from scheme-tagged public keys.
//!
//! An address is the version byte followed by the first 20 bytes of
//! `SHA-512/256(context || version || data)`. Context and data depend on the signature scheme:
//!
//! | scheme | context | data |
//! |---|---|---|
//! | ed25519 | [ADDRESS_V0_ED25519_CONTEXT] | 32 byte public key |
//! | secp256k1 | [ADDRESS_V0_SECP256K1ETH_CONTEXT] | 20 byte Ethereum address |
//! | sr25519 | [ADDRESS_V0_SR25519_CONTEXT] | 32 byte public key |
//!
//! The text form is bech32 with the [ADDRESS_BECH32_HRP] prefix.

use bech32::{FromBase32 as _, ToBase32 as _, Variant};
use k256::elliptic_curve::sec1::ToEncodedPoint as _;
use parity_scale_codec::{Decode, Encode};
use sha2::{Digest as _, Sha512_256};
use sp_core::{ecdsa, ed25519, sr25519};
use std::fmt;
use std::str::FromStr;
use tiny_keccak::{Hasher as _, Keccak};

use crate::signer::PublicKey;

/// Size of an address in bytes, including the version byte.
pub const ADDRESS_SIZE: usize = 21;

pub const ADDRESS_V0_VERSION: u8 = 0;

pub const ADDRESS_BECH32_HRP: &str = "oasis";

pub const ADDRESS_V0_ED25519_CONTEXT: &[u8] = b"oasis-core/address: staking";

pub const ADDRESS_V0_SECP256K1ETH_CONTEXT: &[u8] = b"oasis-runtime-sdk/address: secp256k1eth";

pub const ADDRESS_V0_SR25519_CONTEXT: &[u8] = b"oasis-runtime-sdk/address: sr25519";

/// Canonical account identifier.
#[derive(Decode, Encode, Clone, Copy, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct Address([u8; ADDRESS_SIZE]);

/// Describes how the address of a signer is derived from its public key.
///
/// Carried in the authentication info of a transaction so that the runtime can resolve the
/// signer's account.
#[derive(Decode, Encode, Clone, Debug, Eq, PartialEq)]
pub enum SignatureAddressSpec {
    Ed25519(ed25519::Public),
    /// Secp256k1 key with an address derived from the Ethereum address of the key.
    Secp256k1Eth(ecdsa::Public),
    Sr25519(sr25519::Public),
}

impl SignatureAddressSpec {
    pub fn from_public_key(public_key: PublicKey) -> Self {
        match public_key {
            PublicKey::Ed25519(public) => SignatureAddressSpec::Ed25519(public),
            PublicKey::Secp256k1(public) => SignatureAddressSpec::Secp256k1Eth(public),
            PublicKey::Sr25519(public) => SignatureAddressSpec::Sr25519(public),
        }
    }

    pub fn public_key(&self) -> PublicKey {
        match self {
            SignatureAddressSpec::Ed25519(public) => PublicKey::Ed25519(*public),
            SignatureAddressSpec::Secp256k1Eth(public) => PublicKey::Secp256k1(public.clone()),
            SignatureAddressSpec::Sr25519(public) => PublicKey::Sr25519(*public),
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum AddressError {
    #[error("invalid bech32 encoding")]
    Bech32(#[from] bech32::Error),

    #[error("unexpected human readable part {0}, expected {}", ADDRESS_BECH32_HRP)]
    WrongHrp(String),

    #[error("address must use the bech32 variant, not bech32m")]
    WrongVariant,

    #[error("address must be {} bytes long, got {0}", ADDRESS_SIZE)]
    WrongLength(usize),

    #[error("unsupported address version {0}")]
    UnsupportedVersion(u8),

    #[error("public key is not a valid secp256k1 point")]
    InvalidPublicKey,
}

impl Address {
    /// Derive an address from a context, a version and the scheme specific data.
    pub fn new(context: &[u8], version: u8, data: &[u8]) -> Self {
        let mut hasher = Sha512_256::new();
        hasher.update(context);
        hasher.update([version]);
        hasher.update(data);
        let hash = hasher.finalize();

        let mut raw = [0u8; ADDRESS_SIZE];
        raw[0] = version;
        raw[1..].copy_from_slice(&hash[..ADDRESS_SIZE - 1]);
        Address(raw)
    }

    /// Resolve the address of the account controlled by the key in `spec`.
    ///
    /// Fails only for secp256k1 keys that are not valid curve points.
    pub fn from_sigspec(spec: &SignatureAddressSpec) -> Result<Self, AddressError> {
        match spec {
            SignatureAddressSpec::Ed25519(public) => Ok(Address::new(
                ADDRESS_V0_ED25519_CONTEXT,
                ADDRESS_V0_VERSION,
                public.as_ref(),
            )),
            SignatureAddressSpec::Secp256k1Eth(public) => Ok(Address::from_eth(&eth_address(public)?)),
            SignatureAddressSpec::Sr25519(public) => Ok(Address::new(
                ADDRESS_V0_SR25519_CONTEXT,
                ADDRESS_V0_VERSION,
                public.as_ref(),
            )),
        }
    }

    /// Address of the account that belongs to an Ethereum address.
    pub fn from_eth(eth_address: &[u8; 20]) -> Self {
        Address::new(
            ADDRESS_V0_SECP256K1ETH_CONTEXT,
            ADDRESS_V0_VERSION,
            eth_address,
        )
    }

    pub fn version(&self) -> u8 {
        self.0[0]
    }

    pub fn as_bytes(&self) -> &[u8; ADDRESS_SIZE] {
        &self.0
    }
}

/// Ethereum address of a secp256k1 key: the last 20 bytes of the Keccak-256 hash of the
/// uncompressed key without its `0x04` prefix.
pub fn eth_address(public: &ecdsa::Public) -> Result<[u8; 20], AddressError> {
    let key = k256::PublicKey::from_sec1_bytes(public.as_ref())
        .map_err(|_| AddressError::InvalidPublicKey)?;
    let uncompressed = key.to_encoded_point(false);

    let mut hash = [0u8; 32];
    let mut keccak = Keccak::v256();
    keccak.update(&uncompressed.as_bytes()[1..]);
    keccak.finalize(&mut hash);

    let mut eth = [0u8; 20];
    eth.copy_from_slice(&hash[12..]);
    Ok(eth)
}

impl FromStr for Address {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (hrp, data, variant) = bech32::decode(s)?;
        if hrp != ADDRESS_BECH32_HRP {
            return Err(AddressError::WrongHrp(hrp));
        }
        if variant != Variant::Bech32 {
            return Err(AddressError::WrongVariant);
        }
        let bytes = Vec::<u8>::from_base32(&data)?;
        if bytes.len() != ADDRESS_SIZE {
            return Err(AddressError::WrongLength(bytes.len()));
        }
        if bytes[0] != ADDRESS_V0_VERSION {
            return Err(AddressError::UnsupportedVersion(bytes[0]));
        }
        let mut raw = [0u8; ADDRESS_SIZE];
        raw.copy_from_slice(&bytes);
        Ok(Address(raw))
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let encoded = bech32::encode(ADDRESS_BECH32_HRP, self.0.to_base32(), Variant::Bech32)
            .map_err(|_| fmt::Error)?;
        f.write_str(&encoded)
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Address({})", self)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use sp_core::crypto::Pair as _;

    const DAVE: &str = "oasis1qpupfu7e2n6pkezeaw0yhj8mcem8anj64ytrayne";

    fn specs(seed: &str) -> Vec<SignatureAddressSpec> {
        let seed = format!("//{}", seed);
        vec![
            SignatureAddressSpec::Ed25519(ed25519::Pair::from_string(&seed, None).unwrap().public()),
            SignatureAddressSpec::Secp256k1Eth(
                ecdsa::Pair::from_string(&seed, None).unwrap().public(),
            ),
            SignatureAddressSpec::Sr25519(sr25519::Pair::from_string(&seed, None).unwrap().public()),
        ]
    }

    #[test]
    fn derivation_is_deterministic() {
        for (first, second) in specs("Alice").iter().zip(specs("Alice").iter()) {
            assert_eq!(
                Address::from_sigspec(first).unwrap(),
                Address::from_sigspec(second).unwrap()
            );
        }
    }

    #[test]
    fn distinct_keys_have_distinct_addresses() {
        for (alice, bob) in specs("Alice").iter().zip(specs("Bob").iter()) {
            assert_ne!(
                Address::from_sigspec(alice).unwrap(),
                Address::from_sigspec(bob).unwrap()
            );
        }
    }

    #[test]
    fn schemes_use_distinct_contexts() {
        let key = [7u8; 32];
        let ed25519 = Address::from_sigspec(&SignatureAddressSpec::Ed25519(
            ed25519::Public::from_raw(key),
        ))
        .unwrap();
        let sr25519 = Address::from_sigspec(&SignatureAddressSpec::Sr25519(
            sr25519::Public::from_raw(key),
        ))
        .unwrap();
        assert_ne!(ed25519, sr25519);
    }

    #[test]
    fn secp256k1_address_uses_eth_address() {
        let public = ecdsa::Pair::from_string("//Alice", None).unwrap().public();
        let eth = eth_address(&public).unwrap();
        assert_eq!(
            Address::from_sigspec(&SignatureAddressSpec::Secp256k1Eth(public)).unwrap(),
            Address::from_eth(&eth)
        );
    }

    #[test]
    fn invalid_secp256k1_key_is_rejected() {
        let public = ecdsa::Public::from_raw([0u8; 33]);
        assert_eq!(
            Address::from_sigspec(&SignatureAddressSpec::Secp256k1Eth(public)),
            Err(AddressError::InvalidPublicKey)
        );
    }

    #[test]
    fn parse_display_roundtrip() {
        let address: Address = DAVE.parse().unwrap();
        assert_eq!(address.version(), ADDRESS_V0_VERSION);
        assert_eq!(address.to_string(), DAVE);
    }

    #[test]
    fn parse_rejects_bad_checksum() {
        let mut corrupted = DAVE.to_string();
        corrupted.pop();
        corrupted.push('q');
        assert!(matches!(
            corrupted.parse::<Address>(),
            Err(AddressError::Bech32(_))
        ));
    }

    #[test]
    fn parse_rejects_wrong_length() {
        let short = bech32::encode(ADDRESS_BECH32_HRP, [0u8; 20].to_base32(), Variant::Bech32)
            .unwrap();
        assert_eq!(short.parse::<Address>(), Err(AddressError::WrongLength(20)));
    }

    #[test]
    fn parse_rejects_wrong_hrp() {
        let other = bech32::encode("cosmos", [0u8; ADDRESS_SIZE].to_base32(), Variant::Bech32)
            .unwrap();
        assert_eq!(
            other.parse::<Address>(),
            Err(AddressError::WrongHrp("cosmos".to_string()))
        );
    }
}
