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

//! Miscellaneous helpers used throughout ParaTime deposit tests.

use rand::distributions::Alphanumeric;
use rand::Rng;

use paratime_deposit_client::*;

/// Submit a deposit and panic if it is not accepted.
pub async fn deposit_ok<S: Signer + ?Sized>(
    client: &Client,
    signer: &S,
    to: Address,
    amount: impl Into<Quantity>,
) -> Vec<u8> {
    client
        .deposit(signer, to, BaseUnits::native(amount))
        .await
        .unwrap()
}

/// Create a client that talks to a fresh [Emulator] and return both.
pub fn new_emulator_client() -> (Client, Emulator) {
    new_emulator_client_with_config(ClientConfig::default())
}

pub fn new_emulator_client_with_config(config: ClientConfig) -> (Client, Emulator) {
    let emulator = Emulator::new();
    (Client::new_emulator(&emulator, config), emulator)
}

/// Derive a key pair of any scheme from `//{value}`.
pub fn key_pair_from_string<P: CryptoPair>(value: impl AsRef<str>) -> P {
    P::from_string(format!("//{}", value.as_ref()).as_str(), None).unwrap()
}

/// Create a key pair from a random string and give its consensus account enough funds for
/// deposits.
pub fn random_key_pair<P: CryptoPair + Signer>(emulator: &Emulator) -> P {
    let key_pair = key_pair_from_string::<P>(random_alnum_string(8));
    emulator.fund_consensus(address_of(&key_pair), u128::MAX);
    key_pair
}

/// Address of the account that `signer` signs for.
pub fn address_of<S: Signer + ?Sized>(signer: &S) -> Address {
    let spec = SignatureAddressSpec::from_public_key(signer.public_key());
    Address::from_sigspec(&spec).unwrap()
}

/// Secp256k1 address of a random Ethereum address.
pub fn random_address() -> Address {
    Address::from_eth(&rand::thread_rng().gen::<[u8; 20]>())
}

pub fn random_alnum_string(size: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(size)
        .collect::<String>()
}
