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

//! Test the deposit lifecycle against the emulator.

use paratime_deposit_client::backend::{gas_cost, Method, Request};
use paratime_deposit_client::*;
use paratime_deposit_test_utils::*;

const DEFAULT_RECIPIENT: &str = "oasis1qpupfu7e2n6pkezeaw0yhj8mcem8anj64ytrayne";

fn funded_alice(emulator: &Emulator) -> ed25519::Pair {
    let alice = key_pair_from_string::<ed25519::Pair>("Alice");
    emulator.fund_consensus(address_of(&alice), u128::MAX);
    alice
}

#[async_std::test]
async fn deposit_with_fetched_nonce() {
    let _ = env_logger::try_init();
    let (client, emulator) = new_emulator_client();
    let alice = funded_alice(&emulator);
    emulator.set_nonce(address_of(&alice), 5);
    let to: Address = DEFAULT_RECIPIENT.parse().unwrap();

    let result = deposit_ok(&client, &alice, to, 1_000_000_000_000_000_000u64).await;

    assert!(result.is_empty());
    let submitted = emulator.submitted();
    assert_eq!(submitted.len(), 1);
    let signer_info = &submitted[0].auth_info.signer_info;
    assert_eq!(signer_info.len(), 1);
    assert_eq!(signer_info[0].nonce, 5);
    assert_eq!(
        signer_info[0].address_spec,
        SignatureAddressSpec::from_public_key(alice.public_key())
    );
    assert_eq!(emulator.nonce_of(&address_of(&alice)), 6);
    assert_eq!(
        emulator.runtime_balance(&to),
        Quantity::from(1_000_000_000_000_000_000u64)
    );
}

#[async_std::test]
async fn lifecycle_request_order() {
    let _ = env_logger::try_init();
    let (client, emulator) = new_emulator_client();
    let alice = funded_alice(&emulator);

    deposit_ok(&client, &alice, random_address(), 10u64).await;

    assert_eq!(
        emulator.methods(),
        vec![
            Method::GetInfo,
            Method::Nonce,
            Method::EstimateGas,
            Method::SubmitTx
        ]
    );
    assert_eq!(
        emulator.requests()[1],
        Request::Nonce(address_of(&alice))
    );
}

#[async_std::test]
async fn separator_amount_equals_integer_amount() {
    let _ = env_logger::try_init();
    let (client, emulator) = new_emulator_client();
    let alice = funded_alice(&emulator);

    let deposits = parse_deposits(&[(DEFAULT_RECIPIENT, "1_000_000_000_000_000_000")]).unwrap();
    client.deposit_all(&alice, &deposits).await.unwrap();

    let to: Address = DEFAULT_RECIPIENT.parse().unwrap();
    assert_eq!(
        emulator.runtime_balance(&to),
        Quantity::from(1000000000000000000u64)
    );
}

#[async_std::test]
async fn sequential_deposits_refetch_nonce() {
    let _ = env_logger::try_init();
    let (client, emulator) = new_emulator_client();
    let alice = funded_alice(&emulator);
    emulator.set_nonce(address_of(&alice), 5);

    deposit_ok(&client, &alice, random_address(), 1u64).await;
    deposit_ok(&client, &alice, random_address(), 1u64).await;

    let nonces = emulator
        .submitted()
        .iter()
        .map(|tx| tx.auth_info.signer_info[0].nonce)
        .collect::<Vec<_>>();
    assert_eq!(nonces, vec![5, 6]);
    let nonce_requests = emulator
        .methods()
        .into_iter()
        .filter(|method| *method == Method::Nonce)
        .count();
    assert_eq!(nonce_requests, 2);
}

#[async_std::test]
async fn deposit_all_credits_every_recipient() {
    let _ = env_logger::try_init();
    let (client, emulator) = new_emulator_client();
    let alice = funded_alice(&emulator);
    let first = random_address();
    let second = random_address();

    let results = client
        .deposit_all(
            &alice,
            &[
                (first, BaseUnits::native(100u64)),
                (second, BaseUnits::native(200u64)),
            ],
        )
        .await
        .unwrap();

    assert_eq!(results.len(), 2);
    assert_eq!(emulator.runtime_balance(&first), Quantity::from(100u64));
    assert_eq!(emulator.runtime_balance(&second), Quantity::from(200u64));
    assert_eq!(emulator.nonce_of(&address_of(&alice)), 2);
}

#[async_std::test]
async fn deposit_all_stops_at_first_failure() {
    let _ = env_logger::try_init();
    let (client, emulator) = new_emulator_client();
    let alice = key_pair_from_string::<ed25519::Pair>("Alice");
    emulator.fund_consensus(address_of(&alice), 10u64);
    let deposits = [
        (random_address(), BaseUnits::native(10u64)),
        (random_address(), BaseUnits::native(10u64)),
        (random_address(), BaseUnits::native(10u64)),
    ];

    let error = client.deposit_all(&alice, &deposits).await.unwrap_err();

    assert_eq!(
        error.runtime_error(),
        Some(&RuntimeError::InsufficientBalance)
    );
    assert_eq!(emulator.submitted().len(), 2);
    assert_eq!(emulator.runtime_balance(&deposits[0].0), Quantity::from(10u64));
    assert!(emulator.runtime_balance(&deposits[1].0).is_zero());
}

#[async_std::test]
async fn every_scheme_is_accepted() {
    let _ = env_logger::try_init();
    let (client, emulator) = new_emulator_client();
    let to = random_address();

    let ed25519_signer = random_key_pair::<ed25519::Pair>(&emulator);
    let secp256k1_signer = random_key_pair::<ecdsa::Pair>(&emulator);
    let sr25519_signer = random_key_pair::<sr25519::Pair>(&emulator);
    deposit_ok(&client, &ed25519_signer, to, 1u64).await;
    deposit_ok(&client, &secp256k1_signer, to, 1u64).await;
    deposit_ok(&client, &sr25519_signer, to, 1u64).await;

    assert_eq!(emulator.runtime_balance(&to), Quantity::from(3u64));
}

#[async_std::test]
async fn boxed_signer() {
    let _ = env_logger::try_init();
    let (client, emulator) = new_emulator_client();
    let signer: Box<dyn Signer> = Box::new(random_key_pair::<sr25519::Pair>(&emulator));

    deposit_ok(&client, &signer, random_address(), 1u64).await;

    assert_eq!(emulator.nonce_of(&address_of(&signer)), 1);
}

#[async_std::test]
async fn submitted_gas_is_estimate_plus_extra() {
    let _ = env_logger::try_init();
    let config = ClientConfig {
        extra_gas: 500,
        ..ClientConfig::default()
    };
    let (client, emulator) = new_emulator_client_with_config(config);
    let alice = funded_alice(&emulator);

    deposit_ok(&client, &alice, random_address(), 1u64).await;

    let estimated = match &emulator.requests()[2] {
        Request::EstimateGas(tx) => tx.clone(),
        other => panic!("unexpected request {:?}", other),
    };
    assert_eq!(estimated.auth_info.fee.gas, DEFAULT_HIGH_GAS_AMOUNT);
    assert_eq!(estimated.auth_info.signer_info.len(), 1);

    let submitted = &emulator.submitted()[0];
    assert_eq!(submitted.auth_info.fee.gas, gas_cost(submitted) + 500);
    assert_ne!(submitted.auth_info.fee.gas, DEFAULT_HIGH_GAS_AMOUNT);
}

#[async_std::test]
async fn deposit_to_own_account() {
    let _ = env_logger::try_init();
    let (client, emulator) = new_emulator_client();
    let alice = funded_alice(&emulator);
    let tx = transaction::deposit(None, BaseUnits::native(7u64)).into_transaction();

    client
        .sign_and_submit_transaction(&alice, tx, 0)
        .await
        .unwrap();

    assert_eq!(
        emulator.runtime_balance(&address_of(&alice)),
        Quantity::from(7u64)
    );
}
