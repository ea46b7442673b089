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

//! Define the command line parser and interface.

use std::str::FromStr;
use std::time::Duration;

use lazy_static::lazy_static;
use paratime_deposit_client::*;
use structopt::StructOpt;
use thiserror::Error as ThisError;

/// Recipient of deposits if no `--to` option is given.
pub const DEFAULT_RECIPIENT: &str = "oasis1qpupfu7e2n6pkezeaw0yhj8mcem8anj64ytrayne";

/// Amount deposited to each recipient if no `--amount` option is given.
pub const DEFAULT_AMOUNT: &str = "1_000_000_000_000_000_000";

lazy_static! {
    static ref RUNTIME_ID_DEFAULT: String = {
        let mut runtime_id = [0u8; 32];
        runtime_id[0] = 0x80;
        Namespace::from_raw(runtime_id).to_string()
    };
    static ref HIGH_GAS_DEFAULT: String = DEFAULT_HIGH_GAS_AMOUNT.to_string();
    static ref TIMEOUT_DEFAULT: String = DEFAULT_TIMEOUT.as_secs().to_string();
}

/// The type that captures the command line.
///
/// Deposits `--amount` base units of the native token from the consensus account of the signer
/// into the runtime account of every `--to` address.
#[derive(StructOpt, Clone, Debug)]
#[structopt(name = "paratime-deposit", max_term_width = 80)]
pub struct CommandLine {
    #[structopt(flatten)]
    pub deposit_options: DepositOptions,

    #[structopt(flatten)]
    pub network_options: NetworkOptions,

    #[structopt(flatten)]
    pub tx_options: TxOptions,
}

/// What to deposit and where to.
#[derive(StructOpt, Clone, Debug)]
pub struct DepositOptions {
    /// Amount of base units to deposit to each recipient. `_` may be used as separator.
    #[structopt(long, default_value = DEFAULT_AMOUNT, value_name = "amount")]
    pub amount: String,

    /// Address of a recipient runtime account. May be given more than once.
    #[structopt(
        long,
        default_value = DEFAULT_RECIPIENT,
        number_of_values = 1,
        value_name = "address"
    )]
    pub to: Vec<String>,
}

/// Network-related command-line options
#[derive(StructOpt, Clone, Debug)]
pub struct NetworkOptions {
    /// WebSocket URL of the runtime node
    #[structopt(
        long,
        env = "PARATIME_NODE_URL",
        value_name = "url",
        parse(try_from_str = url::Url::parse),
    )]
    pub node_url: url::Url,

    /// Hex encoded ID of the runtime to deposit into
    #[structopt(long, default_value = &RUNTIME_ID_DEFAULT, value_name = "id")]
    pub runtime_id: Namespace,

    /// Seconds all deposits together may take
    #[structopt(long, default_value = &TIMEOUT_DEFAULT, value_name = "seconds")]
    pub timeout: u64,
}

/// Transaction-related command-line options
#[derive(StructOpt, Clone, Debug)]
pub struct TxOptions {
    /// Secret URI of the key that signs the deposits.
    #[structopt(long, default_value = "//Alice", value_name = "seed")]
    pub signer: String,

    /// Signature scheme of the signer key. One of `ed25519`, `secp256k1` and `sr25519`.
    #[structopt(long, default_value = "ed25519", value_name = "scheme")]
    pub scheme: KeyScheme,

    /// Gas added to the estimated gas of every transaction.
    #[structopt(long, default_value = "0", value_name = "gas")]
    pub extra_gas: Gas,

    /// Gas limit used while estimating gas.
    #[structopt(long, default_value = &HIGH_GAS_DEFAULT, value_name = "gas")]
    pub high_gas: Gas,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, derive_more::Display)]
pub enum KeyScheme {
    #[display(fmt = "ed25519")]
    Ed25519,
    #[display(fmt = "secp256k1")]
    Secp256k1,
    #[display(fmt = "sr25519")]
    Sr25519,
}

impl FromStr for KeyScheme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ed25519" => Ok(KeyScheme::Ed25519),
            "secp256k1" => Ok(KeyScheme::Secp256k1),
            "sr25519" => Ok(KeyScheme::Sr25519),
            _ => Err(format!("unknown key scheme {}", s)),
        }
    }
}

impl TxOptions {
    /// Key pair derived from [TxOptions::signer] for [TxOptions::scheme].
    pub fn signer(&self) -> Result<Box<dyn Signer>, CommandError> {
        match self.scheme {
            KeyScheme::Ed25519 => key_pair::<ed25519::Pair>(&self.signer),
            KeyScheme::Secp256k1 => key_pair::<ecdsa::Pair>(&self.signer),
            KeyScheme::Sr25519 => key_pair::<sr25519::Pair>(&self.signer),
        }
    }
}

fn key_pair<P>(seed: &str) -> Result<Box<dyn Signer>, CommandError>
where
    P: CryptoPair + Signer + 'static,
{
    let key_pair = P::from_string(seed, None)
        .map_err(|err| CommandError::InvalidSeed(format!("{:?}", err)))?;
    Ok(Box::new(key_pair))
}

impl CommandLine {
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            high_gas_amount: self.tx_options.high_gas,
            extra_gas: self.tx_options.extra_gas,
            timeout: Duration::from_secs(self.network_options.timeout),
        }
    }

    /// Parse the deposits, connect to the node and run them.
    pub async fn run(self) -> Result<(), CommandError> {
        let (deposits, signer, deadline) = self.prepare()?;
        let client = Client::create_before(
            &deadline,
            &self.network_options.node_url,
            self.network_options.runtime_id,
            self.client_config(),
        )
        .await?;
        run_deposits(&client, &deadline, &signer, deposits).await
    }

    /// Same as [CommandLine::run] but with a client that is already connected.
    pub async fn run_with_client(&self, client: &Client) -> Result<(), CommandError> {
        let (deposits, signer, deadline) = self.prepare()?;
        run_deposits(client, &deadline, &signer, deposits).await
    }

    /// Parse all input and start the deadline. Nothing is sent before this succeeds.
    #[allow(clippy::type_complexity)]
    fn prepare(
        &self,
    ) -> Result<(Vec<(Address, BaseUnits)>, Box<dyn Signer>, Deadline), CommandError> {
        let deposits = self.deposits()?;
        let signer = self.tx_options.signer()?;
        let deadline = Deadline::after(self.client_config().timeout);
        Ok((deposits, signer, deadline))
    }

    /// Recipients and amounts given on the command line.
    pub fn deposits(&self) -> Result<Vec<(Address, BaseUnits)>, CommandError> {
        let pairs = self
            .deposit_options
            .to
            .iter()
            .map(|to| (to.as_str(), self.deposit_options.amount.as_str()))
            .collect::<Vec<_>>();
        Ok(parse_deposits(&pairs)?)
    }
}

/// Submit `deposits` one after the other and print a line for each.
pub async fn run_deposits<S: Signer + ?Sized>(
    client: &Client,
    deadline: &Deadline,
    signer: &S,
    deposits: Vec<(Address, BaseUnits)>,
) -> Result<(), CommandError> {
    for (to, amount) in deposits {
        client
            .deposit_before(deadline, signer, to, amount.clone())
            .await?;
        println!("Deposited {} to {}", amount, to);
    }
    println!("Done.");
    Ok(())
}

/// Error returned by [CommandLine::run].
#[derive(Debug, ThisError)]
pub enum CommandError {
    #[error("client error")]
    ClientError(#[from] Error),

    #[error("invalid signer seed: {0}")]
    InvalidSeed(String),
}
