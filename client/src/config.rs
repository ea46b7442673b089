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

use std::time::Duration;

use paratime_deposit_core::Gas;

/// Gas limit set on a transaction while its gas use is estimated.
pub const DEFAULT_HIGH_GAS_AMOUNT: Gas = 1_000_000;

/// Time a whole run of operations may take.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// Parameters of a [crate::Client] that depend on the network and runtime it talks to.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ClientConfig {
    /// Gas limit used for the estimation request. It must be high enough for the simulation to
    /// succeed and is never submitted.
    pub high_gas_amount: Gas,
    /// Gas added to every estimate.
    pub extra_gas: Gas,
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig {
            high_gas_amount: DEFAULT_HIGH_GAS_AMOUNT,
            extra_gas: 0,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}
