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

//! Estimate the gas a transaction uses.

use paratime_deposit_core::{Gas, Transaction};

use crate::backend::{Backend, Round};
use crate::deadline::Deadline;

/// Set the gas limit of `tx` to the gas it uses plus `extra_gas`.
///
/// The estimate is requested with the gas limit set to `high_gas_amount`. If the request fails
/// for any reason the gas limit becomes the limit `tx` had before plus `extra_gas`. Returns the
/// new gas limit.
pub async fn estimate_gas(
    backend: &(dyn Backend + Send + Sync),
    deadline: &Deadline,
    tx: &mut Transaction,
    high_gas_amount: Gas,
    extra_gas: Gas,
) -> Gas {
    let original_gas = tx.auth_info.fee.gas;
    tx.auth_info.fee.gas = high_gas_amount;
    let gas = match deadline
        .run(backend.estimate_gas(Round::Latest, tx))
        .await
    {
        Ok(estimate) => {
            log::debug!("estimated gas {}", estimate);
            estimate.saturating_add(extra_gas)
        }
        Err(err) => {
            log::warn!(
                "gas estimation failed, using gas limit {}: {}",
                original_gas,
                err
            );
            original_gas.saturating_add(extra_gas)
        }
    };
    tx.auth_info.fee.gas = gas;
    gas
}
