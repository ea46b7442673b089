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

//! Provides [TransactionBuilder] to assemble draft transactions.
//!
//! The builder only sets the call and the fee. Signers, the nonce and the gas limit are filled in
//! by [crate::Client::sign_and_submit_transaction].

pub use paratime_deposit_core::transaction::*;
use paratime_deposit_core::{Address, BaseUnits, Gas};

use crate::message::{Deposit, Message};

#[derive(Clone, Debug)]
pub struct TransactionBuilder {
    tx: Transaction,
}

impl TransactionBuilder {
    pub fn new<M: Message>(message: M) -> Self {
        TransactionBuilder {
            tx: message.into_transaction(),
        }
    }

    /// Set the gas limit. Estimation during submission starts from this value.
    pub fn set_fee_gas(&mut self, gas: Gas) -> &mut Self {
        self.tx.auth_info.fee.gas = gas;
        self
    }

    pub fn set_fee_amount(&mut self, amount: BaseUnits) -> &mut Self {
        self.tx.auth_info.fee.amount = amount;
        self
    }

    pub fn set_fee_consensus_messages(&mut self, consensus_messages: u32) -> &mut Self {
        self.tx.auth_info.fee.consensus_messages = consensus_messages;
        self
    }

    pub fn transaction(&self) -> &Transaction {
        &self.tx
    }

    pub fn into_transaction(self) -> Transaction {
        self.tx
    }
}

/// Builder for a transaction that deposits `amount` into the runtime account `to`.
///
/// If `to` is `None` the signer's own runtime account is credited.
pub fn deposit(to: Option<Address>, amount: BaseUnits) -> TransactionBuilder {
    TransactionBuilder::new(Deposit { to, amount })
}

#[cfg(test)]
mod test {
    use super::*;
    use paratime_deposit_core::Denomination;
    use parity_scale_codec::DecodeAll as _;

    #[test]
    fn deposit_builder() {
        let to = Address::from_eth(&[3u8; 20]);
        let mut builder = deposit(Some(to), BaseUnits::native(1_000u64));
        builder
            .set_fee_gas(42)
            .set_fee_amount(BaseUnits::new(5u64.into(), Denomination::new("FEE")));
        let tx = builder.into_transaction();

        assert_eq!(tx.call.method, "consensus.Deposit");
        let body = Deposit::decode_all(&mut &tx.call.body[..]).unwrap();
        assert_eq!(body.to, Some(to));
        assert_eq!(body.amount, BaseUnits::native(1_000u64));
        assert_eq!(tx.auth_info.fee.gas, 42);
        assert_eq!(tx.auth_info.fee.consensus_messages, 1);
        assert_eq!(
            tx.auth_info.fee.amount,
            BaseUnits::new(5u64.into(), Denomination::new("FEE"))
        );
        assert!(tx.auth_info.signer_info.is_empty());
    }
}
