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

//! Defines [Message] trait and implementations for all messages in
//! `paratime_deposit_core::message`.

pub use paratime_deposit_core::message::*;
use paratime_deposit_core::Transaction;
use parity_scale_codec::Encode;

/// Trait implemented for every runtime call body that can be submitted.
pub trait Message: Encode + Sized + Send + 'static {
    /// Name of the runtime method that handles the message.
    const METHOD: &'static str;

    /// Number of consensus layer messages the call emits when it is executed.
    fn consensus_messages(&self) -> u32 {
        0
    }

    /// Build a draft transaction calling [Message::METHOD] with the message as body.
    ///
    /// The fee reserves [Message::consensus_messages] message slots. Gas and signers are not set.
    fn into_transaction(self) -> Transaction {
        let consensus_messages = self.consensus_messages();
        let mut tx = Transaction::new(Self::METHOD, self);
        tx.auth_info.fee.consensus_messages = consensus_messages;
        tx
    }
}

impl Message for Deposit {
    const METHOD: &'static str = Deposit::METHOD;

    fn consensus_messages(&self) -> u32 {
        1
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use paratime_deposit_core::{Address, BaseUnits};

    #[test]
    fn deposit_reserves_one_message_slot() {
        let deposit = Deposit {
            to: Some(Address::from_eth(&[7u8; 20])),
            amount: BaseUnits::native(1u64),
        };
        let tx = deposit.clone().into_transaction();

        assert_eq!(tx.call.method, Deposit::METHOD);
        assert_eq!(tx.call.body, deposit.encode());
        assert_eq!(tx.auth_info.fee.consensus_messages, 1);
        assert_eq!(tx.auth_info.fee.gas, 0);
        assert!(tx.auth_info.signer_info.is_empty());
    }
}
