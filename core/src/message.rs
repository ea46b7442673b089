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

//! Bodies of the runtime calls that can be submitted.

use parity_scale_codec::{Decode, Encode};

use crate::{Address, BaseUnits, ParseError, Quantity};

/// Move tokens from the consensus layer account of the signer into a runtime account.
///
/// If `to` is `None` the tokens are credited to the runtime account of the signer.
#[derive(Decode, Encode, Clone, Debug, Eq, PartialEq)]
pub struct Deposit {
    pub to: Option<Address>,
    pub amount: BaseUnits,
}

impl Deposit {
    pub const METHOD: &'static str = "consensus.Deposit";

    /// Parse a deposit of native tokens from user input.
    ///
    /// Both values are parsed before anything else happens, so a malformed recipient or amount
    /// never results in a partially built deposit.
    pub fn from_text(to: &str, amount: &str) -> Result<Self, ParseError> {
        let to: Address = to.parse()?;
        let amount: Quantity = amount.parse()?;
        Ok(Deposit {
            to: Some(to),
            amount: BaseUnits::native(amount),
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{AddressError, QuantityError};

    #[test]
    fn from_text_parses_both_values() {
        let deposit = Deposit::from_text(
            "oasis1qpupfu7e2n6pkezeaw0yhj8mcem8anj64ytrayne",
            "1_000",
        )
        .unwrap();
        assert_eq!(deposit.amount, BaseUnits::native(1000u64));
        assert!(deposit.to.is_some());
    }

    #[test]
    fn from_text_rejects_malformed_input() {
        assert!(matches!(
            Deposit::from_text("oasis1qpupfu7e2n6pkezeaw0yhj8mcem8anj64ytrayn", "1"),
            Err(ParseError::Address(AddressError::Bech32(_)))
        ));
        assert_eq!(
            Deposit::from_text("oasis1qpupfu7e2n6pkezeaw0yhj8mcem8anj64ytrayne", "-5"),
            Err(ParseError::Quantity(QuantityError::Negative))
        );
    }
}
