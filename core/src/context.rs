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

use derive_more::{Display, From};
use parity_scale_codec::{Decode, Encode};

/// Prefix of the signature context for runtime transactions.
pub const TX_SIGNATURE_CONTEXT_BASE: &str = "oasis-runtime-sdk/tx: v0";

/// Opaque identifier of a chain and runtime instance as reported by a runtime node.
///
/// Transaction signatures are bound to the chain context so that a signed transaction cannot be
/// replayed on another chain.
#[derive(Decode, Encode, Clone, Debug, Display, From, Eq, PartialEq, Hash)]
pub struct ChainContext(String);

impl ChainContext {
    pub fn new(context: impl Into<String>) -> Self {
        ChainContext(context.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Signature context for transactions submitted to this chain.
    pub fn tx_signature_context(&self) -> Vec<u8> {
        format!("{} for chain {}", TX_SIGNATURE_CONTEXT_BASE, self.0).into_bytes()
    }
}

impl From<&str> for ChainContext {
    fn from(context: &str) -> Self {
        ChainContext::new(context)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn tx_signature_context_includes_chain() {
        let context = ChainContext::new("abcd");
        assert_eq!(
            context.tx_signature_context(),
            b"oasis-runtime-sdk/tx: v0 for chain abcd".to_vec()
        );
        assert_ne!(
            context.tx_signature_context(),
            ChainContext::new("abce").tx_signature_context()
        );
    }
}
