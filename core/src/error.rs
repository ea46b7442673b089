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

use std::fmt;

use crate::{AddressError, NamespaceError, QuantityError};

/// Error for any user supplied value that fails to parse.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum ParseError {
    #[error("invalid address")]
    Address(#[from] AddressError),

    #[error("invalid amount")]
    Quantity(#[from] QuantityError),

    #[error("invalid runtime identifier")]
    Namespace(#[from] NamespaceError),
}

pub const CORE_MODULE: &str = "core";

pub const ACCOUNTS_MODULE: &str = "accounts";

#[derive(Clone, Debug, Eq, PartialEq)]
/// Reasons a runtime node gives for rejecting a transaction.
///
/// Every reason is identified by the runtime module that raised it and a module specific code.
pub enum RuntimeError {
    MalformedTransaction,
    InvalidSignature,
    InvalidMethod,
    InvalidNonce,
    OutOfMessageSlots,
    OutOfGas,
    InsufficientBalance,
    /// Any reason without a dedicated variant.
    Module {
        module: String,
        code: u32,
        message: String,
    },
}

impl RuntimeError {
    pub fn from_module_code(module: &str, code: u32, message: impl Into<String>) -> Self {
        match (module, code) {
            (CORE_MODULE, 1) => RuntimeError::MalformedTransaction,
            (CORE_MODULE, 2) => RuntimeError::InvalidSignature,
            (CORE_MODULE, 3) => RuntimeError::InvalidMethod,
            (CORE_MODULE, 4) => RuntimeError::InvalidNonce,
            (CORE_MODULE, 6) => RuntimeError::OutOfMessageSlots,
            (CORE_MODULE, 12) => RuntimeError::OutOfGas,
            (ACCOUNTS_MODULE, 2) => RuntimeError::InsufficientBalance,
            _ => RuntimeError::Module {
                module: module.to_string(),
                code,
                message: message.into(),
            },
        }
    }

    pub fn module(&self) -> &str {
        match self {
            RuntimeError::InsufficientBalance => ACCOUNTS_MODULE,
            RuntimeError::Module { module, .. } => module,
            _ => CORE_MODULE,
        }
    }

    pub fn code(&self) -> u32 {
        match self {
            RuntimeError::MalformedTransaction => 1,
            RuntimeError::InvalidSignature => 2,
            RuntimeError::InvalidMethod => 3,
            RuntimeError::InvalidNonce => 4,
            RuntimeError::OutOfMessageSlots => 6,
            RuntimeError::OutOfGas => 12,
            RuntimeError::InsufficientBalance => 2,
            RuntimeError::Module { code, .. } => *code,
        }
    }
}

impl fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let message = match self {
            RuntimeError::MalformedTransaction => "The transaction is malformed.",
            RuntimeError::InvalidSignature => "A transaction signature is invalid.",
            RuntimeError::InvalidMethod => "The called method does not exist.",
            RuntimeError::InvalidNonce => "The transaction nonce does not match the account nonce.",
            RuntimeError::OutOfMessageSlots => {
                "The transaction emits more consensus messages than its fee covers."
            }
            RuntimeError::OutOfGas => "The transaction ran out of gas.",
            RuntimeError::InsufficientBalance => "The account balance is insufficient.",
            RuntimeError::Module { message, .. } => message,
        };
        write!(f, "{} ({} error {})", message, self.module(), self.code())
    }
}

impl std::error::Error for RuntimeError {}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn module_code_roundtrip() {
        for error in &[
            RuntimeError::MalformedTransaction,
            RuntimeError::InvalidSignature,
            RuntimeError::InvalidMethod,
            RuntimeError::InvalidNonce,
            RuntimeError::OutOfMessageSlots,
            RuntimeError::OutOfGas,
            RuntimeError::InsufficientBalance,
        ] {
            assert_eq!(
                &RuntimeError::from_module_code(error.module(), error.code(), ""),
                error
            );
        }
    }

    #[test]
    fn unknown_codes_are_kept() {
        let error = RuntimeError::from_module_code("evm", 7, "reverted");
        assert_eq!(error.module(), "evm");
        assert_eq!(error.code(), 7);
        assert_eq!(error.to_string(), "reverted (evm error 7)");
    }
}
