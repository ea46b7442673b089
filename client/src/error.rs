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

use paratime_deposit_core::{Address, ParseError, RuntimeError, SignerError};

/// Error returned by a [crate::backend::Backend] request.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    /// Error from the underlying RPC connection
    #[error("RPC request failed: {0}")]
    Rpc(String),

    /// The node answered with data that cannot be decoded
    #[error("failed to decode the node response")]
    Json(#[from] serde_json::Error),

    /// Decoding SCALE encoded data failed
    #[error("failed to decode SCALE data")]
    Codec(#[from] parity_scale_codec::Error),

    /// The node rejected the request
    #[error("rejected by the runtime: {0}")]
    Rejected(#[from] RuntimeError),

    /// The deadline of the operation passed before the node answered
    #[error("request timed out")]
    Timeout,

    /// Other error
    #[error("{0}")]
    Other(String),
}

impl From<String> for BackendError {
    fn from(error: String) -> Self {
        BackendError::Other(error)
    }
}

impl From<&str> for BackendError {
    fn from(error: &str) -> Self {
        BackendError::Other(error.into())
    }
}

/// Error returned by the [crate::Client] methods.
///
/// Every variant names the step of the transaction lifecycle that failed. Use [Error::kind] to
/// decide how to react.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Connecting to the runtime node failed
    #[error("failed to connect to the runtime node")]
    Connect(#[source] BackendError),

    /// Fetching the chain context failed
    #[error("failed to fetch the chain context")]
    ChainContext(#[source] BackendError),

    /// Fetching the nonce of the signer account failed
    #[error("failed to fetch the nonce of account {address}")]
    Nonce {
        address: Address,
        #[source]
        source: BackendError,
    },

    /// The signer failed to produce a signature
    #[error("failed to sign the transaction")]
    Signing(#[from] SignerError),

    /// The node did not accept the signed transaction
    #[error("failed to submit the transaction")]
    Submission(#[source] BackendError),

    /// User input is invalid
    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// Classification of [Error]s by how a caller should react to them.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorKind {
    /// The node could not be reached or did not answer. The operation may be retried.
    Connectivity,
    /// Input is invalid. Nothing was sent.
    Parse,
    /// No signature could be produced. Retrying does not help.
    Signing,
    /// The node rejected the transaction or its submission failed.
    Submission,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Connect(_) | Error::ChainContext(_) | Error::Nonce { .. } => {
                ErrorKind::Connectivity
            }
            Error::Signing(_) => ErrorKind::Signing,
            Error::Submission(_) => ErrorKind::Submission,
            Error::Parse(_) => ErrorKind::Parse,
        }
    }

    /// Returns `true` if running the operation again with freshly fetched state may succeed
    /// without applying the transaction twice.
    ///
    /// Failures before submission are retryable, as are submissions the runtime rejected for a
    /// stale nonce. A submission that failed in transport or timed out may have reached the node,
    /// and a retry would sign a new transaction with the next nonce, so it is not retryable.
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Submission(BackendError::Rejected(RuntimeError::InvalidNonce)) => true,
            _ => self.kind() == ErrorKind::Connectivity,
        }
    }

    /// Reason given by the runtime if the node rejected the transaction.
    pub fn runtime_error(&self) -> Option<&RuntimeError> {
        match self {
            Error::Submission(BackendError::Rejected(error)) => Some(error),
            _ => None,
        }
    }
}
