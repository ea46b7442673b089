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

use parity_scale_codec::{Decode, Encode};
use std::fmt;
use std::str::FromStr;

/// Size of a [Namespace] in bytes.
pub const NAMESPACE_SIZE: usize = 32;

/// Identifier of a runtime, written as 64 hex characters.
#[derive(Decode, Encode, Clone, Copy, Default, Eq, PartialEq, Hash)]
pub struct Namespace([u8; NAMESPACE_SIZE]);

#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum NamespaceError {
    #[error("invalid hex encoding")]
    Hex(#[from] hex::FromHexError),

    #[error("runtime identifier must be {} bytes long, got {0}", NAMESPACE_SIZE)]
    WrongLength(usize),
}

impl Namespace {
    pub fn from_raw(raw: [u8; NAMESPACE_SIZE]) -> Self {
        Namespace(raw)
    }

    pub fn as_bytes(&self) -> &[u8; NAMESPACE_SIZE] {
        &self.0
    }
}

impl FromStr for Namespace {
    type Err = NamespaceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = hex::decode(s)?;
        if bytes.len() != NAMESPACE_SIZE {
            return Err(NamespaceError::WrongLength(bytes.len()));
        }
        let mut raw = [0u8; NAMESPACE_SIZE];
        raw.copy_from_slice(&bytes);
        Ok(Namespace(raw))
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl fmt::Debug for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Namespace({})", self)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    const RUNTIME_ID: &str = "8000000000000000000000000000000000000000000000000000000000000000";

    #[test]
    fn parse_display_roundtrip() {
        let namespace: Namespace = RUNTIME_ID.parse().unwrap();
        assert_eq!(namespace.as_bytes()[0], 0x80);
        assert_eq!(namespace.to_string(), RUNTIME_ID);
    }

    #[test]
    fn parse_rejects_malformed_input() {
        assert_eq!(
            "80".parse::<Namespace>(),
            Err(NamespaceError::WrongLength(1))
        );
        assert!(matches!(
            "zz".parse::<Namespace>(),
            Err(NamespaceError::Hex(_))
        ));
    }
}
