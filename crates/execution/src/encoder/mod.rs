//! Calldata encoding.
//!
//! The planner never builds calldata by hand; every router, ERC-20 and
//! constructor payload goes through a [`CallEncoder`].

mod abi;
mod abi_encoder;

pub use abi::{ERC20_ABI, ROUTER_ABI};
pub use abi_encoder::EthabiEncoder;

use dexflow_domain::error::Result;
use dexflow_domain::prelude::*;
use std::fmt;

/// A single ABI argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AbiValue {
    Address(Address),
    Uint(TokenAmount),
    AddressArray(Vec<Address>),
    String(String),
    Bool(bool),
}

impl fmt::Display for AbiValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Address(a) => write!(f, "{a}"),
            Self::Uint(v) => write!(f, "{v}"),
            Self::AddressArray(path) => {
                let joined: Vec<String> = path.iter().map(ToString::to_string).collect();
                write!(f, "[{}]", joined.join(", "))
            }
            Self::String(s) => f.write_str(s),
            Self::Bool(b) => write!(f, "{b}"),
        }
    }
}

impl From<Address> for AbiValue {
    fn from(v: Address) -> Self {
        Self::Address(v)
    }
}

impl From<TokenAmount> for AbiValue {
    fn from(v: TokenAmount) -> Self {
        Self::Uint(v)
    }
}

impl From<Vec<Address>> for AbiValue {
    fn from(v: Vec<Address>) -> Self {
        Self::AddressArray(v)
    }
}

/// Encodes contract calls and deployments against a JSON ABI.
///
/// Failures are reported as [`DexError::External`].
pub trait CallEncoder: Send + Sync {
    /// 0x-prefixed calldata for `function(args)`.
    fn encode_call(&self, function: &str, args: &[AbiValue], abi_json: &str) -> Result<String>;

    /// 0x-prefixed creation code: `bytecode` followed by the encoded constructor arguments.
    fn encode_deployment(&self, bytecode: &str, args: &[AbiValue], abi_json: &str)
    -> Result<String>;
}
