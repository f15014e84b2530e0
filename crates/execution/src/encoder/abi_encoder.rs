use super::{AbiValue, CallEncoder};
use dexflow_domain::error::Result;
use dexflow_domain::prelude::*;
use ethabi::{Contract, Token};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// [`CallEncoder`] backed by `ethabi`.
///
/// Parsed ABIs are cached by their full text, so repeated calls against the
/// bundled router and ERC-20 ABIs parse each document once.
#[derive(Debug, Default)]
pub struct EthabiEncoder {
    contracts: RwLock<HashMap<Arc<str>, Arc<Contract>>>,
}

impl EthabiEncoder {
    /// Creates an encoder with an empty ABI cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of distinct ABIs parsed so far.
    pub fn cached_abis(&self) -> usize {
        self.contracts.read().len()
    }

    fn contract(&self, abi_json: &str) -> Result<Arc<Contract>> {
        if let Some(contract) = self.contracts.read().get(abi_json) {
            return Ok(Arc::clone(contract));
        }

        let contract = Contract::load(abi_json.as_bytes())
            .map_err(|e| DexError::external(format!("invalid contract ABI: {e}")))?;
        debug!(
            functions = contract.functions.len(),
            "Parsed contract ABI"
        );
        let contract = Arc::new(contract);
        self.contracts
            .write()
            .insert(Arc::from(abi_json), Arc::clone(&contract));
        Ok(contract)
    }
}

impl CallEncoder for EthabiEncoder {
    fn encode_call(&self, function: &str, args: &[AbiValue], abi_json: &str) -> Result<String> {
        let contract = self.contract(abi_json)?;
        let function = contract
            .function(function)
            .map_err(|e| DexError::external(format!("ABI has no function '{function}': {e}")))?;
        let tokens = to_tokens(args)?;
        let data = function.encode_input(&tokens).map_err(|e| {
            DexError::external(format!("failed to encode {}: {e}", function.name))
        })?;
        Ok(format!("0x{}", hex::encode(data)))
    }

    fn encode_deployment(
        &self,
        bytecode: &str,
        args: &[AbiValue],
        abi_json: &str,
    ) -> Result<String> {
        let digits = bytecode.trim().trim_start_matches("0x");
        let code = hex::decode(digits)
            .map_err(|e| DexError::external(format!("contract bytecode is not hex: {e}")))?;
        if code.is_empty() {
            return Err(DexError::external("contract bytecode is empty"));
        }

        let contract = self.contract(abi_json)?;
        let data = match contract.constructor() {
            Some(constructor) => {
                let tokens = to_tokens(args)?;
                constructor.encode_input(code, &tokens).map_err(|e| {
                    DexError::external(format!("failed to encode constructor: {e}"))
                })?
            }
            None if args.is_empty() => code,
            None => {
                return Err(DexError::external(format!(
                    "ABI has no constructor but {} arguments were given",
                    args.len()
                )));
            }
        };
        Ok(format!("0x{}", hex::encode(data)))
    }
}

fn to_tokens(args: &[AbiValue]) -> Result<Vec<Token>> {
    args.iter().map(to_token).collect()
}

fn to_token(value: &AbiValue) -> Result<Token> {
    Ok(match value {
        AbiValue::Address(a) => Token::Address(to_eth_address(*a)),
        AbiValue::Uint(amount) => Token::Uint(to_eth_uint(*amount)?),
        AbiValue::AddressArray(path) => Token::Array(
            path.iter()
                .map(|a| Token::Address(to_eth_address(*a)))
                .collect(),
        ),
        AbiValue::String(s) => Token::String(s.clone()),
        AbiValue::Bool(b) => Token::Bool(*b),
    })
}

fn to_eth_address(address: Address) -> ethabi::Address {
    ethabi::Address::from_slice(address.as_bytes())
}

// ethabi pins its own primitive-types release, so amounts cross over as decimal strings.
fn to_eth_uint(amount: TokenAmount) -> Result<ethabi::Uint> {
    ethabi::Uint::from_dec_str(&amount.to_string())
        .map_err(|e| DexError::external(format!("amount {amount} is not encodable: {e:?}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoder::{ERC20_ABI, ROUTER_ABI};

    fn addr(byte: u8) -> Address {
        Address::from_bytes([byte; 20])
    }

    #[test]
    fn test_encode_approve() {
        let encoder = EthabiEncoder::new();
        let data = encoder
            .encode_call(
                "approve",
                &[addr(0xaa).into(), TokenAmount::from(1u64).into()],
                ERC20_ABI,
            )
            .unwrap();

        assert!(data.starts_with("0x095ea7b3"));
        // selector + two 32-byte words
        assert_eq!(data.len(), 2 + 8 + 128);
        assert!(data.ends_with(&format!("{:0>64}", "1")));
        assert!(data.contains(&"aa".repeat(20)));
    }

    #[test]
    fn test_router_selectors() {
        let encoder = EthabiEncoder::new();
        let path = vec![addr(1), addr(2)];
        let amount = TokenAmount::from(1_000u64);
        let deadline = TokenAmount::from(1_700_000_600u64);

        let swap_native = encoder
            .encode_call(
                "swapExactETHForTokens",
                &[
                    amount.into(),
                    path.clone().into(),
                    addr(3).into(),
                    deadline.into(),
                ],
                ROUTER_ABI,
            )
            .unwrap();
        assert!(swap_native.starts_with("0x7ff36ab5"));

        let swap_tokens = encoder
            .encode_call(
                "swapExactTokensForTokens",
                &[
                    amount.into(),
                    amount.into(),
                    path.into(),
                    addr(3).into(),
                    deadline.into(),
                ],
                ROUTER_ABI,
            )
            .unwrap();
        assert!(swap_tokens.starts_with("0x38ed1739"));
        assert_eq!(encoder.cached_abis(), 1);
    }

    #[test]
    fn test_cache_keeps_each_abi_apart() {
        let encoder = EthabiEncoder::new();
        let approve = [addr(0xaa).into(), TokenAmount::from(1u64).into()];

        encoder.encode_call("approve", &approve, ERC20_ABI).unwrap();
        encoder.encode_call("approve", &approve, ERC20_ABI).unwrap();
        assert_eq!(encoder.cached_abis(), 1);

        // a second document never resolves against the first one's functions
        let err = encoder
            .encode_call("approve", &approve, ROUTER_ABI)
            .unwrap_err();
        assert!(matches!(err, DexError::External(_)));
        assert_eq!(encoder.cached_abis(), 2);

        let same_text = String::from(ERC20_ABI);
        encoder.encode_call("approve", &approve, &same_text).unwrap();
        assert_eq!(encoder.cached_abis(), 2);
    }

    #[test]
    fn test_unknown_function_and_bad_arity_are_external() {
        let encoder = EthabiEncoder::new();
        let err = encoder
            .encode_call("transferFrom", &[], ERC20_ABI)
            .unwrap_err();
        assert!(matches!(err, DexError::External(_)));

        let err = encoder
            .encode_call("approve", &[addr(1).into()], ERC20_ABI)
            .unwrap_err();
        assert!(matches!(err, DexError::External(_)));

        let err = encoder.encode_call("approve", &[], "not json").unwrap_err();
        assert!(matches!(err, DexError::External(_)));
    }

    #[test]
    fn test_encode_deployment_appends_constructor_args() {
        let abi = r#"[{"type":"constructor","stateMutability":"nonpayable","inputs":[{"name":"feeToSetter","type":"address"}]}]"#;
        let encoder = EthabiEncoder::new();
        let data = encoder
            .encode_deployment("0x6080", &[addr(0x11).into()], abi)
            .unwrap();
        assert_eq!(data, format!("0x6080{:0>64}", "11".repeat(20)));

        let err = encoder.encode_deployment("0xzz", &[], abi).unwrap_err();
        assert!(matches!(err, DexError::External(_)));
    }

    #[test]
    fn test_encode_deployment_without_constructor() {
        let encoder = EthabiEncoder::new();
        assert_eq!(
            encoder.encode_deployment("6080", &[], "[]").unwrap(),
            "0x6080"
        );
        assert!(
            encoder
                .encode_deployment("6080", &[addr(1).into()], "[]")
                .is_err()
        );
    }
}
