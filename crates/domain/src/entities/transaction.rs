use crate::enums::TransactionType;
use crate::error::{DexError, Result};
use crate::token::TokenAmount;
use crate::value_objects::Address;
use crate::value_objects::address::blank_as_none;
use serde::{Deserialize, Serialize};

/// Named argument kept alongside a step for audit display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawArgument {
    pub name: String,
    pub value: String,
}

impl RawArgument {
    pub fn new(name: impl Into<String>, value: impl ToString) -> Self {
        Self {
            name: name.into(),
            value: value.to_string(),
        }
    }
}

/// One prepared, unsigned transaction.
///
/// Steps are immutable once built; the signing front end reads them as
/// `{title, description, receiver, value, data, transactionType}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "StepRecord")]
pub struct TransactionStep {
    title: String,
    description: String,
    #[serde(with = "blank_as_none")]
    receiver: Option<Address>,
    value: TokenAmount,
    data: String,
    transaction_type: TransactionType,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    raw_args: Vec<RawArgument>,
}

/// Wire shape of a step; decoding goes through the same checks as construction.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StepRecord {
    title: String,
    description: String,
    #[serde(with = "blank_as_none")]
    receiver: Option<Address>,
    value: TokenAmount,
    data: String,
    transaction_type: TransactionType,
    #[serde(default)]
    raw_args: Vec<RawArgument>,
}

impl TryFrom<StepRecord> for TransactionStep {
    type Error = DexError;

    fn try_from(record: StepRecord) -> Result<Self> {
        match record.receiver {
            Some(receiver) => Self::call(
                record.title,
                record.description,
                receiver,
                record.value,
                record.data,
                record.transaction_type,
                record.raw_args,
            ),
            None if !record.value.is_zero() => Err(DexError::validation(
                "contract-creation steps carry no native value",
            )),
            None => Self::deployment(
                record.title,
                record.description,
                record.data,
                record.transaction_type,
                record.raw_args,
            ),
        }
    }
}

impl TransactionStep {
    /// A call to an existing contract.
    pub fn call(
        title: impl Into<String>,
        description: impl Into<String>,
        receiver: Address,
        value: TokenAmount,
        data: impl Into<String>,
        transaction_type: TransactionType,
        raw_args: Vec<RawArgument>,
    ) -> Result<Self> {
        if transaction_type.is_deployment() {
            return Err(DexError::validation(format!(
                "{transaction_type} steps create contracts and cannot have a receiver"
            )));
        }
        Self::build(
            title.into(),
            description.into(),
            Some(receiver),
            value,
            data.into(),
            transaction_type,
            raw_args,
        )
    }

    /// A contract-creation transaction (blank receiver).
    pub fn deployment(
        title: impl Into<String>,
        description: impl Into<String>,
        data: impl Into<String>,
        transaction_type: TransactionType,
        raw_args: Vec<RawArgument>,
    ) -> Result<Self> {
        if !transaction_type.is_deployment() {
            return Err(DexError::validation(format!(
                "{transaction_type} steps need a receiver"
            )));
        }
        Self::build(
            title.into(),
            description.into(),
            None,
            TokenAmount::zero(),
            data.into(),
            transaction_type,
            raw_args,
        )
    }

    fn build(
        title: String,
        description: String,
        receiver: Option<Address>,
        value: TokenAmount,
        data: String,
        transaction_type: TransactionType,
        raw_args: Vec<RawArgument>,
    ) -> Result<Self> {
        let is_hex = data
            .strip_prefix("0x")
            .is_some_and(|digits| digits.len() % 2 == 0 && hex::decode(digits).is_ok());
        if !is_hex {
            return Err(DexError::validation(
                "transaction data must be 0x-prefixed hex",
            ));
        }
        Ok(Self {
            title,
            description,
            receiver,
            value,
            data,
            transaction_type,
            raw_args,
        })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Receiver, `None` for contract creation.
    pub fn receiver(&self) -> Option<Address> {
        self.receiver
    }

    /// Native value in wei.
    pub fn value(&self) -> TokenAmount {
        self.value
    }

    /// 0x-prefixed calldata or creation code.
    pub fn data(&self) -> &str {
        &self.data
    }

    /// 4-byte function selector of a call step.
    pub fn selector(&self) -> Option<&str> {
        if self.receiver.is_none() {
            return None;
        }
        self.data.get(0..10)
    }

    pub fn transaction_type(&self) -> TransactionType {
        self.transaction_type
    }

    pub fn raw_args(&self) -> &[RawArgument] {
        &self.raw_args
    }
}
