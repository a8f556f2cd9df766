//! Generic entry-function payloads.
//!
//! A payload names an on-chain function (`<address>::<module>::<function>`),
//! its type arguments, and an ordered argument list. Argument order and types
//! are not checked here; a mismatch surfaces only when the node simulates the
//! transaction.

use serde::ser::{SerializeSeq, Serializer};
use serde::Serialize;
use std::fmt;

use crate::blockchain::types::{AccountAddress, BlockchainError, BlockchainResult};

/// Fully-qualified entry function identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EntryFunctionId {
    pub address: AccountAddress,
    pub module: String,
    pub function: String,
}

impl EntryFunctionId {
    pub fn new(address: AccountAddress, module: &str, function: &str) -> Self {
        Self {
            address,
            module: module.to_string(),
            function: function.to_string(),
        }
    }

    /// Parse `0xADDR::module::function`.
    pub fn parse(input: &str) -> BlockchainResult<Self> {
        let mut parts = input.split("::");
        let (Some(address), Some(module), Some(function), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(BlockchainError::InvalidResponse(format!(
                "Malformed function id '{input}'"
            )));
        };
        if module.is_empty() || function.is_empty() {
            return Err(BlockchainError::InvalidResponse(format!(
                "Malformed function id '{input}'"
            )));
        }
        Ok(Self::new(AccountAddress::parse(address)?, module, function))
    }
}

impl fmt::Display for EntryFunctionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}::{}", self.address, self.module, self.function)
    }
}

impl Serialize for EntryFunctionId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// A single positional argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveValue {
    Address(AccountAddress),
    String(String),
    U64(u64),
    Bool(bool),
    /// `vector<u8>`; encoded as `0x` hex.
    Bytes(Vec<u8>),
    Vector(Vec<MoveValue>),
}

impl MoveValue {
    pub fn as_address(&self) -> Option<&AccountAddress> {
        match self {
            MoveValue::Address(address) => Some(address),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            MoveValue::String(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_u64(&self) -> Option<u64> {
        match self {
            MoveValue::U64(value) => Some(*value),
            _ => None,
        }
    }
}

impl Serialize for MoveValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            MoveValue::Address(address) => serializer.serialize_str(address.as_str()),
            MoveValue::String(value) => serializer.serialize_str(value),
            MoveValue::U64(value) => serializer.collect_str(value),
            MoveValue::Bool(value) => serializer.serialize_bool(*value),
            MoveValue::Bytes(bytes) => {
                serializer.serialize_str(&format!("0x{}", hex::encode(bytes)))
            }
            MoveValue::Vector(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
        }
    }
}

impl From<&AccountAddress> for MoveValue {
    fn from(address: &AccountAddress) -> Self {
        MoveValue::Address(address.clone())
    }
}

impl From<&str> for MoveValue {
    fn from(value: &str) -> Self {
        MoveValue::String(value.to_string())
    }
}

impl From<u64> for MoveValue {
    fn from(value: u64) -> Self {
        MoveValue::U64(value)
    }
}

impl From<bool> for MoveValue {
    fn from(value: bool) -> Self {
        MoveValue::Bool(value)
    }
}

/// Entry-function call payload, serialized in the node's JSON shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntryFunctionPayload {
    #[serde(rename = "type")]
    kind: &'static str,
    function: EntryFunctionId,
    type_arguments: Vec<String>,
    arguments: Vec<MoveValue>,
}

impl EntryFunctionPayload {
    pub fn new(function: EntryFunctionId, type_arguments: Vec<String>, arguments: Vec<MoveValue>) -> Self {
        Self {
            kind: "entry_function_payload",
            function,
            type_arguments,
            arguments,
        }
    }

    pub fn function(&self) -> &EntryFunctionId {
        &self.function
    }

    pub fn type_arguments(&self) -> &[String] {
        &self.type_arguments
    }

    pub fn arguments(&self) -> &[MoveValue] {
        &self.arguments
    }

    /// Number of positional arguments.
    pub fn arity(&self) -> usize {
        self.arguments.len()
    }
}
