//! Payloads for the framework token module (`0x3::token`).
//!
//! These back the collection/token creation helpers on `RestClient`.

use crate::blockchain::payload::{EntryFunctionId, EntryFunctionPayload, MoveValue};
use crate::blockchain::types::{AccountAddress, BlockchainResult};
use crate::marketplace::assets::{CollectionDescriptor, TokenDescriptor};

/// Address the token framework is published under.
pub const TOKEN_FRAMEWORK_ADDRESS: &str = "0x3";

fn token_function(function: &str) -> BlockchainResult<EntryFunctionId> {
    let address = AccountAddress::parse(TOKEN_FRAMEWORK_ADDRESS)?;
    Ok(EntryFunctionId::new(address, "token", function))
}

fn all_false(count: usize) -> MoveValue {
    MoveValue::Vector(vec![MoveValue::Bool(false); count])
}

/// `create_collection_script(name, description, uri, maximum, mutate_setting)`.
///
/// The collection is created unbounded and immutable.
pub fn create_collection_payload(
    collection: &CollectionDescriptor,
) -> BlockchainResult<EntryFunctionPayload> {
    Ok(EntryFunctionPayload::new(
        token_function("create_collection_script")?,
        Vec::new(),
        vec![
            MoveValue::from(collection.name()),
            MoveValue::from(collection.description()),
            MoveValue::from(collection.uri()),
            MoveValue::U64(u64::MAX),
            all_false(3),
        ],
    ))
}

/// `create_token_script(...)` with maximum = supply, no royalty, no properties.
pub fn create_token_payload(
    creator: &AccountAddress,
    collection_name: &str,
    token: &TokenDescriptor,
) -> BlockchainResult<EntryFunctionPayload> {
    Ok(EntryFunctionPayload::new(
        token_function("create_token_script")?,
        Vec::new(),
        vec![
            MoveValue::from(collection_name),
            MoveValue::from(token.name()),
            MoveValue::from(token.description()),
            MoveValue::U64(token.supply()),
            MoveValue::U64(token.supply()),
            MoveValue::from(token.uri()),
            MoveValue::from(creator),
            MoveValue::U64(0),
            MoveValue::U64(0),
            all_false(5),
            MoveValue::Vector(Vec::new()),
            MoveValue::Vector(Vec::new()),
            MoveValue::Vector(Vec::new()),
        ],
    ))
}
