//! Typed builders for the marketplace contract's entry functions.
//!
//! The contract takes positional arguments. Each builder here has named
//! fields and lowers them in the one order the contract expects, so callers
//! cannot swap two arguments of the same type by accident.

use crate::blockchain::payload::{EntryFunctionId, EntryFunctionPayload, MoveValue};
use crate::blockchain::types::{AccountAddress, BlockchainResult};
use crate::blockchain::wallet::WalletIdentity;
use crate::marketplace::assets::{CollectionDescriptor, TokenDescriptor};

/// Name of the deployed marketplace module.
pub const MARKETPLACE_MODULE: &str = "marketplace";

/// Where the marketplace contract lives and which coin it trades in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarketplaceModule {
    pub address: AccountAddress,
    /// Sole type argument of every marketplace call.
    pub coin_type: String,
}

impl MarketplaceModule {
    pub fn new(address: &str, coin_type: &str) -> BlockchainResult<Self> {
        Ok(Self {
            address: AccountAddress::parse(address)?,
            coin_type: coin_type.to_string(),
        })
    }

    fn payload(&self, function: &str, arguments: Vec<MoveValue>) -> EntryFunctionPayload {
        EntryFunctionPayload::new(
            EntryFunctionId::new(self.address.clone(), MARKETPLACE_MODULE, function),
            vec![self.coin_type.clone()],
            arguments,
        )
    }
}

/// Price and listing parameters passed to `list_nft`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListingTerms {
    pub price: u64,
    /// Fifth `list_nft` parameter. Its meaning is owned by the contract.
    pub expiration: u64,
    pub property_version: u64,
}

/// `marketplace::list_nft<Coin>(seller, collection, token, price, expiration, property_version)`.
#[derive(Debug, Clone)]
pub struct ListNft<'a> {
    pub seller: &'a AccountAddress,
    pub collection: &'a str,
    pub token: &'a str,
    pub price: u64,
    pub expiration: u64,
    pub property_version: u64,
}

impl<'a> ListNft<'a> {
    pub const FUNCTION: &'static str = "list_nft";
    pub const ARITY: usize = 6;

    pub fn new(
        seller: &'a WalletIdentity,
        collection: &'a CollectionDescriptor,
        token: &'a TokenDescriptor,
        terms: ListingTerms,
    ) -> Self {
        Self {
            seller: seller.address(),
            collection: collection.name(),
            token: token.name(),
            price: terms.price,
            expiration: terms.expiration,
            property_version: terms.property_version,
        }
    }

    pub fn into_payload(self, module: &MarketplaceModule) -> EntryFunctionPayload {
        module.payload(
            Self::FUNCTION,
            vec![
                MoveValue::from(self.seller),
                MoveValue::from(self.collection),
                MoveValue::from(self.token),
                MoveValue::U64(self.price),
                MoveValue::U64(self.expiration),
                MoveValue::U64(self.property_version),
            ],
        )
    }
}

/// `marketplace::buy_token<Coin>(seller, buyer, collection, token, property_version)`.
#[derive(Debug, Clone)]
pub struct BuyToken<'a> {
    pub seller: &'a AccountAddress,
    pub buyer: &'a AccountAddress,
    pub collection: &'a str,
    pub token: &'a str,
    pub property_version: u64,
}

impl<'a> BuyToken<'a> {
    pub const FUNCTION: &'static str = "buy_token";
    pub const ARITY: usize = 5;

    pub fn new(
        seller: &'a WalletIdentity,
        buyer: &'a WalletIdentity,
        collection: &'a CollectionDescriptor,
        token: &'a TokenDescriptor,
        property_version: u64,
    ) -> Self {
        Self {
            seller: seller.address(),
            buyer: buyer.address(),
            collection: collection.name(),
            token: token.name(),
            property_version,
        }
    }

    pub fn into_payload(self, module: &MarketplaceModule) -> EntryFunctionPayload {
        module.payload(
            Self::FUNCTION,
            vec![
                MoveValue::from(self.seller),
                MoveValue::from(self.buyer),
                MoveValue::from(self.collection),
                MoveValue::from(self.token),
                MoveValue::U64(self.property_version),
            ],
        )
    }
}
