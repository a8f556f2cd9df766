//! Marketplace domain: asset descriptors and the contract's entry functions.

pub mod assets;
pub mod calls;

pub use assets::{AssetError, CollectionDescriptor, TokenDescriptor};
pub use calls::{BuyToken, ListNft, ListingTerms, MarketplaceModule};
