//! # Adapters Layer (Hexagonal Architecture)
//!
//! Implements outbound port traits: the bincode codec and in-memory
//! channel, account and transfer collaborators.

mod account_registry;
mod channel_layer;
mod codec;
mod token_transfer;

pub use account_registry::{InMemoryAccountRegistry, DERIVED_ADDRESS_HRP};
pub use channel_layer::InMemoryChannelLayer;
pub use codec::BincodeCodec;
pub use token_transfer::InMemoryTokenTransfer;
