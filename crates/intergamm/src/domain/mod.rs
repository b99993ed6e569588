//! # Domain Module
//!
//! Core domain types: message kinds, packet envelopes, correlation records,
//! zone graph values, validation rules and errors.

pub mod errors;
pub mod exchange;
pub mod invariants;
pub mod messages;
pub mod packet;
pub mod value_objects;

pub use errors::*;
pub use exchange::*;
pub use invariants::*;
pub use messages::*;
pub use packet::*;
pub use value_objects::*;
