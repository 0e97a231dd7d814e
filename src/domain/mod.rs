//! Domain modules organized as vertical slices.
//!
//! Each sub-module contains:
//! - `mod.rs`: Domain types and the logic that needs no I/O
//! - `wire.rs`: Raw serde structs matching exchange payloads
//! - `convert.rs`: `TryFrom` conversions into domain types (orders only)
//! - `state.rs`: Derived views over fetched data (orders only)
//! - `client.rs`: Sub-client driving the exchange through the retry layer

pub mod market;
pub mod order;
