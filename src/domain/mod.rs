//! Domain modules organized as vertical slices.
//!
//! Each record slice contains:
//! - `mod.rs`: Canonical, write-ready record types
//! - `wire.rs`: Raw serde structs matching exchange responses
//! - `convert.rs`: Wire → record conversions with validation

pub mod account;
pub mod funding;
pub mod position;
pub mod trade;
