//! Shared fixtures for integration tests: a mock Hyperliquid `/info` venue,
//! an in-memory GraphQL backend with unique keys, and adapter contract checks.

#![allow(dead_code)]

pub mod contract;
pub mod graphql;
pub mod venue;

use perp_ledger::prelude::*;
use serde_json::{json, Value};
use uuid::Uuid;

pub fn test_account() -> Account {
    Account::new(Uuid::new_v4().to_string(), "0x0000000000000000000000000000000000000abc")
}

/// A `userFillsByTime` element. Numbers are mixed between JSON numbers and
/// strings the way the venue sends them.
pub fn fill(tid: i64, time_ms: i64) -> Value {
    json!({
        "coin": "BTC",
        "px": "50000.5",
        "sz": 0.01,
        "side": if tid % 2 == 0 { "B" } else { "A" },
        "time": time_ms,
        "startPosition": "0.0",
        "dir": "Open Long",
        "closedPnl": "0.0",
        "hash": "0x7c1a0e3f00000000000000000000000000000000000000000000000000000001",
        "oid": 1000 + tid,
        "crossed": true,
        "fee": "0.175",
        "tid": tid,
        "feeToken": "USDC"
    })
}

/// A `userFunding` element.
pub fn funding(time_ms: i64, coin: &str, usdc: &str) -> Value {
    json!({
        "time": time_ms,
        "hash": "0x0000000000000000000000000000000000000000000000000000000000000000",
        "delta": {
            "type": "funding",
            "coin": coin,
            "usdc": usdc,
            "szi": "0.5",
            "fundingRate": "0.0000125",
            "nSamples": null
        }
    })
}
