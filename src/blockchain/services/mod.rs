// src/blockchain/services/mod.rs

//! Read-only query services. Each calls one backend capability and reshapes
//! the response for tool output.

pub mod balance;
pub mod coins;
pub mod event;
pub mod names;
pub mod network;
pub mod object;
pub mod package;
pub mod transaction;
pub mod wallet;

pub const DEFAULT_PAGE_LIMIT: u64 = 50;
