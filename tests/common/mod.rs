//! Common test utilities and helpers
//!
//! - App fixtures over a memory store with a manual clock
//! - HTTP request/response helpers for `tower::ServiceExt::oneshot`
//! - Misbehaving stores for failure-path tests
//! - Assertion macros

#![allow(dead_code)]

pub mod assertions;
pub mod fixtures;
pub mod stores;

pub use fixtures::*;
pub use stores::*;
