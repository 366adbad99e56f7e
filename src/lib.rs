//! betledger — minimal wagering ledger over HTTP.
//!
//! Library crate exposing all modules for use by integration tests
//! and the binary entry point.

pub mod api;
pub mod config;
pub mod service;
pub mod store;
pub mod types;
