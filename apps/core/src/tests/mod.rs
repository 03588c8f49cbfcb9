//! Test Module
//!
//! Cross-module test suite for the ChatRelay backend.
//!
//! ## Test Categories
//! - `brain_tests`: classification, canned replies and formatting together
//! - `database_tests`: sessions and append-only message history
//! - `router_tests`: sequential provider failover
//! - `assistant_tests`: the full chat pipeline against mock providers
//! - `api_tests`: HTTP routes, validation, rate limiting

mod fixtures;

pub mod database_tests;
pub mod router_tests;
