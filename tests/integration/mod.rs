//! Integration test suite for sdkup
//!
//! End-to-end tests that drive the library through its public API with an
//! in-memory fetcher, and the `sdkup` binary through `assert_cmd`. None of
//! them touch the network.
//!
//! # Running Integration Tests
//!
//! ```bash
//! cargo test --test integration
//! ```
//!
//! # Test Organization
//!
//! - **common**: archive builders, marker helpers and the in-memory fetcher
//! - **cli**: binary invocation, exit codes and output
//! - **extraction**: archive extraction from files on disk
//! - **upgrade_flow**: full install and upgrade runs

mod common;

mod cli;
mod extraction;
mod upgrade_flow;
