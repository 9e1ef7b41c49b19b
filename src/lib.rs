#![doc = "partition-smoke: conformance smoke tests for a document partition HTTP endpoint."]

//! The harness uploads sample documents (verbatim and gzip-compressed) to
//! `POST /general/v0/general`, asks for JSON or CSV output, and checks the
//! response contract: status, payload shape, text length, CSV/JSON parity,
//! strategy timing and table rendering.
//!
//! # Usage
//! Use [`runner::run_cases`] with a [`client::GeneralApiClient`] for a live run,
//! or with `contract::MockPartitionApi` to exercise the checks offline.

pub mod cases;
pub mod checks;
pub mod cli;
pub mod client;
pub mod config;
pub mod contract;
pub mod error;
pub mod fixture;
pub mod load_config;
pub mod response;
pub mod runner;

pub use cli::{run, Cli, Commands};
