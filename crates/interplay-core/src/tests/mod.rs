//! Crate-level tests for the interaction pipeline.
//!
//! - `helpers.rs`: factories, counters and tracing setup
//! - `integration.rs`: end-to-end runs through interactors, scanners, solvers
//!   and the input stream
//! - `properties.rs`: property tests for registries and solve passes

mod helpers;
mod integration;
