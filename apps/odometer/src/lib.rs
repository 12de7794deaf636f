//! # odometer
//!
//! Library surface of the Odometer binary: configuration loading and the
//! command line interface, exposed for integration tests.

pub mod cli;
pub mod config;
