//! # odometer-core
//!
//! The cascading counter engine for Odometer - THE LOGIC.
//!
//! A chain of bounded stages (tenths, seconds, minutes, hours, days, ...)
//! where incrementing the least significant stage may ripple a carry through
//! successively coarser stages, exactly like a mechanical odometer.
//!
//! ## Overflow Policies
//!
//! What a stage does at its modulus is chosen per stage:
//! - `Carry`: reset to zero and carry into the next stage
//! - `Sticky`: refuse to roll over and stay at `modulus - 1`
//! - `Fault`: raise a typed error and leave the whole chain untouched
//! - a custom continuation (`Incrementable`) plugged in as a hook
//!
//! ## Architectural Constraints
//!
//! - Single-threaded and synchronous: a tick returns before the caller continues
//! - Fixed topology: stages are wired once, by name, and never re-wired
//! - Fail fast: invalid moduli and cyclic wiring are rejected at construction
//! - Has NO async, NO I/O dependencies (pure Rust)

// =============================================================================
// MODULES
// =============================================================================

pub mod chain;
pub mod layout;
pub mod meter;
pub mod policy;
pub mod primitives;
pub mod readout;
pub mod stage;
pub mod types;

// =============================================================================
// RE-EXPORTS: Core Types (from types module)
// =============================================================================

pub use types::{Modulus, OdometerError, Outcome, Reading};

// =============================================================================
// RE-EXPORTS: Counter Engine
// =============================================================================

pub use chain::{AdvanceReport, Chain, ChainBuilder};
pub use layout::{BoundStage, Layout, StageSpec};
pub use meter::HoursMeter;
pub use policy::{Continuation, Hook, OverflowPolicy};
pub use readout::Readout;
pub use stage::{Incrementable, Stage};
