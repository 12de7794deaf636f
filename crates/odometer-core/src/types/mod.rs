//! # Core Type Definitions
//!
//! This module contains the shared vocabulary of the counter engine:
//! - Increment outcome (`Outcome`)
//! - Stage bound (`Modulus`)
//! - Read-only stage view (`Reading`)
//! - Error types (`OdometerError`)
//!
//! ## Determinism Guarantees
//!
//! All types in this module:
//! - Use integer arithmetic only (no floating-point)
//! - Carry no interior mutability
//! - Are cheap to clone and safe to compare

use serde::{Deserialize, Serialize};
use std::num::NonZeroU64;
use thiserror::Error;

// =============================================================================
// OUTCOME
// =============================================================================

/// Result of asking a stage (or a continuation) to take one increment.
///
/// `Rejected` is a normal outcome, not an error: the receiver is saturated
/// and refuses the carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    /// The increment was absorbed.
    Accepted,
    /// The increment was refused; the caller must not roll over.
    Rejected,
}

impl Outcome {
    /// Check if the increment was absorbed.
    #[must_use]
    pub const fn is_accepted(self) -> bool {
        matches!(self, Outcome::Accepted)
    }

    /// Check if the increment was refused.
    #[must_use]
    pub const fn is_rejected(self) -> bool {
        matches!(self, Outcome::Rejected)
    }
}

// =============================================================================
// MODULUS
// =============================================================================

/// Upper bound of a stage.
///
/// A bounded stage holds `0..modulus`. An unbounded stage never overflows;
/// its value saturates at `u64::MAX`.
///
/// Serialized as the raw modulus, `null` meaning unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "Option<u64>", try_from = "Option<u64>")]
pub enum Modulus {
    Bounded(NonZeroU64),
    Unbounded,
}

impl Modulus {
    /// Create a bounded modulus. Zero is rejected.
    pub fn bounded(modulus: u64) -> Result<Self, OdometerError> {
        NonZeroU64::new(modulus)
            .map(Modulus::Bounded)
            .ok_or(OdometerError::ZeroModulus)
    }

    /// Build from an optional raw value, `None` meaning unbounded.
    pub fn from_option(modulus: Option<u64>) -> Result<Self, OdometerError> {
        match modulus {
            Some(m) => Self::bounded(m),
            None => Ok(Modulus::Unbounded),
        }
    }

    /// The raw modulus, or `None` when unbounded.
    #[must_use]
    pub const fn get(self) -> Option<u64> {
        match self {
            Modulus::Bounded(m) => Some(m.get()),
            Modulus::Unbounded => None,
        }
    }

    /// Largest value a stage with this modulus can hold.
    #[must_use]
    pub const fn limit(self) -> u64 {
        match self {
            Modulus::Bounded(m) => m.get() - 1,
            Modulus::Unbounded => u64::MAX,
        }
    }

    /// Check whether `value` lies in `0..modulus`.
    #[must_use]
    pub const fn contains(self, value: u64) -> bool {
        value <= self.limit()
    }

    #[must_use]
    pub const fn is_unbounded(self) -> bool {
        matches!(self, Modulus::Unbounded)
    }

    /// Number of decimal digits needed to print [`Modulus::limit`].
    ///
    /// A modulus of 1 (limit 0) still needs one digit.
    #[must_use]
    pub fn width(self) -> usize {
        let mut limit = self.limit();
        let mut digits = 1;
        while limit >= 10 {
            limit /= 10;
            digits += 1;
        }
        digits
    }
}

impl From<Modulus> for Option<u64> {
    fn from(modulus: Modulus) -> Self {
        modulus.get()
    }
}

impl TryFrom<Option<u64>> for Modulus {
    type Error = OdometerError;

    fn try_from(modulus: Option<u64>) -> Result<Self, Self::Error> {
        Modulus::from_option(modulus)
    }
}

impl std::fmt::Display for Modulus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Modulus::Bounded(m) => write!(f, "{}", m),
            Modulus::Unbounded => write!(f, "unbounded"),
        }
    }
}

// =============================================================================
// READING
// =============================================================================

/// Read-only snapshot of one stage, as exposed to formatters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reading {
    /// Stage name, unique within its chain.
    pub name: String,
    /// Current value, always inside `0..modulus`.
    pub value: u64,
    /// Bound of the stage.
    pub modulus: Modulus,
}

impl Reading {
    /// Create a new reading.
    #[must_use]
    pub fn new(name: impl Into<String>, value: u64, modulus: Modulus) -> Self {
        Self {
            name: name.into(),
            value,
            modulus,
        }
    }
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors that can occur in the Odometer system.
///
/// - Construction errors (modulus, topology) are raised by builders, never by ticks
/// - `CarryFault` is the only error a tick can produce
/// - A tick that fails leaves every stage exactly as it was
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OdometerError {
    /// A bounded stage was given a modulus of zero.
    #[error("Modulus must be non-zero")]
    ZeroModulus,

    /// A preset value does not fit its stage.
    #[error("Value {value} out of range for modulus {modulus}")]
    ValueOutOfRange { value: u64, modulus: Modulus },

    /// A chain needs at least one stage.
    #[error("Chain has no stages")]
    EmptyChain,

    /// Two stages share a name.
    #[error("Duplicate stage: {0}")]
    DuplicateStage(String),

    /// A stage links to a name that does not exist.
    #[error("Unknown stage: {0}")]
    UnknownStage(String),

    /// Following the links from a stage leads back to it or to a lesser stage.
    #[error("Continuation cycle through stage: {0}")]
    ContinuationCycle(String),

    /// A stage is not on the single path from the least significant stage.
    #[error("Stage not reachable from the least significant stage: {0}")]
    DetachedStage(String),

    /// Only the terminal stage may be unbounded.
    #[error("Unbounded stage is not terminal: {0}")]
    UnboundedInterior(String),

    /// A continuation raised instead of returning an outcome.
    #[error("Carry fault at stage {stage}: {reason}")]
    CarryFault { stage: String, reason: String },

    /// A readout does not match the number of readings.
    #[error("Readout expects {expected} stages, got {actual}")]
    LayoutMismatch { expected: usize, actual: usize },

    /// A configuration could not be parsed or is out of limits.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    IoError(String),
}

impl OdometerError {
    /// Build a carry fault raised at `stage`.
    #[must_use]
    pub fn fault(stage: impl Into<String>, reason: impl Into<String>) -> Self {
        OdometerError::CarryFault {
            stage: stage.into(),
            reason: reason.into(),
        }
    }

    /// Check if this error was raised while ticking (as opposed to construction).
    #[must_use]
    pub const fn is_carry_fault(&self) -> bool {
        matches!(self, OdometerError::CarryFault { .. })
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_modulus_rejected() {
        assert_eq!(Modulus::bounded(0), Err(OdometerError::ZeroModulus));
        assert_eq!(
            Modulus::from_option(Some(0)),
            Err(OdometerError::ZeroModulus)
        );
    }

    #[test]
    fn modulus_limit_and_contains() {
        let m = Modulus::bounded(60).expect("modulus");
        assert_eq!(m.limit(), 59);
        assert!(m.contains(59));
        assert!(!m.contains(60));
        assert_eq!(m.get(), Some(60));

        assert_eq!(Modulus::Unbounded.limit(), u64::MAX);
        assert!(Modulus::Unbounded.contains(u64::MAX));
        assert_eq!(Modulus::from_option(None), Ok(Modulus::Unbounded));
    }

    #[test]
    fn modulus_width_counts_digits_of_limit() {
        let width = |m: u64| Modulus::bounded(m).expect("modulus").width();
        assert_eq!(width(1), 1);
        assert_eq!(width(10), 1);
        assert_eq!(width(11), 2);
        assert_eq!(width(24), 2);
        assert_eq!(width(60), 2);
        assert_eq!(width(1000), 3);
        assert_eq!(width(1001), 4);
        assert_eq!(Modulus::Unbounded.width(), 20);
    }

    #[test]
    fn modulus_serializes_as_raw_value() {
        let m = Modulus::bounded(24).expect("modulus");
        assert_eq!(serde_json::to_string(&m).expect("json"), "24");
        assert_eq!(
            serde_json::to_string(&Modulus::Unbounded).expect("json"),
            "null"
        );
        let back: Modulus = serde_json::from_str("24").expect("parse");
        assert_eq!(back, m);
        assert!(serde_json::from_str::<Modulus>("0").is_err());
    }

    #[test]
    fn outcome_predicates() {
        assert!(Outcome::Accepted.is_accepted());
        assert!(!Outcome::Accepted.is_rejected());
        assert!(Outcome::Rejected.is_rejected());
    }

    #[test]
    fn error_display() {
        let err = OdometerError::fault("hours", "boom");
        assert!(err.is_carry_fault());
        assert_eq!(err.to_string(), "Carry fault at stage hours: boom");
        assert!(!OdometerError::EmptyChain.is_carry_fault());
    }
}
