//! # Stage
//!
//! One bounded digit of an odometer.
//!
//! A stage holds a value in `0..modulus` and decides, on increment, whether it
//! rolls over. At the overflow point it asks a *continuation* (usually the next
//! more significant stage) to take the carry, and only commits its own reset
//! once the continuation has accepted.
//!
//! | Continuation returns | Stage value after `incr` | Result |
//! |----------------------|--------------------------|--------|
//! | `Ok(Accepted)`       | `0`                      | `Ok(Accepted)` |
//! | `Ok(Rejected)`       | `modulus - 1` (frozen)   | `Ok(Rejected)` |
//! | `Err(e)`             | unchanged                | `Err(e)` |
//!
//! A stage never owns its continuation: the continuation is passed in per call,
//! so the wiring lives in the enclosing [`Chain`](crate::Chain).

use crate::{Modulus, OdometerError, Outcome};

// =============================================================================
// INCREMENTABLE
// =============================================================================

/// Anything that can take one increment and report whether it absorbed it.
///
/// Implemented by [`Stage`], by [`Chain`](crate::Chain), and by any
/// `FnMut() -> Result<Outcome, OdometerError>` closure, so a custom
/// continuation can be plugged in wherever a stage is expected.
pub trait Incrementable {
    /// Take one increment.
    fn incr(&mut self) -> Result<Outcome, OdometerError>;
}

impl<F> Incrementable for F
where
    F: FnMut() -> Result<Outcome, OdometerError>,
{
    fn incr(&mut self) -> Result<Outcome, OdometerError> {
        self()
    }
}

// =============================================================================
// STAGE
// =============================================================================

/// A single bounded (or unbounded) counter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stage {
    value: u64,
    modulus: Modulus,
}

impl Stage {
    /// Create a stage at zero.
    #[must_use]
    pub const fn new(modulus: Modulus) -> Self {
        Self { value: 0, modulus }
    }

    /// Create a stage preset to `value`.
    ///
    /// Returns `OdometerError::ValueOutOfRange` if `value >= modulus`.
    pub fn with_value(modulus: Modulus, value: u64) -> Result<Self, OdometerError> {
        if !modulus.contains(value) {
            return Err(OdometerError::ValueOutOfRange { value, modulus });
        }
        Ok(Self { value, modulus })
    }

    #[must_use]
    pub const fn value(&self) -> u64 {
        self.value
    }

    #[must_use]
    pub const fn modulus(&self) -> Modulus {
        self.modulus
    }

    /// Check if the next increment reaches the overflow point.
    ///
    /// Always false for an unbounded stage.
    #[must_use]
    pub const fn is_at_limit(&self) -> bool {
        match self.modulus {
            Modulus::Bounded(_) => self.value == self.modulus.limit(),
            Modulus::Unbounded => false,
        }
    }

    /// Set the value back to zero.
    pub fn reset(&mut self) {
        self.value = 0;
    }

    /// Increment, calling `carry` only at the overflow point.
    ///
    /// The transition is all-or-nothing: the value is only written once the
    /// outcome is known, so an `Err` from `carry` leaves the stage untouched.
    pub fn incr_then<F>(&mut self, carry: F) -> Result<Outcome, OdometerError>
    where
        F: FnOnce() -> Result<Outcome, OdometerError>,
    {
        let Modulus::Bounded(modulus) = self.modulus else {
            self.value = self.value.saturating_add(1);
            return Ok(Outcome::Accepted);
        };

        // value < modulus, so this cannot overflow
        let next = self.value + 1;
        if next < modulus.get() {
            self.value = next;
            return Ok(Outcome::Accepted);
        }

        match carry()? {
            Outcome::Accepted => {
                self.value = 0;
                Ok(Outcome::Accepted)
            }
            Outcome::Rejected => Ok(Outcome::Rejected),
        }
    }
}

impl Incrementable for Stage {
    /// Increment without a continuation: a bounded stage wraps silently.
    fn incr(&mut self) -> Result<Outcome, OdometerError> {
        self.incr_then(|| Ok(Outcome::Accepted))
    }
}

// =============================================================================
// TESTS
// =============================================================================
