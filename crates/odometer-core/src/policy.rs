//! # Overflow Policies
//!
//! What a stage does when it reaches its modulus.
//!
//! | Policy | Continuation | Effect on the overflowing stage |
//! |--------|--------------|---------------------------------|
//! | `Carry` | next stage (none on the terminal stage) | resets to 0 once the next stage accepts |
//! | `Sticky` | always rejects | freezes at `modulus - 1` |
//! | `Fault` | always raises `CarryFault` | left untouched, error returned |
//!
//! The terminal stage has no next stage. With `Carry` a bounded terminal wraps
//! silently; with `Sticky` it saturates; an unbounded terminal never overflows.
//! Each of the three is an explicit choice made in the layout.

use crate::{Incrementable, OdometerError};
use serde::{Deserialize, Serialize};

/// Reason attached to faults raised by [`OverflowPolicy::Fault`].
pub const FAULT_REASON: &str = "overflow refused by fault policy";

// =============================================================================
// OVERFLOW POLICY
// =============================================================================

/// Declarative overflow behaviour of one stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverflowPolicy {
    /// Reset to zero and carry into the next stage.
    #[default]
    Carry,
    /// Never roll over; stay at the last representable value.
    Sticky,
    /// Raise a carry fault instead of rolling over.
    Fault,
}

impl OverflowPolicy {
    /// Get the policy name as written in layouts.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            OverflowPolicy::Carry => "carry",
            OverflowPolicy::Sticky => "sticky",
            OverflowPolicy::Fault => "fault",
        }
    }
}

impl std::fmt::Display for OverflowPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for OverflowPolicy {
    type Err = OdometerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "carry" => Ok(OverflowPolicy::Carry),
            "sticky" => Ok(OverflowPolicy::Sticky),
            "fault" => Ok(OverflowPolicy::Fault),
            other => Err(OdometerError::ConfigError(format!(
                "Unknown overflow policy '{}' (expected carry, sticky or fault)",
                other
            ))),
        }
    }
}

// =============================================================================
// CONTINUATION
// =============================================================================

/// Custom continuation attached to a stage.
pub type Hook = Box<dyn Incrementable + Send>;

/// What a stage actually calls when it overflows.
pub enum Continuation {
    /// One of the built-in policies.
    Policy(OverflowPolicy),
    /// A caller supplied continuation. Its outcome (or error) is used as is.
    Hook(Hook),
}

impl Continuation {
    /// Get the policy, or `None` for a hook.
    #[must_use]
    pub fn policy(&self) -> Option<OverflowPolicy> {
        match self {
            Continuation::Policy(policy) => Some(*policy),
            Continuation::Hook(_) => None,
        }
    }
}

impl Default for Continuation {
    fn default() -> Self {
        Continuation::Policy(OverflowPolicy::default())
    }
}

impl From<OverflowPolicy> for Continuation {
    fn from(policy: OverflowPolicy) -> Self {
        Continuation::Policy(policy)
    }
}

impl std::fmt::Debug for Continuation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Continuation::Policy(policy) => f.debug_tuple("Policy").field(policy).finish(),
            Continuation::Hook(_) => f.write_str("Hook(..)"),
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
