//! # Readout
//!
//! Renders chain readings as a fixed-width string, most significant first.
//!
//! The most significant value is printed as is; every other value is
//! zero-padded to the number of digits of its `modulus - 1`. Separators are
//! placed after each value except the last:
//!
//! ```text
//! days  hours  minutes  seconds  tenths
//!   2  d  13  :  43   :   42   .   2      =>  "2d13:43:42.2"
//! ```
//!
//! A readout only reads; it never touches the chain.

use crate::{OdometerError, Reading};
use serde::{Deserialize, Serialize};

/// Separators between rendered stages, most significant first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Readout {
    separators: Vec<String>,
}

impl Readout {
    /// Create a readout from separators, most significant first.
    #[must_use]
    pub fn new<I, S>(separators: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            separators: separators.into_iter().map(Into::into).collect(),
        }
    }

    /// `<days>d<hh>:<mm>:<ss>.<t>`
    #[must_use]
    pub fn hours_meter() -> Self {
        Self::new(["d", ":", ":", "."])
    }

    /// The same separator between all of `stages` stages.
    #[must_use]
    pub fn uniform(separator: &str, stages: usize) -> Self {
        Self::new(std::iter::repeat_n(separator, stages.saturating_sub(1)))
    }

    /// Number of readings this readout renders.
    #[must_use]
    pub fn stages(&self) -> usize {
        self.separators.len() + 1
    }

    #[must_use]
    pub fn separators(&self) -> &[String] {
        &self.separators
    }

    /// Render `readings` (least significant first, as a chain yields them).
    pub fn render(&self, readings: &[Reading]) -> Result<String, OdometerError> {
        if readings.len() != self.stages() {
            return Err(OdometerError::LayoutMismatch {
                expected: self.stages(),
                actual: readings.len(),
            });
        }

        let mut out = String::new();
        for (position, reading) in readings.iter().rev().enumerate() {
            if position == 0 {
                out.push_str(&reading.value.to_string());
            } else {
                out.push_str(&self.separators[position - 1]);
                let width = reading.modulus.width();
                out.push_str(&format!("{:0width$}", reading.value, width = width));
            }
        }
        Ok(out)
    }
}

// =============================================================================
// TESTS
// =============================================================================
