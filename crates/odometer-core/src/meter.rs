//! # Operating-Hours Meter
//!
//! The canonical chain: ticked every 100 ms, it accumulates
//! - tenths of a second (0..9)
//! - seconds within a minute (0..59)
//! - minutes within an hour (0..59)
//! - hours within a day (0..23)
//! - full days, unbounded

use crate::{Chain, Layout, OdometerError, Outcome, Readout, Reading};

/// A five-stage chain with a fixed readout.
#[derive(Debug)]
pub struct HoursMeter {
    chain: Chain,
    readout: Readout,
}

impl HoursMeter {
    /// Create a meter at `0d00:00:00.0`.
    pub fn new() -> Result<Self, OdometerError> {
        Ok(Self {
            chain: Chain::from_layout(&Layout::hours_meter())?,
            readout: Readout::hours_meter(),
        })
    }

    /// Advance by one tenth of a second.
    pub fn tick(&mut self) -> Result<Outcome, OdometerError> {
        self.chain.tick()
    }

    #[must_use]
    pub fn readings(&self) -> Vec<Reading> {
        self.chain.readings()
    }

    #[must_use]
    pub fn chain(&self) -> &Chain {
        &self.chain
    }

    /// Render as `<days>d<hh>:<mm>:<ss>.<t>`.
    pub fn render(&self) -> Result<String, OdometerError> {
        self.readout.render(&self.chain.readings())
    }
}

impl std::fmt::Display for HoursMeter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = self.render().map_err(|_| std::fmt::Error)?;
        f.write_str(&text)
    }
}
