//! # Primitives
//!
//! Fixed constants for the Odometer CORE.
//!
//! 1. **Clock radices**: the moduli of the operating-hours meter.
//! 2. **Limits**: bounds on layout size and batch advancing.

/// Tenths of a second per second.
pub const TENTHS_PER_SECOND: u64 = 10;

/// Seconds per minute.
pub const SECONDS_PER_MINUTE: u64 = 60;

/// Minutes per hour.
pub const MINUTES_PER_HOUR: u64 = 60;

/// Hours per day.
pub const HOURS_PER_DAY: u64 = 24;

/// Ticks (tenths of a second) per day of the operating-hours meter.
pub const TICKS_PER_DAY: u64 =
    TENTHS_PER_SECOND * SECONDS_PER_MINUTE * MINUTES_PER_HOUR * HOURS_PER_DAY;

// =============================================================================
// LIMITS
// =============================================================================

/// Maximum number of stages in one layout.
///
/// Ripple recursion depth equals chain length, so layouts are kept small.
pub const MAX_STAGES: usize = 64;

/// Maximum number of ticks a single `run` may request.
pub const MAX_ADVANCE_TICKS: u64 = 1_000_000_000;
