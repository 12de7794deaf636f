//! # Meter Configuration
//!
//! Loads a chain layout and its readout separators from TOML.
//!
//! ```toml
//! separators = ["d", ":", ":", "."]
//!
//! [[stages]]
//! name = "tenths"
//! modulus = 10
//! next = "seconds"
//!
//! [[stages]]
//! name = "days"        # no modulus: unbounded, no next: terminal
//! ```
//!
//! Stages may be listed in any order; `next` links them. Without
//! `separators`, stages are joined with `:`. Unknown keys are refused, so a
//! misspelled `modulus` cannot silently turn a stage unbounded.

use odometer_core::{Chain, Layout, OdometerError, Readout, StageSpec};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Maximum size of a configuration file (1 MB).
const MAX_CONFIG_FILE_SIZE: u64 = 1024 * 1024;

/// Separator used when a config does not name any.
pub const DEFAULT_SEPARATOR: &str = ":";

/// A chain layout plus how to print it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MeterConfig {
    /// Separators between stages, most significant first.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub separators: Option<Vec<String>>,

    /// Stage specs, in any order.
    #[serde(default)]
    pub stages: Vec<StageSpec>,
}

impl Default for MeterConfig {
    /// The operating-hours meter.
    fn default() -> Self {
        Self {
            separators: Some(Readout::hours_meter().separators().to_vec()),
            stages: Layout::hours_meter().stages,
        }
    }
}

impl MeterConfig {
    /// Parse a config from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self, OdometerError> {
        toml::from_str(text).map_err(|e| OdometerError::ConfigError(e.to_string()))
    }

    /// Load a config file.
    pub fn load(path: &Path) -> Result<Self, OdometerError> {
        let metadata = std::fs::metadata(path).map_err(|e| {
            OdometerError::IoError(format!("Cannot read '{}': {}", path.display(), e))
        })?;

        if !metadata.is_file() {
            return Err(OdometerError::IoError(format!(
                "Path '{}' is not a regular file",
                path.display()
            )));
        }

        if metadata.len() > MAX_CONFIG_FILE_SIZE {
            return Err(OdometerError::ConfigError(format!(
                "File size {} bytes exceeds maximum allowed {} bytes",
                metadata.len(),
                MAX_CONFIG_FILE_SIZE
            )));
        }

        let text = std::fs::read_to_string(path).map_err(|e| {
            OdometerError::IoError(format!("Cannot read '{}': {}", path.display(), e))
        })?;

        Self::from_toml_str(&text)
    }

    /// Serialize back to TOML.
    pub fn to_toml_string(&self) -> Result<String, OdometerError> {
        toml::to_string(self).map_err(|e| OdometerError::ConfigError(e.to_string()))
    }

    /// The stage specs as a layout.
    pub fn layout(&self) -> Layout {
        Layout::new(self.stages.clone())
    }

    /// Readout for this config, checked against the number of stages.
    pub fn readout(&self) -> Result<Readout, OdometerError> {
        let stages = self.stages.len();
        let readout = match &self.separators {
            Some(separators) => Readout::new(separators.iter().map(String::as_str)),
            None => Readout::uniform(DEFAULT_SEPARATOR, stages),
        };

        if readout.stages() != stages {
            return Err(OdometerError::LayoutMismatch {
                expected: readout.stages(),
                actual: stages,
            });
        }
        Ok(readout)
    }

    /// Validate the config and build a zeroed chain with its readout.
    pub fn build(&self) -> Result<(Chain, Readout), OdometerError> {
        let chain = Chain::from_layout(&self.layout())?;
        let readout = self.readout()?;
        Ok((chain, readout))
    }
}

// =============================================================================
// TESTS
// =============================================================================
