//! # CLI Command Implementations
//!
//! This module contains the actual implementations of CLI commands.

use crate::config::MeterConfig;
use odometer_core::{Chain, OdometerError, primitives::MAX_ADVANCE_TICKS};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Validate output path.
///
/// The parent directory must exist; the returned path has it canonicalized.
fn validate_output_path(path: &Path) -> Result<PathBuf, OdometerError> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    let canonical_parent = parent.canonicalize().map_err(|e| {
        OdometerError::IoError(format!(
            "Invalid output directory '{}': {}",
            parent.display(),
            e
        ))
    })?;

    if !canonical_parent.is_dir() {
        return Err(OdometerError::IoError(format!(
            "Output directory '{}' is not a valid directory",
            parent.display()
        )));
    }

    let filename = path
        .file_name()
        .ok_or_else(|| OdometerError::IoError("Output path has no filename".to_string()))?;

    Ok(canonical_parent.join(filename))
}

// =============================================================================
// RUN COMMAND
// =============================================================================

/// Readout taken during a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Frame {
    /// Ticks completed when the readout was taken.
    pub tick: u64,
    pub readout: String,
}

/// Result of a run, for callers that want more than the printed output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    /// Final readout.
    pub readout: String,
    /// Ticks absorbed.
    pub accepted: u64,
    /// Ticks refused by a saturated stage.
    pub rejected: u64,
    /// One frame per `every` ticks (and one for a shorter tail); empty
    /// without `every` or when nothing advanced.
    pub frames: Vec<Frame>,
}

/// Advance the configured meter by `ticks`.
///
/// With `every`, a frame is printed each time `every` more ticks completed
/// and the last frame is the final state; otherwise only the final readout is
/// printed. A carry fault stops the run and is returned as the error; the
/// chain is left at the last accepted state.
pub fn cmd_run(
    config: Option<&Path>,
    json_mode: bool,
    verbose: bool,
    ticks: u64,
    every: Option<u64>,
) -> Result<RunSummary, OdometerError> {
    if ticks > MAX_ADVANCE_TICKS {
        return Err(OdometerError::ConfigError(format!(
            "Tick count {} exceeds maximum {}",
            ticks, MAX_ADVANCE_TICKS
        )));
    }
    if every == Some(0) {
        return Err(OdometerError::ConfigError(
            "--every must be at least 1".to_string(),
        ));
    }

    let (mut chain, readout) = load_config(config)?.build()?;
    let step = every.unwrap_or(ticks);

    let mut remaining = ticks;
    let mut accepted = 0u64;
    let mut rejected = 0u64;
    let mut frames = Vec::new();

    while remaining > 0 {
        let report = chain.advance(remaining.min(step));
        accepted += report.accepted;
        rejected += report.rejected;
        remaining -= report.completed();

        if let Some(fault) = report.fault {
            tracing::warn!(
                "Stopped after {} ticks at {}",
                ticks - remaining,
                readout.render(&chain.readings())?
            );
            return Err(fault);
        }

        if every.is_some() {
            let frame = Frame {
                tick: ticks - remaining,
                readout: readout.render(&chain.readings())?,
            };
            tracing::debug!(
                "tick {}: {} (rejected so far: {})",
                frame.tick,
                frame.readout,
                rejected
            );
            if !json_mode {
                println!("{:>12}  {}", frame.tick, frame.readout);
            }
            frames.push(frame);
        }
    }

    if rejected > 0 {
        tracing::warn!("{} ticks rejected by a saturated stage", rejected);
    }

    let text = readout.render(&chain.readings())?;
    tracing::debug!("tick {}: {}", ticks, text);

    if json_mode {
        let values: serde_json::Map<String, serde_json::Value> = chain
            .readings()
            .into_iter()
            .map(|r| (r.name, serde_json::Value::from(r.value)))
            .collect();
        let mut output = serde_json::json!({
            "ticks": ticks,
            "accepted": accepted,
            "rejected": rejected,
            "readout": text,
            "values": values,
        });
        if every.is_some() {
            output["frames"] = serde_json::json!(frames);
        }
        println!(
            "{}",
            serde_json::to_string_pretty(&output).unwrap_or_default()
        );
    } else {
        // The last frame already shows the final state.
        if frames.is_empty() {
            println!("{}", text);
        }
        if verbose {
            println!();
            println!("Accepted: {}", accepted);
            println!("Rejected: {}", rejected);
        }
    }

    Ok(RunSummary {
        readout: text,
        accepted,
        rejected,
        frames,
    })
}

// =============================================================================
// LAYOUT COMMAND
// =============================================================================

/// Print the resolved stage table, least significant first.
pub fn cmd_layout(config: Option<&Path>, json_mode: bool) -> Result<(), OdometerError> {
    let (chain, _) = load_config(config)?.build()?;
    let rows = layout_rows(&chain);

    if json_mode {
        let stages: Vec<serde_json::Value> = rows
            .iter()
            .map(|row| {
                serde_json::json!({
                    "name": row.name,
                    "modulus": row.modulus,
                    "policy": row.policy,
                })
            })
            .collect();
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({ "stages": stages }))
                .unwrap_or_default()
        );
        return Ok(());
    }

    println!("Odometer Layout");
    println!("===============");
    println!("{:<4} {:<16} {:>12}  Policy", "#", "Stage", "Modulus");
    for (i, row) in rows.iter().enumerate() {
        let modulus = row
            .modulus
            .map(|m| m.to_string())
            .unwrap_or_else(|| "unbounded".to_string());
        println!("{:<4} {:<16} {:>12}  {}", i, row.name, modulus, row.policy);
    }

    Ok(())
}

/// One line of the stage table.
struct LayoutRow {
    name: String,
    modulus: Option<u64>,
    policy: String,
}

fn layout_rows(chain: &Chain) -> Vec<LayoutRow> {
    chain
        .readings()
        .into_iter()
        .zip(chain.policies())
        .map(|(reading, policy)| LayoutRow {
            name: reading.name,
            modulus: reading.modulus.get(),
            policy: policy
                .map(|p| p.name().to_string())
                .unwrap_or_else(|| "hook".to_string()),
        })
        .collect()
}

// =============================================================================
// CHECK COMMAND
// =============================================================================

/// Validate the configuration and print the zero readout.
pub fn cmd_check(config: Option<&Path>, json_mode: bool) -> Result<(), OdometerError> {
    let (chain, readout) = load_config(config)?.build()?;
    let zero = readout.render(&chain.readings())?;

    if json_mode {
        let output = serde_json::json!({
            "valid": true,
            "stages": chain.stage_count(),
            "readout": zero,
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&output).unwrap_or_default()
        );
    } else {
        println!("Layout OK: {} stages, reads {}", chain.stage_count(), zero);
    }

    Ok(())
}

// =============================================================================
// INIT COMMAND
// =============================================================================

/// Write the default (operating-hours) configuration to `output`.
pub fn cmd_init(output: &Path, force: bool) -> Result<(), OdometerError> {
    let path = validate_output_path(output)?;

    if path.exists() && !force {
        return Err(OdometerError::ConfigError(format!(
            "'{}' already exists. Use --force to overwrite.",
            output.display()
        )));
    }

    let text = MeterConfig::default().to_toml_string()?;
    std::fs::write(&path, text)
        .map_err(|e| OdometerError::IoError(format!("Write config: {}", e)))?;

    tracing::info!("Wrote default layout to {}", path.display());
    println!("Initialized layout at {:?}", path);
    Ok(())
}

// =============================================================================
// HELPER FUNCTIONS
// =============================================================================

/// Load the configuration at `path`, or the operating-hours meter if none.
pub fn load_config(path: Option<&Path>) -> Result<MeterConfig, OdometerError> {
    match path {
        Some(path) => {
            let config = MeterConfig::load(path)?;
            tracing::info!(
                "Loaded layout with {} stages from {}",
                config.stages.len(),
                path.display()
            );
            Ok(config)
        }
        None => {
            tracing::debug!("No config given, using the operating-hours meter");
            Ok(MeterConfig::default())
        }
    }
}
