//! # Layout
//!
//! Declarative description of a chain, bound lazily.
//!
//! Stages are named, and each stage names the stage it carries into (`next`).
//! Nothing is wired while the specs are being written down; [`Layout::resolve`]
//! binds the names only once every spec exists, so the order in which stages
//! are listed carries no meaning and no stage can refer to one that is not yet
//! constructed.
//!
//! Resolution fails fast on anything that would not form a single simple path
//! from the least significant stage to the terminal one:
//!
//! - `EmptyChain` – no stages
//! - `DuplicateStage` – two stages with the same name
//! - `UnknownStage` – `next` names a stage that does not exist
//! - `ContinuationCycle` – following `next` leads back to a visited stage
//! - `DetachedStage` – more than one stage is nobody's `next`
//! - `ZeroModulus` / `UnboundedInterior` – invalid bounds

use crate::primitives::{
    HOURS_PER_DAY, MAX_STAGES, MINUTES_PER_HOUR, SECONDS_PER_MINUTE, TENTHS_PER_SECOND,
};
use crate::{Modulus, OdometerError, OverflowPolicy};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// =============================================================================
// STAGE SPEC
// =============================================================================

/// Description of one stage. Unknown keys are refused.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StageSpec {
    /// Unique name of the stage.
    pub name: String,
    /// Modulus; `None` means unbounded (terminal stage only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modulus: Option<u64>,
    /// What happens when the stage overflows.
    #[serde(default)]
    pub policy: OverflowPolicy,
    /// Name of the next more significant stage; `None` marks the terminal stage.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next: Option<String>,
}

impl StageSpec {
    /// A bounded carrying stage.
    #[must_use]
    pub fn bounded(name: impl Into<String>, modulus: u64) -> Self {
        Self {
            name: name.into(),
            modulus: Some(modulus),
            policy: OverflowPolicy::Carry,
            next: None,
        }
    }

    /// An unbounded stage.
    #[must_use]
    pub fn unbounded(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            modulus: None,
            policy: OverflowPolicy::Carry,
            next: None,
        }
    }

    #[must_use]
    pub fn with_policy(mut self, policy: OverflowPolicy) -> Self {
        self.policy = policy;
        self
    }

    #[must_use]
    pub fn with_next(mut self, next: impl Into<String>) -> Self {
        self.next = Some(next.into());
        self
    }
}

/// A validated stage, positioned in significance order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundStage {
    pub name: String,
    pub modulus: Modulus,
    pub policy: OverflowPolicy,
    /// Index of the originating spec in [`Layout::stages`].
    pub source: usize,
}

// =============================================================================
// LAYOUT
// =============================================================================

/// An unordered set of stage specs linked by name.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Layout {
    #[serde(default)]
    pub stages: Vec<StageSpec>,
}

impl Layout {
    /// Create a layout from specs.
    #[must_use]
    pub fn new(stages: Vec<StageSpec>) -> Self {
        Self { stages }
    }

    /// The operating-hours meter: tenths, seconds, minutes, hours and
    /// an unbounded day count.
    ///
    /// Listed most significant first; the links define the order.
    #[must_use]
    pub fn hours_meter() -> Self {
        Self::new(vec![
            StageSpec::unbounded("days"),
            StageSpec::bounded("hours", HOURS_PER_DAY).with_next("days"),
            StageSpec::bounded("minutes", MINUTES_PER_HOUR).with_next("hours"),
            StageSpec::bounded("seconds", SECONDS_PER_MINUTE).with_next("minutes"),
            StageSpec::bounded("tenths", TENTHS_PER_SECOND).with_next("seconds"),
        ])
    }

    /// Bind the named links and return the stages least significant first.
    pub fn resolve(&self) -> Result<Vec<BoundStage>, OdometerError> {
        let count = self.stages.len();
        if count == 0 {
            return Err(OdometerError::EmptyChain);
        }
        if count > MAX_STAGES {
            return Err(OdometerError::ConfigError(format!(
                "Layout has {} stages, maximum is {}",
                count, MAX_STAGES
            )));
        }

        // Name -> spec index
        let mut index = BTreeMap::new();
        for (i, spec) in self.stages.iter().enumerate() {
            if spec.name.is_empty() {
                return Err(OdometerError::ConfigError(
                    "Stage name must not be empty".to_string(),
                ));
            }
            if index.insert(spec.name.as_str(), i).is_some() {
                return Err(OdometerError::DuplicateStage(spec.name.clone()));
            }
        }

        let mut next = Vec::with_capacity(count);
        let mut targeted = vec![false; count];
        for (i, spec) in self.stages.iter().enumerate() {
            let Some(target) = &spec.next else {
                next.push(None);
                continue;
            };
            let &t = index
                .get(target.as_str())
                .ok_or_else(|| OdometerError::UnknownStage(target.clone()))?;
            if t == i {
                return Err(OdometerError::ContinuationCycle(spec.name.clone()));
            }
            targeted[t] = true;
            next.push(Some(t));
        }

        // Exactly one stage may be nobody's continuation: the least significant.
        let mut roots = (0..count).filter(|&i| !targeted[i]);
        let root = roots
            .next()
            .ok_or_else(|| OdometerError::ContinuationCycle(self.stages[0].name.clone()))?;
        if let Some(extra) = roots.next() {
            return Err(OdometerError::DetachedStage(self.stages[extra].name.clone()));
        }

        let mut visited = vec![false; count];
        let mut order = Vec::with_capacity(count);
        let mut current = Some(root);
        while let Some(i) = current {
            if visited[i] {
                return Err(OdometerError::ContinuationCycle(self.stages[i].name.clone()));
            }
            visited[i] = true;
            order.push(i);
            current = next[i];
        }

        // Anything left over forms a cycle of its own.
        if let Some(i) = visited.iter().position(|v| !v) {
            return Err(OdometerError::ContinuationCycle(self.stages[i].name.clone()));
        }

        let terminal = order.len() - 1;
        order
            .iter()
            .enumerate()
            .map(|(position, &i)| -> Result<BoundStage, OdometerError> {
                let spec = &self.stages[i];
                let modulus = Modulus::from_option(spec.modulus)?;
                if modulus.is_unbounded() && position != terminal {
                    return Err(OdometerError::UnboundedInterior(spec.name.clone()));
                }
                Ok(BoundStage {
                    name: spec.name.clone(),
                    modulus,
                    policy: spec.policy,
                    source: i,
                })
            })
            .collect()
    }
}

// =============================================================================
// TESTS
// =============================================================================
