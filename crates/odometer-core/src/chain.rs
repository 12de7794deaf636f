//! # Chain
//!
//! A fixed, acyclic sequence of stages forming one odometer.
//!
//! Stages live side by side in a single table, least significant first. A
//! stage's continuation never holds a reference to the next stage: the carry is
//! delivered by index, by handing the ripple the remaining (more significant)
//! part of the table. The table is built once from a resolved [`Layout`] and its
//! topology never changes afterwards.
//!
//! ```text
//!  tick()
//!    │
//!    ▼
//! ┌────────┐ carry ┌─────────┐ carry ┌─────────┐ carry ┌───────┐ carry ┌──────┐
//! │ tenths │──────▶│ seconds │──────▶│ minutes │──────▶│ hours │──────▶│ days │
//! └────────┘       └─────────┘       └─────────┘       └───────┘       └──────┘
//!  slot 0            slot 1            slot 2           slot 3          slot 4
//! ```

use crate::layout::{Layout, StageSpec};
use crate::policy::{Continuation, FAULT_REASON, Hook};
use crate::{Incrementable, Modulus, OdometerError, Outcome, OverflowPolicy, Reading, Stage};

// =============================================================================
// SLOT
// =============================================================================

#[derive(Debug)]
struct Slot {
    name: String,
    stage: Stage,
    continuation: Continuation,
}

/// Increment the first slot of `slots`, carrying into the rest as needed.
///
/// An empty table absorbs the carry: that is the terminal stage wrapping.
fn ripple(slots: &mut [Slot]) -> Result<Outcome, OdometerError> {
    let Some((slot, upper)) = slots.split_first_mut() else {
        return Ok(Outcome::Accepted);
    };
    let Slot {
        name,
        stage,
        continuation,
    } = slot;

    stage.incr_then(|| match continuation {
        Continuation::Policy(OverflowPolicy::Carry) => ripple(upper),
        Continuation::Policy(OverflowPolicy::Sticky) => Ok(Outcome::Rejected),
        Continuation::Policy(OverflowPolicy::Fault) => {
            Err(OdometerError::fault(name.as_str(), FAULT_REASON))
        }
        Continuation::Hook(hook) => hook.incr(),
    })
}

// =============================================================================
// ADVANCE REPORT
// =============================================================================

/// Summary of [`Chain::advance`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdvanceReport {
    /// Ticks that were absorbed.
    pub accepted: u64,
    /// Ticks refused by a saturated stage (the chain did not move).
    pub rejected: u64,
    /// The fault that stopped the run, if any. The faulting tick is not counted.
    pub fault: Option<OdometerError>,
}

impl AdvanceReport {
    /// Ticks that completed, accepted or rejected.
    #[must_use]
    pub fn completed(&self) -> u64 {
        self.accepted.saturating_add(self.rejected)
    }

    #[must_use]
    pub fn is_faulted(&self) -> bool {
        self.fault.is_some()
    }
}

// =============================================================================
// CHAIN
// =============================================================================

/// An odometer: stages wired in strictly increasing significance.
#[derive(Debug)]
pub struct Chain {
    slots: Vec<Slot>,
}

impl Chain {
    /// Start a builder.
    #[must_use]
    pub fn builder() -> ChainBuilder {
        ChainBuilder::new()
    }

    /// Build a chain from a layout, all stages at zero.
    pub fn from_layout(layout: &Layout) -> Result<Self, OdometerError> {
        Self::assemble(layout, Vec::new())
    }

    fn assemble(layout: &Layout, mut hooks: Vec<Option<Hook>>) -> Result<Self, OdometerError> {
        let bound = layout.resolve()?;
        hooks.resize_with(layout.stages.len(), || None);

        let slots = bound
            .into_iter()
            .map(|b| {
                let continuation = match hooks[b.source].take() {
                    Some(hook) => Continuation::Hook(hook),
                    None => Continuation::Policy(b.policy),
                };
                Slot {
                    name: b.name,
                    stage: Stage::new(b.modulus),
                    continuation,
                }
            })
            .collect();

        Ok(Self { slots })
    }

    /// Advance by one tick.
    ///
    /// Only the least significant stage is touched directly; the carry ripples
    /// through the continuations. On `Err` no stage has changed.
    pub fn tick(&mut self) -> Result<Outcome, OdometerError> {
        ripple(&mut self.slots)
    }

    /// Tick up to `ticks` times, stopping at the first fault.
    pub fn advance(&mut self, ticks: u64) -> AdvanceReport {
        let mut report = AdvanceReport::default();
        for _ in 0..ticks {
            match self.tick() {
                Ok(Outcome::Accepted) => report.accepted += 1,
                Ok(Outcome::Rejected) => report.rejected += 1,
                Err(e) => {
                    report.fault = Some(e);
                    break;
                }
            }
        }
        report
    }

    /// Stage views, least significant first.
    #[must_use]
    pub fn readings(&self) -> Vec<Reading> {
        self.slots
            .iter()
            .map(|s| Reading::new(s.name.as_str(), s.stage.value(), s.stage.modulus()))
            .collect()
    }

    /// View of the named stage.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Reading> {
        self.slots
            .iter()
            .find(|s| s.name == name)
            .map(|s| Reading::new(s.name.as_str(), s.stage.value(), s.stage.modulus()))
    }

    /// Current values, least significant first.
    #[must_use]
    pub fn values(&self) -> Vec<u64> {
        self.slots.iter().map(|s| s.stage.value()).collect()
    }

    /// Stage names, least significant first.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.slots.iter().map(|s| s.name.as_str())
    }

    /// Overflow policy of each stage; `None` where a hook is attached.
    #[must_use]
    pub fn policies(&self) -> Vec<Option<OverflowPolicy>> {
        self.slots.iter().map(|s| s.continuation.policy()).collect()
    }

    /// Number of stages; never zero.
    #[must_use]
    pub fn stage_count(&self) -> usize {
        self.slots.len()
    }

    /// Set every stage back to zero. Topology is kept.
    pub fn reset(&mut self) {
        for slot in &mut self.slots {
            slot.stage.reset();
        }
    }

    /// The count the chain represents, read as a mixed-radix number.
    ///
    /// Equals the number of ticks taken as long as nothing was rejected and
    /// the terminal stage never wrapped. `None` if it does not fit a `u128`.
    #[must_use]
    pub fn total(&self) -> Option<u128> {
        let mut total: u128 = 0;
        let mut weight: u128 = 1;
        for (i, slot) in self.slots.iter().enumerate() {
            if i > 0 {
                if let Modulus::Bounded(m) = self.slots[i - 1].stage.modulus() {
                    weight = weight.checked_mul(u128::from(m.get()))?;
                }
            }
            let term = weight.checked_mul(u128::from(slot.stage.value()))?;
            total = total.checked_add(term)?;
        }
        Some(total)
    }
}

impl Incrementable for Chain {
    /// A whole chain can serve as another stage's continuation.
    fn incr(&mut self) -> Result<Outcome, OdometerError> {
        self.tick()
    }
}

// =============================================================================
// BUILDER
// =============================================================================

/// Builds a chain least significant stage first.
///
/// Each added stage becomes the `next` of the stage added before it, so the
/// builder can only produce a simple path. [`ChainBuilder::policy`] and
/// [`ChainBuilder::hook`] apply to the most recently added stage.
#[derive(Default)]
pub struct ChainBuilder {
    layout: Layout,
    hooks: Vec<Option<Hook>>,
}

impl ChainBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a stage described by `spec`; its own `next` is ignored.
    #[must_use]
    pub fn push(mut self, mut spec: StageSpec) -> Self {
        spec.next = None;
        if let Some(previous) = self.layout.stages.last_mut() {
            previous.next = Some(spec.name.clone());
        }
        self.layout.stages.push(spec);
        self.hooks.push(None);
        self
    }

    /// Add a bounded carrying stage.
    #[must_use]
    pub fn stage(self, name: impl Into<String>, modulus: u64) -> Self {
        self.push(StageSpec::bounded(name, modulus))
    }

    /// Add an unbounded stage. Only valid as the last stage.
    #[must_use]
    pub fn unbounded(self, name: impl Into<String>) -> Self {
        self.push(StageSpec::unbounded(name))
    }

    /// Set the overflow policy of the last added stage.
    #[must_use]
    pub fn policy(mut self, policy: OverflowPolicy) -> Self {
        if let Some(last) = self.layout.stages.last_mut() {
            last.policy = policy;
        }
        self
    }

    /// Replace the continuation of the last added stage with `hook`.
    #[must_use]
    pub fn hook<H>(mut self, hook: H) -> Self
    where
        H: Incrementable + Send + 'static,
    {
        if let Some(last) = self.hooks.last_mut() {
            *last = Some(Box::new(hook));
        }
        self
    }

    /// Validate and wire the chain.
    pub fn build(self) -> Result<Chain, OdometerError> {
        Chain::assemble(&self.layout, self.hooks)
    }
}

impl std::fmt::Debug for ChainBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChainBuilder")
            .field("layout", &self.layout)
            .field("hooks", &self.hooks.iter().filter(|h| h.is_some()).count())
            .finish()
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::{Arc, Mutex};

    fn pairs(chain: &Chain) -> (u64, u64) {
        let v = chain.values();
        (v[0], v[1])
    }

    #[test]
    fn carry_into_unbounded_terminal() {
        let mut chain = Chain::builder()
            .stage("lower", 3)
            .unbounded("upper")
            .build()
            .expect("build");

        let mut seen = vec![pairs(&chain)];
        for _ in 0..6 {
            chain.tick().expect("tick");
            seen.push(pairs(&chain));
        }
        assert_eq!(
            seen,
            vec![(0, 0), (1, 0), (2, 0), (0, 1), (1, 1), (2, 1), (0, 2)]
        );
    }

    #[test]
    fn bounded_terminal_wraps() {
        let mut chain = Chain::builder()
            .stage("lower", 2)
            .stage("upper", 2)
            .build()
            .expect("build");
        for _ in 0..4 {
            assert_eq!(chain.tick(), Ok(Outcome::Accepted));
        }
        assert_eq!(chain.values(), vec![0, 0]);
    }

    #[test]
    fn sticky_terminal_saturates() {
        let mut chain = Chain::builder()
            .stage("lower", 2)
            .stage("upper", 2)
            .policy(OverflowPolicy::Sticky)
            .build()
            .expect("build");
        let report = chain.advance(10);
        assert_eq!(chain.values(), vec![1, 1]);
        assert_eq!(report.accepted, 3);
        assert_eq!(report.rejected, 7);
    }

    #[test]
    fn sticky_lower_stage_never_reaches_upper() {
        let mut chain = Chain::builder()
            .stage("lower", 3)
            .policy(OverflowPolicy::Sticky)
            .stage("upper", 3)
            .policy(OverflowPolicy::Sticky)
            .build()
            .expect("build");
        for _ in 0..3 {
            chain.tick().expect("tick");
        }
        assert_eq!(chain.values(), vec![2, 0]);
        for _ in 0..10 {
            assert_eq!(chain.tick(), Ok(Outcome::Rejected));
            assert_eq!(chain.values(), vec![2, 0]);
        }
    }

    #[test]
    fn fault_leaves_chain_untouched() {
        let mut chain = Chain::builder()
            .stage("lower", 3)
            .stage("upper", 3)
            .policy(OverflowPolicy::Fault)
            .build()
            .expect("build");

        // lower 2, upper 2: the next tick overflows into the faulting top
        chain.advance(8);
        assert_eq!(chain.values(), vec![2, 2]);

        let err = chain.tick().expect_err("fault");
        assert_eq!(err, OdometerError::fault("upper", FAULT_REASON));
        assert_eq!(chain.values(), vec![2, 2]);
    }

    #[test]
    fn advance_stops_at_fault() {
        let mut chain = Chain::builder()
            .stage("only", 3)
            .policy(OverflowPolicy::Fault)
            .build()
            .expect("build");
        let report = chain.advance(100);
        assert_eq!(report.accepted, 2);
        assert_eq!(report.completed(), 2);
        assert!(report.is_faulted());
        assert_eq!(report.fault, Some(OdometerError::fault("only", FAULT_REASON)));
        assert_eq!(chain.values(), vec![2]);
    }

    #[test]
    fn hook_receives_terminal_carry() {
        let carries = Arc::new(AtomicU32::new(0));
        let counter = Arc::clone(&carries);
        let mut chain = Chain::builder()
            .stage("lower", 2)
            .hook(move || -> Result<Outcome, OdometerError> {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(Outcome::Accepted)
            })
            .build()
            .expect("build");
        chain.advance(7);
        assert_eq!(carries.load(Ordering::SeqCst), 3);
        assert_eq!(chain.policies(), vec![None]);
    }

    #[test]
    fn hook_error_propagates_untouched() {
        let mut chain = Chain::builder()
            .stage("lower", 2)
            .stage("upper", 2)
            .hook(|| -> Result<Outcome, OdometerError> {
                Err(OdometerError::fault("external", "offline"))
            })
            .build()
            .expect("build");
        chain.advance(3);
        assert_eq!(chain.values(), vec![1, 1]);
        assert_eq!(
            chain.tick(),
            Err(OdometerError::fault("external", "offline"))
        );
        assert_eq!(chain.values(), vec![1, 1]);
    }

    #[test]
    fn chain_as_continuation_of_another() {
        let inner = Arc::new(Mutex::new(
            Chain::builder()
                .stage("inner", 2)
                .policy(OverflowPolicy::Sticky)
                .build()
                .expect("build"),
        ));
        let handle = Arc::clone(&inner);
        let mut outer = Chain::builder()
            .stage("outer", 2)
            .hook(move || -> Result<Outcome, OdometerError> {
                handle
                    .lock()
                    .map_err(|_| OdometerError::fault("inner", "poisoned"))?
                    .tick()
            })
            .build()
            .expect("build");

        // inner takes the first carry, then saturates and freezes outer
        outer.advance(6);
        let inner_values = inner.lock().expect("lock").values();
        assert_eq!(inner_values, vec![1]);
        assert_eq!(outer.values(), vec![1]);
    }

    #[test]
    fn readings_and_lookup() {
        let mut chain = Chain::builder()
            .stage("tenths", 10)
            .unbounded("seconds")
            .build()
            .expect("build");
        chain.advance(23);

        let readings = chain.readings();
        assert_eq!(readings.len(), 2);
        assert_eq!(readings[0].value, 3);
        assert_eq!(readings[1].value, 2);
        assert_eq!(readings, chain.readings());

        let seconds = chain.get("seconds").expect("stage");
        assert_eq!(seconds.modulus, Modulus::Unbounded);
        assert!(chain.get("minutes").is_none());
        assert_eq!(chain.names().collect::<Vec<_>>(), vec!["tenths", "seconds"]);
    }

    #[test]
    fn total_tracks_ticks() {
        let mut chain = Chain::from_layout(&Layout::hours_meter()).expect("build");
        chain.advance(12_345);
        assert_eq!(chain.total(), Some(12_345));
        chain.reset();
        assert_eq!(chain.total(), Some(0));
        assert_eq!(chain.stage_count(), 5);
    }

    #[test]
    fn builder_rejects_invalid_stages() {
        assert_eq!(
            Chain::builder().build().map(|_| ()),
            Err(OdometerError::EmptyChain)
        );
        assert_eq!(
            Chain::builder().stage("a", 0).build().map(|_| ()),
            Err(OdometerError::ZeroModulus)
        );
        assert_eq!(
            Chain::builder()
                .unbounded("a")
                .stage("b", 2)
                .build()
                .map(|_| ()),
            Err(OdometerError::UnboundedInterior("a".to_string()))
        );
        assert_eq!(
            Chain::builder()
                .stage("a", 2)
                .stage("a", 2)
                .build()
                .map(|_| ()),
            Err(OdometerError::DuplicateStage("a".to_string()))
        );
    }

    #[test]
    fn chain_is_send() {
        fn assert_send<T: Send>() {}
        assert_send::<Chain>();
    }
}
