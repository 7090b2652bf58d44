//! Target tracking: who is currently inside the weapon's detection volume.

use sightline::TriggerEvent;

use crate::target::{TargetId, TargetWorld};

/// Ordered set of targets eligible for resolution.
///
/// Targets are kept in the order they entered range so that resolution is
/// deterministic: a single-target weapon always hits the earliest-tracked
/// target that has a clear line of sight.
///
/// # Invariants
///
/// - No duplicates
/// - A target is only added through [`on_enter_range`](Self::on_enter_range)
///   and only while it is alive
///
/// # Example
///
/// ```
/// use std::collections::BTreeMap;
/// use glam::Vec3;
/// use gunline_core::target::{Combatant, TargetId};
/// use gunline_core::tracker::TargetTracker;
///
/// let mut world = BTreeMap::new();
/// world.insert(TargetId::new(1), Combatant::new(Vec3::Z * 5.0, 20.0));
///
/// let mut tracker = TargetTracker::new();
/// assert!(tracker.on_enter_range(TargetId::new(1), &world));
/// assert!(!tracker.on_enter_range(TargetId::new(1), &world));
/// assert_eq!(tracker.current_targets(), &[TargetId::new(1)]);
///
/// tracker.on_exit_range(TargetId::new(1));
/// assert!(tracker.is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TargetTracker {
    tracked: Vec<TargetId>,
}

impl TargetTracker {
    /// Creates an empty tracker.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start tracking a target that entered range.
    ///
    /// Ignored if the target is already tracked, dead, or unknown to
    /// `world`. Returns `true` if the target was added.
    pub fn on_enter_range(&mut self, id: TargetId, world: &dyn TargetWorld) -> bool {
        if self.tracked.contains(&id) || !world.is_alive(id) {
            return false;
        }
        self.tracked.push(id);
        tracing::trace!(target_id = %id, tracked = self.tracked.len(), "target entered range");
        true
    }

    /// Stop tracking a target that left range. No-op if it was not tracked.
    pub fn on_exit_range(&mut self, id: TargetId) {
        if let Some(index) = self.tracked.iter().position(|t| *t == id) {
            self.tracked.remove(index);
            tracing::trace!(target_id = %id, tracked = self.tracked.len(), "target left range");
        }
    }

    /// Route a trigger-volume event to the matching range handler.
    pub fn apply(&mut self, event: TriggerEvent, world: &dyn TargetWorld) {
        match event {
            TriggerEvent::Enter(owner) => {
                self.on_enter_range(TargetId::new(owner), world);
            }
            TriggerEvent::Exit(owner) => self.on_exit_range(TargetId::new(owner)),
        }
    }

    /// Drop targets that died or despawned since they entered range.
    ///
    /// Returns the number of targets removed. Order of the survivors is kept.
    pub fn prune(&mut self, world: &dyn TargetWorld) -> usize {
        let before = self.tracked.len();
        self.tracked.retain(|id| world.is_alive(*id));
        let removed = before - self.tracked.len();
        if removed > 0 {
            tracing::trace!(removed, "pruned dead targets");
        }
        removed
    }

    /// Tracked targets in the order they entered range.
    #[must_use]
    pub fn current_targets(&self) -> &[TargetId] {
        &self.tracked
    }

    /// Returns `true` if `id` is tracked.
    #[must_use]
    pub fn contains(&self, id: TargetId) -> bool {
        self.tracked.contains(&id)
    }

    /// Number of tracked targets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tracked.len()
    }

    /// Returns `true` if nothing is tracked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tracked.is_empty()
    }

    /// Forget every target.
    pub fn clear(&mut self) {
        self.tracked.clear();
    }
}
