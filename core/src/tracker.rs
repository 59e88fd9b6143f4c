//! Parse-scoped encounter tracking and required-option verification.
//!
//! A tracker is created for one registry level at the start of a pass (or of
//! a sub-option group) and consumed by [`EncounterTracker::finish`], so
//! encounter state can never leak from one parse into the next.

use crate::types::Definition;

/// Records which definitions of one registry have been seen in this pass.
#[derive(Debug, Clone)]
pub(crate) struct EncounterTracker {
    seen: Vec<bool>,
}

impl EncounterTracker {
    pub(crate) fn new(len: usize) -> Self {
        Self {
            seen: vec![false; len],
        }
    }

    /// Marks the definition at `index` as seen.
    ///
    /// Returns `false` when it was already seen and does not allow
    /// duplicates; the mark stays set.
    pub(crate) fn encounter<D: Definition>(&mut self, index: usize, def: &D) -> bool {
        let Some(seen) = self.seen.get_mut(index) else {
            return false;
        };
        if *seen && !def.flags().duplicates_allowed {
            return false;
        }
        *seen = true;
        true
    }

    /// Returns the first required definition, in registration order, that
    /// was never seen.
    pub(crate) fn finish<D: Definition>(self, defs: &[D]) -> Option<&D> {
        defs.iter()
            .zip(self.seen)
            .find(|(def, seen)| def.flags().required && !seen)
            .map(|(def, _)| def)
    }
}
