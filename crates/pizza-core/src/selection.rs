//! # Selection State
//!
//! The in-progress choice set for one pizza order line.
//!
//! ## State Machine
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   ┌──────────────────────┐   2nd flavor (automatic)  ┌────────────────┐│
//! │   │        WHOLE         │ ────────────────────────► │     SPLIT      ││
//! │   │  half: Full          │                           │ Half1 | Half2  ││
//! │   │  0..1 flavor         │ ◄──────────────────────── │ 0..2 flavors   ││
//! │   │                      │  set_split_mode(false)    │                ││
//! │   │                      │  only with ≤ 1 flavor     │                ││
//! │   │                      │ ────────────────────────► │                ││
//! │   └──────────────────────┘  set_split_mode(true)     └────────────────┘│
//! │                             only with ≤ 1 flavor                        │
//! │                                                                         │
//! │  Removing flavors NEVER reverts Split → Whole on its own.               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Ingredient Cycle (per ingredient, per half)
//! ```text
//!   unset ──toggle──► Add ──toggle(Remove)──► Remove ──toggle(Remove)──► unset
//! ```
//!
//! ## Failure Semantics
//! Every operation is a pure in-memory transform that either applies or
//! leaves the state untouched. Nothing here returns an error; the returned
//! `bool` only says whether anything changed, so the screen can keep the
//! affected control disabled instead of branching on failures.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use ts_rs::TS;

use crate::catalog::CustomizationLookup;
use crate::error::{CoreError, CoreResult};
use crate::types::{FlavorChoice, Half, IngredientAction, IngredientEdit};
use crate::validator::{validate_records, ValidationMode};
use crate::wire::{carried_ids, CustomizationRecord};
use crate::MAX_FLAVORS;

const WHOLE_HALVES: &[Half] = &[Half::Full];
const SPLIT_HALVES: &[Half] = &[Half::Half1, Half::Half2];

// =============================================================================
// Selection State
// =============================================================================

/// Aggregate root for one order line being customized.
///
/// ## Invariants
/// - At most one flavor per half, at most `MAX_FLAVORS` in total
/// - At most one ingredient edit per `(customization, half)` key
/// - Flavors and edits only use the halves of the current mode
///
/// Keyed maps make these invariants structural and make the state
/// independent of the order in which equivalent edits were applied.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionState {
    flavors: BTreeMap<Half, String>,
    edits: BTreeMap<(String, Half), IngredientAction>,
    split_mode: bool,
}

impl SelectionState {
    /// Creates an empty, whole-pizza selection.
    pub fn new() -> Self {
        SelectionState::default()
    }

    /// Rebuilds a selection from a persisted order item's records.
    ///
    /// Entries retired since the item was saved still resolve.
    ///
    /// ## Errors
    /// - `CoreError::InvalidLine` when the records break any interactive rule
    ///   (unknown ids, three flavors, mixed halves, ...)
    pub fn restore(
        records: &[CustomizationRecord],
        lookup: &impl CustomizationLookup,
    ) -> CoreResult<Self> {
        let (draft, violations) = validate_records(
            records,
            lookup,
            ValidationMode::Interactive,
            &carried_ids(records),
        );
        if !violations.is_empty() {
            return Err(CoreError::InvalidLine { violations });
        }

        Ok(SelectionState::from_checked_draft(draft))
    }

    /// Builds a state from a draft that already passed validation.
    pub(crate) fn from_checked_draft(draft: LineDraft) -> Self {
        SelectionState {
            flavors: draft
                .flavors
                .into_iter()
                .map(|f| (f.half, f.customization_id))
                .collect(),
            edits: draft
                .ingredient_edits
                .into_iter()
                .map(|e| ((e.customization_id, e.half), e.action))
                .collect(),
            split_mode: draft.split_mode,
        }
    }

    // -------------------------------------------------------------------------
    // Queries
    // -------------------------------------------------------------------------

    #[inline]
    pub fn is_split(&self) -> bool {
        self.split_mode
    }

    #[inline]
    pub fn flavor_count(&self) -> usize {
        self.flavors.len()
    }

    /// Halves addressable in the current mode.
    pub fn halves_in_use(&self) -> &'static [Half] {
        if self.split_mode {
            SPLIT_HALVES
        } else {
            WHOLE_HALVES
        }
    }

    /// True when `half` belongs to the current mode.
    pub fn is_half_in_use(&self, half: Half) -> bool {
        self.halves_in_use().contains(&half)
    }

    /// Flavor id placed on `half`, if any.
    pub fn flavor_on(&self, half: Half) -> Option<&str> {
        self.flavors.get(&half).map(String::as_str)
    }

    /// Half holding flavor `id`, if it is chosen.
    pub fn half_of_flavor(&self, id: &str) -> Option<Half> {
        self.flavors
            .iter()
            .find(|(_, flavor)| flavor.as_str() == id)
            .map(|(half, _)| *half)
    }

    /// Current action for an ingredient on a half.
    pub fn edit_for(&self, id: &str, half: Half) -> Option<IngredientAction> {
        self.edits.get(&(id.to_string(), half)).copied()
    }

    /// Chosen flavors, ordered by half.
    pub fn flavors(&self) -> Vec<FlavorChoice> {
        self.flavors
            .iter()
            .map(|(half, id)| FlavorChoice {
                customization_id: id.clone(),
                half: *half,
            })
            .collect()
    }

    /// Ingredient edits, ordered by customization id then half.
    pub fn ingredient_edits(&self) -> Vec<IngredientEdit> {
        self.edits
            .iter()
            .map(|((id, half), action)| IngredientEdit {
                customization_id: id.clone(),
                half: *half,
                action: *action,
            })
            .collect()
    }

    /// Edits recorded on one half.
    pub fn edits_on(&self, half: Half) -> Vec<IngredientEdit> {
        self.ingredient_edits()
            .into_iter()
            .filter(|e| e.half == half)
            .collect()
    }

    /// True when neither a flavor nor an edit is recorded.
    pub fn is_empty(&self) -> bool {
        self.flavors.is_empty() && self.edits.is_empty()
    }

    /// Whether the "divide into halves" switch should be enabled.
    pub fn can_toggle_split(&self) -> bool {
        self.flavors.len() < MAX_FLAVORS
    }

    /// Whether flavor `id` can currently be clicked.
    ///
    /// Chosen flavors can always be removed; new ones only while a slot is free.
    pub fn can_select_flavor(&self, id: &str) -> bool {
        self.half_of_flavor(id).is_some() || self.flavors.len() < MAX_FLAVORS
    }

    /// Per-half view for rendering. A half without a flavor reports `None`.
    pub fn half_views(&self) -> Vec<HalfView> {
        self.halves_in_use()
            .iter()
            .map(|half| HalfView {
                half: *half,
                flavor_id: self.flavors.get(half).cloned(),
                edits: self.edits_on(*half),
            })
            .collect()
    }

    /// Flat copy for serialization and validation.
    pub fn snapshot(&self) -> LineDraft {
        LineDraft {
            flavors: self.flavors(),
            ingredient_edits: self.ingredient_edits(),
            split_mode: self.split_mode,
        }
    }

    // -------------------------------------------------------------------------
    // Mutations
    // -------------------------------------------------------------------------

    /// Selects or deselects a flavor.
    ///
    /// ## Behavior
    /// - Chosen: removed from its half. Edits on that half stay put and the
    ///   mode does not change.
    /// - Not chosen, whole pizza with no flavor: placed on `Full`.
    /// - Not chosen, whole pizza with one flavor: the pizza splits. The
    ///   existing flavor and its `Full` edits move to `Half1`, the new flavor
    ///   takes `Half2`.
    /// - Not chosen, split pizza: placed on the first free half.
    /// - Not chosen and two flavors already selected: no-op.
    pub fn toggle_flavor(&mut self, id: &str) -> bool {
        if let Some(half) = self.half_of_flavor(id) {
            self.flavors.remove(&half);
            return true;
        }

        if self.flavors.len() >= MAX_FLAVORS {
            return false;
        }

        if self.split_mode {
            let free = SPLIT_HALVES
                .iter()
                .copied()
                .find(|half| !self.flavors.contains_key(half));
            return match free {
                Some(half) => {
                    self.flavors.insert(half, id.to_string());
                    true
                }
                None => false,
            };
        }

        match self.flavors.remove(&Half::Full) {
            None => {
                self.flavors.insert(Half::Full, id.to_string());
            }
            Some(existing) => {
                self.split_mode = true;
                self.flavors.insert(Half::Half1, existing);
                self.flavors.insert(Half::Half2, id.to_string());
                self.move_edits(Half::Full, Half::Half1);
            }
        }
        true
    }

    /// Toggles an ingredient edit on one half.
    ///
    /// ## Behavior
    /// - No edit for `(id, half)`: creates one with `Add`
    /// - Edit with the same action as `requested`: removes it
    /// - Edit with the opposite action: flips it to `requested`
    /// - `half` not in use for the current mode: no-op
    pub fn toggle_ingredient(&mut self, id: &str, half: Half, requested: IngredientAction) -> bool {
        if !self.is_half_in_use(half) {
            return false;
        }

        let key = (id.to_string(), half);
        match self.edits.get(&key).copied() {
            None => {
                self.edits.insert(key, IngredientAction::Add);
            }
            Some(current) if current == requested => {
                self.edits.remove(&key);
            }
            Some(_) => {
                self.edits.insert(key, requested);
            }
        }
        true
    }

    /// Advances an ingredient one step through unset → Add → Remove → unset.
    pub fn cycle_ingredient(&mut self, id: &str, half: Half) -> bool {
        let requested = match self.edit_for(id, half) {
            None => IngredientAction::Add,
            Some(_) => IngredientAction::Remove,
        };
        self.toggle_ingredient(id, half, requested)
    }

    /// Flips the manual "divide into halves" switch.
    ///
    /// ## Behavior
    /// - Only allowed with at most one flavor chosen; otherwise no-op
    /// - Enabling: a `Full` flavor moves to `Half1`; `Full` edits are dropped
    /// - Disabling: the remaining flavor moves to `Full`; half edits are dropped
    pub fn set_split_mode(&mut self, enabled: bool) -> bool {
        if enabled == self.split_mode || !self.can_toggle_split() {
            return false;
        }

        if enabled {
            if let Some(flavor) = self.flavors.remove(&Half::Full) {
                self.flavors.insert(Half::Half1, flavor);
            }
            self.edits.retain(|(_, half), _| *half != Half::Full);
        } else {
            let remaining: Vec<String> = std::mem::take(&mut self.flavors).into_values().collect();
            if let Some(flavor) = remaining.into_iter().next() {
                self.flavors.insert(Half::Full, flavor);
            }
            self.edits.retain(|(_, half), _| !half.is_split_half());
        }

        self.split_mode = enabled;
        true
    }

    fn move_edits(&mut self, from: Half, to: Half) {
        let moved: Vec<(String, IngredientAction)> = self
            .edits
            .iter()
            .filter(|((_, half), _)| *half == from)
            .map(|((id, _), action)| (id.clone(), *action))
            .collect();

        for (id, action) in moved {
            self.edits.remove(&(id.clone(), from));
            self.edits.insert((id, to), action);
        }
    }
}

// =============================================================================
// Views
// =============================================================================

/// Flat, serializable form of a pizza line.
///
/// Produced by [`SelectionState::snapshot`] and by decoding external records;
/// in the latter case it may break any rule, which is why the validator works
/// on this type rather than on `SelectionState`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct LineDraft {
    pub flavors: Vec<FlavorChoice>,
    pub ingredient_edits: Vec<IngredientEdit>,
    pub split_mode: bool,
}

impl LineDraft {
    pub fn is_empty(&self) -> bool {
        self.flavors.is_empty() && self.ingredient_edits.is_empty()
    }
}

/// What one half of the pizza shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct HalfView {
    pub half: Half,
    /// `None` renders as "no flavor".
    pub flavor_id: Option<String>,
    pub edits: Vec<IngredientEdit>,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_flavor_goes_on_full() {
        let mut state = SelectionState::new();
        assert!(state.toggle_flavor("pep"));
        assert!(!state.is_split());
        assert_eq!(state.flavor_on(Half::Full), Some("pep"));
    }

    #[test]
    fn test_second_flavor_forces_split() {
        let mut state = SelectionState::new();
        state.toggle_flavor("pep");
        state.toggle_ingredient("toc", Half::Full, IngredientAction::Add);

        assert!(state.toggle_flavor("haw"));
        assert!(state.is_split());
        assert_eq!(state.flavor_on(Half::Half1), Some("pep"));
        assert_eq!(state.flavor_on(Half::Half2), Some("haw"));
        assert_eq!(state.flavor_on(Half::Full), None);
        assert_eq!(state.edit_for("toc", Half::Half1), Some(IngredientAction::Add));
        assert_eq!(state.edit_for("toc", Half::Full), None);
    }

    #[test]
    fn test_third_flavor_is_noop() {
        let mut state = SelectionState::new();
        state.toggle_flavor("pep");
        state.toggle_flavor("haw");
        let before = state.clone();

        assert!(!state.can_select_flavor("mex"));
        assert!(!state.toggle_flavor("mex"));
        assert_eq!(state, before);
    }

    #[test]
    fn test_removing_flavor_keeps_split_and_edits() {
        let mut state = SelectionState::new();
        state.toggle_flavor("pep");
        state.toggle_flavor("haw");
        state.toggle_ingredient("toc", Half::Half2, IngredientAction::Add);

        assert!(state.toggle_flavor("haw"));
        assert!(state.is_split());
        assert_eq!(state.flavor_on(Half::Half2), None);
        assert_eq!(state.edit_for("toc", Half::Half2), Some(IngredientAction::Add));

        let views = state.half_views();
        assert_eq!(views.len(), 2);
        assert_eq!(views[1].flavor_id, None);
        assert_eq!(views[1].edits.len(), 1);
    }

    #[test]
    fn test_refilling_a_freed_half() {
        let mut state = SelectionState::new();
        state.toggle_flavor("pep");
        state.toggle_flavor("haw");
        state.toggle_flavor("pep");

        assert!(state.toggle_flavor("mex"));
        assert_eq!(state.flavor_on(Half::Half1), Some("mex"));
        assert_eq!(state.flavor_on(Half::Half2), Some("haw"));
    }

    #[test]
    fn test_ingredient_three_state_cycle() {
        let mut state = SelectionState::new();
        let original = state.clone();

        state.toggle_ingredient("toc", Half::Full, IngredientAction::Add);
        assert_eq!(state.edit_for("toc", Half::Full), Some(IngredientAction::Add));

        state.toggle_ingredient("toc", Half::Full, IngredientAction::Remove);
        assert_eq!(state.edit_for("toc", Half::Full), Some(IngredientAction::Remove));

        state.toggle_ingredient("toc", Half::Full, IngredientAction::Remove);
        assert_eq!(state, original);
    }

    #[test]
    fn test_new_edit_always_starts_as_add() {
        let mut state = SelectionState::new();
        state.toggle_ingredient("toc", Half::Full, IngredientAction::Remove);
        assert_eq!(state.edit_for("toc", Half::Full), Some(IngredientAction::Add));

        state.toggle_ingredient("toc", Half::Full, IngredientAction::Add);
        assert_eq!(state.edit_for("toc", Half::Full), None);
    }

    #[test]
    fn test_cycle_ingredient() {
        let mut state = SelectionState::new();
        state.cycle_ingredient("toc", Half::Full);
        assert_eq!(state.edit_for("toc", Half::Full), Some(IngredientAction::Add));
        state.cycle_ingredient("toc", Half::Full);
        assert_eq!(state.edit_for("toc", Half::Full), Some(IngredientAction::Remove));
        state.cycle_ingredient("toc", Half::Full);
        assert!(state.is_empty());
    }

    #[test]
    fn test_edit_on_unused_half_is_noop() {
        let mut state = SelectionState::new();
        assert!(!state.toggle_ingredient("toc", Half::Half1, IngredientAction::Add));
        assert!(state.is_empty());

        state.set_split_mode(true);
        assert!(!state.toggle_ingredient("toc", Half::Full, IngredientAction::Add));
        assert!(state.toggle_ingredient("toc", Half::Half2, IngredientAction::Add));
    }

    #[test]
    fn test_manual_split_discards_full_edits() {
        let mut state = SelectionState::new();
        state.toggle_flavor("pep");
        state.toggle_ingredient("toc", Half::Full, IngredientAction::Add);

        assert!(state.set_split_mode(true));
        assert!(state.is_split());
        assert_eq!(state.flavor_on(Half::Half1), Some("pep"));
        assert!(state.ingredient_edits().is_empty());
    }

    #[test]
    fn test_manual_unsplit_discards_half_edits() {
        let mut state = SelectionState::new();
        state.set_split_mode(true);
        state.toggle_flavor("haw");
        state.toggle_flavor("pep");
        state.toggle_flavor("haw");
        state.toggle_ingredient("toc", Half::Half1, IngredientAction::Add);

        assert_eq!(state.flavor_on(Half::Half2), Some("pep"));
        assert!(state.set_split_mode(false));
        assert!(!state.is_split());
        assert_eq!(state.flavor_on(Half::Full), Some("pep"));
        assert!(state.ingredient_edits().is_empty());
    }

    #[test]
    fn test_switch_disabled_with_two_flavors() {
        let mut state = SelectionState::new();
        state.toggle_flavor("pep");
        state.toggle_flavor("haw");

        assert!(!state.can_toggle_split());
        assert!(!state.set_split_mode(false));
        assert!(state.is_split());
    }

    #[test]
    fn test_set_split_mode_same_value_is_noop() {
        let mut state = SelectionState::new();
        assert!(!state.set_split_mode(false));
        assert!(state.set_split_mode(true));
        assert!(!state.set_split_mode(true));
    }

    #[test]
    fn test_snapshot_is_ordered() {
        let mut state = SelectionState::new();
        state.toggle_flavor("pep");
        state.toggle_flavor("haw");
        state.toggle_ingredient("toc", Half::Half2, IngredientAction::Add);
        state.toggle_ingredient("cha", Half::Half1, IngredientAction::Add);

        let draft = state.snapshot();
        assert!(draft.split_mode);
        assert_eq!(draft.flavors[0].half, Half::Half1);
        assert_eq!(draft.ingredient_edits[0].customization_id, "cha");
        assert_eq!(draft.ingredient_edits[1].customization_id, "toc");
    }
}
