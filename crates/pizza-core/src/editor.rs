//! # Pizza Line Editor
//!
//! One customization session for one order line: the state, the product's
//! pricing parameters and the catalog, bundled so every mutation comes back
//! with fresh violations and a fresh charge.
//!
//! ## Session Lifecycle
//! ```text
//!   new() / resume()
//!         │
//!         ▼
//!   ┌───────────────┐  toggle_flavor / toggle_ingredient /
//!   │    editing    │  cycle_ingredient / set_split_mode
//!   │               │ ──────────────────────────────────► LineEvaluation
//!   └───────┬───────┘       (Interactive rules)
//!           │
//!     finish()  ─── Submission rules ───► Ok(FinishedLine) | Err(InvalidLine)
//!     drop      ─── discarded, nothing persisted
//! ```

use std::collections::BTreeSet;

use crate::catalog::CustomizationLookup;
use crate::error::{CoreError, CoreResult, StructuralViolation};
use crate::pricing::{calculate_charge, ToppingCharge};
use crate::selection::SelectionState;
use crate::types::{Half, IngredientAction, ProductPizzaConfig};
use crate::validator::{validate_selection_carrying, ValidationMode};
use crate::wire::{carried_ids, encode, CustomizationRecord};

/// What the screen needs after a mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineEvaluation {
    /// Whether the mutation changed anything.
    pub changed: bool,
    pub violations: Vec<StructuralViolation>,
    /// Present only while the line prices cleanly.
    pub charge: Option<ToppingCharge>,
}

impl LineEvaluation {
    pub fn messages(&self) -> Vec<String> {
        self.violations.iter().map(ToString::to_string).collect()
    }
}

/// Output of a successful session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinishedLine {
    pub records: Vec<CustomizationRecord>,
    pub charge: ToppingCharge,
}

/// Editing session over a borrowed catalog.
#[derive(Debug)]
pub struct PizzaLineEditor<'c, L: CustomizationLookup> {
    lookup: &'c L,
    config: ProductPizzaConfig,
    state: SelectionState,
    /// Ids of the saved line this session resumed; empty for a new line.
    carried: BTreeSet<String>,
}

impl<'c, L: CustomizationLookup> PizzaLineEditor<'c, L> {
    /// Starts a session on an empty, whole pizza.
    pub fn new(lookup: &'c L, config: ProductPizzaConfig) -> Self {
        PizzaLineEditor {
            lookup,
            config,
            state: SelectionState::new(),
            carried: BTreeSet::new(),
        }
    }

    /// Reopens a saved line for editing.
    ///
    /// Retired entries the line already held stay valid for the whole
    /// session; newly picked ones must be active.
    pub fn resume(
        lookup: &'c L,
        config: ProductPizzaConfig,
        records: &[CustomizationRecord],
    ) -> CoreResult<Self> {
        let state = SelectionState::restore(records, lookup)?;
        Ok(PizzaLineEditor {
            lookup,
            config,
            state,
            carried: carried_ids(records),
        })
    }

    pub fn state(&self) -> &SelectionState {
        &self.state
    }

    pub fn config(&self) -> &ProductPizzaConfig {
        &self.config
    }

    /// Re-evaluates without mutating.
    pub fn evaluate(&self) -> LineEvaluation {
        self.evaluation(false)
    }

    pub fn toggle_flavor(&mut self, id: &str) -> LineEvaluation {
        let changed = self.state.toggle_flavor(id);
        self.evaluation(changed)
    }

    pub fn toggle_ingredient(
        &mut self,
        id: &str,
        half: Half,
        requested: IngredientAction,
    ) -> LineEvaluation {
        let changed = self.state.toggle_ingredient(id, half, requested);
        self.evaluation(changed)
    }

    pub fn cycle_ingredient(&mut self, id: &str, half: Half) -> LineEvaluation {
        let changed = self.state.cycle_ingredient(id, half);
        self.evaluation(changed)
    }

    pub fn set_split_mode(&mut self, enabled: bool) -> LineEvaluation {
        let changed = self.state.set_split_mode(enabled);
        self.evaluation(changed)
    }

    /// Confirms the line.
    ///
    /// ## Errors
    /// - `CoreError::InvalidLine` with every submission violation
    /// - `CoreError::CustomizationNotFound` if pricing cannot resolve an id
    /// - `CoreError::ChargeOverflow` if the charge is out of range
    pub fn finish(self) -> CoreResult<FinishedLine> {
        let violations = validate_selection_carrying(
            &self.state,
            self.lookup,
            ValidationMode::Submission,
            &self.carried,
        );
        if !violations.is_empty() {
            return Err(CoreError::InvalidLine { violations });
        }

        let charge = calculate_charge(&self.state, self.lookup, &self.config)?;
        Ok(FinishedLine {
            records: encode(&self.state),
            charge,
        })
    }

    fn evaluation(&self, changed: bool) -> LineEvaluation {
        let violations = validate_selection_carrying(
            &self.state,
            self.lookup,
            ValidationMode::Interactive,
            &self.carried,
        );
        let charge = if violations.is_empty() {
            calculate_charge(&self.state, self.lookup, &self.config).ok()
        } else {
            None
        };

        LineEvaluation {
            changed,
            violations,
            charge,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
