//! # Pizza Line Validator
//!
//! Structural and business-rule checks over a pizza line.
//!
//! ## Where It Runs
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Interactive editing                Order submission                    │
//! │  ───────────────────                ────────────────                    │
//! │  after EVERY mutation               once, over extracted / saved items  │
//! │  ValidationMode::Interactive        ValidationMode::Submission          │
//! │  violations shown, editing goes on  violations block acceptance         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Rules
//! | # | Rule                 | Violation                                  |
//! |---|----------------------|--------------------------------------------|
//! | 1 | Flavor cardinality   | `TooManyFlavors`, `FlavorHalfConflict`     |
//! | 2 | Half consistency     | `HalfMismatch`                             |
//! | 3 | Personalization      | `PersonalizationRequired` (submission only)|
//! | 4 | Reference integrity  | `UnresolvedReference`, `InactiveReference` |
//! | 5 | Kind consistency     | `KindMismatch`                             |
//! | 6 | Duplicate edit       | `DuplicateEdit`                            |
//! | 7 | Flavor action        | `FlavorRemoved` (records only)             |
//!
//! The validator never fails; it returns every violation it finds, in rule
//! order, each reported once.
//!
//! ## Retired Entries
//! A deactivated catalog entry still resolves, but only for lines that
//! already carried it when they were saved. The `carried` set passed to the
//! `*_carrying` variants holds those ids; everything else must be active.

use std::collections::{BTreeSet, HashMap, HashSet};

use crate::catalog::CustomizationLookup;
use crate::error::StructuralViolation;
use crate::selection::{LineDraft, SelectionState};
use crate::types::{CustomizationKind, Half, IngredientAction};
use crate::wire::{decode, CustomizationRecord};
use crate::MAX_FLAVORS;

/// Which rule set applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationMode {
    /// Transient invalid states are expected; personalization is not enforced.
    Interactive,
    /// Item is about to be accepted into an order.
    Submission,
}

/// Validates the live selection of an editing session.
pub fn validate_selection(
    state: &SelectionState,
    lookup: &impl CustomizationLookup,
    mode: ValidationMode,
) -> Vec<StructuralViolation> {
    validate_draft_carrying(&state.snapshot(), lookup, mode, &BTreeSet::new())
}

/// [`validate_selection`] for a session resumed from saved records.
pub fn validate_selection_carrying(
    state: &SelectionState,
    lookup: &impl CustomizationLookup,
    mode: ValidationMode,
    carried: &BTreeSet<String>,
) -> Vec<StructuralViolation> {
    validate_draft_carrying(&state.snapshot(), lookup, mode, carried)
}

/// Validates a flat line, typically decoded from external records.
///
/// ```rust
/// use pizza_core::{validate_draft, Catalog, LineDraft, StructuralViolation, ValidationMode};
///
/// let catalog = Catalog::new(vec![]).unwrap();
/// let violations = validate_draft(&LineDraft::default(), &catalog, ValidationMode::Submission);
/// assert_eq!(violations, vec![StructuralViolation::PersonalizationRequired]);
/// ```
pub fn validate_draft(
    draft: &LineDraft,
    lookup: &impl CustomizationLookup,
    mode: ValidationMode,
) -> Vec<StructuralViolation> {
    validate_draft_carrying(draft, lookup, mode, &BTreeSet::new())
}

/// [`validate_draft`], letting the ids in `carried` resolve even when retired.
pub fn validate_draft_carrying(
    draft: &LineDraft,
    lookup: &impl CustomizationLookup,
    mode: ValidationMode,
    carried: &BTreeSet<String>,
) -> Vec<StructuralViolation> {
    let mut violations = Vec::new();

    check_flavor_cardinality(draft, &mut violations);
    check_half_consistency(draft, &mut violations);
    if mode == ValidationMode::Submission {
        check_personalization(draft, &mut violations);
    }
    check_references(draft, lookup, carried, &mut violations);
    check_duplicate_edits(draft, &mut violations);

    violations
}

/// Decodes raw records and validates them in one pass.
///
/// Adds the one rule a decoded draft can no longer see: a record that names
/// a flavor must select it. `{pep, full, remove}` is flagged, not read as a
/// Pepperoni pick.
pub fn validate_records(
    records: &[CustomizationRecord],
    lookup: &impl CustomizationLookup,
    mode: ValidationMode,
    carried: &BTreeSet<String>,
) -> (LineDraft, Vec<StructuralViolation>) {
    let draft = decode(records, lookup);
    let mut violations = validate_draft_carrying(&draft, lookup, mode, carried);
    check_flavor_actions(records, lookup, &mut violations);

    (draft, violations)
}

fn check_flavor_cardinality(draft: &LineDraft, out: &mut Vec<StructuralViolation>) {
    if draft.flavors.len() > MAX_FLAVORS {
        out.push(StructuralViolation::TooManyFlavors {
            count: draft.flavors.len(),
            max: MAX_FLAVORS,
        });
    }

    let mut seen = HashSet::new();
    let mut conflicting = BTreeSet::new();
    for flavor in &draft.flavors {
        if !seen.insert(flavor.half) {
            conflicting.insert(flavor.half);
        }
    }
    out.extend(
        conflicting
            .into_iter()
            .map(|half| StructuralViolation::FlavorHalfConflict { half }),
    );
}

fn check_half_consistency(draft: &LineDraft, out: &mut Vec<StructuralViolation>) {
    let mode = if draft.split_mode { "split" } else { "whole" };
    let fits = |half: Half| half.is_split_half() == draft.split_mode;

    let placements = draft
        .flavors
        .iter()
        .map(|f| (&f.customization_id, f.half))
        .chain(
            draft
                .ingredient_edits
                .iter()
                .map(|e| (&e.customization_id, e.half)),
        );

    for (id, half) in placements {
        if !fits(half) {
            out.push(StructuralViolation::HalfMismatch {
                customization_id: id.clone(),
                half,
                mode,
            });
        }
    }
}

/// A flavor or at least one added ingredient. Removing toppings from a plain
/// pizza does not count.
fn check_personalization(draft: &LineDraft, out: &mut Vec<StructuralViolation>) {
    let has_addition = draft
        .ingredient_edits
        .iter()
        .any(|e| e.action == IngredientAction::Add);

    if draft.flavors.is_empty() && !has_addition {
        out.push(StructuralViolation::PersonalizationRequired);
    }
}

fn check_references(
    draft: &LineDraft,
    lookup: &impl CustomizationLookup,
    carried: &BTreeSet<String>,
    out: &mut Vec<StructuralViolation>,
) {
    let mut unresolved = Vec::new();
    let mut inactive = Vec::new();
    let mut mismatched = Vec::new();
    let mut reported = HashSet::new();

    let references = draft
        .flavors
        .iter()
        .map(|f| (&f.customization_id, CustomizationKind::Flavor))
        .chain(
            draft
                .ingredient_edits
                .iter()
                .map(|e| (&e.customization_id, CustomizationKind::Ingredient)),
        );

    for (id, expected) in references {
        if !reported.insert((id.as_str(), expected)) {
            continue;
        }
        match lookup.lookup(id) {
            None => {
                if !unresolved.contains(id) {
                    unresolved.push(id.clone());
                }
            }
            Some(entry) => {
                if !entry.is_active && !carried.contains(id) && !inactive.contains(id) {
                    inactive.push(id.clone());
                }
                if entry.kind != expected {
                    mismatched.push((id.clone(), expected));
                }
            }
        }
    }

    out.extend(
        unresolved
            .into_iter()
            .map(|customization_id| StructuralViolation::UnresolvedReference { customization_id }),
    );
    out.extend(
        inactive
            .into_iter()
            .map(|customization_id| StructuralViolation::InactiveReference { customization_id }),
    );
    out.extend(
        mismatched
            .into_iter()
            .map(|(customization_id, expected)| StructuralViolation::KindMismatch {
                customization_id,
                expected,
            }),
    );
}

fn check_duplicate_edits(draft: &LineDraft, out: &mut Vec<StructuralViolation>) {
    let mut counts: HashMap<(&str, Half), usize> = HashMap::new();
    let mut order = Vec::new();

    for edit in &draft.ingredient_edits {
        let key = (edit.customization_id.as_str(), edit.half);
        let count = counts.entry(key).or_insert(0);
        *count += 1;
        if *count == 2 {
            order.push(key);
        }
    }

    out.extend(
        order
            .into_iter()
            .map(|(id, half)| StructuralViolation::DuplicateEdit {
                customization_id: id.to_string(),
                half,
            }),
    );
}

fn check_flavor_actions(
    records: &[CustomizationRecord],
    lookup: &impl CustomizationLookup,
    out: &mut Vec<StructuralViolation>,
) {
    let mut reported = HashSet::new();

    for record in records {
        let id = record.pizza_customization_id.as_str();
        let is_flavor = lookup
            .lookup(id)
            .map_or(false, |entry| entry.kind == CustomizationKind::Flavor);

        if is_flavor && record.action == IngredientAction::Remove && reported.insert(id) {
            out.push(StructuralViolation::FlavorRemoved {
                customization_id: id.to_string(),
            });
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::types::{Customization, FlavorChoice, IngredientEdit};

    fn catalog() -> Catalog {
        Catalog::new(vec![
            Customization::flavor("pep", "Pepperoni", None, 4, 1),
            Customization::flavor("haw", "Hawaiana", None, 3, 2),
            Customization::flavor("mex", "Mexicana", None, 5, 3),
            Customization::ingredient("toc", "Tocino", 1, 10),
            Customization::ingredient("old", "Anchoas", 1, 11).deactivated(),
        ])
        .unwrap()
    }

    fn flavor(id: &str, half: Half) -> FlavorChoice {
        FlavorChoice {
            customization_id: id.to_string(),
            half,
        }
    }

    fn edit(id: &str, half: Half, action: IngredientAction) -> IngredientEdit {
        IngredientEdit {
            customization_id: id.to_string(),
            half,
            action,
        }
    }

    #[test]
    fn test_valid_selection_has_no_violations() {
        let catalog = catalog();
        let mut state = SelectionState::new();
        state.toggle_flavor("pep");
        state.toggle_ingredient("toc", Half::Full, IngredientAction::Add);

        assert!(validate_selection(&state, &catalog, ValidationMode::Submission).is_empty());
    }

    #[test]
    fn test_empty_line_only_fails_on_submission() {
        let catalog = catalog();
        let state = SelectionState::new();

        assert!(validate_selection(&state, &catalog, ValidationMode::Interactive).is_empty());
        assert_eq!(
            validate_selection(&state, &catalog, ValidationMode::Submission),
            vec![StructuralViolation::PersonalizationRequired]
        );
    }

    #[test]
    fn test_remove_only_line_requires_personalization() {
        let catalog = catalog();
        let mut state = SelectionState::new();
        state.toggle_ingredient("toc", Half::Full, IngredientAction::Add);
        state.toggle_ingredient("toc", Half::Full, IngredientAction::Remove);
        assert_eq!(state.edit_for("toc", Half::Full), Some(IngredientAction::Remove));

        assert_eq!(
            validate_selection(&state, &catalog, ValidationMode::Submission),
            vec![StructuralViolation::PersonalizationRequired]
        );
    }

    #[test]
    fn test_too_many_flavors_and_conflicts() {
        let draft = LineDraft {
            flavors: vec![
                flavor("pep", Half::Half1),
                flavor("haw", Half::Half2),
                flavor("mex", Half::Half2),
            ],
            ingredient_edits: vec![],
            split_mode: true,
        };

        let violations = validate_draft(&draft, &catalog(), ValidationMode::Submission);
        assert_eq!(
            violations,
            vec![
                StructuralViolation::TooManyFlavors { count: 3, max: 2 },
                StructuralViolation::FlavorHalfConflict { half: Half::Half2 },
            ]
        );
    }

    #[test]
    fn test_two_full_flavors_conflict() {
        let draft = LineDraft {
            flavors: vec![flavor("pep", Half::Full), flavor("haw", Half::Full)],
            ingredient_edits: vec![],
            split_mode: false,
        };

        let violations = validate_draft(&draft, &catalog(), ValidationMode::Interactive);
        assert_eq!(
            violations,
            vec![StructuralViolation::FlavorHalfConflict { half: Half::Full }]
        );
    }

    #[test]
    fn test_half_mismatch_both_directions() {
        let whole = LineDraft {
            flavors: vec![flavor("pep", Half::Half1)],
            ingredient_edits: vec![],
            split_mode: false,
        };
        assert!(matches!(
            validate_draft(&whole, &catalog(), ValidationMode::Interactive).as_slice(),
            [StructuralViolation::HalfMismatch { half: Half::Half1, mode: "whole", .. }]
        ));

        let split = LineDraft {
            flavors: vec![flavor("pep", Half::Half1)],
            ingredient_edits: vec![edit("toc", Half::Full, IngredientAction::Add)],
            split_mode: true,
        };
        assert!(matches!(
            validate_draft(&split, &catalog(), ValidationMode::Interactive).as_slice(),
            [StructuralViolation::HalfMismatch { half: Half::Full, mode: "split", .. }]
        ));
    }

    #[test]
    fn test_unresolved_references_reported_once_per_id() {
        let draft = LineDraft {
            flavors: vec![flavor("pep", Half::Half1)],
            ingredient_edits: vec![
                edit("ghost", Half::Half1, IngredientAction::Add),
                edit("ghost", Half::Half2, IngredientAction::Add),
                edit("phantom", Half::Half2, IngredientAction::Remove),
            ],
            split_mode: true,
        };

        let violations = validate_draft(&draft, &catalog(), ValidationMode::Submission);
        assert_eq!(
            violations,
            vec![
                StructuralViolation::UnresolvedReference {
                    customization_id: "ghost".to_string()
                },
                StructuralViolation::UnresolvedReference {
                    customization_id: "phantom".to_string()
                },
            ]
        );
    }

    #[test]
    fn test_retired_entry_on_new_line_is_flagged() {
        let draft = LineDraft {
            flavors: vec![],
            ingredient_edits: vec![edit("old", Half::Full, IngredientAction::Add)],
            split_mode: false,
        };
        assert_eq!(
            validate_draft(&draft, &catalog(), ValidationMode::Submission),
            vec![StructuralViolation::InactiveReference {
                customization_id: "old".to_string()
            }]
        );
    }

    #[test]
    fn test_retired_entry_already_carried_still_resolves() {
        let draft = LineDraft {
            flavors: vec![],
            ingredient_edits: vec![edit("old", Half::Full, IngredientAction::Add)],
            split_mode: false,
        };
        let carried = BTreeSet::from(["old".to_string()]);

        assert!(
            validate_draft_carrying(&draft, &catalog(), ValidationMode::Submission, &carried)
                .is_empty()
        );
    }

    #[test]
    fn test_flavor_remove_record_is_flagged() {
        let records = vec![
            CustomizationRecord::new("pep", Half::Full, IngredientAction::Remove),
            CustomizationRecord::new("toc", Half::Full, IngredientAction::Remove),
        ];

        let (draft, violations) = validate_records(
            &records,
            &catalog(),
            ValidationMode::Submission,
            &BTreeSet::new(),
        );
        assert_eq!(draft.flavors.len(), 1);
        assert_eq!(
            violations,
            vec![StructuralViolation::FlavorRemoved {
                customization_id: "pep".to_string()
            }]
        );
    }

    #[test]
    fn test_kind_mismatch() {
        let mut state = SelectionState::new();
        state.toggle_flavor("toc");
        state.toggle_ingredient("pep", Half::Full, IngredientAction::Add);

        let violations = validate_selection(&state, &catalog(), ValidationMode::Interactive);
        assert_eq!(
            violations,
            vec![
                StructuralViolation::KindMismatch {
                    customization_id: "toc".to_string(),
                    expected: CustomizationKind::Flavor,
                },
                StructuralViolation::KindMismatch {
                    customization_id: "pep".to_string(),
                    expected: CustomizationKind::Ingredient,
                },
            ]
        );
    }

    #[test]
    fn test_duplicate_edits() {
        let draft = LineDraft {
            flavors: vec![flavor("pep", Half::Full)],
            ingredient_edits: vec![
                edit("toc", Half::Full, IngredientAction::Add),
                edit("toc", Half::Full, IngredientAction::Remove),
                edit("toc", Half::Full, IngredientAction::Add),
            ],
            split_mode: false,
        };

        assert_eq!(
            validate_draft(&draft, &catalog(), ValidationMode::Interactive),
            vec![StructuralViolation::DuplicateEdit {
                customization_id: "toc".to_string(),
                half: Half::Full,
            }]
        );
    }
}
