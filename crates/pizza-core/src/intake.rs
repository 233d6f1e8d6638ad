//! # Order Intake Review
//!
//! Decides whether an externally extracted pizza line can be accepted as is,
//! or must be flagged for an operator.
//!
//! ## Flow
//! ```text
//! ┌──────────────┐    decode()    ┌───────────┐   Submission rules   ┌──────────┐
//! │ raw records  │ ─────────────► │ LineDraft │ ───────────────────► │ Accepted │
//! │ (extraction) │                └───────────┘          │           └──────────┘
//! └──────────────┘                                       │ violations
//!                                                        ▼
//!                                                  ┌──────────┐
//!                                                  │ Flagged  │ operator messages
//!                                                  └──────────┘
//! ```
//!
//! Flagged lines are not errors: the order keeps flowing and the operator
//! resolves them. Only a lookup failure or an out-of-range charge during
//! pricing is returned as `Err`.
//!
//! Retired catalog entries are accepted only when the item already held them
//! (`previous`); a fresh extraction naming one is flagged.

use crate::catalog::CustomizationLookup;
use crate::error::{CoreResult, StructuralViolation};
use crate::pricing::{calculate_charge, ToppingCharge};
use crate::selection::SelectionState;
use crate::types::ProductPizzaConfig;
use crate::validator::{validate_records, ValidationMode};
use crate::wire::{carried_ids, encode, CustomizationRecord};

/// Verdict on one extracted pizza line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntakeOutcome {
    /// Line holds together; `records` is the normalized form to persist.
    Accepted {
        state: SelectionState,
        records: Vec<CustomizationRecord>,
        charge: ToppingCharge,
    },
    /// Line needs an operator.
    Flagged {
        violations: Vec<StructuralViolation>,
        messages: Vec<String>,
    },
}

impl IntakeOutcome {
    #[inline]
    pub fn is_accepted(&self) -> bool {
        matches!(self, IntakeOutcome::Accepted { .. })
    }

    /// Operator-facing messages; empty when accepted.
    pub fn messages(&self) -> &[String] {
        match self {
            IntakeOutcome::Accepted { .. } => &[],
            IntakeOutcome::Flagged { messages, .. } => messages,
        }
    }
}

/// Reviews a candidate line under submission rules.
///
/// ```rust
/// use pizza_core::intake::review_candidate;
/// use pizza_core::wire::CustomizationRecord;
/// use pizza_core::{Catalog, Customization, Half, IngredientAction, ProductPizzaConfig};
///
/// let catalog = Catalog::new(vec![Customization::ingredient("toc", "Tocino", 1, 1)]).unwrap();
/// let records = vec![CustomizationRecord::new("toc", Half::Full, IngredientAction::Remove)];
///
/// let config = ProductPizzaConfig::defaults("pizza");
/// let outcome = review_candidate(&records, &[], &catalog, &config).unwrap();
/// assert_eq!(outcome.messages(), ["pizza requires personalization".to_string()]);
/// ```
pub fn review_candidate(
    records: &[CustomizationRecord],
    previous: &[CustomizationRecord],
    lookup: &impl CustomizationLookup,
    config: &ProductPizzaConfig,
) -> CoreResult<IntakeOutcome> {
    let (draft, violations) = validate_records(
        records,
        lookup,
        ValidationMode::Submission,
        &carried_ids(previous),
    );

    if !violations.is_empty() {
        let messages = violations.iter().map(ToString::to_string).collect();
        return Ok(IntakeOutcome::Flagged {
            violations,
            messages,
        });
    }

    let state = SelectionState::from_checked_draft(draft);
    let charge = calculate_charge(&state, lookup, config)?;
    let records = encode(&state);

    Ok(IntakeOutcome::Accepted {
        state,
        records,
        charge,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::types::{Customization, Half, IngredientAction};

    fn catalog() -> Catalog {
        Catalog::new(vec![
            Customization::flavor("pep", "Pepperoni", None, 4, 1),
            Customization::flavor("haw", "Hawaiana", None, 3, 2),
            Customization::flavor("mex", "Mexicana", None, 5, 3),
            Customization::ingredient("toc", "Tocino", 1, 10),
            Customization::flavor("old", "Napolitana", None, 3, 4).deactivated(),
        ])
        .unwrap()
    }

    fn config() -> ProductPizzaConfig {
        ProductPizzaConfig::defaults("pizza")
    }

    fn rec(id: &str, half: Half, action: IngredientAction) -> CustomizationRecord {
        CustomizationRecord::new(id, half, action)
    }

    #[test]
    fn test_accepts_and_prices_valid_line() {
        let records = vec![
            rec("toc", Half::Half2, IngredientAction::Add),
            rec("haw", Half::Half2, IngredientAction::Add),
            rec("pep", Half::Half1, IngredientAction::Add),
        ];

        match review_candidate(&records, &[], &catalog(), &config()).unwrap() {
            IntakeOutcome::Accepted {
                state,
                records,
                charge,
            } => {
                assert!(state.is_split());
                assert_eq!(charge.total_units, 8);
                assert_eq!(charge.surcharge.cents(), 8000);
                // normalized: flavors first
                assert_eq!(records[0].pizza_customization_id, "pep");
                assert_eq!(records[2].pizza_customization_id, "toc");
            }
            other => panic!("expected acceptance, got {other:?}"),
        }
    }

    #[test]
    fn test_flags_three_flavors() {
        let records = vec![
            rec("pep", Half::Half1, IngredientAction::Add),
            rec("haw", Half::Half2, IngredientAction::Add),
            rec("mex", Half::Half2, IngredientAction::Add),
        ];

        let outcome = review_candidate(&records, &[], &catalog(), &config()).unwrap();
        assert!(!outcome.is_accepted());
        assert_eq!(
            outcome.messages(),
            [
                "a pizza can carry at most 2 flavors, found 3".to_string(),
                "more than one flavor assigned to half 2".to_string(),
            ]
        );
    }

    #[test]
    fn test_flags_unknown_reference() {
        let records = vec![rec("ghost", Half::Full, IngredientAction::Add)];

        let outcome = review_candidate(&records, &[], &catalog(), &config()).unwrap();
        assert_eq!(outcome.messages(), ["unknown customization: ghost".to_string()]);
    }

    #[test]
    fn test_flags_remove_only_line() {
        let records = vec![rec("toc", Half::Full, IngredientAction::Remove)];

        match review_candidate(&records, &[], &catalog(), &config()).unwrap() {
            IntakeOutcome::Flagged { violations, .. } => {
                assert_eq!(violations, vec![StructuralViolation::PersonalizationRequired]);
            }
            other => panic!("expected flag, got {other:?}"),
        }
    }

    #[test]
    fn test_flags_empty_line() {
        let outcome = review_candidate(&[], &[], &catalog(), &config()).unwrap();
        assert_eq!(outcome.messages(), ["pizza requires personalization".to_string()]);
    }

    #[test]
    fn test_flags_retired_flavor_on_new_line() {
        let records = vec![rec("old", Half::Full, IngredientAction::Add)];

        let outcome = review_candidate(&records, &[], &catalog(), &config()).unwrap();
        assert_eq!(
            outcome.messages(),
            ["customization old is no longer offered".to_string()]
        );
    }

    #[test]
    fn test_accepts_retired_flavor_the_item_already_had() {
        let previous = vec![rec("old", Half::Full, IngredientAction::Add)];
        let records = vec![
            rec("old", Half::Full, IngredientAction::Add),
            rec("toc", Half::Full, IngredientAction::Add),
        ];

        match review_candidate(&records, &previous, &catalog(), &config()).unwrap() {
            IntakeOutcome::Accepted { charge, .. } => assert_eq!(charge.total_units, 4),
            other => panic!("expected acceptance, got {other:?}"),
        }
    }

    #[test]
    fn test_flags_flavor_remove_record() {
        let records = vec![rec("pep", Half::Full, IngredientAction::Remove)];

        match review_candidate(&records, &[], &catalog(), &config()).unwrap() {
            IntakeOutcome::Flagged { violations, messages } => {
                assert_eq!(
                    violations,
                    vec![StructuralViolation::FlavorRemoved {
                        customization_id: "pep".to_string()
                    }]
                );
                assert_eq!(messages, vec!["flavor pep cannot be removed, only selected".to_string()]);
            }
            other => panic!("expected flag, got {other:?}"),
        }
    }
}
