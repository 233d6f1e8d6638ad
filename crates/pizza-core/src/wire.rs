//! # Wire Records
//!
//! The flat record shape shared with the persistence collaborator and the
//! order-extraction input.
//!
//! ## Encoding
//! ```text
//! SelectionState                         Vec<CustomizationRecord>
//! ──────────────                         ────────────────────────
//! Half1: Pepperoni           encode()    { pep, half1, add }      ← flavor
//! Half2: Hawaiana          ──────────►   { haw, half2, add }      ← flavor
//! (toc, Half2): Remove                   { toc, half2, remove }   ← edit
//! ```
//!
//! Flavors travel as `add` records; they are told apart from ingredient
//! edits by the catalog kind of the referenced customization, which is why
//! decoding needs a [`CustomizationLookup`].

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use ts_rs::TS;

use crate::catalog::CustomizationLookup;
use crate::error::{CoreError, CoreResult};
use crate::selection::{LineDraft, SelectionState};
use crate::types::{CustomizationKind, FlavorChoice, Half, IngredientAction, IngredientEdit};

/// One persisted / extracted customization of an order item.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CustomizationRecord {
    /// Extraction sources send `customizationId`; both spellings are accepted.
    #[serde(alias = "customizationId")]
    pub pizza_customization_id: String,
    pub half: Half,
    pub action: IngredientAction,
}

impl CustomizationRecord {
    pub fn new(id: impl Into<String>, half: Half, action: IngredientAction) -> Self {
        CustomizationRecord {
            pizza_customization_id: id.into(),
            half,
            action,
        }
    }
}

/// Emits the records to persist for a selection: flavors first, then edits,
/// both in key order.
pub fn encode(state: &SelectionState) -> Vec<CustomizationRecord> {
    let flavors = state
        .flavors()
        .into_iter()
        .map(|f| CustomizationRecord::new(f.customization_id, f.half, IngredientAction::Add));

    let edits = state
        .ingredient_edits()
        .into_iter()
        .map(|e| CustomizationRecord::new(e.customization_id, e.half, e.action));

    flavors.chain(edits).collect()
}

/// Classifies raw records into an unvalidated line.
///
/// ## Rules
/// - Records whose id resolves to a flavor become flavor choices
/// - Everything else, unresolved ids included, becomes an ingredient edit so
///   that the validator can report it
/// - Split mode is on when any record targets `Half1` or `Half2`
pub fn decode(records: &[CustomizationRecord], lookup: &impl CustomizationLookup) -> LineDraft {
    let mut draft = LineDraft {
        split_mode: records.iter().any(|r| r.half.is_split_half()),
        ..Default::default()
    };

    for record in records {
        let is_flavor = lookup
            .lookup(&record.pizza_customization_id)
            .map_or(false, |entry| entry.kind == CustomizationKind::Flavor);

        if is_flavor {
            draft.flavors.push(FlavorChoice {
                customization_id: record.pizza_customization_id.clone(),
                half: record.half,
            });
        } else {
            draft.ingredient_edits.push(IngredientEdit {
                customization_id: record.pizza_customization_id.clone(),
                half: record.half,
                action: record.action,
            });
        }
    }

    draft
}

/// Ids an order item already holds; retired entries among them stay usable.
pub fn carried_ids(records: &[CustomizationRecord]) -> BTreeSet<String> {
    records
        .iter()
        .map(|r| r.pizza_customization_id.clone())
        .collect()
}

/// Parses the JSON array produced by an extraction source.
///
/// ```rust
/// use pizza_core::wire::parse_records_json;
/// use pizza_core::Half;
///
/// let records = parse_records_json(
///     r#"[{"customizationId": "pep", "half": "full", "action": "add"}]"#,
/// ).unwrap();
/// assert_eq!(records[0].half, Half::Full);
/// ```
pub fn parse_records_json(input: &str) -> CoreResult<Vec<CustomizationRecord>> {
    serde_json::from_str(input).map_err(|e| CoreError::MalformedInput(e.to_string()))
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::error::StructuralViolation;
    use crate::types::Customization;

    fn catalog() -> Catalog {
        Catalog::new(vec![
            Customization::flavor("pep", "Pepperoni", None, 4, 1),
            Customization::flavor("haw", "Hawaiana", None, 3, 2),
            Customization::ingredient("toc", "Tocino", 1, 10),
        ])
        .unwrap()
    }

    #[test]
    fn test_encode_split_pizza() {
        let mut state = SelectionState::new();
        state.toggle_flavor("pep");
        state.toggle_flavor("haw");
        state.toggle_ingredient("toc", Half::Half2, IngredientAction::Add);
        state.toggle_ingredient("toc", Half::Half2, IngredientAction::Remove);

        assert_eq!(
            encode(&state),
            vec![
                CustomizationRecord::new("pep", Half::Half1, IngredientAction::Add),
                CustomizationRecord::new("haw", Half::Half2, IngredientAction::Add),
                CustomizationRecord::new("toc", Half::Half2, IngredientAction::Remove),
            ]
        );
    }

    #[test]
    fn test_decode_classifies_by_kind() {
        let records = vec![
            CustomizationRecord::new("pep", Half::Full, IngredientAction::Add),
            CustomizationRecord::new("toc", Half::Full, IngredientAction::Remove),
            CustomizationRecord::new("ghost", Half::Full, IngredientAction::Add),
        ];

        let draft = decode(&records, &catalog());
        assert!(!draft.split_mode);
        assert_eq!(draft.flavors.len(), 1);
        assert_eq!(draft.flavors[0].customization_id, "pep");
        assert_eq!(draft.ingredient_edits.len(), 2);
        assert_eq!(draft.ingredient_edits[1].customization_id, "ghost");
    }

    #[test]
    fn test_decode_derives_split_mode() {
        let records = vec![CustomizationRecord::new("toc", Half::Half2, IngredientAction::Add)];
        assert!(decode(&records, &catalog()).split_mode);
    }

    #[test]
    fn test_restore_from_encoded_records() {
        let catalog = catalog();
        let mut state = SelectionState::new();
        state.toggle_flavor("pep");
        state.toggle_flavor("haw");
        state.toggle_ingredient("toc", Half::Half1, IngredientAction::Add);

        let restored = SelectionState::restore(&encode(&state), &catalog).unwrap();
        assert_eq!(restored, state);
    }

    #[test]
    fn test_restore_rejects_broken_records() {
        let records = vec![
            CustomizationRecord::new("pep", Half::Full, IngredientAction::Add),
            CustomizationRecord::new("haw", Half::Half1, IngredientAction::Add),
        ];

        let err = SelectionState::restore(&records, &catalog()).unwrap_err();
        assert!(matches!(err, CoreError::InvalidLine { ref violations } if violations.len() == 1));
    }

    #[test]
    fn test_restore_keeps_retired_entries() {
        let catalog = Catalog::new(vec![
            Customization::flavor("pep", "Pepperoni", None, 4, 1).deactivated(),
            Customization::ingredient("toc", "Tocino", 1, 10),
        ])
        .unwrap();
        let records = vec![
            CustomizationRecord::new("pep", Half::Full, IngredientAction::Add),
            CustomizationRecord::new("toc", Half::Full, IngredientAction::Add),
        ];

        let restored = SelectionState::restore(&records, &catalog).unwrap();
        assert_eq!(restored.flavor_on(Half::Full), Some("pep"));
        assert_eq!(carried_ids(&records).len(), 2);
    }

    #[test]
    fn test_restore_rejects_flavor_removal() {
        let records = vec![CustomizationRecord::new("pep", Half::Full, IngredientAction::Remove)];

        let err = SelectionState::restore(&records, &catalog()).unwrap_err();
        assert!(matches!(
            err,
            CoreError::InvalidLine { ref violations }
                if violations == &vec![StructuralViolation::FlavorRemoved {
                    customization_id: "pep".to_string()
                }]
        ));
    }

    #[test]
    fn test_parse_records_json() {
        let records = parse_records_json(
            r#"[
                {"pizzaCustomizationId": "pep", "half": "half1", "action": "add"},
                {"customizationId": "toc", "half": "half2", "action": "remove"}
            ]"#,
        )
        .unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].pizza_customization_id, "toc");
        assert_eq!(records[1].action, IngredientAction::Remove);

        assert!(matches!(
            parse_records_json(r#"[{"half": "middle"}]"#),
            Err(CoreError::MalformedInput(_))
        ));
    }

    #[test]
    fn test_record_serializes_camel_case() {
        let json = serde_json::to_string(&CustomizationRecord::new(
            "pep",
            Half::Full,
            IngredientAction::Add,
        ))
        .unwrap();
        assert_eq!(json, r#"{"pizzaCustomizationId":"pep","half":"full","action":"add"}"#);
    }
}
