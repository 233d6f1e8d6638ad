//! # Submission Service
//!
//! Accepts or flags a pizza line coming from an order source, and reopens
//! saved lines for editing.
//!
//! ## Submit Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  submit(order_item_id, product_id, records)                            │
//! │       │                                                                 │
//! │       ├── load_catalog()            (all rows, inactive included)      │
//! │       ├── pizza_configs.get()       (defaults when unconfigured)       │
//! │       ├── list_for_item()           (retired ids it may keep)          │
//! │       ▼                                                                 │
//! │  review_candidate()  ── Flagged ──► warn!, nothing persisted           │
//! │       │                                                                 │
//! │    Accepted                                                            │
//! │       ▼                                                                 │
//! │  replace_for_item(normalized records)                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use tracing::{info, warn};

use crate::error::DbResult;
use crate::pool::Database;
use crate::repository::customization::CustomizationRepository;
use crate::repository::order_item::OrderItemCustomizationRepository;
use crate::repository::pizza_config::PizzaConfigRepository;
use pizza_core::{
    parse_records_json, review_candidate, CustomizationRecord, IntakeOutcome, SelectionState,
};

/// Glue between the repositories and the intake review.
#[derive(Debug, Clone)]
pub struct SubmissionService {
    customizations: CustomizationRepository,
    configs: PizzaConfigRepository,
    items: OrderItemCustomizationRepository,
}

impl SubmissionService {
    pub fn new(db: &Database) -> Self {
        SubmissionService {
            customizations: db.customizations(),
            configs: db.pizza_configs(),
            items: db.order_items(),
        }
    }

    /// Reviews a line and persists it when accepted.
    ///
    /// A flagged line is a normal outcome, not an error; the previous records
    /// of the item (if any) are left untouched. Retired catalog entries pass
    /// only when those previous records already named them.
    pub async fn submit(
        &self,
        order_item_id: &str,
        product_id: &str,
        records: &[CustomizationRecord],
    ) -> DbResult<IntakeOutcome> {
        let catalog = self.customizations.load_catalog().await?;
        let config = self.configs.get(product_id).await?;
        let previous = self.items.list_for_item(order_item_id).await?;

        let outcome = review_candidate(records, &previous, &catalog, &config)?;

        match &outcome {
            IntakeOutcome::Accepted {
                records, charge, ..
            } => {
                self.items.replace_for_item(order_item_id, records).await?;
                info!(
                    order_item_id = %order_item_id,
                    product_id = %product_id,
                    total_units = charge.total_units,
                    extra_units = charge.extra_units,
                    surcharge = %charge.surcharge,
                    "Pizza line accepted"
                );
            }
            IntakeOutcome::Flagged { messages, .. } => {
                warn!(
                    order_item_id = %order_item_id,
                    product_id = %product_id,
                    reasons = ?messages,
                    "Pizza line flagged for review"
                );
            }
        }

        Ok(outcome)
    }

    /// Same as [`submit`](Self::submit) for a raw extraction payload.
    ///
    /// ## Errors
    /// - `DbError::Core(CoreError::MalformedInput)` when the JSON doesn't parse
    pub async fn submit_json(
        &self,
        order_item_id: &str,
        product_id: &str,
        payload: &str,
    ) -> DbResult<IntakeOutcome> {
        let records = parse_records_json(payload)?;
        self.submit(order_item_id, product_id, &records).await
    }

    /// Rebuilds the editable state of a saved line.
    ///
    /// ## Errors
    /// - `DbError::Core(CoreError::InvalidLine)` when the saved records no
    ///   longer hold together
    pub async fn reopen(&self, order_item_id: &str) -> DbResult<SelectionState> {
        let records = self.items.list_for_item(order_item_id).await?;
        let catalog = self.customizations.load_catalog().await?;

        Ok(SelectionState::restore(&records, &catalog)?)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DbError;
    use crate::pool::DbConfig;
    use pizza_core::{CoreError, Customization, Half, IngredientAction, Money, ProductPizzaConfig};

    async fn seeded() -> Database {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.customizations();
        for entry in [
            Customization::flavor("pep", "Pepperoni", None, 4, 1),
            Customization::flavor("haw", "Hawaiana", None, 3, 2),
            Customization::ingredient("toc", "Tocino", 1, 10),
        ] {
            repo.insert(&entry).await.unwrap();
        }
        db
    }

    fn rec(id: &str, half: Half, action: IngredientAction) -> CustomizationRecord {
        CustomizationRecord::new(id, half, action)
    }

    #[tokio::test]
    async fn test_accepted_line_is_persisted() {
        let db = seeded().await;
        let service = db.submissions();

        let outcome = service
            .submit(
                "item-1",
                "pizza-grande",
                &[
                    rec("pep", Half::Full, IngredientAction::Add),
                    rec("toc", Half::Full, IngredientAction::Add),
                ],
            )
            .await
            .unwrap();

        match outcome {
            IntakeOutcome::Accepted { charge, .. } => {
                assert_eq!(charge.total_units, 5);
                assert_eq!(charge.surcharge, Money::from_cents(2000));
            }
            other => panic!("expected acceptance, got {other:?}"),
        }
        assert_eq!(db.order_items().list_for_item("item-1").await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_product_config_drives_surcharge() {
        let db = seeded().await;
        db.pizza_configs()
            .upsert(&ProductPizzaConfig::new("pizza-chica", 2, Money::from_cents(1000)).unwrap())
            .await
            .unwrap();

        let outcome = db
            .submissions()
            .submit_json(
                "item-1",
                "pizza-chica",
                r#"[{"customizationId": "pep", "half": "full", "action": "add"}]"#,
            )
            .await
            .unwrap();

        match outcome {
            IntakeOutcome::Accepted { charge, .. } => {
                assert_eq!(charge.extra_units, 2);
                assert_eq!(charge.surcharge.cents(), 2000);
            }
            other => panic!("expected acceptance, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_flagged_line_keeps_previous_records() {
        let db = seeded().await;
        let service = db.submissions();

        service
            .submit("item-1", "pizza-grande", &[rec("haw", Half::Full, IngredientAction::Add)])
            .await
            .unwrap();

        let outcome = service
            .submit("item-1", "pizza-grande", &[rec("toc", Half::Full, IngredientAction::Remove)])
            .await
            .unwrap();
        assert_eq!(outcome.messages(), ["pizza requires personalization".to_string()]);

        let stored = db.order_items().list_for_item("item-1").await.unwrap();
        assert_eq!(stored, vec![rec("haw", Half::Full, IngredientAction::Add)]);
    }

    #[tokio::test]
    async fn test_retired_flavor_only_kept_by_items_that_had_it() {
        let db = seeded().await;
        let service = db.submissions();

        service
            .submit("item-1", "pizza-grande", &[rec("haw", Half::Full, IngredientAction::Add)])
            .await
            .unwrap();
        db.customizations().deactivate("haw").await.unwrap();

        let fresh = service
            .submit("item-2", "pizza-grande", &[rec("haw", Half::Full, IngredientAction::Add)])
            .await
            .unwrap();
        assert_eq!(fresh.messages(), ["customization haw is no longer offered".to_string()]);
        assert!(db.order_items().list_for_item("item-2").await.unwrap().is_empty());

        let edited = service
            .submit(
                "item-1",
                "pizza-grande",
                &[
                    rec("haw", Half::Full, IngredientAction::Add),
                    rec("toc", Half::Full, IngredientAction::Add),
                ],
            )
            .await
            .unwrap();
        assert!(edited.is_accepted());
    }

    #[tokio::test]
    async fn test_flavor_remove_payload_is_flagged() {
        let db = seeded().await;

        let outcome = db
            .submissions()
            .submit_json(
                "item-1",
                "pizza-grande",
                r#"[{"customizationId": "pep", "half": "full", "action": "remove"}]"#,
            )
            .await
            .unwrap();
        assert_eq!(outcome.messages(), ["flavor pep cannot be removed, only selected".to_string()]);
        assert!(db.order_items().list_for_item("item-1").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_malformed_payload() {
        let db = seeded().await;

        let err = db
            .submissions()
            .submit_json("item-1", "pizza-grande", "not json")
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::Core(CoreError::MalformedInput(_))));
    }

    #[tokio::test]
    async fn test_reopen_saved_line() {
        let db = seeded().await;
        let service = db.submissions();

        service
            .submit(
                "item-1",
                "pizza-grande",
                &[
                    rec("pep", Half::Half1, IngredientAction::Add),
                    rec("haw", Half::Half2, IngredientAction::Add),
                ],
            )
            .await
            .unwrap();

        // retired flavors still reopen
        db.customizations().deactivate("haw").await.unwrap();

        let state = service.reopen("item-1").await.unwrap();
        assert!(state.is_split());
        assert_eq!(state.flavor_on(Half::Half2), Some("haw"));
    }
}
