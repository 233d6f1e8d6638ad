//! # Order Item Customization Repository
//!
//! Stores the finished records of a pizza line, verbatim and in order.
//!
//! ## Replace Semantics
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  replace_for_item(item, records)                                       │
//! │                                                                         │
//! │  BEGIN                                                                 │
//! │    DELETE FROM order_item_customizations WHERE order_item_id = item    │
//! │    INSERT record 0 (position 0)                                        │
//! │    INSERT record 1 (position 1) ...                                    │
//! │  COMMIT                                                                │
//! │                                                                         │
//! │  Any failure rolls back: the item keeps its previous records.          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use pizza_core::{CustomizationRecord, Half, IngredientAction};

#[derive(Debug, Clone, sqlx::FromRow)]
struct OrderItemCustomizationRow {
    pizza_customization_id: String,
    half: Half,
    action: IngredientAction,
}

impl From<OrderItemCustomizationRow> for CustomizationRecord {
    fn from(row: OrderItemCustomizationRow) -> Self {
        CustomizationRecord::new(row.pizza_customization_id, row.half, row.action)
    }
}

/// Repository for order item customization records.
#[derive(Debug, Clone)]
pub struct OrderItemCustomizationRepository {
    pool: SqlitePool,
}

impl OrderItemCustomizationRepository {
    /// Creates a new OrderItemCustomizationRepository.
    pub fn new(pool: SqlitePool) -> Self {
        OrderItemCustomizationRepository { pool }
    }

    /// Replaces every record of an order item in one transaction.
    ///
    /// ## Errors
    /// - `DbError::ForeignKeyViolation` when a record names an unknown
    ///   customization; nothing is changed
    /// - `DbError::TransactionFailed` when the commit fails
    pub async fn replace_for_item(
        &self,
        order_item_id: &str,
        records: &[CustomizationRecord],
    ) -> DbResult<()> {
        debug!(
            order_item_id = %order_item_id,
            count = records.len(),
            "Replacing order item customizations"
        );

        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM order_item_customizations WHERE order_item_id = ?1")
            .bind(order_item_id)
            .execute(&mut *tx)
            .await?;

        for (position, record) in records.iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO order_item_customizations (
                    id, order_item_id, pizza_customization_id, half, action,
                    position, created_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                "#,
            )
            .bind(Uuid::new_v4().to_string())
            .bind(order_item_id)
            .bind(&record.pizza_customization_id)
            .bind(record.half)
            .bind(record.action)
            .bind(position as i64)
            .bind(now)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        Ok(())
    }

    /// Records of an order item in the order they were saved.
    pub async fn list_for_item(&self, order_item_id: &str) -> DbResult<Vec<CustomizationRecord>> {
        let rows: Vec<OrderItemCustomizationRow> = sqlx::query_as(
            r#"
            SELECT pizza_customization_id, half, action
            FROM order_item_customizations
            WHERE order_item_id = ?1
            ORDER BY position
            "#,
        )
        .bind(order_item_id)
        .fetch_all(&self.pool)
        .await?;

        debug!(order_item_id = %order_item_id, count = rows.len(), "Loaded order item customizations");

        Ok(rows.into_iter().map(CustomizationRecord::from).collect())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use pizza_core::Customization;

    async fn seeded() -> Database {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.customizations();
        repo.insert(&Customization::flavor("pep", "Pepperoni", None, 4, 1))
            .await
            .unwrap();
        repo.insert(&Customization::ingredient("toc", "Tocino", 1, 10))
            .await
            .unwrap();
        db
    }

    #[tokio::test]
    async fn test_records_round_trip_in_order() {
        let db = seeded().await;
        let repo = db.order_items();

        let records = vec![
            CustomizationRecord::new("pep", Half::Half1, IngredientAction::Add),
            CustomizationRecord::new("toc", Half::Half2, IngredientAction::Remove),
        ];
        repo.replace_for_item("item-1", &records).await.unwrap();

        assert_eq!(repo.list_for_item("item-1").await.unwrap(), records);
        assert!(repo.list_for_item("item-2").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_replace_overwrites_previous_records() {
        let db = seeded().await;
        let repo = db.order_items();

        repo.replace_for_item(
            "item-1",
            &[CustomizationRecord::new("pep", Half::Full, IngredientAction::Add)],
        )
        .await
        .unwrap();
        repo.replace_for_item(
            "item-1",
            &[CustomizationRecord::new("toc", Half::Full, IngredientAction::Add)],
        )
        .await
        .unwrap();

        let stored = repo.list_for_item("item-1").await.unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].pizza_customization_id, "toc");
    }

    #[tokio::test]
    async fn test_unknown_customization_rolls_back() {
        let db = seeded().await;
        let repo = db.order_items();

        let original = vec![CustomizationRecord::new("pep", Half::Full, IngredientAction::Add)];
        repo.replace_for_item("item-1", &original).await.unwrap();

        let err = repo
            .replace_for_item(
                "item-1",
                &[CustomizationRecord::new("ghost", Half::Full, IngredientAction::Add)],
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::ForeignKeyViolation { .. }));

        assert_eq!(repo.list_for_item("item-1").await.unwrap(), original);
    }
}
