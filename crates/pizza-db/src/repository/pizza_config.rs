//! # Product Pizza Config Repository
//!
//! Per-product topping allowance and extra unit cost.
//!
//! Products without a row price with the engine defaults
//! (4 included units, $20.00 per extra unit); `get` never fails for a
//! missing row.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use pizza_core::{Money, ProductPizzaConfig};

#[derive(Debug, Clone, sqlx::FromRow)]
struct PizzaConfigRow {
    product_id: String,
    included_topping_units: i64,
    extra_unit_cost_cents: i64,
}

/// Repository for product pizza configuration.
#[derive(Debug, Clone)]
pub struct PizzaConfigRepository {
    pool: SqlitePool,
}

impl PizzaConfigRepository {
    /// Creates a new PizzaConfigRepository.
    pub fn new(pool: SqlitePool) -> Self {
        PizzaConfigRepository { pool }
    }

    /// Configuration for a product, or the defaults when none is stored.
    ///
    /// ## Errors
    /// - `DbError::Core` when a stored row holds negative values
    pub async fn get(&self, product_id: &str) -> DbResult<ProductPizzaConfig> {
        let row: Option<PizzaConfigRow> = sqlx::query_as(
            r#"
            SELECT product_id, included_topping_units, extra_unit_cost_cents
            FROM product_pizza_configs
            WHERE product_id = ?1
            "#,
        )
        .bind(product_id)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Ok(ProductPizzaConfig::new(
                row.product_id,
                row.included_topping_units,
                Money::from_cents(row.extra_unit_cost_cents),
            )?),
            None => {
                debug!(product_id = %product_id, "No pizza config stored, using defaults");
                Ok(ProductPizzaConfig::defaults(product_id))
            }
        }
    }

    /// Whether a product has its own row.
    pub async fn is_configured(&self, product_id: &str) -> DbResult<bool> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM product_pizza_configs WHERE product_id = ?1")
                .bind(product_id)
                .fetch_one(&self.pool)
                .await?;

        Ok(count > 0)
    }

    /// Inserts or replaces a product's configuration and returns what is stored.
    ///
    /// Values are already checked by `ProductPizzaConfig::new`; the table's
    /// CHECK constraints back that up.
    pub async fn upsert(&self, config: &ProductPizzaConfig) -> DbResult<ProductPizzaConfig> {
        debug!(
            product_id = %config.product_id,
            included = config.included_topping_units,
            extra_unit_cost = %config.extra_unit_cost,
            "Upserting pizza config"
        );

        let now = Utc::now();

        sqlx::query(
            r#"
            INSERT INTO product_pizza_configs (
                product_id, included_topping_units, extra_unit_cost_cents,
                created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?4)
            ON CONFLICT (product_id) DO UPDATE SET
                included_topping_units = excluded.included_topping_units,
                extra_unit_cost_cents = excluded.extra_unit_cost_cents,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(&config.product_id)
        .bind(i64::from(config.included_topping_units))
        .bind(config.extra_unit_cost.cents())
        .bind(now)
        .execute(&self.pool)
        .await?;

        self.get(&config.product_id).await
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
