//! # Pizza Configuration Book
//!
//! In-memory holder of per-product pizza economics.
//!
//! ```text
//! get("pizza-large") ──► configured?  ──yes──► stored ProductPizzaConfig
//!                              │
//!                              no
//!                              ▼
//!                       defaults (4 units included, $20.00 per extra unit)
//! ```
//!
//! The SQLite-backed equivalent lives in `pizza-db`
//! (`PizzaConfigRepository`) and follows the same fallback rule.

use std::collections::HashMap;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::ProductPizzaConfig;

/// Configurations keyed by product id.
#[derive(Debug, Clone, Default)]
pub struct ConfigBook {
    configs: HashMap<String, ProductPizzaConfig>,
}

impl ConfigBook {
    pub fn new() -> Self {
        ConfigBook::default()
    }

    /// Returns the product's configuration, or the defaults when unset.
    pub fn get(&self, product_id: &str) -> ProductPizzaConfig {
        self.configs
            .get(product_id)
            .cloned()
            .unwrap_or_else(|| ProductPizzaConfig::defaults(product_id))
    }

    /// Stores a configuration for a product.
    ///
    /// ## Errors
    /// - `CoreError::InvalidConfig` when either value is negative; the book is
    ///   left unchanged
    ///
    /// The product's existence is the caller's responsibility.
    pub fn set(
        &mut self,
        product_id: &str,
        included_topping_units: i64,
        extra_unit_cost: Money,
    ) -> CoreResult<ProductPizzaConfig> {
        let config = ProductPizzaConfig::new(product_id, included_topping_units, extra_unit_cost)?;
        self.configs.insert(product_id.to_string(), config.clone());
        Ok(config)
    }

    /// Same as [`ConfigBook::set`], with the cost given as a decimal string.
    ///
    /// A negative amount is rejected even when it rounds to zero cents.
    pub fn set_from_decimal(
        &mut self,
        product_id: &str,
        included_topping_units: i64,
        extra_unit_cost: &str,
    ) -> CoreResult<ProductPizzaConfig> {
        if extra_unit_cost.trim_start().starts_with('-') {
            return Err(CoreError::InvalidConfig {
                field: "extra_unit_cost".to_string(),
                value: extra_unit_cost.trim().to_string(),
            });
        }
        let cost = Money::parse_decimal(extra_unit_cost)?;
        self.set(product_id, included_topping_units, cost)
    }

    /// True when the product was explicitly configured.
    pub fn is_configured(&self, product_id: &str) -> bool {
        self.configs.contains_key(product_id)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
