//! # Domain Types
//!
//! Core domain types used throughout the pizza customization engine.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────────┐   ┌─────────────────────┐                     │
//! │  │   Customization     │   │ ProductPizzaConfig  │                     │
//! │  │  ─────────────────  │   │  ─────────────────  │                     │
//! │  │  id                 │   │  product_id         │                     │
//! │  │  kind (Flavor|Ingr) │   │  included units     │                     │
//! │  │  topping_value      │   │  extra_unit_cost    │                     │
//! │  └─────────────────────┘   └─────────────────────┘                     │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │      Half       │   │  FlavorChoice   │   │ IngredientEdit  │       │
//! │  │  Full           │   │  id + half      │   │  id + half      │       │
//! │  │  Half1 / Half2  │   │                 │   │  Add | Remove   │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::{DEFAULT_EXTRA_UNIT_COST_CENTS, DEFAULT_INCLUDED_TOPPING_UNITS};

// =============================================================================
// Customization Kind
// =============================================================================

/// Whether a catalog entry is a preset flavor or a single ingredient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum CustomizationKind {
    /// Named topping combination, chosen per half.
    Flavor,
    /// Individual topping, added to or removed from a half.
    Ingredient,
}

impl CustomizationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CustomizationKind::Flavor => "flavor",
            CustomizationKind::Ingredient => "ingredient",
        }
    }
}

impl FromStr for CustomizationKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "flavor" => Ok(CustomizationKind::Flavor),
            "ingredient" => Ok(CustomizationKind::Ingredient),
            other => Err(ValidationError::NotAllowed {
                field: "kind".to_string(),
                reason: format!("'{}' is not flavor or ingredient", other),
            }),
        }
    }
}

// =============================================================================
// Half
// =============================================================================

/// Region of the pizza a choice applies to.
///
/// `Full` and the pair `{Half1, Half2}` are mutually exclusive partitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum Half {
    Full,
    Half1,
    Half2,
}

impl Half {
    /// True for `Half1` / `Half2`.
    #[inline]
    pub const fn is_split_half(&self) -> bool {
        matches!(self, Half::Half1 | Half::Half2)
    }
}

impl fmt::Display for Half {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Half::Full => write!(f, "whole pizza"),
            Half::Half1 => write!(f, "half 1"),
            Half::Half2 => write!(f, "half 2"),
        }
    }
}

// =============================================================================
// Ingredient Action
// =============================================================================

/// What an ingredient edit does to a half.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum IngredientAction {
    Add,
    Remove,
}

// =============================================================================
// Customization
// =============================================================================

/// A flavor or ingredient available for pizza lines.
///
/// Read-only to the engine. Inactive entries still resolve by id so that
/// existing order items display, but they never appear in pick lists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Customization {
    pub id: String,

    /// Display name shown on the customization screen.
    pub name: String,

    pub kind: CustomizationKind,

    /// Free-text recipe of a flavor. Absent for ingredients.
    pub base_ingredients_text: Option<String>,

    /// Topping units consumed when selected / added.
    pub topping_value: u32,

    pub is_active: bool,

    /// Ascending position in pick lists.
    pub sort_order: i64,
}

impl Customization {
    /// Builds an active flavor.
    pub fn flavor(
        id: impl Into<String>,
        name: impl Into<String>,
        base_ingredients_text: Option<String>,
        topping_value: u32,
        sort_order: i64,
    ) -> Self {
        Customization {
            id: id.into(),
            name: name.into(),
            kind: CustomizationKind::Flavor,
            base_ingredients_text,
            topping_value,
            is_active: true,
            sort_order,
        }
    }

    /// Builds an active ingredient.
    pub fn ingredient(
        id: impl Into<String>,
        name: impl Into<String>,
        topping_value: u32,
        sort_order: i64,
    ) -> Self {
        Customization {
            id: id.into(),
            name: name.into(),
            kind: CustomizationKind::Ingredient,
            base_ingredients_text: None,
            topping_value,
            is_active: true,
            sort_order,
        }
    }

    /// Returns a copy marked inactive.
    pub fn deactivated(mut self) -> Self {
        self.is_active = false;
        self
    }

    #[inline]
    pub fn is_flavor(&self) -> bool {
        self.kind == CustomizationKind::Flavor
    }
}

// =============================================================================
// Product Pizza Configuration
// =============================================================================

/// Per-product economics: units bundled in the base price and the cost of
/// every unit beyond that.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ProductPizzaConfig {
    pub product_id: String,
    pub included_topping_units: u32,
    pub extra_unit_cost: Money,
}

impl ProductPizzaConfig {
    /// Creates a configuration, rejecting negative values.
    ///
    /// ```rust
    /// use pizza_core::{Money, ProductPizzaConfig};
    ///
    /// assert!(ProductPizzaConfig::new("p1", 4, Money::from_cents(2000)).is_ok());
    /// assert!(ProductPizzaConfig::new("p1", -1, Money::from_cents(2000)).is_err());
    /// ```
    pub fn new(
        product_id: impl Into<String>,
        included_topping_units: i64,
        extra_unit_cost: Money,
    ) -> CoreResult<Self> {
        if included_topping_units < 0 {
            return Err(CoreError::InvalidConfig {
                field: "included_topping_units".to_string(),
                value: included_topping_units.to_string(),
            });
        }
        if extra_unit_cost.is_negative() {
            return Err(CoreError::InvalidConfig {
                field: "extra_unit_cost".to_string(),
                value: extra_unit_cost.to_string(),
            });
        }
        let included_topping_units =
            u32::try_from(included_topping_units).map_err(|_| CoreError::InvalidConfig {
                field: "included_topping_units".to_string(),
                value: included_topping_units.to_string(),
            })?;

        Ok(ProductPizzaConfig {
            product_id: product_id.into(),
            included_topping_units,
            extra_unit_cost,
        })
    }

    /// Defaults applied until a product is explicitly configured.
    pub fn defaults(product_id: impl Into<String>) -> Self {
        ProductPizzaConfig {
            product_id: product_id.into(),
            included_topping_units: DEFAULT_INCLUDED_TOPPING_UNITS,
            extra_unit_cost: Money::from_cents(DEFAULT_EXTRA_UNIT_COST_CENTS),
        }
    }
}

// =============================================================================
// Choices
// =============================================================================

/// A flavor placed on one half.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct FlavorChoice {
    pub customization_id: String,
    pub half: Half,
}

/// An ingredient added to or removed from one half.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct IngredientEdit {
    pub customization_id: String,
    pub half: Half,
    pub action: IngredientAction,
}

// =============================================================================
// Unit Tests
// =============================================================================
