//! # Pricing Calculator
//!
//! Turns a valid selection into topping units and a currency surcharge.
//!
//! ## Algorithm
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  for each half in use (Full  |  Half1 + Half2):                         │
//! │      units  = flavor.topping_value (0 when the half has no flavor)      │
//! │      units += Σ topping_value of Add edits on that half                 │
//! │      (Remove edits contribute 0: no charge, no refund)                  │
//! │                                                                         │
//! │  total_units = Σ units over halves                                      │
//! │  extra_units = max(0, total_units - included_topping_units)             │
//! │  surcharge   = extra_units × extra_unit_cost                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Worked Examples
//! Included 4 units, $20.00 per extra unit:
//! - Whole Pepperoni (4) + Add Tocino (1) → 5 units, 1 extra, $20.00
//! - Half Pepperoni (4) / half Hawaiana (3) → 7 units, 3 extra, $60.00
//!
//! Both halves draw from ONE shared allowance.
//!
//! Callers validate first; ids that do not resolve fail with
//! `CoreError::CustomizationNotFound` instead of being priced as zero.
//! Sums and the surcharge are checked: `CoreError::ChargeOverflow` instead
//! of a wrapped total.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::catalog::CustomizationLookup;
use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::selection::SelectionState;
use crate::types::{Half, IngredientAction, ProductPizzaConfig};

/// Result of pricing one pizza line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ToppingCharge {
    pub total_units: u32,
    pub extra_units: u32,
    pub surcharge: Money,
}

/// Topping units consumed by one half.
pub fn units_for_half(
    state: &SelectionState,
    half: Half,
    lookup: &impl CustomizationLookup,
) -> CoreResult<u32> {
    let flavor_units = match state.flavor_on(half) {
        Some(id) => topping_value(id, lookup)?,
        None => 0,
    };

    state
        .edits_on(half)
        .iter()
        .filter(|edit| edit.action == IngredientAction::Add)
        .try_fold(flavor_units, |units, edit| {
            add_units(units, topping_value(&edit.customization_id, lookup)?)
        })
}

/// Prices a selection against a product configuration.
///
/// ```rust
/// use pizza_core::{calculate_charge, Catalog, Customization, Half, IngredientAction,
///                  ProductPizzaConfig, SelectionState};
///
/// let catalog = Catalog::new(vec![
///     Customization::flavor("pep", "Pepperoni", None, 4, 1),
///     Customization::ingredient("toc", "Tocino", 1, 2),
/// ]).unwrap();
///
/// let mut state = SelectionState::new();
/// state.toggle_flavor("pep");
/// state.toggle_ingredient("toc", Half::Full, IngredientAction::Add);
///
/// let charge = calculate_charge(&state, &catalog, &ProductPizzaConfig::defaults("pizza")).unwrap();
/// assert_eq!(charge.total_units, 5);
/// assert_eq!(charge.extra_units, 1);
/// assert_eq!(charge.surcharge.cents(), 2000);
/// ```
pub fn calculate_charge(
    state: &SelectionState,
    lookup: &impl CustomizationLookup,
    config: &ProductPizzaConfig,
) -> CoreResult<ToppingCharge> {
    let total_units = state
        .halves_in_use()
        .iter()
        .try_fold(0u32, |total, half| {
            add_units(total, units_for_half(state, *half, lookup)?)
        })?;

    let extra_units = total_units.saturating_sub(config.included_topping_units);

    Ok(ToppingCharge {
        total_units,
        extra_units,
        surcharge: config.extra_unit_cost.multiply_units(extra_units)?,
    })
}

fn add_units(total: u32, units: u32) -> CoreResult<u32> {
    total
        .checked_add(units)
        .ok_or_else(|| CoreError::ChargeOverflow(format!("{} + {} topping units", total, units)))
}

fn topping_value(id: &str, lookup: &impl CustomizationLookup) -> CoreResult<u32> {
    lookup
        .lookup(id)
        .map(|entry| entry.topping_value)
        .ok_or_else(|| CoreError::CustomizationNotFound(id.to_string()))
}

// =============================================================================
// Unit Tests
// =============================================================================
