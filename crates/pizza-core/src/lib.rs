//! # pizza-core: Pure Pizza Customization Logic for Slice POS
//!
//! This crate holds everything that decides what a pizza order line IS:
//! flavors, halves, ingredient edits, the rules they must follow and the
//! topping surcharge they cost. No I/O, no logging, no clocks.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Slice POS Architecture                             │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │        Customization screen  /  order extraction source         │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ pizza-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │ selection │  │ validator │  │  pricing  │  │   wire    │  │   │
//! │  │   │  halves   │  │  6 rules  │  │  units →  │  │  records  │  │   │
//! │  │   │  toggles  │  │ violations│  │ surcharge │  │ enc / dec │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐                 │   │
//! │  │   │  catalog  │  │  editor   │  │  intake   │                 │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘                 │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    pizza-db (Database Layer)                    │   │
//! │  │       catalog rows, product configs, order item records         │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Customizations, halves, actions, product configuration
//! - [`money`] - Integer-cent money
//! - [`catalog`] - In-memory catalog and the lookup seam
//! - [`config`] - Per-product pricing parameters with defaults
//! - [`selection`] - The per-line state machine
//! - [`validator`] - Structural rules, reported as violations
//! - [`pricing`] - Topping units and surcharge
//! - [`wire`] - Flat records for persistence and extraction input
//! - [`intake`] - Accept-or-flag review of extracted lines
//! - [`editor`] - One editing session over a borrowed catalog
//!
//! ## Example Usage
//!
//! ```rust
//! use pizza_core::{Catalog, Customization, Half, IngredientAction, PizzaLineEditor,
//!                  ProductPizzaConfig};
//!
//! let catalog = Catalog::new(vec![
//!     Customization::flavor("pep", "Pepperoni", Some("Queso, pepperoni".into()), 4, 1),
//!     Customization::flavor("haw", "Hawaiana", None, 3, 2),
//! ]).unwrap();
//!
//! let mut editor = PizzaLineEditor::new(&catalog, ProductPizzaConfig::defaults("pizza-grande"));
//! editor.toggle_flavor("pep");
//! let eval = editor.toggle_flavor("haw"); // second flavor splits the pizza
//!
//! assert!(editor.state().is_split());
//! assert_eq!(eval.charge.unwrap().surcharge.cents(), 6000); // 7 units, 3 extra
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod catalog;
pub mod config;
pub mod editor;
pub mod error;
pub mod intake;
pub mod money;
pub mod pricing;
pub mod selection;
pub mod types;
pub mod validation;
pub mod validator;
pub mod wire;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use catalog::{Catalog, CatalogQuery, CustomizationLookup, Page};
pub use config::ConfigBook;
pub use editor::{FinishedLine, LineEvaluation, PizzaLineEditor};
pub use error::{CoreError, CoreResult, StructuralViolation, ValidationError};
pub use intake::{review_candidate, IntakeOutcome};
pub use money::Money;
pub use pricing::{calculate_charge, units_for_half, ToppingCharge};
pub use selection::{HalfView, LineDraft, SelectionState};
pub use types::*;
pub use validator::{
    validate_draft, validate_draft_carrying, validate_records, validate_selection,
    validate_selection_carrying, ValidationMode,
};
pub use wire::{carried_ids, decode, encode, parse_records_json, CustomizationRecord};

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Flavors one pizza can carry: one per half.
pub const MAX_FLAVORS: usize = 2;

/// Topping units included in the base price when a product has no config row.
pub const DEFAULT_INCLUDED_TOPPING_UNITS: u32 = 4;

/// Price of one extra topping unit when a product has no config row ($20.00).
pub const DEFAULT_EXTRA_UNIT_COST_CENTS: i64 = 2000;

/// Maximum length of a customization name
pub const MAX_NAME_LENGTH: usize = 120;

/// Maximum length of a catalog search query
pub const MAX_SEARCH_LENGTH: usize = 100;

/// Catalog page size when none is requested
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Upper bound on catalog page size
pub const MAX_PAGE_SIZE: u32 = 100;
