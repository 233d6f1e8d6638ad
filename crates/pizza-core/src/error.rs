//! # Error Types
//!
//! Domain-specific error types for pizza-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  pizza-core errors (this file)                                         │
//! │  ├── CoreError            - Boundary failures (config, lookup, input)  │
//! │  ├── ValidationError      - Field checks on catalog/config values      │
//! │  └── StructuralViolation  - Line rules, REPORTED as a list, not thrown │
//! │                                                                         │
//! │  pizza-db errors (separate crate)                                      │
//! │  └── DbError              - Database operation failures                │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → DbError → caller                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Why Violations Are Not Errors
//! The customization screen must stay editable while a line is invalid, so
//! [`StructuralViolation`]s are collected into a `Vec` and handed back. Only
//! submission turns them into a blocking [`CoreError::InvalidLine`].

use thiserror::Error;

use crate::types::{CustomizationKind, Half};

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Negative economic parameter on a product configuration.
    ///
    /// ## When This Occurs
    /// - `included_topping_units < 0`
    /// - `extra_unit_cost < $0.00`
    ///
    /// Rejected at the configuration boundary, never reaches the calculator.
    #[error("Invalid pizza configuration: {field} cannot be negative (got {value})")]
    InvalidConfig { field: String, value: String },

    /// Customization id does not resolve against the catalog.
    #[error("Customization not found: {0}")]
    CustomizationNotFound(String),

    /// A decimal amount could not be turned into money.
    #[error("Invalid amount '{input}': {reason}")]
    InvalidAmount { input: String, reason: String },

    /// Catalog entry failed field validation.
    #[error("Invalid customization: {0}")]
    InvalidCustomization(#[from] ValidationError),

    /// A line item carries structural violations where none are tolerated.
    ///
    /// ## When This Occurs
    /// - Restoring a persisted order item that no longer holds together
    /// - Finishing an editor session with blocking violations
    #[error("Pizza line rejected with {} violation(s)", .violations.len())]
    InvalidLine { violations: Vec<StructuralViolation> },

    /// Extraction input could not be parsed at all.
    #[error("Malformed customization input: {0}")]
    MalformedInput(String),

    /// Topping units or the surcharge do not fit their integer type.
    ///
    /// ## When This Occurs
    /// - Topping values summing past `u32::MAX`
    /// - `extra_units × extra_unit_cost` past `i64::MAX` cents
    #[error("Topping charge out of range: {0}")]
    ChargeOverflow(String),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Field validation errors for catalog entries.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Value must be zero or more.
    #[error("{field} must not be negative")]
    MustBeNonNegative { field: String },

    /// Value is not allowed in this position.
    #[error("{field} is not allowed: {reason}")]
    NotAllowed { field: String, reason: String },
}

// =============================================================================
// Structural Violation
// =============================================================================

/// A broken rule on a pizza line.
///
/// Each variant is independently reportable; the `Display` text is the
/// operator-facing message used when flagging extracted orders.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StructuralViolation {
    /// More flavors than a pizza can carry.
    #[error("a pizza can carry at most {max} flavors, found {count}")]
    TooManyFlavors { count: usize, max: usize },

    /// Two flavors were assigned to the same half.
    #[error("more than one flavor assigned to {half}")]
    FlavorHalfConflict { half: Half },

    /// A flavor or edit targets a half that does not exist in the current mode.
    #[error("customization {customization_id} targets {half}, which is not in use for a {mode} pizza")]
    HalfMismatch {
        customization_id: String,
        half: Half,
        mode: &'static str,
    },

    /// Line has neither a flavor nor an added ingredient.
    #[error("pizza requires personalization")]
    PersonalizationRequired,

    /// Referenced id does not exist in the catalog.
    #[error("unknown customization: {customization_id}")]
    UnresolvedReference { customization_id: String },

    /// Referenced entry is retired and the line did not already carry it.
    #[error("customization {customization_id} is no longer offered")]
    InactiveReference { customization_id: String },

    /// A flavor record asks to remove the flavor instead of selecting it.
    #[error("flavor {customization_id} cannot be removed, only selected")]
    FlavorRemoved { customization_id: String },

    /// A flavor used as an ingredient edit, or an ingredient placed as a flavor.
    #[error("customization {customization_id} cannot be used as {}", .expected.as_str())]
    KindMismatch {
        customization_id: String,
        expected: CustomizationKind,
    },

    /// Two records for the same ingredient on the same half.
    #[error("ingredient {customization_id} appears more than once on {half}")]
    DuplicateEdit { customization_id: String, half: Half },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
