//! # Validation Module
//!
//! Field-level validation for catalog entries and catalog queries.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: THIS MODULE - single values                                  │
//! │  ├── Names, search text                                                │
//! │  └── Flavor-only fields on ingredients                                 │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: validator module - whole pizza lines                         │
//! │  ├── Flavor cardinality, half consistency                              │
//! │  └── Personalization, reference integrity                              │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  └── CHECK / UNIQUE / FOREIGN KEY constraints                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::ValidationError;
use crate::types::{Customization, CustomizationKind};
use crate::{MAX_NAME_LENGTH, MAX_SEARCH_LENGTH};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Validates a customization display name.
///
/// ## Rules
/// - Must not be empty after trimming
/// - At most `MAX_NAME_LENGTH` characters
///
/// ```rust
/// use pizza_core::validation::validate_customization_name;
///
/// assert!(validate_customization_name("Pepperoni").is_ok());
/// assert!(validate_customization_name("   ").is_err());
/// ```
pub fn validate_customization_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.chars().count() > MAX_NAME_LENGTH {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: MAX_NAME_LENGTH,
        });
    }

    Ok(())
}

/// Validates a whole catalog entry.
///
/// ## Rules
/// - Non-empty id and valid name
/// - `base_ingredients_text` must be absent or blank on ingredients
pub fn validate_customization(customization: &Customization) -> ValidationResult<()> {
    if customization.id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "id".to_string(),
        });
    }

    validate_customization_name(&customization.name)?;

    let has_base_text = customization
        .base_ingredients_text
        .as_deref()
        .map_or(false, |text| !text.trim().is_empty());

    if customization.kind == CustomizationKind::Ingredient && has_base_text {
        return Err(ValidationError::NotAllowed {
            field: "base_ingredients_text".to_string(),
            reason: "only flavors carry a base ingredient list".to_string(),
        });
    }

    Ok(())
}

/// Validates a topping value coming from an untyped source (DB row, form).
pub fn validate_topping_value(value: i64) -> ValidationResult<u32> {
    if value < 0 {
        return Err(ValidationError::MustBeNonNegative {
            field: "topping_value".to_string(),
        });
    }

    u32::try_from(value).map_err(|_| ValidationError::NotAllowed {
        field: "topping_value".to_string(),
        reason: "value too large".to_string(),
    })
}

/// Validates a free-text catalog search.
///
/// ## Returns
/// The trimmed query, or `None` when blank.
pub fn validate_search_query(query: &str) -> ValidationResult<Option<String>> {
    let query = query.trim();

    if query.chars().count() > MAX_SEARCH_LENGTH {
        return Err(ValidationError::TooLong {
            field: "query".to_string(),
            max: MAX_SEARCH_LENGTH,
        });
    }

    if query.is_empty() {
        return Ok(None);
    }

    Ok(Some(query.to_string()))
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_customization_name() {
        assert!(validate_customization_name("Hawaiana").is_ok());
        assert!(validate_customization_name("").is_err());
        assert!(validate_customization_name(&"A".repeat(MAX_NAME_LENGTH + 1)).is_err());
    }

    #[test]
    fn test_ingredient_cannot_carry_base_text() {
        let mut tocino = Customization::ingredient("toc", "Tocino", 1, 1);
        assert!(validate_customization(&tocino).is_ok());

        tocino.base_ingredients_text = Some("   ".to_string());
        assert!(validate_customization(&tocino).is_ok());

        tocino.base_ingredients_text = Some("bacon".to_string());
        assert!(matches!(
            validate_customization(&tocino),
            Err(ValidationError::NotAllowed { .. })
        ));
    }

    #[test]
    fn test_flavor_may_carry_base_text() {
        let flavor = Customization::flavor("haw", "Hawaiana", Some("ham, pineapple".into()), 3, 2);
        assert!(validate_customization(&flavor).is_ok());
    }

    #[test]
    fn test_validate_customization_requires_id() {
        let flavor = Customization::flavor(" ", "Hawaiana", None, 3, 2);
        assert!(matches!(
            validate_customization(&flavor),
            Err(ValidationError::Required { .. })
        ));
    }

    #[test]
    fn test_validate_topping_value() {
        assert_eq!(validate_topping_value(0).unwrap(), 0);
        assert_eq!(validate_topping_value(4).unwrap(), 4);
        assert!(validate_topping_value(-1).is_err());
        assert!(validate_topping_value(i64::MAX).is_err());
    }

    #[test]
    fn test_validate_search_query() {
        assert_eq!(validate_search_query("  pep ").unwrap(), Some("pep".to_string()));
        assert_eq!(validate_search_query("   ").unwrap(), None);
        assert!(validate_search_query(&"x".repeat(MAX_SEARCH_LENGTH + 1)).is_err());
    }
}
