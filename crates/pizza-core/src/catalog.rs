//! # Catalog
//!
//! The per-request list of flavors and ingredients, with their topping-unit
//! costs.
//!
//! ## Two Ways to Read
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Pick lists                       Resolving existing choices            │
//! │  ──────────                       ──────────────────────────            │
//! │  list_active(kind)                lookup(id) / get(id)                  │
//! │  search(query)                                                          │
//! │                                                                         │
//! │  ACTIVE ONLY, by sort_order       ACTIVE AND INACTIVE                   │
//! │                                   (old order items must still display)  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use ts_rs::TS;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::types::{Customization, CustomizationKind};
use crate::validation::{validate_customization, validate_search_query};
use crate::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};

// =============================================================================
// Lookup Seam
// =============================================================================

/// Resolves customization ids.
///
/// The validator, the pricing calculator and the wire decoder only need this,
/// so callers can hand them anything that knows the catalog.
pub trait CustomizationLookup {
    /// Returns the entry for `id`, active or not.
    fn lookup(&self, id: &str) -> Option<&Customization>;
}

// =============================================================================
// Catalog
// =============================================================================

/// Immutable, ordered set of customizations.
///
/// ## Invariants
/// - Ids are unique
/// - Entries are kept sorted by `sort_order`, then name
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    entries: Vec<Customization>,
    index: HashMap<String, usize>,
}

impl Catalog {
    /// Builds a catalog from raw entries.
    ///
    /// ## Errors
    /// - `CoreError::InvalidCustomization` when an entry fails field checks or
    ///   an id appears twice
    pub fn new(entries: Vec<Customization>) -> CoreResult<Self> {
        let mut entries = entries;
        for entry in &entries {
            validate_customization(entry)?;
        }

        entries.sort_by(|a, b| {
            a.sort_order
                .cmp(&b.sort_order)
                .then_with(|| a.name.cmp(&b.name))
        });

        let mut index = HashMap::with_capacity(entries.len());
        for (position, entry) in entries.iter().enumerate() {
            if index.insert(entry.id.clone(), position).is_some() {
                return Err(ValidationError::NotAllowed {
                    field: "id".to_string(),
                    reason: format!("duplicate customization id '{}'", entry.id),
                }
                .into());
            }
        }

        Ok(Catalog { entries, index })
    }

    /// Active entries for pick lists, by ascending `sort_order`.
    ///
    /// ```rust
    /// use pizza_core::{Catalog, Customization, CustomizationKind};
    ///
    /// let catalog = Catalog::new(vec![
    ///     Customization::ingredient("toc", "Tocino", 1, 2),
    ///     Customization::flavor("pep", "Pepperoni", None, 4, 1),
    /// ]).unwrap();
    ///
    /// let flavors = catalog.list_active(Some(CustomizationKind::Flavor));
    /// assert_eq!(flavors.len(), 1);
    /// assert_eq!(flavors[0].id, "pep");
    /// ```
    pub fn list_active(&self, kind: Option<CustomizationKind>) -> Vec<&Customization> {
        self.entries
            .iter()
            .filter(|c| c.is_active)
            .filter(|c| kind.map_or(true, |k| c.kind == k))
            .collect()
    }

    /// Resolves an id, failing with `CustomizationNotFound`.
    pub fn get(&self, id: &str) -> CoreResult<&Customization> {
        self.lookup(id)
            .ok_or_else(|| CoreError::CustomizationNotFound(id.to_string()))
    }

    /// Filtered, paginated read mirroring the catalog endpoint.
    pub fn search(&self, query: &CatalogQuery) -> CoreResult<Page<Customization>> {
        let needle = match query.search.as_deref() {
            Some(text) => validate_search_query(text)?.map(|t| t.to_lowercase()),
            None => None,
        };

        let matching: Vec<&Customization> = self
            .entries
            .iter()
            .filter(|c| query.is_active.map_or(true, |active| c.is_active == active))
            .filter(|c| query.kind.map_or(true, |kind| c.kind == kind))
            .filter(|c| {
                needle
                    .as_deref()
                    .map_or(true, |n| c.name.to_lowercase().contains(n))
            })
            .collect();

        let page_size = query.effective_page_size();

        Ok(Page {
            total: matching.len() as u64,
            page: query.effective_page(),
            page_size,
            items: matching
                .into_iter()
                .skip(query.offset() as usize)
                .take(page_size as usize)
                .cloned()
                .collect(),
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl CustomizationLookup for Catalog {
    fn lookup(&self, id: &str) -> Option<&Customization> {
        self.index.get(id).map(|&position| &self.entries[position])
    }
}

// =============================================================================
// Query and Page
// =============================================================================

/// Filters for a catalog read.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CatalogQuery {
    pub is_active: Option<bool>,
    pub kind: Option<CustomizationKind>,
    /// Case-insensitive name substring.
    pub search: Option<String>,
    /// 1-based page number.
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

impl CatalogQuery {
    /// Pick-list query: active entries of one kind.
    pub fn active(kind: CustomizationKind) -> Self {
        CatalogQuery {
            is_active: Some(true),
            kind: Some(kind),
            ..Default::default()
        }
    }

    /// Page number, never below 1.
    pub fn effective_page(&self) -> u32 {
        self.page.unwrap_or(1).max(1)
    }

    /// Page size clamped to `1..=MAX_PAGE_SIZE`.
    pub fn effective_page_size(&self) -> u32 {
        self.page_size
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE)
    }

    /// Row offset for the current page.
    pub fn offset(&self) -> u64 {
        u64::from(self.effective_page() - 1) * u64::from(self.effective_page_size())
    }
}

/// One page of results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Matching rows across all pages.
    pub total: u64,
    pub page: u32,
    pub page_size: u32,
}

// =============================================================================
// Unit Tests
// =============================================================================
