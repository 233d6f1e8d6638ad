//! # Customization Repository
//!
//! Database operations for the flavor / ingredient catalog.
//!
//! ## Key Operations
//! - Filtered, paginated catalog reads for pick lists and admin screens
//! - Loading the full catalog (inactive entries included) for the engine
//! - Insert / update / deactivate
//!
//! ## Why Inactive Rows Still Load
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Pick list:     WHERE is_active = 1           → new lines              │
//! │  load_catalog:  every row                     → saved lines resolve    │
//! │                                                                         │
//! │  A flavor retired today must still price and display on an order       │
//! │  item saved yesterday.                                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use tracing::debug;

use crate::error::{DbError, DbResult};
use pizza_core::validation::{validate_customization, validate_search_query, validate_topping_value};
use pizza_core::{Catalog, CatalogQuery, CoreError, Customization, CustomizationKind, Page};

const SELECT_COLUMNS: &str =
    "SELECT id, name, kind, base_ingredients_text, topping_value, is_active, sort_order \
     FROM pizza_customizations";

/// Raw catalog row.
#[derive(Debug, Clone, sqlx::FromRow)]
struct CustomizationRow {
    id: String,
    name: String,
    kind: CustomizationKind,
    base_ingredients_text: Option<String>,
    topping_value: i64,
    is_active: bool,
    sort_order: i64,
}

impl TryFrom<CustomizationRow> for Customization {
    type Error = DbError;

    fn try_from(row: CustomizationRow) -> DbResult<Self> {
        let topping_value = validate_topping_value(row.topping_value).map_err(CoreError::from)?;

        Ok(Customization {
            id: row.id,
            name: row.name,
            kind: row.kind,
            base_ingredients_text: row.base_ingredients_text,
            topping_value,
            is_active: row.is_active,
            sort_order: row.sort_order,
        })
    }
}

/// Repository for catalog database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = CustomizationRepository::new(pool);
///
/// let flavors = repo.search(&CatalogQuery::active(CustomizationKind::Flavor)).await?;
/// let catalog = repo.load_catalog().await?;
/// ```
#[derive(Debug, Clone)]
pub struct CustomizationRepository {
    pool: SqlitePool,
}

impl CustomizationRepository {
    /// Creates a new CustomizationRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CustomizationRepository { pool }
    }

    /// Filtered, paginated catalog read.
    ///
    /// ## Filters
    /// - `is_active`, `kind`: exact match when present
    /// - `search`: name substring, ASCII case-insensitive (SQLite `LIKE`)
    /// - ordered by `sort_order`, then name
    ///
    /// ## Errors
    /// - `DbError::Core` when the search text is longer than allowed
    pub async fn search(&self, query: &CatalogQuery) -> DbResult<Page<Customization>> {
        let needle = match query.search.as_deref() {
            Some(text) => validate_search_query(text).map_err(CoreError::from)?,
            None => None,
        };
        let page_size = query.effective_page_size();

        debug!(
            kind = ?query.kind,
            is_active = ?query.is_active,
            search = ?needle,
            page = query.effective_page(),
            page_size,
            "Searching customizations"
        );

        let mut count = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM pizza_customizations");
        push_filters(&mut count, query, needle.as_deref());
        let total: i64 = count.build_query_scalar().fetch_one(&self.pool).await?;

        let mut select = QueryBuilder::<Sqlite>::new(SELECT_COLUMNS);
        push_filters(&mut select, query, needle.as_deref());
        select
            .push(" ORDER BY sort_order, name LIMIT ")
            .push_bind(i64::from(page_size))
            .push(" OFFSET ")
            .push_bind(query.offset() as i64);

        let rows: Vec<CustomizationRow> = select.build_query_as().fetch_all(&self.pool).await?;
        let items = rows
            .into_iter()
            .map(Customization::try_from)
            .collect::<DbResult<Vec<_>>>()?;

        debug!(count = items.len(), total, "Search returned customizations");

        Ok(Page {
            items,
            total: total.max(0) as u64,
            page: query.effective_page(),
            page_size,
        })
    }

    /// Loads every catalog row, active or not, into an engine catalog.
    pub async fn load_catalog(&self) -> DbResult<Catalog> {
        let sql = format!("{SELECT_COLUMNS} ORDER BY sort_order, name");
        let rows: Vec<CustomizationRow> = sqlx::query_as(&sql).fetch_all(&self.pool).await?;

        debug!(count = rows.len(), "Loaded customization catalog");

        let entries = rows
            .into_iter()
            .map(Customization::try_from)
            .collect::<DbResult<Vec<_>>>()?;

        Ok(Catalog::new(entries)?)
    }

    /// Gets a customization by its ID, active or not.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Customization>> {
        let sql = format!("{SELECT_COLUMNS} WHERE id = ?1");
        let row: Option<CustomizationRow> = sqlx::query_as(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(Customization::try_from).transpose()
    }

    /// Inserts a new catalog entry.
    ///
    /// ## Errors
    /// - `DbError::Core` when the entry fails field validation
    /// - `DbError::UniqueViolation` when the id is taken
    pub async fn insert(&self, customization: &Customization) -> DbResult<Customization> {
        validate_customization(customization).map_err(CoreError::from)?;

        debug!(id = %customization.id, name = %customization.name, "Inserting customization");

        let now = Utc::now();

        sqlx::query(
            r#"
            INSERT INTO pizza_customizations (
                id, name, kind, base_ingredients_text, topping_value,
                is_active, sort_order, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
        )
        .bind(&customization.id)
        .bind(customization.name.trim())
        .bind(customization.kind)
        .bind(&customization.base_ingredients_text)
        .bind(i64::from(customization.topping_value))
        .bind(customization.is_active)
        .bind(customization.sort_order)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| match DbError::from(e) {
            DbError::UniqueViolation { .. } => DbError::duplicate("customization id", &customization.id),
            other => other,
        })?;

        Ok(Customization {
            name: customization.name.trim().to_string(),
            ..customization.clone()
        })
    }

    /// Updates an existing catalog entry.
    ///
    /// ## Errors
    /// - `DbError::NotFound` when the id doesn't exist
    pub async fn update(&self, customization: &Customization) -> DbResult<()> {
        validate_customization(customization).map_err(CoreError::from)?;

        debug!(id = %customization.id, "Updating customization");

        let result = sqlx::query(
            r#"
            UPDATE pizza_customizations SET
                name = ?2,
                kind = ?3,
                base_ingredients_text = ?4,
                topping_value = ?5,
                is_active = ?6,
                sort_order = ?7,
                updated_at = ?8
            WHERE id = ?1
            "#,
        )
        .bind(&customization.id)
        .bind(customization.name.trim())
        .bind(customization.kind)
        .bind(&customization.base_ingredients_text)
        .bind(i64::from(customization.topping_value))
        .bind(customization.is_active)
        .bind(customization.sort_order)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Customization", &customization.id));
        }

        Ok(())
    }

    /// Hides an entry from pick lists. Saved order items keep resolving it.
    pub async fn deactivate(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deactivating customization");

        let result = sqlx::query(
            "UPDATE pizza_customizations SET is_active = 0, updated_at = ?2 WHERE id = ?1",
        )
        .bind(id)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Customization", id));
        }

        Ok(())
    }

    /// Counts active entries (for diagnostics and seeding).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM pizza_customizations WHERE is_active = 1")
                .fetch_one(&self.pool)
                .await?;

        Ok(count)
    }
}

fn push_filters(builder: &mut QueryBuilder<'_, Sqlite>, query: &CatalogQuery, needle: Option<&str>) {
    builder.push(" WHERE 1 = 1");

    if let Some(active) = query.is_active {
        builder.push(" AND is_active = ").push_bind(active);
    }
    if let Some(kind) = query.kind {
        builder.push(" AND kind = ").push_bind(kind);
    }
    if let Some(needle) = needle {
        builder
            .push(" AND name LIKE ")
            .push_bind(format!("%{}%", escape_like(needle)))
            .push(" ESCAPE '\\'");
    }
}

fn escape_like(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

// =============================================================================
// Unit Tests
// =============================================================================
