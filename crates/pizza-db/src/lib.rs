//! # pizza-db: Database Layer for Slice POS pizza lines
//!
//! This crate provides database access for pizza customization. It uses
//! SQLite for local storage with sqlx for async operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Pizza Line Data Flow                             │
//! │                                                                         │
//! │  Order screen / extraction worker                                      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     pizza-db (THIS CRATE)                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌────────────────┐   ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories  │   │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │◄───│ Customization  │   │  (embedded)  │  │   │
//! │  │   │               │    │ PizzaConfig    │   │ 001_init.sql │  │   │
//! │  │   │ SqlitePool    │    │ OrderItem      │   │              │  │   │
//! │  │   └───────────────┘    └────────────────┘   └──────────────┘  │   │
//! │  │            ▲                                                    │   │
//! │  │   ┌────────┴────────┐                                          │   │
//! │  │   │ SubmissionService│ ──► pizza_core::review_candidate        │   │
//! │  │   └─────────────────┘                                          │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite database (PIZZA_DB_PATH, default ./pizza_dev.db)               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Catalog, configuration and order item repositories
//! - [`submission`] - Accept-or-flag flow over the repositories
//!
//! ## Usage
//!
//! ```rust,ignore
//! use pizza_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("pizza.db")).await?;
//!
//! let outcome = db.submissions().submit("item-1", "pizza-grande", &records).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;
pub mod submission;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};
pub use submission::SubmissionService;

// Repository re-exports for convenience
pub use repository::customization::CustomizationRepository;
pub use repository::order_item::OrderItemCustomizationRepository;
pub use repository::pizza_config::PizzaConfigRepository;
