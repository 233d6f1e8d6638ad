//! # Repository Module
//!
//! Database repository implementations for pizza lines.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Collaborator Boundaries                              │
//! │                                                                         │
//! │  Engine need                 Repository                                │
//! │  ───────────                 ──────────                                │
//! │  catalog read          ──►   CustomizationRepository                  │
//! │                              ├── search(&query)                        │
//! │                              └── load_catalog()                        │
//! │  config read / write   ──►   PizzaConfigRepository                    │
//! │                              ├── get(product_id)                       │
//! │                              └── upsert(&config)                       │
//! │  line persistence      ──►   OrderItemCustomizationRepository         │
//! │                              ├── replace_for_item(item, records)       │
//! │                              └── list_for_item(item)                   │
//! │                                                                         │
//! │  SQL stays in this module; pizza-core never sees a row.               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod customization;
pub mod order_item;
pub mod pizza_config;
