//! # Seed Data Generator
//!
//! Populates the database with a demo pizza catalog and product configs.
//!
//! ## Usage
//! ```bash
//! # Seed ./pizza_dev.db (or $PIZZA_DB_PATH)
//! cargo run -p pizza-db --bin seed
//!
//! # Specify database path
//! cargo run -p pizza-db --bin seed -- --db ./data/pizza.db
//!
//! # More logging
//! RUST_LOG=debug cargo run -p pizza-db --bin seed
//! ```
//!
//! ## Generated Data
//! - Flavors with their base ingredients and topping values
//! - Ingredients for per-half add / remove
//! - Configs for three pizza sizes
//! - One demo order item per size, submitted through the normal flow

use std::env;
use tracing::info;
use tracing_subscriber::EnvFilter;

use pizza_core::{
    CatalogQuery, Customization, CustomizationKind, Half, IngredientAction, IntakeOutcome, Money,
    PizzaLineEditor, ProductPizzaConfig,
};
use pizza_db::{Database, DbConfig};

/// (name, base ingredients, topping value)
const FLAVORS: &[(&str, &str, u32)] = &[
    ("Pepperoni", "Salsa de tomate, queso mozzarella, pepperoni", 4),
    ("Hawaiana", "Salsa de tomate, queso mozzarella, jamón, piña", 3),
    ("Mexicana", "Frijol, chorizo, jalapeño, cebolla, queso", 5),
    ("Vegetariana", "Pimiento, champiñón, cebolla, aceituna", 3),
    ("Cuatro Quesos", "Mozzarella, cheddar, parmesano, queso azul", 4),
    ("Margarita", "Salsa de tomate, mozzarella, albahaca", 2),
];

/// (name, topping value)
const INGREDIENTS: &[(&str, u32)] = &[
    ("Tocino", 1),
    ("Jalapeño", 1),
    ("Piña", 1),
    ("Champiñón", 1),
    ("Aceituna", 1),
    ("Cebolla", 0),
    ("Extra queso", 2),
    ("Chorizo", 2),
];

/// (product id, included units, extra unit cost)
const PRODUCTS: &[(&str, i64, &str)] = &[
    ("pizza-chica", 3, "15.00"),
    ("pizza-mediana", 4, "20.00"),
    ("pizza-grande", 6, "25.50"),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let args: Vec<String> = env::args().collect();
    let mut db_path: Option<&str> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = Some(args[i + 1].as_str());
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Slice POS Pizza Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: $PIZZA_DB_PATH or ./pizza_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }
    let config = DbConfig::resolve(db_path);

    println!("🍕 Slice POS Pizza Seed Data Generator");
    println!("=====================================");
    println!("Database: {}", config.database_path.display());
    println!();

    let db = Database::new(config).await?;
    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let existing = db.customizations().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} customizations", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    seed_catalog(&db).await?;
    seed_configs(&db).await?;
    seed_demo_orders(&db).await?;

    println!();
    println!("✓ Seed complete!");

    Ok(())
}

/// Installs the subscriber; `RUST_LOG` overrides the default filter.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,pizza=debug,sqlx=warn"));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}

async fn seed_catalog(db: &Database) -> Result<(), Box<dyn std::error::Error>> {
    let repo = db.customizations();

    for (position, (name, base, value)) in FLAVORS.iter().enumerate() {
        let entry = Customization::flavor(
            slug(name),
            *name,
            Some(base.to_string()),
            *value,
            position as i64,
        );
        repo.insert(&entry).await?;
    }

    for (position, (name, value)) in INGREDIENTS.iter().enumerate() {
        let entry = Customization::ingredient(slug(name), *name, *value, 100 + position as i64);
        repo.insert(&entry).await?;
    }

    let flavors = repo.search(&CatalogQuery::active(CustomizationKind::Flavor)).await?;
    let ingredients = repo
        .search(&CatalogQuery::active(CustomizationKind::Ingredient))
        .await?;

    println!(
        "✓ Catalog: {} flavors, {} ingredients",
        flavors.total, ingredients.total
    );
    Ok(())
}

async fn seed_configs(db: &Database) -> Result<(), Box<dyn std::error::Error>> {
    let repo = db.pizza_configs();

    for (product_id, included, cost) in PRODUCTS {
        let config = ProductPizzaConfig::new(*product_id, *included, Money::parse_decimal(cost)?)?;
        let stored = repo.upsert(&config).await?;
        println!(
            "✓ {}: {} units included, {} per extra unit",
            stored.product_id, stored.included_topping_units, stored.extra_unit_cost
        );
    }
    Ok(())
}

/// Builds one half-and-half line per product with the editor, then submits it.
async fn seed_demo_orders(db: &Database) -> Result<(), Box<dyn std::error::Error>> {
    let catalog = db.customizations().load_catalog().await?;

    println!();
    println!("Demo orders:");

    for (index, (product_id, _, _)) in PRODUCTS.iter().enumerate() {
        let config = db.pizza_configs().get(product_id).await?;
        let mut editor = PizzaLineEditor::new(&catalog, config);

        editor.toggle_flavor("pepperoni");
        editor.toggle_flavor("mexicana");
        editor.cycle_ingredient("extra-queso", Half::Half1);
        editor.toggle_ingredient("jalapeno", Half::Half2, IngredientAction::Add);
        editor.toggle_ingredient("jalapeno", Half::Half2, IngredientAction::Remove);

        let finished = editor.finish()?;
        let order_item_id = format!("demo-item-{}", index + 1);

        match db
            .submissions()
            .submit(&order_item_id, product_id, &finished.records)
            .await?
        {
            IntakeOutcome::Accepted { charge, .. } => {
                info!(order_item_id = %order_item_id, "Demo line stored");
                println!(
                    "  {} ({}): {}",
                    order_item_id,
                    product_id,
                    serde_json::to_string(&charge)?
                );
            }
            IntakeOutcome::Flagged { messages, .. } => {
                println!("  {} ({}): flagged {:?}", order_item_id, product_id, messages);
            }
        }
    }
    Ok(())
}

/// "Extra queso" → "extra-queso", "Jalapeño" → "jalapeno".
fn slug(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            'á' | 'Á' => 'a',
            'é' | 'É' => 'e',
            'í' | 'Í' => 'i',
            'ó' | 'Ó' => 'o',
            'ú' | 'Ú' => 'u',
            'ñ' | 'Ñ' => 'n',
            ' ' => '-',
            other => other.to_ascii_lowercase(),
        })
        .collect()
}
