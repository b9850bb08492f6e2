//! # Seed Data Loader
//!
//! Loads the initial shelf into the database, plus a bootstrap staff
//! account for the admin surface.
//!
//! ## Usage
//! ```bash
//! # Load into the default database
//! cargo run -p vendo-db --bin seed
//!
//! # Specify database path and admin credentials
//! cargo run -p vendo-db --bin seed -- --db ./data/vendo.db --admin-user admin --admin-pass s3cret
//! ```
//!
//! Seeding is skipped if the database already has products, so it is
//! safe to run on every deployment.

use std::env;

use vendo_core::{Category, NewProduct};
use vendo_db::{Database, DbConfig};

/// The initial shelf: (name, price in cents, stock).
const CAKES: &[(&str, i64, i64)] = &[
    ("Sando", 1500, 10),
    ("Biscrem", 2500, 10),
    ("Pocky (Strawberry)", 3000, 10),
    ("Taiyaki (Red Bean)", 3500, 10),
    ("M&Ms", 5000, 10),
    ("Motto", 2300, 10),
];

const DRINKS: &[(&str, i64, i64)] = &[
    ("Ramune (Original)", 5500, 10),
    ("Calpico (Calpis)", 5000, 10),
    ("Mirinda (raspberry)", 4500, 10),
    ("Water", 2500, 10),
    ("Sparkling Water (Vital)", 4000, 10),
    ("Coca Cola", 4500, 10),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut db_path = String::from("./vendo.db");
    let mut admin_user = String::from("admin");
    let mut admin_pass = String::from("admin");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--admin-user" => {
                if i + 1 < args.len() {
                    admin_user = args[i + 1].clone();
                    i += 1;
                }
            }
            "--admin-pass" => {
                if i + 1 < args.len() {
                    admin_pass = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Vendo Seed Data Loader");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>        Database file path (default: ./vendo.db)");
                println!("      --admin-user <U>   Bootstrap admin username (default: admin)");
                println!("      --admin-pass <P>   Bootstrap admin password (default: admin)");
                println!("  -h, --help             Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("Vendo Seed Data Loader");
    println!("======================");
    println!("Database: {}", db_path);
    println!();

    let config = DbConfig::new(&db_path);
    let db = Database::new(config).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let existing = db.products().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} products", existing);
        println!("  Skipping product seed to avoid duplicates.");
    } else {
        println!();
        println!("Loading products...");

        for &(name, price_cents, quantity) in CAKES {
            db.products()
                .insert(&NewProduct {
                    name: name.to_string(),
                    price_cents,
                    quantity,
                    category: Category::Cake,
                })
                .await?;
            println!("  Created cake: {}", name);
        }

        for &(name, price_cents, quantity) in DRINKS {
            db.products()
                .insert(&NewProduct {
                    name: name.to_string(),
                    price_cents,
                    quantity,
                    category: Category::Drink,
                })
                .await?;
            println!("  Created drink: {}", name);
        }

        println!();
        println!(
            "✓ Successfully loaded {} products!",
            CAKES.len() + DRINKS.len()
        );
    }

    if db.staff().count().await? > 0 {
        println!("⚠ Staff account already exists, skipping");
    } else {
        db.staff().create(&admin_user, &admin_pass).await?;
        println!("✓ Staff account '{}' created", admin_user);
    }

    Ok(())
}
