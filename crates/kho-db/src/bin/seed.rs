//! # Seed Data Generator
//!
//! Populates the database with demo data for development.
//!
//! ## Usage
//! ```bash
//! cargo run -p kho-db --bin seed
//!
//! # Specify database path
//! cargo run -p kho-db --bin seed -- --db ./data/kho.db
//! ```
//!
//! ## Generated Data
//! - One admin and two staff accounts
//! - Four suppliers (garment, footwear, accessories)
//! - Clothing and footwear products, one property per colour/size pair,
//!   each with an inventory row
//! - Three imports: one DRAFT, one PENDING, one processed (COMPLETED)

use std::env;

use kho_core::{
    ImportStatus, NewImport, NewImportItem, NewProduct, NewProperty, NewSupplier, NewUser,
    PaymentStatus, ProductDetail, UserRole,
};
use kho_db::{Database, DbConfig};

/// (name, slug, sku prefix, base price in đồng)
const PRODUCTS: &[(&str, &str, &str, i64)] = &[
    ("Áo thun cổ tròn", "ao-thun-co-tron", "ATCT", 199_000),
    ("Áo sơ mi tay dài", "ao-so-mi-tay-dai", "ASMTD", 349_000),
    ("Quần jean ống đứng", "quan-jean-ong-dung", "QJOD", 459_000),
    ("Váy liền thân", "vay-lien-than", "VLT", 529_000),
    ("Giày thể thao", "giay-the-thao", "GTT", 890_000),
    ("Dép quai ngang", "dep-quai-ngang", "DQN", 149_000),
];

/// (label, sku code)
const COLOURS: &[(&str, &str)] = &[("Đen", "DEN"), ("Trắng", "TRANG"), ("Xanh navy", "NAVY")];

const SIZES: &[&str] = &["S", "M", "L", "XL"];

const SUPPLIERS: &[(&str, &str, &str)] = &[
    ("Công ty May Việt Tiến", "Chị Ngọc", "028 3864 0800"),
    ("Dệt may Thành Công", "Anh Phúc", "028 3815 3962"),
    ("Giày da Bình Tiên", "Chị Thu", "028 3754 2271"),
    ("Phụ kiện Hoà Bình", "Anh Khoa", "024 3942 1188"),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut db_path = String::from("./kho_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Kho Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./kho_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Kho Seed Data Generator");
    println!("==========================");
    println!("Database: {}", db_path);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let existing = db.catalog().list_products().await?;
    if !existing.is_empty() {
        println!("⚠ Database already has {} products", existing.len());
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    // Users
    let admin = db
        .users()
        .insert(&NewUser {
            email: "admin@kho.vn".to_string(),
            name: "Trần Quốc Bảo".to_string(),
            role: UserRole::Admin,
        })
        .await?;
    for (email, name) in [("lan@kho.vn", "Nguyễn Thị Lan"), ("minh@kho.vn", "Lê Văn Minh")] {
        db.users()
            .insert(&NewUser {
                email: email.to_string(),
                name: name.to_string(),
                role: UserRole::Staff,
            })
            .await?;
    }
    println!("✓ Created 3 users");

    // Suppliers
    let mut suppliers = Vec::new();
    for (name, contact, phone) in SUPPLIERS {
        let supplier = db
            .suppliers()
            .insert(&NewSupplier {
                name: name.to_string(),
                contact_name: Some(contact.to_string()),
                phone: Some(phone.to_string()),
                ..Default::default()
            })
            .await?;
        suppliers.push(supplier);
    }
    println!("✓ Created {} suppliers", suppliers.len());

    // Catalog
    let mut products: Vec<ProductDetail> = Vec::new();
    for (seed, (name, slug, prefix, base_price)) in PRODUCTS.iter().enumerate() {
        let properties = COLOURS
            .iter()
            .flat_map(|(colour, code)| {
                SIZES.iter().enumerate().map(move |(size_idx, size)| NewProperty {
                    name: format!("{} / {}", colour, size),
                    sku: format!("{}-{}-{}", prefix, code, size),
                    price: base_price + size_idx as i64 * 10_000,
                    initial_quantity: ((seed * 7 + size_idx * 3) % 25) as i64,
                })
            })
            .collect();

        let detail = db
            .catalog()
            .create_product(&NewProduct {
                name: name.to_string(),
                slug: slug.to_string(),
                description: None,
                properties,
            })
            .await?;
        products.push(detail);
    }
    let property_count: usize = products.iter().map(|p| p.properties.len()).sum();
    println!(
        "✓ Created {} products with {} properties",
        products.len(),
        property_count
    );

    // Imports
    let plans = [
        (ImportStatus::Draft, PaymentStatus::Pending, "PN-0001"),
        (ImportStatus::Pending, PaymentStatus::PartiallyPaid, "PN-0002"),
        (ImportStatus::Pending, PaymentStatus::Paid, "PN-0003"),
    ];

    let mut to_process = None;
    for (idx, (status, payment, reference)) in plans.into_iter().enumerate() {
        let product = &products[idx % products.len()];
        let items = product
            .properties
            .iter()
            .take(4)
            .enumerate()
            .map(|(n, property)| NewImportItem {
                property_id: property.id.clone(),
                quantity: 10 + n as i64 * 5,
                net_price: property.price * 6 / 10,
                warranty_period_days: None,
                warranty_expiry: None,
                notes: None,
            })
            .collect();

        let detail = db
            .imports()
            .create(&NewImport {
                user_id: admin.id.clone(),
                supplier_id: suppliers[idx % suppliers.len()].id.clone(),
                reference: Some(reference.to_string()),
                description: Some(format!("Nhập hàng {}", product.product.name)),
                payment_status: payment,
                import_status: status,
                items,
            })
            .await?;

        println!(
            "  {} {} ({})",
            detail.import.reference.as_deref().unwrap_or("-"),
            detail.import.import_status,
            detail.import.total()
        );

        if payment == PaymentStatus::Paid {
            to_process = Some(detail.import.id);
        }
    }

    if let Some(id) = to_process {
        db.imports().process(&id, Some(&admin.id)).await?;
        println!("✓ Processed import {}", id);
    }

    println!();
    println!("✓ Seed complete!");

    Ok(())
}
