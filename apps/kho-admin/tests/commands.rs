//! Admin commands against an in-memory database.

use kho_admin::commands::{catalog, imports};
use kho_admin::error::ErrorCode;
use kho_admin::state::DbState;
use kho_core::{
    ImportFilter, ImportStatus, NewImport, NewImportItem, NewProduct, NewProperty, NewSupplier,
    NewUser, PaymentStatus, UserRole,
};
use kho_db::{Database, DbConfig};

struct Setup {
    db: DbState,
    actor: String,
    supplier_id: String,
    property_id: String,
}

async fn setup() -> Setup {
    let db = DbState::new(Database::new(DbConfig::in_memory()).await.unwrap());

    let user = catalog::create_user(
        &db,
        &NewUser {
            email: "Lan@Kho.vn".to_string(),
            name: "Nguyễn Thị Lan".to_string(),
            role: UserRole::Staff,
        },
    )
    .await
    .unwrap();

    let supplier = catalog::create_supplier(
        &db,
        &NewSupplier {
            name: "Dệt may Thành Công".to_string(),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    let product = catalog::create_product(
        &db,
        &NewProduct {
            name: "Quần jean ống đứng".to_string(),
            slug: "quan-jean-ong-dung".to_string(),
            description: None,
            properties: vec![NewProperty {
                name: "Xanh / 30".to_string(),
                sku: "QJOD-XANH-30".to_string(),
                price: 459_000,
                initial_quantity: 4,
            }],
        },
    )
    .await
    .unwrap();

    Setup {
        db,
        actor: user.id,
        supplier_id: supplier.id,
        property_id: product.properties[0].id.clone(),
    }
}

fn input(setup: &Setup, status: ImportStatus, quantity: i64) -> NewImport {
    NewImport {
        user_id: setup.actor.clone(),
        supplier_id: setup.supplier_id.clone(),
        reference: Some("PN-0107".to_string()),
        description: None,
        payment_status: PaymentStatus::Pending,
        import_status: status,
        items: vec![NewImportItem {
            property_id: setup.property_id.clone(),
            quantity,
            net_price: 275_000,
            warranty_period_days: None,
            warranty_expiry: None,
            notes: None,
        }],
    }
}

#[tokio::test]
async fn process_through_commands_updates_stock_and_history() {
    let setup = setup().await;
    let actor = Some(setup.actor.as_str());

    let detail = imports::create_import(&setup.db, &input(&setup, ImportStatus::Pending, 6))
        .await
        .unwrap();
    let id = detail.import.id;

    let processed = imports::process_import(&setup.db, &id, actor).await.unwrap();
    assert_eq!(processed.import_status, ImportStatus::Completed);

    let stock = catalog::get_inventory(&setup.db, "QJOD-XANH-30").await.unwrap();
    assert_eq!(stock.quantity, 10);

    let history = imports::import_history(&setup.db, &id).await.unwrap();
    assert_eq!(history.len(), 2);
    assert!(history
        .iter()
        .all(|entry| entry.user_id.as_deref() == Some(setup.actor.as_str())));

    let err = imports::process_import(&setup.db, &id, actor).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::BusinessLogic);
}

#[tokio::test]
async fn malformed_and_unknown_ids_are_reported() {
    let setup = setup().await;

    let err = imports::get_import(&setup.db, "PN-0107").await.unwrap_err();
    assert_eq!(err.code, ErrorCode::ValidationError);

    let err = imports::cancel_import(&setup.db, "0b9c3f0e-2f51-4a43-8c1c-5d2f7d0c9a11", None)
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::NotFound);

    let mut bad_supplier = input(&setup, ImportStatus::Draft, 1);
    bad_supplier.supplier_id = "0b9c3f0e-2f51-4a43-8c1c-5d2f7d0c9a11".to_string();
    let err = imports::create_import(&setup.db, &bad_supplier).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::NotFound);

    let err = imports::bulk_cancel_imports(&setup.db, &[], None).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::ValidationError);
}

#[tokio::test]
async fn bulk_status_and_listing() {
    let setup = setup().await;

    let mut ids = Vec::new();
    for _ in 0..3 {
        let detail = imports::create_import(&setup.db, &input(&setup, ImportStatus::Draft, 1))
            .await
            .unwrap();
        ids.push(detail.import.id);
    }
    ids.push("not-an-id".to_string());

    let report =
        imports::bulk_update_import_status(&setup.db, &ids, ImportStatus::Pending, None)
            .await
            .unwrap();
    assert_eq!(report.succeeded, 3);
    assert_eq!(report.failed, 1);
    assert!(!report.success);

    let pending = imports::list_imports(
        &setup.db,
        &ImportFilter {
            import_status: Some(ImportStatus::Pending),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(pending.len(), 3);

    let err = imports::update_import_details(&setup.db, &ids[0], None, None, None)
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::ValidationError);

    let updated = imports::update_import_details(
        &setup.db,
        &ids[0],
        None,
        Some("Hàng về kho Thủ Đức"),
        None,
    )
    .await
    .unwrap();
    assert_eq!(updated.reference.as_deref(), Some("PN-0107"));
    assert_eq!(updated.description.as_deref(), Some("Hàng về kho Thủ Đức"));
}

#[tokio::test]
async fn inventory_adjustment_by_sku() {
    let setup = setup().await;

    let adjusted = catalog::adjust_inventory(&setup.db, "QJOD-XANH-30", -3, Some("kiểm kê"), None)
        .await
        .unwrap();
    assert_eq!(adjusted.quantity, 1);

    let err = catalog::adjust_inventory(&setup.db, "QJOD-XANH-30", -5, None, None)
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::ValidationError);

    let err = catalog::get_inventory(&setup.db, "KHONG-CO").await.unwrap_err();
    assert_eq!(err.code, ErrorCode::NotFound);

    let recent = catalog::recent_activity(&setup.db, 5).await.unwrap();
    assert!(!recent.is_empty());
}
