//! End-to-end import lifecycle against an in-memory database, plus a
//! file-backed database for concurrent writers.

use std::sync::Arc;

use kho_core::{
    AuditAction, AuditEntity, CoreError, ImportStatus, NewImport, NewImportItem, NewProduct,
    NewProperty, NewSupplier, NewUser, PaymentStatus, UserRole,
};
use kho_db::{Database, DbConfig, DbError, RecordingRevalidator};

struct Shop {
    db: Database,
    recorder: Arc<RecordingRevalidator>,
    user_id: String,
    supplier_id: String,
    properties: Vec<String>,
}

async fn shop() -> Shop {
    shop_with(DbConfig::in_memory()).await
}

async fn shop_with(config: DbConfig) -> Shop {
    let recorder = Arc::new(RecordingRevalidator::new());
    let db = Database::new(config)
        .await
        .unwrap()
        .with_revalidator(recorder.clone());

    let user = db
        .users()
        .insert(&NewUser {
            email: "thu.kho@shop.vn".to_string(),
            name: "Phạm Thu".to_string(),
            role: UserRole::Staff,
        })
        .await
        .unwrap();

    let supplier = db
        .suppliers()
        .insert(&NewSupplier {
            name: "Giày da Bình Tiên".to_string(),
            ..Default::default()
        })
        .await
        .unwrap();

    let product = db
        .catalog()
        .create_product(&NewProduct {
            name: "Giày thể thao".to_string(),
            slug: "giay-the-thao".to_string(),
            description: None,
            properties: vec![
                NewProperty {
                    name: "Trắng / 40".to_string(),
                    sku: "GTT-TRANG-40".to_string(),
                    price: 890_000,
                    initial_quantity: 10,
                },
                NewProperty {
                    name: "Trắng / 41".to_string(),
                    sku: "GTT-TRANG-41".to_string(),
                    price: 890_000,
                    initial_quantity: 20,
                },
            ],
        })
        .await
        .unwrap();

    Shop {
        db,
        recorder,
        user_id: user.id,
        supplier_id: supplier.id,
        properties: product.properties.into_iter().map(|p| p.id).collect(),
    }
}

fn new_import(shop: &Shop, lines: &[(usize, i64)]) -> NewImport {
    NewImport {
        user_id: shop.user_id.clone(),
        supplier_id: shop.supplier_id.clone(),
        reference: Some("HD-0042".to_string()),
        description: Some("Nhập giày đợt 1".to_string()),
        payment_status: PaymentStatus::Pending,
        import_status: ImportStatus::Draft,
        items: lines
            .iter()
            .map(|&(idx, quantity)| NewImportItem {
                property_id: shop.properties[idx].clone(),
                quantity,
                net_price: 540_000,
                warranty_period_days: Some(180),
                warranty_expiry: None,
                notes: None,
            })
            .collect(),
    }
}

async fn stock(shop: &Shop, idx: usize) -> i64 {
    shop.db
        .inventory()
        .get_by_property(&shop.properties[idx])
        .await
        .unwrap()
        .unwrap()
        .quantity
}

#[tokio::test]
async fn draft_to_completed_adds_each_item_once() {
    let shop = shop().await;
    let imports = shop.db.imports();

    let detail = imports.create(&new_import(&shop, &[(0, 3), (1, 5)])).await.unwrap();
    let id = detail.import.id.clone();
    assert_eq!(detail.import.total_amount, 8 * 540_000);

    imports
        .update_status(&id, ImportStatus::Pending, Some(&shop.user_id))
        .await
        .unwrap();
    assert_eq!(stock(&shop, 0).await, 10);

    let processed = imports.process(&id, Some(&shop.user_id)).await.unwrap();
    assert_eq!(processed.import_status, ImportStatus::Completed);
    assert_eq!(stock(&shop, 0).await, 13);
    assert_eq!(stock(&shop, 1).await, 25);

    // a second attempt through either path is rejected and changes nothing
    assert!(imports.process(&id, None).await.is_err());
    assert!(imports
        .update_status(&id, ImportStatus::Completed, None)
        .await
        .is_err());
    assert_eq!(stock(&shop, 0).await, 13);
    assert_eq!(stock(&shop, 1).await, 25);

    let history = shop
        .db
        .audit_log()
        .list_for_entity(AuditEntity::InventoryImport, &id)
        .await
        .unwrap();
    let actions: Vec<AuditAction> = history.iter().map(|e| e.action).collect();
    assert_eq!(
        actions,
        vec![
            AuditAction::ImportCreated,
            AuditAction::ImportStatusUpdated,
            AuditAction::ImportProcessed,
        ]
    );

    let paths = shop.recorder.paths();
    assert!(paths.contains(&"/admin/inventory-imports".to_string()));
    assert!(paths.contains(&format!("/admin/inventory-imports/{id}")));
    assert!(paths.contains(&"/admin/inventory".to_string()));
}

#[tokio::test]
async fn failed_process_leaves_inventory_untouched() {
    let shop = shop().await;
    let imports = shop.db.imports();

    for status in [ImportStatus::Draft, ImportStatus::Cancelled] {
        let mut input = new_import(&shop, &[(0, 7)]);
        input.import_status = status;
        let id = imports.create(&input).await.unwrap().import.id;

        let err = imports.process(&id, None).await.unwrap_err();
        assert!(matches!(
            err,
            DbError::Domain(CoreError::ImportNotPending { .. })
        ));
    }

    assert_eq!(stock(&shop, 0).await, 10);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_process_adds_stock_once() {
    let dir = tempfile::tempdir().unwrap();
    let shop = shop_with(DbConfig::new(dir.path().join("kho.db")).max_connections(8)).await;

    let mut input = new_import(&shop, &[(0, 3)]);
    input.import_status = ImportStatus::Pending;
    let id = shop.db.imports().create(&input).await.unwrap().import.id;

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let db = shop.db.clone();
            let id = id.clone();
            tokio::spawn(async move { db.imports().process(&id, None).await })
        })
        .collect();

    let mut completed = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(import) => {
                assert_eq!(import.import_status, ImportStatus::Completed);
                completed += 1;
            }
            // losers see the committed status, never a locked database
            Err(err) => assert!(
                matches!(
                    err,
                    DbError::Domain(CoreError::ImportNotPending { .. })
                        | DbError::Domain(CoreError::ImportStatusChanged { .. })
                ),
                "unexpected error: {err}"
            ),
        }
    }

    assert_eq!(completed, 1);
    assert_eq!(stock(&shop, 0).await, 13);

    let history = shop
        .db
        .audit_log()
        .list_for_entity(AuditEntity::InventoryImport, &id)
        .await
        .unwrap();
    assert_eq!(history.len(), 2);
}

#[tokio::test]
async fn cancel_only_from_draft_or_pending() {
    let shop = shop().await;
    let imports = shop.db.imports();

    let mut input = new_import(&shop, &[(1, 1)]);
    input.payment_status = PaymentStatus::Paid;
    let draft = imports.create(&input).await.unwrap().import.id;

    let cancelled = imports.cancel(&draft, None).await.unwrap();
    assert_eq!(cancelled.import_status, ImportStatus::Cancelled);
    assert_eq!(cancelled.payment_status, PaymentStatus::Cancelled);

    let mut input = new_import(&shop, &[(1, 1)]);
    input.import_status = ImportStatus::Processing;
    let processing = imports.create(&input).await.unwrap().import.id;
    assert!(imports.cancel(&processing, None).await.is_err());

    let stored = imports.get_by_id(&processing).await.unwrap().unwrap();
    assert_eq!(stored.import_status, ImportStatus::Processing);
    assert_eq!(stored.payment_status, PaymentStatus::Pending);
}

#[tokio::test]
async fn bulk_reports_successes_and_failures() {
    let shop = shop().await;
    let imports = shop.db.imports();

    let mut ids = Vec::new();
    for status in [
        ImportStatus::Pending,
        ImportStatus::Pending,
        ImportStatus::Draft,
        ImportStatus::Pending,
        ImportStatus::Completed,
    ] {
        let mut input = new_import(&shop, &[(0, 1)]);
        input.import_status = status;
        ids.push(imports.create(&input).await.unwrap().import.id);
    }
    // the COMPLETED import received its unit on creation
    assert_eq!(stock(&shop, 0).await, 11);

    let report = imports.bulk_process(&ids, Some(&shop.user_id)).await;
    assert_eq!(report.results.len(), 5);
    assert_eq!(report.succeeded, 3);
    assert_eq!(report.failed, 2);
    assert!(!report.success);
    assert_eq!(stock(&shop, 0).await, 14);

    let report = imports
        .bulk_update_payment_status(&ids, PaymentStatus::Paid, None)
        .await;
    assert!(report.success);
    assert_eq!(report.succeeded, 5);
}
