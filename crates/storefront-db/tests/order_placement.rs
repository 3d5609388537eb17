//! Order placement against a real SQLite database.

mod common;

use chrono::Utc;
use common::{register, seeded_db, seeded_product, stocked_product, empty_db};
use storefront_db::{ErrorKind, PlacementError};

#[tokio::test]
async fn order_within_stock_decrements_and_persists() {
    let db = empty_db().await;
    let (_, product) = stocked_product(&db, "Austin", "Soap", 5).await;
    let buyer = register(&db, "Michael", "Hall", "mbhall").await;

    let before = Utc::now();
    let order = db
        .placement()
        .place_order(product.id, buyer.id, 3)
        .await
        .unwrap();

    assert_eq!(order.product_id, product.id);
    assert_eq!(order.customer_id, buyer.id);
    assert_eq!(order.quantity, 3);
    assert!(order.timestamp >= before);

    assert_eq!(db.products().get_inventory(product.id).await.unwrap(), 2);

    let stored = db.orders().get_by_id(order.id).await.unwrap().unwrap();
    assert_eq!(stored.quantity, 3);
    assert_eq!(stored.customer_id, buyer.id);
}

#[tokio::test]
async fn order_above_stock_is_rejected_without_mutation() {
    let db = empty_db().await;
    let (_, product) = stocked_product(&db, "Austin", "Soap", 5).await;
    let buyer = register(&db, "Michael", "Hall", "mbhall").await;

    let err = db
        .placement()
        .place_order(product.id, buyer.id, 10)
        .await
        .unwrap_err();

    match err {
        PlacementError::InsufficientInventory {
            product_id,
            available,
            requested,
        } => {
            assert_eq!(product_id, product.id);
            assert_eq!(available, 5);
            assert_eq!(requested, 10);
        }
        other => panic!("expected insufficient inventory, got {other:?}"),
    }

    assert_eq!(db.products().get_inventory(product.id).await.unwrap(), 5);
    assert_eq!(db.orders().count().await.unwrap(), 0);
}

#[tokio::test]
async fn order_for_exact_stock_is_rejected() {
    let db = empty_db().await;
    let (_, product) = stocked_product(&db, "Austin", "Soap", 5).await;
    let buyer = register(&db, "Michael", "Hall", "mbhall").await;

    let err = db
        .placement()
        .place_order(product.id, buyer.id, 5)
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::InsufficientInventory);
    assert_eq!(db.products().get_inventory(product.id).await.unwrap(), 5);

    db.placement().place_order(product.id, buyer.id, 4).await.unwrap();
    assert_eq!(db.products().get_inventory(product.id).await.unwrap(), 1);
}

#[tokio::test]
async fn non_positive_quantity_is_a_validation_error() {
    let db = empty_db().await;
    let (_, product) = stocked_product(&db, "Austin", "Soap", 5).await;
    let buyer = register(&db, "Michael", "Hall", "mbhall").await;

    for quantity in [0, -1, -20] {
        let err = db
            .placement()
            .place_order(product.id, buyer.id, quantity)
            .await
            .unwrap_err();
        assert!(matches!(err, PlacementError::Validation(_)));
        assert_eq!(err.kind(), ErrorKind::ValidationError);
    }

    assert_eq!(db.products().get_inventory(product.id).await.unwrap(), 5);
    assert_eq!(db.orders().count().await.unwrap(), 0);
}

#[tokio::test]
async fn missing_product_is_not_found() {
    let db = empty_db().await;
    let buyer = register(&db, "Michael", "Hall", "mbhall").await;

    let err = db.placement().place_order(404, buyer.id, 1).await.unwrap_err();

    assert!(matches!(err, PlacementError::NotFound { ref entity, .. } if entity == "Product"));
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn missing_customer_rolls_back_the_decrement() {
    let db = empty_db().await;
    let (_, product) = stocked_product(&db, "Austin", "Soap", 5).await;

    let err = db.placement().place_order(product.id, 999, 2).await.unwrap_err();

    assert!(matches!(err, PlacementError::ReferentialIntegrity(_)));
    assert_eq!(err.kind(), ErrorKind::ReferentialIntegrity);
    assert_eq!(db.products().get_inventory(product.id).await.unwrap(), 5);
    assert_eq!(db.orders().count().await.unwrap(), 0);
}

#[tokio::test]
async fn seeded_stock_levels_decide_admission() {
    let db = seeded_db().await;
    let buyer = register(&db, "Michael", "Hall", "mbhall").await;

    // (location, product, on hand) from the fixture
    let conditioner = seeded_product(&db, "New York", "Conditioner").await; // 20
    let soap = seeded_product(&db, "New York", "Soap").await; // 40

    let cases = [
        (conditioner.id, 30, false),
        (conditioner.id, 60, false),
        (soap.id, 60, false),
        (soap.id, 30, true),
        (conditioner.id, 10, true),
    ];

    for (product_id, quantity, accepted) in cases {
        let result = db.placement().place_order(product_id, buyer.id, quantity).await;
        assert_eq!(
            result.is_ok(),
            accepted,
            "product {product_id} quantity {quantity}: {result:?}"
        );
    }

    assert_eq!(db.products().get_inventory(conditioner.id).await.unwrap(), 10);
    assert_eq!(db.products().get_inventory(soap.id).await.unwrap(), 10);
    assert_eq!(db.orders().count().await.unwrap(), 2);
}

#[tokio::test]
async fn successive_orders_drain_to_one_unit() {
    let db = empty_db().await;
    let (_, product) = stocked_product(&db, "Austin", "Soap", 4).await;
    let buyer = register(&db, "Michael", "Hall", "mbhall").await;

    for _ in 0..3 {
        db.placement().place_order(product.id, buyer.id, 1).await.unwrap();
    }

    let err = db.placement().place_order(product.id, buyer.id, 1).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InsufficientInventory);
    assert_eq!(db.products().get_inventory(product.id).await.unwrap(), 1);
}
