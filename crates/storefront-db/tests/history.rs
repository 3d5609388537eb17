//! Query layer views over placed orders.

mod common;

use common::{register, seeded_db, seeded_product};
use storefront_core::{CustomerFilter, NewOrder};
use storefront_db::DbError;

#[tokio::test]
async fn customer_history_is_oldest_first() {
    let db = seeded_db().await;
    let buyer = register(&db, "Michael", "Hall", "mbhall").await;
    let other = register(&db, "Maria", "Stone", "mstone").await;

    let shampoo = seeded_product(&db, "New York", "Shampoo").await;
    let soap = seeded_product(&db, "Austin", "Soap").await;

    let first = db.placement().place_order(shampoo.id, buyer.id, 2).await.unwrap();
    db.placement().place_order(soap.id, other.id, 1).await.unwrap();
    let second = db.placement().place_order(soap.id, buyer.id, 5).await.unwrap();

    let history = db.queries().customer_history(buyer.id).await.unwrap();

    let ids: Vec<i64> = history.iter().map(|v| v.order.id).collect();
    assert_eq!(ids, vec![first.id, second.id]);
    assert!(history[0].order.timestamp <= history[1].order.timestamp);
    assert!(history.iter().all(|v| v.customer.id == buyer.id));

    assert_eq!(history[0].store.location, "New York");
    assert_eq!(history[1].product.product_name, "Soap");
    assert_eq!(history[1].line_total().to_string(), "$10.00");
}

#[tokio::test]
async fn history_for_customer_without_orders_is_empty() {
    let db = seeded_db().await;
    let idle = register(&db, "Peter", "Stone", "pstone").await;

    assert!(db.queries().customer_history(idle.id).await.unwrap().is_empty());
    assert!(db.queries().customer_history(12345).await.unwrap().is_empty());
}

#[tokio::test]
async fn store_history_filters_on_customer_id() {
    let db = seeded_db().await;
    let buyer = register(&db, "Michael", "Hall", "mbhall").await;

    // Austin is store 3; this customer is id 1
    let austin_soap = seeded_product(&db, "Austin", "Soap").await;
    let order = db
        .placement()
        .place_order(austin_soap.id, buyer.id, 1)
        .await
        .unwrap();

    let by_store_id = db.queries().store_history(austin_soap.store_id).await.unwrap();
    let by_customer_id = db.queries().store_history(buyer.id).await.unwrap();

    assert_ne!(austin_soap.store_id, buyer.id);
    assert!(by_store_id.is_empty());
    assert_eq!(by_customer_id.len(), 1);
    assert_eq!(by_customer_id[0].order.id, order.id);
}

#[tokio::test]
async fn order_details_round_trip() {
    let db = seeded_db().await;
    let buyer = register(&db, "Michael", "Hall", "mbhall").await;
    let conditioner = seeded_product(&db, "Harrisburg", "Conditioner").await;

    let order = db
        .placement()
        .place_order(conditioner.id, buyer.id, 7)
        .await
        .unwrap();

    let view = db.queries().order_details(order.id).await.unwrap();
    assert_eq!(view.order.id, order.id);
    assert_eq!(view.order.product_id, conditioner.id);
    assert_eq!(view.order.customer_id, buyer.id);
    assert_eq!(view.order.quantity, 7);
    assert_eq!(view.customer, buyer);
    assert_eq!(view.store.location, "Harrisburg");
    // View reflects the current stock, after this order
    assert_eq!(view.product.inventory, 33);

    let err = db.queries().order_details(order.id + 100).await.unwrap_err();
    assert!(matches!(err, DbError::NotFound { .. }));
}

#[tokio::test]
async fn all_orders_lists_every_customer() {
    let db = seeded_db().await;
    let buyer = register(&db, "Michael", "Hall", "mbhall").await;
    let other = register(&db, "Maria", "Stone", "mstone").await;
    let soap = seeded_product(&db, "Harrisburg", "Soap").await;

    db.placement().place_order(soap.id, buyer.id, 1).await.unwrap();
    db.placement().place_order(soap.id, other.id, 2).await.unwrap();

    // Inserted directly, bypassing the stock check
    db.orders()
        .insert(NewOrder {
            product_id: soap.id,
            customer_id: buyer.id,
            quantity: 3,
        })
        .await
        .unwrap();

    let all = db.queries().all_orders().await.unwrap();
    let quantities: Vec<i64> = all.iter().map(|v| v.order.quantity).collect();
    assert_eq!(quantities, vec![1, 2, 3]);
    assert!(all.windows(2).all(|w| w[0].order.timestamp <= w[1].order.timestamp));
}

#[tokio::test]
async fn selection_lists_follow_catalog() {
    let db = seeded_db().await;
    register(&db, "Michael", "Hall", "mbhall").await;

    let products = db.queries().product_selection_list().await.unwrap();
    let labels: Vec<&str> = products.iter().map(|i| i.label.as_str()).collect();

    assert_eq!(labels.len(), 9);
    assert_eq!(labels[0], "New York | Shampoo | Inventory: 30 @ $6.50 each");
    assert_eq!(labels[1], "New York | Conditioner | Inventory: 20 @ $5.00 each");
    assert_eq!(labels[4], "Harrisburg | Conditioner | Inventory: 40 @ $4.00 each");
    assert_eq!(labels[8], "Austin | Soap | Inventory: 60 @ $2.00 each");

    let customers = db.queries().customer_selection_list().await.unwrap();
    assert_eq!(customers.len(), 1);
    assert_eq!(customers[0].label, "mbhall");

    let stores = db.queries().list_stores().await.unwrap();
    let locations: Vec<&str> = stores.iter().map(|s| s.location.as_str()).collect();
    assert_eq!(locations, vec!["New York", "Harrisburg", "Austin"]);
}

#[tokio::test]
async fn customer_search_agrees_with_filter_predicate() {
    let db = seeded_db().await;
    register(&db, "Michael", "Hall", "mbhall").await;
    register(&db, "Maria", "Hallows", "mhallows").await;
    register(&db, "Peter", "Stone", "pstone").await;

    let everyone = db
        .queries()
        .list_customers(&CustomerFilter::default())
        .await
        .unwrap();

    let filters = [
        CustomerFilter::default().first_name("M"),
        CustomerFilter::default().last_name("Hall"),
        CustomerFilter::default().user_name("stone"),
        CustomerFilter::default().first_name("Ma").last_name("Hall"),
        CustomerFilter::default().first_name("").user_name("hall"),
        CustomerFilter::default().last_name("hall"),
    ];

    for filter in filters {
        let found = db.queries().list_customers(&filter).await.unwrap();
        let expected: Vec<_> = everyone
            .iter()
            .filter(|c| filter.matches(c))
            .cloned()
            .collect();
        assert_eq!(found, expected, "{filter:?}");
    }
}
