//! Profit reports over a live ledger: window filtering, the default
//! exclusion of cancelled orders and the CSV export shape.

mod common;

use std::sync::Arc;

use shared::models::{CartItemInput, OrderCreate, OrderStatus};
use store_server::orders::{service, status};
use store_server::reports::{self, ProfitFilter};

use common::*;

async fn seed_order(
    pool: &sqlx::SqlitePool,
    catalog: &CountingCatalog,
    product_id: i64,
    qty: i64,
    to_status: Option<OrderStatus>,
) -> shared::models::Order {
    let order = service::create_order(
        pool,
        catalog,
        &policy(),
        &customer(),
        OrderCreate {
            items: vec![CartItemInput { product_id, qty }],
            note: None,
        },
    )
    .await
    .expect("create order");

    if let Some(target) = to_status {
        let (dispatcher, _mailer, _queue) = recording_dispatcher();
        status::transition_status(pool, catalog, &dispatcher, order.id, target)
            .await
            .expect("transition");
    }
    order
}

fn catalog() -> Arc<CountingCatalog> {
    Arc::new(CountingCatalog::new(vec![
        product(1, "Mug", 10.0, 4.0),
        product(2, "Tee", 25.0, 11.0),
    ]))
}

#[tokio::test]
async fn summary_excludes_cancelled_by_default() {
    let (pool, _dir) = test_pool().await;
    let catalog = catalog();

    // one confirmed Mug x2, one cancelled Tee x1
    seed_order(&pool, &catalog, 1, 2, Some(OrderStatus::Confirmed)).await;
    seed_order(&pool, &catalog, 2, 1, Some(OrderStatus::Cancelled)).await;

    let summary = reports::summary(&pool, &ProfitFilter::default())
        .await
        .expect("summary");
    assert_eq!(summary.orders_count, 1);
    assert_eq!(summary.revenue, 20.0); // shipping never counts as revenue
    assert_eq!(summary.cost, 8.0);
    assert_eq!(summary.margin, 12.0);

    // explicit cancelled filter flips the default
    let cancelled = reports::summary(
        &pool,
        &ProfitFilter {
            status: Some(OrderStatus::Cancelled),
            ..Default::default()
        },
    )
    .await
    .expect("cancelled summary");
    assert_eq!(cancelled.orders_count, 1);
    assert_eq!(cancelled.revenue, 25.0);
}

#[tokio::test]
async fn window_with_only_cancelled_orders_reads_empty() {
    let (pool, _dir) = test_pool().await;
    let catalog = catalog();
    seed_order(&pool, &catalog, 1, 1, Some(OrderStatus::Cancelled)).await;

    let summary = reports::summary(&pool, &ProfitFilter::default())
        .await
        .expect("summary");
    assert_eq!(summary.orders_count, 0);
    assert_eq!(summary.revenue, 0.0);
    assert_eq!(summary.cost, 0.0);
    assert_eq!(summary.margin, 0.0);

    let products = reports::by_product(&pool, &ProfitFilter::default())
        .await
        .expect("by product");
    assert!(products.is_empty());
}

#[tokio::test]
async fn window_bounds_are_start_inclusive_end_exclusive() {
    let (pool, _dir) = test_pool().await;
    let catalog = catalog();
    let order = seed_order(&pool, &catalog, 1, 1, Some(OrderStatus::Confirmed)).await;

    let inside = ProfitFilter {
        from: Some(order.created_at),
        to: Some(order.created_at + 1),
        ..Default::default()
    };
    assert_eq!(
        reports::summary(&pool, &inside).await.expect("summary").orders_count,
        1
    );

    let after = ProfitFilter {
        from: Some(order.created_at + 1),
        ..Default::default()
    };
    assert_eq!(
        reports::summary(&pool, &after).await.expect("summary").orders_count,
        0
    );

    let before = ProfitFilter {
        to: Some(order.created_at),
        ..Default::default()
    };
    assert_eq!(
        reports::summary(&pool, &before).await.expect("summary").orders_count,
        0
    );
}

#[tokio::test]
async fn by_product_and_by_order_agree_with_summary() {
    let (pool, _dir) = test_pool().await;
    let catalog = catalog();
    seed_order(&pool, &catalog, 1, 2, Some(OrderStatus::Confirmed)).await;
    seed_order(&pool, &catalog, 2, 1, Some(OrderStatus::Shipped)).await;

    let filter = ProfitFilter::default();
    let summary = reports::summary(&pool, &filter).await.expect("summary");
    let products = reports::by_product(&pool, &filter).await.expect("by product");
    let orders = reports::by_order(&pool, &filter).await.expect("by order");

    assert_eq!(summary.orders_count, 2);
    assert_eq!(products.len(), 2);
    assert_eq!(orders.len(), 2);

    // highest revenue first
    assert_eq!(products[0].product_name, "Tee");
    assert_eq!(products[0].revenue, 25.0);

    let product_revenue: f64 = products.iter().map(|p| p.revenue).sum();
    let order_revenue: f64 = orders.iter().map(|o| o.revenue).sum();
    assert_eq!(summary.revenue, product_revenue);
    assert_eq!(summary.revenue, order_revenue);

    // newest order first, stamped with an RFC 3339 date
    assert!(orders[0].date >= orders[1].date);
    assert!(orders[0].date.contains('T'));
    assert_eq!(orders[0].customer_email, "ada@example.com");
}

#[tokio::test]
async fn csv_export_carries_bom_header_and_two_decimal_money() {
    let (pool, _dir) = test_pool().await;
    let catalog = catalog();
    seed_order(&pool, &catalog, 1, 2, Some(OrderStatus::Confirmed)).await;

    let csv = reports::consumption_csv(&pool, &ProfitFilter::default())
        .await
        .expect("csv");

    assert!(csv.starts_with('\u{FEFF}'));
    let mut lines = csv.trim_start_matches('\u{FEFF}').lines();
    assert_eq!(
        lines.next(),
        Some("productId,productName,qty,revenue,cost,margin")
    );
    assert_eq!(lines.next(), Some("1,Mug,2,20.00,8.00,12.00"));
    assert_eq!(lines.next(), None);
}

#[tokio::test]
async fn sub_cent_catalog_precision_is_snapped_before_storage() {
    let (pool, _dir) = test_pool().await;
    let catalog = Arc::new(CountingCatalog::new(vec![product(3, "Sticker", 0.014, 0.006)]));

    let order = seed_order(&pool, &catalog, 3, 1, Some(OrderStatus::Confirmed)).await;
    assert_eq!(order.items[0].price, 0.01);
    assert_eq!(order.items[0].unit_cost, 0.01);

    let summary = reports::summary(&pool, &ProfitFilter::default())
        .await
        .expect("summary");
    assert_eq!(summary.revenue, 0.01);
    assert_eq!(summary.cost, 0.01);
    assert_eq!(summary.margin, summary.revenue - summary.cost);
}

#[tokio::test]
async fn per_product_revenue_sums_back_to_the_summary() {
    let (pool, _dir) = test_pool().await;
    let catalog = Arc::new(CountingCatalog::new(vec![
        product(4, "Pin", 0.005, 0.0),
        product(5, "Clip", 0.005, 0.0),
    ]));

    seed_order(&pool, &catalog, 4, 1, Some(OrderStatus::Confirmed)).await;
    seed_order(&pool, &catalog, 5, 1, Some(OrderStatus::Confirmed)).await;

    let filter = ProfitFilter::default();
    let summary = reports::summary(&pool, &filter).await.expect("summary");
    let by_product = reports::by_product(&pool, &filter)
        .await
        .expect("by product");

    let product_revenue: f64 = by_product.iter().map(|p| p.revenue).sum();
    assert_eq!(summary.revenue, 0.02);
    assert_eq!(summary.revenue, product_revenue);
}
