mod common;

use rust_decimal::Decimal;

use storefront_api::{
    config::PolicyLimits,
    dto::{cart::AddToCartRequest, orders::UpdateOrderStatusRequest},
    error::AppError,
    models::OrderStatus,
    routes::params::{OrderListQuery, Pagination},
    services::{
        admin_service, cart_service,
        order_service::{self, CheckoutOutcome},
    },
};

use common::{create_admin, create_user, seed_product, test_pool};

#[tokio::test]
async fn admin_walks_an_order_through_its_lifecycle() -> anyhow::Result<()> {
    let Some(pool) = test_pool().await else {
        eprintln!("Skipping test: set TEST_DATABASE_URL or DATABASE_URL to run DB flows.");
        return Ok(());
    };
    let limits = PolicyLimits::default();
    let user = create_user(&pool).await;
    let admin = create_admin(&pool).await;
    let product_id = seed_product(&pool, "Shipped Widget", Decimal::new(10000, 2)).await;

    cart_service::add_to_cart(
        &pool,
        &limits,
        &user,
        AddToCartRequest {
            product_id,
            quantity: 1,
        },
    )
    .await?;
    let outcome = order_service::checkout(
        &pool,
        &user,
        storefront_api::dto::orders::CheckoutRequest {
            first_name: "Ivan".into(),
            last_name: "Petrov".into(),
            phone: "+79991234567".into(),
            address: "Lenina 1".into(),
        },
    )
    .await?;
    let CheckoutOutcome::Completed(placed) = outcome else {
        panic!("expected a committed order");
    };
    let order_id = placed.order.id;

    // Skipping a step is rejected; only status is mutable.
    let err = admin_service::update_order_status(
        &pool,
        &admin,
        order_id,
        UpdateOrderStatusRequest {
            status: OrderStatus::Shipped,
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    for status in [
        OrderStatus::Processing,
        OrderStatus::Shipped,
        OrderStatus::Delivered,
    ] {
        let order =
            admin_service::update_order_status(
                &pool,
                &admin,
                order_id,
                UpdateOrderStatusRequest { status },
            )
            .await?;
        assert_eq!(order.status, status);
    }

    // Delivered is terminal, even for cancellation.
    let err = admin_service::update_order_status(
        &pool,
        &admin,
        order_id,
        UpdateOrderStatusRequest {
            status: OrderStatus::Cancelled,
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    // The order total never moved while the status did.
    let reread = order_service::get_order(&pool, &user, order_id).await?;
    assert_eq!(reread.order.total_price, Decimal::new(10000, 2));

    Ok(())
}

#[tokio::test]
async fn admin_surface_is_role_gated() -> anyhow::Result<()> {
    let Some(pool) = test_pool().await else {
        eprintln!("Skipping test: set TEST_DATABASE_URL or DATABASE_URL to run DB flows.");
        return Ok(());
    };
    let user = create_user(&pool).await;

    let err = admin_service::list_all_orders(
        &pool,
        &user,
        OrderListQuery {
            pagination: Pagination {
                page: None,
                per_page: None,
            },
            status: None,
            sort_order: None,
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::Forbidden));

    Ok(())
}

#[tokio::test]
async fn users_see_only_their_own_orders() -> anyhow::Result<()> {
    let Some(pool) = test_pool().await else {
        eprintln!("Skipping test: set TEST_DATABASE_URL or DATABASE_URL to run DB flows.");
        return Ok(());
    };
    let limits = PolicyLimits::default();
    let buyer = create_user(&pool).await;
    let other = create_user(&pool).await;
    let product_id = seed_product(&pool, "Owned Widget", Decimal::new(10000, 2)).await;

    cart_service::add_to_cart(
        &pool,
        &limits,
        &buyer,
        AddToCartRequest {
            product_id,
            quantity: 1,
        },
    )
    .await?;
    let CheckoutOutcome::Completed(placed) = order_service::checkout(
        &pool,
        &buyer,
        storefront_api::dto::orders::CheckoutRequest {
            first_name: "Ivan".into(),
            last_name: "Petrov".into(),
            phone: "+79991234567".into(),
            address: "Lenina 1".into(),
        },
    )
    .await?
    else {
        panic!("expected a committed order");
    };

    let err = order_service::get_order(&pool, &other, placed.order.id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound));

    let (list, meta) = order_service::list_orders(
        &pool,
        &buyer,
        OrderListQuery {
            pagination: Pagination {
                page: None,
                per_page: None,
            },
            status: Some(OrderStatus::New),
            sort_order: None,
        },
    )
    .await?;
    assert_eq!(meta.total, Some(1));
    assert_eq!(list.items[0].id, placed.order.id);

    Ok(())
}
