mod common;

use rust_decimal::Decimal;
use uuid::Uuid;

use storefront_api::{
    config::PolicyLimits,
    dto::{cart::AddToCartRequest, orders::CheckoutRequest},
    error::AppError,
    models::OrderStatus,
    services::{
        cart_service,
        order_service::{self, CheckoutOutcome},
    },
};

use common::{create_user, seed_product, test_pool};

fn valid_form() -> CheckoutRequest {
    CheckoutRequest {
        first_name: "Ivan".into(),
        last_name: "Petrov".into(),
        phone: "+79991234567".into(),
        address: "Lenina 1, apt 2".into(),
    }
}

// End-to-end: populate a cart, check out, and verify the order snapshot
// survives a later catalog price change while the cart returns to zero.
#[tokio::test]
async fn checkout_snapshots_prices_and_clears_cart() -> anyhow::Result<()> {
    let Some(pool) = test_pool().await else {
        eprintln!("Skipping test: set TEST_DATABASE_URL or DATABASE_URL to run DB flows.");
        return Ok(());
    };
    let limits = PolicyLimits::default();
    let user = create_user(&pool).await;
    let product_a = seed_product(&pool, "Product A", Decimal::new(10000, 2)).await;
    let product_b = seed_product(&pool, "Product B", Decimal::new(5000, 2)).await;

    cart_service::add_to_cart(
        &pool,
        &limits,
        &user,
        AddToCartRequest {
            product_id: product_a,
            quantity: 2,
        },
    )
    .await?;
    cart_service::add_to_cart(
        &pool,
        &limits,
        &user,
        AddToCartRequest {
            product_id: product_b,
            quantity: 1,
        },
    )
    .await?;

    let pre_total = cart_service::cart_total(&pool, &user).await?;
    assert_eq!(pre_total, Decimal::new(25000, 2));

    let outcome = order_service::checkout(&pool, &user, valid_form()).await?;
    let CheckoutOutcome::Completed(placed) = outcome else {
        panic!("expected a committed order");
    };

    assert_eq!(placed.order.status, OrderStatus::New);
    assert_eq!(placed.order.total_price, pre_total);
    assert_eq!(placed.order.first_name, "Ivan");
    assert_eq!(placed.items.len(), 2);

    let mut lines: Vec<(Uuid, i32, Decimal)> = placed
        .items
        .iter()
        .map(|i| (i.product_id, i.quantity, i.price))
        .collect();
    lines.sort_by_key(|(_, quantity, _)| *quantity);
    assert_eq!(lines, vec![
        (product_b, 1, Decimal::new(5000, 2)),
        (product_a, 2, Decimal::new(10000, 2)),
    ]);

    // Cart is gone once the order exists.
    assert_eq!(
        cart_service::cart_total(&pool, &user).await?,
        Decimal::ZERO
    );
    assert!(cart_service::list_cart(&pool, &user).await?.items.is_empty());

    // A later catalog price change must not touch the snapshot.
    sqlx::query("UPDATE products SET price = $2 WHERE id = $1")
        .bind(product_a)
        .bind(Decimal::new(99900, 2))
        .execute(&pool)
        .await?;
    let reread = order_service::get_order(&pool, &user, placed.order.id).await?;
    assert_eq!(reread.order.total_price, Decimal::new(25000, 2));
    let snapshot = reread
        .items
        .iter()
        .find(|i| i.product_id == product_a)
        .expect("order line for product A");
    assert_eq!(snapshot.price, Decimal::new(10000, 2));

    Ok(())
}

#[tokio::test]
async fn checkout_rejects_bad_form_without_side_effects() -> anyhow::Result<()> {
    let Some(pool) = test_pool().await else {
        eprintln!("Skipping test: set TEST_DATABASE_URL or DATABASE_URL to run DB flows.");
        return Ok(());
    };
    let limits = PolicyLimits::default();
    let user = create_user(&pool).await;
    let product_id = seed_product(&pool, "Kept Widget", Decimal::new(10000, 2)).await;

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

    let form = CheckoutRequest {
        phone: "12-34".into(),
        address: "  ".into(),
        ..valid_form()
    };
    let err = order_service::checkout(&pool, &user, form).await.unwrap_err();
    let AppError::Validation(fields) = err else {
        panic!("expected field-level validation errors");
    };
    let names: Vec<_> = fields.iter().map(|f| f.field).collect();
    assert_eq!(names, ["phone", "address"]);

    // Rejected checkout leaves the cart alone and creates no order.
    assert_eq!(cart_service::list_cart(&pool, &user).await?.items.len(), 1);
    let (orders,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM orders WHERE user_id = $1")
        .bind(user.user_id)
        .fetch_one(&pool)
        .await?;
    assert_eq!(orders, 0);

    Ok(())
}

#[tokio::test]
async fn checkout_on_empty_cart_is_a_redirect_not_an_order() -> anyhow::Result<()> {
    let Some(pool) = test_pool().await else {
        eprintln!("Skipping test: set TEST_DATABASE_URL or DATABASE_URL to run DB flows.");
        return Ok(());
    };
    let user = create_user(&pool).await;

    let outcome = order_service::checkout(&pool, &user, valid_form()).await?;
    assert!(matches!(outcome, CheckoutOutcome::EmptyCart));

    let (orders,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM orders WHERE user_id = $1")
        .bind(user.user_id)
        .fetch_one(&pool)
        .await?;
    assert_eq!(orders, 0);

    Ok(())
}

// Replay the checkout's inner steps but fail before the cart clear: the
// rollback must leave no order, no order items, and an intact cart.
#[tokio::test]
async fn aborted_checkout_transaction_leaves_nothing_behind() -> anyhow::Result<()> {
    let Some(pool) = test_pool().await else {
        eprintln!("Skipping test: set TEST_DATABASE_URL or DATABASE_URL to run DB flows.");
        return Ok(());
    };
    let limits = PolicyLimits::default();
    let user = create_user(&pool).await;
    let product_id = seed_product(&pool, "Doomed Widget", Decimal::new(10000, 2)).await;

    cart_service::add_to_cart(
        &pool,
        &limits,
        &user,
        AddToCartRequest {
            product_id,
            quantity: 2,
        },
    )
    .await?;

    let order_id = Uuid::new_v4();
    {
        let mut txn = pool.begin().await?;
        sqlx::query(
            r#"
            INSERT INTO orders (id, user_id, first_name, last_name, phone, address,
                                status, total_price)
            VALUES ($1, $2, 'Ivan', 'Petrov', '+79991234567', 'Lenina 1', 'new', $3)
            "#,
        )
        .bind(order_id)
        .bind(user.user_id)
        .bind(Decimal::new(20000, 2))
        .execute(&mut *txn)
        .await?;
        sqlx::query(
            "INSERT INTO order_items (id, order_id, product_id, quantity, price) VALUES ($1, $2, $3, 2, $4)",
        )
        .bind(Uuid::new_v4())
        .bind(order_id)
        .bind(product_id)
        .bind(Decimal::new(10000, 2))
        .execute(&mut *txn)
        .await?;
        // Failure injected before the cart clear: the transaction drops
        // without commit.
    }

    let (orders,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM orders WHERE id = $1")
        .bind(order_id)
        .fetch_one(&pool)
        .await?;
    assert_eq!(orders, 0);
    let (items,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM order_items WHERE order_id = $1")
        .bind(order_id)
        .fetch_one(&pool)
        .await?;
    assert_eq!(items, 0);
    assert_eq!(cart_service::list_cart(&pool, &user).await?.items.len(), 1);

    Ok(())
}

// Two checkouts racing over the same single-line cart: exactly one commits,
// the loser observes an empty cart.
#[tokio::test]
async fn concurrent_checkouts_commit_exactly_one_order() -> anyhow::Result<()> {
    let Some(pool) = test_pool().await else {
        eprintln!("Skipping test: set TEST_DATABASE_URL or DATABASE_URL to run DB flows.");
        return Ok(());
    };
    let limits = PolicyLimits::default();
    let user = create_user(&pool).await;
    let product_id = seed_product(&pool, "Contested Widget", Decimal::new(10000, 2)).await;

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

    let first = {
        let pool = pool.clone();
        let user = user.clone();
        tokio::spawn(async move { order_service::checkout(&pool, &user, valid_form()).await })
    };
    let second = {
        let pool = pool.clone();
        let user = user.clone();
        tokio::spawn(async move { order_service::checkout(&pool, &user, valid_form()).await })
    };

    let outcomes = [first.await??, second.await??];
    let committed = outcomes
        .iter()
        .filter(|o| matches!(o, CheckoutOutcome::Completed(_)))
        .count();
    let empty = outcomes
        .iter()
        .filter(|o| matches!(o, CheckoutOutcome::EmptyCart))
        .count();
    assert_eq!((committed, empty), (1, 1));

    let (orders,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM orders WHERE user_id = $1")
        .bind(user.user_id)
        .fetch_one(&pool)
        .await?;
    assert_eq!(orders, 1);
    assert!(cart_service::list_cart(&pool, &user).await?.items.is_empty());

    Ok(())
}
