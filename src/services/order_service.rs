use rust_decimal::Decimal;
use sqlx::FromRow;
use uuid::Uuid;

use crate::{
    audit::log_audit,
    db::DbPool,
    dto::orders::{CheckoutRequest, OrderList, OrderWithItems},
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::{Order, OrderItem, OrderStatus},
    money::DEFAULT_CURRENCY,
    response::Meta,
    routes::params::{OrderListQuery, SortOrder},
    services::cart_service,
    validate::{CheckoutForm, validate_checkout_form},
};

/// What the checkout state machine ended on. Validation failures and
/// transactional errors surface as `AppError` instead; both leave the cart
/// untouched.
#[derive(Debug)]
pub enum CheckoutOutcome {
    /// Cart had no lines; nothing was created, caller redirects to the cart.
    EmptyCart,
    /// Order committed and cart cleared.
    Completed(OrderWithItems),
}

#[derive(FromRow)]
struct CartPricingRow {
    product_id: Uuid,
    quantity: i32,
    price: Decimal,
    currency: String,
}

/// Convert the user's cart into an immutable order.
///
/// One transaction covers the cart re-read, the order and order-item
/// inserts, and the cart clear; any failure inside rolls the whole thing
/// back. The cart rows are read `FOR UPDATE`, so of two concurrent
/// checkouts one commits and the other re-reads an empty cart.
pub async fn checkout(
    pool: &DbPool,
    user: &AuthUser,
    payload: CheckoutRequest,
) -> AppResult<CheckoutOutcome> {
    let form = CheckoutForm {
        first_name: payload.first_name,
        last_name: payload.last_name,
        phone: payload.phone,
        address: payload.address,
    };
    let errors = validate_checkout_form(&form);
    if !errors.is_empty() {
        return Err(AppError::Validation(errors));
    }

    // Checkout is unavailable on an empty cart; no transaction is opened
    // for the probe.
    let (has_items,): (bool,) =
        sqlx::query_as("SELECT EXISTS(SELECT 1 FROM cart_items WHERE user_id = $1)")
            .bind(user.user_id)
            .fetch_one(pool)
            .await?;
    if !has_items {
        return Ok(CheckoutOutcome::EmptyCart);
    }

    let mut txn = pool.begin().await?;

    let rows: Vec<CartPricingRow> = sqlx::query_as(
        r#"
        SELECT ci.product_id, ci.quantity, p.price, p.currency
        FROM cart_items ci
        JOIN products p ON p.id = ci.product_id
        WHERE ci.user_id = $1
        ORDER BY ci.created_at, ci.id
        FOR UPDATE OF ci
        "#,
    )
    .bind(user.user_id)
    .fetch_all(&mut *txn)
    .await?;

    if rows.is_empty() {
        // Nothing locked, nothing written; dropping the transaction ends it.
        return Ok(CheckoutOutcome::EmptyCart);
    }

    // Unit prices are snapshotted here, at commit time, not at add-to-cart
    // time; the order must reflect the price actually charged.
    let total: Decimal = rows
        .iter()
        .map(|row| row.price * Decimal::from(row.quantity))
        .sum();
    let currency = rows
        .first()
        .map(|row| row.currency.clone())
        .unwrap_or_else(|| DEFAULT_CURRENCY.to_string());

    let order: Order = sqlx::query_as(
        r#"
        INSERT INTO orders (id, user_id, first_name, last_name, phone, address,
                            status, total_price, currency)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user.user_id)
    .bind(form.first_name.trim())
    .bind(form.last_name.trim())
    .bind(form.phone.trim())
    .bind(form.address.trim())
    .bind(OrderStatus::New)
    .bind(total)
    .bind(&currency)
    .fetch_one(&mut *txn)
    .await?;

    let mut items = Vec::with_capacity(rows.len());
    for row in &rows {
        let item: OrderItem = sqlx::query_as(
            r#"
            INSERT INTO order_items (id, order_id, product_id, quantity, price)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(order.id)
        .bind(row.product_id)
        .bind(row.quantity)
        .bind(row.price)
        .fetch_one(&mut *txn)
        .await?;
        items.push(item);
    }

    let cleared = cart_service::clear_cart(&mut *txn, user.user_id).await?;

    txn.commit().await?;

    tracing::info!(
        order_id = %order.id,
        total = %order.total_price,
        lines = items.len(),
        cleared,
        "checkout committed"
    );

    if let Err(err) = log_audit(
        pool,
        Some(user.user_id),
        "checkout",
        Some("orders"),
        Some(serde_json::json!({ "order_id": order.id, "total": order.total_price })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(CheckoutOutcome::Completed(OrderWithItems { order, items }))
}

pub async fn list_orders(
    pool: &DbPool,
    user: &AuthUser,
    query: OrderListQuery,
) -> AppResult<(OrderList, Meta)> {
    let (page, limit, offset) = query.pagination.normalize();
    let sort = query.sort_order.unwrap_or(SortOrder::Desc);

    let sql = format!(
        r#"
        SELECT * FROM orders
        WHERE user_id = $1 AND ($2::order_status IS NULL OR status = $2)
        ORDER BY created_at {}
        LIMIT $3 OFFSET $4
        "#,
        sort.as_sql()
    );
    let orders: Vec<Order> = sqlx::query_as(&sql)
        .bind(user.user_id)
        .bind(query.status)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await?;

    let (total,): (i64,) = sqlx::query_as(
        "SELECT COUNT(*) FROM orders WHERE user_id = $1 AND ($2::order_status IS NULL OR status = $2)",
    )
    .bind(user.user_id)
    .bind(query.status)
    .fetch_one(pool)
    .await?;

    Ok((OrderList { items: orders }, Meta::new(page, limit, total)))
}

pub async fn get_order(pool: &DbPool, user: &AuthUser, id: Uuid) -> AppResult<OrderWithItems> {
    let order: Option<Order> =
        sqlx::query_as("SELECT * FROM orders WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user.user_id)
            .fetch_optional(pool)
            .await?;
    let order = order.ok_or(AppError::NotFound)?;

    let items: Vec<OrderItem> =
        sqlx::query_as("SELECT * FROM order_items WHERE order_id = $1 ORDER BY created_at, id")
            .bind(order.id)
            .fetch_all(pool)
            .await?;

    Ok(OrderWithItems { order, items })
}
