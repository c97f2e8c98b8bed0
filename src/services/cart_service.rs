use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::FromRow;
use uuid::Uuid;

use crate::{
    audit::log_audit,
    config::PolicyLimits,
    db::DbPool,
    dto::cart::{AddToCartRequest, CartEntry, CartView, UpdateCartItemRequest},
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::{CartItem, Product},
    money::DEFAULT_CURRENCY,
};

#[derive(FromRow)]
struct CartWithProductRow {
    cart_id: Uuid,
    quantity: i32,
    product_id: Uuid,
    subcategory_id: Uuid,
    name: String,
    slug: String,
    description: Option<String>,
    main_image: String,
    price: Decimal,
    currency: String,
    is_active: bool,
    is_new: bool,
    is_hit: bool,
    is_sale: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// All cart lines for the user in the order they were added, with line
/// totals priced from the current catalog.
pub async fn list_cart(pool: &DbPool, user: &AuthUser) -> AppResult<CartView> {
    let rows = sqlx::query_as::<_, CartWithProductRow>(
        r#"
        SELECT ci.id AS cart_id, ci.quantity,
               p.id AS product_id, p.subcategory_id, p.name, p.slug, p.description,
               p.main_image, p.price, p.currency, p.is_active, p.is_new, p.is_hit,
               p.is_sale, p.created_at, p.updated_at
        FROM cart_items ci
        JOIN products p ON p.id = ci.product_id
        WHERE ci.user_id = $1
        ORDER BY ci.created_at, ci.id
        "#,
    )
    .bind(user.user_id)
    .fetch_all(pool)
    .await?;

    let mut total = Decimal::ZERO;
    let mut currency = DEFAULT_CURRENCY.to_string();
    let items = rows
        .into_iter()
        .map(|row| {
            let line_total = row.price * Decimal::from(row.quantity);
            total += line_total;
            currency = row.currency.clone();
            CartEntry {
                id: row.cart_id,
                product: Product {
                    id: row.product_id,
                    subcategory_id: row.subcategory_id,
                    name: row.name,
                    slug: row.slug,
                    description: row.description,
                    main_image: row.main_image,
                    price: row.price,
                    currency: row.currency,
                    is_active: row.is_active,
                    is_new: row.is_new,
                    is_hit: row.is_hit,
                    is_sale: row.is_sale,
                    created_at: row.created_at,
                    updated_at: row.updated_at,
                },
                quantity: row.quantity,
                line_total,
            }
        })
        .collect();

    Ok(CartView {
        items,
        total,
        currency,
    })
}

/// Add a product to the cart, merging into any existing line. The increment
/// and its ceiling check happen in a single upsert statement, so two
/// concurrent adds of the same product cannot lose an update.
pub async fn add_to_cart(
    pool: &DbPool,
    limits: &PolicyLimits,
    user: &AuthUser,
    payload: AddToCartRequest,
) -> AppResult<CartItem> {
    let max = limits.max_cart_quantity;
    if payload.quantity < 1 || payload.quantity > max {
        return Err(AppError::InvalidQuantity(format!(
            "quantity must be between 1 and {max}"
        )));
    }

    let product: Option<(Uuid,)> =
        sqlx::query_as("SELECT id FROM products WHERE id = $1 AND is_active")
            .bind(payload.product_id)
            .fetch_optional(pool)
            .await?;
    if product.is_none() {
        return Err(AppError::NotFound);
    }

    // The conditional DO UPDATE leaves the existing row untouched when the
    // merged quantity would cross the ceiling; no row back means rejected.
    let cart_item: Option<CartItem> = sqlx::query_as(
        r#"
        INSERT INTO cart_items (id, user_id, product_id, quantity)
        VALUES ($1, $2, $3, $4)
        ON CONFLICT (user_id, product_id) DO UPDATE
            SET quantity = cart_items.quantity + EXCLUDED.quantity
            WHERE cart_items.quantity + EXCLUDED.quantity <= $5
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user.user_id)
    .bind(payload.product_id)
    .bind(payload.quantity)
    .bind(max)
    .fetch_optional(pool)
    .await?;

    let cart_item = cart_item.ok_or_else(|| {
        AppError::QuantityLimitExceeded(format!("a cart line may not exceed {max} items"))
    })?;

    if let Err(err) = log_audit(
        pool,
        Some(user.user_id),
        "cart_add",
        Some("cart_items"),
        Some(serde_json::json!({
            "product_id": payload.product_id,
            "quantity": cart_item.quantity,
        })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(cart_item)
}

/// Set an absolute quantity on an owned cart line. Zero or less removes the
/// line; `None` in the result means it was removed.
pub async fn update_cart_item(
    pool: &DbPool,
    limits: &PolicyLimits,
    user: &AuthUser,
    item_id: Uuid,
    payload: UpdateCartItemRequest,
) -> AppResult<Option<CartItem>> {
    let owned: Option<(Uuid,)> =
        sqlx::query_as("SELECT id FROM cart_items WHERE id = $1 AND user_id = $2")
            .bind(item_id)
            .bind(user.user_id)
            .fetch_optional(pool)
            .await?;
    if owned.is_none() {
        return Err(AppError::NotFound);
    }

    if payload.quantity <= 0 {
        sqlx::query("DELETE FROM cart_items WHERE id = $1 AND user_id = $2")
            .bind(item_id)
            .bind(user.user_id)
            .execute(pool)
            .await?;
        return Ok(None);
    }

    let max = limits.max_cart_quantity;
    if payload.quantity > max {
        return Err(AppError::QuantityLimitExceeded(format!(
            "a cart line may not exceed {max} items"
        )));
    }

    let cart_item: CartItem = sqlx::query_as(
        r#"
        UPDATE cart_items
        SET quantity = $3
        WHERE id = $1 AND user_id = $2
        RETURNING *
        "#,
    )
    .bind(item_id)
    .bind(user.user_id)
    .bind(payload.quantity)
    .fetch_one(pool)
    .await?;

    Ok(Some(cart_item))
}

pub async fn remove_cart_item(pool: &DbPool, user: &AuthUser, item_id: Uuid) -> AppResult<()> {
    let result = sqlx::query("DELETE FROM cart_items WHERE id = $1 AND user_id = $2")
        .bind(item_id)
        .bind(user.user_id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound);
    }

    if let Err(err) = log_audit(
        pool,
        Some(user.user_id),
        "cart_remove",
        Some("cart_items"),
        Some(serde_json::json!({ "cart_item_id": item_id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(())
}

/// Delete every cart line for the user and report how many went away. An
/// empty cart clears to 0. Generic over the executor so checkout can run it
/// inside its transaction.
pub async fn clear_cart<'e, E>(executor: E, user_id: Uuid) -> AppResult<u64>
where
    E: sqlx::PgExecutor<'e>,
{
    let result = sqlx::query("DELETE FROM cart_items WHERE user_id = $1")
        .bind(user_id)
        .execute(executor)
        .await?;
    Ok(result.rows_affected())
}

/// Cart total as one aggregated query; an empty cart sums to zero.
pub async fn cart_total(pool: &DbPool, user: &AuthUser) -> AppResult<Decimal> {
    let (total,): (Decimal,) = sqlx::query_as(
        r#"
        SELECT COALESCE(SUM(p.price * ci.quantity), 0)
        FROM cart_items ci
        JOIN products p ON p.id = ci.product_id
        WHERE ci.user_id = $1
        "#,
    )
    .bind(user.user_id)
    .fetch_one(pool)
    .await?;
    Ok(total)
}
