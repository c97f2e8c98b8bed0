use uuid::Uuid;

use crate::{
    audit::log_audit,
    db::DbPool,
    dto::{
        contact::{ContactMessageList, UpdateContactStatusRequest},
        orders::{OrderList, OrderWithItems, UpdateOrderStatusRequest},
    },
    error::{AppError, AppResult, FieldError},
    middleware::auth::{AuthUser, ensure_admin},
    models::{ContactMessage, ContactStatus, Order, OrderItem},
    response::Meta,
    routes::params::{ContactListQuery, OrderListQuery, SortOrder},
};

pub async fn list_all_orders(
    pool: &DbPool,
    admin: &AuthUser,
    query: OrderListQuery,
) -> AppResult<(OrderList, Meta)> {
    ensure_admin(admin)?;
    let (page, limit, offset) = query.pagination.normalize();
    let sort = query.sort_order.unwrap_or(SortOrder::Desc);

    let sql = format!(
        r#"
        SELECT * FROM orders
        WHERE ($1::order_status IS NULL OR status = $1)
        ORDER BY created_at {}
        LIMIT $2 OFFSET $3
        "#,
        sort.as_sql()
    );
    let orders: Vec<Order> = sqlx::query_as(&sql)
        .bind(query.status)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await?;

    let (total,): (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM orders WHERE ($1::order_status IS NULL OR status = $1)")
            .bind(query.status)
            .fetch_one(pool)
            .await?;

    Ok((OrderList { items: orders }, Meta::new(page, limit, total)))
}

pub async fn get_order(pool: &DbPool, admin: &AuthUser, id: Uuid) -> AppResult<OrderWithItems> {
    ensure_admin(admin)?;

    let order: Option<Order> = sqlx::query_as("SELECT * FROM orders WHERE id = $1")
        .bind(id)
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

/// Move an order along its lifecycle. Only `status` is mutable on an order;
/// the transition table rejects anything but the allowed arrows.
pub async fn update_order_status(
    pool: &DbPool,
    admin: &AuthUser,
    id: Uuid,
    payload: UpdateOrderStatusRequest,
) -> AppResult<Order> {
    ensure_admin(admin)?;

    let mut txn = pool.begin().await?;

    let order: Option<Order> = sqlx::query_as("SELECT * FROM orders WHERE id = $1 FOR UPDATE")
        .bind(id)
        .fetch_optional(&mut *txn)
        .await?;
    let order = order.ok_or(AppError::NotFound)?;

    if !order.status.can_transition_to(payload.status) {
        return Err(AppError::Validation(vec![FieldError::new(
            "status",
            format!(
                "order cannot move from {} to {}",
                order.status.as_str(),
                payload.status.as_str()
            ),
        )]));
    }

    let order: Order = sqlx::query_as("UPDATE orders SET status = $2 WHERE id = $1 RETURNING *")
        .bind(id)
        .bind(payload.status)
        .fetch_one(&mut *txn)
        .await?;

    txn.commit().await?;

    if let Err(err) = log_audit(
        pool,
        Some(admin.user_id),
        "order_status_update",
        Some("orders"),
        Some(serde_json::json!({ "order_id": id, "status": order.status })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(order)
}

pub async fn list_contact_messages(
    pool: &DbPool,
    admin: &AuthUser,
    query: ContactListQuery,
) -> AppResult<(ContactMessageList, Meta)> {
    ensure_admin(admin)?;
    let (page, limit, offset) = query.pagination.normalize();

    let messages: Vec<ContactMessage> = sqlx::query_as(
        r#"
        SELECT * FROM contact_messages
        WHERE ($1::contact_status IS NULL OR status = $1)
          AND ($2::contact_category IS NULL OR category = $2)
        ORDER BY created_at DESC
        LIMIT $3 OFFSET $4
        "#,
    )
    .bind(query.status)
    .bind(query.category)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    let (total,): (i64,) = sqlx::query_as(
        r#"
        SELECT COUNT(*) FROM contact_messages
        WHERE ($1::contact_status IS NULL OR status = $1)
          AND ($2::contact_category IS NULL OR category = $2)
        "#,
    )
    .bind(query.status)
    .bind(query.category)
    .fetch_one(pool)
    .await?;

    Ok((ContactMessageList { items: messages }, Meta::new(page, limit, total)))
}

/// Work a contact message through its inbox lifecycle; resolution stamps
/// `resolved_at`.
pub async fn update_contact_status(
    pool: &DbPool,
    admin: &AuthUser,
    id: Uuid,
    payload: UpdateContactStatusRequest,
) -> AppResult<ContactMessage> {
    ensure_admin(admin)?;

    let mut txn = pool.begin().await?;

    let message: Option<ContactMessage> =
        sqlx::query_as("SELECT * FROM contact_messages WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *txn)
            .await?;
    let message = message.ok_or(AppError::NotFound)?;

    if !message.status.can_transition_to(payload.status) {
        return Err(AppError::Validation(vec![FieldError::new(
            "status",
            format!(
                "message cannot move from {} to {}",
                message.status.as_str(),
                payload.status.as_str()
            ),
        )]));
    }

    let resolved = payload.status == ContactStatus::Resolved;
    let message: ContactMessage = sqlx::query_as(
        r#"
        UPDATE contact_messages
        SET status = $2,
            admin_notes = COALESCE($3, admin_notes),
            resolved_at = CASE WHEN $4 THEN now() ELSE resolved_at END
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(payload.status)
    .bind(payload.admin_notes.as_deref())
    .bind(resolved)
    .fetch_one(&mut *txn)
    .await?;

    txn.commit().await?;

    Ok(message)
}
