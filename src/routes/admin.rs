use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, put},
};
use uuid::Uuid;

use crate::{
    dto::{
        contact::{ContactMessageList, UpdateContactStatusRequest},
        orders::{OrderList, OrderWithItems, UpdateOrderStatusRequest},
    },
    error::AppResult,
    middleware::auth::AuthUser,
    models::{ContactMessage, Order},
    response::{ApiResponse, Meta},
    routes::params::{ContactListQuery, OrderListQuery},
    services::admin_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/orders", get(list_all_orders))
        .route("/orders/{id}", get(get_order))
        .route("/orders/{id}/status", put(update_order_status))
        .route("/contact-messages", get(list_contact_messages))
        .route("/contact-messages/{id}/status", put(update_contact_status))
}

#[utoipa::path(
    get,
    path = "/api/admin/orders",
    params(
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("per_page" = Option<i64>, Query, description = "Items per page, default 20"),
        ("status" = Option<String>, Query, description = "Filter by order status"),
        ("sort_order" = Option<String>, Query, description = "asc or desc, default desc")
    ),
    responses(
        (status = 200, description = "All orders", body = ApiResponse<OrderList>),
        (status = 403, description = "Not an admin"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn list_all_orders(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<OrderListQuery>,
) -> AppResult<Json<ApiResponse<OrderList>>> {
    let (data, meta) = admin_service::list_all_orders(&state.pool, &user, query).await?;
    Ok(Json(ApiResponse::success("OK", data, Some(meta))))
}

#[utoipa::path(
    get,
    path = "/api/admin/orders/{id}",
    params(
        ("id" = Uuid, Path, description = "Order ID")
    ),
    responses(
        (status = 200, description = "Order with its lines", body = ApiResponse<OrderWithItems>),
        (status = 403, description = "Not an admin"),
        (status = 404, description = "No such order"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn get_order(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<OrderWithItems>>> {
    let data = admin_service::get_order(&state.pool, &user, id).await?;
    Ok(Json(ApiResponse::success("OK", data, Some(Meta::empty()))))
}

#[utoipa::path(
    put,
    path = "/api/admin/orders/{id}/status",
    params(
        ("id" = Uuid, Path, description = "Order ID")
    ),
    request_body = UpdateOrderStatusRequest,
    responses(
        (status = 200, description = "Order moved along its lifecycle", body = ApiResponse<Order>),
        (status = 403, description = "Not an admin"),
        (status = 404, description = "No such order"),
        (status = 422, description = "Transition not allowed from the current status"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn update_order_status(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateOrderStatusRequest>,
) -> AppResult<Json<ApiResponse<Order>>> {
    let order = admin_service::update_order_status(&state.pool, &user, id, payload).await?;
    Ok(Json(ApiResponse::success(
        "Status updated",
        order,
        Some(Meta::empty()),
    )))
}

#[utoipa::path(
    get,
    path = "/api/admin/contact-messages",
    params(
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("per_page" = Option<i64>, Query, description = "Items per page, default 20"),
        ("status" = Option<String>, Query, description = "Filter by message status"),
        ("category" = Option<String>, Query, description = "Filter by message category")
    ),
    responses(
        (status = 200, description = "Contact inbox", body = ApiResponse<ContactMessageList>),
        (status = 403, description = "Not an admin"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn list_contact_messages(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<ContactListQuery>,
) -> AppResult<Json<ApiResponse<ContactMessageList>>> {
    let (data, meta) = admin_service::list_contact_messages(&state.pool, &user, query).await?;
    Ok(Json(ApiResponse::success("OK", data, Some(meta))))
}

#[utoipa::path(
    put,
    path = "/api/admin/contact-messages/{id}/status",
    params(
        ("id" = Uuid, Path, description = "Contact message ID")
    ),
    request_body = UpdateContactStatusRequest,
    responses(
        (status = 200, description = "Message moved along its lifecycle", body = ApiResponse<ContactMessage>),
        (status = 403, description = "Not an admin"),
        (status = 404, description = "No such message"),
        (status = 422, description = "Transition not allowed from the current status"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn update_contact_status(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateContactStatusRequest>,
) -> AppResult<Json<ApiResponse<ContactMessage>>> {
    let message = admin_service::update_contact_status(&state.pool, &user, id, payload).await?;
    Ok(Json(ApiResponse::success(
        "Status updated",
        message,
        Some(Meta::empty()),
    )))
}
