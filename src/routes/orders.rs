use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use uuid::Uuid;

use crate::{
    dto::orders::{CheckoutRequest, OrderList, OrderWithItems},
    error::AppResult,
    middleware::auth::AuthUser,
    response::{ApiResponse, Meta},
    routes::params::OrderListQuery,
    services::order_service::{self, CheckoutOutcome},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_orders))
        .route("/checkout", post(checkout))
        .route("/{id}", get(get_order))
}

#[utoipa::path(
    post,
    path = "/api/orders/checkout",
    request_body = CheckoutRequest,
    responses(
        (status = 201, description = "Order placed, cart cleared", body = ApiResponse<OrderWithItems>),
        (status = 409, description = "Cart is empty, nothing to check out"),
        (status = 422, description = "Contact form rejected with field errors"),
        (status = 500, description = "Transaction failed and was rolled back; safe to retry"),
    ),
    security(("bearer_auth" = [])),
    tag = "Orders"
)]
pub async fn checkout(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CheckoutRequest>,
) -> AppResult<Response> {
    match order_service::checkout(&state.pool, &user, payload).await? {
        CheckoutOutcome::EmptyCart => {
            let body = ApiResponse::<OrderWithItems> {
                message: "Cart is empty, add items before checking out".to_string(),
                data: None,
                meta: Some(Meta::empty()),
            };
            Ok((StatusCode::CONFLICT, Json(body)).into_response())
        }
        CheckoutOutcome::Completed(data) => {
            let body = ApiResponse::success("Order placed", data, Some(Meta::empty()));
            Ok((StatusCode::CREATED, Json(body)).into_response())
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/orders",
    params(
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("per_page" = Option<i64>, Query, description = "Items per page, default 20"),
        ("status" = Option<String>, Query, description = "Filter by order status"),
        ("sort_order" = Option<String>, Query, description = "asc or desc, default desc")
    ),
    responses(
        (status = 200, description = "Orders of the current user", body = ApiResponse<OrderList>)
    ),
    security(("bearer_auth" = [])),
    tag = "Orders"
)]
pub async fn list_orders(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<OrderListQuery>,
) -> AppResult<Json<ApiResponse<OrderList>>> {
    let (data, meta) = order_service::list_orders(&state.pool, &user, query).await?;
    Ok(Json(ApiResponse::success("OK", data, Some(meta))))
}

#[utoipa::path(
    get,
    path = "/api/orders/{id}",
    params(
        ("id" = Uuid, Path, description = "Order ID")
    ),
    responses(
        (status = 200, description = "Order with its lines", body = ApiResponse<OrderWithItems>),
        (status = 404, description = "No such order for this user"),
    ),
    security(("bearer_auth" = [])),
    tag = "Orders"
)]
pub async fn get_order(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<OrderWithItems>>> {
    let data = order_service::get_order(&state.pool, &user, id).await?;
    Ok(Json(ApiResponse::success("OK", data, Some(Meta::empty()))))
}
