use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{delete, get, put},
};
use uuid::Uuid;

use crate::{
    dto::cart::{AddToCartRequest, CartTotal, CartView, UpdateCartItemRequest},
    error::AppResult,
    middleware::auth::AuthUser,
    models::CartItem,
    money::{DEFAULT_CURRENCY, format_amount},
    response::{ApiResponse, Meta},
    services::cart_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(cart_list).post(add_to_cart))
        .route("/total", get(cart_total))
        .route("/{item_id}", put(update_cart_item).delete(remove_cart_item))
}

#[utoipa::path(
    get,
    path = "/api/cart",
    responses(
        (status = 200, description = "Cart lines for the current user, in addition order", body = ApiResponse<CartView>),
        (status = 401, description = "Missing or invalid identity"),
    ),
    security(("bearer_auth" = [])),
    tag = "Cart"
)]
pub async fn cart_list(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<CartView>>> {
    let data = cart_service::list_cart(&state.pool, &user).await?;
    Ok(Json(ApiResponse::success("OK", data, Some(Meta::empty()))))
}

#[utoipa::path(
    post,
    path = "/api/cart",
    request_body = AddToCartRequest,
    responses(
        (status = 200, description = "Created or merged cart line", body = ApiResponse<CartItem>),
        (status = 400, description = "Quantity out of bounds"),
        (status = 404, description = "Product missing or inactive"),
        (status = 409, description = "Merged quantity would exceed the cart line ceiling"),
    ),
    security(("bearer_auth" = [])),
    tag = "Cart"
)]
pub async fn add_to_cart(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<AddToCartRequest>,
) -> AppResult<Json<ApiResponse<CartItem>>> {
    let item =
        cart_service::add_to_cart(&state.pool, &state.config.limits, &user, payload).await?;
    Ok(Json(ApiResponse::success("Added to cart", item, None)))
}

#[utoipa::path(
    get,
    path = "/api/cart/total",
    responses(
        (status = 200, description = "Current cart total, zero when empty", body = ApiResponse<CartTotal>),
        (status = 401, description = "Missing or invalid identity"),
    ),
    security(("bearer_auth" = [])),
    tag = "Cart"
)]
pub async fn cart_total(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<CartTotal>>> {
    let total = cart_service::cart_total(&state.pool, &user).await?;
    let data = CartTotal {
        total,
        currency: DEFAULT_CURRENCY.to_string(),
        display: format_amount(total, DEFAULT_CURRENCY),
    };
    Ok(Json(ApiResponse::success("OK", data, Some(Meta::empty()))))
}

#[utoipa::path(
    put,
    path = "/api/cart/{item_id}",
    params(
        ("item_id" = Uuid, Path, description = "Cart item ID")
    ),
    request_body = UpdateCartItemRequest,
    responses(
        (status = 200, description = "Updated line, or removal notice when quantity dropped to zero", body = ApiResponse<CartItem>),
        (status = 404, description = "No such cart line for this user"),
        (status = 409, description = "Quantity above the cart line ceiling"),
    ),
    security(("bearer_auth" = [])),
    tag = "Cart"
)]
pub async fn update_cart_item(
    State(state): State<AppState>,
    user: AuthUser,
    Path(item_id): Path<Uuid>,
    Json(payload): Json<UpdateCartItemRequest>,
) -> AppResult<Json<ApiResponse<CartItem>>> {
    let updated =
        cart_service::update_cart_item(&state.pool, &state.config.limits, &user, item_id, payload)
            .await?;

    let response = match updated {
        Some(item) => ApiResponse::success("Updated", item, None),
        None => ApiResponse {
            message: "Removed from cart".to_string(),
            data: None,
            meta: Some(Meta::empty()),
        },
    };
    Ok(Json(response))
}

#[utoipa::path(
    delete,
    path = "/api/cart/{item_id}",
    params(
        ("item_id" = Uuid, Path, description = "Cart item ID")
    ),
    responses(
        (status = 200, description = "Removed", body = ApiResponse<serde_json::Value>),
        (status = 404, description = "No such cart line for this user"),
    ),
    security(("bearer_auth" = [])),
    tag = "Cart"
)]
pub async fn remove_cart_item(
    State(state): State<AppState>,
    user: AuthUser,
    Path(item_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    cart_service::remove_cart_item(&state.pool, &user, item_id).await?;
    Ok(Json(ApiResponse::success(
        "Removed from cart",
        serde_json::json!({}),
        Some(Meta::empty()),
    )))
}
