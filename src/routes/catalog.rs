use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::get,
};

use crate::{
    dto::catalog::{CategoryList, ProductDetail, ProductList, SubcategoryList},
    error::AppResult,
    response::{ApiResponse, Meta},
    routes::params::Pagination,
    services::catalog_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(category_list))
        .route("/{category_slug}", get(subcategory_list))
        .route("/{category_slug}/{subcategory_slug}", get(product_list))
        .route(
            "/{category_slug}/{subcategory_slug}/{product_slug}",
            get(product_detail),
        )
}

#[utoipa::path(
    get,
    path = "/api/catalog",
    responses(
        (status = 200, description = "Active categories with their subcategories", body = ApiResponse<CategoryList>)
    ),
    tag = "Catalog"
)]
pub async fn category_list(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<CategoryList>>> {
    let data = catalog_service::list_categories(&state.pool).await?;
    Ok(Json(ApiResponse::success("OK", data, Some(Meta::empty()))))
}

#[utoipa::path(
    get,
    path = "/api/catalog/{category_slug}",
    params(
        ("category_slug" = String, Path, description = "Category slug")
    ),
    responses(
        (status = 200, description = "Active subcategories of a category", body = ApiResponse<SubcategoryList>),
        (status = 404, description = "Category not found or inactive"),
    ),
    tag = "Catalog"
)]
pub async fn subcategory_list(
    State(state): State<AppState>,
    Path(category_slug): Path<String>,
) -> AppResult<Json<ApiResponse<SubcategoryList>>> {
    let data = catalog_service::list_subcategories(&state.pool, &category_slug).await?;
    Ok(Json(ApiResponse::success("OK", data, Some(Meta::empty()))))
}

#[utoipa::path(
    get,
    path = "/api/catalog/{category_slug}/{subcategory_slug}",
    params(
        ("category_slug" = String, Path, description = "Category slug"),
        ("subcategory_slug" = String, Path, description = "Subcategory slug"),
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("per_page" = Option<i64>, Query, description = "Items per page, default 12")
    ),
    responses(
        (status = 200, description = "Active products of a subcategory", body = ApiResponse<ProductList>),
        (status = 404, description = "Category or subcategory not found"),
    ),
    tag = "Catalog"
)]
pub async fn product_list(
    State(state): State<AppState>,
    Path((category_slug, subcategory_slug)): Path<(String, String)>,
    Query(pagination): Query<Pagination>,
) -> AppResult<Json<ApiResponse<ProductList>>> {
    let (data, meta) =
        catalog_service::list_products(&state.pool, &category_slug, &subcategory_slug, pagination)
            .await?;
    Ok(Json(ApiResponse::success("OK", data, Some(meta))))
}

#[utoipa::path(
    get,
    path = "/api/catalog/{category_slug}/{subcategory_slug}/{product_slug}",
    params(
        ("category_slug" = String, Path, description = "Category slug"),
        ("subcategory_slug" = String, Path, description = "Subcategory slug"),
        ("product_slug" = String, Path, description = "Product slug")
    ),
    responses(
        (status = 200, description = "Product detail with gallery", body = ApiResponse<ProductDetail>),
        (status = 404, description = "No active product under that slug chain"),
    ),
    tag = "Catalog"
)]
pub async fn product_detail(
    State(state): State<AppState>,
    Path((category_slug, subcategory_slug, product_slug)): Path<(String, String, String)>,
) -> AppResult<Json<ApiResponse<ProductDetail>>> {
    let data = catalog_service::get_product(
        &state.pool,
        &category_slug,
        &subcategory_slug,
        &product_slug,
    )
    .await?;
    Ok(Json(ApiResponse::success("OK", data, Some(Meta::empty()))))
}
