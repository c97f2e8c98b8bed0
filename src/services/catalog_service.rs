use std::collections::HashMap;

use uuid::Uuid;

use crate::{
    db::DbPool,
    dto::catalog::{
        CategoryList, CategoryWithSubcategories, ProductDetail, ProductList, SubcategoryList,
    },
    error::{AppError, AppResult},
    models::{Category, Product, ProductImage, Subcategory},
    response::Meta,
    routes::params::Pagination,
};

/// Storefront product pages are 12 items long, matching the shop layout.
pub const PRODUCTS_PER_PAGE: i64 = 12;

/// Active categories with their active subcategories, for the storefront
/// landing page.
pub async fn list_categories(pool: &DbPool) -> AppResult<CategoryList> {
    let categories: Vec<Category> =
        sqlx::query_as("SELECT * FROM categories WHERE is_active ORDER BY title")
            .fetch_all(pool)
            .await?;

    let subcategories: Vec<Subcategory> = sqlx::query_as(
        r#"
        SELECT s.* FROM subcategories s
        JOIN categories c ON c.id = s.category_id
        WHERE s.is_active AND c.is_active
        ORDER BY s.title
        "#,
    )
    .fetch_all(pool)
    .await?;

    let mut by_category: HashMap<Uuid, Vec<Subcategory>> = HashMap::new();
    for sub in subcategories {
        by_category.entry(sub.category_id).or_default().push(sub);
    }

    let items = categories
        .into_iter()
        .map(|category| {
            let subcategories = by_category.remove(&category.id).unwrap_or_default();
            CategoryWithSubcategories {
                category,
                subcategories,
            }
        })
        .collect();

    Ok(CategoryList { items })
}

async fn find_active_category(pool: &DbPool, slug: &str) -> AppResult<Category> {
    let category: Option<Category> =
        sqlx::query_as("SELECT * FROM categories WHERE slug = $1 AND is_active")
            .bind(slug)
            .fetch_optional(pool)
            .await?;
    category.ok_or(AppError::NotFound)
}

async fn find_active_subcategory(
    pool: &DbPool,
    category_id: Uuid,
    slug: &str,
) -> AppResult<Subcategory> {
    let subcategory: Option<Subcategory> = sqlx::query_as(
        "SELECT * FROM subcategories WHERE slug = $1 AND category_id = $2 AND is_active",
    )
    .bind(slug)
    .bind(category_id)
    .fetch_optional(pool)
    .await?;
    subcategory.ok_or(AppError::NotFound)
}

pub async fn list_subcategories(pool: &DbPool, category_slug: &str) -> AppResult<SubcategoryList> {
    let category = find_active_category(pool, category_slug).await?;

    let items: Vec<Subcategory> = sqlx::query_as(
        "SELECT * FROM subcategories WHERE category_id = $1 AND is_active ORDER BY title",
    )
    .bind(category.id)
    .fetch_all(pool)
    .await?;

    Ok(SubcategoryList { category, items })
}

/// Active products of one subcategory, newest first, paginated.
pub async fn list_products(
    pool: &DbPool,
    category_slug: &str,
    subcategory_slug: &str,
    pagination: Pagination,
) -> AppResult<(ProductList, Meta)> {
    let category = find_active_category(pool, category_slug).await?;
    let subcategory = find_active_subcategory(pool, category.id, subcategory_slug).await?;

    let (page, limit, offset) = pagination.normalize_with(PRODUCTS_PER_PAGE);

    let items: Vec<Product> = sqlx::query_as(
        r#"
        SELECT * FROM products
        WHERE subcategory_id = $1 AND is_active
        ORDER BY created_at DESC
        LIMIT $2 OFFSET $3
        "#,
    )
    .bind(subcategory.id)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    let (total,): (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM products WHERE subcategory_id = $1 AND is_active")
            .bind(subcategory.id)
            .fetch_one(pool)
            .await?;

    Ok((ProductList { items }, Meta::new(page, limit, total)))
}

/// Product detail addressed by the full slug chain; every segment must match
/// and be active, as the storefront URLs are canonical.
pub async fn get_product(
    pool: &DbPool,
    category_slug: &str,
    subcategory_slug: &str,
    product_slug: &str,
) -> AppResult<ProductDetail> {
    let product: Option<Product> = sqlx::query_as(
        r#"
        SELECT p.* FROM products p
        JOIN subcategories s ON s.id = p.subcategory_id
        JOIN categories c ON c.id = s.category_id
        WHERE p.slug = $1 AND s.slug = $2 AND c.slug = $3
          AND p.is_active AND s.is_active AND c.is_active
        "#,
    )
    .bind(product_slug)
    .bind(subcategory_slug)
    .bind(category_slug)
    .fetch_optional(pool)
    .await?;
    let product = product.ok_or(AppError::NotFound)?;

    let images: Vec<ProductImage> =
        sqlx::query_as("SELECT * FROM product_images WHERE product_id = $1 ORDER BY id")
            .bind(product.id)
            .fetch_all(pool)
            .await?;

    Ok(ProductDetail { product, images })
}
