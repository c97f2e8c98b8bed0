#![allow(dead_code)]

use rust_decimal::Decimal;
use uuid::Uuid;

use storefront_api::{db::DbPool, middleware::auth::AuthUser, money::DEFAULT_CURRENCY};

/// Connect to the test database, applying migrations. Returns `None` when no
/// database is configured so callers can skip cleanly.
pub async fn test_pool() -> Option<DbPool> {
    let url = std::env::var("TEST_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .ok()?;
    let pool = storefront_api::db::create_pool(&url)
        .await
        .expect("connect to test database");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("apply migrations");
    Some(pool)
}

/// Every test works with its own user so tests stay independent of each
/// other and of leftover rows.
pub async fn create_user(pool: &DbPool) -> AuthUser {
    let user_id = Uuid::new_v4();
    sqlx::query("INSERT INTO users (id, email) VALUES ($1, $2)")
        .bind(user_id)
        .bind(format!("user-{user_id}@example.com"))
        .execute(pool)
        .await
        .expect("insert user");
    AuthUser {
        user_id,
        role: "user".into(),
    }
}

pub async fn create_admin(pool: &DbPool) -> AuthUser {
    let user = create_user(pool).await;
    AuthUser {
        role: "admin".into(),
        ..user
    }
}

/// Insert a product under a fresh category/subcategory chain; slugs are
/// uuid-suffixed so parallel tests never collide on unique constraints.
pub async fn seed_product(pool: &DbPool, name: &str, price: Decimal) -> Uuid {
    let tag = Uuid::new_v4().simple().to_string();

    let (category_id,): (Uuid,) = sqlx::query_as(
        "INSERT INTO categories (id, title, slug) VALUES ($1, $2, $3) RETURNING id",
    )
    .bind(Uuid::new_v4())
    .bind(format!("Category {tag}"))
    .bind(format!("category-{tag}"))
    .fetch_one(pool)
    .await
    .expect("insert category");

    let (subcategory_id,): (Uuid,) = sqlx::query_as(
        "INSERT INTO subcategories (id, category_id, title, slug) VALUES ($1, $2, $3, $4) RETURNING id",
    )
    .bind(Uuid::new_v4())
    .bind(category_id)
    .bind(format!("Subcategory {tag}"))
    .bind(format!("subcategory-{tag}"))
    .fetch_one(pool)
    .await
    .expect("insert subcategory");

    let (product_id,): (Uuid,) = sqlx::query_as(
        r#"
        INSERT INTO products (id, subcategory_id, name, slug, main_image, price, currency)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING id
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(subcategory_id)
    .bind(name)
    .bind(format!("{}-{tag}", name.to_lowercase().replace(' ', "-")))
    .bind(format!("main/{tag}.jpg"))
    .bind(price)
    .bind(DEFAULT_CURRENCY)
    .fetch_one(pool)
    .await
    .expect("insert product");

    product_id
}

pub async fn deactivate_product(pool: &DbPool, product_id: Uuid) {
    sqlx::query("UPDATE products SET is_active = FALSE WHERE id = $1")
        .bind(product_id)
        .execute(pool)
        .await
        .expect("deactivate product");
}
