use rust_decimal::Decimal;
use uuid::Uuid;

use storefront_api::{
    config::AppConfig,
    db::create_pool,
    money::DEFAULT_CURRENCY,
    slug::{slugify, subcategory_slug},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let pool = create_pool(&config.database_url).await?;
    // Ensure migrations are applied.
    sqlx::migrate!("./migrations").run(&pool).await?;

    let user_id = ensure_user(&pool, "customer@example.com").await?;
    seed_catalog(&pool).await?;

    println!("Seed completed. Demo user ID: {user_id}");
    Ok(())
}

async fn ensure_user(pool: &sqlx::PgPool, email: &str) -> anyhow::Result<Uuid> {
    let row: Option<(Uuid,)> = sqlx::query_as(
        r#"
        INSERT INTO users (id, email)
        VALUES ($1, $2)
        ON CONFLICT (email) DO NOTHING
        RETURNING id
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(email)
    .fetch_optional(pool)
    .await?;

    let user_id = match row {
        Some((id,)) => id,
        None => {
            let existing: (Uuid,) = sqlx::query_as("SELECT id FROM users WHERE email = $1")
                .bind(email)
                .fetch_one(pool)
                .await?;
            existing.0
        }
    };

    println!("Ensured user {email}");
    Ok(user_id)
}

struct SeedProduct {
    name: &'static str,
    description: &'static str,
    price: Decimal,
    is_new: bool,
    is_hit: bool,
    is_sale: bool,
}

impl SeedProduct {
    fn new(name: &'static str, description: &'static str, price: Decimal) -> Self {
        Self {
            name,
            description,
            price,
            is_new: false,
            is_hit: false,
            is_sale: false,
        }
    }

    fn hit(mut self) -> Self {
        self.is_hit = true;
        self
    }

    fn fresh(mut self) -> Self {
        self.is_new = true;
        self
    }

    fn sale(mut self) -> Self {
        self.is_sale = true;
        self
    }
}

fn demo_catalog() -> Vec<(&'static str, &'static str, Vec<(&'static str, Vec<SeedProduct>)>)> {
    vec![
        (
            "Dairy",
            "Milk, cheese and everything in between",
            vec![
                (
                    "Milk",
                    vec![
                        SeedProduct::new(
                            "Whole Milk 3.2%",
                            "One litre of pasteurized whole milk",
                            Decimal::new(8990, 2),
                        )
                        .hit(),
                        SeedProduct::new(
                            "Baked Milk",
                            "Slow-baked milk, half a litre",
                            Decimal::new(10550, 2),
                        )
                        .fresh(),
                    ],
                ),
                (
                    "Cheese",
                    vec![
                        SeedProduct::new(
                            "Farmhouse Cheese",
                            "Semi-hard cheese, 300 g wedge",
                            Decimal::new(34900, 2),
                        )
                        .sale(),
                    ],
                ),
            ],
        ),
        (
            "Bakery",
            "Fresh from the oven every morning",
            vec![(
                "Bread",
                vec![
                    SeedProduct::new("Rye Loaf", "Traditional rye loaf, 700 g", Decimal::new(6500, 2))
                        .hit(),
                ],
            )],
        ),
    ]
}

async fn seed_catalog(pool: &sqlx::PgPool) -> anyhow::Result<()> {
    for (category_title, category_desc, subcategories) in demo_catalog() {
        let (category_id,): (Uuid,) = sqlx::query_as(
            r#"
            INSERT INTO categories (id, title, slug, description)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (title) DO UPDATE SET description = EXCLUDED.description
            RETURNING id
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(category_title)
        .bind(slugify(category_title))
        .bind(category_desc)
        .fetch_one(pool)
        .await?;

        for (subcategory_title, products) in subcategories {
            let (subcategory_id,): (Uuid,) = sqlx::query_as(
                r#"
                INSERT INTO subcategories (id, category_id, title, slug)
                VALUES ($1, $2, $3, $4)
                ON CONFLICT (category_id, title) DO UPDATE SET slug = EXCLUDED.slug
                RETURNING id
                "#,
            )
            .bind(Uuid::new_v4())
            .bind(category_id)
            .bind(subcategory_title)
            .bind(subcategory_slug(category_title, subcategory_title))
            .fetch_one(pool)
            .await?;

            for product in products {
                let slug = slugify(product.name);
                sqlx::query(
                    r#"
                    INSERT INTO products (id, subcategory_id, name, slug, description,
                                          main_image, price, currency, is_new, is_hit, is_sale)
                    VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
                    ON CONFLICT (slug) DO NOTHING
                    "#,
                )
                .bind(Uuid::new_v4())
                .bind(subcategory_id)
                .bind(product.name)
                .bind(&slug)
                .bind(product.description)
                .bind(format!("main/{slug}.jpg"))
                .bind(product.price)
                .bind(DEFAULT_CURRENCY)
                .bind(product.is_new)
                .bind(product.is_hit)
                .bind(product.is_sale)
                .execute(pool)
                .await?;
            }
        }
    }

    println!("Seeded catalog");
    Ok(())
}
