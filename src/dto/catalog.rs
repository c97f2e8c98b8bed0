use serde::Serialize;
use utoipa::ToSchema;

use crate::models::{Category, Product, ProductImage, Subcategory};

#[derive(Debug, Serialize, ToSchema)]
pub struct CategoryWithSubcategories {
    #[serde(flatten)]
    pub category: Category,
    pub subcategories: Vec<Subcategory>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CategoryList {
    pub items: Vec<CategoryWithSubcategories>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SubcategoryList {
    pub category: Category,
    pub items: Vec<Subcategory>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProductList {
    pub items: Vec<Product>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProductDetail {
    #[serde(flatten)]
    pub product: Product,
    pub images: Vec<ProductImage>,
}
