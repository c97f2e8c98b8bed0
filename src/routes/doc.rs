use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        cart::{AddToCartRequest, CartEntry, CartTotal, CartView, UpdateCartItemRequest},
        catalog::{
            CategoryList, CategoryWithSubcategories, ProductDetail, ProductList, SubcategoryList,
        },
        contact::{ContactMessageList, SubmitContactRequest, UpdateContactStatusRequest},
        orders::{CheckoutRequest, OrderList, OrderWithItems, UpdateOrderStatusRequest},
    },
    error::FieldError,
    models::{
        CartItem, Category, ContactCategory, ContactMessage, ContactStatus, Order, OrderItem,
        OrderStatus, Product, ProductImage, Subcategory,
    },
    response::{ApiResponse, Meta},
    routes::{admin, cart, catalog, contact, health, orders, params},
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        catalog::category_list,
        catalog::subcategory_list,
        catalog::product_list,
        catalog::product_detail,
        cart::cart_list,
        cart::add_to_cart,
        cart::cart_total,
        cart::update_cart_item,
        cart::remove_cart_item,
        orders::checkout,
        orders::list_orders,
        orders::get_order,
        contact::submit,
        admin::list_all_orders,
        admin::get_order,
        admin::update_order_status,
        admin::list_contact_messages,
        admin::update_contact_status
    ),
    components(
        schemas(
            Category,
            Subcategory,
            Product,
            ProductImage,
            CartItem,
            Order,
            OrderItem,
            OrderStatus,
            ContactMessage,
            ContactCategory,
            ContactStatus,
            AddToCartRequest,
            UpdateCartItemRequest,
            CartEntry,
            CartView,
            CartTotal,
            CategoryWithSubcategories,
            CategoryList,
            SubcategoryList,
            ProductList,
            ProductDetail,
            CheckoutRequest,
            OrderWithItems,
            OrderList,
            UpdateOrderStatusRequest,
            SubmitContactRequest,
            ContactMessageList,
            UpdateContactStatusRequest,
            FieldError,
            params::Pagination,
            params::SortOrder,
            params::OrderListQuery,
            params::ContactListQuery,
            Meta,
            ApiResponse<CartView>,
            ApiResponse<CartItem>,
            ApiResponse<CartTotal>,
            ApiResponse<CategoryList>,
            ApiResponse<ProductList>,
            ApiResponse<ProductDetail>,
            ApiResponse<OrderWithItems>,
            ApiResponse<OrderList>,
            ApiResponse<ContactMessage>
        )
    ),
    security(
        ("bearer_auth" = [])
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Catalog", description = "Storefront browsing"),
        (name = "Cart", description = "Per-user cart"),
        (name = "Orders", description = "Checkout and order history"),
        (name = "Contact", description = "Contact form inbox"),
        (name = "Admin", description = "Back-office operations"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
