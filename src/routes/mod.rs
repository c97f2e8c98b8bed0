use axum::Router;

use crate::state::AppState;

pub mod admin;
pub mod cart;
pub mod catalog;
pub mod contact;
pub mod doc;
pub mod health;
pub mod orders;
pub mod params;

// Build the API router without binding state; it is provided at the top level.
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .nest("/catalog", catalog::router())
        .nest("/cart", cart::router())
        .nest("/orders", orders::router())
        .nest("/contact", contact::router())
        .nest("/admin", admin::router())
}
