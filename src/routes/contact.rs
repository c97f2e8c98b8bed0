use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::post,
};

use crate::{
    dto::contact::SubmitContactRequest,
    error::AppResult,
    models::ContactMessage,
    response::{ApiResponse, Meta},
    services::contact_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/", post(submit))
}

#[utoipa::path(
    post,
    path = "/api/contact",
    request_body = SubmitContactRequest,
    responses(
        (status = 201, description = "Message accepted into the inbox", body = ApiResponse<ContactMessage>),
        (status = 422, description = "Form rejected with field errors"),
    ),
    tag = "Contact"
)]
pub async fn submit(
    State(state): State<AppState>,
    Json(payload): Json<SubmitContactRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<ContactMessage>>)> {
    let message =
        contact_service::submit_message(&state.pool, &state.config.limits, payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            "Message received",
            message,
            Some(Meta::empty()),
        )),
    ))
}
