use crate::{
    audit::log_audit,
    config::PolicyLimits,
    db::DbPool,
    dto::contact::SubmitContactRequest,
    error::{AppError, AppResult},
    models::{ContactMessage, ContactStatus},
    validate::{ContactFields, validate_contact},
};

/// Accept a storefront contact-form submission. Anyone may write in, no
/// identity required; the message lands in the inbox with status `new` and
/// touches nothing else.
pub async fn submit_message(
    pool: &DbPool,
    limits: &PolicyLimits,
    payload: SubmitContactRequest,
) -> AppResult<ContactMessage> {
    let errors = validate_contact(
        &ContactFields {
            name: &payload.name,
            email: &payload.email,
            phone: payload.phone.as_deref(),
            message: &payload.message,
        },
        limits.min_message_len,
    );
    if !errors.is_empty() {
        return Err(AppError::Validation(errors));
    }

    let phone = payload
        .phone
        .as_deref()
        .map(str::trim)
        .filter(|p| !p.is_empty());
    let subject = payload
        .subject
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty());

    let message: ContactMessage = sqlx::query_as(
        r#"
        INSERT INTO contact_messages (id, name, email, phone, category, subject, message, status)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        RETURNING *
        "#,
    )
    .bind(uuid::Uuid::new_v4())
    .bind(payload.name.trim())
    .bind(payload.email.trim())
    .bind(phone)
    .bind(payload.category)
    .bind(subject)
    .bind(payload.message.trim())
    .bind(ContactStatus::New)
    .fetch_one(pool)
    .await?;

    if let Err(err) = log_audit(
        pool,
        None,
        "contact_submit",
        Some("contact_messages"),
        Some(serde_json::json!({
            "message_id": message.id,
            "category": message.category,
        })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(message)
}
