mod common;

use storefront_api::{
    config::PolicyLimits,
    dto::contact::{SubmitContactRequest, UpdateContactStatusRequest},
    error::AppError,
    models::{ContactCategory, ContactStatus},
    services::{admin_service, contact_service},
};

use common::{create_admin, test_pool};

fn request(message: &str) -> SubmitContactRequest {
    SubmitContactRequest {
        name: "Ann".into(),
        email: "ann@example.com".into(),
        phone: None,
        category: ContactCategory::General,
        subject: Some("About an order".into()),
        message: message.into(),
    }
}

#[tokio::test]
async fn contact_submission_bounds_and_lifecycle() -> anyhow::Result<()> {
    let Some(pool) = test_pool().await else {
        eprintln!("Skipping test: set TEST_DATABASE_URL or DATABASE_URL to run DB flows.");
        return Ok(());
    };
    let limits = PolicyLimits::default();

    // Too-short message is rejected with a field error.
    let err = contact_service::submit_message(&pool, &limits, request("short"))
        .await
        .unwrap_err();
    let AppError::Validation(fields) = err else {
        panic!("expected validation errors");
    };
    assert_eq!(fields.len(), 1);
    assert_eq!(fields[0].field, "message");

    // A long-enough message lands in the inbox as `new`.
    let message =
        contact_service::submit_message(&pool, &limits, request("this is long enough")).await?;
    assert_eq!(message.status, ContactStatus::New);
    assert!(message.resolved_at.is_none());

    // Admin works it through the lifecycle; resolution stamps resolved_at.
    let admin = create_admin(&pool).await;
    let message = admin_service::update_contact_status(
        &pool,
        &admin,
        message.id,
        UpdateContactStatusRequest {
            status: ContactStatus::InProgress,
            admin_notes: Some("looking into it".into()),
        },
    )
    .await?;
    assert_eq!(message.status, ContactStatus::InProgress);

    let message = admin_service::update_contact_status(
        &pool,
        &admin,
        message.id,
        UpdateContactStatusRequest {
            status: ContactStatus::Resolved,
            admin_notes: None,
        },
    )
    .await?;
    assert_eq!(message.status, ContactStatus::Resolved);
    assert_eq!(message.admin_notes.as_deref(), Some("looking into it"));
    assert!(message.resolved_at.is_some());

    // Resolved is terminal.
    let err = admin_service::update_contact_status(
        &pool,
        &admin,
        message.id,
        UpdateContactStatusRequest {
            status: ContactStatus::Closed,
            admin_notes: None,
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    Ok(())
}

#[tokio::test]
async fn contact_phone_is_validated_only_when_given() -> anyhow::Result<()> {
    let Some(pool) = test_pool().await else {
        eprintln!("Skipping test: set TEST_DATABASE_URL or DATABASE_URL to run DB flows.");
        return Ok(());
    };
    let limits = PolicyLimits::default();

    let mut bad = request("this is long enough");
    bad.phone = Some("not-a-phone".into());
    let err = contact_service::submit_message(&pool, &limits, bad)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    let mut ok = request("this is long enough");
    ok.phone = Some("+79991234567".into());
    let message = contact_service::submit_message(&pool, &limits, ok).await?;
    assert_eq!(message.phone.as_deref(), Some("+79991234567"));

    Ok(())
}
