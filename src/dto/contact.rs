use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::{ContactCategory, ContactMessage, ContactStatus};

#[derive(Debug, Deserialize, ToSchema)]
pub struct SubmitContactRequest {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub category: ContactCategory,
    pub subject: Option<String>,
    pub message: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ContactMessageList {
    pub items: Vec<ContactMessage>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateContactStatusRequest {
    pub status: ContactStatus,
    pub admin_notes: Option<String>,
}
