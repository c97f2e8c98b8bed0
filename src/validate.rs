use std::sync::LazyLock;

use regex::Regex;

use crate::error::FieldError;

/// Permissive international phone number: optional leading `+`, 9 to 15
/// digits, no leading zero.
static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?[1-9]\d{8,14}$").expect("invalid phone pattern"));

pub fn is_valid_phone(phone: &str) -> bool {
    PHONE_RE.is_match(phone)
}

pub fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.is_empty() || domain.contains('@') {
        return false;
    }
    match domain.split_once('.') {
        Some((host, tld)) => !host.is_empty() && !tld.is_empty(),
        None => false,
    }
}

/// Contact/address fields for checkout. Collects every rejected field so the
/// form can be re-rendered with all messages at once.
#[derive(Debug, Clone)]
pub struct CheckoutForm {
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub address: String,
}

pub fn validate_checkout_form(form: &CheckoutForm) -> Vec<FieldError> {
    let mut errors = Vec::new();
    if form.first_name.trim().is_empty() {
        errors.push(FieldError::new("first_name", "First name is required"));
    }
    if form.last_name.trim().is_empty() {
        errors.push(FieldError::new("last_name", "Last name is required"));
    }
    if !is_valid_phone(form.phone.trim()) {
        errors.push(FieldError::new(
            "phone",
            "Phone must be 9 to 15 digits, optionally starting with '+'",
        ));
    }
    if form.address.trim().is_empty() {
        errors.push(FieldError::new("address", "Address is required"));
    }
    errors
}

pub struct ContactFields<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub phone: Option<&'a str>,
    pub message: &'a str,
}

pub fn validate_contact(fields: &ContactFields<'_>, min_message_len: usize) -> Vec<FieldError> {
    let mut errors = Vec::new();
    if fields.name.trim().is_empty() {
        errors.push(FieldError::new("name", "Name is required"));
    }
    if !is_valid_email(fields.email.trim()) {
        errors.push(FieldError::new("email", "Enter a valid email address"));
    }
    if let Some(phone) = fields.phone {
        let phone = phone.trim();
        if !phone.is_empty() && !is_valid_phone(phone) {
            errors.push(FieldError::new(
                "phone",
                "Phone must be 9 to 15 digits, optionally starting with '+'",
            ));
        }
    }
    if fields.message.trim().chars().count() < min_message_len {
        errors.push(FieldError::new(
            "message",
            format!("Message must be at least {min_message_len} characters"),
        ));
    }
    errors
}
