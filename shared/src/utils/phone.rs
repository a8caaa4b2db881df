//! Phone number utilities

use once_cell::sync::Lazy;
use regex::Regex;

// E.164 format
static E164_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\+[1-9]\d{6,14}$").unwrap());

/// Normalize a phone number by removing common formatting characters
pub fn normalize_phone_number(phone: &str) -> String {
    phone
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '+')
        .collect()
}

/// Check if a phone number is a valid E.164 number once formatting is stripped
pub fn is_valid_phone(phone: &str) -> bool {
    E164_REGEX.is_match(&normalize_phone_number(phone))
}

/// Mask a phone number for logs, keeping the last four digits
pub fn mask_phone_number(phone: &str) -> String {
    let normalized = normalize_phone_number(phone);
    if normalized.len() >= 7 {
        format!("***{}", &normalized[normalized.len() - 4..])
    } else {
        "****".to_string()
    }
}
