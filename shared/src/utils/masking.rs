//! Masking of subject identifiers before they reach logs

use super::phone::mask_phone_number;

/// Mask an email address, keeping the first character of the local part
/// and the full domain (e.g. `j***@example.com`)
pub fn mask_email(email: &str) -> String {
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() => {
            let first: String = local.chars().take(1).collect();
            format!("{}***@{}", first, domain)
        }
        _ => "***".to_string(),
    }
}

/// Mask any identifier: emails keep their domain, everything else is treated as a phone number
pub fn mask_identifier(identifier: &str) -> String {
    if identifier.contains('@') {
        mask_email(identifier)
    } else {
        mask_phone_number(identifier)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_email() {
        assert_eq!(mask_email("jane.doe@example.com"), "j***@example.com");
        assert_eq!(mask_email("@example.com"), "***");
        assert_eq!(mask_email("plain"), "***");
    }

    #[test]
    fn test_mask_identifier() {
        assert_eq!(mask_identifier("a@b.io"), "a***@b.io");
        assert_eq!(mask_identifier("+14155552671"), "***2671");
    }
}
