// src/menu_sync/models/contact_info.rs
use candid::CandidType;
use serde::{Deserialize, Serialize};
use validator::Validate;

const WHATSAPP_BASE_URL: &str = "https://wa.me/";

/// Restaurant contact details. One per deployment, last write wins.
#[derive(CandidType, Deserialize, Serialize, Clone, Debug, PartialEq, Eq, Validate)]
pub struct ContactInfo {
    #[validate(length(min = 1, message = "restaurant name is required"))]
    pub restaurant_name: String,
    #[validate(length(min = 1, message = "email is required"))]
    pub email: String,
    #[validate(length(min = 1, message = "WhatsApp number is required"))]
    pub whatsapp_number: String,
}

impl ContactInfo {
    pub fn new(
        restaurant_name: impl Into<String>,
        email: impl Into<String>,
        whatsapp_number: impl Into<String>,
    ) -> Self {
        Self {
            restaurant_name: restaurant_name.into(),
            email: email.into(),
            whatsapp_number: whatsapp_number.into(),
        }
    }

    /// Copy with surrounding whitespace removed from every field.
    pub fn trimmed(&self) -> Self {
        Self {
            restaurant_name: self.restaurant_name.trim().to_string(),
            email: self.email.trim().to_string(),
            whatsapp_number: self.whatsapp_number.trim().to_string(),
        }
    }

    /// `https://wa.me/<digits>` link for the WhatsApp number, if it has any digits.
    pub fn whatsapp_url(&self) -> Option<String> {
        let digits: String = self
            .whatsapp_number
            .chars()
            .filter(|c| c.is_ascii_digit())
            .collect();
        if digits.is_empty() {
            None
        } else {
            Some(format!("{}{}", WHATSAPP_BASE_URL, digits))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whatsapp_url_strips_formatting() {
        let info = ContactInfo::new("Lebnene", "hola@lebnene.es", "+34 612-345 678");
        assert_eq!(info.whatsapp_url().as_deref(), Some("https://wa.me/34612345678"));
    }

    #[test]
    fn whatsapp_url_absent_without_digits() {
        let info = ContactInfo::new("Lebnene", "hola@lebnene.es", "  ");
        assert_eq!(info.whatsapp_url(), None);
    }

    #[test]
    fn blank_fields_fail_validation_after_trim() {
        let info = ContactInfo::new("Lebnene", "   ", "612345678").trimmed();
        assert!(info.validate().is_err());

        let info = ContactInfo::new(" Lebnene ", "hola@lebnene.es", "612345678").trimmed();
        assert!(info.validate().is_ok());
        assert_eq!(info.restaurant_name, "Lebnene");
    }
}
