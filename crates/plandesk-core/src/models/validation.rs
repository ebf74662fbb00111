use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Maximum length of a full name.
pub const MAX_FULL_NAME_LENGTH: usize = 255;

/// Maximum length of an address line.
pub const MAX_ADDRESS_LENGTH: usize = 255;

/// Maximum length of city and state names.
pub const MAX_REGION_LENGTH: usize = 100;

/// Minimum password length accepted at registration.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Field-level validation messages keyed by field name.
///
/// This is the same shape the server uses for the `details` member of an
/// error payload, so local and remote validation failures render the same way.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0.entry(field.to_string()).or_default().push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// First message for a field, for compact inline display
    pub fn first(&self, field: &str) -> Option<&str> {
        self.0.get(field).and_then(|v| v.first()).map(String::as_str)
    }

    /// `Ok(())` when nothing was recorded, otherwise the collected errors
    pub fn into_result(self) -> Result<(), FieldErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl std::fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for (field, messages) in &self.0 {
            for message in messages {
                if !first {
                    write!(f, "; ")?;
                }
                write!(f, "{}: {}", field, message)?;
                first = false;
            }
        }
        Ok(())
    }
}

// ============================================================================
// Field rules
// ============================================================================

pub fn is_valid_email(email: &str) -> bool {
    let mut parts = email.split('@');
    let (Some(local), Some(domain), None) = (parts.next(), parts.next(), parts.next()) else {
        return false;
    };
    if local.is_empty() || email.chars().any(char::is_whitespace) {
        return false;
    }
    let labels: Vec<&str> = domain.split('.').collect();
    labels.len() >= 2 && labels.iter().all(|l| !l.is_empty())
}

pub fn is_valid_mobile(mobile: &str) -> bool {
    mobile.len() == 10 && mobile.chars().all(|c| c.is_ascii_digit())
}

/// Empty pincodes are allowed; otherwise exactly six digits
pub fn is_valid_pincode(pincode: &str) -> bool {
    pincode.is_empty() || (pincode.len() == 6 && pincode.chars().all(|c| c.is_ascii_digit()))
}

pub(crate) fn check_max_len(errors: &mut FieldErrors, field: &str, value: &str, max: usize) {
    if value.chars().count() > max {
        errors.add(
            field,
            format!("Ensure this field has no more than {} characters.", max),
        );
    }
}

pub(crate) fn check_required(errors: &mut FieldErrors, field: &str, value: &str) -> bool {
    if value.trim().is_empty() {
        errors.add(field, "This field is required.");
        false
    } else {
        true
    }
}
