use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::user::{Gender, UserProfile};
use super::validation::{
    check_max_len, check_required, is_valid_email, is_valid_mobile, is_valid_pincode, FieldErrors,
    MAX_ADDRESS_LENGTH, MAX_FULL_NAME_LENGTH, MAX_REGION_LENGTH, MIN_PASSWORD_LENGTH,
};

// ============================================================================
// Registration / login bodies
// ============================================================================

#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct RegisterRequest {
    pub email: String,
    pub mobile: String,
    pub password: String,
    pub full_name: String,
}

impl RegisterRequest {
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();

        if check_required(&mut errors, "email", &self.email) && !is_valid_email(&self.email) {
            errors.add("email", "Enter a valid email address.");
        }
        if check_required(&mut errors, "mobile", &self.mobile) && !is_valid_mobile(&self.mobile) {
            errors.add("mobile", "Mobile number must be 10 digits");
        }
        if self.password.chars().count() < MIN_PASSWORD_LENGTH {
            errors.add(
                "password",
                format!(
                    "Ensure this field has at least {} characters.",
                    MIN_PASSWORD_LENGTH
                ),
            );
        }
        if check_required(&mut errors, "full_name", &self.full_name) {
            check_max_len(&mut errors, "full_name", &self.full_name, MAX_FULL_NAME_LENGTH);
        }

        errors.into_result()
    }
}

// Passwords stay out of logs
impl std::fmt::Debug for RegisterRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisterRequest")
            .field("email", &self.email)
            .field("mobile", &self.mobile)
            .field("password", &"<redacted>")
            .field("full_name", &self.full_name)
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterResponse {
    pub id: i64,
    pub email: String,
    pub message: String,
}

#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl LoginRequest {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        if check_required(&mut errors, "email", &self.email) && !is_valid_email(&self.email) {
            errors.add("email", "Enter a valid email address.");
        }
        if self.password.is_empty() {
            errors.add("password", "This field is required.");
        }
        errors.into_result()
    }
}

impl std::fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginRequest")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogoutResponse {
    pub message: String,
}

// ============================================================================
// Profile updates
// ============================================================================

/// Partial profile update for `PATCH /accounts/profile/`.
///
/// Only fields set to `Some` are serialized. For the nullable fields the inner
/// `Option` distinguishes "set to a value" from "clear" (`Some(None)` is sent
/// as `null`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<Option<NaiveDate>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<Option<Gender>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address_line1: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address_line2: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pincode: Option<String>,
}

impl ProfileUpdate {
    pub fn with_full_name(full_name: impl Into<String>) -> Self {
        Self {
            full_name: Some(full_name.into()),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.changed_fields().is_empty()
    }

    /// Names of the fields this update will send
    pub fn changed_fields(&self) -> Vec<&'static str> {
        let mut fields = Vec::new();
        if self.full_name.is_some() {
            fields.push("full_name");
        }
        if self.date_of_birth.is_some() {
            fields.push("date_of_birth");
        }
        if self.gender.is_some() {
            fields.push("gender");
        }
        if self.address_line1.is_some() {
            fields.push("address_line1");
        }
        if self.address_line2.is_some() {
            fields.push("address_line2");
        }
        if self.city.is_some() {
            fields.push("city");
        }
        if self.state.is_some() {
            fields.push("state");
        }
        if self.pincode.is_some() {
            fields.push("pincode");
        }
        fields
    }
}

/// Editable profile values as entered in a form.
///
/// Every field is plain text; empty means "no value".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileDraft {
    pub full_name: String,
    pub date_of_birth: String,
    pub gender: String,
    pub address_line1: String,
    pub address_line2: String,
    pub city: String,
    pub state: String,
    pub pincode: String,
}

impl ProfileDraft {
    pub fn from_profile(profile: &UserProfile) -> Self {
        Self {
            full_name: profile.full_name.clone(),
            date_of_birth: profile
                .date_of_birth
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
            gender: profile
                .gender
                .map(|g| g.as_str().to_string())
                .unwrap_or_default(),
            address_line1: profile.address_line1.clone().unwrap_or_default(),
            address_line2: profile.address_line2.clone().unwrap_or_default(),
            city: profile.city.clone().unwrap_or_default(),
            state: profile.state.clone().unwrap_or_default(),
            pincode: profile.pincode.clone().unwrap_or_default(),
        }
    }

    /// Validate the draft and build an update holding only the fields that
    /// differ from `current`.
    pub fn to_update(&self, current: &UserProfile) -> Result<ProfileUpdate, FieldErrors> {
        let (date_of_birth, gender) = self.parse()?;

        let full_name = self.full_name.trim();
        Ok(ProfileUpdate {
            full_name: (full_name != current.full_name).then(|| full_name.to_string()),
            date_of_birth: (date_of_birth != current.date_of_birth).then_some(date_of_birth),
            gender: (gender != current.gender).then_some(gender),
            address_line1: changed_text(&self.address_line1, &current.address_line1),
            address_line2: changed_text(&self.address_line2, &current.address_line2),
            city: changed_text(&self.city, &current.city),
            state: changed_text(&self.state, &current.state),
            pincode: changed_text(&self.pincode, &current.pincode),
        })
    }

    fn parse(&self) -> Result<(Option<NaiveDate>, Option<Gender>), FieldErrors> {
        let mut errors = FieldErrors::new();

        if check_required(&mut errors, "full_name", &self.full_name) {
            check_max_len(&mut errors, "full_name", self.full_name.trim(), MAX_FULL_NAME_LENGTH);
        }
        check_max_len(&mut errors, "address_line1", self.address_line1.trim(), MAX_ADDRESS_LENGTH);
        check_max_len(&mut errors, "address_line2", self.address_line2.trim(), MAX_ADDRESS_LENGTH);
        check_max_len(&mut errors, "city", self.city.trim(), MAX_REGION_LENGTH);
        check_max_len(&mut errors, "state", self.state.trim(), MAX_REGION_LENGTH);

        if !is_valid_pincode(self.pincode.trim()) {
            errors.add("pincode", "Pincode must be 6 digits");
        }

        let date_of_birth = match self.date_of_birth.trim() {
            "" => None,
            s => match NaiveDate::parse_from_str(s, "%Y-%m-%d") {
                Ok(date) => Some(date),
                Err(_) => {
                    errors.add("date_of_birth", "Date must be in YYYY-MM-DD format");
                    None
                }
            },
        };

        let gender = match self.gender.trim() {
            "" => None,
            s => match Gender::parse(s) {
                Some(g) => Some(g),
                None => {
                    errors.add("gender", "Gender must be Male, Female or Other");
                    None
                }
            },
        };

        errors.into_result().map(|_| (date_of_birth, gender))
    }
}

/// Trimmed draft text when it differs from the stored value.
/// A missing stored value compares equal to the empty string.
fn changed_text(draft: &str, current: &Option<String>) -> Option<String> {
    let draft = draft.trim();
    if draft == current.as_deref().unwrap_or_default() {
        None
    } else {
        Some(draft.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::user::tests::PROFILE_JSON;
    use crate::models::UserWithProfile;

    fn current_profile() -> UserProfile {
        let user: UserWithProfile =
            serde_json::from_str(PROFILE_JSON).expect("Failed to parse profile test JSON");
        user.profile
    }

    fn valid_registration() -> RegisterRequest {
        RegisterRequest {
            email: "a@b.com".to_string(),
            mobile: "9876543210".to_string(),
            password: "s3cretpass".to_string(),
            full_name: "Asha Rao".to_string(),
        }
    }

    #[test]
    fn test_register_validation() {
        assert!(valid_registration().validate().is_ok());

        let request = RegisterRequest {
            email: "not-an-email".to_string(),
            mobile: "12345".to_string(),
            password: "short".to_string(),
            full_name: "  ".to_string(),
        };
        let errors = request.validate().expect_err("invalid registration accepted");
        assert_eq!(errors.first("email"), Some("Enter a valid email address."));
        assert_eq!(errors.first("mobile"), Some("Mobile number must be 10 digits"));
        assert!(errors.contains("password"));
        assert_eq!(errors.first("full_name"), Some("This field is required."));
    }

    #[test]
    fn test_login_validation() {
        assert!(LoginRequest::new("a@b.com", "p").validate().is_ok());

        let errors = LoginRequest::new("", "")
            .validate()
            .expect_err("empty login accepted");
        assert!(errors.contains("email"));
        assert!(errors.contains("password"));
    }

    #[test]
    fn test_credentials_debug_redacts_password() {
        let login = format!("{:?}", LoginRequest::new("a@b.com", "hunter22"));
        assert!(!login.contains("hunter22"));
        assert!(login.contains("a@b.com"));

        let register = format!("{:?}", valid_registration());
        assert!(!register.contains("s3cretpass"));
    }

    #[test]
    fn test_draft_round_trip_has_no_changes() {
        let profile = current_profile();
        let draft = ProfileDraft::from_profile(&profile);

        assert_eq!(draft.date_of_birth, "1990-04-12");
        assert_eq!(draft.gender, "Female");
        assert_eq!(draft.address_line2, "");

        let update = draft.to_update(&profile).expect("valid draft");
        assert!(update.is_empty());
    }

    #[test]
    fn test_draft_sends_only_changed_full_name() {
        let profile = current_profile();
        let mut draft = ProfileDraft::from_profile(&profile);
        draft.full_name = "X".to_string();

        let update = draft.to_update(&profile).expect("valid draft");
        assert_eq!(update, ProfileUpdate::with_full_name("X"));
        assert_eq!(
            serde_json::to_value(&update).expect("serialize update"),
            serde_json::json!({"full_name": "X"})
        );
    }

    #[test]
    fn test_draft_clearing_nullable_fields_sends_null() {
        let profile = current_profile();
        let mut draft = ProfileDraft::from_profile(&profile);
        draft.date_of_birth.clear();
        draft.gender.clear();
        draft.city.clear();

        let update = draft.to_update(&profile).expect("valid draft");
        assert_eq!(update.changed_fields(), vec!["date_of_birth", "gender", "city"]);
        assert_eq!(
            serde_json::to_value(&update).expect("serialize update"),
            serde_json::json!({"date_of_birth": null, "gender": null, "city": ""})
        );
    }

    #[test]
    fn test_draft_normalizes_gender_and_trims_text() {
        let profile = current_profile();
        let mut draft = ProfileDraft::from_profile(&profile);
        draft.gender = "other".to_string();
        draft.address_line2 = "  Near the park ".to_string();
        draft.city = " Bengaluru ".to_string(); // same after trim

        let update = draft.to_update(&profile).expect("valid draft");
        assert_eq!(update.gender, Some(Some(Gender::Other)));
        assert_eq!(update.address_line2.as_deref(), Some("Near the park"));
        assert_eq!(update.city, None);
    }

    #[test]
    fn test_draft_validation_errors() {
        let profile = current_profile();
        let draft = ProfileDraft {
            full_name: String::new(),
            date_of_birth: "12/04/1990".to_string(),
            gender: "robot".to_string(),
            pincode: "12345".to_string(),
            city: "c".repeat(101),
            ..Default::default()
        };

        let errors = draft.to_update(&profile).expect_err("invalid draft accepted");
        assert_eq!(errors.first("full_name"), Some("This field is required."));
        assert_eq!(errors.first("pincode"), Some("Pincode must be 6 digits"));
        assert!(errors.contains("date_of_birth"));
        assert!(errors.contains("gender"));
        assert!(errors.contains("city"));
    }
}
