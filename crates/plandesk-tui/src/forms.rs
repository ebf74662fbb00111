//! Form state for the login, registration and profile screens.
//!
//! Forms only hold text and focus. Validation rules live in
//! `plandesk_core::models`; the app copies their `FieldErrors` back here for
//! display.

use plandesk_core::models::{
    FieldErrors, LoginRequest, ProfileDraft, RegisterRequest, UserWithProfile,
};

// ============================================================================
// Constants
// ============================================================================

/// Maximum length for email input
const MAX_EMAIL_LENGTH: usize = 254;

/// Maximum length for password input.
/// 128 chars accommodates password managers and passphrases.
const MAX_PASSWORD_LENGTH: usize = 128;

const MAX_NAME_LENGTH: usize = 255;
const MAX_ADDRESS_LENGTH: usize = 255;
const MAX_REGION_LENGTH: usize = 100;

/// Check if a character is valid for input (no control characters)
fn is_valid_input_char(c: char) -> bool {
    !c.is_control()
}

/// Check if a character may be appended to a field holding `current_len` chars
pub fn can_add_char(current_len: usize, max_len: usize, c: char) -> bool {
    current_len < max_len && is_valid_input_char(c)
}

fn push_limited(value: &mut String, max_len: usize, c: char) {
    if can_add_char(value.chars().count(), max_len, c) {
        value.push(c);
    }
}

/// Fields in tab order. `next`/`prev` wrap around.
pub trait FieldCycle: Copy + PartialEq + 'static {
    const ORDER: &'static [Self];

    fn next(self) -> Self {
        let i = Self::ORDER.iter().position(|f| *f == self).unwrap_or(0);
        Self::ORDER[(i + 1) % Self::ORDER.len()]
    }

    fn prev(self) -> Self {
        let i = Self::ORDER.iter().position(|f| *f == self).unwrap_or(0);
        Self::ORDER[(i + Self::ORDER.len() - 1) % Self::ORDER.len()]
    }
}

// ============================================================================
// Login
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginField {
    Email,
    Password,
    Submit,
}

impl FieldCycle for LoginField {
    const ORDER: &'static [Self] = &[LoginField::Email, LoginField::Password, LoginField::Submit];
}

#[derive(Debug, Clone)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
    pub focus: LoginField,
    pub error: Option<String>,
    pub notice: Option<String>,
    pub field_errors: FieldErrors,
}

impl LoginForm {
    pub fn new(email: String) -> Self {
        let focus = if email.is_empty() {
            LoginField::Email
        } else {
            LoginField::Password
        };
        Self {
            email,
            password: String::new(),
            focus,
            error: None,
            notice: None,
            field_errors: FieldErrors::new(),
        }
    }

    pub fn push_char(&mut self, c: char) {
        match self.focus {
            LoginField::Email => push_limited(&mut self.email, MAX_EMAIL_LENGTH, c),
            LoginField::Password => push_limited(&mut self.password, MAX_PASSWORD_LENGTH, c),
            LoginField::Submit => {}
        }
    }

    pub fn pop_char(&mut self) {
        match self.focus {
            LoginField::Email => {
                self.email.pop();
            }
            LoginField::Password => {
                self.password.pop();
            }
            LoginField::Submit => {}
        }
    }

    pub fn clear_feedback(&mut self) {
        self.error = None;
        self.notice = None;
        self.field_errors = FieldErrors::new();
    }

    pub fn to_request(&self) -> LoginRequest {
        LoginRequest::new(self.email.trim(), self.password.clone())
    }
}

// ============================================================================
// Registration
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegisterField {
    Email,
    Mobile,
    Password,
    FullName,
    Submit,
}

impl FieldCycle for RegisterField {
    const ORDER: &'static [Self] = &[
        RegisterField::Email,
        RegisterField::Mobile,
        RegisterField::Password,
        RegisterField::FullName,
        RegisterField::Submit,
    ];
}

impl RegisterField {
    pub fn key(&self) -> &'static str {
        match self {
            RegisterField::Email => "email",
            RegisterField::Mobile => "mobile",
            RegisterField::Password => "password",
            RegisterField::FullName => "full_name",
            RegisterField::Submit => "",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RegisterField::Email => "Email",
            RegisterField::Mobile => "Mobile",
            RegisterField::Password => "Password",
            RegisterField::FullName => "Full name",
            RegisterField::Submit => "Register",
        }
    }
}

#[derive(Debug, Clone)]
pub struct RegisterForm {
    pub email: String,
    pub mobile: String,
    pub password: String,
    pub full_name: String,
    pub focus: RegisterField,
    pub error: Option<String>,
    pub field_errors: FieldErrors,
}

impl Default for RegisterForm {
    fn default() -> Self {
        Self {
            email: String::new(),
            mobile: String::new(),
            password: String::new(),
            full_name: String::new(),
            focus: RegisterField::Email,
            error: None,
            field_errors: FieldErrors::new(),
        }
    }
}

impl RegisterForm {
    pub fn value(&self, field: RegisterField) -> &str {
        match field {
            RegisterField::Email => &self.email,
            RegisterField::Mobile => &self.mobile,
            RegisterField::Password => &self.password,
            RegisterField::FullName => &self.full_name,
            RegisterField::Submit => "",
        }
    }

    pub fn push_char(&mut self, c: char) {
        match self.focus {
            RegisterField::Email => push_limited(&mut self.email, MAX_EMAIL_LENGTH, c),
            RegisterField::Mobile => {
                if c.is_ascii_digit() {
                    push_limited(&mut self.mobile, 10, c);
                }
            }
            RegisterField::Password => push_limited(&mut self.password, MAX_PASSWORD_LENGTH, c),
            RegisterField::FullName => push_limited(&mut self.full_name, MAX_NAME_LENGTH, c),
            RegisterField::Submit => {}
        }
    }

    pub fn pop_char(&mut self) {
        match self.focus {
            RegisterField::Email => {
                self.email.pop();
            }
            RegisterField::Mobile => {
                self.mobile.pop();
            }
            RegisterField::Password => {
                self.password.pop();
            }
            RegisterField::FullName => {
                self.full_name.pop();
            }
            RegisterField::Submit => {}
        }
    }

    pub fn clear_feedback(&mut self) {
        self.error = None;
        self.field_errors = FieldErrors::new();
    }

    pub fn to_request(&self) -> RegisterRequest {
        RegisterRequest {
            email: self.email.trim().to_string(),
            mobile: self.mobile.trim().to_string(),
            password: self.password.clone(),
            full_name: self.full_name.trim().to_string(),
        }
    }
}

// ============================================================================
// Profile
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileField {
    FullName,
    DateOfBirth,
    Gender,
    AddressLine1,
    AddressLine2,
    City,
    State,
    Pincode,
    Save,
}

impl FieldCycle for ProfileField {
    const ORDER: &'static [Self] = &[
        ProfileField::FullName,
        ProfileField::DateOfBirth,
        ProfileField::Gender,
        ProfileField::AddressLine1,
        ProfileField::AddressLine2,
        ProfileField::City,
        ProfileField::State,
        ProfileField::Pincode,
        ProfileField::Save,
    ];
}

impl ProfileField {
    pub fn key(&self) -> &'static str {
        match self {
            ProfileField::FullName => "full_name",
            ProfileField::DateOfBirth => "date_of_birth",
            ProfileField::Gender => "gender",
            ProfileField::AddressLine1 => "address_line1",
            ProfileField::AddressLine2 => "address_line2",
            ProfileField::City => "city",
            ProfileField::State => "state",
            ProfileField::Pincode => "pincode",
            ProfileField::Save => "",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ProfileField::FullName => "Full name",
            ProfileField::DateOfBirth => "Date of birth",
            ProfileField::Gender => "Gender",
            ProfileField::AddressLine1 => "Address 1",
            ProfileField::AddressLine2 => "Address 2",
            ProfileField::City => "City",
            ProfileField::State => "State",
            ProfileField::Pincode => "Pincode",
            ProfileField::Save => "Save",
        }
    }

    pub fn hint(&self) -> Option<&'static str> {
        match self {
            ProfileField::DateOfBirth => Some("YYYY-MM-DD"),
            ProfileField::Gender => Some("Male/Female/Other"),
            ProfileField::Pincode => Some("6 digits"),
            _ => None,
        }
    }

    fn max_len(&self) -> usize {
        match self {
            ProfileField::FullName => MAX_NAME_LENGTH,
            ProfileField::DateOfBirth => 10,
            ProfileField::Gender => 6,
            ProfileField::AddressLine1 | ProfileField::AddressLine2 => MAX_ADDRESS_LENGTH,
            ProfileField::City | ProfileField::State => MAX_REGION_LENGTH,
            ProfileField::Pincode => 6,
            ProfileField::Save => 0,
        }
    }
}

/// Profile page state: the user as last fetched by the page plus the edit form
#[derive(Debug, Clone)]
pub struct ProfileForm {
    pub user: Option<UserWithProfile>,
    pub draft: ProfileDraft,
    pub focus: ProfileField,
    pub editing: bool,
    pub error: Option<String>,
    pub success: Option<String>,
    pub field_errors: FieldErrors,
}

impl Default for ProfileForm {
    fn default() -> Self {
        Self {
            user: None,
            draft: ProfileDraft::default(),
            focus: ProfileField::FullName,
            editing: false,
            error: None,
            success: None,
            field_errors: FieldErrors::new(),
        }
    }
}

impl ProfileForm {
    /// Show `user` and reset the form to its values
    pub fn populate(&mut self, user: UserWithProfile) {
        self.draft = ProfileDraft::from_profile(&user.profile);
        self.user = Some(user);
    }

    pub fn toggle_edit(&mut self) {
        self.editing = !self.editing;
        self.clear_feedback();
        self.focus = ProfileField::FullName;
        if !self.editing {
            if let Some(ref user) = self.user {
                self.draft = ProfileDraft::from_profile(&user.profile);
            }
        }
    }

    pub fn value(&self, field: ProfileField) -> &str {
        match field {
            ProfileField::FullName => &self.draft.full_name,
            ProfileField::DateOfBirth => &self.draft.date_of_birth,
            ProfileField::Gender => &self.draft.gender,
            ProfileField::AddressLine1 => &self.draft.address_line1,
            ProfileField::AddressLine2 => &self.draft.address_line2,
            ProfileField::City => &self.draft.city,
            ProfileField::State => &self.draft.state,
            ProfileField::Pincode => &self.draft.pincode,
            ProfileField::Save => "",
        }
    }

    fn value_mut(&mut self, field: ProfileField) -> Option<&mut String> {
        match field {
            ProfileField::FullName => Some(&mut self.draft.full_name),
            ProfileField::DateOfBirth => Some(&mut self.draft.date_of_birth),
            ProfileField::Gender => Some(&mut self.draft.gender),
            ProfileField::AddressLine1 => Some(&mut self.draft.address_line1),
            ProfileField::AddressLine2 => Some(&mut self.draft.address_line2),
            ProfileField::City => Some(&mut self.draft.city),
            ProfileField::State => Some(&mut self.draft.state),
            ProfileField::Pincode => Some(&mut self.draft.pincode),
            ProfileField::Save => None,
        }
    }

    pub fn push_char(&mut self, c: char) {
        let field = self.focus;
        if field == ProfileField::Pincode && !c.is_ascii_digit() {
            return;
        }
        if let Some(value) = self.value_mut(field) {
            push_limited(value, field.max_len(), c);
        }
    }

    pub fn pop_char(&mut self) {
        let field = self.focus;
        if let Some(value) = self.value_mut(field) {
            value.pop();
        }
    }

    pub fn clear_feedback(&mut self) {
        self.error = None;
        self.success = None;
        self.field_errors = FieldErrors::new();
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const PROFILE_JSON: &str = r#"{
        "id": 7, "email": "a@b.com", "mobile": "9876543210",
        "is_active": true, "is_staff": false,
        "created_at": "2024-05-01T10:00:00Z", "updated_at": "2024-05-01T10:00:00Z",
        "profile": {
            "id": 3, "full_name": "Asha Rao", "date_of_birth": null, "gender": null,
            "address_line1": null, "address_line2": null, "city": "Pune", "state": null,
            "pincode": null,
            "created_at": "2024-05-01T10:00:00Z", "updated_at": "2024-05-01T10:00:00Z"
        }
    }"#;

    fn user() -> UserWithProfile {
        serde_json::from_str(PROFILE_JSON).expect("Failed to parse profile test JSON")
    }

    #[test]
    fn test_can_add_char() {
        assert!(can_add_char(0, 10, 'a'));
        assert!(can_add_char(9, 10, 'z'));
        assert!(!can_add_char(10, 10, 'a'));
        // Control characters rejected
        assert!(!can_add_char(0, 10, '\x00'));
        assert!(!can_add_char(0, 10, '\n'));
        assert!(!can_add_char(0, 10, '\t'));
    }

    #[test]
    fn test_field_cycle_wraps() {
        assert_eq!(LoginField::Email.next(), LoginField::Password);
        assert_eq!(LoginField::Submit.next(), LoginField::Email);
        assert_eq!(LoginField::Email.prev(), LoginField::Submit);

        assert_eq!(RegisterField::FullName.next(), RegisterField::Submit);
        assert_eq!(RegisterField::Email.prev(), RegisterField::Submit);

        assert_eq!(ProfileField::Pincode.next(), ProfileField::Save);
        assert_eq!(ProfileField::Save.next(), ProfileField::FullName);
        assert_eq!(ProfileField::FullName.prev(), ProfileField::Save);
    }

    #[test]
    fn test_login_form_focus_starts_on_password_when_email_known() {
        assert_eq!(LoginForm::new(String::new()).focus, LoginField::Email);
        assert_eq!(LoginForm::new("a@b.com".to_string()).focus, LoginField::Password);
    }

    #[test]
    fn test_login_form_editing() {
        let mut form = LoginForm::new(String::new());
        for c in " a@b.com".chars() {
            form.push_char(c);
        }
        form.focus = LoginField::Password;
        form.push_char('p');
        form.push_char('q');
        form.pop_char();
        form.focus = LoginField::Submit;
        form.push_char('x'); // ignored on the button

        let request = form.to_request();
        assert_eq!(request.email, "a@b.com");
        assert_eq!(request.password, "p");
    }

    #[test]
    fn test_register_mobile_accepts_ten_digits_only() {
        let mut form = RegisterForm {
            focus: RegisterField::Mobile,
            ..Default::default()
        };
        for c in "98765-43210-99".chars() {
            form.push_char(c);
        }
        assert_eq!(form.mobile, "9876543210");
    }

    #[test]
    fn test_profile_form_populate_and_cancel_edit() {
        let mut form = ProfileForm::default();
        form.populate(user());
        assert_eq!(form.value(ProfileField::FullName), "Asha Rao");
        assert_eq!(form.value(ProfileField::City), "Pune");
        assert_eq!(form.value(ProfileField::Gender), "");

        form.toggle_edit();
        assert!(form.editing);
        form.focus = ProfileField::City;
        form.pop_char();
        form.push_char('a');
        assert_eq!(form.value(ProfileField::City), "Puna");

        // Leaving edit mode restores the stored values
        form.toggle_edit();
        assert!(!form.editing);
        assert_eq!(form.value(ProfileField::City), "Pune");
    }

    #[test]
    fn test_profile_pincode_input_limits() {
        let mut form = ProfileForm::default();
        form.populate(user());
        form.focus = ProfileField::Pincode;
        for c in "56a0001999".chars() {
            form.push_char(c);
        }
        assert_eq!(form.value(ProfileField::Pincode), "560001");
    }
}
