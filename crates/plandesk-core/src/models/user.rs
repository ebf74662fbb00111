use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    pub const ALL: [Gender; 3] = [Gender::Male, Gender::Female, Gender::Other];

    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
            Gender::Other => "Other",
        }
    }

    /// Parse a gender choice, ignoring case and surrounding whitespace
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|g| g.as_str().eq_ignore_ascii_case(s))
    }
}

impl std::fmt::Display for Gender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Account record owned by the server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub mobile: String,
    pub is_active: bool,
    pub is_staff: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: i64,
    pub full_name: String,
    #[serde(default)]
    pub date_of_birth: Option<NaiveDate>,
    #[serde(default)]
    pub gender: Option<Gender>,
    #[serde(default)]
    pub address_line1: Option<String>,
    #[serde(default)]
    pub address_line2: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub pincode: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserProfile {
    /// Address lines, city, state and pincode joined for display.
    /// Empty components are skipped.
    pub fn address_display(&self) -> String {
        let locality = [self.city.as_deref(), self.state.as_deref()]
            .into_iter()
            .flatten()
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(", ");
        let locality = match self.pincode.as_deref() {
            Some(pin) if !pin.is_empty() && !locality.is_empty() => format!("{} {}", locality, pin),
            Some(pin) if !pin.is_empty() => pin.to_string(),
            _ => locality,
        };

        [
            self.address_line1.as_deref().unwrap_or_default(),
            self.address_line2.as_deref().unwrap_or_default(),
            locality.as_str(),
        ]
        .into_iter()
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
    }
}

/// The `/accounts/profile/` representation: user fields with the profile nested
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserWithProfile {
    #[serde(flatten)]
    pub user: User,
    pub profile: UserProfile,
}

impl UserWithProfile {
    pub fn id(&self) -> i64 {
        self.user.id
    }

    pub fn email(&self) -> &str {
        &self.user.email
    }

    pub fn full_name(&self) -> &str {
        &self.profile.full_name
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) const PROFILE_JSON: &str = r#"{
        "id": 7,
        "email": "a@b.com",
        "mobile": "9876543210",
        "is_active": true,
        "is_staff": false,
        "created_at": "2024-05-01T10:00:00.123456Z",
        "updated_at": "2024-05-02T11:30:00Z",
        "profile": {
            "id": 3,
            "full_name": "Asha Rao",
            "date_of_birth": "1990-04-12",
            "gender": "Female",
            "address_line1": "12 MG Road",
            "address_line2": null,
            "city": "Bengaluru",
            "state": "Karnataka",
            "pincode": "560001",
            "created_at": "2024-05-01T10:00:00Z",
            "updated_at": "2024-05-02T11:30:00Z"
        }
    }"#;

    #[test]
    fn test_parse_user_with_profile() {
        let user: UserWithProfile =
            serde_json::from_str(PROFILE_JSON).expect("Failed to parse profile test JSON");

        assert_eq!(user.id(), 7);
        assert_eq!(user.email(), "a@b.com");
        assert!(user.user.is_active);
        assert!(!user.user.is_staff);
        assert_eq!(user.full_name(), "Asha Rao");
        assert_eq!(user.profile.gender, Some(Gender::Female));
        assert_eq!(
            user.profile.date_of_birth,
            NaiveDate::from_ymd_opt(1990, 4, 12)
        );
        assert_eq!(user.profile.address_line2, None);
    }

    #[test]
    fn test_parse_profile_with_missing_optionals() {
        let json = r#"{"id": 1, "full_name": "X", "created_at": "2024-05-01T10:00:00Z", "updated_at": "2024-05-01T10:00:00Z"}"#;
        let profile: UserProfile = serde_json::from_str(json).expect("Failed to parse profile");
        assert_eq!(profile.city, None);
        assert_eq!(profile.gender, None);
        assert_eq!(profile.address_display(), "");
    }

    #[test]
    fn test_address_display() {
        let user: UserWithProfile =
            serde_json::from_str(PROFILE_JSON).expect("Failed to parse profile test JSON");
        assert_eq!(
            user.profile.address_display(),
            "12 MG Road, Bengaluru, Karnataka 560001"
        );

        let mut profile = user.profile.clone();
        profile.city = None;
        profile.state = Some(String::new());
        assert_eq!(profile.address_display(), "12 MG Road, 560001");
    }

    #[test]
    fn test_gender_parse() {
        assert_eq!(Gender::parse("Male"), Some(Gender::Male));
        assert_eq!(Gender::parse(" female "), Some(Gender::Female));
        assert_eq!(Gender::parse("OTHER"), Some(Gender::Other));
        assert_eq!(Gender::parse(""), None);
        assert_eq!(Gender::parse("unknown"), None);
    }
}
