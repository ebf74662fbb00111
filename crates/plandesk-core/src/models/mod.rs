//! Data models for the accounts API.
//!
//! - `User`, `UserProfile`, `UserWithProfile`: server-owned account records
//! - Request/response bodies for registration, login and logout
//! - `ProfileDraft` / `ProfileUpdate`: form values and the partial update sent
//!   from them
//! - `FieldErrors`: field-level validation messages

pub mod account;
pub mod user;
pub mod validation;

pub use account::{
    LoginRequest, LogoutResponse, ProfileDraft, ProfileUpdate, RegisterRequest, RegisterResponse,
};
pub use user::{Gender, User, UserProfile, UserWithProfile};
pub use validation::FieldErrors;
