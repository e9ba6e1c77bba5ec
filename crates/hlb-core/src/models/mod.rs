//! Data models for HLB API entities.
//!
//! - `UserProfile`: the signed-in user returned by `/auth/me`
//! - `LoginRequest`, `SignupRequest`: auth request bodies
//! - `AppNotification`: entries of the notifications inbox

pub mod notification;
pub mod user;

pub use notification::{unread_count, AppNotification};
pub use user::{LoginRequest, SignupRequest, UserProfile};
pub(crate) use user::TokenResponse;
