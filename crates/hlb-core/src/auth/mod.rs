//! Authentication module for managing the user session.
//!
//! This module provides:
//! - `SessionStore`: login, registration, logout and startup restore
//! - `Session`, `AuthStatus`: the validated identity and the tri-state around it
//! - `TokenStore`: the durable slot for the bearer token (file, keychain, memory)

pub mod session;
pub mod store;
pub mod token;

pub use session::{AuthStatus, Session};
pub use store::SessionStore;
pub use token::{FileTokenStore, KeyringTokenStore, MemoryTokenStore, TokenStore, TOKEN_KEY};
