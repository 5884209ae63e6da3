//! `domus-auth` — session and authorization boundary.
//!
//! This crate is the single source of truth for "who is acting now" and the
//! sole authority consulted before any role-gated mutation. It is
//! intentionally decoupled from storage and presentation.

pub mod account;
pub mod authorize;
pub mod directory;
pub mod roles;
pub mod session;

pub use account::Account;
pub use authorize::{AuthzError, authorize, is_authorized};
pub use directory::{AccountDirectory, CredentialVerifier};
pub use roles::Role;
pub use session::Session;
