//! Centralized authorization predicate.
//!
//! Every role-gated mutation in the system consults this module **before**
//! applying its mutation; pages and services never re-derive role checks ad
//! hoc.

use thiserror::Error;

use crate::{Account, Role};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthzError {
    #[error("not authenticated")]
    NotAuthenticated,

    #[error("forbidden: role '{actual}' is not permitted")]
    Forbidden { actual: Role },
}

/// Whether `user` may perform an action restricted to `required` roles.
///
/// - No user present → `false`, for every `required` set.
/// - An empty `required` set means "any authenticated user".
///
/// Pure policy check: no IO, no panics, no business logic.
pub fn is_authorized(user: Option<&Account>, required: &[Role]) -> bool {
    match user {
        None => false,
        Some(account) => required.is_empty() || required.contains(&account.role),
    }
}

/// Like [`is_authorized`], but distinguishes *why* the check failed.
pub fn authorize(user: Option<&Account>, required: &[Role]) -> Result<(), AuthzError> {
    let account = user.ok_or(AuthzError::NotAuthenticated)?;
    if required.is_empty() || required.contains(&account.role) {
        Ok(())
    } else {
        Err(AuthzError::Forbidden {
            actual: account.role,
        })
    }
}
