//! Authentication and authorization middleware extractors.
//!
//! - [`auth::AuthUser`] -- Extracts the authenticated user's profile from a
//!   JWT Bearer token.
//! - [`rbac::RequireAdmin`] -- Requires the profile's `is_admin` flag.

pub mod auth;
pub mod rbac;
