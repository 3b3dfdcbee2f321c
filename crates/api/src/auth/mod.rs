//! Authentication primitives.
//!
//! Credentials live with the hosted auth provider; this module only
//! validates the HS256 tokens it issues against the shared signing secret.

pub mod jwt;
