//! HTTP request handlers, one module per resource.

pub mod admin;
pub mod coins;
pub mod gifts;
pub mod llm;
pub mod practice;
pub mod webhook;
