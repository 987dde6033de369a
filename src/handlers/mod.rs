//! HTTP request handlers (route handlers).
//!
//! Each handler is an async function that:
//! 1. Receives HTTP request data (URL params, query string)
//! 2. Issues one or two Google Cloud API calls
//! 3. Reshapes the provider response and returns it as JSON
/// Service liveness endpoint
pub mod health;
/// Managed instance group endpoints
pub mod instance_groups;
/// Instance template endpoints
pub mod instance_templates;
/// Storage bucket endpoints
pub mod storage;
