//! Shared application state handed to every handler.

use std::sync::Arc;

use crate::gcp::GcpApi;

/// Cheaply cloneable state injected via Axum's `State` extractor.
///
/// Holds the Google API client handle and the project whose buckets the
/// storage endpoint lists. Nothing in here is mutable; handlers share no
/// state beyond this.
#[derive(Clone)]
pub struct AppState {
    /// Google Cloud API client (trait object so tests can stub it)
    pub gcp: Arc<dyn GcpApi>,

    /// Project used by `/storage/list`
    pub project: String,
}
