//! Response-shaping data models.
//!
//! These structs mirror subsets of the Google resource schemas. Each is
//! populated once per request from a provider response and discarded
//! after serialization; nothing here has a lifecycle of its own.

/// Managed instance group and instance template summaries
pub mod compute;
