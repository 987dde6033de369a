//! Application configuration management.
//!
//! This module handles loading configuration from environment variables.
//! It uses the `envy` crate to automatically deserialize environment variables into a type-safe struct.

use serde::Deserialize;

/// Application configuration loaded from environment variables.
///
/// # Environment Variables
///
/// - `GCP_PROJECT` (required): project whose buckets `/storage/list` enumerates
/// - `SERVER_PORT` (optional): HTTP server port, defaults to 8080
/// - `GCP_ACCESS_TOKEN` (optional): static OAuth2 bearer token; when unset
///   the token is fetched from the GCE metadata server per request
/// - `STORAGE_API_BASE` / `COMPUTE_API_BASE` (optional): Google API base
///   URLs, overridable so tests can point the client at a local server
/// - `METADATA_API_BASE` (optional): metadata server base URL
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub gcp_project: String,

    #[serde(default = "default_port")]
    pub server_port: u16,

    #[serde(default)]
    pub gcp_access_token: Option<String>,

    #[serde(default = "default_storage_api_base")]
    pub storage_api_base: String,

    #[serde(default = "default_compute_api_base")]
    pub compute_api_base: String,

    #[serde(default = "default_metadata_api_base")]
    pub metadata_api_base: String,
}

/// Default port if SERVER_PORT environment variable is not set.
fn default_port() -> u16 {
    8080
}

fn default_storage_api_base() -> String {
    "https://storage.googleapis.com".to_string()
}

fn default_compute_api_base() -> String {
    "https://compute.googleapis.com".to_string()
}

fn default_metadata_api_base() -> String {
    "http://metadata.google.internal".to_string()
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// This method first attempts to load a `.env` file (which is optional),
    /// then reads environment variables and deserializes them into a Config struct.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Required environment variables are missing (e.g., GCP_PROJECT)
    /// - Environment variable values cannot be parsed into expected types
    pub fn from_env() -> Result<Self, envy::Error> {
        // Try to load .env file if it exists (does nothing if not found)
        dotenvy::dotenv().ok();

        // Parse environment variables into Config struct
        // Field names are automatically converted: gcp_project -> GCP_PROJECT
        envy::from_env::<Config>()
    }
}
