//! Google Cloud API access layer.
//!
//! `GcpApi` is the seam between HTTP handlers and the Google REST APIs:
//! handlers talk to the trait, the real [`client::GcpClient`] talks to
//! `storage.googleapis.com` / `compute.googleapis.com`, and tests swap in
//! a stub.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub mod auth;
pub mod client;

pub use client::GcpClient;

/// Errors produced by the Google Cloud access layer.
#[derive(Debug, thiserror::Error)]
pub enum GcpError {
    /// The HTTP request never completed (connect failure, timeout, ...).
    #[error("{method} {url} failed: {source}")]
    Transport {
        method: &'static str,
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The API answered with a non-success status. The response body is
    /// kept verbatim; Google's error JSON is the useful diagnostic.
    #[error("{method} {url} returned HTTP {status}: {body}")]
    Api {
        method: &'static str,
        url: String,
        status: u16,
        body: String,
    },

    /// The response body could not be decoded into the expected shape.
    #[error("failed to decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The metadata server did not hand out an access token.
    #[error("failed to obtain access token: {0}")]
    Auth(String),

    /// A multi-call operation (token fetch plus paginated listing) did
    /// not finish within its overall bound.
    #[error("{what} did not complete within {after:?}")]
    Timeout {
        what: &'static str,
        after: std::time::Duration,
    },

    /// A canary update needs the group's current primary template, but
    /// the group reports none.
    #[error("managed instance group has no primary instance template to keep during a canary update")]
    NoPrimaryTemplate,
}

/// Calls against the Google Cloud Storage and Compute APIs.
///
/// One method per remote operation the service performs. All calls are
/// independent; the client holds no per-request state.
#[async_trait]
pub trait GcpApi: Send + Sync {
    /// List all bucket names in a project, following pagination.
    async fn list_buckets(&self, project: &str) -> Result<Vec<String>, GcpError>;

    /// Fetch a regional managed instance group.
    async fn get_instance_group(
        &self,
        project: &str,
        region: &str,
        group: &str,
    ) -> Result<InstanceGroupManager, GcpError>;

    /// List the member instances of a regional managed instance group.
    async fn list_managed_instances(
        &self,
        project: &str,
        region: &str,
        group: &str,
    ) -> Result<Vec<ManagedInstance>, GcpError>;

    /// List all instance templates in a project, following pagination.
    async fn list_instance_templates(
        &self,
        project: &str,
    ) -> Result<Vec<InstanceTemplate>, GcpError>;

    /// PATCH a regional managed instance group with new template/version
    /// fields. The returned long-running operation is not awaited.
    async fn patch_instance_group(
        &self,
        project: &str,
        region: &str,
        group: &str,
        patch: &InstanceGroupManagerPatch,
    ) -> Result<(), GcpError>;
}

/// A regional managed instance group as returned by the Compute API.
///
/// Only the fields this service reads are decoded.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstanceGroupManager {
    pub name: String,

    #[serde(default)]
    pub region: Option<String>,

    /// Self link of the group's primary instance template.
    #[serde(default)]
    pub instance_template: Option<String>,

    #[serde(default)]
    pub target_size: Option<i64>,

    #[serde(default)]
    pub versions: Vec<VersionEntry>,
}

/// One entry of a managed instance group's `versions` list.
///
/// Used both when decoding a group and when building a PATCH body, so it
/// derives both serde traits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    pub instance_template: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_size: Option<FixedOrPercent>,
}

/// Compute API's fixed-or-percent size wrapper.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FixedOrPercent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fixed: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub percent: Option<i64>,
}

impl FixedOrPercent {
    pub fn fixed(n: i64) -> Self {
        Self {
            fixed: Some(n),
            percent: None,
        }
    }
}

/// One entry of a `listManagedInstances` response.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManagedInstance {
    /// Self link of the VM instance.
    #[serde(default)]
    pub instance: Option<String>,

    #[serde(default)]
    pub instance_status: Option<String>,

    #[serde(default)]
    pub current_action: Option<String>,

    #[serde(default)]
    pub version: Option<ManagedInstanceVersion>,
}

/// The template version a managed instance is currently running.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManagedInstanceVersion {
    #[serde(default)]
    pub instance_template: Option<String>,
}

/// An instance template as returned by the Compute API.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstanceTemplate {
    pub name: String,

    #[serde(default)]
    pub properties: Option<InstanceProperties>,
}

/// Instance configuration carried by a template.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstanceProperties {
    #[serde(default)]
    pub machine_type: Option<String>,

    #[serde(default)]
    pub network_interfaces: Vec<NetworkInterface>,

    #[serde(default)]
    pub tags: Option<Tags>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkInterface {
    #[serde(default)]
    pub network: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tags {
    #[serde(default)]
    pub items: Vec<String>,
}

/// The update policy sent with a template rollout PATCH.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePolicy {
    #[serde(rename = "type")]
    pub kind: String,
}

impl UpdatePolicy {
    /// Apply the new template to existing instances, not just new ones.
    pub fn proactive() -> Self {
        Self {
            kind: "PROACTIVE".to_string(),
        }
    }
}

/// Body of a managed instance group PATCH request.
///
/// Which fields are populated depends on the update strategy; absent
/// fields are omitted from the wire body so the API leaves them untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InstanceGroupManagerPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance_template: Option<String>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub versions: Vec<VersionEntry>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub update_policy: Option<UpdatePolicy>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_size: Option<i64>,
}

impl InstanceGroupManagerPatch {
    /// Build a rolling update: the target template becomes the group's
    /// single version and its primary template. An optional `target_size`
    /// resizes the group in the same request.
    pub fn rolling(template_link: String, target_size: Option<i64>) -> Self {
        Self {
            instance_template: Some(template_link.clone()),
            versions: vec![VersionEntry {
                name: None,
                instance_template: template_link,
                target_size: None,
            }],
            update_policy: Some(UpdatePolicy::proactive()),
            target_size,
        }
    }

    /// Build a canary update: the group's current primary template is kept
    /// as version zero and the target template is added as a second
    /// version pinned to a fixed number of instances.
    ///
    /// Falls back to the first `versions` entry when the group does not
    /// report a top-level primary template. Errors if neither is present.
    pub fn canary(
        current: &InstanceGroupManager,
        template_link: String,
        canary_size: i64,
    ) -> Result<Self, GcpError> {
        let primary = current
            .instance_template
            .clone()
            .or_else(|| {
                current
                    .versions
                    .first()
                    .map(|v| v.instance_template.clone())
            })
            .ok_or(GcpError::NoPrimaryTemplate)?;

        Ok(Self {
            instance_template: None,
            versions: vec![
                VersionEntry {
                    name: None,
                    instance_template: primary,
                    target_size: None,
                },
                VersionEntry {
                    name: Some("canary".to_string()),
                    instance_template: template_link,
                    target_size: Some(FixedOrPercent::fixed(canary_size)),
                },
            ],
            update_policy: Some(UpdatePolicy::proactive()),
            target_size: None,
        })
    }
}

/// Expand a bare template name into the partial self link the Compute API
/// accepts. Values already containing a path are passed through, so
/// callers may supply a full self link.
pub fn template_self_link(project: &str, template: &str) -> String {
    if template.contains('/') {
        template.to_string()
    } else {
        format!("projects/{project}/global/instanceTemplates/{template}")
    }
}
