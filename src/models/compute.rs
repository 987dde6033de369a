//! Compute API response summaries.
//!
//! This module defines the local JSON shapes the compute endpoints reply
//! with, plus the conversions from the raw Compute API types. Full
//! resource URLs are reduced to their trailing names, matching what the
//! original demo showed its UI.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::gcp::{InstanceGroupManager, InstanceTemplate, ManagedInstance, VersionEntry};

/// Query parameters of the update endpoint.
///
/// All fields are optional at the extractor level so that missing ones
/// can be reported individually as 400s instead of a generic rejection.
/// `target_size` stays a string for the same reason: a non-numeric value
/// must surface through the JSON error envelope, not the extractor's
/// plain-text rejection, so the handler parses it.
#[derive(Debug, Deserialize)]
pub struct UpdateQuery {
    pub strategy: Option<String>,
    pub target_template: Option<String>,
    pub target_size: Option<String>,
}

/// The two supported template rollout strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateStrategy {
    /// Replace the group's template outright
    Rolling,
    /// Run the new template on a fixed number of instances alongside
    /// the current one
    Canary,
}

impl FromStr for UpdateStrategy {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "rolling" => Ok(UpdateStrategy::Rolling),
            "canary" => Ok(UpdateStrategy::Canary),
            _ => Err(()),
        }
    }
}

/// Summary of a regional managed instance group.
///
/// # JSON Example
///
/// ```json
/// {
///   "name": "web-mig",
///   "region": "us-central1",
///   "target_size": 3,
///   "instance_template": "web-v1",
///   "versions": [
///     {"name": null, "instance_template": "web-v1", "target_size": null}
///   ],
///   "instances": [
///     {
///       "instance": "web-mig-abcd",
///       "status": "RUNNING",
///       "current_action": "NONE",
///       "instance_template": "web-v1"
///     }
///   ]
/// }
/// ```
#[derive(Debug, Serialize)]
pub struct InstanceGroupSummary {
    /// Group name
    pub name: String,

    /// Region name (trailing segment of the region URL)
    pub region: Option<String>,

    /// Number of instances the group maintains
    pub target_size: Option<i64>,

    /// Primary instance template name
    pub instance_template: Option<String>,

    /// Template versions currently configured on the group
    pub versions: Vec<TemplateVersionSummary>,

    /// Member instances
    pub instances: Vec<ManagedInstanceSummary>,
}

/// One template version configured on a managed instance group.
#[derive(Debug, Serialize)]
pub struct TemplateVersionSummary {
    pub name: Option<String>,
    pub instance_template: String,
    /// Fixed instance count pinned to this version, if any
    pub target_size: Option<i64>,
}

/// One member instance of a managed instance group.
#[derive(Debug, Serialize)]
pub struct ManagedInstanceSummary {
    pub instance: Option<String>,
    pub status: Option<String>,
    pub current_action: Option<String>,
    /// Template the instance is currently running
    pub instance_template: Option<String>,
}

/// Summary of an instance template.
#[derive(Debug, Serialize)]
pub struct InstanceTemplateSummary {
    pub name: String,
    pub machine_type: Option<String>,
    /// Network of the first interface, if any
    pub network: Option<String>,
    pub tags: Vec<String>,
}

/// Reply body for the update endpoint.
#[derive(Debug, Serialize)]
pub struct UpdateStatus {
    pub status: &'static str,
}

impl UpdateStatus {
    pub fn ok() -> Self {
        Self { status: "ok" }
    }
}

/// Reduce a resource URL or partial path to its trailing name.
///
/// `projects/p/global/instanceTemplates/web-v1` becomes `web-v1`; a bare
/// name passes through unchanged.
fn resource_name(link: &str) -> String {
    link.rsplit('/').next().unwrap_or(link).to_string()
}

impl InstanceGroupSummary {
    /// Assemble the summary from the group resource and its member list.
    pub fn from_parts(group: InstanceGroupManager, instances: Vec<ManagedInstance>) -> Self {
        Self {
            name: group.name,
            region: group.region.as_deref().map(resource_name),
            target_size: group.target_size,
            instance_template: group.instance_template.as_deref().map(resource_name),
            versions: group.versions.into_iter().map(Into::into).collect(),
            instances: instances.into_iter().map(Into::into).collect(),
        }
    }
}

impl From<VersionEntry> for TemplateVersionSummary {
    fn from(version: VersionEntry) -> Self {
        Self {
            name: version.name,
            instance_template: resource_name(&version.instance_template),
            target_size: version.target_size.and_then(|size| size.fixed),
        }
    }
}

impl From<ManagedInstance> for ManagedInstanceSummary {
    fn from(instance: ManagedInstance) -> Self {
        Self {
            instance: instance.instance.as_deref().map(resource_name),
            status: instance.instance_status,
            current_action: instance.current_action,
            instance_template: instance
                .version
                .and_then(|v| v.instance_template)
                .as_deref()
                .map(resource_name),
        }
    }
}

impl From<InstanceTemplate> for InstanceTemplateSummary {
    fn from(template: InstanceTemplate) -> Self {
        let properties = template.properties.unwrap_or_default();
        Self {
            name: template.name,
            machine_type: properties.machine_type.as_deref().map(resource_name),
            network: properties
                .network_interfaces
                .first()
                .and_then(|nic| nic.network.as_deref())
                .map(resource_name),
            tags: properties.tags.map(|t| t.items).unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gcp::{
        FixedOrPercent, InstanceProperties, ManagedInstanceVersion, NetworkInterface, Tags,
    };

    #[test]
    fn strategy_parses_known_values_only() {
        assert_eq!("rolling".parse(), Ok(UpdateStrategy::Rolling));
        assert_eq!("canary".parse(), Ok(UpdateStrategy::Canary));
        assert_eq!("blue-green".parse::<UpdateStrategy>(), Err(()));
        assert_eq!("Rolling".parse::<UpdateStrategy>(), Err(()));
    }

    #[test]
    fn resource_name_takes_trailing_segment() {
        assert_eq!(
            resource_name("projects/p/global/instanceTemplates/web-v1"),
            "web-v1"
        );
        assert_eq!(
            resource_name("https://compute.googleapis.com/compute/v1/projects/p/regions/us-east1"),
            "us-east1"
        );
        assert_eq!(resource_name("bare-name"), "bare-name");
    }

    #[test]
    fn group_summary_trims_links_and_maps_members() {
        let group = InstanceGroupManager {
            name: "web-mig".to_string(),
            region: Some(
                "https://compute.googleapis.com/compute/v1/projects/p/regions/us-central1"
                    .to_string(),
            ),
            instance_template: Some("projects/p/global/instanceTemplates/web-v1".to_string()),
            target_size: Some(3),
            versions: vec![VersionEntry {
                name: Some("canary".to_string()),
                instance_template: "projects/p/global/instanceTemplates/web-v2".to_string(),
                target_size: Some(FixedOrPercent::fixed(1)),
            }],
        };
        let instances = vec![ManagedInstance {
            instance: Some("projects/p/zones/us-central1-a/instances/web-mig-abcd".to_string()),
            instance_status: Some("RUNNING".to_string()),
            current_action: Some("NONE".to_string()),
            version: Some(ManagedInstanceVersion {
                instance_template: Some("projects/p/global/instanceTemplates/web-v1".to_string()),
            }),
        }];

        let summary = InstanceGroupSummary::from_parts(group, instances);

        assert_eq!(summary.region.as_deref(), Some("us-central1"));
        assert_eq!(summary.instance_template.as_deref(), Some("web-v1"));
        assert_eq!(summary.versions[0].instance_template, "web-v2");
        assert_eq!(summary.versions[0].target_size, Some(1));
        assert_eq!(summary.instances[0].instance.as_deref(), Some("web-mig-abcd"));
        assert_eq!(summary.instances[0].instance_template.as_deref(), Some("web-v1"));
    }

    #[test]
    fn template_summary_handles_missing_properties() {
        let bare = InstanceTemplate {
            name: "bare".to_string(),
            properties: None,
        };
        let summary = InstanceTemplateSummary::from(bare);
        assert_eq!(summary.name, "bare");
        assert_eq!(summary.machine_type, None);
        assert_eq!(summary.network, None);
        assert!(summary.tags.is_empty());
    }

    #[test]
    fn template_summary_reads_first_interface() {
        let template = InstanceTemplate {
            name: "web-v1".to_string(),
            properties: Some(InstanceProperties {
                machine_type: Some("zones/us-central1-a/machineTypes/e2-medium".to_string()),
                network_interfaces: vec![NetworkInterface {
                    network: Some("projects/p/global/networks/default".to_string()),
                }],
                tags: Some(Tags {
                    items: vec!["http-server".to_string()],
                }),
            }),
        };
        let summary = InstanceTemplateSummary::from(template);
        assert_eq!(summary.machine_type.as_deref(), Some("e2-medium"));
        assert_eq!(summary.network.as_deref(), Some("default"));
        assert_eq!(summary.tags, vec!["http-server"]);
    }
}
