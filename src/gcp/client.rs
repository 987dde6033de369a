//! reqwest-backed implementation of [`GcpApi`].
//!
//! Every method is one HTTP exchange with a Google REST endpoint (list
//! calls follow `nextPageToken` to completion). Base URLs come from
//! configuration so tests can stand up a local server instead.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::Deserialize;
use serde::de::DeserializeOwned;

use super::auth::TokenSource;
use super::{
    GcpApi, GcpError, InstanceGroupManager, InstanceGroupManagerPatch, InstanceTemplate,
    ManagedInstance,
};
use crate::config::Config;

/// Bound on the whole bucket-listing operation, kept from the original
/// demo. Covers every page and token fetch together, not each exchange.
const BUCKET_LIST_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP client for the Storage and Compute v1 REST APIs.
pub struct GcpClient {
    http: Client,
    storage_base: String,
    compute_base: String,
    token: TokenSource,
    bucket_list_timeout: Duration,
}

impl GcpClient {
    /// Build a client from configuration.
    pub fn new(config: &Config) -> Result<Self, reqwest::Error> {
        // The default reqwest client has no overall timeout; a stalled
        // Google endpoint would hang its handler task forever.
        let http = Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .timeout(Duration::from_secs(20))
            .build()?;

        let token = match config.gcp_access_token.as_deref().map(str::trim) {
            Some(t) if !t.is_empty() => TokenSource::Static(t.to_string()),
            _ => TokenSource::Metadata(config.metadata_api_base.trim_end_matches('/').to_string()),
        };

        Ok(Self {
            http,
            storage_base: config.storage_api_base.trim_end_matches('/').to_string(),
            compute_base: config.compute_api_base.trim_end_matches('/').to_string(),
            token,
            bucket_list_timeout: BUCKET_LIST_TIMEOUT,
        })
    }

    /// Fetch every bucket page; the caller bounds the whole loop.
    async fn list_bucket_pages(&self, project: &str, url: &str) -> Result<Vec<String>, GcpError> {
        let mut buckets = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let bearer = self.token.bearer(&self.http).await?;
            let mut req = self
                .http
                .get(url)
                .bearer_auth(bearer)
                .query(&[("project", project)]);
            if let Some(token) = &page_token {
                req = req.query(&[("pageToken", token.as_str())]);
            }

            let resp = req.send().await.map_err(|source| GcpError::Transport {
                method: "GET",
                url: url.to_string(),
                source,
            })?;
            let resp = Self::check("GET", url, resp).await?;
            let page: BucketPage = Self::decode(url, resp).await?;

            buckets.extend(page.items.into_iter().map(|b| b.name));
            match page.next_page_token {
                Some(token) if !token.is_empty() => page_token = Some(token),
                _ => break,
            }
        }

        Ok(buckets)
    }

    fn group_url(&self, project: &str, region: &str, group: &str) -> String {
        format!(
            "{}/compute/v1/projects/{project}/regions/{region}/instanceGroupManagers/{group}",
            self.compute_base
        )
    }

    /// Turn a non-2xx response into an error carrying the body verbatim.
    async fn check(method: &'static str, url: &str, resp: Response) -> Result<Response, GcpError> {
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            tracing::error!("{} {} returned HTTP {}: {}", method, url, status, body);
            return Err(GcpError::Api {
                method,
                url: url.to_string(),
                status: status.as_u16(),
                body,
            });
        }
        Ok(resp)
    }

    async fn decode<T: DeserializeOwned>(url: &str, resp: Response) -> Result<T, GcpError> {
        resp.json().await.map_err(|source| GcpError::Decode {
            url: url.to_string(),
            source,
        })
    }
}

/// One page of a Storage bucket listing.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BucketPage {
    #[serde(default)]
    items: Vec<BucketResource>,
    #[serde(default)]
    next_page_token: Option<String>,
}

/// Only the bucket name is of interest.
#[derive(Debug, Deserialize)]
struct BucketResource {
    name: String,
}

/// One page of a Compute instance template listing.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TemplatePage {
    #[serde(default)]
    items: Vec<InstanceTemplate>,
    #[serde(default)]
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ManagedInstancesResponse {
    #[serde(default)]
    managed_instances: Vec<ManagedInstance>,
}

#[async_trait]
impl GcpApi for GcpClient {
    async fn list_buckets(&self, project: &str) -> Result<Vec<String>, GcpError> {
        let url = format!("{}/storage/v1/b", self.storage_base);

        // One bound over the whole listing, however many pages it takes.
        let buckets = tokio::time::timeout(
            self.bucket_list_timeout,
            self.list_bucket_pages(project, &url),
        )
        .await
        .map_err(|_| GcpError::Timeout {
            what: "bucket listing",
            after: self.bucket_list_timeout,
        })??;

        tracing::debug!("listed {} buckets in project {}", buckets.len(), project);
        Ok(buckets)
    }

    async fn get_instance_group(
        &self,
        project: &str,
        region: &str,
        group: &str,
    ) -> Result<InstanceGroupManager, GcpError> {
        let url = self.group_url(project, region, group);
        let bearer = self.token.bearer(&self.http).await?;

        let resp = self
            .http
            .get(&url)
            .bearer_auth(bearer)
            .send()
            .await
            .map_err(|source| GcpError::Transport {
                method: "GET",
                url: url.clone(),
                source,
            })?;
        let resp = Self::check("GET", &url, resp).await?;
        Self::decode(&url, resp).await
    }

    async fn list_managed_instances(
        &self,
        project: &str,
        region: &str,
        group: &str,
    ) -> Result<Vec<ManagedInstance>, GcpError> {
        let url = format!(
            "{}/listManagedInstances",
            self.group_url(project, region, group)
        );
        let bearer = self.token.bearer(&self.http).await?;

        let resp = self
            .http
            .post(&url)
            .bearer_auth(bearer)
            .send()
            .await
            .map_err(|source| GcpError::Transport {
                method: "POST",
                url: url.clone(),
                source,
            })?;
        let resp = Self::check("POST", &url, resp).await?;
        let body: ManagedInstancesResponse = Self::decode(&url, resp).await?;
        Ok(body.managed_instances)
    }

    async fn list_instance_templates(
        &self,
        project: &str,
    ) -> Result<Vec<InstanceTemplate>, GcpError> {
        let url = format!(
            "{}/compute/v1/projects/{project}/global/instanceTemplates",
            self.compute_base
        );
        let mut templates = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let bearer = self.token.bearer(&self.http).await?;
            let mut req = self.http.get(&url).bearer_auth(bearer);
            if let Some(token) = &page_token {
                req = req.query(&[("pageToken", token.as_str())]);
            }

            let resp = req.send().await.map_err(|source| GcpError::Transport {
                method: "GET",
                url: url.clone(),
                source,
            })?;
            let resp = Self::check("GET", &url, resp).await?;
            let page: TemplatePage = Self::decode(&url, resp).await?;

            templates.extend(page.items);
            match page.next_page_token {
                Some(token) if !token.is_empty() => page_token = Some(token),
                _ => break,
            }
        }

        Ok(templates)
    }

    async fn patch_instance_group(
        &self,
        project: &str,
        region: &str,
        group: &str,
        patch: &InstanceGroupManagerPatch,
    ) -> Result<(), GcpError> {
        let url = self.group_url(project, region, group);
        let bearer = self.token.bearer(&self.http).await?;

        tracing::info!(
            "patching instance group {}/{}/{}: {:?}",
            project,
            region,
            group,
            patch
        );

        let resp = self
            .http
            .patch(&url)
            .bearer_auth(bearer)
            .json(patch)
            .send()
            .await
            .map_err(|source| GcpError::Transport {
                method: "PATCH",
                url: url.clone(),
                source,
            })?;

        // The PATCH returns a long-running operation; the demo does not
        // wait for it, success of the submission is enough.
        Self::check("PATCH", &url, resp).await?;
        Ok(())
    }
}
