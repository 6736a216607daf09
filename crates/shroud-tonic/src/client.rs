use crate::error::TonicError;
use crate::wire::{
    GenerateDataRequest, PrivacyAnalysis, PrivacySetRequest, UpdateReplacementsRequest,
    WorkspaceTablesResponse, acknowledgement,
};
use async_trait::async_trait;
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue};
use reqwest::{Method, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use shroud_core::{Generator, PlanTarget, PlatformConfig, Replacement, WorkspaceTable};
use shroud_runtime::{CatalogSource, GenerationAck, MaskingPlatform};
use std::collections::BTreeMap;
use std::time::Duration;

/// REST client for one anonymization workspace.
///
/// Built from an explicit [`PlatformConfig`]; credentials are resolved once at
/// construction and sent as `Authorization: ApiKey <key>` on every request.
pub struct TonicClient {
    client: reqwest::Client,
    base_url: Url,
    api_version: String,
    workspace_id: String,
    is_scaled: bool,
}

impl TonicClient {
    pub fn new(config: &PlatformConfig) -> Result<Self, TonicError> {
        let workspace_id = config.resolve_workspace_id()?;
        let api_key = config.resolve_api_key()?;

        let mut auth = HeaderValue::from_str(&format!("ApiKey {api_key}"))?;
        auth.set_sensitive(true);
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(AUTHORIZATION, auth);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        let base_url = Url::parse(config.base_url()).map_err(|e| TonicError::InvalidUrl {
            url: config.base_url.clone(),
            reason: e.to_string(),
        })?;
        if base_url.cannot_be_a_base() {
            return Err(TonicError::InvalidUrl {
                url: config.base_url.clone(),
                reason: "not a base URL".to_string(),
            });
        }

        Ok(Self {
            client,
            base_url,
            api_version: config.api_version.clone(),
            workspace_id,
            is_scaled: config.is_scaled,
        })
    }

    pub fn workspace_id(&self) -> &str {
        &self.workspace_id
    }

    /// Build `{base}/api/{segments...}`; segments are percent-encoded.
    pub fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        // cannot_be_a_base was rejected in new()
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().push("api").extend(segments);
        }
        url
    }

    fn versioned(&self, segments: &[&str]) -> Url {
        let mut url = self.endpoint(segments);
        url.query_pairs_mut().append_pair("api-version", &self.api_version);
        url
    }

    /// `GET /api/table?workspaceId=...`
    pub async fn workspace_tables(&self) -> Result<Vec<WorkspaceTable>, TonicError> {
        let mut url = self.endpoint(&["table"]);
        url.query_pairs_mut().append_pair("workspaceId", &self.workspace_id);
        let response: WorkspaceTablesResponse = self.send_json(Method::GET, url, |r| r).await?;
        Ok(response.tables)
    }

    /// `GET /api/GeneratorMetadata`
    pub async fn generators(&self) -> Result<Vec<Generator>, TonicError> {
        let url = self.versioned(&["GeneratorMetadata"]);
        self.send_json(Method::GET, url, |r| r).await
    }

    /// `GET /api/Workspace/{id}/replacements/{schema}/{table}`
    pub async fn table_replacements(&self, target: &PlanTarget) -> Result<serde_json::Value, TonicError> {
        let url = self.versioned(&[
            "Workspace",
            &self.workspace_id,
            "replacements",
            &target.schema,
            &target.table,
        ]);
        self.send_json(Method::GET, url, |r| r).await
    }

    /// `GET /api/Privacy/analysis?workspaceId=...`
    pub async fn privacy_analysis(&self) -> Result<PrivacyAnalysis, TonicError> {
        let mut url = self.versioned(&["Privacy", "analysis"]);
        url.query_pairs_mut().append_pair("workspaceId", &self.workspace_id);
        self.send_json(Method::GET, url, |r| r).await
    }

    /// `POST /api/Privacy/set`
    pub async fn set_sensitive_columns(&self, target: &PlanTarget, columns: &[String]) -> Result<(), TonicError> {
        let url = self.versioned(&["Privacy", "set"]);
        let body = PrivacySetRequest::new(&self.workspace_id, target, columns);
        self.send(Method::POST, url, |r| r.json(&body)).await?;
        Ok(())
    }

    /// `PUT /api/Workspace/{id}/update_replacements/{schema}/{table}`
    pub async fn update_replacements(
        &self,
        target: &PlanTarget,
        replacements: &BTreeMap<String, Replacement>,
    ) -> Result<(), TonicError> {
        let url = self.versioned(&[
            "Workspace",
            &self.workspace_id,
            "update_replacements",
            &target.schema,
            &target.table,
        ]);
        let body = UpdateReplacementsRequest { replacements };
        self.send(Method::PUT, url, |r| r.json(&body)).await?;
        Ok(())
    }

    /// `POST /api/generateddata`
    pub async fn generate_data(
        &self,
        replacements: &BTreeMap<String, Replacement>,
        dirty_columns: &[String],
    ) -> Result<serde_json::Value, TonicError> {
        let url = self.endpoint(&["generateddata"]);
        let body = GenerateDataRequest::new(&self.workspace_id, self.is_scaled, replacements, dirty_columns);
        let text = self.send(Method::POST, url, |r| r.json(&body)).await?;
        Ok(acknowledgement(&text))
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        method: Method,
        url: Url,
        build: impl FnOnce(RequestBuilder) -> RequestBuilder,
    ) -> Result<T, TonicError> {
        let text = self.send(method, url.clone(), build).await?;
        serde_json::from_str(&text).map_err(|source| TonicError::Decode {
            url: url.to_string(),
            source,
        })
    }

    async fn send(
        &self,
        method: Method,
        url: Url,
        build: impl FnOnce(RequestBuilder) -> RequestBuilder,
    ) -> Result<String, TonicError> {
        tracing::debug!(method = %method, url = %url, "Platform request");
        let response = build(self.client.request(method.clone(), url.clone()))
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            tracing::warn!(method = %method, url = %url, status = %status, "Platform request failed");
            return Err(TonicError::Status {
                method: method.to_string(),
                url: url.to_string(),
                status: status.as_u16(),
                body,
            });
        }
        Ok(body)
    }
}

#[async_trait]
impl CatalogSource for TonicClient {
    async fn fetch_workspace_tables(&self) -> anyhow::Result<Vec<WorkspaceTable>> {
        Ok(self.workspace_tables().await?)
    }

    async fn fetch_generators(&self) -> anyhow::Result<Vec<Generator>> {
        Ok(self.generators().await?)
    }
}

#[async_trait]
impl MaskingPlatform for TonicClient {
    async fn mark_sensitive_columns(&self, target: &PlanTarget, columns: &[String]) -> anyhow::Result<()> {
        Ok(self.set_sensitive_columns(target, columns).await?)
    }

    async fn upsert_replacements(
        &self,
        target: &PlanTarget,
        replacements: &BTreeMap<String, Replacement>,
    ) -> anyhow::Result<()> {
        Ok(self.update_replacements(target, replacements).await?)
    }

    async fn trigger_generation(
        &self,
        replacements: &BTreeMap<String, Replacement>,
        dirty_columns: &[String],
    ) -> anyhow::Result<GenerationAck> {
        Ok(GenerationAck(self.generate_data(replacements, dirty_columns).await?))
    }
}
