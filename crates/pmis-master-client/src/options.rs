//! Typed endpoints for fetching level options.
//!
//! ## API Paths
//!
//! | Method | Path | Operation |
//! |--------|------|-----------|
//! | GET    | `/{collection}/` | Root-level options |
//! | GET    | `/{parentCollection}/{parentId}/{childCollection}/` | Children of a parent (preferred) |
//! | GET    | `/{childCollection}/?{parentField}={parentId}` | Flat listing, caller-filtered fallback |
//!
//! The nested path is authoritative but not uniformly deployed; when it
//! fails (transport error or non-2xx), the flat listing is fetched and
//! filtered client-side by parent reference and Active status. Only when
//! both paths fail does an error reach the caller.

use async_trait::async_trait;
use pmis_core::{LevelDef, OptionItem};
use serde_json::Value;

use crate::decode;
use crate::error::MasterDataError;
use crate::source::OptionSource;
use crate::MasterDataClient;

impl MasterDataClient {
    /// Fetch the options of a root level.
    ///
    /// Calls `GET {base_url}/{collection}/`.
    pub async fn list_root(&self, level: &LevelDef) -> Result<Vec<OptionItem>, MasterDataError> {
        let endpoint = format!("GET /{}/", level.collection);
        let url = format!("{}{}/", self.base_url, level.collection);
        let body = self.get_json(&url, &endpoint).await?;
        Ok(decode::decode_options(&endpoint, body))
    }

    /// Fetch the options of `child` under `parent_id`, preferring the
    /// nested endpoint and falling back to the client-filtered flat
    /// listing when it fails.
    ///
    /// Calls `GET {base_url}/{parent.collection}/{parent_id}/{child.collection}/`,
    /// then on failure `GET {base_url}/{child.collection}/?{parent_field}={parent_id}`.
    pub async fn list_children(
        &self,
        parent: &LevelDef,
        parent_id: &str,
        child: &LevelDef,
    ) -> Result<Vec<OptionItem>, MasterDataError> {
        let endpoint = format!(
            "GET /{}/{}/{}/",
            parent.collection, parent_id, child.collection
        );
        let url = format!(
            "{}{}/{}/{}/",
            self.base_url, parent.collection, parent_id, child.collection
        );

        let primary_err = match self.get_json(&url, &endpoint).await {
            Ok(body) => return Ok(decode::decode_options(&endpoint, body)),
            Err(e) => e,
        };

        // A level without a parent filter field cannot use the flat path.
        // The schema guarantees child levels carry one; this branch only
        // protects against hand-built LevelDefs.
        let Some(field) = child.parent_field.as_deref() else {
            return Err(primary_err);
        };

        tracing::warn!(
            endpoint,
            "primary child endpoint failed, trying flat fallback: {primary_err}"
        );

        let fb_endpoint = format!("GET /{}/?{}={}", child.collection, field, parent_id);
        let fb_url = format!(
            "{}{}/?{}={}",
            self.base_url, child.collection, field, parent_id
        );
        let body = self.get_json(&fb_url, &fb_endpoint).await?;
        Ok(decode::decode_filtered(
            &fb_endpoint,
            body,
            Some((field, parent_id)),
        ))
    }

    /// Send a GET and decode the body as JSON, with consistent error mapping.
    async fn get_json(&self, url: &str, endpoint: &str) -> Result<Value, MasterDataError> {
        let resp = self
            .retry
            .run(|| self.http.get(url).send())
            .await
            .map_err(|e| MasterDataError::Http {
                endpoint: endpoint.to_string(),
                source: e,
            })?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(MasterDataError::Api {
                endpoint: endpoint.to_string(),
                status,
                body,
            });
        }

        resp.json().await.map_err(|e| MasterDataError::Decode {
            endpoint: endpoint.to_string(),
            reason: e.to_string(),
        })
    }
}

#[async_trait]
impl OptionSource for MasterDataClient {
    async fn root_options(&self, level: &LevelDef) -> Result<Vec<OptionItem>, MasterDataError> {
        self.list_root(level).await
    }

    async fn child_options(
        &self,
        parent: &LevelDef,
        parent_id: &str,
        child: &LevelDef,
    ) -> Result<Vec<OptionItem>, MasterDataError> {
        self.list_children(parent, parent_id, child).await
    }

    fn source_name(&self) -> &str {
        "MasterDataClient"
    }
}
