//! Programmable in-memory option source for tests and development.
//!
//! [`MockOptionSource`] answers cascade fetches from a scripted table
//! keyed by `(level key, parent id)`, records every call for assertion,
//! and can gate individual responses on a [`tokio::sync::Semaphore`] so
//! tests can force out-of-order resolution and exercise the controller's
//! stale-response guard.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use pmis_core::{LevelDef, OptionItem};
use tokio::sync::Semaphore;

use crate::error::MasterDataError;
use crate::source::OptionSource;

/// One recorded fetch: the child level key and the parent id it was
/// scoped to (`None` for root fetches).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedFetch {
    /// Key of the level whose options were requested.
    pub level_key: String,
    /// Parent id the request was scoped to, if any.
    pub parent_id: Option<String>,
}

#[derive(Clone)]
enum Scripted {
    Options(Vec<OptionItem>),
    Failure(String),
}

#[derive(Default)]
struct Inner {
    responses: HashMap<(String, Option<String>), Scripted>,
    gates: HashMap<(String, Option<String>), Arc<Semaphore>>,
    calls: Vec<RecordedFetch>,
}

/// Scripted option source. Unscripted fetches resolve to an empty list,
/// which is a valid response per the [`OptionSource`] contract.
#[derive(Default)]
pub struct MockOptionSource {
    inner: Mutex<Inner>,
}

impl MockOptionSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script the options returned for `(level_key, parent_id)`.
    pub fn respond(
        &self,
        level_key: impl Into<String>,
        parent_id: Option<&str>,
        options: Vec<OptionItem>,
    ) {
        self.inner.lock().responses.insert(
            (level_key.into(), parent_id.map(str::to_string)),
            Scripted::Options(options),
        );
    }

    /// Script a failure for `(level_key, parent_id)`.
    pub fn fail(&self, level_key: impl Into<String>, parent_id: Option<&str>, reason: &str) {
        self.inner.lock().responses.insert(
            (level_key.into(), parent_id.map(str::to_string)),
            Scripted::Failure(reason.to_string()),
        );
    }

    /// Gate the response for `(level_key, parent_id)` on a semaphore. The
    /// fetch will not resolve until the test adds a permit, letting tests
    /// hold one response open while another completes.
    pub fn gate(
        &self,
        level_key: impl Into<String>,
        parent_id: Option<&str>,
    ) -> Arc<Semaphore> {
        let gate = Arc::new(Semaphore::new(0));
        self.inner.lock().gates.insert(
            (level_key.into(), parent_id.map(str::to_string)),
            gate.clone(),
        );
        gate
    }

    /// Every fetch seen so far, in call order.
    pub fn calls(&self) -> Vec<RecordedFetch> {
        self.inner.lock().calls.clone()
    }

    /// Number of fetches issued for a level, across all parents.
    pub fn fetch_count(&self, level_key: &str) -> usize {
        self.inner
            .lock()
            .calls
            .iter()
            .filter(|c| c.level_key == level_key)
            .count()
    }

    async fn resolve(
        &self,
        level_key: &str,
        parent_id: Option<&str>,
    ) -> Result<Vec<OptionItem>, MasterDataError> {
        let key = (level_key.to_string(), parent_id.map(str::to_string));
        let (scripted, gate) = {
            let mut inner = self.inner.lock();
            inner.calls.push(RecordedFetch {
                level_key: key.0.clone(),
                parent_id: key.1.clone(),
            });
            (inner.responses.get(&key).cloned(), inner.gates.get(&key).cloned())
        };

        // The lock is released before the gate is awaited so a held gate
        // never blocks other fetches from being scripted or recorded.
        if let Some(gate) = gate {
            let permit = gate.acquire().await;
            drop(permit);
        }

        match scripted {
            Some(Scripted::Options(options)) => Ok(options),
            Some(Scripted::Failure(reason)) => Err(MasterDataError::Api {
                endpoint: format!("mock {level_key}"),
                status: 500,
                body: reason,
            }),
            None => Ok(Vec::new()),
        }
    }
}

#[async_trait]
impl OptionSource for MockOptionSource {
    async fn root_options(&self, level: &LevelDef) -> Result<Vec<OptionItem>, MasterDataError> {
        self.resolve(&level.key, None).await
    }

    async fn child_options(
        &self,
        _parent: &LevelDef,
        parent_id: &str,
        child: &LevelDef,
    ) -> Result<Vec<OptionItem>, MasterDataError> {
        self.resolve(&child.key, Some(parent_id)).await
    }

    fn source_name(&self) -> &str {
        "MockOptionSource"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pmis_core::HierarchySchema;

    fn item(id: &str, name: &str) -> OptionItem {
        OptionItem {
            id: id.into(),
            code: id.into(),
            name: name.into(),
            status: pmis_core::OptionStatus::Active,
        }
    }

    #[tokio::test]
    async fn scripted_root_and_child_responses() {
        let schema = HierarchySchema::engineering();
        let source = MockOptionSource::new();
        source.respond("zone", None, vec![item("Z1", "North")]);
        source.respond("circle", Some("Z1"), vec![item("C1", "Civil")]);

        let zones = source.root_options(schema.level(0).unwrap()).await.unwrap();
        assert_eq!(zones.len(), 1);

        let circles = source
            .child_options(schema.level(0).unwrap(), "Z1", schema.level(1).unwrap())
            .await
            .unwrap();
        assert_eq!(circles[0].id, "C1");
    }

    #[tokio::test]
    async fn unscripted_fetch_is_empty_not_error() {
        let schema = HierarchySchema::geography();
        let source = MockOptionSource::new();
        let options = source.root_options(schema.level(0).unwrap()).await.unwrap();
        assert!(options.is_empty());
    }

    #[tokio::test]
    async fn scripted_failure_is_an_error() {
        let schema = HierarchySchema::engineering();
        let source = MockOptionSource::new();
        source.fail("zone", None, "backend down");
        let result = source.root_options(schema.level(0).unwrap()).await;
        assert!(matches!(result, Err(MasterDataError::Api { status: 500, .. })));
    }

    #[tokio::test]
    async fn calls_are_recorded_in_order() {
        let schema = HierarchySchema::engineering();
        let source = MockOptionSource::new();
        source.root_options(schema.level(0).unwrap()).await.unwrap();
        source
            .child_options(schema.level(0).unwrap(), "Z1", schema.level(1).unwrap())
            .await
            .unwrap();

        let calls = source.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].level_key, "zone");
        assert_eq!(calls[0].parent_id, None);
        assert_eq!(calls[1].level_key, "circle");
        assert_eq!(calls[1].parent_id.as_deref(), Some("Z1"));
        assert_eq!(source.fetch_count("circle"), 1);
    }

    #[tokio::test]
    async fn gated_response_waits_for_permit() {
        let schema = HierarchySchema::engineering();
        let source = Arc::new(MockOptionSource::new());
        source.respond("zone", None, vec![item("Z1", "North")]);
        let gate = source.gate("zone", None);

        let task = {
            let source = source.clone();
            let level = schema.level(0).unwrap().clone();
            tokio::spawn(async move { source.root_options(&level).await })
        };

        assert!(!task.is_finished());
        gate.add_permits(1);
        let options = task.await.expect("join").expect("fetch");
        assert_eq!(options[0].id, "Z1");
    }
}
