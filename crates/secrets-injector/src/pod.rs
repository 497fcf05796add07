//! Minimal view over a `v1/Pod`.
//!
//! Only the fields touched by the injection are typed: annotations, init
//! containers and volumes. Everything else is captured as raw JSON and written
//! back untouched, so a decode/encode cycle never drops data the API server
//! sent us.

use k8s_openapi::api::core::v1::{Container, Volume};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PodObject {
    #[serde(default)]
    pub metadata: PodMetadata,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spec: Option<PodSpec>,

    #[serde(flatten)]
    pub other: Map<String, Value>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PodMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generate_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annotations: Option<BTreeMap<String, String>>,

    #[serde(flatten)]
    pub other: Map<String, Value>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PodSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub init_containers: Option<Vec<Container>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volumes: Option<Vec<Volume>>,

    #[serde(flatten)]
    pub other: Map<String, Value>,
}

impl PodObject {
    pub fn from_slice(raw: &[u8]) -> serde_json::Result<PodObject> {
        serde_json::from_slice(raw)
    }

    pub fn annotation(&self, key: &str) -> Option<&str> {
        self.metadata
            .annotations
            .as_ref()
            .and_then(|annotations| annotations.get(key))
            .map(String::as_str)
    }

    /// Name used to correlate log entries. Pods created by controllers often
    /// have only a `generateName` at admission time.
    pub fn display_name(&self) -> &str {
        self.metadata
            .name
            .as_deref()
            .or(self.metadata.generate_name.as_deref())
            .unwrap_or_default()
    }

    pub fn init_containers(&self) -> &[Container] {
        self.spec
            .as_ref()
            .and_then(|spec| spec.init_containers.as_deref())
            .unwrap_or_default()
    }

    pub fn volumes(&self) -> &[Volume] {
        self.spec
            .as_ref()
            .and_then(|spec| spec.volumes.as_deref())
            .unwrap_or_default()
    }

    /// Appends the container at the end of the init containers. Existing
    /// entries are never replaced, even when they share the same name.
    pub fn push_init_container(&mut self, container: Container) {
        self.spec
            .get_or_insert_with(PodSpec::default)
            .init_containers
            .get_or_insert_with(Vec::new)
            .push(container);
    }

    pub fn push_volume(&mut self, volume: Volume) {
        self.spec
            .get_or_insert_with(PodSpec::default)
            .volumes
            .get_or_insert_with(Vec::new)
            .push(volume);
    }
}
