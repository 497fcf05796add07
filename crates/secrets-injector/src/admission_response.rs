use crate::errors::ResponseError;

use base64::{Engine as _, engine::general_purpose};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// This models the admission/v1/AdmissionResponse object of Kubernetes
/// See https://pkg.go.dev/k8s.io/kubernetes/pkg/apis/admission#AdmissionResponse
#[derive(Serialize, Deserialize, Debug, Default, PartialEq, Eq, Clone)]
#[serde(rename_all = "camelCase")]
pub struct AdmissionResponse {
    /// UID is an identifier for the individual request/response.
    /// This must be copied over from the corresponding AdmissionRequest.
    pub uid: String,

    /// Allowed indicates whether or not the admission request was permitted.
    pub allowed: bool,

    /// The type of Patch. Currently we only allow "JSONPatch".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patch_type: Option<PatchType>,

    /// The patch body, base64 encoded. Currently we only support "JSONPatch" which
    /// implements RFC 6902.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patch: Option<String>,

    /// Status contains extra details about the outcome of the request.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<AdmissionResponseStatus>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub audit_annotations: Option<HashMap<String, String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub warnings: Option<Vec<String>>,
}

/// PatchType is the type of patch being used to represent the mutated object
#[derive(Serialize, Deserialize, Debug, Default, PartialEq, Eq, Clone)]
pub enum PatchType {
    #[serde(rename = "JSONPatch")]
    #[default]
    JSONPatch,
}

#[derive(Serialize, Deserialize, Debug, Default, PartialEq, Eq, Clone)]
pub struct AdmissionResponseStatus {
    /// A human-readable description of the status of this operation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    /// Suggested HTTP return code for this status
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<u16>,
}

impl AdmissionResponse {
    /// Let the object through untouched. A non empty `reason` is reported
    /// inside of the status message.
    pub fn allowed(uid: String, reason: &str) -> AdmissionResponse {
        AdmissionResponse {
            uid,
            allowed: true,
            status: Some(AdmissionResponseStatus {
                message: (!reason.is_empty()).then(|| reason.to_owned()),
                code: Some(200),
            }),
            ..Default::default()
        }
    }

    /// The request could not be processed. `code` is the HTTP status
    /// describing the failure (400 for malformed input, 500 for internal errors).
    pub fn errored(uid: String, code: u16, message: String) -> AdmissionResponse {
        AdmissionResponse {
            uid,
            allowed: false,
            status: Some(AdmissionResponseStatus {
                message: Some(message),
                code: Some(code),
            }),
            ..Default::default()
        }
    }

    /// Build an allowed response carrying the JSON patch that turns the
    /// `original` document into the `current` one.
    pub fn patch_from_raw(
        uid: String,
        original: &[u8],
        current: &[u8],
    ) -> Result<AdmissionResponse, ResponseError> {
        let original: serde_json::Value =
            serde_json::from_slice(original).map_err(ResponseError::Deserialize)?;
        let current: serde_json::Value =
            serde_json::from_slice(current).map_err(ResponseError::Deserialize)?;

        let diff = json_patch::diff(&original, &current);
        if diff.0.is_empty() {
            return Ok(AdmissionResponse {
                uid,
                allowed: true,
                ..Default::default()
            });
        }

        let patch = serde_json::to_string(&diff)
            .map(|s| general_purpose::STANDARD.encode(s))
            .map_err(ResponseError::Serialize)?;

        Ok(AdmissionResponse {
            uid,
            allowed: true,
            patch_type: Some(PatchType::JSONPatch),
            patch: Some(patch),
            ..Default::default()
        })
    }

    /// Decode the base64 patch, if any
    pub fn json_patch(&self) -> Option<Result<json_patch::Patch, ResponseError>> {
        self.patch.as_ref().map(|patch| {
            let raw = general_purpose::STANDARD.decode(patch).map_err(|e| {
                ResponseError::Deserialize(serde::de::Error::custom(e.to_string()))
            })?;
            serde_json::from_slice(&raw).map_err(ResponseError::Deserialize)
        })
    }
}
