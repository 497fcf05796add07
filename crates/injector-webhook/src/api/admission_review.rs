use secrets_injector::admission_request::AdmissionRequest;
use secrets_injector::admission_response::AdmissionResponse;
use secrets_injector::constants::ADMISSION_REVIEW_V1;

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdmissionReviewRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_version: Option<String>,

    pub request: AdmissionRequest,
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdmissionReviewResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_version: Option<String>,

    pub response: AdmissionResponse,
}

impl AdmissionReviewResponse {
    /// Wrap the response using the same `apiVersion` as the incoming review:
    /// the API server expects it back unchanged (`v1` or `v1beta1`).
    pub fn new(api_version: Option<&str>, response: AdmissionResponse) -> Self {
        AdmissionReviewResponse {
            api_version: Some(api_version.unwrap_or(ADMISSION_REVIEW_V1).to_owned()),
            kind: Some(String::from("AdmissionReview")),
            response,
        }
    }
}
