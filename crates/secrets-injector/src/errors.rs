use thiserror::Error;

#[derive(Debug, Error)]
pub enum InjectionError {
    #[error("admission request does not carry an object")]
    MissingObject,

    #[error("cannot decode pod: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("cannot encode mutated pod: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("cannot compute patch: {0}")]
    Patch(#[from] ResponseError),
}

impl InjectionError {
    /// HTTP status code reported back to the API server
    pub fn code(&self) -> u16 {
        match self {
            InjectionError::MissingObject | InjectionError::Decode(_) => 400,
            InjectionError::Encode(_) | InjectionError::Patch(_) => 500,
        }
    }
}

#[derive(Debug, Error)]
pub enum ResponseError {
    #[error("cannot deserialize JSON document: {0}")]
    Deserialize(#[source] serde_json::Error),

    #[error("cannot serialize JSON patch: {0}")]
    Serialize(#[source] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("cannot read injection profile {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot parse injection profile: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("invalid injection profile: {0}")]
    Invalid(String),
}
