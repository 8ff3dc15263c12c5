use crate::document::DocRef;

#[derive(Debug, thiserror::Error)]
pub enum BoxError {
    #[error("document not found: {0}")]
    Lookup(String),
    #[error("principal not found: {0}")]
    Principal(String),
    #[error("invalid property {key} on document {doc}: {message}")]
    Property {
        doc: DocRef,
        key: &'static str,
        message: String,
    },
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("failed to move document {doc} to {target}: {reason}")]
    Move {
        doc: DocRef,
        target: DocRef,
        reason: String,
    },
    #[error("failed to update tags on document {doc}: {reason}")]
    Tag { doc: DocRef, reason: String },
    #[error("failed to serialize box object: {0}")]
    Serialization(String),
    #[error("failed to deserialize box object: {0}")]
    Deserialization(serde_json::Error),

    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("failed to read repository seed: {0}")]
    SeedRead(std::io::Error),
    #[error("failed to parse repository seed: {0}")]
    SeedParse(serde_yaml::Error),
}

impl BoxError {
    pub(crate) fn property(doc: &DocRef, key: &'static str, message: impl Into<String>) -> Self {
        BoxError::Property {
            doc: doc.clone(),
            key,
            message: message.into(),
        }
    }

    pub(crate) fn moving(doc: &DocRef, target: &DocRef, reason: impl Into<String>) -> Self {
        BoxError::Move {
            doc: doc.clone(),
            target: target.clone(),
            reason: reason.into(),
        }
    }
}

pub type BoxResult<T> = std::result::Result<T, BoxError>;
