#![deny(unsafe_code)]

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("term entry {index} is malformed: {message}")]
    MalformedTerm { index: usize, message: String },

    #[error("typo mapping {index} is malformed: {message}")]
    MalformedTypo { index: usize, message: String },

    #[error("terminology synonym {index} is malformed: {message}")]
    MalformedSynonym { index: usize, message: String },

    #[error("content rule {index} is malformed: {message}")]
    MalformedRule { index: usize, message: String },

    #[error("failed to parse knowledge source JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl CatalogError {
    pub(crate) fn malformed_term(index: usize, message: impl Into<String>) -> Self {
        Self::MalformedTerm {
            index,
            message: message.into(),
        }
    }

    pub(crate) fn malformed_rule(index: usize, message: impl Into<String>) -> Self {
        Self::MalformedRule {
            index,
            message: message.into(),
        }
    }
}
