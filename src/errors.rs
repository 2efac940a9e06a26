use thiserror::Error;

use crate::constants::sampler::HOMOGENEOUS_RELATION_LABEL;
use crate::types::{RelationId, StrategyName};

/// Error type for negative-sampling configuration and batch contract failures.
#[derive(Debug, Error)]
pub enum SamplerError {
    #[error("minibatch is missing required field '{field}'")]
    MissingField { field: &'static str },
    #[error("negative generator '{strategy}' does not implement generate_negatives")]
    NotImplemented { strategy: StrategyName },
    #[error("unsupported output format '{0}'")]
    UnsupportedFormat(String),
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error("shape mismatch for {}: {details}", relation_label(.relation))]
    ShapeMismatch {
        relation: Option<RelationId>,
        details: String,
    },
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
}

impl SamplerError {
    pub(crate) fn shape(relation: Option<&str>, details: impl Into<String>) -> Self {
        Self::ShapeMismatch {
            relation: relation.map(str::to_string),
            details: details.into(),
        }
    }
}

fn relation_label(relation: &Option<RelationId>) -> &str {
    relation
        .as_deref()
        .unwrap_or(HOMOGENEOUS_RELATION_LABEL)
}
