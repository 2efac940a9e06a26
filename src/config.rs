use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::NonZeroUsize;
use std::str::FromStr;

use crate::constants::formats::{
    TAG_CONDITIONED, TAG_HEAD_CONDITIONED, TAG_INDEPENDENT, TAG_TAIL_CONDITIONED,
};
use crate::constants::sampler::DEFAULT_NEGATIVE_RATIO;
use crate::errors::SamplerError;

/// Number of negative edges generated per positive edge.
///
/// Always positive; zero is rejected when the ratio is constructed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "usize", into = "usize")]
pub struct NegativeRatio(NonZeroUsize);

impl NegativeRatio {
    /// Validate a raw ratio.
    pub fn new(ratio: usize) -> Result<Self, SamplerError> {
        NonZeroUsize::new(ratio).map(Self).ok_or_else(|| {
            SamplerError::Configuration(format!(
                "negative_ratio should be a positive integer, got {ratio}"
            ))
        })
    }

    pub fn get(self) -> usize {
        self.0.get()
    }

    /// Negatives required for `positives` edges.
    pub fn negatives_for(self, positives: usize) -> Option<usize> {
        positives.checked_mul(self.get())
    }
}

impl TryFrom<usize> for NegativeRatio {
    type Error = SamplerError;

    fn try_from(ratio: usize) -> Result<Self, Self::Error> {
        Self::new(ratio)
    }
}

impl TryFrom<i64> for NegativeRatio {
    type Error = SamplerError;

    fn try_from(ratio: i64) -> Result<Self, Self::Error> {
        let ratio = usize::try_from(ratio).map_err(|_| {
            SamplerError::Configuration(format!(
                "negative_ratio should be a positive integer, got {ratio}"
            ))
        })?;
        Self::new(ratio)
    }
}

impl From<NegativeRatio> for usize {
    fn from(ratio: NegativeRatio) -> Self {
        ratio.get()
    }
}

impl fmt::Display for NegativeRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Layout of the minibatch emitted by the negative sampler.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    /// Positives and negatives concatenated into `node_pair`, told apart by `label`.
    #[default]
    Independent,
    /// Negative heads and tails each reshaped to `[positives, negative_ratio]`.
    Conditioned,
    /// Only negative heads, reshaped to `[positives, negative_ratio]`.
    HeadConditioned,
    /// Only negative tails, reshaped to `[positives, negative_ratio]`.
    TailConditioned,
}

impl OutputFormat {
    /// Every supported format, in declaration order.
    pub const ALL: [OutputFormat; 4] = [
        OutputFormat::Independent,
        OutputFormat::Conditioned,
        OutputFormat::HeadConditioned,
        OutputFormat::TailConditioned,
    ];

    /// Canonical lowercase tag.
    pub fn as_str(self) -> &'static str {
        match self {
            OutputFormat::Independent => TAG_INDEPENDENT,
            OutputFormat::Conditioned => TAG_CONDITIONED,
            OutputFormat::HeadConditioned => TAG_HEAD_CONDITIONED,
            OutputFormat::TailConditioned => TAG_TAIL_CONDITIONED,
        }
    }

    pub fn writes_label(self) -> bool {
        matches!(self, OutputFormat::Independent)
    }

    pub fn writes_head(self) -> bool {
        matches!(
            self,
            OutputFormat::Conditioned | OutputFormat::HeadConditioned
        )
    }

    pub fn writes_tail(self) -> bool {
        matches!(
            self,
            OutputFormat::Conditioned | OutputFormat::TailConditioned
        )
    }
}

impl FromStr for OutputFormat {
    type Err = SamplerError;

    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        let normalized = tag.trim().to_ascii_lowercase();
        OutputFormat::ALL
            .into_iter()
            .find(|format| format.as_str() == normalized)
            .ok_or_else(|| SamplerError::UnsupportedFormat(tag.to_string()))
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Construction-time settings for a negative sampling stage.
///
/// Both values are fixed for the lifetime of the sampler built from them.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NegativeSamplerConfig {
    /// Negatives generated per positive edge; must be positive.
    pub negative_ratio: usize,
    /// Layout of the emitted minibatch.
    pub output_format: OutputFormat,
}

impl Default for NegativeSamplerConfig {
    fn default() -> Self {
        Self {
            negative_ratio: DEFAULT_NEGATIVE_RATIO,
            output_format: OutputFormat::default(),
        }
    }
}

impl NegativeSamplerConfig {
    /// Parse a JSON config such as `{"negative_ratio": 4, "output_format": "conditioned"}`.
    ///
    /// Missing keys fall back to `Default`; the ratio is validated here too.
    pub fn from_json_str(json: &str) -> Result<Self, SamplerError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the raw ratio.
    pub fn validate(&self) -> Result<NegativeRatio, SamplerError> {
        NegativeRatio::new(self.negative_ratio)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ratio_rejects_zero_and_negative_values() {
        assert!(matches!(
            NegativeRatio::new(0),
            Err(SamplerError::Configuration(_))
        ));
        assert!(matches!(
            NegativeRatio::try_from(-3i64),
            Err(SamplerError::Configuration(_))
        ));
        assert!(matches!(
            NegativeRatio::try_from(0i64),
            Err(SamplerError::Configuration(_))
        ));
        let ratio = NegativeRatio::try_from(5i64).unwrap();
        assert_eq!(ratio.get(), 5);
        assert_eq!(ratio.negatives_for(3), Some(15));
        assert_eq!(ratio.to_string(), "5");
    }

    #[test]
    fn output_format_tags_roundtrip_through_from_str() {
        for format in OutputFormat::ALL {
            assert_eq!(format.as_str().parse::<OutputFormat>().unwrap(), format);
        }
        assert_eq!(
            " HEAD_CONDITIONED ".parse::<OutputFormat>().unwrap(),
            OutputFormat::HeadConditioned
        );
        match "edge_list".parse::<OutputFormat>() {
            Err(SamplerError::UnsupportedFormat(tag)) => assert_eq!(tag, "edge_list"),
            other => panic!("unexpected parse result: {other:?}"),
        }
    }

    #[test]
    fn output_format_field_flags_are_exclusive_per_format() {
        assert!(OutputFormat::Independent.writes_label());
        assert!(!OutputFormat::Independent.writes_head());
        assert!(!OutputFormat::Independent.writes_tail());
        assert!(OutputFormat::Conditioned.writes_head() && OutputFormat::Conditioned.writes_tail());
        assert!(!OutputFormat::HeadConditioned.writes_tail());
        assert!(!OutputFormat::TailConditioned.writes_head());
        for format in OutputFormat::ALL.into_iter().skip(1) {
            assert!(!format.writes_label());
        }
    }

    #[test]
    fn config_parses_json_with_defaults() {
        let config =
            NegativeSamplerConfig::from_json_str(r#"{"output_format": "tail_conditioned"}"#)
                .unwrap();
        assert_eq!(config.negative_ratio, DEFAULT_NEGATIVE_RATIO);
        assert_eq!(config.output_format, OutputFormat::TailConditioned);

        assert!(matches!(
            NegativeSamplerConfig::from_json_str(r#"{"negative_ratio": 0}"#),
            Err(SamplerError::Configuration(_))
        ));
        assert!(matches!(
            NegativeSamplerConfig::from_json_str(r#"{"output_format": "bogus"}"#),
            Err(SamplerError::Serialization(_))
        ));
    }

    #[test]
    fn negative_ratio_deserializes_with_validation() {
        let ratio: NegativeRatio = serde_json::from_str("3").unwrap();
        assert_eq!(ratio.get(), 3);
        assert!(serde_json::from_str::<NegativeRatio>("0").is_err());
    }
}
