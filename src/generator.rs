//! Negative generator interface.
//!
//! Ownership model:
//! - `NegativeGenerator` is the plug-in point for negative sampling strategies
//!   (uniform, degree-weighted, ...). Strategies own whatever graph context they
//!   need; the sampler only hands them positive pairs.
//! - `check_negatives` is the sampler-side guard that enforces the output
//!   contract before anything gets reshaped.

use std::sync::Arc;

use crate::config::NegativeRatio;
use crate::constants::sampler::UNNAMED_STRATEGY;
use crate::data::NodePairs;
use crate::errors::SamplerError;

/// Strategy that produces negative node pairs for a batch of positive pairs.
///
/// Output contract for `positives.len() == n` and `negative_ratio == k`:
/// - exactly `n * k` pairs, with `src` and `dst` of equal length;
/// - the `k` negatives for positive `i` occupy `[i * k, (i + 1) * k)`.
///
/// The sampler reshapes negatives into `[n, k]` rows assuming that block layout,
/// so strategies must not reorder across positives.
///
/// `generate_negatives` has no usable default: a strategy that does not
/// override it fails with `SamplerError::NotImplemented` on first use.
pub trait NegativeGenerator: Send + Sync {
    /// Strategy name used in logs and errors.
    fn name(&self) -> &str {
        UNNAMED_STRATEGY
    }

    /// Produce negatives for the positive pairs of one relation.
    ///
    /// `relation` is `None` for homogeneous graphs and the canonical edge type
    /// otherwise, so the strategy can pick the matching adjacency or degree data.
    fn generate_negatives(
        &self,
        positives: &NodePairs,
        relation: Option<&str>,
        negative_ratio: NegativeRatio,
    ) -> Result<NodePairs, SamplerError> {
        let _ = (positives, relation, negative_ratio);
        Err(SamplerError::NotImplemented {
            strategy: self.name().to_string(),
        })
    }
}

impl<G: NegativeGenerator + ?Sized> NegativeGenerator for Arc<G> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn generate_negatives(
        &self,
        positives: &NodePairs,
        relation: Option<&str>,
        negative_ratio: NegativeRatio,
    ) -> Result<NodePairs, SamplerError> {
        (**self).generate_negatives(positives, relation, negative_ratio)
    }
}

impl<G: NegativeGenerator + ?Sized> NegativeGenerator for Box<G> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn generate_negatives(
        &self,
        positives: &NodePairs,
        relation: Option<&str>,
        negative_ratio: NegativeRatio,
    ) -> Result<NodePairs, SamplerError> {
        (**self).generate_negatives(positives, relation, negative_ratio)
    }
}

/// Verify generator output against the positives it was produced for.
///
/// Rejects uneven `src`/`dst` and any count other than `positives * ratio`.
pub fn check_negatives(
    positives: &NodePairs,
    negatives: &NodePairs,
    relation: Option<&str>,
    negative_ratio: NegativeRatio,
) -> Result<(), SamplerError> {
    negatives.validate(relation)?;
    let expected = negative_ratio.negatives_for(positives.len()).ok_or_else(|| {
        SamplerError::shape(
            relation,
            format!(
                "{} positives with negative_ratio {} overflow the negative count",
                positives.len(),
                negative_ratio
            ),
        )
    })?;
    if negatives.len() != expected {
        return Err(SamplerError::shape(
            relation,
            format!(
                "expected {} negatives ({} positives x ratio {}), generator returned {}",
                expected,
                positives.len(),
                negative_ratio,
                negatives.len()
            ),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Unimplemented;

    impl NegativeGenerator for Unimplemented {
        fn name(&self) -> &str {
            "forgotten"
        }
    }

    struct Repeat;

    impl NegativeGenerator for Repeat {
        fn generate_negatives(
            &self,
            positives: &NodePairs,
            _relation: Option<&str>,
            negative_ratio: NegativeRatio,
        ) -> Result<NodePairs, SamplerError> {
            let k = negative_ratio.get();
            let mut out = NodePairs::with_capacity(positives.len() * k);
            for (src, dst) in positives.iter() {
                for offset in 0..k as i64 {
                    out.push(src, dst + offset);
                }
            }
            Ok(out)
        }
    }

    fn ratio(value: usize) -> NegativeRatio {
        NegativeRatio::new(value).unwrap()
    }

    #[test]
    fn base_contract_reports_not_implemented() {
        let positives = NodePairs::new(vec![1], vec![2]);
        match Unimplemented.generate_negatives(&positives, None, ratio(1)) {
            Err(SamplerError::NotImplemented { strategy }) => assert_eq!(strategy, "forgotten"),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn shared_generators_forward_calls() {
        let shared: Arc<dyn NegativeGenerator> = Arc::new(Repeat);
        assert_eq!(shared.name(), UNNAMED_STRATEGY);
        let positives = NodePairs::new(vec![1, 2], vec![10, 20]);
        let negatives = shared
            .generate_negatives(&positives, Some("r"), ratio(2))
            .unwrap();
        assert_eq!(negatives.src, vec![1, 1, 2, 2]);
        assert_eq!(negatives.dst, vec![10, 11, 20, 21]);

        let boxed: Box<dyn NegativeGenerator> = Box::new(Unimplemented);
        assert!(matches!(
            boxed.generate_negatives(&positives, None, ratio(1)),
            Err(SamplerError::NotImplemented { .. })
        ));
    }

    #[test]
    fn check_negatives_enforces_count_and_pairing() {
        let positives = NodePairs::new(vec![1, 2], vec![3, 4]);
        let good = NodePairs::new(vec![5, 6, 7, 8], vec![9, 10, 11, 12]);
        assert!(check_negatives(&positives, &good, None, ratio(2)).is_ok());

        let short = NodePairs::new(vec![5, 6, 7], vec![9, 10, 11]);
        assert!(matches!(
            check_negatives(&positives, &short, None, ratio(2)),
            Err(SamplerError::ShapeMismatch { .. })
        ));

        let uneven = NodePairs::new(vec![5, 6, 7, 8], vec![9, 10, 11]);
        assert!(matches!(
            check_negatives(&positives, &uneven, Some("r"), ratio(2)),
            Err(SamplerError::ShapeMismatch { relation: Some(_), .. })
        ));
    }

    #[test]
    fn check_negatives_accepts_empty_relation() {
        let empty = NodePairs::default();
        assert!(check_negatives(&empty, &NodePairs::default(), Some("r"), ratio(3)).is_ok());
    }
}
