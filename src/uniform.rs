//! Uniform tail-corruption negative generator.

use indexmap::IndexMap;
use rand::prelude::*;
use rand::rngs::StdRng;
use std::sync::{Mutex, PoisonError};
use tracing::trace;

use crate::config::NegativeRatio;
use crate::constants::uniform::STRATEGY_NAME;
use crate::data::{NodeId, NodePairs, RelationId};
use crate::errors::SamplerError;
use crate::generator::NegativeGenerator;

/// Corrupts the destination of every positive edge with node ids drawn
/// uniformly from `[0, num_nodes)`.
///
/// For positive `(s, d)` and ratio `k` this emits `k` pairs `(s, d')`, keeping
/// the block-per-positive layout the sampler expects. True edges are not
/// filtered out, so a negative may coincide with an existing edge.
///
/// Node counts are registered per relation for heterogeneous graphs (the count
/// of the relation's destination node type) and as a single count for
/// homogeneous graphs.
pub struct UniformNegativeGenerator {
    num_nodes: Option<usize>,
    relation_nodes: IndexMap<RelationId, usize>,
    rng: Mutex<StdRng>,
}

impl UniformNegativeGenerator {
    /// Generator for a homogeneous graph with `num_nodes` nodes.
    pub fn new(num_nodes: usize, seed: u64) -> Self {
        Self {
            num_nodes: Some(num_nodes),
            relation_nodes: IndexMap::new(),
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    /// Generator with no homogeneous count; register relations with `with_relation`.
    pub fn heterogeneous(seed: u64) -> Self {
        Self {
            num_nodes: None,
            relation_nodes: IndexMap::new(),
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    /// Register the destination node count for `relation`.
    pub fn with_relation(mut self, relation: impl Into<RelationId>, num_nodes: usize) -> Self {
        self.relation_nodes.insert(relation.into(), num_nodes);
        self
    }

    fn node_count(&self, relation: Option<&str>) -> Result<usize, SamplerError> {
        match relation {
            None => self.num_nodes.ok_or_else(|| {
                SamplerError::Configuration(
                    "uniform generator has no node count for homogeneous batches".into(),
                )
            }),
            Some(relation) => self.relation_nodes.get(relation).copied().ok_or_else(|| {
                SamplerError::Configuration(format!(
                    "uniform generator has no node count for relation '{relation}'"
                ))
            }),
        }
    }
}

impl NegativeGenerator for UniformNegativeGenerator {
    fn name(&self) -> &str {
        STRATEGY_NAME
    }

    fn generate_negatives(
        &self,
        positives: &NodePairs,
        relation: Option<&str>,
        negative_ratio: NegativeRatio,
    ) -> Result<NodePairs, SamplerError> {
        positives.validate(relation)?;
        let k = negative_ratio.get();
        let total = negative_ratio.negatives_for(positives.len()).ok_or_else(|| {
            SamplerError::Configuration(format!(
                "{} positives x ratio {} overflows",
                positives.len(),
                k
            ))
        })?;
        if total == 0 {
            return Ok(NodePairs::default());
        }
        let num_nodes = self.node_count(relation)?;
        let upper = NodeId::try_from(num_nodes)
            .ok()
            .filter(|upper| *upper > 0)
            .ok_or_else(|| {
                SamplerError::Configuration(format!(
                    "uniform generator needs a positive node count, got {num_nodes}"
                ))
            })?;

        let mut negatives = NodePairs::with_capacity(total);
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        for &src in &positives.src {
            for _ in 0..k {
                negatives.push(src, rng.random_range(0..upper));
            }
        }
        trace!(
            relation = relation.unwrap_or_default(),
            positives = positives.len(),
            negatives = negatives.len(),
            "uniform negatives drawn"
        );
        Ok(negatives)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::sampler_tests::{RELATION_A, RELATION_B, TEST_SEED};

    fn ratio(value: usize) -> NegativeRatio {
        NegativeRatio::new(value).unwrap()
    }

    #[test]
    fn draws_ratio_negatives_per_positive_in_blocks() {
        let generator = UniformNegativeGenerator::new(50, TEST_SEED);
        let positives = NodePairs::new(vec![3, 7, 11], vec![4, 8, 12]);
        let negatives = generator
            .generate_negatives(&positives, None, ratio(4))
            .unwrap();
        assert_eq!(negatives.len(), 12);
        assert_eq!(negatives.dst.len(), 12);
        for (row, chunk) in negatives.src.chunks(4).enumerate() {
            assert!(chunk.iter().all(|src| *src == positives.src[row]));
        }
        assert!(negatives.dst.iter().all(|dst| (0..50).contains(dst)));
    }

    #[test]
    fn same_seed_reproduces_negatives() {
        let positives = NodePairs::new(vec![1, 2, 3], vec![4, 5, 6]);
        let a = UniformNegativeGenerator::new(1_000, TEST_SEED)
            .generate_negatives(&positives, None, ratio(3))
            .unwrap();
        let b = UniformNegativeGenerator::new(1_000, TEST_SEED)
            .generate_negatives(&positives, None, ratio(3))
            .unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn relation_counts_bound_destinations() {
        let generator = UniformNegativeGenerator::heterogeneous(TEST_SEED)
            .with_relation(RELATION_A, 3)
            .with_relation(RELATION_B, 1);
        let positives = NodePairs::new(vec![0, 1], vec![1, 2]);
        let a = generator
            .generate_negatives(&positives, Some(RELATION_A), ratio(5))
            .unwrap();
        assert!(a.dst.iter().all(|dst| (0..3).contains(dst)));
        let b = generator
            .generate_negatives(&positives, Some(RELATION_B), ratio(5))
            .unwrap();
        assert!(b.dst.iter().all(|dst| *dst == 0));
    }

    #[test]
    fn missing_or_empty_node_counts_are_configuration_errors() {
        let positives = NodePairs::new(vec![0], vec![1]);
        let generator = UniformNegativeGenerator::heterogeneous(TEST_SEED);
        assert!(matches!(
            generator.generate_negatives(&positives, None, ratio(1)),
            Err(SamplerError::Configuration(_))
        ));
        assert!(matches!(
            generator.generate_negatives(&positives, Some("unknown"), ratio(1)),
            Err(SamplerError::Configuration(_))
        ));
        assert!(matches!(
            UniformNegativeGenerator::new(0, TEST_SEED).generate_negatives(
                &positives,
                None,
                ratio(1)
            ),
            Err(SamplerError::Configuration(_))
        ));
    }

    #[test]
    fn empty_positives_need_no_node_count() {
        let generator = UniformNegativeGenerator::heterogeneous(TEST_SEED);
        let negatives = generator
            .generate_negatives(&NodePairs::default(), Some("unknown"), ratio(2))
            .unwrap();
        assert!(negatives.is_empty());
    }
}
