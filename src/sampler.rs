use indexmap::IndexMap;
use rayon::prelude::*;
use tracing::{debug, trace, warn};

use crate::config::{NegativeRatio, NegativeSamplerConfig, OutputFormat};
use crate::constants::fields::NODE_PAIR;
use crate::constants::sampler::{HOMOGENEOUS_RELATION_LABEL, NEGATIVE_LABEL, POSITIVE_LABEL};
use crate::data::{Label, MiniBatch, NegativeMatrix, NodePairs, Relational};
use crate::errors::SamplerError;
use crate::generator::{NegativeGenerator, check_negatives};
use crate::types::RelationId;

/// Minibatch stage that mixes generated negatives into positive link-prediction batches.
///
/// Reads `node_pair`, asks the generator for `negative_ratio` negatives per
/// positive edge (once per relation for heterogeneous batches) and writes the
/// fields selected by `output_format`. The ratio and format are fixed at
/// construction; no other state survives between calls, so one sampler can be
/// shared by any number of worker threads.
pub struct MinibatchAssembler<G> {
    generator: G,
    negative_ratio: NegativeRatio,
    output_format: OutputFormat,
}

/// Outputs computed for one relation (or the implicit homogeneous relation).
#[derive(Debug, Default)]
struct RelationOutput {
    combined_pairs: Option<NodePairs>,
    label: Option<Vec<Label>>,
    negative_head: Option<NegativeMatrix>,
    negative_tail: Option<NegativeMatrix>,
}

/// Minibatch fields produced by one transform, written back in a single step.
///
/// `combined_pairs` is `None` when `node_pair` must stay untouched; the other
/// fields overwrite the minibatch as-is so stale fields from other formats are
/// cleared.
#[derive(Debug)]
struct CollatedFields {
    combined_pairs: Option<Relational<NodePairs>>,
    label: Option<Relational<Vec<Label>>>,
    negative_head: Option<Relational<NegativeMatrix>>,
    negative_tail: Option<Relational<NegativeMatrix>>,
}

impl CollatedFields {
    fn apply(self, minibatch: &mut MiniBatch) {
        if let Some(pairs) = self.combined_pairs {
            minibatch.node_pair = Some(pairs);
        }
        minibatch.label = self.label;
        minibatch.negative_head = self.negative_head;
        minibatch.negative_tail = self.negative_tail;
    }
}

impl<G: NegativeGenerator> MinibatchAssembler<G> {
    /// Build a sampler; a zero `negative_ratio` is rejected here, before any batch is seen.
    pub fn new(
        generator: G,
        negative_ratio: usize,
        output_format: OutputFormat,
    ) -> Result<Self, SamplerError> {
        let negative_ratio = NegativeRatio::new(negative_ratio)?;
        debug!(
            strategy = generator.name(),
            negative_ratio = negative_ratio.get(),
            output_format = %output_format,
            "negative sampler configured"
        );
        Ok(Self {
            generator,
            negative_ratio,
            output_format,
        })
    }

    /// Build a sampler from a (possibly deserialized) config.
    pub fn from_config(generator: G, config: &NegativeSamplerConfig) -> Result<Self, SamplerError> {
        Self::new(generator, config.negative_ratio, config.output_format)
    }

    pub fn negative_ratio(&self) -> NegativeRatio {
        self.negative_ratio
    }

    pub fn output_format(&self) -> OutputFormat {
        self.output_format
    }

    pub fn generator(&self) -> &G {
        &self.generator
    }

    /// Sample negatives for `minibatch` and return it with the format's fields set.
    ///
    /// On error the minibatch is dropped; nothing is emitted for that item.
    pub fn transform(&self, mut minibatch: MiniBatch) -> Result<MiniBatch, SamplerError> {
        self.transform_in_place(&mut minibatch)?;
        Ok(minibatch)
    }

    /// Sample negatives and mutate `minibatch` in place.
    ///
    /// All outputs are computed before the first field is written, so a failed
    /// call leaves the minibatch exactly as it was.
    pub fn transform_in_place(&self, minibatch: &mut MiniBatch) -> Result<(), SamplerError> {
        let node_pair = minibatch
            .node_pair
            .as_ref()
            .ok_or(SamplerError::MissingField { field: NODE_PAIR })?;
        let fields = match node_pair {
            Relational::Homogeneous(positives) => {
                debug!(
                    strategy = self.generator.name(),
                    output_format = %self.output_format,
                    positives = positives.len(),
                    "sampling negatives for homogeneous minibatch"
                );
                self.collate_homogeneous(positives)?
            }
            Relational::Heterogeneous(relations) => {
                debug!(
                    strategy = self.generator.name(),
                    output_format = %self.output_format,
                    relations = relations.len(),
                    "sampling negatives for heterogeneous minibatch"
                );
                self.collate_heterogeneous(relations)?
            }
        };
        fields.apply(minibatch);
        Ok(())
    }

    /// Transform independent minibatches on the rayon pool.
    ///
    /// Results keep the input order; one failing batch does not affect the others.
    pub fn transform_batch_par(
        &self,
        minibatches: Vec<MiniBatch>,
    ) -> Vec<Result<MiniBatch, SamplerError>> {
        minibatches
            .into_par_iter()
            .map(|minibatch| self.transform(minibatch))
            .collect()
    }

    fn collate_homogeneous(&self, positives: &NodePairs) -> Result<CollatedFields, SamplerError> {
        let output = self.sample_relation(positives, None)?;
        Ok(CollatedFields {
            combined_pairs: output.combined_pairs.map(Relational::Homogeneous),
            label: output.label.map(Relational::Homogeneous),
            negative_head: output.negative_head.map(Relational::Homogeneous),
            negative_tail: output.negative_tail.map(Relational::Homogeneous),
        })
    }

    fn collate_heterogeneous(
        &self,
        relations: &IndexMap<RelationId, NodePairs>,
    ) -> Result<CollatedFields, SamplerError> {
        let format = self.output_format;
        // Created up front so a batch with no relations still yields empty maps.
        let mut combined_pairs = IndexMap::new();
        let mut label = IndexMap::new();
        let mut negative_head = IndexMap::new();
        let mut negative_tail = IndexMap::new();

        for (relation, positives) in relations {
            let output = self.sample_relation(positives, Some(relation.as_str()))?;
            if let Some(pairs) = output.combined_pairs {
                combined_pairs.insert(relation.clone(), pairs);
            }
            if let Some(values) = output.label {
                label.insert(relation.clone(), values);
            }
            if let Some(matrix) = output.negative_head {
                negative_head.insert(relation.clone(), matrix);
            }
            if let Some(matrix) = output.negative_tail {
                negative_tail.insert(relation.clone(), matrix);
            }
        }

        // Single-sided formats drop the other side entirely rather than leaving an empty map.
        Ok(CollatedFields {
            combined_pairs: format
                .writes_label()
                .then(|| Relational::Heterogeneous(combined_pairs)),
            label: format
                .writes_label()
                .then(|| Relational::Heterogeneous(label)),
            negative_head: format
                .writes_head()
                .then(|| Relational::Heterogeneous(negative_head)),
            negative_tail: format
                .writes_tail()
                .then(|| Relational::Heterogeneous(negative_tail)),
        })
    }

    fn sample_relation(
        &self,
        positives: &NodePairs,
        relation: Option<&str>,
    ) -> Result<RelationOutput, SamplerError> {
        positives.validate(relation)?;
        let negatives =
            self.generator
                .generate_negatives(positives, relation, self.negative_ratio)?;
        if let Err(err) = check_negatives(positives, &negatives, relation, self.negative_ratio) {
            warn!(
                strategy = self.generator.name(),
                relation = relation.unwrap_or(HOMOGENEOUS_RELATION_LABEL),
                error = %err,
                "negative generator broke its output contract"
            );
            return Err(err);
        }
        trace!(
            relation = relation.unwrap_or(HOMOGENEOUS_RELATION_LABEL),
            positives = positives.len(),
            negatives = negatives.len(),
            "collating negatives"
        );
        self.collate(positives, negatives, relation)
    }

    fn collate(
        &self,
        positives: &NodePairs,
        negatives: NodePairs,
        relation: Option<&str>,
    ) -> Result<RelationOutput, SamplerError> {
        let cols = self.negative_ratio.get();
        let output = match self.output_format {
            OutputFormat::Independent => {
                let combined = positives.concat(&negatives);
                let mut label = Vec::with_capacity(combined.len());
                label.resize(positives.len(), POSITIVE_LABEL);
                label.resize(combined.len(), NEGATIVE_LABEL);
                RelationOutput {
                    combined_pairs: Some(combined),
                    label: Some(label),
                    ..RelationOutput::default()
                }
            }
            OutputFormat::Conditioned => {
                let NodePairs { src, dst } = negatives;
                RelationOutput {
                    negative_head: Some(NegativeMatrix::from_flat(src, cols, relation)?),
                    negative_tail: Some(NegativeMatrix::from_flat(dst, cols, relation)?),
                    ..RelationOutput::default()
                }
            }
            OutputFormat::HeadConditioned => RelationOutput {
                negative_head: Some(NegativeMatrix::from_flat(negatives.src, cols, relation)?),
                ..RelationOutput::default()
            },
            OutputFormat::TailConditioned => RelationOutput {
                negative_tail: Some(NegativeMatrix::from_flat(negatives.dst, cols, relation)?),
                ..RelationOutput::default()
            },
        };
        Ok(output)
    }
}
