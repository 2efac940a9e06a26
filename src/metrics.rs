use crate::constants::sampler::POSITIVE_LABEL;
use crate::data::{MiniBatch, NegativeMatrix, Relational};
use crate::types::RelationId;

/// Positive/negative label counts for one relation of a labeled minibatch.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LabelBalance {
    /// `None` for homogeneous minibatches.
    pub relation: Option<RelationId>,
    pub positives: usize,
    pub negatives: usize,
}

impl LabelBalance {
    pub fn total(&self) -> usize {
        self.positives + self.negatives
    }

    /// Negatives per positive; `None` when the relation has no positives.
    pub fn ratio(&self) -> Option<f64> {
        (self.positives > 0).then(|| self.negatives as f64 / self.positives as f64)
    }
}

/// Head/tail matrix shapes for one relation of a conditioned minibatch.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NegativeShape {
    /// `None` for homogeneous minibatches.
    pub relation: Option<RelationId>,
    pub head: Option<[usize; 2]>,
    pub tail: Option<[usize; 2]>,
}

/// Count labels per relation, in relation order.
///
/// Empty when the minibatch carries no `label` field.
pub fn label_balance(minibatch: &MiniBatch) -> Vec<LabelBalance> {
    let Some(label) = minibatch.label.as_ref() else {
        return Vec::new();
    };
    label
        .entries()
        .into_iter()
        .map(|(relation, values)| {
            let positives = values
                .iter()
                .filter(|value| **value == POSITIVE_LABEL)
                .count();
            LabelBalance {
                relation: relation.map(str::to_string),
                positives,
                negatives: values.len() - positives,
            }
        })
        .collect()
}

/// Report negative matrix shapes per relation, in relation order.
///
/// Relations are taken from whichever side is present; a side that is absent
/// for the whole minibatch is reported as `None` for every relation.
pub fn negative_shapes(minibatch: &MiniBatch) -> Vec<NegativeShape> {
    let head = minibatch.negative_head.as_ref();
    let tail = minibatch.negative_tail.as_ref();
    let Some(keys) = head.or(tail) else {
        return Vec::new();
    };
    let shape_of = |side: Option<&Relational<NegativeMatrix>>, relation: Option<&str>| {
        side.and_then(|side| side.get(relation))
            .map(NegativeMatrix::shape)
    };
    keys.entries()
        .into_iter()
        .map(|(relation, _)| NegativeShape {
            relation: relation.map(str::to_string),
            head: shape_of(head, relation),
            tail: shape_of(tail, relation),
        })
        .collect()
}
