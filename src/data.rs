use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::errors::SamplerError;

pub use crate::types::{Label, NodeId, RelationId};

/// Co-indexed source/destination node ids for one relation.
///
/// Position `i` of `src` and position `i` of `dst` describe the same edge.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodePairs {
    /// Source (head) node ids.
    pub src: Vec<NodeId>,
    /// Destination (tail) node ids.
    pub dst: Vec<NodeId>,
}

impl NodePairs {
    /// Build node pairs from already co-indexed sequences.
    pub fn new(src: Vec<NodeId>, dst: Vec<NodeId>) -> Self {
        Self { src, dst }
    }

    /// Empty node pairs with room for `capacity` edges on each side.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            src: Vec::with_capacity(capacity),
            dst: Vec::with_capacity(capacity),
        }
    }

    /// Append one `(src, dst)` edge.
    pub fn push(&mut self, src: NodeId, dst: NodeId) {
        self.src.push(src);
        self.dst.push(dst);
    }

    /// Number of edges, measured on the source side.
    pub fn len(&self) -> usize {
        self.src.len()
    }

    pub fn is_empty(&self) -> bool {
        self.src.is_empty()
    }

    /// Ensure `src` and `dst` are co-indexed.
    pub fn validate(&self, relation: Option<&str>) -> Result<(), SamplerError> {
        if self.src.len() != self.dst.len() {
            return Err(SamplerError::shape(
                relation,
                format!(
                    "src has {} node ids but dst has {}",
                    self.src.len(),
                    self.dst.len()
                ),
            ));
        }
        Ok(())
    }

    /// Concatenate `self` followed by `other`, allocating the result exactly once.
    pub fn concat(&self, other: &NodePairs) -> NodePairs {
        let mut src = Vec::with_capacity(self.src.len() + other.src.len());
        src.extend_from_slice(&self.src);
        src.extend_from_slice(&other.src);
        let mut dst = Vec::with_capacity(self.dst.len() + other.dst.len());
        dst.extend_from_slice(&self.dst);
        dst.extend_from_slice(&other.dst);
        NodePairs { src, dst }
    }

    /// Iterate `(src, dst)` edges in order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, NodeId)> + '_ {
        self.src.iter().copied().zip(self.dst.iter().copied())
    }
}

impl From<(Vec<NodeId>, Vec<NodeId>)> for NodePairs {
    fn from((src, dst): (Vec<NodeId>, Vec<NodeId>)) -> Self {
        Self { src, dst }
    }
}

/// Row-major `[rows, cols]` matrix of negative node ids.
///
/// Row `i` holds the negatives generated for positive edge `i`; `cols` is the
/// negative ratio the matrix was built with.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawNegativeMatrix")]
pub struct NegativeMatrix {
    rows: usize,
    cols: usize,
    values: Vec<NodeId>,
}

/// Unvalidated wire form of `NegativeMatrix`.
#[derive(Deserialize)]
struct RawNegativeMatrix {
    rows: usize,
    cols: usize,
    values: Vec<NodeId>,
}

impl TryFrom<RawNegativeMatrix> for NegativeMatrix {
    type Error = SamplerError;

    fn try_from(raw: RawNegativeMatrix) -> Result<Self, Self::Error> {
        let matrix = NegativeMatrix::from_flat(raw.values, raw.cols, None)?;
        if matrix.rows != raw.rows {
            return Err(SamplerError::shape(
                None,
                format!(
                    "declared {} rows but values hold {}",
                    raw.rows, matrix.rows
                ),
            ));
        }
        Ok(matrix)
    }
}

impl NegativeMatrix {
    /// Reshape a flat sequence into rows of `cols` entries without copying.
    ///
    /// Fails when `cols` is zero or `values.len()` is not a multiple of `cols`.
    pub fn from_flat(
        values: Vec<NodeId>,
        cols: usize,
        relation: Option<&str>,
    ) -> Result<Self, SamplerError> {
        if cols == 0 {
            return Err(SamplerError::shape(
                relation,
                "cannot reshape negatives into zero columns",
            ));
        }
        if values.len() % cols != 0 {
            return Err(SamplerError::shape(
                relation,
                format!(
                    "{} negatives cannot be reshaped into rows of {}",
                    values.len(),
                    cols
                ),
            ));
        }
        Ok(Self {
            rows: values.len() / cols,
            cols,
            values,
        })
    }

    /// `[rows, cols]`.
    pub fn shape(&self) -> [usize; 2] {
        [self.rows, self.cols]
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Negatives generated for positive edge `row`.
    pub fn row(&self, row: usize) -> Option<&[NodeId]> {
        if row >= self.rows {
            return None;
        }
        let start = row * self.cols;
        Some(&self.values[start..start + self.cols])
    }

    /// The `col`-th negative generated for positive edge `row`.
    pub fn get(&self, row: usize, col: usize) -> Option<NodeId> {
        if col >= self.cols {
            return None;
        }
        self.row(row).map(|values| values[col])
    }

    /// Iterate rows in positive-edge order.
    pub fn iter_rows(&self) -> impl Iterator<Item = &[NodeId]> + '_ {
        self.values.chunks_exact(self.cols)
    }

    /// Flat row-major view.
    pub fn values(&self) -> &[NodeId] {
        &self.values
    }

    pub fn into_values(self) -> Vec<NodeId> {
        self.values
    }

    /// Copy into nested rows, mostly useful for assertions and debugging output.
    pub fn to_nested(&self) -> Vec<Vec<NodeId>> {
        self.iter_rows().map(<[NodeId]>::to_vec).collect()
    }
}

/// A field that is either bare (homogeneous graph) or keyed by relation.
///
/// Map iteration order is insertion order, so relations are visited in the
/// order the upstream stage produced them.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Relational<T> {
    /// Single implicit relation.
    Homogeneous(T),
    /// One entry per relation id.
    Heterogeneous(IndexMap<RelationId, T>),
}

impl<T> Relational<T> {
    pub fn is_heterogeneous(&self) -> bool {
        matches!(self, Relational::Heterogeneous(_))
    }

    pub fn as_homogeneous(&self) -> Option<&T> {
        match self {
            Relational::Homogeneous(value) => Some(value),
            Relational::Heterogeneous(_) => None,
        }
    }

    pub fn as_heterogeneous(&self) -> Option<&IndexMap<RelationId, T>> {
        match self {
            Relational::Homogeneous(_) => None,
            Relational::Heterogeneous(map) => Some(map),
        }
    }

    /// Look up the value for `relation`; `None` addresses the homogeneous value.
    pub fn get(&self, relation: Option<&str>) -> Option<&T> {
        match (self, relation) {
            (Relational::Homogeneous(value), None) => Some(value),
            (Relational::Heterogeneous(map), Some(relation)) => map.get(relation),
            _ => None,
        }
    }

    /// Relation ids in map order; empty for homogeneous values.
    pub fn relation_ids(&self) -> Vec<&str> {
        match self {
            Relational::Homogeneous(_) => Vec::new(),
            Relational::Heterogeneous(map) => map.keys().map(String::as_str).collect(),
        }
    }

    /// `(relation, value)` entries; the homogeneous value is reported under `None`.
    pub fn entries(&self) -> Vec<(Option<&str>, &T)> {
        match self {
            Relational::Homogeneous(value) => vec![(None, value)],
            Relational::Heterogeneous(map) => map
                .iter()
                .map(|(relation, value)| (Some(relation.as_str()), value))
                .collect(),
        }
    }
}

impl<K: Into<RelationId>, T> FromIterator<(K, T)> for Relational<T> {
    fn from_iter<I: IntoIterator<Item = (K, T)>>(iter: I) -> Self {
        Relational::Heterogeneous(
            iter.into_iter()
                .map(|(relation, value)| (relation.into(), value))
                .collect(),
        )
    }
}

/// Link-prediction minibatch flowing through the negative sampling stage.
///
/// Upstream stages fill `node_pair` with positive edges. Which of the other
/// fields end up populated depends on the sampler's `OutputFormat`:
///
/// | format | `label` | `negative_head` | `negative_tail` |
/// |---|---|---|---|
/// | independent | yes | no | no |
/// | conditioned | no | yes | yes |
/// | head_conditioned | no | yes | no |
/// | tail_conditioned | no | no | yes |
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MiniBatch {
    /// Positive edges (or, after the independent format, positives followed by negatives).
    pub node_pair: Option<Relational<NodePairs>>,
    /// `1` for positive and `0` for negative edges, aligned with `node_pair`.
    pub label: Option<Relational<Vec<Label>>>,
    /// Negative heads shaped `[positives, negative_ratio]`.
    pub negative_head: Option<Relational<NegativeMatrix>>,
    /// Negative tails shaped `[positives, negative_ratio]`.
    pub negative_tail: Option<Relational<NegativeMatrix>>,
}

impl MiniBatch {
    /// Minibatch over a homogeneous graph.
    pub fn from_node_pairs(pairs: NodePairs) -> Self {
        Self {
            node_pair: Some(Relational::Homogeneous(pairs)),
            ..Self::default()
        }
    }

    /// Minibatch over a heterogeneous graph, keyed by relation id.
    pub fn from_relations<K, I>(relations: I) -> Self
    where
        K: Into<RelationId>,
        I: IntoIterator<Item = (K, NodePairs)>,
    {
        Self {
            node_pair: Some(relations.into_iter().collect()),
            ..Self::default()
        }
    }

    pub fn is_heterogeneous(&self) -> bool {
        self.node_pair
            .as_ref()
            .is_some_and(Relational::is_heterogeneous)
    }
}
