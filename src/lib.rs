#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

/// Construction-time sampler configuration.
pub mod config;
/// Centralized constants used across the sampler, generators, and tests.
pub mod constants;
/// Minibatch, node-pair, and negative-matrix types.
pub mod data;
/// Negative generator interface and output contract checks.
pub mod generator;
/// Label and shape summaries for sampled minibatches.
pub mod metrics;
/// Negative sampling stage that collates negatives into minibatches.
pub mod sampler;
/// Iterator adapters for running the sampler over minibatch streams.
pub mod stream;
/// Shared type aliases.
pub mod types;
/// Uniform negative generator.
pub mod uniform;

mod errors;

pub use config::{NegativeRatio, NegativeSamplerConfig, OutputFormat};
pub use data::{MiniBatch, NegativeMatrix, NodePairs, Relational};
pub use errors::SamplerError;
pub use generator::{NegativeGenerator, check_negatives};
pub use metrics::{LabelBalance, NegativeShape, label_balance, negative_shapes};
pub use sampler::MinibatchAssembler;
pub use stream::{NegativeSampling, SampleNegativesExt, TryNegativeSampling, TrySampleNegativesExt};
pub use types::{Label, NodeId, RelationId, StrategyName};
pub use uniform::UniformNegativeGenerator;
