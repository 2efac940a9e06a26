//! Pull-based adapters that run the sampler over a stream of minibatches.
//!
//! Each `next()` pulls exactly one upstream minibatch and transforms it fully
//! before returning, so the adapter never reads ahead, keeps the upstream order,
//! and works the same over finite and unbounded sources.

use std::iter::FusedIterator;

use crate::data::MiniBatch;
use crate::errors::SamplerError;
use crate::generator::NegativeGenerator;
use crate::sampler::MinibatchAssembler;

/// Iterator adapter returned by `SampleNegativesExt::sample_negatives`.
pub struct NegativeSampling<'a, I, G> {
    upstream: I,
    sampler: &'a MinibatchAssembler<G>,
}

impl<I, G> Iterator for NegativeSampling<'_, I, G>
where
    I: Iterator<Item = MiniBatch>,
    G: NegativeGenerator,
{
    type Item = Result<MiniBatch, SamplerError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.upstream
            .next()
            .map(|minibatch| self.sampler.transform(minibatch))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.upstream.size_hint()
    }
}

impl<I, G> ExactSizeIterator for NegativeSampling<'_, I, G>
where
    I: ExactSizeIterator<Item = MiniBatch>,
    G: NegativeGenerator,
{
}

impl<I, G> FusedIterator for NegativeSampling<'_, I, G>
where
    I: FusedIterator<Item = MiniBatch>,
    G: NegativeGenerator,
{
}

/// Iterator adapter returned by `TrySampleNegativesExt::try_sample_negatives`.
///
/// Upstream errors pass through untouched and are not sent to the generator.
pub struct TryNegativeSampling<'a, I, G> {
    upstream: I,
    sampler: &'a MinibatchAssembler<G>,
}

impl<I, G> Iterator for TryNegativeSampling<'_, I, G>
where
    I: Iterator<Item = Result<MiniBatch, SamplerError>>,
    G: NegativeGenerator,
{
    type Item = Result<MiniBatch, SamplerError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.upstream
            .next()
            .map(|item| item.and_then(|minibatch| self.sampler.transform(minibatch)))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.upstream.size_hint()
    }
}

/// Adds `sample_negatives` to any iterator of minibatches.
pub trait SampleNegativesExt: Iterator<Item = MiniBatch> + Sized {
    /// Map every minibatch through `sampler`, one item at a time.
    fn sample_negatives<G: NegativeGenerator>(
        self,
        sampler: &MinibatchAssembler<G>,
    ) -> NegativeSampling<'_, Self, G> {
        NegativeSampling {
            upstream: self,
            sampler,
        }
    }
}

impl<I: Iterator<Item = MiniBatch>> SampleNegativesExt for I {}

/// Adds `try_sample_negatives` to iterators whose upstream stage can fail.
pub trait TrySampleNegativesExt: Iterator<Item = Result<MiniBatch, SamplerError>> + Sized {
    /// Map every successful minibatch through `sampler`, forwarding upstream errors.
    fn try_sample_negatives<G: NegativeGenerator>(
        self,
        sampler: &MinibatchAssembler<G>,
    ) -> TryNegativeSampling<'_, Self, G> {
        TryNegativeSampling {
            upstream: self,
            sampler,
        }
    }
}

impl<I: Iterator<Item = Result<MiniBatch, SamplerError>>> TrySampleNegativesExt for I {}
