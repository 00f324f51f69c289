//! Trait interfaces for signal-processing capabilities.
//!
//! These traits define the trait-first API shape used by the transform kernels.

use crate::kernel::{
    ExecInvariantViolation, Read1D, ReadBatch, ReadSpectrum, WriteBatch, WriteSpectrum,
};
use crate::signal::fourier::FourierBasis;
use ndarray::{Array1, Array2, Array3};

/// Window generation capability.
pub trait WindowGenerate<T> {
    /// Generate the window samples.
    fn run_alloc(&self) -> Array1<T>;
}

/// Synthesis window design capability.
pub trait SynthesisWindowDesign<T> {
    /// Derive a synthesis window from an analysis window.
    fn run_alloc<I>(&self, analysis: &I) -> Result<Array1<T>, ExecInvariantViolation>
    where
        I: Read1D<T> + ?Sized;
}

/// Real Fourier basis design capability.
pub trait FourierBasisDesign<T> {
    /// Build the cosine and sine halves of the basis.
    fn run_alloc(&self) -> FourierBasis<T>;
}

/// Batched short-time Fourier analysis capability.
pub trait BatchStft<T> {
    /// Run analysis into a caller-provided `(batch, channels, frames)` buffer.
    fn run_into<I, O>(&self, input: &I, out: &mut O) -> Result<(), ExecInvariantViolation>
    where
        I: ReadBatch<T> + ?Sized,
        O: WriteSpectrum<T> + ?Sized;

    /// Run analysis and allocate the spectrum.
    fn run_alloc<I>(&self, input: &I) -> Result<Array3<T>, ExecInvariantViolation>
    where
        I: ReadBatch<T> + ?Sized;
}

/// Batched inverse short-time Fourier synthesis capability.
pub trait BatchIstft<T> {
    /// Run synthesis into a caller-provided `(batch, samples)` buffer.
    ///
    /// `length` is the original signal length, when known.
    fn run_into<I, O>(
        &self,
        input: &I,
        length: Option<usize>,
        out: &mut O,
    ) -> Result<(), ExecInvariantViolation>
    where
        I: ReadSpectrum<T> + ?Sized,
        O: WriteBatch<T> + ?Sized;

    /// Run synthesis and allocate the reconstructed batch.
    fn run_alloc<I>(
        &self,
        input: &I,
        length: Option<usize>,
    ) -> Result<Array2<T>, ExecInvariantViolation>
    where
        I: ReadSpectrum<T> + ?Sized;
}
