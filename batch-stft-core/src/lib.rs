//! Batched zero-padding and strided 1D convolution primitives.
//!
//! These are the numeric building blocks behind `batch-stft`: a valid,
//! strided convolution of a batch of signals against a multi-channel kernel
//! and its transposed (overlap-add) counterpart. Nothing here knows about
//! windows or Fourier bases.

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(missing_docs)]

extern crate alloc;

mod error;
pub use error::*;

/// Numpy-like array routines over `ndarray` batches.
pub mod num_rs;
