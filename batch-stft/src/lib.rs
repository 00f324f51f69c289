//! Batched short-time Fourier analysis and perfect-reconstruction synthesis.
//!
//! The forward transform ([`signal::stft::StftKernel`]) and its inverse
//! ([`signal::stft::IstftKernel`]) are realized as strided convolutions
//! against frozen kernels built once from a window and a real Fourier basis.
//! The synthesis kernel uses a window derived from the analysis window so that
//! overlap-added frames satisfy the constant-overlap-add condition, which makes
//! the two transforms mutual inverses.
//!
//! ```
//! use batch_stft::kernel::KernelLifecycle;
//! use batch_stft::signal::stft::{IstftKernel, StftConfig, StftKernel};
//! use batch_stft::signal::traits::{BatchIstft, BatchStft};
//! use batch_stft::signal::windows::WindowFunction;
//! use ndarray::Array2;
//!
//! let config = StftConfig {
//!     frame_size: 8,
//!     hop_size: Some(2),
//!     window: WindowFunction::Hamming,
//!     ..StftConfig::default()
//! };
//! let stft = StftKernel::<f64>::try_new(config).unwrap();
//! let istft = IstftKernel::<f64>::try_new(config).unwrap();
//!
//! let x = Array2::from_shape_fn((2, 64), |(b, t)| ((b * 64 + t) as f64 * 0.37).sin());
//! let z = stft.run_alloc(&x).unwrap();
//! assert_eq!(z.shape(), &[2, 10, 37]);
//!
//! let y = istft.run_alloc(&z, Some(64)).unwrap();
//! assert_eq!(y.dim(), (2, 64));
//! assert!((&y - &x).iter().all(|e| e.abs() < 1e-9));
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(missing_docs)]

extern crate alloc;

mod float;
pub use float::StftFloat;

/// Shared kernel substrate: construction lifecycle, errors and buffer adapters.
pub mod kernel;

/// Windowing, Fourier bases and the batched STFT/ISTFT pair.
pub mod signal;
