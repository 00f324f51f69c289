//! Batched STFT analysis and ISTFT synthesis as strided convolutions.
//!
//! A `(batch, T)` signal batch is zero padded symmetrically by
//!
//! ```text
//! total = ((H - (T - N) mod H) mod H) + 2N,   left = total / 2,   right = total - left
//! ```
//!
//! and correlated with a frozen `(2 (N/2 + 1), N)` kernel at stride `H`. The
//! first `N/2 + 1` output channels are the real (cosine) coefficients, the
//! next `N/2 + 1` the imaginary (negated sine) coefficients. Synthesis runs the
//! transposed convolution against a kernel built from the COLA-optimal
//! synthesis window and crops the same padding back off.

use crate::kernel::{ConfigError, ExecInvariantViolation, KernelLifecycle, Read1D, ReadSpectrum};
use crate::signal::traits::{BatchIstft, BatchStft};
use crate::signal::windows::WindowFunction;
use crate::StftFloat;
use alloc::vec::Vec;
use ndarray::{Array1, Array2, Array3, ArrayView2, ArrayView3, Axis, Zip};

mod analysis;
mod synthesis;

pub use analysis::*;
pub use synthesis::*;

/// Constructor config shared by [`StftKernel`] and [`IstftKernel`].
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct StftConfig {
    /// Frame size `N`, positive and even.
    pub frame_size: usize,
    /// Hop size `H`; must divide `frame_size`. Defaults to `frame_size / 2`.
    pub hop_size: Option<usize>,
    /// Analysis window.
    pub window: WindowFunction,
    /// Evaluate the window periodically instead of symmetrically.
    pub periodic: bool,
    /// Use the orthonormal one-sided Fourier basis.
    pub normalize: bool,
}

impl Default for StftConfig {
    fn default() -> Self {
        Self {
            frame_size: 512,
            hop_size: None,
            window: WindowFunction::Hann,
            periodic: false,
            normalize: false,
        }
    }
}

impl StftConfig {
    /// Hop size after applying the `frame_size / 2` default.
    pub fn resolved_hop_size(&self) -> usize {
        self.hop_size.unwrap_or(self.frame_size / 2)
    }
}

/// Validate a config, returning `(frame_size, hop_size)`.
fn validate_config(config: &StftConfig) -> Result<(usize, usize), ConfigError> {
    let frame_size = config.frame_size;
    if frame_size == 0 || frame_size % 2 != 0 {
        return Err(ConfigError::InvalidArgument {
            arg: "frame_size",
            reason: "frame size must be a positive even number",
        });
    }
    let hop_size = config.resolved_hop_size();
    if hop_size == 0 {
        return Err(ConfigError::InvalidArgument {
            arg: "hop_size",
            reason: "hop size must be > 0",
        });
    }
    if hop_size > frame_size || frame_size % hop_size != 0 {
        return Err(ConfigError::InvalidArgument {
            arg: "hop_size",
            reason: "hop size must divide the frame size",
        });
    }
    Ok((frame_size, hop_size))
}

/// Zero padding applied before analysis and cropped after synthesis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StftPadding {
    /// Leading zeros.
    pub left: usize,
    /// Trailing zeros.
    pub right: usize,
}

impl StftPadding {
    /// Total number of padded samples.
    pub fn total(&self) -> usize {
        self.left + self.right
    }
}

/// Padding for a signal of `len` samples.
///
/// The remainder term makes `len + total - N` a multiple of `H` so the last
/// frame ends exactly on the padded signal; the `2N` term gives the first and
/// last signal samples a full set of overlapping frames.
pub fn stft_padding(
    len: usize,
    frame_size: usize,
    hop_size: usize,
) -> Result<StftPadding, ConfigError> {
    if hop_size == 0 || frame_size % hop_size != 0 {
        return Err(ConfigError::InvalidArgument {
            arg: "hop_size",
            reason: "hop size must divide the frame size",
        });
    }
    Ok(padding_unchecked(len, frame_size, hop_size))
}

/// `(T - N) mod H == T mod H` whenever `H` divides `N`.
fn padding_unchecked(len: usize, frame_size: usize, hop_size: usize) -> StftPadding {
    let total = (hop_size - len % hop_size) % hop_size + 2 * frame_size;
    let left = total / 2;
    StftPadding {
        left,
        right: total - left,
    }
}

/// Number of analysis frames produced for a signal of `len` samples.
fn frame_count(len: usize, frame_size: usize, hop_size: usize) -> usize {
    let padded = len + padding_unchecked(len, frame_size, hop_size).total();
    (padded - frame_size) / hop_size + 1
}

/// Channel order of the synthesis input: every stored channel followed by the
/// interior bins `N/2 - 1 ..= 1` of the real half and then of the imaginary half.
///
/// Appending the mirrored interior bins rebuilds the conjugate-symmetric
/// full spectrum from the stored half spectrum.
fn extended_channel_order(frame_size: usize) -> Vec<usize> {
    let n_bins = frame_size / 2 + 1;
    let mut order: Vec<usize> = (0..2 * n_bins).collect();
    order.extend((1..n_bins - 1).rev());
    order.extend((1..n_bins - 1).rev().map(|k| n_bins + k));
    order
}

/// Split a `(batch, 2 F, frames)` spectrum into its real and imaginary halves.
pub fn split_spectrum<F>(
    spectrum: ArrayView3<'_, F>,
) -> Result<(ArrayView3<'_, F>, ArrayView3<'_, F>), ExecInvariantViolation> {
    let channels = spectrum.len_of(Axis(1));
    if channels == 0 || channels % 2 != 0 {
        return Err(ExecInvariantViolation::InvalidState {
            reason: "spectrum channel count must be even and non-zero",
        });
    }
    Ok(spectrum.split_at(Axis(1), channels / 2))
}

/// Power spectrogram `re^2 + im^2` of shape `(batch, F, frames)`.
pub fn power_spectrogram<F, I>(spectrum: &I) -> Result<Array3<F>, ExecInvariantViolation>
where
    F: StftFloat,
    I: ReadSpectrum<F> + ?Sized,
{
    let (re, im) = split_spectrum(spectrum.read_spectrum())?;
    Ok(Zip::from(&re)
        .and(&im)
        .map_collect(|&r, &i| r * r + i * i))
}

/// STFT of a single signal, returning a `(2 (N/2 + 1), frames)` spectrum.
pub fn stft<F, I>(x: &I, config: StftConfig) -> Result<Array2<F>, ExecInvariantViolation>
where
    F: StftFloat,
    I: Read1D<F> + ?Sized,
{
    let kernel = StftKernel::<F>::try_new(config)?;
    let batch = x.read_view().insert_axis(Axis(0));
    let spectrum = kernel.run_alloc(&batch)?;
    Ok(spectrum.index_axis_move(Axis(0), 0))
}

/// Inverse STFT of a single `(2 (N/2 + 1), frames)` spectrum.
pub fn istft<F>(
    spectrum: ArrayView2<'_, F>,
    config: StftConfig,
    length: Option<usize>,
) -> Result<Array1<F>, ExecInvariantViolation>
where
    F: StftFloat,
{
    let kernel = IstftKernel::<F>::try_new(config)?;
    let batch = spectrum.insert_axis(Axis(0));
    let signal = kernel.run_alloc(&batch, length)?;
    Ok(signal.index_axis_move(Axis(0), 0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::Array3;

    #[test]
    fn padding_makes_frames_tile_the_padded_signal() {
        assert_eq!(
            stft_padding(64, 8, 2).unwrap(),
            StftPadding { left: 8, right: 8 }
        );
        assert_eq!(
            stft_padding(63, 8, 2).unwrap(),
            StftPadding { left: 8, right: 9 }
        );
        assert_eq!(
            stft_padding(10, 16, 4).unwrap(),
            StftPadding { left: 17, right: 17 }
        );
        for len in 1..100 {
            for (n, h) in [(8, 2), (8, 8), (16, 4), (32, 16)] {
                let p = stft_padding(len, n, h).unwrap();
                assert_eq!((len + p.total() - n) % h, 0);
                assert!(p.left >= n && p.right >= n);
            }
        }
        assert_eq!(frame_count(64, 8, 2), 37);
        assert!(stft_padding(10, 8, 3).is_err());
    }

    #[test]
    fn config_validation() {
        let ok = |frame_size, hop_size| {
            validate_config(&StftConfig {
                frame_size,
                hop_size,
                ..StftConfig::default()
            })
        };
        assert_eq!(ok(8, None), Ok((8, 4)));
        assert_eq!(ok(8, Some(8)), Ok((8, 8)));
        assert_eq!(ok(2, None), Ok((2, 1)));
        assert!(matches!(
            ok(7, Some(1)),
            Err(ConfigError::InvalidArgument {
                arg: "frame_size",
                ..
            })
        ));
        assert!(matches!(ok(0, None), Err(ConfigError::InvalidArgument { .. })));
        for hop in [0, 3, 16] {
            assert!(matches!(
                ok(8, Some(hop)),
                Err(ConfigError::InvalidArgument { arg: "hop_size", .. })
            ));
        }
    }

    #[test]
    fn extended_order_mirrors_interior_bins() {
        assert_eq!(
            extended_channel_order(8),
            vec![0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 3, 2, 1, 8, 7, 6]
        );
        assert_eq!(extended_channel_order(2), vec![0, 1, 2, 3]);
        assert_eq!(extended_channel_order(16).len(), 2 * 16);
    }

    #[test]
    fn power_spectrogram_sums_squared_halves() {
        let spectrum = Array3::from_shape_fn((1, 4, 2), |(_, c, t)| (c + 1) as f64 * (t + 1) as f64);
        let power = power_spectrogram(&spectrum).unwrap();
        assert_eq!(power.shape(), &[1, 2, 2]);
        // re = c + 1, im = c + 3 at t = 0
        assert_abs_diff_eq!(power[[0, 0, 0]], 1.0 + 9.0, epsilon = 1e-15);
        assert_abs_diff_eq!(power[[0, 1, 1]], 16.0 + 64.0, epsilon = 1e-15);

        let odd = Array3::<f64>::zeros((1, 3, 2));
        assert!(split_spectrum(odd.view()).is_err());
    }

    #[test]
    fn single_signal_round_trip() {
        let config = StftConfig {
            frame_size: 16,
            hop_size: Some(4),
            window: WindowFunction::Blackman,
            ..StftConfig::default()
        };
        let x: Vec<f64> = (0..101).map(|i| (i as f64 * 0.21).cos() * 0.8).collect();
        let z = stft(&x, config).unwrap();
        assert_eq!(z.nrows(), 18);

        let y = istft(z.view(), config, Some(x.len())).unwrap();
        assert_eq!(y.len(), x.len());
        y.iter()
            .zip(x.iter())
            .for_each(|(a, b)| assert_abs_diff_eq!(a, b, epsilon = 1e-10));
    }

    #[test]
    fn default_config_is_hann_half_overlap() {
        let config = StftConfig::default();
        assert_eq!(config.frame_size, 512);
        assert_eq!(config.resolved_hop_size(), 256);
        assert_eq!(config.window, WindowFunction::Hann);
        assert!(!config.normalize);
    }
}
