use super::{frame_count, padding_unchecked, validate_config, StftConfig, StftPadding};
use crate::kernel::{
    ConfigError, ExecInvariantViolation, KernelLifecycle, ReadBatch, WriteSpectrum,
};
use crate::signal::fourier::{FourierBasis, FourierBasisConfig, FourierBasisKernel};
use crate::signal::traits::{BatchStft, FourierBasisDesign, WindowGenerate};
use crate::signal::windows::{WindowConfig, WindowFunction, WindowKernel};
use crate::StftFloat;
use batch_stft_core::num_rs::{conv1d_strided, pad_zeros};
use ndarray::{Array1, Array2, Array3, ArrayView2};
use tracing::debug;

/// Batched STFT analysis kernel.
///
/// Holds the frozen `(2 (N/2 + 1), N)` convolution kernel whose rows are
/// `cos(2 pi k n / N) w[n]` followed by `-sin(2 pi k n / N) w[n]`.
#[derive(Debug, Clone, PartialEq)]
pub struct StftKernel<F> {
    frame_size: usize,
    hop_size: usize,
    window: WindowFunction,
    normalize: bool,
    kernel: Array2<F>,
}

impl<F> StftKernel<F> {
    /// Frame size `N`.
    pub fn frame_size(&self) -> usize {
        self.frame_size
    }

    /// Hop size `H`.
    pub fn hop_size(&self) -> usize {
        self.hop_size
    }

    /// Analysis window family.
    pub fn window(&self) -> WindowFunction {
        self.window
    }

    /// Whether the orthonormal basis is used.
    pub fn normalize(&self) -> bool {
        self.normalize
    }

    /// Number of non-negative frequency bins, `N/2 + 1`.
    pub fn n_bins(&self) -> usize {
        self.frame_size / 2 + 1
    }

    /// Number of output channels, `2 (N/2 + 1)`.
    pub fn n_channels(&self) -> usize {
        2 * self.n_bins()
    }

    /// Zero padding applied to a signal of `len` samples.
    pub fn padding(&self, len: usize) -> StftPadding {
        padding_unchecked(len, self.frame_size, self.hop_size)
    }

    /// Number of frames produced for a signal of `len` samples.
    pub fn n_frames(&self, len: usize) -> usize {
        frame_count(len, self.frame_size, self.hop_size)
    }

    /// The frozen convolution kernel.
    pub fn kernel(&self) -> ArrayView2<'_, F> {
        self.kernel.view()
    }
}

impl<F> KernelLifecycle for StftKernel<F>
where
    F: StftFloat,
{
    type Config = StftConfig;

    fn try_new(config: Self::Config) -> Result<Self, ConfigError> {
        let (frame_size, hop_size) = validate_config(&config)?;

        let window: Array1<F> = WindowKernel::try_new(WindowConfig {
            function: config.window,
            len: frame_size,
            periodic: config.periodic,
        })?
        .run_alloc();
        let basis: FourierBasis<F> = FourierBasisKernel::try_new(FourierBasisConfig {
            frame_size,
            normalize: config.normalize,
        })?
        .run_alloc();

        let n_bins = basis.n_bins();
        let (cos, sin) = (basis.cos(), basis.sin());
        let kernel = Array2::from_shape_fn((2 * n_bins, frame_size), |(c, i)| {
            if c < n_bins {
                cos[[c, i]] * window[i]
            } else {
                -sin[[c - n_bins, i]] * window[i]
            }
        });

        debug!(
            frame_size,
            hop_size,
            window = %config.window,
            normalize = config.normalize,
            "built stft analysis kernel"
        );
        Ok(Self {
            frame_size,
            hop_size,
            window: config.window,
            normalize: config.normalize,
            kernel,
        })
    }
}

impl<F> BatchStft<F> for StftKernel<F>
where
    F: StftFloat,
{
    fn run_into<I, O>(&self, input: &I, out: &mut O) -> Result<(), ExecInvariantViolation>
    where
        I: ReadBatch<F> + ?Sized,
        O: WriteSpectrum<F> + ?Sized,
    {
        let (batch, len) = input.read_batch().dim();

        let mut out = out.write_spectrum_mut();
        let expected = [
            ("out.batch", batch),
            ("out.channels", self.n_channels()),
            ("out.frames", self.n_frames(len)),
        ];
        for ((arg, expected), got) in expected.into_iter().zip(out.shape().iter().copied()) {
            if got != expected {
                return Err(ExecInvariantViolation::ShapeMismatch { arg, expected, got });
            }
        }

        let spectrum = self.run_alloc(input)?;
        out.assign(&spectrum);
        Ok(())
    }

    fn run_alloc<I>(&self, input: &I) -> Result<Array3<F>, ExecInvariantViolation>
    where
        I: ReadBatch<F> + ?Sized,
    {
        let input = input.read_batch();
        let (batch, len) = input.dim();

        // Empty signals still yield the N/H + 1 frames spanning the margins.
        let padding = self.padding(len);
        debug!(
            batch,
            len,
            left = padding.left,
            right = padding.right,
            frames = self.n_frames(len),
            "stft analysis"
        );
        let padded = pad_zeros(input, padding.left, padding.right);
        Ok(conv1d_strided(padded.view(), self.kernel.view(), self.hop_size)?)
    }
}
