use super::{
    extended_channel_order, frame_count, padding_unchecked, validate_config, StftConfig,
    StftPadding,
};
use crate::kernel::{
    ConfigError, ExecInvariantViolation, KernelLifecycle, ReadSpectrum, WriteBatch,
};
use crate::signal::fourier::{FourierBasis, FourierBasisConfig, FourierBasisKernel};
use crate::signal::traits::{
    BatchIstft, FourierBasisDesign, SynthesisWindowDesign, WindowGenerate,
};
use crate::signal::windows::{
    OptimalWindowConfig, OptimalWindowKernel, WindowConfig, WindowFunction, WindowKernel,
};
use crate::StftFloat;
use alloc::vec::Vec;
use batch_stft_core::num_rs::{conv_transpose1d_out_len, conv_transpose1d_strided, crop};
use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};
use tracing::debug;

/// Batched inverse STFT kernel.
///
/// The frozen kernel is built from the COLA-optimal synthesis window of the
/// configured analysis window and already carries the mirrored interior
/// bins, so it has `2 (N/2 + 1) + 2 (N/2 - 1) = 2N` rows. Incoming spectra are
/// extended the same way before the transposed convolution.
#[derive(Debug, Clone, PartialEq)]
pub struct IstftKernel<F> {
    frame_size: usize,
    hop_size: usize,
    window: WindowFunction,
    normalize: bool,
    synthesis_window: Array1<F>,
    kernel: Array2<F>,
    order: Vec<usize>,
}

impl<F> IstftKernel<F> {
    /// Frame size `N`.
    pub fn frame_size(&self) -> usize {
        self.frame_size
    }

    /// Hop size `H`.
    pub fn hop_size(&self) -> usize {
        self.hop_size
    }

    /// Analysis window family the synthesis window was derived from.
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

    /// Number of input channels expected, `2 (N/2 + 1)`.
    pub fn n_channels(&self) -> usize {
        2 * self.n_bins()
    }

    /// Padding cropped from a reconstruction of `len` samples.
    pub fn padding(&self, len: usize) -> StftPadding {
        padding_unchecked(len, self.frame_size, self.hop_size)
    }

    /// Number of frames a spectrum of a `len`-sample signal carries.
    pub fn n_frames(&self, len: usize) -> usize {
        frame_count(len, self.frame_size, self.hop_size)
    }

    /// COLA-optimal synthesis window.
    pub fn synthesis_window(&self) -> ArrayView1<'_, F> {
        self.synthesis_window.view()
    }

    /// The frozen `(2N, N)` transposed-convolution kernel.
    pub fn kernel(&self) -> ArrayView2<'_, F> {
        self.kernel.view()
    }

    /// Crop to apply to a transposed-convolution output of `n_frames` frames.
    fn plan(
        &self,
        n_frames: usize,
        length: Option<usize>,
    ) -> Result<StftPadding, ExecInvariantViolation> {
        match length {
            Some(len) => {
                let expected = self.n_frames(len);
                if n_frames != expected {
                    return Err(ExecInvariantViolation::ShapeMismatch {
                        arg: "input.frames",
                        expected,
                        got: n_frames,
                    });
                }
                Ok(self.padding(len))
            }
            None => {
                let out_len = conv_transpose1d_out_len(n_frames, self.frame_size, self.hop_size);
                if out_len < 2 * self.frame_size {
                    return Err(ExecInvariantViolation::InvalidState {
                        reason: "istft input has too few frames to cover the edge margins",
                    });
                }
                Ok(StftPadding {
                    left: self.frame_size,
                    right: self.frame_size,
                })
            }
        }
    }
}

impl<F> KernelLifecycle for IstftKernel<F>
where
    F: StftFloat,
{
    type Config = StftConfig;

    fn try_new(config: Self::Config) -> Result<Self, ConfigError> {
        let (frame_size, hop_size) = validate_config(&config)?;

        let analysis: Array1<F> = WindowKernel::try_new(WindowConfig {
            function: config.window,
            len: frame_size,
            periodic: config.periodic,
        })?
        .run_alloc();
        let synthesis_window = OptimalWindowKernel::try_new(OptimalWindowConfig { hop_size })?
            .run_alloc(&analysis)
            .map_err(|_| ConfigError::InvalidArgument {
                arg: "hop_size",
                reason: "hop size must divide the frame size",
            })?;
        let basis: FourierBasis<F> = FourierBasisKernel::try_new(FourierBasisConfig {
            frame_size,
            normalize: config.normalize,
        })?
        .run_alloc();
        let n_bins = basis.n_bins();
        let (cos, sin, scales) = basis.into_parts();

        // 1 / (N s_k^2) undoes the analysis scale and the DFT's 1/N at once.
        let n = F::cast_usize(frame_size);
        let factors = scales.mapv(|s| F::one() / (n * s * s));

        let half = Array2::from_shape_fn((2 * n_bins, frame_size), |(c, i)| {
            if c < n_bins {
                cos[[c, i]] * synthesis_window[i] * factors[c]
            } else {
                let k = c - n_bins;
                -sin[[k, i]] * synthesis_window[i] * factors[k]
            }
        });
        let order = extended_channel_order(frame_size);
        let kernel = half.select(Axis(0), &order);

        debug!(
            frame_size,
            hop_size,
            window = %config.window,
            normalize = config.normalize,
            channels = order.len(),
            "built istft synthesis kernel"
        );
        Ok(Self {
            frame_size,
            hop_size,
            window: config.window,
            normalize: config.normalize,
            synthesis_window,
            kernel,
            order,
        })
    }
}

impl<F> BatchIstft<F> for IstftKernel<F>
where
    F: StftFloat,
{
    fn run_into<I, O>(
        &self,
        input: &I,
        length: Option<usize>,
        out: &mut O,
    ) -> Result<(), ExecInvariantViolation>
    where
        I: ReadSpectrum<F> + ?Sized,
        O: WriteBatch<F> + ?Sized,
    {
        let signal = self.run_alloc(input, length)?;
        let mut out = out.write_batch_mut();
        let expected = [("out.batch", signal.nrows()), ("out.samples", signal.ncols())];
        for ((arg, expected), got) in expected.into_iter().zip(out.shape().iter().copied()) {
            if got != expected {
                return Err(ExecInvariantViolation::ShapeMismatch { arg, expected, got });
            }
        }
        out.assign(&signal);
        Ok(())
    }

    fn run_alloc<I>(
        &self,
        input: &I,
        length: Option<usize>,
    ) -> Result<Array2<F>, ExecInvariantViolation>
    where
        I: ReadSpectrum<F> + ?Sized,
    {
        let input = input.read_spectrum();
        let (batch, channels, n_frames) = input.dim();
        if channels != self.n_channels() {
            return Err(ExecInvariantViolation::ShapeMismatch {
                arg: "input.channels",
                expected: self.n_channels(),
                got: channels,
            });
        }

        let padding = self.plan(n_frames, length)?;
        debug!(
            batch,
            frames = n_frames,
            left = padding.left,
            right = padding.right,
            "istft synthesis"
        );
        let extended = input.select(Axis(1), &self.order);
        let signal = conv_transpose1d_strided(extended.view(), self.kernel.view(), self.hop_size)?;
        Ok(crop(signal.view(), padding.left, padding.right)?)
    }
}
