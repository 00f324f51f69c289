//! Real Fourier basis restricted to the non-negative frequency bins.
//!
//! Row `k` of the cosine matrix holds `s_k cos(2 pi k n / N)` and row `k` of
//! the sine matrix holds `s_k sin(2 pi k n / N)` for `k` in `0..=N/2` and `n` in
//! `0..N`. Unnormalized bases use `s_k = 1`. Normalized bases make the
//! one-sided transform orthonormal: `s_k = sqrt(1/N)` for the DC and Nyquist
//! bins and `sqrt(2/N)` for every interior bin.

use crate::kernel::{ConfigError, KernelLifecycle};
use crate::signal::traits::FourierBasisDesign;
use crate::StftFloat;
use ndarray::{Array1, Array2, ArrayView1, ArrayView2};

/// Cosine and sine halves of a real DFT basis.
#[derive(Debug, Clone, PartialEq)]
pub struct FourierBasis<F> {
    cos: Array2<F>,
    sin: Array2<F>,
    scales: Array1<F>,
}

impl<F> FourierBasis<F> {
    /// `(N/2 + 1, N)` cosine rows.
    pub fn cos(&self) -> ArrayView2<'_, F> {
        self.cos.view()
    }

    /// `(N/2 + 1, N)` sine rows, not negated.
    pub fn sin(&self) -> ArrayView2<'_, F> {
        self.sin.view()
    }

    /// Per-bin scale applied to both matrices.
    pub fn scales(&self) -> ArrayView1<'_, F> {
        self.scales.view()
    }

    /// Number of non-negative frequency bins, `N/2 + 1`.
    pub fn n_bins(&self) -> usize {
        self.cos.nrows()
    }

    /// Frame size `N`.
    pub fn frame_size(&self) -> usize {
        self.cos.ncols()
    }

    /// Consume the basis into `(cos, sin, scales)`.
    pub fn into_parts(self) -> (Array2<F>, Array2<F>, Array1<F>) {
        (self.cos, self.sin, self.scales)
    }
}

/// Constructor config for [`FourierBasisKernel`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FourierBasisConfig {
    /// Frame size `N`, positive and even.
    pub frame_size: usize,
    /// Build an orthonormal one-sided basis instead of the raw DFT rows.
    pub normalize: bool,
}

/// Trait-first Fourier basis kernel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FourierBasisKernel {
    frame_size: usize,
    normalize: bool,
}

impl FourierBasisKernel {
    /// Configured frame size.
    pub fn frame_size(&self) -> usize {
        self.frame_size
    }

    /// Number of non-negative frequency bins, `N/2 + 1`.
    pub fn n_bins(&self) -> usize {
        self.frame_size / 2 + 1
    }

    /// Whether rows are orthonormally scaled.
    pub fn normalize(&self) -> bool {
        self.normalize
    }

    fn scale<F: StftFloat>(&self, k: usize) -> F {
        if !self.normalize {
            return F::one();
        }
        let n = F::cast_usize(self.frame_size);
        if k == 0 || 2 * k == self.frame_size {
            (F::one() / n).sqrt()
        } else {
            (F::cast_f64(2.0) / n).sqrt()
        }
    }
}

impl KernelLifecycle for FourierBasisKernel {
    type Config = FourierBasisConfig;

    fn try_new(config: Self::Config) -> Result<Self, ConfigError> {
        if config.frame_size == 0 || config.frame_size % 2 != 0 {
            return Err(ConfigError::InvalidArgument {
                arg: "frame_size",
                reason: "frame size must be a positive even number",
            });
        }
        Ok(Self {
            frame_size: config.frame_size,
            normalize: config.normalize,
        })
    }
}

impl<F> FourierBasisDesign<F> for FourierBasisKernel
where
    F: StftFloat,
{
    fn run_alloc(&self) -> FourierBasis<F> {
        let n = self.frame_size;
        let shape = (self.n_bins(), n);
        let step = F::cast_f64(2.0) * F::PI() / F::cast_usize(n);
        let scales = Array1::from_shape_fn(self.n_bins(), |k| self.scale::<F>(k));

        // Reduce k*n modulo N before scaling so large frames keep full precision.
        let phase = |k: usize, i: usize| step * F::cast_usize((k * i) % n);
        let cos = Array2::from_shape_fn(shape, |(k, i)| scales[k] * phase(k, i).cos());
        let sin = Array2::from_shape_fn(shape, |(k, i)| scales[k] * phase(k, i).sin());
        FourierBasis { cos, sin, scales }
    }
}

/// Build the non-negative-frequency real Fourier basis for `frame_size`.
pub fn fourier_basis<F: StftFloat>(
    frame_size: usize,
    normalize: bool,
) -> Result<FourierBasis<F>, ConfigError> {
    let kernel = FourierBasisKernel::try_new(FourierBasisConfig {
        frame_size,
        normalize,
    })?;
    Ok(kernel.run_alloc())
}
