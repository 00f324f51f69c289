//! Synthesis windows satisfying the constant-overlap-add (COLA) condition.
//!
//! For an analysis window `w` of length `N` and hop `H` dividing `N`, the
//! optimal synthesis window is
//!
//! ```text
//! w'[i] = w[i] / max(S[i mod H], eps),    S[r] = sum_{j = r (mod H)} w[j]^2
//! ```
//!
//! so that `sum_m w[i + mH] w'[i + mH] = 1` at every sample position covered
//! by `N / H` overlapping frames.

use crate::kernel::{ConfigError, ExecInvariantViolation, KernelLifecycle, Read1D};
use crate::signal::traits::SynthesisWindowDesign;
use crate::StftFloat;
use ndarray::{Array1, ArrayView1};

/// Lower bound on the overlap energy a synthesis window divides by.
pub const OVERLAP_EPSILON: f64 = 1e-10;

/// Constructor config for [`OptimalWindowKernel`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OptimalWindowConfig {
    /// Hop size the synthesis window is designed for.
    pub hop_size: usize,
}

/// Trait-first optimal synthesis window kernel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OptimalWindowKernel {
    hop_size: usize,
}

impl OptimalWindowKernel {
    /// Configured hop size.
    pub fn hop_size(&self) -> usize {
        self.hop_size
    }
}

impl KernelLifecycle for OptimalWindowKernel {
    type Config = OptimalWindowConfig;

    fn try_new(config: Self::Config) -> Result<Self, ConfigError> {
        if config.hop_size == 0 {
            return Err(ConfigError::InvalidArgument {
                arg: "hop_size",
                reason: "hop size must be > 0",
            });
        }
        Ok(Self {
            hop_size: config.hop_size,
        })
    }
}

impl<F> SynthesisWindowDesign<F> for OptimalWindowKernel
where
    F: StftFloat,
{
    fn run_alloc<I>(&self, analysis: &I) -> Result<Array1<F>, ExecInvariantViolation>
    where
        I: Read1D<F> + ?Sized,
    {
        let window = analysis.read_view();
        validate_hop(window.len(), self.hop_size)?;

        let energy = overlap_sum(window, window, self.hop_size);
        let eps = F::cast_f64(OVERLAP_EPSILON);
        Ok(Array1::from_shape_fn(window.len(), |i| {
            window[i] / energy[i % self.hop_size].max(eps)
        }))
    }
}

fn validate_hop(len: usize, hop_size: usize) -> Result<(), ExecInvariantViolation> {
    if len == 0 {
        return Err(ExecInvariantViolation::InvalidState {
            reason: "window must be non-empty",
        });
    }
    if hop_size == 0 || hop_size > len || len % hop_size != 0 {
        return Err(ExecInvariantViolation::InvalidState {
            reason: "hop size must divide the window length",
        });
    }
    Ok(())
}

/// `out[r] = sum_{j = r (mod hop)} a[j] * b[j]` for `r` in `0..hop`.
fn overlap_sum<F: StftFloat>(a: ArrayView1<F>, b: ArrayView1<F>, hop_size: usize) -> Array1<F> {
    let mut out = Array1::zeros(hop_size);
    for (j, (x, y)) in a.iter().zip(b.iter()).enumerate() {
        out[j % hop_size] += *x * *y;
    }
    out
}

/// Derive the optimal synthesis window for `analysis` at `hop_size`.
pub fn optimal_synthesis_window<F, I>(
    analysis: &I,
    hop_size: usize,
) -> Result<Array1<F>, ExecInvariantViolation>
where
    F: StftFloat,
    I: Read1D<F> + ?Sized,
{
    let kernel = OptimalWindowKernel::try_new(OptimalWindowConfig { hop_size })?;
    kernel.run_alloc(analysis)
}

/// Overlap-added product of an analysis and synthesis window pair at every
/// phase `0..hop_size` of a fully overlapped position.
pub fn cola_sum<F, A, S>(
    analysis: &A,
    synthesis: &S,
    hop_size: usize,
) -> Result<Array1<F>, ExecInvariantViolation>
where
    F: StftFloat,
    A: Read1D<F> + ?Sized,
    S: Read1D<F> + ?Sized,
{
    let analysis = analysis.read_view();
    let synthesis = synthesis.read_view();
    if analysis.len() != synthesis.len() {
        return Err(ExecInvariantViolation::ShapeMismatch {
            arg: "synthesis",
            expected: analysis.len(),
            got: synthesis.len(),
        });
    }
    validate_hop(analysis.len(), hop_size)?;
    Ok(overlap_sum(analysis, synthesis, hop_size))
}

/// Whether the overlap-added window product is constant within `tol`.
pub fn check_cola<F, A, S>(
    analysis: &A,
    synthesis: &S,
    hop_size: usize,
    tol: F,
) -> Result<bool, ExecInvariantViolation>
where
    F: StftFloat,
    A: Read1D<F> + ?Sized,
    S: Read1D<F> + ?Sized,
{
    let sums = cola_sum(analysis, synthesis, hop_size)?;
    let (lo, hi) = sums
        .iter()
        .fold((F::infinity(), F::neg_infinity()), |(lo, hi), v| {
            (lo.min(*v), hi.max(*v))
        });
    Ok(hi - lo <= tol)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signal::windows::{get_window, WindowFunction};
    use approx::assert_abs_diff_eq;

    #[test]
    fn optimal_window_is_cola_for_common_windows() {
        let functions = [
            WindowFunction::Hann,
            WindowFunction::Hamming,
            WindowFunction::Blackman,
            WindowFunction::Nuttall,
            WindowFunction::Bartlett,
            WindowFunction::Kaiser { beta: 6.0 },
        ];
        for function in functions {
            for (len, hop) in [(8, 2), (8, 4), (64, 16), (512, 128)] {
                for periodic in [false, true] {
                    let w: Array1<f64> = get_window(function, len, periodic);
                    let ws = optimal_synthesis_window(&w, hop).unwrap();
                    let sums = cola_sum(&w, &ws, hop).unwrap();
                    sums.iter()
                        .for_each(|v| assert_abs_diff_eq!(*v, 1.0, epsilon = 1e-12));
                    assert!(check_cola(&w, &ws, hop, 1e-12).unwrap());
                }
            }
        }
    }

    #[test]
    fn boxcar_without_overlap_is_its_own_synthesis_window() {
        let w: Array1<f64> = get_window(WindowFunction::Boxcar, 16, false);
        let ws = optimal_synthesis_window(&w, 16).unwrap();
        ws.iter().for_each(|v| assert_abs_diff_eq!(*v, 1.0, epsilon = 1e-15));
    }

    #[test]
    fn vanishing_overlap_energy_is_guarded() {
        // A symmetric Hann without overlap has S[0] = w[0]^2 = 0.
        let w: Array1<f64> = get_window(WindowFunction::Hann, 8, false);
        let ws = optimal_synthesis_window(&w, 8).unwrap();
        assert!(ws.iter().all(|v| v.is_finite()));
        assert_abs_diff_eq!(ws[0], 0.0, epsilon = 1e-12);
    }

    #[test]
    fn raw_hann_pair_is_not_cola_at_half_hop() {
        let w: Array1<f64> = get_window(WindowFunction::Hann, 32, false);
        assert!(!check_cola(&w, &w, 16, 1e-6).unwrap());
    }

    #[test]
    fn rejects_hops_that_do_not_divide_the_window() {
        let w: Array1<f64> = get_window(WindowFunction::Hann, 8, false);
        let err = optimal_synthesis_window(&w, 3).expect_err("3 does not divide 8");
        assert!(matches!(err, ExecInvariantViolation::InvalidState { .. }));

        let err = optimal_synthesis_window(&w, 0).expect_err("zero hop");
        assert_eq!(
            err,
            ExecInvariantViolation::Config(ConfigError::InvalidArgument {
                arg: "hop_size",
                reason: "hop size must be > 0",
            })
        );

        let short: Array1<f64> = get_window(WindowFunction::Hann, 4, false);
        let err = cola_sum(&w, &short, 2).expect_err("length mismatch");
        assert_eq!(
            err,
            ExecInvariantViolation::ShapeMismatch {
                arg: "synthesis",
                expected: 8,
                got: 4
            }
        );
    }
}
