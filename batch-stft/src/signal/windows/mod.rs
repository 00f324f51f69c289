//! Analysis windows and the optimal synthesis windows derived from them.
//!
//! Windows are evaluated in closed form. Symmetric windows use `N - 1` as the
//! denominator (so both endpoints are included, as in filter design), periodic
//! windows use `N` (as in spectral analysis).

use crate::kernel::ConfigError;
use crate::StftFloat;
use alloc::string::ToString;
use core::fmt;
use core::str::FromStr;
use ndarray::Array1;

mod kernels;
mod optimal;

pub use kernels::*;
pub use optimal::*;

/// Window function tag.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum WindowFunction {
    /// Rectangular window.
    Boxcar,
    /// Triangular window with zero endpoints.
    Bartlett,
    /// Hann window, `0.5 - 0.5 cos(2 pi n / M)`.
    #[default]
    Hann,
    /// Hamming window, `0.54 - 0.46 cos(2 pi n / M)`.
    Hamming,
    /// Blackman window.
    Blackman,
    /// Minimum 4-term Blackman-Harris window after Nuttall.
    Nuttall,
    /// Kaiser window.
    Kaiser {
        /// Shape parameter `beta`.
        beta: f64,
    },
}

/// Kaiser shape parameter used when the window is named without one.
pub const DEFAULT_KAISER_BETA: f64 = 12.0;

impl WindowFunction {
    /// Lowercase tag of the window family.
    pub fn name(&self) -> &'static str {
        match self {
            WindowFunction::Boxcar => "boxcar",
            WindowFunction::Bartlett => "bartlett",
            WindowFunction::Hann => "hann",
            WindowFunction::Hamming => "hamming",
            WindowFunction::Blackman => "blackman",
            WindowFunction::Nuttall => "nuttall",
            WindowFunction::Kaiser { .. } => "kaiser",
        }
    }
}

impl fmt::Display for WindowFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WindowFunction::Kaiser { beta } => write!(f, "kaiser(beta={beta})"),
            other => f.write_str(other.name()),
        }
    }
}

impl FromStr for WindowFunction {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "boxcar" | "rectangular" | "rect" | "ones" => Ok(WindowFunction::Boxcar),
            "bartlett" | "triangle" | "triang" => Ok(WindowFunction::Bartlett),
            "hann" | "hanning" => Ok(WindowFunction::Hann),
            "hamming" => Ok(WindowFunction::Hamming),
            "blackman" => Ok(WindowFunction::Blackman),
            "nuttall" => Ok(WindowFunction::Nuttall),
            "kaiser" => Ok(WindowFunction::Kaiser {
                beta: DEFAULT_KAISER_BETA,
            }),
            _ => Err(ConfigError::UnknownWindow {
                name: s.to_string(),
            }),
        }
    }
}

/// Evaluate `function` at `len` points.
///
/// Lengths 0 and 1 return an empty window and `[1]` respectively. Parameters
/// are not validated here; [`WindowKernel`] does that.
pub fn get_window<F: StftFloat>(function: WindowFunction, len: usize, periodic: bool) -> Array1<F> {
    match len {
        0 => return Array1::zeros(0),
        1 => return Array1::ones(1),
        _ => {}
    }
    let m = F::cast_usize(if periodic { len } else { len - 1 });

    match function {
        WindowFunction::Boxcar => Array1::ones(len),
        WindowFunction::Bartlett => Array1::from_shape_fn(len, |n| {
            let two = F::cast_f64(2.0);
            F::one() - (two * F::cast_usize(n) / m - F::one()).abs()
        }),
        WindowFunction::Hann => general_cosine(len, m, &[0.5, 0.5]),
        WindowFunction::Hamming => general_cosine(len, m, &[0.54, 0.46]),
        WindowFunction::Blackman => general_cosine(len, m, &[0.42, 0.5, 0.08]),
        WindowFunction::Nuttall => {
            general_cosine(len, m, &[0.3635819, 0.4891775, 0.1365995, 0.0106411])
        }
        WindowFunction::Kaiser { beta } => {
            let beta = F::cast_f64(beta);
            let denom = bessel_i0(beta);
            Array1::from_shape_fn(len, |n| {
                let r = F::cast_f64(2.0) * F::cast_usize(n) / m - F::one();
                let arg = (F::one() - r * r).max(F::zero()).sqrt();
                bessel_i0(beta * arg) / denom
            })
        }
    }
}

/// `w[n] = sum_k (-1)^k a_k cos(2 pi k n / m)`
fn general_cosine<F: StftFloat>(len: usize, m: F, weights: &[f64]) -> Array1<F> {
    let tau = F::cast_f64(2.0) * F::PI();
    Array1::from_shape_fn(len, |n| {
        let phase = tau * F::cast_usize(n) / m;
        weights
            .iter()
            .enumerate()
            .fold(F::zero(), |acc, (k, &a)| {
                let term = F::cast_f64(a) * (F::cast_usize(k) * phase).cos();
                if k % 2 == 0 {
                    acc + term
                } else {
                    acc - term
                }
            })
    })
}

/// Modified Bessel function of the first kind, order zero, by power series.
fn bessel_i0<F: StftFloat>(x: F) -> F {
    let quarter_sq = x * x / F::cast_f64(4.0);
    let mut term = F::one();
    let mut sum = F::one();
    for k in 1..500usize {
        let k = F::cast_usize(k);
        term *= quarter_sq / (k * k);
        sum += term;
        if term <= sum * F::epsilon() {
            break;
        }
    }
    sum
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn symmetric_hann_matches_closed_form() {
        let w: Array1<f64> = get_window(WindowFunction::Hann, 8, false);
        for (n, v) in w.iter().enumerate() {
            let expected = 0.5 - 0.5 * (2.0 * core::f64::consts::PI * n as f64 / 7.0).cos();
            assert_abs_diff_eq!(*v, expected, epsilon = 1e-14);
        }
        assert_abs_diff_eq!(w[0], 0.0, epsilon = 1e-14);
        assert_abs_diff_eq!(w[7], 0.0, epsilon = 1e-14);
        assert_abs_diff_eq!(w[3], w[4], epsilon = 1e-14);
    }

    #[test]
    fn periodic_hann_peaks_at_center() {
        let w: Array1<f64> = get_window(WindowFunction::Hann, 8, true);
        assert_abs_diff_eq!(w[0], 0.0, epsilon = 1e-14);
        assert_abs_diff_eq!(w[4], 1.0, epsilon = 1e-14);
        assert_abs_diff_eq!(w[1], w[7], epsilon = 1e-14);
    }

    #[test]
    fn hamming_and_blackman_endpoints() {
        let hamming: Array1<f64> = get_window(WindowFunction::Hamming, 9, false);
        assert_abs_diff_eq!(hamming[0], 0.08, epsilon = 1e-12);
        assert_abs_diff_eq!(hamming[4], 1.0, epsilon = 1e-12);

        let blackman: Array1<f64> = get_window(WindowFunction::Blackman, 9, false);
        assert_abs_diff_eq!(blackman[0], 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(blackman[4], 1.0, epsilon = 1e-12);
    }

    #[test]
    fn bartlett_is_triangular() {
        let w: Array1<f64> = get_window(WindowFunction::Bartlett, 5, false);
        let expected = [0.0, 0.5, 1.0, 0.5, 0.0];
        w.iter()
            .zip(expected.iter())
            .for_each(|(a, b)| assert_abs_diff_eq!(a, b, epsilon = 1e-14));
    }

    #[test]
    fn kaiser_with_zero_beta_is_boxcar() {
        let w: Array1<f64> = get_window(WindowFunction::Kaiser { beta: 0.0 }, 6, false);
        w.iter().for_each(|v| assert_abs_diff_eq!(*v, 1.0, epsilon = 1e-14));

        let w: Array1<f64> = get_window(WindowFunction::Kaiser { beta: 12.0 }, 7, false);
        assert_abs_diff_eq!(w[3], 1.0, epsilon = 1e-12);
        assert!(w[0] < 1e-4);
        assert!(w[1] > w[0] && w[2] > w[1]);
    }

    #[test]
    fn bessel_i0_reference_values() {
        assert_abs_diff_eq!(bessel_i0(0.0f64), 1.0, epsilon = 1e-15);
        assert_abs_diff_eq!(bessel_i0(1.0f64), 1.2660658777520082, epsilon = 1e-12);
        assert_abs_diff_eq!(bessel_i0(5.0f64), 27.239871823604442, epsilon = 1e-9);
    }

    #[test]
    fn window_tags_parse() {
        assert_eq!("hann".parse::<WindowFunction>(), Ok(WindowFunction::Hann));
        assert_eq!(" Hamming ".parse::<WindowFunction>(), Ok(WindowFunction::Hamming));
        assert_eq!(
            "kaiser".parse::<WindowFunction>(),
            Ok(WindowFunction::Kaiser {
                beta: DEFAULT_KAISER_BETA
            })
        );
        assert_eq!(
            "welch".parse::<WindowFunction>(),
            Err(ConfigError::UnknownWindow {
                name: "welch".into()
            })
        );
    }

    #[test]
    fn degenerate_lengths() {
        let empty: Array1<f32> = get_window(WindowFunction::Hann, 0, false);
        assert!(empty.is_empty());
        let single: Array1<f32> = get_window(WindowFunction::Hann, 1, false);
        assert_eq!(single.to_vec(), vec![1.0]);
    }
}
