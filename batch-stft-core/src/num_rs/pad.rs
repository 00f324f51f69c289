use crate::{Error, Result};
use alloc::format;
use ndarray::{s, Array2, ArrayView2};
use num_traits::Zero;

/// Zero-pad every row of a `(batch, len)` array with `left` leading and
/// `right` trailing zeros.
///
/// Equivalent to `numpy.pad(x, ((0, 0), (left, right)))`.
///
/// # Examples
/// ```
/// use ndarray::array;
/// use batch_stft_core::num_rs::pad_zeros;
///
/// let x = array![[1., 2.], [3., 4.]];
/// let padded = pad_zeros(x.view(), 1, 2);
/// assert_eq!(padded, array![[0., 1., 2., 0., 0.], [0., 3., 4., 0., 0.]]);
/// ```
pub fn pad_zeros<T>(x: ArrayView2<T>, left: usize, right: usize) -> Array2<T>
where
    T: Copy + Zero,
{
    let (batch, len) = x.dim();
    let mut out = Array2::zeros((batch, left + len + right));
    out.slice_mut(s![.., left..left + len]).assign(&x);
    out
}

/// Drop `left` leading and `right` trailing samples from every row of a
/// `(batch, len)` array. This is the inverse of [`pad_zeros`].
///
/// Fails when more samples are cropped than each row holds.
pub fn crop<T>(x: ArrayView2<T>, left: usize, right: usize) -> Result<Array2<T>>
where
    T: Copy,
{
    let len = x.ncols();
    if left + right > len {
        return Err(Error::InvalidArg {
            arg: "x",
            reason: format!("cannot crop {left}+{right} samples from rows of length {len}"),
        });
    }
    Ok(x.slice(s![.., left..len - right]).to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn pad_then_crop_is_identity() {
        let x = array![[1., -2., 3.], [4., 5., -6.]];
        let padded = pad_zeros(x.view(), 3, 1);
        assert_eq!(padded.dim(), (2, 7));
        assert_eq!(padded.row(0).to_vec(), vec![0., 0., 0., 1., -2., 3., 0.]);

        let restored = crop(padded.view(), 3, 1).unwrap();
        assert_eq!(restored, x);
    }

    #[test]
    fn crop_rejects_oversized_margins() {
        let x = array![[1., 2., 3.]];
        let err = crop(x.view(), 2, 2).expect_err("crop larger than row must fail");
        assert!(matches!(err, Error::InvalidArg { arg: "x", .. }));

        let empty = crop(x.view(), 1, 2).unwrap();
        assert_eq!(empty.dim(), (1, 0));
    }
}
