use crate::{Error, Result};
use alloc::format;
use ndarray::linalg::general_mat_mul;
use ndarray::{s, Array2, Array3, ArrayView1, ArrayView2, ArrayView3, ArrayViewMut1, ArrayViewMut2, LinalgScalar, Zip};

/// Number of output frames of a valid convolution with the given stride.
///
/// Returns `None` when the signal is shorter than the kernel or the stride is zero.
pub fn conv1d_out_len(len: usize, kernel_len: usize, stride: usize) -> Option<usize> {
    if stride == 0 || kernel_len == 0 || len < kernel_len {
        return None;
    }
    Some((len - kernel_len) / stride + 1)
}

/// Number of output samples of a transposed convolution over `n_frames` frames.
pub fn conv_transpose1d_out_len(n_frames: usize, kernel_len: usize, stride: usize) -> usize {
    match n_frames {
        0 => 0,
        n => (n - 1) * stride + kernel_len,
    }
}

/// Strided, unpadded 1D cross-correlation of a batch of single-channel signals
/// against a bank of `C` filters, the way deep learning frameworks define `conv1d`.
///
/// `input` is `(batch, len)`, `kernel` is `(C, K)` and the output is
/// `(batch, C, n_frames)` with `n_frames = (len - K) / stride + 1`:
///
/// ```text
/// out[b, c, t] = sum_k kernel[c, k] * input[b, t * stride + k]
/// ```
///
/// Frames are gathered into a `(n_frames, K)` matrix (im2col) and contracted
/// with the kernel in a single matrix product per batch row.
///
/// # Examples
/// ```
/// use ndarray::array;
/// use batch_stft_core::num_rs::conv1d_strided;
///
/// let x = array![[1., 2., 3., 4., 5.]];
/// let k = array![[1., 0.], [0., 1.]];
/// let y = conv1d_strided(x.view(), k.view(), 2).unwrap();
/// assert_eq!(y.shape(), &[1, 2, 2]);
/// assert_eq!(y.as_slice().unwrap(), &[1., 3., 2., 4.]);
/// ```
pub fn conv1d_strided<T>(
    input: ArrayView2<T>,
    kernel: ArrayView2<T>,
    stride: usize,
) -> Result<Array3<T>>
where
    T: LinalgScalar + Send + Sync,
{
    if stride == 0 {
        return Err(Error::InvalidArg {
            arg: "stride",
            reason: "stride must be > 0".into(),
        });
    }
    let (batch, len) = input.dim();
    let (channels, kernel_len) = kernel.dim();
    if kernel_len == 0 {
        return Err(Error::InvalidArg {
            arg: "kernel",
            reason: "kernel must hold at least one tap".into(),
        });
    }
    let n_frames = conv1d_out_len(len, kernel_len, stride).ok_or_else(|| Error::InvalidArg {
        arg: "input",
        reason: format!("signal length {len} is shorter than kernel length {kernel_len}"),
    })?;

    let mut out = Array3::zeros((batch, channels, n_frames));
    let zip = Zip::from(out.outer_iter_mut()).and(input.outer_iter());
    #[cfg(feature = "rayon")]
    zip.par_for_each(|dst, src| conv_row(src, kernel, stride, dst));
    #[cfg(not(feature = "rayon"))]
    zip.for_each(|dst, src| conv_row(src, kernel, stride, dst));
    Ok(out)
}

/// Transposed counterpart of [`conv1d_strided`]: every frame of every channel
/// is projected back through its kernel row and overlap-added at
/// `frame * stride`.
///
/// `input` is `(batch, C, n_frames)`, `kernel` is `(C, K)` and the output is
/// `(batch, (n_frames - 1) * stride + K)`:
///
/// ```text
/// out[b, t * stride + k] += sum_c input[b, c, t] * kernel[c, k]
/// ```
///
/// # Examples
/// ```
/// use ndarray::array;
/// use batch_stft_core::num_rs::conv_transpose1d_strided;
///
/// let z = array![[[1., 3.], [2., 4.]]];
/// let k = array![[1., 0., 1.], [0., 1., 0.]];
/// let y = conv_transpose1d_strided(z.view(), k.view(), 2).unwrap();
/// assert_eq!(y, array![[1., 2., 4., 4., 3.]]);
/// ```
pub fn conv_transpose1d_strided<T>(
    input: ArrayView3<T>,
    kernel: ArrayView2<T>,
    stride: usize,
) -> Result<Array2<T>>
where
    T: LinalgScalar + Send + Sync,
{
    if stride == 0 {
        return Err(Error::InvalidArg {
            arg: "stride",
            reason: "stride must be > 0".into(),
        });
    }
    let (batch, channels, n_frames) = input.dim();
    let (kernel_channels, kernel_len) = kernel.dim();
    if kernel_len == 0 {
        return Err(Error::InvalidArg {
            arg: "kernel",
            reason: "kernel must hold at least one tap".into(),
        });
    }
    if channels != kernel_channels {
        return Err(Error::ShapeMismatch {
            arg: "input",
            expected: kernel_channels,
            got: channels,
        });
    }

    let out_len = conv_transpose1d_out_len(n_frames, kernel_len, stride);
    let mut out = Array2::zeros((batch, out_len));
    let zip = Zip::from(out.outer_iter_mut()).and(input.outer_iter());
    #[cfg(feature = "rayon")]
    zip.par_for_each(|dst, src| conv_transpose_row(src, kernel, stride, dst));
    #[cfg(not(feature = "rayon"))]
    zip.for_each(|dst, src| conv_transpose_row(src, kernel, stride, dst));
    Ok(out)
}

fn conv_row<T: LinalgScalar>(
    src: ArrayView1<T>,
    kernel: ArrayView2<T>,
    stride: usize,
    mut dst: ArrayViewMut2<T>,
) {
    let n_frames = dst.ncols();
    let kernel_len = kernel.ncols();
    let cols = Array2::from_shape_fn((n_frames, kernel_len), |(frame, k)| {
        src[frame * stride + k]
    });
    general_mat_mul(T::one(), &kernel, &cols.t(), T::zero(), &mut dst);
}

fn conv_transpose_row<T: LinalgScalar>(
    src: ArrayView2<T>,
    kernel: ArrayView2<T>,
    stride: usize,
    mut dst: ArrayViewMut1<T>,
) {
    // (K, n_frames)
    let cols = kernel.t().dot(&src);
    let kernel_len = cols.nrows();
    for (frame, col) in cols.columns().into_iter().enumerate() {
        let start = frame * stride;
        Zip::from(dst.slice_mut(s![start..start + kernel_len]))
            .and(&col)
            .for_each(|acc, &v| *acc = *acc + v);
    }
}
