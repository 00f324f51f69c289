use alloc::vec::Vec;
use ndarray::{
    Array1, Array2, Array3, ArrayView1, ArrayView2, ArrayView3, ArrayViewMut2, ArrayViewMut3,
};

/// Adapter trait for reading a single 1D signal or window.
pub trait Read1D<T> {
    /// Borrow the underlying samples as a 1D view.
    fn read_view(&self) -> ArrayView1<'_, T>;
}

/// Adapter trait for reading a `(batch, samples)` signal batch.
pub trait ReadBatch<T> {
    /// Borrow the underlying batch as a 2D view.
    fn read_batch(&self) -> ArrayView2<'_, T>;
}

/// Adapter trait for writing a `(batch, samples)` signal batch.
pub trait WriteBatch<T> {
    /// Borrow the underlying batch as a mutable 2D view.
    fn write_batch_mut(&mut self) -> ArrayViewMut2<'_, T>;
}

/// Adapter trait for reading a `(batch, channels, frames)` spectrum batch.
pub trait ReadSpectrum<T> {
    /// Borrow the underlying spectrum as a 3D view.
    fn read_spectrum(&self) -> ArrayView3<'_, T>;
}

/// Adapter trait for writing a `(batch, channels, frames)` spectrum batch.
pub trait WriteSpectrum<T> {
    /// Borrow the underlying spectrum as a mutable 3D view.
    fn write_spectrum_mut(&mut self) -> ArrayViewMut3<'_, T>;
}

impl<T> Read1D<T> for [T] {
    fn read_view(&self) -> ArrayView1<'_, T> {
        ArrayView1::from(self)
    }
}

impl<T, const N: usize> Read1D<T> for [T; N] {
    fn read_view(&self) -> ArrayView1<'_, T> {
        ArrayView1::from(&self[..])
    }
}

impl<T> Read1D<T> for Vec<T> {
    fn read_view(&self) -> ArrayView1<'_, T> {
        ArrayView1::from(self.as_slice())
    }
}

impl<T> Read1D<T> for Array1<T> {
    fn read_view(&self) -> ArrayView1<'_, T> {
        self.view()
    }
}

impl<'a, T> Read1D<T> for ArrayView1<'a, T> {
    fn read_view(&self) -> ArrayView1<'_, T> {
        self.view()
    }
}

impl<T> ReadBatch<T> for Array2<T> {
    fn read_batch(&self) -> ArrayView2<'_, T> {
        self.view()
    }
}

impl<'a, T> ReadBatch<T> for ArrayView2<'a, T> {
    fn read_batch(&self) -> ArrayView2<'_, T> {
        self.view()
    }
}

impl<T> WriteBatch<T> for Array2<T> {
    fn write_batch_mut(&mut self) -> ArrayViewMut2<'_, T> {
        self.view_mut()
    }
}

impl<'a, T> WriteBatch<T> for ArrayViewMut2<'a, T> {
    fn write_batch_mut(&mut self) -> ArrayViewMut2<'_, T> {
        self.view_mut()
    }
}

impl<T> ReadSpectrum<T> for Array3<T> {
    fn read_spectrum(&self) -> ArrayView3<'_, T> {
        self.view()
    }
}

impl<'a, T> ReadSpectrum<T> for ArrayView3<'a, T> {
    fn read_spectrum(&self) -> ArrayView3<'_, T> {
        self.view()
    }
}

impl<T> WriteSpectrum<T> for Array3<T> {
    fn write_spectrum_mut(&mut self) -> ArrayViewMut3<'_, T> {
        self.view_mut()
    }
}

impl<'a, T> WriteSpectrum<T> for ArrayViewMut3<'a, T> {
    fn write_spectrum_mut(&mut self) -> ArrayViewMut3<'_, T> {
        self.view_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;
    use ndarray::{s, Array3};

    #[test]
    fn slice_vec_and_array_adapters() {
        let a = [1.0f32, 2.0, 3.0];
        assert_eq!(a.read_view().len(), 3);

        let v = vec![1.0f64, 2.0, 3.0, 4.0];
        assert_eq!(v.read_view()[3], 4.0);

        let arr = Array1::from(v.clone());
        assert_eq!(arr.read_view(), arr.view());
    }

    #[test]
    fn batch_adapters_accept_strided_views() {
        let full = Array2::from_shape_fn((4, 6), |(b, t)| (b * 10 + t) as f64);
        let every_other = full.slice(s![..;2, ..]);
        let view = every_other.read_batch();
        assert_eq!(view.dim(), (2, 6));
        assert_eq!(view[[1, 5]], 25.0);

        let mut out = Array2::<f64>::zeros((2, 3));
        out.write_batch_mut().fill(1.5);
        assert!(out.iter().all(|v| *v == 1.5));
    }

    #[test]
    fn spectrum_adapters_round_trip_views() {
        let mut spectrum = Array3::<f64>::zeros((1, 4, 2));
        spectrum.write_spectrum_mut()[[0, 3, 1]] = 7.0;
        assert_eq!(spectrum.read_spectrum()[[0, 3, 1]], 7.0);

        let mut view = spectrum.view_mut();
        view.write_spectrum_mut()[[0, 0, 0]] = -1.0;
        assert_eq!(spectrum[[0, 0, 0]], -1.0);
    }
}
