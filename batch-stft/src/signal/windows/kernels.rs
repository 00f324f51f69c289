//! Trait-first window generation kernels.

use crate::kernel::{ConfigError, KernelLifecycle};
use crate::signal::traits::WindowGenerate;
use crate::StftFloat;
use ndarray::Array1;

use super::{get_window, WindowFunction};

/// Constructor config for [`WindowKernel`].
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WindowConfig {
    /// Window family and parameters.
    pub function: WindowFunction,
    /// Output length.
    pub len: usize,
    /// Periodic (`true`) or symmetric (`false`) evaluation.
    pub periodic: bool,
}

/// Trait-first window generation kernel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowKernel {
    function: WindowFunction,
    len: usize,
    periodic: bool,
}

impl WindowKernel {
    /// Configured window family.
    pub fn function(&self) -> WindowFunction {
        self.function
    }

    /// Configured window length.
    pub fn window_len(&self) -> usize {
        self.len
    }

    /// Whether the window was configured as periodic.
    pub fn periodic(&self) -> bool {
        self.periodic
    }
}

impl KernelLifecycle for WindowKernel {
    type Config = WindowConfig;

    fn try_new(config: Self::Config) -> Result<Self, ConfigError> {
        if config.len <= 1 {
            return Err(ConfigError::InvalidArgument {
                arg: "len",
                reason: "window length must be greater than 1",
            });
        }
        if let WindowFunction::Kaiser { beta } = config.function {
            if !beta.is_finite() || beta < 0.0 {
                return Err(ConfigError::InvalidArgument {
                    arg: "beta",
                    reason: "kaiser beta must be finite and >= 0",
                });
            }
        }

        Ok(Self {
            function: config.function,
            len: config.len,
            periodic: config.periodic,
        })
    }
}

impl<F> WindowGenerate<F> for WindowKernel
where
    F: StftFloat,
{
    fn run_alloc(&self) -> Array1<F> {
        get_window(self.function, self.len, self.periodic)
    }
}
