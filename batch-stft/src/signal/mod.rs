/// Real Fourier basis construction.
pub mod fourier;

/// Batched STFT analysis and ISTFT synthesis kernels.
pub mod stft;

/// Trait interfaces for signal-processing capabilities.
pub mod traits;

/// Analysis windows and COLA-satisfying synthesis windows.
pub mod windows;
