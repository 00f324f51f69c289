//! Shared trait-first kernel substrate.
//!
//! This module defines the constructor validation lifecycle, the error types
//! raised at construction and call time, and the batch buffer adapters used by
//! every transform kernel.

mod errors;
mod io;
mod lifecycle;

pub use errors::*;
pub use io::*;
pub use lifecycle::*;
