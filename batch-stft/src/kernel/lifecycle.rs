use super::ConfigError;

/// Constructor validation lifecycle shared by kernel structs.
///
/// All validation happens in [`KernelLifecycle::try_new`]; a constructed
/// kernel is immutable and its entrypoints only check input shapes.
pub trait KernelLifecycle: Sized {
    /// Kernel config type.
    type Config;

    /// Construct a validated kernel from config.
    fn try_new(config: Self::Config) -> Result<Self, ConfigError>;
}
