use std::path::PathBuf;

/// Errors from kernel calls and kernel construction.
#[derive(Debug, thiserror::Error)]
pub enum KernelError {
    #[error("invalid argument: particle index {index} is outside [0, {count})")]
    InvalidArgument { index: usize, count: usize },
    #[error("invalid kernel config: {0}")]
    Config(#[from] ConfigError),
}

/// Errors from loading or validating a [`KernelConfig`](crate::KernelConfig).
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("{field} must be finite")]
    NotFinite { field: &'static str },
    #[error("{field} = {value} is out of range: {reason}")]
    OutOfRange {
        field: &'static str,
        value: f32,
        reason: &'static str,
    },
}
