use fieldscape_kernel::KernelError;

/// Errors from building or updating scene buffers.
#[derive(Debug, thiserror::Error)]
pub enum SceneError {
    #[error("terrain needs at least one segment per side")]
    EmptyGrid,
    #[error("terrain size must be positive and finite, got {0}")]
    InvalidSize(f32),
    #[error("particle cloud needs at least one particle")]
    EmptyCloud,
    #[error("particle size must be positive and finite, got {0}")]
    InvalidParticleSize(f32),
    #[error("kernel error: {0}")]
    Kernel(#[from] KernelError),
}
