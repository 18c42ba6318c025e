/// Errors building a height field.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TerrainError {
    #[error("height grid needs at least 2x2 samples, got {cols}x{rows}")]
    GridTooSmall { cols: usize, rows: usize },

    #[error("grid spacing must be positive, got {0}")]
    InvalidSpacing(f32),

    #[error("expected {expected} height samples, got {actual}")]
    SampleCountMismatch { expected: usize, actual: usize },
}
