use thiserror::Error;

/// Errors reported by the rendering core.
#[derive(Debug, Error)]
pub enum RenderError {
    /// Matrix product with incompatible shapes.
    #[error("cannot multiply matrix({left_rows},{left_cols}) with matrix({right_rows},{right_cols})")]
    DimensionMismatch {
        left_rows: usize,
        left_cols: usize,
        right_rows: usize,
        right_cols: usize,
    },
}

pub type Result<T> = std::result::Result<T, RenderError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dimension_mismatch_display() {
        let err = RenderError::DimensionMismatch {
            left_rows: 4,
            left_cols: 4,
            right_rows: 3,
            right_cols: 1,
        };
        let msg = format!("{err}");
        assert!(msg.contains("matrix(4,4)"));
        assert!(msg.contains("matrix(3,1)"));
    }
}
