use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("adherence ratio must lie in [0, 1], got {0}")]
    InvalidRatio(f64),
}
