/// Errors raised while building a scene
use thiserror::Error;

/// Errors from procedural tile layout generation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LayoutError {
    #[error("invalid extra tile range: {min_extra}..={max_extra}")]
    InvalidRange { min_extra: usize, max_extra: usize },
    #[error("gave up after {attempts} placement attempts with {placed} of {target} tiles")]
    AttemptsExhausted {
        attempts: usize,
        placed: usize,
        target: usize,
    },
}

/// Errors from scene construction.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SceneError {
    #[error("a scene needs at least one tile")]
    EmptyScene,
    #[error("active tile {index} is out of range for {len} tiles")]
    ActiveOutOfRange { index: usize, len: usize },
    #[error(transparent)]
    Layout(#[from] LayoutError),
}
