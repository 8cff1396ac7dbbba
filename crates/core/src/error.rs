//! Engine allocation errors

use thiserror::Error;

/// Failure to allocate one of the shared engine buffers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AllocError {
    #[error("Cache allocation failed")]
    Cache,
    #[error("Dataset allocation failed")]
    Dataset,
}
