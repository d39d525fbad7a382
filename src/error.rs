use thiserror::Error;

use crate::cell::Handle;

/// Errors returned by [`MemorySpace`](crate::MemorySpace) operations.
///
/// A failed operation never changes the space.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MemoryError {
  #[error("invalid allocation size {requested} (must be > 0)")]
  InvalidSize { requested: usize },

  #[error("out of memory (requested: {requested} cells, largest free run: {largest_free})")]
  OutOfMemory { requested: usize, largest_free: usize },

  #[error("handle {0} is not live in this memory space")]
  InvalidHandle(Handle),

  #[error("memory space must have at least one cell")]
  InvalidCapacity,
}

pub type Result<T> = std::result::Result<T, MemoryError>;
