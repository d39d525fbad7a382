use std::fmt;

/// One unit of the simulated memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Cell {
  #[default]
  Free,
  /// Occupied by the allocation with this serial.
  Owned(u64),
}

impl Cell {
  pub fn is_free(self) -> bool {
    matches!(self, Cell::Free)
  }
}

/// Identity of one [`MemorySpace`](crate::MemorySpace) instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SpaceId(pub(crate) u64);

impl fmt::Display for SpaceId {
  fn fmt(
    &self,
    f: &mut fmt::Formatter<'_>,
  ) -> fmt::Result {
    write!(f, "space#{}", self.0)
  }
}

/// Opaque reference to a live allocation.
///
/// Only produced by a successful allocation (or a compaction relocation).
/// Handles are plain values: copying one does not extend the allocation,
/// and a handle stays comparable after its allocation is released.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Handle {
  space: SpaceId,
  start: usize,
  serial: u64,
}

impl Handle {
  pub(crate) fn new(
    space: SpaceId,
    start: usize,
    serial: u64,
  ) -> Self {
    Self { space, start, serial }
  }

  /// Index of the first cell of the allocation.
  pub fn start(&self) -> usize {
    self.start
  }

  pub fn space(&self) -> SpaceId {
    self.space
  }

  pub(crate) fn serial(&self) -> u64 {
    self.serial
  }
}

impl fmt::Display for Handle {
  fn fmt(
    &self,
    f: &mut fmt::Formatter<'_>,
  ) -> fmt::Result {
    write!(f, "{}@{} (#{})", self.space, self.start, self.serial)
  }
}

/// The `(start, len)` range recorded for a live handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Allocation {
  pub start: usize,
  pub len: usize,
}

impl Allocation {
  /// One past the last cell.
  pub fn end(&self) -> usize {
    self.start + self.len
  }
}
