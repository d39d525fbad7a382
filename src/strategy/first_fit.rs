use tracing::trace;

use super::Placement;
use crate::{cell::Cell, layout::Runs};

/// Takes the lowest-addressed free run that is large enough.
///
/// Scans resume at a low-water mark instead of index 0: every cell below
/// `first_free` is occupied, and `first_free` is either a free cell or the
/// end of the array.
#[derive(Debug, Clone, Default)]
pub struct FirstFit {
  first_free: usize,
}

impl FirstFit {
  pub fn new() -> Self {
    Self { first_free: 0 }
  }

  /// Where the next scan will begin.
  pub fn resume_position(&self) -> usize {
    self.first_free
  }

  fn skip_occupied(
    &mut self,
    cells: &[Cell],
  ) {
    while self.first_free < cells.len() && !cells[self.first_free].is_free() {
      self.first_free += 1;
    }
  }
}

impl Placement for FirstFit {
  fn find(
    &mut self,
    cells: &[Cell],
    size: usize,
  ) -> Option<usize> {
    let found = Runs::starting_at(cells, self.first_free)
      .filter(|run| run.is_free())
      .find(|run| run.len() >= size)
      .map(|run| run.start);

    trace!(size, from = self.first_free, ?found, "first-fit scan");
    found
  }

  fn allocated(
    &mut self,
    cells: &[Cell],
    start: usize,
    len: usize,
  ) {
    if start == self.first_free {
      self.first_free = start + len;
      self.skip_occupied(cells);
    }
  }

  fn released(
    &mut self,
    start: usize,
    _len: usize,
  ) {
    self.first_free = self.first_free.min(start);
  }

  fn resync(
    &mut self,
    cells: &[Cell],
  ) {
    self.first_free = 0;
    self.skip_occupied(cells);
  }
}
