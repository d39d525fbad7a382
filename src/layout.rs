use std::fmt;

use crate::{cell::Cell, space::MemorySpace};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RunStatus {
  Free,
  Allocated,
}

impl RunStatus {
  fn of(cell: Cell) -> Self {
    if cell.is_free() {
      RunStatus::Free
    } else {
      RunStatus::Allocated
    }
  }
}

impl fmt::Display for RunStatus {
  fn fmt(
    &self,
    f: &mut fmt::Formatter<'_>,
  ) -> fmt::Result {
    match self {
      RunStatus::Free => f.write_str("Free"),
      RunStatus::Allocated => f.write_str("Allocated"),
    }
  }
}

/// A stretch of cells with one status (and one owner, when allocated). `end`
/// is inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Run {
  pub start: usize,
  pub end: usize,
  pub status: RunStatus,
}

impl Run {
  pub fn len(&self) -> usize {
    self.end - self.start + 1
  }

  pub fn is_free(&self) -> bool {
    self.status == RunStatus::Free
  }
}

impl fmt::Display for Run {
  fn fmt(
    &self,
    f: &mut fmt::Formatter<'_>,
  ) -> fmt::Result {
    write!(f, "| {} - {} | {}", self.start, self.end, self.status)
  }
}

/// Iterator over the runs of a cell slice, left to right.
///
/// Free runs are maximal. An allocated run ends where its owner changes, so
/// two adjacent allocations are reported separately, though the status does
/// not name the owner.
#[derive(Debug, Clone)]
pub struct Runs<'a> {
  cells: &'a [Cell],
  pos: usize,
}

impl<'a> Runs<'a> {
  pub fn new(cells: &'a [Cell]) -> Self {
    Self::starting_at(cells, 0)
  }

  /// Starts the scan at `pos`. The first run reported begins at `pos` even
  /// if the cell before it is the same.
  pub(crate) fn starting_at(
    cells: &'a [Cell],
    pos: usize,
  ) -> Self {
    Self { cells, pos }
  }
}

impl Iterator for Runs<'_> {
  type Item = Run;

  fn next(&mut self) -> Option<Run> {
    let start = self.pos;
    let first = *self.cells.get(start)?;

    let mut end = start;
    while end + 1 < self.cells.len() && self.cells[end + 1] == first {
      end += 1;
    }

    self.pos = end + 1;
    Some(Run {
      start,
      end,
      status: RunStatus::of(first),
    })
  }
}

impl std::iter::FusedIterator for Runs<'_> {}

/// Read-only view of a memory space's layout.
///
/// Iterating it (any number of times) yields the runs covering the whole
/// space. Formatting it renders one `| start - end | Status` line per run.
#[derive(Debug, Clone, Copy)]
pub struct Layout<'a> {
  cells: &'a [Cell],
}

impl<'a> Layout<'a> {
  pub fn new(cells: &'a [Cell]) -> Self {
    Self { cells }
  }

  pub fn runs(&self) -> Runs<'a> {
    Runs::new(self.cells)
  }

  pub fn free_runs(&self) -> impl Iterator<Item = Run> + use<'a> {
    self.runs().filter(Run::is_free)
  }
}

impl<'a> IntoIterator for Layout<'a> {
  type Item = Run;
  type IntoIter = Runs<'a>;

  fn into_iter(self) -> Runs<'a> {
    self.runs()
  }
}

impl<'a> IntoIterator for &Layout<'a> {
  type Item = Run;
  type IntoIter = Runs<'a>;

  fn into_iter(self) -> Runs<'a> {
    self.runs()
  }
}

impl fmt::Display for Layout<'_> {
  fn fmt(
    &self,
    f: &mut fmt::Formatter<'_>,
  ) -> fmt::Result {
    for run in self.runs() {
      writeln!(f, "{run}")?;
    }
    Ok(())
  }
}

/// Prints the layout of `space` to stdout.
///
/// ```text
/// | 0 - 110 | Allocated
/// | 111 - 150 | Free
/// | 151 - 999 | Allocated
/// | 1000 - 1023 | Free
/// ```
pub fn print_layout(space: &MemorySpace) {
  print!("{}", space.layout());
}
