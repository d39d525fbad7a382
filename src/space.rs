use std::{
  collections::BTreeMap,
  fmt,
  sync::atomic::{AtomicU64, Ordering},
};

use tracing::debug;

use crate::{
  cell::{Allocation, Cell, Handle, SpaceId},
  error::{MemoryError, Result},
  layout::{Layout, Run},
  strategy::{Placement, Strategy, StrategyKind},
};

static NEXT_SPACE_ID: AtomicU64 = AtomicU64::new(1);

/// A fixed number of cells handed out in contiguous ranges.
///
/// ```text
///   cells:   [ A A A . . . B B B B . . . . . . ]
///   live:    A -> (0, 3)   B -> (6, 4)
/// ```
///
/// Every occupied cell belongs to exactly one live range, and live ranges
/// never overlap. Failed operations leave the space untouched.
///
/// The space is not synchronized. Callers sharing one across threads must
/// hold a lock around each whole operation.
pub struct MemorySpace {
  id: SpaceId,
  cells: Vec<Cell>,
  live: BTreeMap<Handle, Allocation>,
  strategy: Strategy,
  next_serial: u64,
}

/// A range moved by [`MemorySpace::compact`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Relocation {
  pub from: Handle,
  pub to: Handle,
  pub len: usize,
}

/// Occupancy summary of a memory space.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpaceStats {
  pub total_cells: usize,
  pub free_cells: usize,
  pub allocated_cells: usize,
  pub live_allocations: usize,
  pub free_runs: usize,
  pub largest_free_run: usize,
}

impl SpaceStats {
  /// Share of free cells outside the largest free run, in `[0, 1]`.
  ///
  /// `0.0` means all free space is one run (or nothing is free).
  pub fn fragmentation(&self) -> f64 {
    if self.free_cells == 0 {
      return 0.0;
    }
    1.0 - self.largest_free_run as f64 / self.free_cells as f64
  }
}

impl MemorySpace {
  pub fn new(
    strategy: StrategyKind,
    total_cells: usize,
  ) -> Result<Self> {
    if total_cells == 0 {
      return Err(MemoryError::InvalidCapacity);
    }

    let id = SpaceId(NEXT_SPACE_ID.fetch_add(1, Ordering::Relaxed));
    debug!(space = %id, %strategy, total_cells, "memory space created");

    Ok(Self {
      id,
      cells: vec![Cell::Free; total_cells],
      live: BTreeMap::new(),
      strategy: strategy.build(),
      next_serial: 1,
    })
  }

  pub fn first_fit(total_cells: usize) -> Result<Self> {
    Self::new(StrategyKind::FirstFit, total_cells)
  }

  pub fn best_fit(total_cells: usize) -> Result<Self> {
    Self::new(StrategyKind::BestFit, total_cells)
  }

  pub fn id(&self) -> SpaceId {
    self.id
  }

  pub fn strategy(&self) -> StrategyKind {
    self.strategy.kind()
  }

  pub fn capacity(&self) -> usize {
    self.cells.len()
  }

  pub fn cells(&self) -> &[Cell] {
    &self.cells
  }

  /// Reserves `size` contiguous cells and returns a handle to the first.
  pub fn allocate(
    &mut self,
    size: usize,
  ) -> Result<Handle> {
    if size == 0 {
      debug!(space = %self.id, "rejected zero-sized allocation");
      return Err(MemoryError::InvalidSize { requested: size });
    }

    let Some(start) = self.strategy.find(&self.cells, size) else {
      let largest_free = self.largest_free_run();
      debug!(space = %self.id, size, largest_free, "out of memory");
      return Err(MemoryError::OutOfMemory {
        requested: size,
        largest_free,
      });
    };
    debug_assert!(self.cells[start..start + size].iter().all(|cell| cell.is_free()));

    let serial = self.next_serial;
    self.next_serial += 1;

    self.cells[start..start + size].fill(Cell::Owned(serial));
    self.strategy.allocated(&self.cells, start, size);

    let handle = Handle::new(self.id, start, serial);
    self.live.insert(handle, Allocation { start, len: size });

    debug!(space = %self.id, start, size, serial, "allocated");
    Ok(handle)
  }

  /// Returns the range behind `handle` to free space.
  ///
  /// Fails with [`MemoryError::InvalidHandle`] for handles already released
  /// or issued by another space.
  pub fn release(
    &mut self,
    handle: Handle,
  ) -> Result<()> {
    let Some(allocation) = self.live.remove(&handle) else {
      debug!(space = %self.id, %handle, "release of unknown handle");
      return Err(MemoryError::InvalidHandle(handle));
    };

    self.cells[allocation.start..allocation.end()].fill(Cell::Free);
    self.strategy.released(allocation.start, allocation.len);

    debug!(space = %self.id, start = allocation.start, len = allocation.len, "released");
    Ok(())
  }

  pub fn lookup(
    &self,
    handle: &Handle,
  ) -> Result<Allocation> {
    self
      .live
      .get(handle)
      .copied()
      .ok_or(MemoryError::InvalidHandle(*handle))
  }

  pub fn is_live(
    &self,
    handle: &Handle,
  ) -> bool {
    self.live.contains_key(handle)
  }

  /// Live allocations in ascending start order.
  pub fn allocations(&self) -> impl Iterator<Item = (Handle, Allocation)> + '_ {
    self.live.iter().map(|(handle, allocation)| (*handle, *allocation))
  }

  pub fn layout(&self) -> Layout<'_> {
    Layout::new(&self.cells)
  }

  pub fn stats(&self) -> SpaceStats {
    let (free_runs, free_cells, largest_free_run) = self
      .layout()
      .free_runs()
      .fold((0, 0, 0), |(runs, cells, largest), run| {
        (runs + 1, cells + run.len(), largest.max(run.len()))
      });

    SpaceStats {
      total_cells: self.cells.len(),
      free_cells,
      allocated_cells: self.cells.len() - free_cells,
      live_allocations: self.live.len(),
      free_runs,
      largest_free_run,
    }
  }

  /// Slides every live range down to the low end, leaving one trailing free
  /// run.
  ///
  /// Ranges keep their relative order. Each range that moves gets a new
  /// handle; its old handle stops being live. The returned table lists every
  /// move in ascending order of the new start.
  pub fn compact(&mut self) -> Vec<Relocation> {
    let mut relocations = Vec::new();
    let mut live = BTreeMap::new();
    let mut cursor = 0;

    for (handle, allocation) in std::mem::take(&mut self.live) {
      if allocation.start == cursor {
        live.insert(handle, allocation);
      } else {
        self.cells.copy_within(allocation.start..allocation.end(), cursor);

        let moved = Handle::new(self.id, cursor, handle.serial());
        live.insert(moved, Allocation { start: cursor, len: allocation.len });
        relocations.push(Relocation {
          from: handle,
          to: moved,
          len: allocation.len,
        });
      }
      cursor += allocation.len;
    }

    self.cells[cursor..].fill(Cell::Free);
    self.live = live;
    self.strategy.resync(&self.cells);

    debug!(space = %self.id, moved = relocations.len(), used = cursor, "compacted");
    relocations
  }

  /// Releases every allocation. All outstanding handles become invalid.
  pub fn reset(&mut self) {
    self.cells.fill(Cell::Free);
    self.live.clear();
    self.strategy.resync(&self.cells);

    debug!(space = %self.id, "reset");
  }

  fn largest_free_run(&self) -> usize {
    self.layout().free_runs().map(|run| run.len()).max().unwrap_or(0)
  }
}

impl fmt::Debug for MemorySpace {
  fn fmt(
    &self,
    f: &mut fmt::Formatter<'_>,
  ) -> fmt::Result {
    let stats = self.stats();
    f.debug_struct("MemorySpace")
      .field("id", &self.id)
      .field("strategy", &self.strategy.kind())
      .field("total_cells", &stats.total_cells)
      .field("free_cells", &stats.free_cells)
      .field("live_allocations", &stats.live_allocations)
      .finish()
  }
}

impl<'a> IntoIterator for &'a MemorySpace {
  type Item = Run;
  type IntoIter = crate::layout::Runs<'a>;

  fn into_iter(self) -> Self::IntoIter {
    self.layout().runs()
  }
}
