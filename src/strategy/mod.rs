use std::{fmt, str::FromStr};

use thiserror::Error;

use crate::cell::Cell;

mod best_fit;
mod first_fit;

pub use best_fit::BestFit;
pub use first_fit::FirstFit;

/// How a memory space chooses the gap that satisfies a request.
///
/// The space marks cells and records handles itself; a placement only picks
/// a start index and is told about every change it may want to track.
pub trait Placement {
  /// Returns the start of a free run of at least `size` cells, or `None`
  /// when no run qualifies. `size` is never zero.
  fn find(
    &mut self,
    cells: &[Cell],
    size: usize,
  ) -> Option<usize>;

  /// Called after `len` cells at `start` have been marked occupied.
  fn allocated(
    &mut self,
    _cells: &[Cell],
    _start: usize,
    _len: usize,
  ) {
  }

  /// Called after `len` cells at `start` have been cleared.
  fn released(
    &mut self,
    _start: usize,
    _len: usize,
  ) {
  }

  /// Called after the cell array changed wholesale (reset, compaction).
  fn resync(
    &mut self,
    _cells: &[Cell],
  ) {
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StrategyKind {
  FirstFit,
  BestFit,
}

impl StrategyKind {
  pub const ALL: [StrategyKind; 2] = [StrategyKind::FirstFit, StrategyKind::BestFit];

  pub(crate) fn build(self) -> Strategy {
    match self {
      StrategyKind::FirstFit => Strategy::FirstFit(FirstFit::new()),
      StrategyKind::BestFit => Strategy::BestFit(BestFit::new()),
    }
  }
}

impl fmt::Display for StrategyKind {
  fn fmt(
    &self,
    f: &mut fmt::Formatter<'_>,
  ) -> fmt::Result {
    match self {
      StrategyKind::FirstFit => f.write_str("first-fit"),
      StrategyKind::BestFit => f.write_str("best-fit"),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown strategy `{0}` (expected first-fit or best-fit)")]
pub struct UnknownStrategy(pub String);

impl FromStr for StrategyKind {
  type Err = UnknownStrategy;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_ascii_lowercase().as_str() {
      "first-fit" | "firstfit" | "first_fit" | "ff" => Ok(StrategyKind::FirstFit),
      "best-fit" | "bestfit" | "best_fit" | "bf" => Ok(StrategyKind::BestFit),
      _ => Err(UnknownStrategy(s.to_string())),
    }
  }
}

/// The placement a memory space was built with.
#[derive(Debug, Clone)]
pub(crate) enum Strategy {
  FirstFit(FirstFit),
  BestFit(BestFit),
}

impl Strategy {
  pub(crate) fn kind(&self) -> StrategyKind {
    match self {
      Strategy::FirstFit(_) => StrategyKind::FirstFit,
      Strategy::BestFit(_) => StrategyKind::BestFit,
    }
  }

  fn placement(&mut self) -> &mut dyn Placement {
    match self {
      Strategy::FirstFit(first_fit) => first_fit,
      Strategy::BestFit(best_fit) => best_fit,
    }
  }
}

impl Placement for Strategy {
  fn find(
    &mut self,
    cells: &[Cell],
    size: usize,
  ) -> Option<usize> {
    self.placement().find(cells, size)
  }

  fn allocated(
    &mut self,
    cells: &[Cell],
    start: usize,
    len: usize,
  ) {
    self.placement().allocated(cells, start, len)
  }

  fn released(
    &mut self,
    start: usize,
    len: usize,
  ) {
    self.placement().released(start, len)
  }

  fn resync(
    &mut self,
    cells: &[Cell],
  ) {
    self.placement().resync(cells)
  }
}
