use tracing::trace;

use super::Placement;
use crate::{
  cell::Cell,
  layout::{Run, Runs},
};

/// Takes the smallest free run that is large enough.
///
/// Every request scans the whole array. Among equally small candidates the
/// one with the lowest start index wins.
#[derive(Debug, Clone, Default)]
pub struct BestFit;

impl BestFit {
  pub fn new() -> Self {
    Self
  }
}

impl Placement for BestFit {
  fn find(
    &mut self,
    cells: &[Cell],
    size: usize,
  ) -> Option<usize> {
    let mut best: Option<Run> = None;

    for run in Runs::new(cells).filter(|run| run.is_free() && run.len() >= size) {
      // strict `<` keeps the earliest run on ties
      if best.is_none_or(|current| run.len() < current.len()) {
        best = Some(run);
      }
      if run.len() == size {
        break;
      }
    }

    trace!(size, best = ?best.map(|run| (run.start, run.len())), "best-fit scan");
    best.map(|run| run.start)
  }
}
