//! Placement behaviour of both strategies through the public API.

use cellspace::{Cell, MemoryError, MemorySpace, Run, RunStatus, StrategyKind};
use pretty_assertions::assert_eq;
use rstest::rstest;

fn runs(space: &MemorySpace) -> Vec<(usize, usize, RunStatus)> {
  space.layout().runs().map(|run| (run.start, run.end, run.status)).collect()
}

/// Builds `[10 free][2 used][5 free][rest used]` at the bottom of a 20-cell
/// space, returning the space.
fn ten_then_five(kind: StrategyKind) -> MemorySpace {
  let mut space = MemorySpace::new(kind, 20).unwrap();
  let low = space.allocate(10).unwrap();
  space.allocate(2).unwrap();
  let high = space.allocate(5).unwrap();
  space.allocate(3).unwrap();
  space.release(low).unwrap();
  space.release(high).unwrap();
  space
}

#[rstest]
#[case(StrategyKind::FirstFit, 0)]
#[case(StrategyKind::BestFit, 12)]
fn test_ten_then_five(
  #[case] kind: StrategyKind,
  #[case] expected_start: usize,
) {
  let mut space = ten_then_five(kind);
  let handle = space.allocate(5).unwrap();
  assert_eq!(handle.start(), expected_start);
}

#[rstest]
fn test_example_scenario(#[values(StrategyKind::FirstFit, StrategyKind::BestFit)] kind: StrategyKind) {
  let mut space = MemorySpace::new(kind, 1024).unwrap();

  let a = space.allocate(111).unwrap();
  let b = space.allocate(849).unwrap();
  assert_eq!(a.start(), 0);
  assert_eq!(b.start(), 111);

  assert_eq!(
    runs(&space),
    vec![
      (0, 110, RunStatus::Allocated),
      (111, 959, RunStatus::Allocated),
      (960, 1023, RunStatus::Free),
    ]
  );
  assert_eq!(
    space.layout().to_string(),
    "| 0 - 110 | Allocated\n| 111 - 959 | Allocated\n| 960 - 1023 | Free\n"
  );
}

#[rstest]
fn test_exhaustion(
  #[values(StrategyKind::FirstFit, StrategyKind::BestFit)] kind: StrategyKind,
  #[values(1, 7, 64)] total: usize,
) {
  let mut space = MemorySpace::new(kind, total).unwrap();

  space.allocate(total).unwrap();
  assert_eq!(
    space.allocate(1),
    Err(MemoryError::OutOfMemory { requested: 1, largest_free: 0 })
  );
  assert_eq!(runs(&space), vec![(0, total - 1, RunStatus::Allocated)]);
}

#[rstest]
fn test_oversized_request(#[values(StrategyKind::FirstFit, StrategyKind::BestFit)] kind: StrategyKind) {
  let mut space = MemorySpace::new(kind, 16).unwrap();
  let before = space.cells().to_vec();

  assert!(matches!(space.allocate(17), Err(MemoryError::OutOfMemory { requested: 17, .. })));
  assert_eq!(space.cells(), before.as_slice());
}

#[rstest]
fn test_double_release(#[values(StrategyKind::FirstFit, StrategyKind::BestFit)] kind: StrategyKind) {
  let mut space = MemorySpace::new(kind, 32).unwrap();
  let a = space.allocate(8).unwrap();
  space.allocate(4).unwrap();

  space.release(a).unwrap();
  let after_first = space.cells().to_vec();
  let stats = space.stats();

  assert_eq!(space.release(a), Err(MemoryError::InvalidHandle(a)));
  assert_eq!(space.cells(), after_first.as_slice());
  assert_eq!(space.stats(), stats);
}

#[rstest]
fn test_round_trip_restores_cells(#[values(StrategyKind::FirstFit, StrategyKind::BestFit)] kind: StrategyKind) {
  let mut space = MemorySpace::new(kind, 40).unwrap();
  let a = space.allocate(5).unwrap();
  space.allocate(9).unwrap();
  space.release(a).unwrap();

  let before = space.cells().to_vec();
  let handle = space.allocate(3).unwrap();
  space.release(handle).unwrap();

  assert_eq!(space.cells(), before.as_slice());
}

#[test]
fn test_first_fit_reuses_hole_below_resume_point() {
  let mut space = MemorySpace::first_fit(30).unwrap();
  let a = space.allocate(5).unwrap();
  let b = space.allocate(5).unwrap();
  space.allocate(5).unwrap();

  // a hole above the low-water mark, then one below it
  space.release(b).unwrap();
  space.release(a).unwrap();

  // the two holes merged into one 10-cell run at 0
  assert_eq!(space.allocate(10).unwrap().start(), 0);
  assert_eq!(space.allocate(3).unwrap().start(), 15);
}

#[test]
fn test_best_fit_exact_match_beats_earlier_larger_runs() {
  let mut space = MemorySpace::best_fit(40).unwrap();
  let holes: Vec<_> = [8, 6, 4, 6]
    .iter()
    .map(|&len| {
      let hole = space.allocate(len).unwrap();
      space.allocate(1).unwrap();
      hole
    })
    .collect();
  for hole in holes {
    space.release(hole).unwrap();
  }

  // holes: 8@0, 6@9, 4@16, 6@21, tail 12@28
  assert_eq!(space.allocate(4).unwrap().start(), 16);
  assert_eq!(space.allocate(5).unwrap().start(), 9);
  assert_eq!(space.allocate(6).unwrap().start(), 21);
  assert_eq!(space.allocate(9).unwrap().start(), 28);
}

#[test]
fn test_adjacent_allocations_render_as_separate_runs() {
  let mut space = MemorySpace::first_fit(6).unwrap();
  let a = space.allocate(2).unwrap();
  let b = space.allocate(2).unwrap();

  assert_eq!(space.cells()[1], Cell::Owned(1));
  assert_eq!(space.cells()[2], Cell::Owned(2));
  assert_ne!(a, b);

  let all: Vec<Run> = (&space).into_iter().collect();
  assert_eq!(all.len(), 3);
  assert_eq!((all[0].start, all[0].len()), (a.start(), 2));
  assert_eq!((all[1].start, all[1].len()), (b.start(), 2));
  assert!(all[2].is_free());

  // freeing both merges them with the tail into one free run
  space.release(a).unwrap();
  space.release(b).unwrap();
  assert_eq!(runs(&space), vec![(0, 5, RunStatus::Free)]);
}

#[rstest]
fn test_one_run_per_allocation(#[values(StrategyKind::FirstFit, StrategyKind::BestFit)] kind: StrategyKind) {
  let mut space = MemorySpace::new(kind, 10).unwrap();
  for len in [3, 1, 4, 2] {
    space.allocate(len).unwrap();
  }

  assert_eq!(
    space.layout().to_string(),
    "| 0 - 2 | Allocated\n| 3 - 3 | Allocated\n| 4 - 7 | Allocated\n| 8 - 9 | Allocated\n"
  );
}

#[test]
fn test_compact_then_allocate_everywhere() {
  for kind in StrategyKind::ALL {
    let mut space = MemorySpace::new(kind, 12).unwrap();
    let handles: Vec<_> = (0..6).map(|_| space.allocate(2).unwrap()).collect();
    for handle in handles.iter().step_by(2) {
      space.release(*handle).unwrap();
    }
    assert_eq!(space.stats().largest_free_run, 2);
    assert!(space.allocate(3).is_err());

    let relocations = space.compact();
    assert_eq!(relocations.len(), 3);
    for relocation in &relocations {
      assert!(!space.is_live(&relocation.from));
      assert!(space.is_live(&relocation.to));
      assert!(relocation.to.start() < relocation.from.start());
    }

    assert_eq!(
      runs(&space),
      vec![
        (0, 1, RunStatus::Allocated),
        (2, 3, RunStatus::Allocated),
        (4, 5, RunStatus::Allocated),
        (6, 11, RunStatus::Free),
      ]
    );
    assert_eq!(space.allocate(6).unwrap().start(), 6);
  }
}
