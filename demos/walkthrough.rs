use std::io::Read;

use anyhow::Result;
use cellspace::{MemoryError, MemorySpace, StrategyKind, print_layout};
use clap::Parser;
use tracing_subscriber::EnvFilter;

/// Walks a memory space through a series of allocations and releases,
/// printing the layout after each step.
#[derive(Debug, Parser)]
#[command(name = "walkthrough")]
struct Args {
  /// Placement strategy: first-fit or best-fit.
  #[arg(short, long, default_value = "first-fit")]
  strategy: StrategyKind,

  /// Number of cells in the space (at least 8, so every step fits).
  #[arg(short, long, default_value_t = 1024, value_parser = clap::value_parser!(u64).range(MIN_CELLS..))]
  cells: u64,

  /// Wait for ENTER between steps.
  #[arg(long)]
  step: bool,
}

const MIN_CELLS: u64 = 8;

/// Waits until the user presses ENTER.
fn block_until_enter_pressed(enabled: bool) {
  if !enabled {
    return;
  }
  println!("\n>>> Press ENTER to continue...");
  let _ = std::io::stdin().bytes().next();
}

fn show(
  label: &str,
  space: &MemorySpace,
) {
  let stats = space.stats();
  println!(
    "\n[{}] {} free / {} cells, {} live, fragmentation {:.2}",
    label,
    stats.free_cells,
    stats.total_cells,
    stats.live_allocations,
    stats.fragmentation(),
  );
  print_layout(space);
}

fn main() -> Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::from_default_env())
    .init();

  run(&Args::parse())
}

fn run(args: &Args) -> Result<()> {
  let mut space = MemorySpace::new(args.strategy, usize::try_from(args.cells)?)?;
  let cells = space.capacity();

  show(&format!("start, {}", space.strategy()), &space);
  block_until_enter_pressed(args.step);

  // 1) Two neighbours at the bottom of the space.
  let a = space.allocate((cells / 4).max(1))?;
  let _b = space.allocate((cells / 20).max(1))?;
  show("1: allocate a and b", &space);
  block_until_enter_pressed(args.step);

  // 2) A medium block, then a small gap-maker behind it.
  let c = space.allocate((cells / 10).max(1))?;
  let _d = space.allocate((cells / 20).max(1))?;
  show("2: allocate c and d", &space);
  block_until_enter_pressed(args.step);

  // 3) Free a (large hole at the bottom) and c (smaller hole above it).
  space.release(a)?;
  space.release(c)?;
  show("3: release a and c", &space);
  block_until_enter_pressed(args.step);

  // 4) Where a small request lands depends on the strategy.
  let e = space.allocate((cells / 20).max(1))?;
  println!("\n[4] small request placed at {}", e.start());
  show("4: allocate e", &space);
  block_until_enter_pressed(args.step);

  // 5) Releasing twice is caught.
  match space.release(a) {
    Err(MemoryError::InvalidHandle(handle)) => println!("\n[5] second release of {handle} rejected"),
    other => println!("\n[5] unexpected result: {other:?}"),
  }
  block_until_enter_pressed(args.step);

  // 6) Compaction gathers the free space into one run.
  let relocations = space.compact();
  for relocation in &relocations {
    println!(
      "[6] moved {} cells: {} -> {}",
      relocation.len,
      relocation.from.start(),
      relocation.to.start()
    );
  }
  show("6: compact", &space);
  block_until_enter_pressed(args.step);

  // 7) Fill the rest and ask for one more cell.
  let free = space.stats().largest_free_run;
  if free > 0 {
    space.allocate(free)?;
  }
  match space.allocate(1) {
    Err(err) => println!("\n[7] {err}"),
    Ok(handle) => println!("\n[7] unexpected allocation at {}", handle.start()),
  }
  show("7: exhausted", &space);

  println!("\n[8] End of walkthrough.");
  Ok(())
}
