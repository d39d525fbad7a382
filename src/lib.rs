//! # cellspace - A Simulated Linear Memory
//!
//! This crate simulates a fixed number of addressable cells handed out in
//! contiguous ranges by a pluggable placement strategy.
//!
//! ## Overview
//!
//! A [`MemorySpace`] owns an array of cells. Each cell is either free or
//! tagged with the allocation that owns it:
//!
//! ```text
//!   Memory Space (16 cells):
//!
//!   ┌───┬───┬───┬───┬───┬───┬───┬───┬───┬───┬───┬───┬───┬───┬───┬───┐
//!   │ A │ A │ A │   │   │   │ B │ B │ B │ B │   │   │   │   │   │   │
//!   └───┴───┴───┴───┴───┴───┴───┴───┴───┴───┴───┴───┴───┴───┴───┴───┘
//!     0           3           6              10                    15
//!     ▲                       ▲
//!     └─ handle A (0, 3)      └─ handle B (6, 4)
//!
//!   Layout:
//!   | 0 - 2 | Allocated
//!   | 3 - 5 | Free
//!   | 6 - 9 | Allocated
//!   | 10 - 15 | Free
//! ```
//!
//! ## Strategies
//!
//! ```text
//!   Free runs:    [ 10 cells @ 0 ]  ...  [ 5 cells @ 20 ]
//!   Request:      5 cells
//!
//!   First-Fit ──► lowest run that is large enough     ──► starts at 0
//!   Best-Fit  ──► smallest run that is large enough   ──► starts at 20
//! ```
//!
//! - **First-fit** resumes its scan at the lowest free cell, so it never
//!   walks the fully packed prefix again.
//! - **Best-fit** scans the whole array on every request and takes the
//!   tightest run; ties go to the lowest start index.
//!
//! ## Crate Structure
//!
//! ```text
//!   cellspace
//!   ├── cell       - Cell, Handle, Allocation
//!   ├── error      - MemoryError
//!   ├── layout     - Run iteration and textual layout
//!   ├── space      - MemorySpace
//!   └── strategy   - Placement trait, FirstFit, BestFit
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use cellspace::{MemorySpace, StrategyKind};
//!
//! let mut space = MemorySpace::new(StrategyKind::FirstFit, 1024).unwrap();
//!
//! let a = space.allocate(111).unwrap();
//! let b = space.allocate(849).unwrap();
//! assert_eq!(b.start(), 111);
//!
//! assert_eq!(
//!   space.layout().to_string(),
//!   "| 0 - 110 | Allocated\n| 111 - 959 | Allocated\n| 960 - 1023 | Free\n",
//! );
//!
//! space.release(a).unwrap();
//! assert!(space.release(a).is_err());
//! ```
//!
//! ## Limitations
//!
//! - **Single-threaded only**: a space has no internal locking
//! - **Fixed capacity**: the cell count is set at construction
//! - **Compaction moves handles**: [`MemorySpace::compact`] re-issues the
//!   handles of every range it moves

mod cell;
mod error;
mod layout;
mod space;
mod strategy;

pub use cell::{Allocation, Cell, Handle, SpaceId};
pub use error::{MemoryError, Result};
pub use layout::{Layout, Run, RunStatus, Runs, print_layout};
pub use space::{MemorySpace, Relocation, SpaceStats};
pub use strategy::{BestFit, FirstFit, Placement, StrategyKind, UnknownStrategy};
