//! A reverse best-first search over row-packed bitmap reachability, for
//! generating and solving push-block puzzle levels in a classic tile-puzzle
//! binary level format.
//!
//! # Basic usage
//!
//! ```
//! use pullgen_core::config::Config;
//! use pullgen_core::level::Level;
//! use pullgen_core::tile::Tile;
//! use pullgen_core::arena::NodeArena;
//! use pullgen_core::search;
//!
//!# fn main() -> Result<(), pullgen_core::error::LevelError> {
//! let mut level = Level::new("Example", 999);
//! for x in 0..6 {
//!     level.set(x, 0, Tile::Wall);
//!     level.set(x, 3, Tile::Wall);
//! }
//! for y in 0..4 {
//!     level.set(0, y, Tile::Wall);
//!     level.set(5, y, Tile::Wall);
//! }
//! level.set(1, 1, Tile::Player);
//! level.set(3, 1, Tile::Teleport);
//!
//! let cfg = Config::<4>::from_level(&level)?;
//! let arena = NodeArena::<4>::new();
//! let (best, stats) = search::generate(&cfg, &arena, Some(10_000), None);
//! assert!(stats.nodes_visited > 0);
//! let _ = best;
//!# Ok(())
//!# }
//! ```

pub use anyhow;

pub mod arena;
pub mod bitmap;
pub mod config;
pub mod dead_square;
pub mod error;
pub mod level;
pub mod level_writer;
pub mod move_gen;
pub mod point;
pub mod progress;
pub mod search;
pub mod state;
pub mod tile;

use static_assertions::const_assert;

/// Default board height used when a level's own active height hasn't been
/// measured yet (the CLI picks the const generic from the decoded level).
pub const BOARD_HEIGHT: usize = 16;

/// The row-packed bitmap format only has 16 bits per row.
pub const BOARD_WIDTH: usize = 16;

const_assert!(BOARD_HEIGHT <= 32);
const_assert!(BOARD_WIDTH <= 16);
