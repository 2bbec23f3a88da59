//! Maze carving and solving over a rectangular grid, with box-drawing
//! text rendering.
//!
//! A [`Laby`] owns a grid of [`Node`]s whose open passages are [`Dirs`]
//! bit sets. [`generate`] carves a laby with guaranteed connectivity
//! between its start and finish, [`solve`] finds a [`Route`] through an
//! existing one, and [`Laby::render`] draws either as text.

pub mod algorithms;
pub mod chars;
pub mod dirs;
pub mod grid;
pub mod laby;
pub mod node;
pub mod router;

pub use algorithms::{generate, solve, Random};
pub use dirs::{Dirs, DirsError, Pos};
pub use grid::{Grid, GridError};
pub use laby::{Laby, LabyError};
pub use node::{Neighbors, Node};
pub use router::{Route, RouteNotFoundError, RouteStep, Router};
