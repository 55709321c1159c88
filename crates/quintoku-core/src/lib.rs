//! Core data structures for the quintoku puzzle engine.
//!
//! This crate provides the fundamental, variant-agnostic types shared by the
//! solver and the board engine:
//!
//! - [`position`]: board coordinates for a 9×9 grid, with box and diagonal
//!   helpers
//! - [`digit_set`]: a 9-bit set of digit values 1-9, used for cell notes and
//!   candidate caches
//! - [`cell_set`]: an 81-bit set of board positions, used for visibility and
//!   unit membership masks
//! - [`color`]: the paintable cell colors
//!
//! # Examples
//!
//! ```
//! use quintoku_core::{CellSet, DigitSet, Position};
//!
//! let pos = Position::new(4, 4);
//! assert_eq!(pos.box_index(), 4);
//!
//! let mut candidates = DigitSet::FULL;
//! candidates.remove(5);
//! assert_eq!(candidates.len(), 8);
//!
//! let mut seen = CellSet::new();
//! seen.insert(pos);
//! assert!(seen.contains(pos));
//! ```

pub mod cell_set;
pub mod color;
pub mod digit_set;
pub mod position;

pub use self::{cell_set::CellSet, color::CellColor, digit_set::DigitSet, position::Position};
