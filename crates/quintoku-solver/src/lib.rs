//! Constraint-propagation solver for 9×9 sudoku grids.
//!
//! The entry point is [`solve`]: an 81-character clue string in (`'0'` or
//! `'.'` for blanks), an 81-character solution string out. Solving combines
//! constraint propagation (naked-single and hidden-single closure) with a
//! minimum-remaining-values backtracking search.
//!
//! The solver is a pure function: it keeps no state between calls and never
//! mutates shared data, so callers may run it off the main control path
//! without synchronization.
//!
//! # Examples
//!
//! ```
//! use quintoku_solver::solve;
//!
//! let clues =
//!     "003020600900305001001806400008102900700000008006708200002609500800203009005010300";
//! let solution = solve(clues)?;
//! assert_eq!(solution.len(), 81);
//! assert!(!solution.contains('0'));
//! # Ok::<(), quintoku_solver::SolveError>(())
//! ```

pub use self::{error::SolveError, solver::{is_complete_solution, solve}};

mod error;
mod solver;
