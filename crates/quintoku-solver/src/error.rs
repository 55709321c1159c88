//! Solver error types.

/// An error returned by [`solve`](crate::solve).
///
/// Every variant means the caller must reject the mission rather than build a
/// board from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum SolveError {
    /// The clue string is not 81 digit-or-blank characters.
    #[display("clue string must be 81 characters of 0-9 or '.', got {length}")]
    InvalidGrid {
        /// Length of the rejected input.
        length: usize,
    },

    /// Fewer than 17 givens; such a grid can never have a unique solution.
    #[display("at least 17 clues are required, got {given}")]
    TooFewClues {
        /// Number of givens in the rejected input.
        given: usize,
    },

    /// Propagation found a contradiction or the search space is exhausted.
    #[display("clues admit no solution")]
    Unsolvable,
}
