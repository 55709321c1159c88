//! Outbound animation events.

/// A completion event queued for the rendering collaborator.
///
/// The engine detects completions after each value change and appends events
/// to the board's outbound queue; the renderer drains the queue with
/// [`Board::take_animations`](crate::Board::take_animations) and decides how
/// (or whether) to animate. The engine itself never renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Animation {
    /// A row was filled without errors.
    RowCompleted {
        /// Row index (0-8).
        y: u8,
    },
    /// A column was filled without errors.
    ColumnCompleted {
        /// Column index (0-8).
        x: u8,
    },
    /// A 3×3 box was filled without errors.
    BoxCompleted {
        /// Box index (0-8).
        box_index: u8,
    },
    /// A killer cage was filled with the correct sum.
    CageCompleted {
        /// Index of the cage in the board's variant cache.
        cage: usize,
    },
    /// Every cell was filled and the board reports complete.
    BoardCompleted,
}
