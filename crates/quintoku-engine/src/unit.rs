//! Units: cell groups constrained to distinct digits.

use tinyvec::ArrayVec;

use crate::cell::CellId;

/// Index of a unit in the board's unit arena.
pub type UnitId = usize;

/// The two grid diagonals used by the "X" variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Diagonal {
    /// Top-left to bottom-right.
    Main,
    /// Top-right to bottom-left.
    Anti,
}

/// What kind of cell group a unit is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitKind {
    /// A row, identified by its y coordinate.
    Row(u8),
    /// A column, identified by its x coordinate.
    Column(u8),
    /// A 3×3 box, identified by its index.
    Box(u8),
    /// A diagonal (the "X" variant).
    Diagonal(Diagonal),
    /// A killer cage, identified by its index in the variant cache.
    Cage(usize),
}

/// A set of cells that may not repeat a digit.
///
/// Rows, columns, boxes, and diagonals additionally require every digit
/// 1-9 to appear ([`requires_all_digits`](Self::requires_all_digits)); cages
/// only forbid repeats and carry their sum constraint in the variant cache.
///
/// Units live in an arena on the board and are referenced by [`UnitId`]
/// from each cell's cache, so cells and units form an indexed graph rather
/// than a web of shared references.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unit {
    kind: UnitKind,
    cells: ArrayVec<[CellId; 9]>,
}

impl Unit {
    /// Creates a unit from its kind and member cells.
    #[must_use]
    pub fn new(kind: UnitKind, cells: impl IntoIterator<Item = CellId>) -> Self {
        Self {
            kind,
            cells: cells.into_iter().collect(),
        }
    }

    /// Returns the unit's kind.
    #[must_use]
    pub fn kind(&self) -> UnitKind {
        self.kind
    }

    /// Returns the member cells.
    #[must_use]
    pub fn cells(&self) -> &[CellId] {
        &self.cells
    }

    /// Returns `true` if the unit must contain each digit 1-9 exactly once.
    #[must_use]
    pub fn requires_all_digits(&self) -> bool {
        !matches!(self.kind, UnitKind::Cage(_))
    }
}
