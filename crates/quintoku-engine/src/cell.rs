//! The atomic grid unit.

use quintoku_core::{CellColor, CellSet, DigitSet, Position};
use tinyvec::ArrayVec;

use crate::{color_group::ColorGroupId, unit::UnitId};

/// Index of a cell in the board's cell arena (row-major, 0-80).
pub type CellId = usize;

/// A single cell of the board.
///
/// A cell owns its player-visible state (value, notes, clue flag, color) and
/// a cache block maintained by the engine: candidate digits, the visibility
/// set, unit memberships, the error flag, color-group memberships, and the
/// renderer's highlight bit.
///
/// A clue cell's value and notes never change; mutators skip clue cells
/// silently.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    pos: Position,
    value: u8,
    notes: DigitSet,
    is_clue: bool,
    solution: u8,
    color: Option<CellColor>,
    possible: DigitSet,
    visible: CellSet,
    units: ArrayVec<[UnitId; 6]>,
    is_error: bool,
    color_groups: Vec<ColorGroupId>,
    highlighted: bool,
}

impl Cell {
    pub(crate) fn new(pos: Position, clue: u8, solution: u8) -> Self {
        Self {
            pos,
            value: clue,
            notes: DigitSet::EMPTY,
            is_clue: clue != 0,
            solution,
            color: None,
            possible: DigitSet::FULL,
            visible: CellSet::EMPTY,
            units: ArrayVec::new(),
            is_error: false,
            color_groups: Vec::new(),
            highlighted: false,
        }
    }

    /// Returns the cell's position.
    #[must_use]
    pub fn pos(&self) -> Position {
        self.pos
    }

    /// Returns the cell's value, 0 meaning empty.
    #[must_use]
    pub fn value(&self) -> u8 {
        self.value
    }

    /// Returns the cell's notes.
    #[must_use]
    pub fn notes(&self) -> DigitSet {
        self.notes
    }

    /// Returns `true` if the cell is a clue (given or hint-promoted).
    #[must_use]
    pub fn is_clue(&self) -> bool {
        self.is_clue
    }

    /// Returns the known solution digit for this cell, 0 if unknown.
    #[must_use]
    pub fn solution(&self) -> u8 {
        self.solution
    }

    /// Returns the cell's paint color.
    #[must_use]
    pub fn color(&self) -> Option<CellColor> {
        self.color
    }

    /// Returns the cached candidate digits.
    ///
    /// Always {1..9} minus the values of visible cells, further narrowed by
    /// variant pruning and color-group elimination.
    #[must_use]
    pub fn possible_values(&self) -> DigitSet {
        self.possible
    }

    /// Returns the cached set of cells this cell sees.
    #[must_use]
    pub fn visible_cells(&self) -> CellSet {
        self.visible
    }

    /// Returns the units this cell belongs to.
    #[must_use]
    pub fn units(&self) -> &[UnitId] {
        &self.units
    }

    /// Returns `true` if the cell's value is currently flagged as an error.
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.is_error
    }

    /// Returns the color groups this cell belongs to.
    #[must_use]
    pub fn color_groups(&self) -> &[ColorGroupId] {
        &self.color_groups
    }

    /// Returns the renderer's highlight bit.
    #[must_use]
    pub fn highlighted(&self) -> bool {
        self.highlighted
    }

    pub(crate) fn set_value(&mut self, value: u8) {
        self.value = value;
        self.notes = DigitSet::EMPTY;
    }

    pub(crate) fn add_note(&mut self, value: u8) {
        self.notes.insert(value);
    }

    pub(crate) fn remove_note(&mut self, value: u8) {
        self.notes.remove(value);
    }

    pub(crate) fn promote_to_clue(&mut self) {
        self.value = self.solution;
        self.notes = DigitSet::EMPTY;
        self.is_clue = true;
    }

    pub(crate) fn clear(&mut self) {
        self.value = 0;
        self.notes = DigitSet::EMPTY;
        self.color = None;
    }

    pub(crate) fn set_color(&mut self, color: Option<CellColor>) {
        self.color = color;
    }

    pub(crate) fn set_possible(&mut self, possible: DigitSet) {
        self.possible = possible;
    }

    pub(crate) fn set_visible(&mut self, visible: CellSet) {
        self.visible = visible;
    }

    pub(crate) fn set_units(&mut self, units: impl IntoIterator<Item = UnitId>) {
        self.units = units.into_iter().collect();
    }

    pub(crate) fn set_error(&mut self, is_error: bool) {
        self.is_error = is_error;
    }

    pub(crate) fn set_color_groups(&mut self, groups: Vec<ColorGroupId>) {
        self.color_groups = groups;
    }

    pub(crate) fn set_highlighted(&mut self, highlighted: bool) {
        self.highlighted = highlighted;
    }

    pub(crate) fn restore(
        &mut self,
        value: u8,
        notes: DigitSet,
        color: Option<CellColor>,
        is_clue: bool,
    ) {
        self.value = value;
        self.notes = notes;
        self.color = color;
        self.is_clue = is_clue;
    }
}
