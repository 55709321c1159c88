//! Groups of co-colored cells.

use quintoku_core::{CellColor, CellSet, DigitSet};

use crate::cell::{Cell, CellId};

/// Index of a color group in the board's group list.
pub type ColorGroupId = usize;

/// A set of at least two cells painted together.
///
/// The group's `visible` set is the intersection of every member's cached
/// visibility set and is recomputed on every membership change; it is never
/// allowed to go stale. The shared set powers a generalized
/// locked-candidates elimination: when the union of unsolved members'
/// candidates has exactly as many digits as there are unsolved members,
/// those digits can be removed from every shared visible cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorGroup {
    color: CellColor,
    members: Vec<CellId>,
    visible: CellSet,
}

impl ColorGroup {
    pub(crate) fn new(color: CellColor, members: Vec<CellId>, cells: &[Cell]) -> Self {
        let mut group = Self {
            color,
            members,
            visible: CellSet::EMPTY,
        };
        group.recompute_visible(cells);
        group
    }

    /// Returns the group's paint color.
    #[must_use]
    pub fn color(&self) -> CellColor {
        self.color
    }

    /// Returns the member cells.
    #[must_use]
    pub fn members(&self) -> &[CellId] {
        &self.members
    }

    /// Returns the intersection of every member's visibility set.
    #[must_use]
    pub fn visible_cells(&self) -> CellSet {
        self.visible
    }

    pub(crate) fn remove_member(&mut self, id: CellId, cells: &[Cell]) {
        self.members.retain(|&member| member != id);
        self.recompute_visible(cells);
    }

    pub(crate) fn recompute_visible(&mut self, cells: &[Cell]) {
        let mut visible = CellSet::FULL;
        for &member in &self.members {
            visible &= cells[member].visible_cells();
        }
        if self.members.is_empty() {
            visible = CellSet::EMPTY;
        }
        self.visible = visible;
    }

    /// Returns the digits a locked-candidates elimination may remove from the
    /// shared visible cells, if the elimination applies.
    pub(crate) fn locked_candidates(&self, cells: &[Cell]) -> Option<DigitSet> {
        let unsolved: Vec<CellId> = self
            .members
            .iter()
            .copied()
            .filter(|&id| cells[id].value() == 0)
            .collect();
        if unsolved.is_empty() {
            return None;
        }
        let mut combined = DigitSet::EMPTY;
        for &id in &unsolved {
            combined |= cells[id].possible_values();
        }
        (combined.len() == unsolved.len()).then_some(combined)
    }
}
