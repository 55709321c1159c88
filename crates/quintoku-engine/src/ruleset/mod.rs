//! The per-variant strategy contract.
//!
//! A [`Ruleset`] is a fixed bundle of pure functions keyed by
//! [`GameMode`]: payload parsing, extra units, extra visibility, candidate
//! pruning, error computation, completion detection, and auto-solve targets.
//! The board engine only ever calls through this bundle and never branches
//! on the mode itself, so its undo, candidate-cache, selection, and
//! color-group invariants are reused unmodified by every variant. Adding a
//! variant means adding one implementation and one arm in [`ruleset_for`].
//!
//! Rulesets are stateless; all per-board variant data (cages, sandwich
//! clues, thermometers, and their error flags) lives in the board's
//! [`VariantCache`], which rulesets read and write through these hooks.

use quintoku_core::{CellSet, Position};
use tinyvec::ArrayVec;

use crate::{
    animation::Animation,
    cell::{Cell, CellId},
    mission::{GameMode, MissionError},
    settings::Settings,
    unit::{Unit, UnitKind},
};

pub use self::{
    classic::ClassicRuleset, diagonal::DiagonalRuleset, killer::KillerRuleset,
    sandwich::SandwichRuleset, thermo::ThermoRuleset,
};

mod classic;
mod diagonal;
mod killer;
mod sandwich;
mod thermo;

/// A killer cage: a contiguous cell group with a target sum and no repeats.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cage {
    /// Target sum of the member digits.
    pub sum: u32,
    /// Member cells.
    pub cells: ArrayVec<[CellId; 9]>,
}

/// A thermometer: a connected chain on which digits strictly increase from
/// the bulb.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Thermometer {
    /// Member cells, bulb first.
    pub cells: Vec<CellId>,
}

/// Sandwich clues and their derived display/error state.
///
/// A clue gives the sum of the digits strictly between the 1 and the 9 of
/// its row or column. `visible` drops to `false` once the clue is satisfied;
/// `errors` records a filled-in sum that misses the clue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SandwichState {
    /// Row clues, `None` where the mission gives none.
    pub row_clues: [Option<u32>; 9],
    /// Column clues, `None` where the mission gives none.
    pub col_clues: [Option<u32>; 9],
    /// Whether each row clue is still displayed.
    pub row_visible: [bool; 9],
    /// Whether each column clue is still displayed.
    pub col_visible: [bool; 9],
    /// Whether each row clue is contradicted by the current values.
    pub row_errors: [bool; 9],
    /// Whether each column clue is contradicted by the current values.
    pub col_errors: [bool; 9],
}

impl SandwichState {
    pub(crate) fn new(row_clues: [Option<u32>; 9], col_clues: [Option<u32>; 9]) -> Self {
        Self {
            row_clues,
            col_clues,
            row_visible: [true; 9],
            col_visible: [true; 9],
            row_errors: [false; 9],
            col_errors: [false; 9],
        }
    }
}

/// Per-board variant data, owned by the board and interpreted by its ruleset.
///
/// Only the sub-block belonging to the board's mode is populated; the rest
/// stays at its default. Error flags in here are plain recomputed data, never
/// exceptions, and fold into [`Board::complete`](crate::Board::complete).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VariantCache {
    /// Killer cages.
    pub cages: Vec<Cage>,
    /// Per-cage sum/repeat error flags.
    pub cage_errors: Vec<bool>,
    /// Sandwich clue state.
    pub sandwich: Option<SandwichState>,
    /// Thermometers.
    pub thermometers: Vec<Thermometer>,
    /// Per-thermometer monotonicity violation flags.
    pub thermometer_errors: Vec<bool>,
    /// Duplicate flags for the main and anti diagonal.
    pub diagonal_errors: [bool; 2],
}

/// The strategy bundle implemented once per puzzle family.
///
/// Default implementations encode classic behavior; variants override only
/// the hooks they extend. All hooks are pure with respect to the ruleset
/// itself; variant state lives in the [`VariantCache`] passed in.
pub trait Ruleset: std::fmt::Debug + Sync {
    /// The mode this ruleset implements.
    fn mode(&self) -> GameMode;

    /// Smallest grid the ruleset's error checks are defined for. Boards below
    /// this size skip error checking entirely.
    fn min_grid_size(&self) -> u8 {
        9
    }

    /// Parses the mode-specific metadata tokens of a mission into a variant
    /// cache.
    ///
    /// # Errors
    ///
    /// Returns [`MissionError::UnexpectedMetadata`] by default for any
    /// leftover token; variants override with their own grammar.
    fn parse_payload(&self, payload: &[String]) -> Result<VariantCache, MissionError> {
        if payload.is_empty() {
            Ok(VariantCache::default())
        } else {
            Err(MissionError::UnexpectedMetadata)
        }
    }

    /// Whether the mission must carry a precomputed solution token.
    ///
    /// True for variants whose extra constraints the plain solver cannot
    /// express; their missions are rejected without one.
    fn needs_solution_token(&self) -> bool {
        false
    }

    /// Cells of the given 3×3 box, left to right, top to bottom.
    fn box_cells(&self, box_index: u8) -> Vec<Position> {
        (0..9).map(|i| Position::from_box(box_index, i)).collect()
    }

    /// Units beyond the rows, columns, and boxes.
    fn extra_units(&self, variant: &VariantCache) -> Vec<Unit> {
        let _ = variant;
        Vec::new()
    }

    /// Visibility beyond the cells sharing a unit.
    fn extra_visible(&self, variant: &VariantCache, pos: Position) -> CellSet {
        let _ = (variant, pos);
        CellSet::EMPTY
    }

    /// Narrows candidate caches with variant constraints.
    ///
    /// Called repeatedly until no hook reports a change, so implementations
    /// must return `true` only when they actually narrowed a set.
    fn after_values_changed(&self, variant: &VariantCache, cells: &mut [Cell]) -> bool {
        let _ = (variant, cells);
        false
    }

    /// Recomputes variant error flags after the engine's generic checks.
    fn check_errors(&self, variant: &mut VariantCache, cells: &mut [Cell]) {
        let _ = (variant, cells);
    }

    /// `true` while any structural variant error is present.
    fn has_structural_error(&self, variant: &VariantCache) -> bool {
        let _ = variant;
        false
    }

    /// Completion events caused by the given changed cells.
    fn check_animations(
        &self,
        variant: &VariantCache,
        cells: &[Cell],
        units: &[Unit],
        changed: &[CellId],
    ) -> Vec<Animation> {
        unit_completions(variant, cells, units, changed)
    }

    /// Placements the variant can force after a value change (for example the
    /// last open cell of a cage).
    fn auto_solve_targets(
        &self,
        variant: &VariantCache,
        cells: &[Cell],
        settings: &Settings,
    ) -> Vec<(CellId, u8)> {
        let _ = (variant, cells, settings);
        Vec::new()
    }
}

/// Selects the ruleset for a mode.
///
/// This factory is the only place modes map to behavior; the engine holds the
/// returned bundle and calls through it.
#[must_use]
pub fn ruleset_for(mode: GameMode) -> Box<dyn Ruleset> {
    match mode {
        GameMode::Classic => Box::new(ClassicRuleset),
        GameMode::Diagonal => Box::new(DiagonalRuleset),
        GameMode::Killer => Box::new(KillerRuleset),
        GameMode::Sandwich => Box::new(SandwichRuleset),
        GameMode::Thermo => Box::new(ThermoRuleset),
    }
}

/// Detects units newly filled without errors among the changed cells.
pub(crate) fn unit_completions(
    variant: &VariantCache,
    cells: &[Cell],
    units: &[Unit],
    changed: &[CellId],
) -> Vec<Animation> {
    let mut animations = Vec::new();
    for unit in units {
        if !unit.cells().iter().any(|id| changed.contains(id)) {
            continue;
        }
        if !unit.cells().iter().all(|&id| cells[id].value() != 0) {
            continue;
        }
        let mut seen = quintoku_core::DigitSet::EMPTY;
        let mut duplicate = false;
        let mut sum = 0u32;
        for &id in unit.cells() {
            let value = cells[id].value();
            duplicate |= seen.contains(value);
            seen.insert(value);
            sum += u32::from(value);
        }
        if duplicate {
            continue;
        }
        match unit.kind() {
            UnitKind::Row(y) => animations.push(Animation::RowCompleted { y }),
            UnitKind::Column(x) => animations.push(Animation::ColumnCompleted { x }),
            UnitKind::Box(box_index) => animations.push(Animation::BoxCompleted { box_index }),
            UnitKind::Cage(cage) => {
                if variant.cages.get(cage).is_some_and(|c| c.sum == sum) {
                    animations.push(Animation::CageCompleted { cage });
                }
            }
            UnitKind::Diagonal(_) => {}
        }
    }
    animations
}
