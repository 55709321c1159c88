//! The "X" variant: both grid diagonals are units.

use quintoku_core::{DigitSet, Position};

use crate::{
    cell::Cell,
    mission::GameMode,
    ruleset::{Ruleset, VariantCache},
    unit::{Diagonal, Unit, UnitKind},
};

/// Ruleset adding the two grid diagonals as permutation units.
#[derive(Debug, Clone, Copy, Default)]
pub struct DiagonalRuleset;

fn diagonal_positions(diagonal: Diagonal) -> impl Iterator<Item = Position> {
    (0..9).map(move |i| match diagonal {
        Diagonal::Main => Position::new(i, i),
        Diagonal::Anti => Position::new(8 - i, i),
    })
}

fn has_duplicate(cells: &[Cell], diagonal: Diagonal) -> bool {
    let mut seen = DigitSet::EMPTY;
    for pos in diagonal_positions(diagonal) {
        let value = cells[usize::from(pos.index())].value();
        if value != 0 {
            if seen.contains(value) {
                return true;
            }
            seen.insert(value);
        }
    }
    false
}

impl Ruleset for DiagonalRuleset {
    fn mode(&self) -> GameMode {
        GameMode::Diagonal
    }

    fn extra_units(&self, _variant: &VariantCache) -> Vec<Unit> {
        [Diagonal::Main, Diagonal::Anti]
            .into_iter()
            .map(|diagonal| {
                Unit::new(
                    UnitKind::Diagonal(diagonal),
                    diagonal_positions(diagonal).map(|pos| usize::from(pos.index())),
                )
            })
            .collect()
    }

    fn check_errors(&self, variant: &mut VariantCache, cells: &mut [Cell]) {
        variant.diagonal_errors = [
            has_duplicate(cells, Diagonal::Main),
            has_duplicate(cells, Diagonal::Anti),
        ];
    }

    fn has_structural_error(&self, variant: &VariantCache) -> bool {
        variant.diagonal_errors.iter().any(|&flag| flag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagonal_units_cover_both_diagonals() {
        let units = DiagonalRuleset.extra_units(&VariantCache::default());
        assert_eq!(units.len(), 2);
        assert!(units[0].cells().contains(&0));
        assert!(units[0].cells().contains(&80));
        assert!(units[1].cells().contains(&8));
        assert!(units[1].cells().contains(&72));
        // Center cell sits on both
        assert!(units.iter().all(|unit| unit.cells().contains(&40)));
    }
}
