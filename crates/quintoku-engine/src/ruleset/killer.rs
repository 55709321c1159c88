//! The killer variant: sum cages.

use quintoku_core::DigitSet;
use tinyvec::ArrayVec;

use crate::{
    cell::{Cell, CellId},
    mission::{GameMode, MissionError},
    ruleset::{Cage, Ruleset, VariantCache},
    settings::Settings,
    unit::{Unit, UnitKind},
};

/// Ruleset adding sum cages as extra no-repeat units with exact-sum
/// candidate pruning.
#[derive(Debug, Clone, Copy, Default)]
pub struct KillerRuleset;

fn parse_cages(token: &str) -> Result<Vec<Cage>, MissionError> {
    let mut cages = Vec::new();
    let mut claimed = [false; 81];
    for entry in token.split(';') {
        let mut parts = entry.split(',');
        let sum: u32 = parts
            .next()
            .and_then(|s| s.parse().ok())
            .ok_or(MissionError::BadMetadata {
                reason: "cage sum is not a number",
            })?;
        if !(1..=45).contains(&sum) {
            return Err(MissionError::BadMetadata {
                reason: "cage sum out of range",
            });
        }
        let mut cells: ArrayVec<[CellId; 9]> = ArrayVec::new();
        for part in parts {
            let index: usize = part.parse().map_err(|_| MissionError::BadMetadata {
                reason: "cage cell is not a number",
            })?;
            if index >= 81 {
                return Err(MissionError::BadMetadata {
                    reason: "cage cell out of range",
                });
            }
            if claimed[index] {
                return Err(MissionError::BadMetadata {
                    reason: "cell claimed by two cages",
                });
            }
            if cells.len() == 9 {
                return Err(MissionError::BadMetadata {
                    reason: "cage has more than nine cells",
                });
            }
            claimed[index] = true;
            cells.push(index);
        }
        if cells.is_empty() {
            return Err(MissionError::BadMetadata {
                reason: "cage has no cells",
            });
        }
        cages.push(Cage { sum, cells });
    }
    if cages.is_empty() {
        return Err(MissionError::BadMetadata {
            reason: "no cages given",
        });
    }
    Ok(cages)
}

/// Records, per open cell, every digit that participates in some
/// distinct-digit completion of the cage summing to `remaining`.
fn collect_completions(
    options: &[DigitSet],
    remaining: u32,
    taken: DigitSet,
    index: usize,
    stack: &mut Vec<u8>,
    allowed: &mut [DigitSet],
) {
    if index == options.len() {
        if remaining == 0 {
            for (slot, &digit) in allowed.iter_mut().zip(stack.iter()) {
                slot.insert(digit);
            }
        }
        return;
    }
    for digit in options[index].iter() {
        let value = u32::from(digit);
        if taken.contains(digit) || value > remaining {
            continue;
        }
        let mut taken = taken;
        taken.insert(digit);
        stack.push(digit);
        collect_completions(options, remaining - value, taken, index + 1, stack, allowed);
        stack.pop();
    }
}

fn restrict_cage(cage: &Cage, cells: &mut [Cell]) -> bool {
    let mut used = DigitSet::EMPTY;
    let mut sum = 0u32;
    let mut open: Vec<CellId> = Vec::new();
    for &id in cage.cells.iter() {
        let value = cells[id].value();
        if value == 0 {
            open.push(id);
        } else {
            used.insert(value);
            sum += u32::from(value);
        }
    }
    if open.is_empty() {
        return false;
    }

    let options: Vec<DigitSet> = open
        .iter()
        .map(|&id| cells[id].possible_values() - used)
        .collect();
    let mut allowed = vec![DigitSet::EMPTY; open.len()];
    if sum < cage.sum {
        collect_completions(
            &options,
            cage.sum - sum,
            DigitSet::EMPTY,
            0,
            &mut Vec::new(),
            &mut allowed,
        );
    }

    let mut changed = false;
    for (restricted, &id) in allowed.iter().zip(&open) {
        let narrowed = cells[id].possible_values() & *restricted;
        if narrowed != cells[id].possible_values() {
            cells[id].set_possible(narrowed);
            changed = true;
        }
    }
    changed
}

impl Ruleset for KillerRuleset {
    fn mode(&self) -> GameMode {
        GameMode::Killer
    }

    fn parse_payload(&self, payload: &[String]) -> Result<VariantCache, MissionError> {
        let [token] = payload else {
            return Err(MissionError::BadMetadata {
                reason: "killer missions carry exactly one cage token",
            });
        };
        let cages = parse_cages(token)?;
        let cage_errors = vec![false; cages.len()];
        Ok(VariantCache {
            cages,
            cage_errors,
            ..VariantCache::default()
        })
    }

    fn needs_solution_token(&self) -> bool {
        true
    }

    fn extra_units(&self, variant: &VariantCache) -> Vec<Unit> {
        variant
            .cages
            .iter()
            .enumerate()
            .map(|(index, cage)| Unit::new(UnitKind::Cage(index), cage.cells.iter().copied()))
            .collect()
    }

    fn after_values_changed(&self, variant: &VariantCache, cells: &mut [Cell]) -> bool {
        let mut changed = false;
        for cage in &variant.cages {
            changed |= restrict_cage(cage, cells);
        }
        changed
    }

    fn check_errors(&self, variant: &mut VariantCache, cells: &mut [Cell]) {
        variant.cage_errors = variant
            .cages
            .iter()
            .map(|cage| {
                let mut seen = DigitSet::EMPTY;
                let mut duplicate = false;
                let mut sum = 0u32;
                let mut full = true;
                for &id in cage.cells.iter() {
                    let value = cells[id].value();
                    if value == 0 {
                        full = false;
                    } else {
                        duplicate |= seen.contains(value);
                        seen.insert(value);
                        sum += u32::from(value);
                    }
                }
                full && (duplicate || sum != cage.sum)
            })
            .collect();
    }

    fn has_structural_error(&self, variant: &VariantCache) -> bool {
        variant.cage_errors.iter().any(|&flag| flag)
    }

    fn auto_solve_targets(
        &self,
        variant: &VariantCache,
        cells: &[Cell],
        settings: &Settings,
    ) -> Vec<(CellId, u8)> {
        if !settings.killer_auto_solve_last_in_cage {
            return Vec::new();
        }
        let mut targets = Vec::new();
        for cage in &variant.cages {
            let mut used = DigitSet::EMPTY;
            let mut sum = 0u32;
            let mut open = None;
            let mut open_count = 0usize;
            for &id in cage.cells.iter() {
                let value = cells[id].value();
                if value == 0 {
                    open = Some(id);
                    open_count += 1;
                } else {
                    used.insert(value);
                    sum += u32::from(value);
                }
            }
            if open_count == 1
                && let Some(id) = open
                && !cells[id].is_clue()
                && let Some(remaining) = cage.sum.checked_sub(sum)
                && (1..=9).contains(&remaining)
            {
                let digit = u8::try_from(remaining).unwrap();
                if !used.contains(digit) {
                    targets.push((id, digit));
                }
            }
        }
        targets
    }
}

#[cfg(test)]
mod tests {
    use quintoku_core::Position;

    use super::*;

    fn empty_cells() -> Vec<Cell> {
        Position::ALL
            .into_iter()
            .map(|pos| Cell::new(pos, 0, 0))
            .collect()
    }

    #[test]
    fn test_parse_cages() {
        let cages = parse_cages("9,0,1;12,2,11,20").unwrap();
        assert_eq!(cages.len(), 2);
        assert_eq!(cages[0].sum, 9);
        assert_eq!(cages[0].cells.as_slice(), &[0, 1]);
        assert_eq!(cages[1].cells.as_slice(), &[2, 11, 20]);
    }

    #[test]
    fn test_parse_rejects_double_claim() {
        assert_eq!(
            parse_cages("9,0,1;8,1,2"),
            Err(MissionError::BadMetadata {
                reason: "cell claimed by two cages",
            })
        );
    }

    #[test]
    fn test_two_cell_cage_prunes_to_exact_complement() {
        let mut cells = empty_cells();
        cells[0].set_value(6);
        let cage = Cage {
            sum: 9,
            cells: [0, 1].into_iter().collect(),
        };

        assert!(restrict_cage(&cage, &mut cells));
        assert_eq!(cells[1].possible_values(), DigitSet::from_iter([3]));
    }

    #[test]
    fn test_open_cage_excludes_digits_without_completion() {
        let mut cells = empty_cells();
        let cage = Cage {
            sum: 4,
            cells: [0, 1].into_iter().collect(),
        };

        // Only 1+3 and 3+1 sum to 4 with distinct digits
        assert!(restrict_cage(&cage, &mut cells));
        assert_eq!(cells[0].possible_values(), DigitSet::from_iter([1, 3]));
        assert_eq!(cells[1].possible_values(), DigitSet::from_iter([1, 3]));
    }

    #[test]
    fn test_full_cage_sum_mismatch_is_an_error() {
        let mut cells = empty_cells();
        cells[0].set_value(2);
        cells[1].set_value(3);
        let mut variant = VariantCache {
            cages: vec![Cage {
                sum: 9,
                cells: [0, 1].into_iter().collect(),
            }],
            cage_errors: vec![false],
            ..VariantCache::default()
        };

        KillerRuleset.check_errors(&mut variant, &mut cells);
        assert_eq!(variant.cage_errors, vec![true]);
        assert!(KillerRuleset.has_structural_error(&variant));
    }

    #[test]
    fn test_last_open_cell_auto_solves() {
        let mut cells = empty_cells();
        cells[0].set_value(2);
        let variant = VariantCache {
            cages: vec![Cage {
                sum: 9,
                cells: [0, 1].into_iter().collect(),
            }],
            cage_errors: vec![false],
            ..VariantCache::default()
        };

        let settings = Settings::default();
        let targets = KillerRuleset.auto_solve_targets(&variant, &cells, &settings);
        assert_eq!(targets, vec![(1, 7)]);

        let off = Settings {
            killer_auto_solve_last_in_cage: false,
            ..Settings::default()
        };
        assert!(KillerRuleset.auto_solve_targets(&variant, &cells, &off).is_empty());
    }
}
