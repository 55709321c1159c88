//! The thermo variant: strictly increasing chains.

use quintoku_core::{CellSet, DigitSet, Position};

use crate::{
    cell::Cell,
    mission::{GameMode, MissionError},
    ruleset::{Ruleset, Thermometer, VariantCache},
};

/// Ruleset adding thermometers: connected chains whose digits strictly
/// increase from the bulb.
///
/// A thermometer is not a permutation unit but a partial order. Its
/// constraint enters the engine through mutual visibility (strictly
/// increasing digits are distinct) and through monotonic bound pruning of
/// the candidate caches.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThermoRuleset;

fn adjacent(a: Position, b: Position) -> bool {
    a.x().abs_diff(b.x()) <= 1 && a.y().abs_diff(b.y()) <= 1 && a != b
}

fn parse_thermometers(token: &str) -> Result<Vec<Thermometer>, MissionError> {
    let mut thermometers = Vec::new();
    for chain in token.split(';') {
        let mut cells = Vec::new();
        for part in chain.split(',') {
            let index: usize = part.parse().map_err(|_| MissionError::BadMetadata {
                reason: "thermometer cell is not a number",
            })?;
            if index >= 81 {
                return Err(MissionError::BadMetadata {
                    reason: "thermometer cell out of range",
                });
            }
            if cells.contains(&index) {
                return Err(MissionError::BadMetadata {
                    reason: "thermometer revisits a cell",
                });
            }
            if let Some(&previous) = cells.last()
                && !adjacent(
                    Position::from_index(u8::try_from(previous).unwrap()),
                    Position::from_index(u8::try_from(index).unwrap()),
                )
            {
                return Err(MissionError::BadMetadata {
                    reason: "thermometer cells are not connected",
                });
            }
            cells.push(index);
        }
        if cells.len() < 2 {
            return Err(MissionError::BadMetadata {
                reason: "thermometer needs at least two cells",
            });
        }
        if cells.len() > 9 {
            return Err(MissionError::BadMetadata {
                reason: "thermometer has more than nine cells",
            });
        }
        thermometers.push(Thermometer { cells });
    }
    if thermometers.is_empty() {
        return Err(MissionError::BadMetadata {
            reason: "no thermometers given",
        });
    }
    Ok(thermometers)
}

fn at_least(digit: u8) -> DigitSet {
    (digit.max(1)..=9).collect()
}

fn at_most(digit: u8) -> DigitSet {
    (1..=digit.min(9)).collect()
}

fn restrict_thermometer(thermometer: &Thermometer, cells: &mut [Cell]) -> bool {
    let mut changed = false;

    let mut floor = 0u8;
    for &id in &thermometer.cells {
        if cells[id].value() != 0 {
            floor = cells[id].value();
            continue;
        }
        let allowed = cells[id].possible_values() & at_least(floor.saturating_add(1));
        if allowed != cells[id].possible_values() {
            cells[id].set_possible(allowed);
            changed = true;
        }
        floor = allowed.smallest().unwrap_or(9);
    }

    let mut ceiling = 10u8;
    for &id in thermometer.cells.iter().rev() {
        if cells[id].value() != 0 {
            ceiling = cells[id].value();
            continue;
        }
        let allowed = cells[id].possible_values() & at_most(ceiling.saturating_sub(1));
        if allowed != cells[id].possible_values() {
            cells[id].set_possible(allowed);
            changed = true;
        }
        ceiling = allowed.largest().unwrap_or(1);
    }

    changed
}

impl Ruleset for ThermoRuleset {
    fn mode(&self) -> GameMode {
        GameMode::Thermo
    }

    fn parse_payload(&self, payload: &[String]) -> Result<VariantCache, MissionError> {
        let [token] = payload else {
            return Err(MissionError::BadMetadata {
                reason: "thermo missions carry exactly one thermometer token",
            });
        };
        let thermometers = parse_thermometers(token)?;
        let thermometer_errors = vec![false; thermometers.len()];
        Ok(VariantCache {
            thermometers,
            thermometer_errors,
            ..VariantCache::default()
        })
    }

    fn needs_solution_token(&self) -> bool {
        true
    }

    fn extra_visible(&self, variant: &VariantCache, pos: Position) -> CellSet {
        let id = usize::from(pos.index());
        let mut visible = CellSet::EMPTY;
        for thermometer in &variant.thermometers {
            if thermometer.cells.contains(&id) {
                for &member in &thermometer.cells {
                    if member != id {
                        visible.insert(Position::from_index(u8::try_from(member).unwrap()));
                    }
                }
            }
        }
        visible
    }

    fn after_values_changed(&self, variant: &VariantCache, cells: &mut [Cell]) -> bool {
        let mut changed = false;
        for thermometer in &variant.thermometers {
            changed |= restrict_thermometer(thermometer, cells);
        }
        changed
    }

    fn check_errors(&self, variant: &mut VariantCache, cells: &mut [Cell]) {
        for (thermometer, error) in variant
            .thermometers
            .iter()
            .zip(variant.thermometer_errors.iter_mut())
        {
            *error = false;
            let mut last: Option<(usize, u8)> = None;
            for &id in &thermometer.cells {
                let value = cells[id].value();
                if value == 0 {
                    continue;
                }
                if let Some((last_id, last_value)) = last
                    && value <= last_value
                {
                    cells[last_id].set_error(true);
                    cells[id].set_error(true);
                    *error = true;
                }
                last = Some((id, value));
            }
        }
    }

    fn has_structural_error(&self, variant: &VariantCache) -> bool {
        variant.thermometer_errors.iter().any(|&flag| flag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty_cells() -> Vec<Cell> {
        Position::ALL
            .into_iter()
            .map(|pos| Cell::new(pos, 0, 0))
            .collect()
    }

    #[test]
    fn test_parse_thermometers() {
        let thermometers = parse_thermometers("0,1,2;9,10,19").unwrap();
        assert_eq!(thermometers.len(), 2);
        assert_eq!(thermometers[0].cells, vec![0, 1, 2]);

        assert!(parse_thermometers("0").is_err());
        assert!(parse_thermometers("0,2").is_err()); // not adjacent
        assert!(parse_thermometers("0,1,0").is_err()); // revisits the bulb
    }

    #[test]
    fn test_empty_chain_gets_positional_bounds() {
        let mut cells = empty_cells();
        let thermometer = Thermometer {
            cells: vec![0, 1, 2],
        };

        assert!(restrict_thermometer(&thermometer, &mut cells));
        assert_eq!(cells[0].possible_values(), (1u8..=7).collect::<DigitSet>());
        assert_eq!(cells[1].possible_values(), (2u8..=8).collect::<DigitSet>());
        assert_eq!(cells[2].possible_values(), (3u8..=9).collect::<DigitSet>());
    }

    #[test]
    fn test_filled_cell_splits_the_bounds() {
        let mut cells = empty_cells();
        cells[1].set_value(5);
        let thermometer = Thermometer {
            cells: vec![0, 1, 2],
        };

        assert!(restrict_thermometer(&thermometer, &mut cells));
        assert_eq!(cells[0].possible_values(), (1u8..=4).collect::<DigitSet>());
        assert_eq!(cells[2].possible_values(), (6u8..=9).collect::<DigitSet>());
    }

    #[test]
    fn test_descending_values_flag_a_violation() {
        let mut cells = empty_cells();
        cells[0].set_value(7);
        cells[2].set_value(3);
        let mut variant = VariantCache {
            thermometers: vec![Thermometer {
                cells: vec![0, 1, 2],
            }],
            thermometer_errors: vec![false],
            ..VariantCache::default()
        };

        ThermoRuleset.check_errors(&mut variant, &mut cells);
        assert_eq!(variant.thermometer_errors, vec![true]);
        assert!(cells[0].is_error());
        assert!(cells[2].is_error());
        assert!(ThermoRuleset.has_structural_error(&variant));
    }
}
