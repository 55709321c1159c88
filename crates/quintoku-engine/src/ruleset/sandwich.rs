//! The sandwich variant: sums between the 1 and the 9 of each row/column.

use quintoku_core::Position;

use crate::{
    cell::Cell,
    mission::{GameMode, MissionError},
    ruleset::{Ruleset, SandwichState, VariantCache},
};

/// Ruleset adding row and column sandwich-sum clues.
///
/// Sandwich clues add no units; the crust digits 1 and 9 and the sum
/// between them constrain values, not candidate visibility.
#[derive(Debug, Clone, Copy, Default)]
pub struct SandwichRuleset;

fn parse_clue_list(token: &str) -> Result<[Option<u32>; 9], MissionError> {
    let entries: Vec<&str> = token.split(',').collect();
    let entries: [&str; 9] = entries
        .try_into()
        .map_err(|_| MissionError::BadMetadata {
            reason: "sandwich clue list must have nine entries",
        })?;
    let mut clues = [None; 9];
    for (clue, entry) in clues.iter_mut().zip(entries) {
        if entry == "-" {
            continue;
        }
        let sum: u32 = entry.parse().map_err(|_| MissionError::BadMetadata {
            reason: "sandwich clue is not a number",
        })?;
        // 2+3+...+8 is the largest possible filling
        if sum > 35 {
            return Err(MissionError::BadMetadata {
                reason: "sandwich clue out of range",
            });
        }
        *clue = Some(sum);
    }
    Ok(clues)
}

/// Sum of the values strictly between the 1 and the 9, if both crusts are
/// placed and everything between them is filled.
fn filling_sum(values: &[u8]) -> Option<u32> {
    let one = values.iter().position(|&v| v == 1)?;
    let nine = values.iter().position(|&v| v == 9)?;
    let (lo, hi) = if one < nine { (one, nine) } else { (nine, one) };
    let filling = &values[lo + 1..hi];
    if filling.iter().any(|&v| v == 0) {
        return None;
    }
    Some(filling.iter().map(|&v| u32::from(v)).sum())
}

fn line_state(values: &[u8], clue: Option<u32>) -> (bool, bool) {
    let Some(clue) = clue else {
        return (false, false);
    };
    match filling_sum(values) {
        Some(sum) if sum == clue => (false, false),
        Some(_) => (true, true),
        None => (true, false),
    }
}

impl Ruleset for SandwichRuleset {
    fn mode(&self) -> GameMode {
        GameMode::Sandwich
    }

    fn parse_payload(&self, payload: &[String]) -> Result<VariantCache, MissionError> {
        let [rows, cols] = payload else {
            return Err(MissionError::BadMetadata {
                reason: "sandwich missions carry row and column clue tokens",
            });
        };
        let sandwich = SandwichState::new(parse_clue_list(rows)?, parse_clue_list(cols)?);
        Ok(VariantCache {
            sandwich: Some(sandwich),
            ..VariantCache::default()
        })
    }

    fn needs_solution_token(&self) -> bool {
        true
    }

    fn check_errors(&self, variant: &mut VariantCache, cells: &mut [Cell]) {
        let Some(sandwich) = variant.sandwich.as_mut() else {
            return;
        };
        for i in 0..9u8 {
            let row: Vec<u8> = (0..9)
                .map(|x| cells[usize::from(Position::new(x, i).index())].value())
                .collect();
            let (visible, error) = line_state(&row, sandwich.row_clues[usize::from(i)]);
            sandwich.row_visible[usize::from(i)] = visible;
            sandwich.row_errors[usize::from(i)] = error;

            let col: Vec<u8> = (0..9)
                .map(|y| cells[usize::from(Position::new(i, y).index())].value())
                .collect();
            let (visible, error) = line_state(&col, sandwich.col_clues[usize::from(i)]);
            sandwich.col_visible[usize::from(i)] = visible;
            sandwich.col_errors[usize::from(i)] = error;
        }
    }

    fn has_structural_error(&self, variant: &VariantCache) -> bool {
        variant.sandwich.as_ref().is_some_and(|sandwich| {
            sandwich.row_errors.iter().any(|&flag| flag)
                || sandwich.col_errors.iter().any(|&flag| flag)
        })
    }
}
