//! Constraint propagation and backtracking search.

use std::sync::LazyLock;

use quintoku_core::{DigitSet, Position};

use crate::SolveError;

/// Candidate sets for all 81 squares.
type Grid = [DigitSet; 81];

/// Static 9×9 topology: 27 units and 20 peers per square.
struct Tables {
    /// Cell indices of each unit: 9 rows, 9 columns, 9 boxes.
    unit_cells: [[usize; 9]; 27],
    /// The three units containing each square.
    square_units: [[usize; 3]; 81],
    /// The 20 squares sharing a unit with each square.
    peers: [[usize; 20]; 81],
}

static TABLES: LazyLock<Tables> = LazyLock::new(Tables::build);

impl Tables {
    #[expect(clippy::cast_possible_truncation)]
    fn build() -> Self {
        let mut unit_cells = [[0usize; 9]; 27];
        for i in 0..9usize {
            for j in 0..9usize {
                unit_cells[i][j] = usize::from(Position::new(j as u8, i as u8).index());
                unit_cells[9 + i][j] = usize::from(Position::new(i as u8, j as u8).index());
                unit_cells[18 + i][j] = usize::from(Position::from_box(i as u8, j as u8).index());
            }
        }

        let mut square_units = [[0usize; 3]; 81];
        for (square, units) in square_units.iter_mut().enumerate() {
            let pos = Position::from_index(square as u8);
            *units = [
                usize::from(pos.y()),
                9 + usize::from(pos.x()),
                18 + usize::from(pos.box_index()),
            ];
        }

        let mut peers = [[0usize; 20]; 81];
        for (square, square_peers) in peers.iter_mut().enumerate() {
            let mut seen = [false; 81];
            let mut count = 0;
            for unit in square_units[square] {
                for cell in unit_cells[unit] {
                    if cell != square && !seen[cell] {
                        seen[cell] = true;
                        square_peers[count] = cell;
                        count += 1;
                    }
                }
            }
            debug_assert_eq!(count, 20);
        }

        Self {
            unit_cells,
            square_units,
            peers,
        }
    }
}

/// Assigns `digit` to `square` by eliminating every other candidate.
///
/// Returns `false` if a contradiction is detected.
fn assign(values: &mut Grid, square: usize, digit: u8) -> bool {
    let mut others = values[square];
    others.remove(digit);
    for other in others.iter() {
        if !eliminate(values, square, other) {
            return false;
        }
    }
    true
}

/// Removes `digit` from `square`'s candidates, propagating naked-single and
/// hidden-single closures.
///
/// Returns `false` if a contradiction is detected.
fn eliminate(values: &mut Grid, square: usize, digit: u8) -> bool {
    if !values[square].contains(digit) {
        return true;
    }
    values[square].remove(digit);

    if values[square].is_empty() {
        return false;
    }

    // Naked single: a square reduced to one candidate excludes that digit
    // from all of its peers.
    if let Some(last) = values[square].single() {
        let tables = &*TABLES;
        for &peer in &tables.peers[square] {
            if !eliminate(values, peer, last) {
                return false;
            }
        }
    }

    // Hidden single: a digit reduced to one possible place in a unit must go
    // there.
    let tables = &*TABLES;
    for &unit in &tables.square_units[square] {
        let mut places = [0usize; 9];
        let mut count = 0;
        for &cell in &tables.unit_cells[unit] {
            if values[cell].contains(digit) {
                places[count] = cell;
                count += 1;
            }
        }
        match count {
            0 => return false,
            1 => {
                if !assign(values, places[0], digit) {
                    return false;
                }
            }
            _ => {}
        }
    }

    true
}

/// Depth-first search over the square with the fewest remaining candidates.
fn search(values: &Grid) -> Option<Grid> {
    let mut best: Option<(usize, usize)> = None;
    for (square, candidates) in values.iter().enumerate() {
        let len = candidates.len();
        if len == 0 {
            return None;
        }
        if len > 1 && best.is_none_or(|(best_len, _)| len < best_len) {
            best = Some((len, square));
        }
    }
    let Some((_, square)) = best else {
        return Some(*values);
    };

    for digit in values[square].iter() {
        let mut copy = *values;
        if assign(&mut copy, square, digit)
            && let Some(solved) = search(&copy)
        {
            return Some(solved);
        }
    }
    None
}

fn parse_clues(clues: &str) -> Result<[u8; 81], SolveError> {
    let mut digits = [0u8; 81];
    let mut count = 0;
    for ch in clues.chars() {
        let digit = match ch {
            '.' | '0' => 0,
            '1'..='9' => u8::try_from(ch.to_digit(10).unwrap()).unwrap(),
            _ => {
                return Err(SolveError::InvalidGrid {
                    length: clues.chars().count(),
                });
            }
        };
        if count == 81 {
            return Err(SolveError::InvalidGrid {
                length: clues.chars().count(),
            });
        }
        digits[count] = digit;
        count += 1;
    }
    if count != 81 {
        return Err(SolveError::InvalidGrid { length: count });
    }
    Ok(digits)
}

/// Solves an 81-character clue string (`'0'` or `'.'` = blank).
///
/// Builds the candidate map by assigning every given, then runs a
/// minimum-remaining-values backtracking search. The first solution found is
/// returned as an 81-digit string.
///
/// # Errors
///
/// - [`SolveError::InvalidGrid`] if the input is not 81 digit-or-blank
///   characters.
/// - [`SolveError::TooFewClues`] if fewer than 17 squares are given.
/// - [`SolveError::Unsolvable`] if the givens contradict each other or the
///   search exhausts without a solution.
///
/// # Examples
///
/// ```
/// use quintoku_solver::{SolveError, solve};
///
/// let ten_givens = format!("{}{}", "1234567891", "0".repeat(71));
/// assert_eq!(
///     solve(&ten_givens),
///     Err(SolveError::TooFewClues { given: 10 })
/// );
/// ```
pub fn solve(clues: &str) -> Result<String, SolveError> {
    let digits = parse_clues(clues)?;

    let given = digits.iter().filter(|&&d| d != 0).count();
    if given < 17 {
        return Err(SolveError::TooFewClues { given });
    }

    let mut values = [DigitSet::FULL; 81];
    for (square, &digit) in digits.iter().enumerate() {
        if digit != 0 && !assign(&mut values, square, digit) {
            return Err(SolveError::Unsolvable);
        }
    }

    let solved = search(&values).ok_or(SolveError::Unsolvable)?;

    let mut out = String::with_capacity(81);
    for candidates in &solved {
        let digit = candidates.single().ok_or(SolveError::Unsolvable)?;
        out.push(char::from(b'0' + digit));
    }
    if !is_complete_solution(&out) {
        return Err(SolveError::Unsolvable);
    }
    Ok(out)
}

/// Returns `true` if `grid` is an 81-digit string in which every row, column,
/// and box contains each digit 1-9 exactly once.
///
/// # Examples
///
/// ```
/// use quintoku_solver::is_complete_solution;
///
/// let solution =
///     "483921657967345821251876493548132976729564138136798245372689514814253769695417382";
/// assert!(is_complete_solution(solution));
/// assert!(!is_complete_solution("123"));
/// ```
#[must_use]
pub fn is_complete_solution(grid: &str) -> bool {
    let bytes = grid.as_bytes();
    if bytes.len() != 81 || bytes.iter().any(|&b| !b.is_ascii_digit() || b == b'0') {
        return false;
    }
    let tables = &*TABLES;
    for unit in &tables.unit_cells {
        let mut seen = DigitSet::new();
        for &cell in unit {
            seen.insert(bytes[cell] - b'0');
        }
        if seen != DigitSet::FULL {
            return false;
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    const EASY_CLUES: &str =
        "003020600900305001001806400008102900700000008006708200002609500800203009005010300";
    const EASY_SOLUTION: &str =
        "483921657967345821251876493548132976729564138136798245372689514814253769695417382";

    const HARD_CLUES: &str =
        "4.....8.5.3..........7......2.....6.....8.4......1.......6.3.7.5..2.....1.4......";
    const HARD_SOLUTION: &str =
        "417369825632158947958724316825437169791586432346912658289643571573291684164875293";

    #[test]
    fn test_solves_known_puzzle() {
        assert_eq!(solve(EASY_CLUES).as_deref(), Ok(EASY_SOLUTION));
    }

    #[test]
    fn test_solves_search_heavy_puzzle() {
        assert_eq!(solve(HARD_CLUES).as_deref(), Ok(HARD_SOLUTION));
    }

    #[test]
    fn test_solution_respects_givens() {
        let solution = solve(EASY_CLUES).unwrap();
        for (clue, solved) in EASY_CLUES.bytes().zip(solution.bytes()) {
            if clue != b'0' {
                assert_eq!(clue, solved);
            }
        }
    }

    #[test]
    fn test_solution_units_are_permutations() {
        let solution = solve(EASY_CLUES).unwrap();
        assert!(is_complete_solution(&solution));
    }

    #[test]
    fn test_repeated_calls_return_identical_output() {
        assert_eq!(solve(EASY_CLUES), solve(EASY_CLUES));
        assert_eq!(solve(HARD_CLUES), solve(HARD_CLUES));
    }

    #[test]
    fn test_too_few_clues() {
        let clues = format!("{}{}", "1234567891", "0".repeat(71));
        assert_eq!(solve(&clues), Err(SolveError::TooFewClues { given: 10 }));
    }

    #[test]
    fn test_contradictory_givens() {
        // Duplicate 3 in the first row of the easy puzzle
        let mut clues = EASY_CLUES.to_owned().into_bytes();
        clues[4] = b'3';
        let clues = String::from_utf8(clues).unwrap();
        assert_eq!(solve(&clues), Err(SolveError::Unsolvable));
    }

    #[test]
    fn test_invalid_grid() {
        assert_eq!(solve("123"), Err(SolveError::InvalidGrid { length: 3 }));
        let bad = format!("{}x", "0".repeat(80));
        assert!(matches!(solve(&bad), Err(SolveError::InvalidGrid { .. })));
    }

    #[test]
    fn test_accepts_dots_as_blanks() {
        let dotted = EASY_CLUES.replace('0', ".");
        assert_eq!(solve(&dotted).as_deref(), Ok(EASY_SOLUTION));
    }

    #[test]
    fn test_is_complete_solution_rejects_duplicates() {
        let mut grid = EASY_SOLUTION.to_owned().into_bytes();
        grid[0] = grid[1];
        assert!(!is_complete_solution(&String::from_utf8(grid).unwrap()));
    }
}
