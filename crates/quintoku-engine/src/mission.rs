//! Mission decoding: puzzle ids and compact clue strings.

use quintoku_solver::SolveError;
use serde::{Deserialize, Serialize};

/// The five supported puzzle families.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display,
)]
pub enum GameMode {
    /// Standard rows/columns/boxes rules.
    Classic,
    /// Classic plus both grid diagonals ("X").
    Diagonal,
    /// Classic plus sum cages ("killer").
    Killer,
    /// Classic plus row/column sandwich sums.
    Sandwich,
    /// Classic plus strictly-increasing thermometers.
    Thermo,
}

impl GameMode {
    /// Decodes the mode character of a mission id.
    ///
    /// # Errors
    ///
    /// Returns [`MissionError::UnknownMode`] for any other character.
    pub fn from_id_char(ch: char) -> Result<Self, MissionError> {
        match ch {
            'c' => Ok(Self::Classic),
            'x' => Ok(Self::Diagonal),
            'k' => Ok(Self::Killer),
            's' => Ok(Self::Sandwich),
            't' => Ok(Self::Thermo),
            _ => Err(MissionError::UnknownMode { ch }),
        }
    }

    /// Returns the mode character used in mission ids.
    #[must_use]
    pub fn id_char(self) -> char {
        match self {
            Self::Classic => 'c',
            Self::Diagonal => 'x',
            Self::Killer => 'k',
            Self::Sandwich => 's',
            Self::Thermo => 't',
        }
    }
}

/// Puzzle difficulty, encoded as the second character of a mission id.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
)]
pub enum Difficulty {
    /// Entry level.
    Easy,
    /// Mid level.
    Medium,
    /// Advanced level.
    Hard,
    /// Top level.
    Expert,
}

impl Difficulty {
    /// Decodes the difficulty character of a mission id.
    ///
    /// # Errors
    ///
    /// Returns [`MissionError::UnknownDifficulty`] for any other character.
    pub fn from_id_char(ch: char) -> Result<Self, MissionError> {
        match ch {
            '0' => Ok(Self::Easy),
            '1' => Ok(Self::Medium),
            '2' => Ok(Self::Hard),
            '3' => Ok(Self::Expert),
            _ => Err(MissionError::UnknownDifficulty { ch }),
        }
    }

    /// Returns the difficulty character used in mission ids.
    #[must_use]
    pub fn id_char(self) -> char {
        match self {
            Self::Easy => '0',
            Self::Medium => '1',
            Self::Hard => '2',
            Self::Expert => '3',
        }
    }
}

/// A mission as delivered to the engine: an id plus a compact mission string.
///
/// `id[0]` encodes the [`GameMode`], `id[1]` the [`Difficulty`]; any trailing
/// characters (a serial number, say) are ignored. `m` is the run-length
/// encoded clue string, optionally followed by space-separated metadata
/// tokens (a precomputed solution, cages, sandwich sums, thermometers).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawMission {
    /// Mode + difficulty id.
    pub id: String,
    /// Compact mission string.
    pub m: String,
}

/// An error rejecting a mission before any board is built.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum MissionError {
    /// The id is shorter than two characters.
    #[display("mission id must carry mode and difficulty characters")]
    IdTooShort,

    /// The id's mode character is not one of `c`/`x`/`k`/`s`/`t`.
    #[display("unknown game mode {ch:?}")]
    UnknownMode {
        /// The rejected character.
        ch: char,
    },

    /// The id's difficulty character is not one of `0`-`3`.
    #[display("unknown difficulty {ch:?}")]
    UnknownDifficulty {
        /// The rejected character.
        ch: char,
    },

    /// The mission string has no clue token.
    #[display("mission string is empty")]
    MissingClues,

    /// The clue token contains a character outside the run-length alphabet.
    #[display("invalid clue character {ch:?}")]
    BadClueChar {
        /// The rejected character.
        ch: char,
    },

    /// The decoded clue token does not cover exactly 81 cells.
    #[display("clues decode to {count} cells, expected 81")]
    WrongCellCount {
        /// Number of decoded cells.
        count: usize,
    },

    /// A provided solution token is not a valid completion of the clues.
    #[display("mission solution does not match the clues")]
    BadSolution,

    /// The variant payload is missing, malformed, or out of range.
    #[display("invalid variant metadata: {reason}")]
    BadMetadata {
        /// What was wrong with the payload.
        reason: &'static str,
    },

    /// A metadata token was provided that the mode does not understand.
    #[display("unexpected metadata token")]
    UnexpectedMetadata,

    /// The solver rejected the clues.
    #[display("mission is unsolvable: {_0}")]
    #[from]
    Unsolvable(SolveError),
}

/// Decodes a run-length encoded clue token into an 81-character digit string.
///
/// Digits `1`-`9` stand for themselves; a lowercase letter encodes a run of
/// blanks, `a` = 1 through `z` = 26. A literal `0` is also accepted as a
/// single blank.
///
/// # Errors
///
/// Returns [`MissionError::BadClueChar`] on characters outside the alphabet
/// and [`MissionError::WrongCellCount`] unless exactly 81 cells are decoded.
///
/// # Examples
///
/// ```
/// use quintoku_engine::mission::decode_clues;
///
/// let decoded = decode_clues(&format!("5a3{}", "z".repeat(3))).unwrap();
/// assert_eq!(decoded.len(), 81);
/// assert!(decoded.starts_with("503"));
/// ```
pub fn decode_clues(token: &str) -> Result<String, MissionError> {
    let mut clues = String::with_capacity(81);
    for ch in token.chars() {
        match ch {
            '0' => clues.push('0'),
            '1'..='9' => clues.push(ch),
            'a'..='z' => {
                let run = ch as usize - 'a' as usize + 1;
                for _ in 0..run {
                    clues.push('0');
                }
            }
            _ => return Err(MissionError::BadClueChar { ch }),
        }
        if clues.len() > 81 {
            return Err(MissionError::WrongCellCount { count: clues.len() });
        }
    }
    if clues.len() != 81 {
        return Err(MissionError::WrongCellCount { count: clues.len() });
    }
    Ok(clues)
}

/// Encodes an 81-character digit string into the compact clue alphabet.
///
/// Inverse of [`decode_clues`]; blanks are collapsed into letter runs.
///
/// # Panics
///
/// Panics if `clues` contains a character other than `0`-`9`.
#[must_use]
pub fn encode_clues(clues: &str) -> String {
    let mut encoded = String::new();
    let mut run = 0usize;
    for ch in clues.chars() {
        assert!(ch.is_ascii_digit(), "clue strings contain only digits");
        if ch == '0' {
            run += 1;
            if run == 26 {
                encoded.push('z');
                run = 0;
            }
        } else {
            if run > 0 {
                encoded.push(char::from(b'a' + u8::try_from(run).unwrap() - 1));
                run = 0;
            }
            encoded.push(ch);
        }
    }
    if run > 0 {
        encoded.push(char::from(b'a' + u8::try_from(run).unwrap() - 1));
    }
    encoded
}

#[derive(Debug)]
pub(crate) struct MissionHeader {
    pub(crate) mode: GameMode,
    pub(crate) difficulty: Difficulty,
}

pub(crate) fn parse_id(id: &str) -> Result<MissionHeader, MissionError> {
    let mut chars = id.chars();
    let (Some(mode_ch), Some(difficulty_ch)) = (chars.next(), chars.next()) else {
        return Err(MissionError::IdTooShort);
    };
    Ok(MissionHeader {
        mode: GameMode::from_id_char(mode_ch)?,
        difficulty: Difficulty::from_id_char(difficulty_ch)?,
    })
}

/// Splits a mission string into the clue token and metadata tokens, pulling
/// out an 81-digit solution token if one is present.
pub(crate) fn split_mission(m: &str) -> Result<(String, Option<String>, Vec<String>), MissionError> {
    let mut tokens = m.split_whitespace();
    let clue_token = tokens.next().ok_or(MissionError::MissingClues)?;
    let clues = decode_clues(clue_token)?;

    let mut solution = None;
    let mut payload = Vec::new();
    for token in tokens {
        if solution.is_none() && token.len() == 81 && token.bytes().all(|b| (b'1'..=b'9').contains(&b))
        {
            solution = Some(token.to_owned());
        } else {
            payload.push(token.to_owned());
        }
    }
    Ok((clues, solution, payload))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_and_difficulty_round_trip() {
        for mode in [
            GameMode::Classic,
            GameMode::Diagonal,
            GameMode::Killer,
            GameMode::Sandwich,
            GameMode::Thermo,
        ] {
            assert_eq!(GameMode::from_id_char(mode.id_char()), Ok(mode));
        }
        for difficulty in [
            Difficulty::Easy,
            Difficulty::Medium,
            Difficulty::Hard,
            Difficulty::Expert,
        ] {
            assert_eq!(
                Difficulty::from_id_char(difficulty.id_char()),
                Ok(difficulty)
            );
        }
        assert_eq!(
            GameMode::from_id_char('q'),
            Err(MissionError::UnknownMode { ch: 'q' })
        );
    }

    #[test]
    fn test_decode_simple_runs() {
        let token = format!("5{}3{}", "z".repeat(3), "a");
        // 1 digit + 78 blanks + 1 digit + 1 blank = 81 cells
        let decoded = decode_clues(&token).unwrap();
        assert_eq!(decoded.len(), 81);
        assert_eq!(&decoded[..1], "5");
        assert_eq!(&decoded[79..80], "3");
    }

    #[test]
    fn test_decode_rejects_bad_lengths() {
        assert_eq!(
            decode_clues("123"),
            Err(MissionError::WrongCellCount { count: 3 })
        );
        assert!(matches!(
            decode_clues(&"z".repeat(4)),
            Err(MissionError::WrongCellCount { .. })
        ));
        assert_eq!(
            decode_clues("12!"),
            Err(MissionError::BadClueChar { ch: '!' })
        );
    }

    #[test]
    fn test_encode_decode_round_trip() {
        let clues =
            "003020600900305001001806400008102900700000008006708200002609500800203009005010300";
        let encoded = encode_clues(clues);
        assert_eq!(decode_clues(&encoded).as_deref(), Ok(clues));
        // Encoded form is strictly shorter than the raw grid
        assert!(encoded.len() < 81);
    }

    #[test]
    fn test_split_mission_extracts_solution() {
        let clues = "1".repeat(81);
        let solution = "2".repeat(81);
        let m = format!("{} {} 9,0,1", encode_clues(&clues), solution);
        let (decoded, found_solution, payload) = split_mission(&m).unwrap();
        assert_eq!(decoded, clues);
        assert_eq!(found_solution, Some(solution));
        assert_eq!(payload, vec!["9,0,1".to_owned()]);
    }

    #[test]
    fn test_parse_id() {
        let header = parse_id("k2-0042").unwrap();
        assert_eq!(header.mode, GameMode::Killer);
        assert_eq!(header.difficulty, Difficulty::Hard);
        assert_eq!(parse_id("k").unwrap_err(), MissionError::IdTooShort);
    }
}
