//! The persisted save form and its parsers.
//!
//! The engine does not talk to any storage itself; it exposes a
//! serializable [`SavedBoard`] blob and the inverse parser. The host decides
//! where the blob lives.

use quintoku_core::{CellColor, DigitSet};
use serde::{Deserialize, Serialize};

use crate::{
    board::{Board, CellSnapshot, Snapshot},
    cell::CellId,
    color_group::ColorGroup,
    mission::{self, Difficulty, GameMode, MissionError},
    ruleset::ruleset_for,
    settings::Settings,
};

/// Current save format version.
pub const SAVE_VERSION: u32 = 1;

/// The persisted form of a board.
///
/// `board` serializes one `value,notes,color` entry per cell, space-joined
/// in row-major order; `color_groups` serializes `;`-separated groups of
/// `,`-joined member cell indices; `history` holds prior board strings,
/// oldest first. The `timer` is owned by the host and merely carried here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedBoard {
    /// Mission id.
    pub id: String,
    /// Game mode.
    pub mode: GameMode,
    /// Difficulty.
    pub difficulty: Difficulty,
    /// Compact mission string.
    pub mission: String,
    /// Decoded 81-character clue string.
    pub clues: String,
    /// 81-character solution string.
    pub solution: String,
    /// Serialized cell states.
    pub board: String,
    /// Serialized color groups.
    pub color_groups: String,
    /// Elapsed play time in seconds.
    pub timer: u64,
    /// Selected cell ids.
    pub selected_cells: Vec<CellId>,
    /// Serialized undo history.
    pub history: Vec<String>,
    /// Save format version.
    pub version: u32,
}

/// An error rejecting a persisted blob.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum SaveError {
    /// A board string entry is malformed.
    #[display("malformed board string: {reason}")]
    BadBoard {
        /// What was wrong with the entry.
        reason: &'static str,
    },

    /// The saved clue string disagrees with the saved mission.
    #[display("saved clues do not match the mission")]
    CluesMismatch,

    /// The blob was written by a newer format.
    #[display("unsupported save version {version}")]
    UnsupportedVersion {
        /// The rejected version.
        version: u32,
    },

    /// The embedded mission failed to parse.
    #[display("invalid mission in save: {_0}")]
    #[from]
    Mission(MissionError),
}

fn cell_entry(value: u8, notes: DigitSet, color: Option<CellColor>) -> String {
    format!("{value},{notes},{}", color.map_or(0, CellColor::index))
}

fn parse_cell_entry(entry: &str) -> Result<(u8, DigitSet, Option<CellColor>), SaveError> {
    let mut parts = entry.split(',');
    let (Some(value), Some(notes), Some(color), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(SaveError::BadBoard {
            reason: "cell entry must have value, notes, and color",
        });
    };

    let value: u8 = value.parse().map_err(|_| SaveError::BadBoard {
        reason: "cell value is not a number",
    })?;
    if value > 9 {
        return Err(SaveError::BadBoard {
            reason: "cell value out of range",
        });
    }

    let mut note_set = DigitSet::EMPTY;
    for ch in notes.chars() {
        match ch {
            '1'..='9' => note_set.insert(u8::try_from(ch.to_digit(10).unwrap()).unwrap()),
            _ => {
                return Err(SaveError::BadBoard {
                    reason: "cell note is not a digit",
                });
            }
        }
    }

    let color_index: u8 = color.parse().map_err(|_| SaveError::BadBoard {
        reason: "cell color is not a number",
    })?;
    let color = match color_index {
        0 => None,
        index => Some(CellColor::from_index(index).ok_or(SaveError::BadBoard {
            reason: "cell color out of range",
        })?),
    };

    Ok((value, note_set, color))
}

fn parse_board_string(board: &str, clues: &str) -> Result<Vec<CellSnapshot>, SaveError> {
    let entries: Vec<&str> = board.split_whitespace().collect();
    if entries.len() != 81 {
        return Err(SaveError::BadBoard {
            reason: "expected 81 cell entries",
        });
    }
    entries
        .iter()
        .zip(clues.bytes())
        .map(|(entry, clue)| {
            let (value, notes, color) = parse_cell_entry(entry)?;
            Ok(CellSnapshot {
                value,
                notes,
                color,
                is_clue: clue != b'0',
            })
        })
        .collect()
}

fn snapshot_board_string(snapshot: &Snapshot) -> String {
    let entries: Vec<String> = snapshot
        .cells
        .iter()
        .map(|cell| cell_entry(cell.value, cell.notes, cell.color))
        .collect();
    entries.join(" ")
}

fn parse_color_group_string(encoded: &str) -> Result<Vec<Vec<CellId>>, SaveError> {
    if encoded.is_empty() {
        return Ok(Vec::new());
    }
    let mut groups = Vec::new();
    for entry in encoded.split(';') {
        let mut members = Vec::new();
        for part in entry.split(',') {
            let id: CellId = part.parse().map_err(|_| SaveError::BadBoard {
                reason: "group member is not a number",
            })?;
            if id >= 81 {
                return Err(SaveError::BadBoard {
                    reason: "group member out of range",
                });
            }
            members.push(id);
        }
        if members.len() < 2 {
            return Err(SaveError::BadBoard {
                reason: "group needs at least two members",
            });
        }
        groups.push(members);
    }
    Ok(groups)
}

impl Board {
    /// Serializes the current cell states into the persisted board string.
    #[must_use]
    pub fn board_to_save(&self) -> String {
        let entries: Vec<String> = self
            .cells
            .iter()
            .map(|cell| cell_entry(cell.value(), cell.notes(), cell.color()))
            .collect();
        entries.join(" ")
    }

    /// Serializes the color groups into the persisted group string.
    #[must_use]
    pub fn color_groups_to_save(&self) -> String {
        let groups: Vec<String> = self
            .color_groups
            .iter()
            .map(|group| {
                let members: Vec<String> =
                    group.members().iter().map(ToString::to_string).collect();
                members.join(",")
            })
            .collect();
        groups.join(";")
    }

    /// Captures the whole board into a persisted blob.
    ///
    /// The in-memory history is structural; it is rendered to board strings
    /// here, at save time.
    #[must_use]
    pub fn to_saved(&self, timer: u64) -> SavedBoard {
        SavedBoard {
            id: self.id.clone(),
            mode: self.mode,
            difficulty: self.difficulty,
            mission: self.mission.clone(),
            clues: self.clues.clone(),
            solution: self.solution.clone(),
            board: self.board_to_save(),
            color_groups: self.color_groups_to_save(),
            timer,
            selected_cells: self.selected.clone(),
            history: self.history.iter().map(snapshot_board_string).collect(),
            version: SAVE_VERSION,
        }
    }

    /// Restores a board verbatim from a persisted blob, then recomputes
    /// every cache.
    ///
    /// Clue flags are rebuilt from the saved clue string. Persisted history
    /// entries carry cell states only; color groups older than the current
    /// state are not reconstructed.
    ///
    /// # Errors
    ///
    /// Returns a [`SaveError`] on version, mission, or board-string problems.
    pub fn from_saved(saved: &SavedBoard, settings: &Settings) -> Result<Self, SaveError> {
        if saved.version > SAVE_VERSION {
            return Err(SaveError::UnsupportedVersion {
                version: saved.version,
            });
        }

        let ruleset = ruleset_for(saved.mode);
        let (clues, _solution, payload) = mission::split_mission(&saved.mission)?;
        if clues != saved.clues {
            return Err(SaveError::CluesMismatch);
        }
        let variant = ruleset.parse_payload(&payload)?;

        let mut board = Self::assemble(
            saved.id.clone(),
            saved.mode,
            saved.difficulty,
            saved.mission.clone(),
            saved.clues.clone(),
            saved.solution.clone(),
            variant,
            ruleset,
        );

        let cells = parse_board_string(&saved.board, &saved.clues)?;
        let groups = parse_color_group_string(&saved.color_groups)?;
        let snapshot = Snapshot {
            cells,
            color_groups: Vec::new(),
        };
        board.restore_snapshot(&snapshot);

        for members in groups {
            let Some(color) = board.cells[members[0]].color() else {
                return Err(SaveError::BadBoard {
                    reason: "group member has no color",
                });
            };
            let group = ColorGroup::new(color, members, &board.cells);
            board.color_groups.push(group);
        }

        board.history = saved
            .history
            .iter()
            .map(|entry| {
                Ok(Snapshot {
                    cells: parse_board_string(entry, &saved.clues)?,
                    color_groups: Vec::new(),
                })
            })
            .collect::<Result<Vec<_>, SaveError>>()?;

        board.selected = saved
            .selected_cells
            .iter()
            .copied()
            .filter(|&id| id < board.cells.len())
            .collect();

        board.reindex_color_groups();
        board.recreate_cache(settings);
        log::debug!("board {} restored from save", board.id);
        Ok(board)
    }
}
