//! The quintoku board engine.
//!
//! One generic grid model supports five structurally different puzzle
//! families (classic, diagonal "X", killer cages, sandwich sums, and
//! thermometers) through an injected [`Ruleset`] strategy, without
//! duplicating propagation or undo logic per variant.
//!
//! # Overview
//!
//! - [`board`]: the [`Board`] engine: cell and unit arenas, candidate
//!   caches, error flags, selection, color groups, and the
//!   commit-only-if-changed undo protocol
//! - [`cell`]: the atomic grid unit and its cache block
//! - [`ruleset`]: the per-variant strategy contract, its five
//!   implementations, and the board's variant cache block
//! - [`mission`]: puzzle ids and compact run-length-encoded mission strings
//! - [`save`]: the persisted save form exchanged with the host
//! - [`settings`]: host-injected assist flags
//!
//! Rendering and input handling are host concerns: the renderer reads each
//! cell's cache, the variant cache block, and drains the board's animation
//! queue; the engine never draws.
//!
//! # Examples
//!
//! ```
//! use quintoku_engine::{Board, RawMission, Settings, mission::encode_clues};
//!
//! let clues =
//!     "003020600900305001001806400008102900700000008006708200002609500800203009005010300";
//! let raw = RawMission {
//!     id: "c0-1".to_owned(),
//!     m: encode_clues(clues),
//! };
//! let settings = Settings::default();
//! let mut board = Board::from_raw(&raw, &settings)?;
//!
//! // The solver filled in the solution; play a digit on the first open cell
//! board.set_value(&[0], 4, &settings);
//! assert_eq!(board.cells()[0].value(), 4);
//! # Ok::<(), quintoku_engine::MissionError>(())
//! ```

pub mod animation;
pub mod board;
pub mod cell;
pub mod color_group;
pub mod mission;
pub mod ruleset;
pub mod save;
pub mod settings;
pub mod unit;

pub use self::{
    animation::Animation,
    board::{Board, Link},
    cell::{Cell, CellId},
    color_group::{ColorGroup, ColorGroupId},
    mission::{Difficulty, GameMode, MissionError, RawMission},
    ruleset::{Ruleset, VariantCache, ruleset_for},
    save::{SaveError, SavedBoard},
    settings::Settings,
    unit::{Unit, UnitId, UnitKind},
};
