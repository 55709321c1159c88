//! Standard rules: rows, columns, and boxes only.

use crate::{mission::GameMode, ruleset::Ruleset};

/// The classic ruleset. Every hook keeps its default behavior.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClassicRuleset;

impl Ruleset for ClassicRuleset {
    fn mode(&self) -> GameMode {
        GameMode::Classic
    }
}
