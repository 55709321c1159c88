//! Engine assist settings.

/// Read-only assist flags consulted by the board engine and rulesets.
///
/// Settings are owned by the host and injected by reference into every
/// operation that gates behavior on a flag; the engine never stores or
/// mutates them.
///
/// # Examples
///
/// ```
/// use quintoku_engine::Settings;
///
/// let settings = Settings {
///     auto_remove_candidates: false,
///     ..Settings::default()
/// };
/// assert!(settings.check_mistakes);
/// ```
#[derive(Debug, Clone)]
#[expect(clippy::struct_excessive_bools)]
pub struct Settings {
    /// Placing a value removes it from the notes of every visible cell.
    pub auto_remove_candidates: bool,
    /// Note input is limited to the cell's computed candidates.
    pub show_possible_values: bool,
    /// Painted cells refuse note input.
    pub lock_cells_with_color: bool,
    /// Filling the second-to-last cell of a cage auto-fills the last one.
    pub killer_auto_solve_last_in_cage: bool,
    /// Values contradicting the known solution are flagged as errors.
    pub check_mistakes: bool,
    /// Placing a value clears the cell's paint and group membership.
    pub clear_color_on_input: bool,
    /// Toggling a note that is the only legal placement in one of the cell's
    /// units places the value instead.
    pub auto_solve_unique_in_unit: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            auto_remove_candidates: true,
            show_possible_values: false,
            lock_cells_with_color: false,
            killer_auto_solve_last_in_cage: true,
            check_mistakes: true,
            clear_color_on_input: false,
            auto_solve_unique_in_unit: false,
        }
    }
}
