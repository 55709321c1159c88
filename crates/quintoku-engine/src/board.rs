//! The board engine: grid state, caches, selection, undo, color groups.

use std::collections::VecDeque;

use quintoku_core::{CellColor, CellSet, DigitSet, Position};
use quintoku_solver::{is_complete_solution, solve};

use crate::{
    animation::Animation,
    cell::{Cell, CellId},
    color_group::{ColorGroup, ColorGroupId},
    mission::{self, Difficulty, GameMode, MissionError, RawMission},
    ruleset::{Ruleset, VariantCache, ruleset_for},
    settings::Settings,
    unit::{Unit, UnitId, UnitKind},
};

/// A conjugate link: a unit in which at most two cells still note a digit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    /// The contributing unit.
    pub unit: UnitId,
    /// The one or two note-carrying cells.
    pub cells: Vec<CellId>,
}

/// Player-visible state of one cell, captured for the undo history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct CellSnapshot {
    pub(crate) value: u8,
    pub(crate) notes: DigitSet,
    pub(crate) color: Option<CellColor>,
    pub(crate) is_clue: bool,
}

/// A structural snapshot of the board and its color groups.
///
/// Taken before a mutating action and committed only if the action changed
/// anything; popping one restores the exact pre-action state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Snapshot {
    pub(crate) cells: Vec<CellSnapshot>,
    pub(crate) color_groups: Vec<(CellColor, Vec<CellId>)>,
}

/// One playable puzzle: a cell arena, its units, selection, color groups,
/// undo history, and the ruleset bundle that shapes variant behavior.
///
/// All mutators assume exclusive access for their duration, leave every
/// cache consistent before returning, and treat invalid targets (clue cells,
/// out-of-range ids) as silent no-ops. The only hard failures are mission
/// and save parsing, which reject before any board exists.
#[derive(Debug)]
pub struct Board {
    pub(crate) id: String,
    pub(crate) mode: GameMode,
    pub(crate) difficulty: Difficulty,
    pub(crate) mission: String,
    pub(crate) clues: String,
    pub(crate) solution: String,
    pub(crate) n_squares: u8,
    pub(crate) cells: Vec<Cell>,
    pub(crate) units: Vec<Unit>,
    pub(crate) color_groups: Vec<ColorGroup>,
    pub(crate) selected: Vec<CellId>,
    pub(crate) history: Vec<Snapshot>,
    pub(crate) stash: Option<Snapshot>,
    pub(crate) has_changed: bool,
    pub(crate) animations: VecDeque<Animation>,
    pub(crate) full_notation: bool,
    pub(crate) variant: VariantCache,
    pub(crate) ruleset: Box<dyn Ruleset>,
}

fn solution_covers_clues(clues: &str, solution: &str) -> bool {
    clues
        .bytes()
        .zip(solution.bytes())
        .all(|(clue, solved)| clue == b'0' || clue == solved)
}

impl Board {
    /// Builds a board from a fresh mission.
    ///
    /// Decodes the id and clue string, parses the variant payload, resolves
    /// the solution (from the mission's solution token, or the solver for
    /// modes the solver can complete), builds the cell and unit arenas, and
    /// computes every cache.
    ///
    /// # Errors
    ///
    /// Returns a [`MissionError`] when the mission is malformed, carries an
    /// inconsistent solution, or the solver rejects the clues. No board is
    /// ever constructed from a failed mission.
    pub fn from_raw(raw: &RawMission, settings: &Settings) -> Result<Self, MissionError> {
        let header = mission::parse_id(&raw.id)?;
        let ruleset = ruleset_for(header.mode);
        let (clues, solution_token, payload) = mission::split_mission(&raw.m)?;
        let variant = ruleset.parse_payload(&payload)?;

        let solution = match solution_token {
            Some(solution) => {
                if !is_complete_solution(&solution) || !solution_covers_clues(&clues, &solution) {
                    return Err(MissionError::BadSolution);
                }
                solution
            }
            None if ruleset.needs_solution_token() => {
                return Err(MissionError::BadMetadata {
                    reason: "this mode requires a precomputed solution",
                });
            }
            None => solve(&clues)?,
        };

        let mut board = Self::assemble(
            raw.id.clone(),
            header.mode,
            header.difficulty,
            raw.m.clone(),
            clues,
            solution,
            variant,
            ruleset,
        );
        board.recreate_cache(settings);
        log::debug!(
            "mission {} decoded: {} {} with {} units",
            board.id,
            board.mode,
            board.difficulty,
            board.units.len()
        );
        Ok(board)
    }

    #[expect(clippy::too_many_arguments)]
    pub(crate) fn assemble(
        id: String,
        mode: GameMode,
        difficulty: Difficulty,
        mission: String,
        clues: String,
        solution: String,
        variant: VariantCache,
        ruleset: Box<dyn Ruleset>,
    ) -> Self {
        let cells = Position::ALL
            .into_iter()
            .zip(clues.bytes().zip(solution.bytes()))
            .map(|(pos, (clue, solved))| Cell::new(pos, clue - b'0', solved - b'0'))
            .collect();

        let mut board = Self {
            id,
            mode,
            difficulty,
            mission,
            clues,
            solution,
            n_squares: 9,
            cells,
            units: Vec::new(),
            color_groups: Vec::new(),
            selected: Vec::new(),
            history: Vec::new(),
            stash: None,
            has_changed: false,
            animations: VecDeque::new(),
            full_notation: false,
            variant,
            ruleset,
        };
        board.rebuild_topology();
        board
    }

    /// Rebuilds the unit arena and each cell's unit/visibility caches.
    ///
    /// The topology is fixed for the lifetime of a board; this runs once at
    /// construction and again after a restore.
    fn rebuild_topology(&mut self) {
        let mut units = Vec::with_capacity(27);
        for i in 0..9u8 {
            units.push(Unit::new(
                UnitKind::Row(i),
                (0..9).map(|x| usize::from(Position::new(x, i).index())),
            ));
        }
        for i in 0..9u8 {
            units.push(Unit::new(
                UnitKind::Column(i),
                (0..9).map(|y| usize::from(Position::new(i, y).index())),
            ));
        }
        for i in 0..9u8 {
            units.push(Unit::new(
                UnitKind::Box(i),
                self.ruleset
                    .box_cells(i)
                    .into_iter()
                    .map(|pos| usize::from(pos.index())),
            ));
        }
        units.extend(self.ruleset.extra_units(&self.variant));
        self.units = units;

        let mut memberships: Vec<Vec<UnitId>> = vec![Vec::new(); self.cells.len()];
        let mut visibles = vec![CellSet::EMPTY; self.cells.len()];
        for (unit_id, unit) in self.units.iter().enumerate() {
            for &id in unit.cells() {
                memberships[id].push(unit_id);
                for &other in unit.cells() {
                    if other != id {
                        visibles[id].insert(self.cells[other].pos());
                    }
                }
            }
        }
        for (id, (units, mut visible)) in memberships.into_iter().zip(visibles).enumerate() {
            let pos = self.cells[id].pos();
            visible |= self.ruleset.extra_visible(&self.variant, pos);
            visible.remove(pos);
            self.cells[id].set_units(units);
            self.cells[id].set_visible(visible);
        }
    }

    /// Recomputes every derived cache: candidate digits, variant pruning and
    /// color-group eliminations (run to a fixpoint), the full-notation flag,
    /// and error flags.
    pub fn recreate_cache(&mut self, settings: &Settings) {
        self.compute_possible();
        let mut rounds = 0usize;
        loop {
            rounds += 1;
            let mut changed = self.ruleset.after_values_changed(&self.variant, &mut self.cells);
            changed |= self.apply_color_group_eliminations();
            if !changed || rounds >= 81 {
                break;
            }
        }
        log::trace!("candidate fixpoint reached after {rounds} rounds");
        self.full_notation = self.compute_full_notation();
        self.check_errors(settings);
    }

    fn compute_possible(&mut self) {
        let values: Vec<u8> = self.cells.iter().map(Cell::value).collect();
        for cell in &mut self.cells {
            let mut possible = DigitSet::FULL;
            for pos in cell.visible_cells().iter() {
                let value = values[usize::from(pos.index())];
                if value != 0 {
                    possible.remove(value);
                }
            }
            cell.set_possible(possible);
        }
    }

    fn apply_color_group_eliminations(&mut self) -> bool {
        let mut changed = false;
        for group in &self.color_groups {
            let Some(locked) = group.locked_candidates(&self.cells) else {
                continue;
            };
            for pos in group.visible_cells().iter() {
                let id = usize::from(pos.index());
                let narrowed = self.cells[id].possible_values() - locked;
                if narrowed != self.cells[id].possible_values() {
                    self.cells[id].set_possible(narrowed);
                    changed = true;
                }
            }
        }
        changed
    }

    fn compute_full_notation(&self) -> bool {
        self.units
            .iter()
            .filter(|unit| unit.requires_all_digits())
            .all(|unit| {
                (1..=9u8).all(|digit| {
                    unit.cells().iter().any(|&id| {
                        let cell = &self.cells[id];
                        cell.value() == digit || cell.notes().contains(digit)
                    })
                })
            })
    }

    fn check_errors(&mut self, settings: &Settings) {
        for cell in &mut self.cells {
            cell.set_error(false);
        }
        if self.n_squares < self.ruleset.min_grid_size() {
            return;
        }

        for unit in &self.units {
            for (i, &a) in unit.cells().iter().enumerate() {
                let value = self.cells[a].value();
                if value == 0 {
                    continue;
                }
                for &b in &unit.cells()[i + 1..] {
                    if self.cells[b].value() == value {
                        self.cells[a].set_error(true);
                        self.cells[b].set_error(true);
                    }
                }
            }
        }

        if settings.check_mistakes {
            for cell in &mut self.cells {
                if cell.value() != 0 && cell.solution() != 0 && cell.value() != cell.solution() {
                    cell.set_error(true);
                }
            }
        }

        self.ruleset.check_errors(&mut self.variant, &mut self.cells);
    }

    /// Sets a value on every non-clue target whose value actually changes.
    ///
    /// Clears the targets' notes, applies the note/color assists the settings
    /// enable, runs the variant's auto-solve hook, recomputes caches, and
    /// queues completion animations.
    pub fn set_value(&mut self, targets: &[CellId], value: u8, settings: &Settings) {
        if value > 9 {
            return;
        }
        let mut changed: Vec<CellId> = Vec::new();
        for &id in targets {
            if id >= self.cells.len() || self.cells[id].is_clue() || self.cells[id].value() == value
            {
                continue;
            }
            self.cells[id].set_value(value);
            self.has_changed = true;
            changed.push(id);

            if value != 0 && settings.auto_remove_candidates {
                let visible = self.cells[id].visible_cells();
                for pos in visible.iter() {
                    self.cells[usize::from(pos.index())].remove_note(value);
                }
            }
            if settings.clear_color_on_input && self.cells[id].color().is_some() {
                self.cells[id].set_color(None);
                self.detach_from_groups(id);
            }
        }
        if changed.is_empty() {
            return;
        }

        // Variant auto-solves may cascade (filling one cage can close another)
        let mut guard = 0usize;
        loop {
            guard += 1;
            let forced = self
                .ruleset
                .auto_solve_targets(&self.variant, &self.cells, settings);
            let mut applied = false;
            for (id, digit) in forced {
                if !self.cells[id].is_clue() && self.cells[id].value() == 0 {
                    self.cells[id].set_value(digit);
                    changed.push(id);
                    applied = true;
                }
            }
            if !applied || guard >= 81 {
                break;
            }
        }

        self.recreate_cache(settings);
        let animations = self
            .ruleset
            .check_animations(&self.variant, &self.cells, &self.units, &changed);
        self.animations.extend(animations);
        if self.complete() {
            self.animations.push_back(Animation::BoardCompleted);
        }
    }

    /// Toggles a note across the targets.
    ///
    /// With `to` omitted, the targets toggle to the opposite of "every target
    /// already has the note": one AND over the whole set, not a per-cell
    /// toggle. When the unique-in-unit auto-solve is enabled and
    /// `checking_auto_solution` is set, a target for which `value` is the
    /// only legal placement in one of its units receives the value instead.
    /// Adding a note is refused where the candidate cache excludes the digit
    /// (under `show_possible_values`) or the cell is color-locked.
    pub fn set_note(
        &mut self,
        value: u8,
        targets: &[CellId],
        to: Option<bool>,
        checking_auto_solution: bool,
        settings: &Settings,
    ) {
        if !(1..=9).contains(&value) {
            return;
        }

        let mut remaining: Vec<CellId> = Vec::new();
        for &id in targets {
            if id >= self.cells.len() {
                continue;
            }
            if checking_auto_solution
                && settings.auto_solve_unique_in_unit
                && self.only_available_in_any_unit(id, value)
            {
                self.set_value(&[id], value, settings);
            } else {
                remaining.push(id);
            }
        }

        let to = to.unwrap_or_else(|| {
            !remaining
                .iter()
                .all(|&id| self.cells[id].notes().contains(value))
        });

        let mut note_changed = false;
        for &id in &remaining {
            let cell = &self.cells[id];
            if cell.is_clue() || cell.value() != 0 {
                continue;
            }
            if to {
                if cell.notes().contains(value)
                    || (settings.show_possible_values && !cell.possible_values().contains(value))
                    || (settings.lock_cells_with_color && cell.color().is_some())
                {
                    continue;
                }
                self.cells[id].add_note(value);
                note_changed = true;
            } else if cell.notes().contains(value) {
                self.cells[id].remove_note(value);
                note_changed = true;
            }
        }
        if note_changed {
            self.has_changed = true;
            self.full_notation = self.compute_full_notation();
        }
    }

    /// Fills each non-clue target with its known solution and promotes it to
    /// a permanent clue.
    pub fn give_hint(&mut self, targets: &[CellId], settings: &Settings) {
        let mut changed: Vec<CellId> = Vec::new();
        for &id in targets {
            if id >= self.cells.len() || self.cells[id].is_clue() || self.cells[id].solution() == 0
            {
                continue;
            }
            self.cells[id].promote_to_clue();
            self.has_changed = true;
            changed.push(id);
        }
        if changed.is_empty() {
            return;
        }
        self.recreate_cache(settings);
        let animations = self
            .ruleset
            .check_animations(&self.variant, &self.cells, &self.units, &changed);
        self.animations.extend(animations);
    }

    /// Clears value, notes, and color of every non-clue target, detaching
    /// color-group memberships.
    pub fn erase(&mut self, targets: &[CellId], settings: &Settings) {
        let mut any = false;
        for &id in targets {
            if id >= self.cells.len() || self.cells[id].is_clue() {
                continue;
            }
            let cell = &self.cells[id];
            if cell.value() == 0 && cell.notes().is_empty() && cell.color().is_none() {
                continue;
            }
            self.cells[id].clear();
            self.detach_from_groups(id);
            self.has_changed = true;
            any = true;
        }
        if any {
            self.recreate_cache(settings);
        }
    }

    /// Toggles a single cell in the selection.
    pub fn select(&mut self, id: CellId) {
        if id >= self.cells.len() {
            return;
        }
        if let Some(found) = self.selected.iter().position(|&selected| selected == id) {
            self.selected.remove(found);
        } else {
            self.selected.push(id);
        }
    }

    /// Replaces the selection with the rectangular range spanned by two
    /// corner cells.
    pub fn select_box(&mut self, from: CellId, to: CellId) {
        if from >= self.cells.len() || to >= self.cells.len() {
            return;
        }
        let a = self.cells[from].pos();
        let b = self.cells[to].pos();
        let (x0, x1) = (a.x().min(b.x()), a.x().max(b.x()));
        let (y0, y1) = (a.y().min(b.y()), a.y().max(b.y()));
        self.selected.clear();
        for y in y0..=y1 {
            for x in x0..=x1 {
                self.selected.push(usize::from(Position::new(x, y).index()));
            }
        }
    }

    /// Clears the selection.
    pub fn clear_selection(&mut self) {
        self.selected.clear();
    }

    /// Paints the targets, detaching any previous group membership.
    ///
    /// Painting with `None` unpaints. Grouped painting goes through
    /// [`create_color_group`](Self::create_color_group).
    pub fn set_color(&mut self, targets: &[CellId], color: Option<CellColor>, settings: &Settings) {
        let mut any = false;
        for &id in targets {
            if id >= self.cells.len() || self.cells[id].color() == color {
                continue;
            }
            self.cells[id].set_color(color);
            self.detach_from_groups(id);
            self.has_changed = true;
            any = true;
        }
        if any {
            self.recreate_cache(settings);
        }
    }

    /// Paints at least two cells together as a group sharing one intersected
    /// visibility set. Fewer than two valid members is a no-op.
    pub fn create_color_group(&mut self, members: &[CellId], color: CellColor, settings: &Settings) {
        let mut unique: Vec<CellId> = Vec::new();
        for &id in members {
            if id < self.cells.len() && !unique.contains(&id) {
                unique.push(id);
            }
        }
        if unique.len() < 2 {
            return;
        }
        for &id in &unique {
            self.detach_from_groups(id);
            self.cells[id].set_color(Some(color));
        }
        let group = ColorGroup::new(color, unique, &self.cells);
        self.color_groups.push(group);
        self.reindex_color_groups();
        self.has_changed = true;
        self.recreate_cache(settings);
    }

    /// Dissolves the given groups, resetting every former member's color.
    pub fn remove_color_groups(&mut self, groups: &[ColorGroupId], settings: &Settings) {
        let mut doomed: Vec<ColorGroupId> = groups
            .iter()
            .copied()
            .filter(|&group| group < self.color_groups.len())
            .collect();
        doomed.sort_unstable();
        doomed.dedup();
        if doomed.is_empty() {
            return;
        }
        for &group in doomed.iter().rev() {
            let removed = self.color_groups.remove(group);
            for &member in removed.members() {
                self.cells[member].set_color(None);
            }
        }
        self.reindex_color_groups();
        self.has_changed = true;
        self.recreate_cache(settings);
    }

    /// Removes one cell from every group it belongs to; groups that fall
    /// below two members dissolve (their remaining cells keep their paint).
    fn detach_from_groups(&mut self, id: CellId) {
        if self.cells[id].color_groups().is_empty() {
            return;
        }
        let group_ids: Vec<ColorGroupId> = self.cells[id].color_groups().to_vec();
        for &group in &group_ids {
            let (groups, cells) = (&mut self.color_groups, &self.cells);
            groups[group].remove_member(id, cells);
        }
        self.color_groups.retain(|group| group.members().len() >= 2);
        self.reindex_color_groups();
    }

    pub(crate) fn reindex_color_groups(&mut self) {
        let mut memberships: Vec<Vec<ColorGroupId>> = vec![Vec::new(); self.cells.len()];
        for (group_id, group) in self.color_groups.iter().enumerate() {
            for &member in group.members() {
                memberships[member].push(group_id);
            }
        }
        for (id, groups) in memberships.into_iter().enumerate() {
            self.cells[id].set_color_groups(groups);
        }
    }

    /// Serializes the current state into a pending stash and clears the
    /// change flag. Call before a mutating action.
    pub fn stash_board(&mut self) {
        self.stash = Some(self.snapshot());
        self.has_changed = false;
    }

    /// Commits the pending stash onto the history, but only if a mutator
    /// actually changed state since [`stash_board`](Self::stash_board); a
    /// no-op action leaves the history untouched.
    pub fn push_board(&mut self) {
        if self.has_changed {
            if let Some(snapshot) = self.stash.take() {
                self.history.push(snapshot);
                log::debug!("snapshot committed, history depth {}", self.history.len());
            }
        } else {
            self.stash = None;
        }
    }

    /// Restores the most recent snapshot and recomputes every cache.
    pub fn pop_board(&mut self, settings: &Settings) {
        let Some(snapshot) = self.history.pop() else {
            return;
        };
        self.restore_snapshot(&snapshot);
        self.recreate_cache(settings);
        log::debug!("snapshot restored, history depth {}", self.history.len());
    }

    pub(crate) fn snapshot(&self) -> Snapshot {
        Snapshot {
            cells: self
                .cells
                .iter()
                .map(|cell| CellSnapshot {
                    value: cell.value(),
                    notes: cell.notes(),
                    color: cell.color(),
                    is_clue: cell.is_clue(),
                })
                .collect(),
            color_groups: self
                .color_groups
                .iter()
                .map(|group| (group.color(), group.members().to_vec()))
                .collect(),
        }
    }

    pub(crate) fn restore_snapshot(&mut self, snapshot: &Snapshot) {
        for (cell, snap) in self.cells.iter_mut().zip(&snapshot.cells) {
            cell.restore(snap.value, snap.notes, snap.color, snap.is_clue);
        }
        self.color_groups = snapshot
            .color_groups
            .iter()
            .map(|(color, members)| ColorGroup::new(*color, members.clone(), &self.cells))
            .collect();
        self.reindex_color_groups();
    }

    /// `true` once every cell is filled, no cell is flagged as an error, and
    /// no structural variant error remains. Short-circuits on the first
    /// failure.
    #[must_use]
    pub fn complete(&self) -> bool {
        self.cells
            .iter()
            .all(|cell| cell.value() != 0 && !cell.is_error())
            && !self.ruleset.has_structural_error(&self.variant)
    }

    /// For every unit, the subset of unfilled cells noting `value`, kept only
    /// where that subset has one or two cells.
    #[must_use]
    pub fn get_links(&self, value: u8) -> Vec<Link> {
        if !(1..=9).contains(&value) {
            return Vec::new();
        }
        let mut links = Vec::new();
        for (unit_id, unit) in self.units.iter().enumerate() {
            let carriers: Vec<CellId> = unit
                .cells()
                .iter()
                .copied()
                .filter(|&id| {
                    self.cells[id].value() == 0 && self.cells[id].notes().contains(value)
                })
                .collect();
            if (1..=2).contains(&carriers.len()) {
                links.push(Link {
                    unit: unit_id,
                    cells: carriers,
                });
            }
        }
        links
    }

    /// `true` iff `value` is a candidate of the cell and, in at least one of
    /// the cell's all-digit units, it is the unique unfilled cell still
    /// carrying that candidate.
    #[must_use]
    pub fn only_available_in_any_unit(&self, id: CellId, value: u8) -> bool {
        if id >= self.cells.len() || !(1..=9).contains(&value) {
            return false;
        }
        let cell = &self.cells[id];
        if cell.value() != 0 || !cell.possible_values().contains(value) {
            return false;
        }
        cell.units().iter().any(|&unit_id| {
            let unit = &self.units[unit_id];
            unit.requires_all_digits()
                && unit
                    .cells()
                    .iter()
                    .filter(|&&other| {
                        self.cells[other].value() == 0
                            && self.cells[other].possible_values().contains(value)
                    })
                    .count()
                    == 1
        })
    }

    /// Recomputes the renderer's highlight bits from the current links for
    /// `value`.
    pub fn highlight_links(&mut self, value: u8) {
        for cell in &mut self.cells {
            cell.set_highlighted(false);
        }
        let links = self.get_links(value);
        for link in links {
            for id in link.cells {
                self.cells[id].set_highlighted(true);
            }
        }
    }

    /// Drains the outbound animation queue.
    pub fn take_animations(&mut self) -> Vec<Animation> {
        self.animations.drain(..).collect()
    }

    /// Returns the mission id.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the game mode.
    #[must_use]
    pub fn mode(&self) -> GameMode {
        self.mode
    }

    /// Returns the difficulty.
    #[must_use]
    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    /// Returns the compact mission string this board was built from.
    #[must_use]
    pub fn mission(&self) -> &str {
        &self.mission
    }

    /// Returns the decoded 81-character clue string.
    #[must_use]
    pub fn clues(&self) -> &str {
        &self.clues
    }

    /// Returns the 81-character solution string.
    #[must_use]
    pub fn solution(&self) -> &str {
        &self.solution
    }

    /// Returns the grid side length.
    #[must_use]
    pub fn n_squares(&self) -> u8 {
        self.n_squares
    }

    /// Returns the cell arena in row-major order.
    #[must_use]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Returns the cell at a position.
    #[must_use]
    pub fn cell(&self, pos: Position) -> &Cell {
        &self.cells[usize::from(pos.index())]
    }

    /// Returns the unit arena.
    #[must_use]
    pub fn units(&self) -> &[Unit] {
        &self.units
    }

    /// Returns the color groups.
    #[must_use]
    pub fn color_groups(&self) -> &[ColorGroup] {
        &self.color_groups
    }

    /// Returns the selected cells in selection order.
    #[must_use]
    pub fn selected_cells(&self) -> &[CellId] {
        &self.selected
    }

    /// Returns the undo history depth.
    #[must_use]
    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// `true` while every all-digit unit has, for every digit, a value or a
    /// note somewhere.
    #[must_use]
    pub fn full_notation(&self) -> bool {
        self.full_notation
    }

    /// Returns the variant cache block.
    #[must_use]
    pub fn variant(&self) -> &VariantCache {
        &self.variant
    }

    /// Returns the ruleset bundle driving this board.
    #[must_use]
    pub fn ruleset(&self) -> &dyn Ruleset {
        self.ruleset.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use quintoku_solver::SolveError;

    use super::*;
    use crate::mission::encode_clues;

    const EASY_CLUES: &str =
        "003020600900305001001806400008102900700000008006708200002609500800203009005010300";
    const EASY_SOLUTION: &str =
        "483921657967345821251876493548132976729564138136798245372689514814253769695417382";

    fn classic_raw() -> RawMission {
        RawMission {
            id: "c0-1".to_owned(),
            m: encode_clues(EASY_CLUES),
        }
    }

    fn classic_board() -> Board {
        Board::from_raw(&classic_raw(), &Settings::default()).unwrap()
    }

    fn blank_mission(id: &str, metadata: &str) -> RawMission {
        RawMission {
            id: id.to_owned(),
            m: format!("{} {EASY_SOLUTION} {metadata}", encode_clues(&"0".repeat(81))),
        }
    }

    #[test]
    fn test_construction_marks_clues_and_solves() {
        let board = classic_board();
        assert_eq!(board.solution(), EASY_SOLUTION);
        assert_eq!(board.mode(), GameMode::Classic);
        assert_eq!(board.units().len(), 27);

        // Index 2 carries the clue 3, index 0 is open
        assert!(board.cells()[2].is_clue());
        assert_eq!(board.cells()[2].value(), 3);
        assert!(!board.cells()[0].is_clue());
        assert_eq!(board.cells()[0].solution(), 4);
    }

    #[test]
    fn test_candidate_invariant() {
        let board = classic_board();
        for cell in board.cells() {
            for digit in cell.possible_values().iter() {
                for pos in cell.visible_cells().iter() {
                    assert_ne!(
                        board.cell(pos).value(),
                        digit,
                        "cell {} sees {digit} yet keeps it as a candidate",
                        cell.pos()
                    );
                }
            }
        }
    }

    #[test]
    fn test_set_value_skips_clues() {
        let settings = Settings::default();
        let mut board = classic_board();
        board.set_value(&[2], 5, &settings);
        assert_eq!(board.cells()[2].value(), 3);
        assert!(!board.has_changed);
    }

    #[test]
    fn test_set_value_auto_removes_visible_notes() {
        let settings = Settings::default();
        let mut board = classic_board();
        board.set_note(4, &[1], Some(true), false, &settings);
        assert!(board.cells()[1].notes().contains(4));

        board.set_value(&[0], 4, &settings);
        assert!(!board.cells()[1].notes().contains(4));
    }

    #[test]
    fn test_undo_round_trip() {
        let settings = Settings::default();
        let mut board = classic_board();
        let before = board.board_to_save();

        board.stash_board();
        board.set_value(&[0], 4, &settings);
        board.push_board();
        assert_eq!(board.history_len(), 1);
        assert_ne!(board.board_to_save(), before);

        board.pop_board(&settings);
        assert_eq!(board.history_len(), 0);
        assert_eq!(board.board_to_save(), before);
    }

    #[test]
    fn test_noop_action_leaves_history_untouched() {
        let settings = Settings::default();
        let mut board = classic_board();

        board.stash_board();
        board.set_value(&[2], 5, &settings); // clue target, silent no-op
        board.push_board();
        assert_eq!(board.history_len(), 0);
    }

    #[test]
    fn test_give_hint_promotes_to_clue() {
        let settings = Settings::default();
        let mut board = classic_board();
        board.give_hint(&[0], &settings);

        assert_eq!(board.cells()[0].value(), 4);
        assert!(board.cells()[0].is_clue());

        board.set_value(&[0], 5, &settings);
        assert_eq!(board.cells()[0].value(), 4);
    }

    #[test]
    fn test_erase_clears_player_state() {
        let settings = Settings::default();
        let mut board = classic_board();
        board.set_value(&[0], 4, &settings);
        board.set_note(5, &[1], Some(true), false, &settings);
        board.set_color(&[0], Some(CellColor::Red), &settings);

        board.erase(&[0, 1, 2], &settings);
        assert_eq!(board.cells()[0].value(), 0);
        assert!(board.cells()[0].color().is_none());
        assert!(board.cells()[1].notes().is_empty());
        // The clue survives
        assert_eq!(board.cells()[2].value(), 3);
    }

    #[test]
    fn test_selection_toggle_and_range() {
        let mut board = classic_board();
        board.select(0);
        board.select(5);
        assert_eq!(board.selected_cells(), &[0, 5]);
        board.select(0);
        assert_eq!(board.selected_cells(), &[5]);

        board.select_box(0, 20);
        assert_eq!(board.selected_cells().len(), 9);
        assert!(board.selected_cells().contains(&10));

        board.clear_selection();
        assert!(board.selected_cells().is_empty());
    }

    #[test]
    fn test_color_group_lifecycle() {
        let settings = Settings::default();
        let mut board = classic_board();

        // A single member is refused
        board.create_color_group(&[0], CellColor::Teal, &settings);
        assert!(board.color_groups().is_empty());

        board.create_color_group(&[0, 1], CellColor::Teal, &settings);
        assert_eq!(board.color_groups().len(), 1);
        assert_eq!(board.cells()[0].color(), Some(CellColor::Teal));
        assert_eq!(board.cells()[0].color_groups(), &[0]);

        let group = &board.color_groups()[0];
        let expected = board.cells()[0]
            .visible_cells()
            .intersection(board.cells()[1].visible_cells());
        assert_eq!(group.visible_cells(), expected);

        board.remove_color_groups(&[0], &settings);
        assert!(board.color_groups().is_empty());
        assert!(board.cells()[0].color().is_none());
        assert!(board.cells()[1].color().is_none());
        assert!(board.cells()[0].color_groups().is_empty());
    }

    #[test]
    fn test_completion_flips_on_a_wrong_value() {
        let settings = Settings::default();
        let mut board = classic_board();
        assert!(!board.complete());

        let solution: Vec<u8> = EASY_SOLUTION.bytes().map(|b| b - b'0').collect();
        for id in 0..81 {
            if !board.cells()[id].is_clue() {
                board.set_value(&[id], solution[id], &settings);
            }
        }
        assert!(board.complete());
        assert!(
            board
                .take_animations()
                .contains(&Animation::BoardCompleted)
        );

        // Any wrong in-range value breaks completion
        board.set_value(&[0], 5, &settings);
        assert!(!board.complete());
    }

    #[test]
    fn test_get_links_reports_pairs() {
        let settings = Settings::default();
        let mut board = classic_board();
        board.set_note(5, &[0, 1], Some(true), false, &settings);

        let links = board.get_links(5);
        let row_link = links
            .iter()
            .find(|link| board.units()[link.unit].kind() == UnitKind::Row(0))
            .expect("row 0 contributes a link");
        assert_eq!(row_link.cells, vec![0, 1]);

        board.highlight_links(5);
        assert!(board.cells()[0].highlighted());
        assert!(!board.cells()[40].highlighted());
    }

    #[test]
    fn test_only_available_in_any_unit() {
        let settings = Settings::default();
        let mut board = classic_board();
        let solution: Vec<u8> = EASY_SOLUTION.bytes().map(|b| b - b'0').collect();
        for id in [1, 3, 5, 7, 8] {
            board.set_value(&[id], solution[id], &settings);
        }

        // Row 0 is now full except cell 0, whose only candidate is 4
        assert!(board.only_available_in_any_unit(0, 4));
        assert!(!board.only_available_in_any_unit(0, 5));
        assert!(!board.only_available_in_any_unit(1, solution[1]));
    }

    #[test]
    fn test_set_note_uses_and_semantics() {
        let settings = Settings::default();
        let mut board = classic_board();

        board.set_note(5, &[0, 1], None, false, &settings);
        assert!(board.cells()[0].notes().contains(5));
        assert!(board.cells()[1].notes().contains(5));

        board.set_note(5, &[0, 1], None, false, &settings);
        assert!(!board.cells()[0].notes().contains(5));
        assert!(!board.cells()[1].notes().contains(5));
    }

    #[test]
    fn test_note_refusals() {
        let settings = Settings {
            show_possible_values: true,
            lock_cells_with_color: true,
            ..Settings::default()
        };
        let mut board = classic_board();

        // 3 is already placed in cell 0's row and box
        board.set_note(3, &[0], Some(true), false, &settings);
        assert!(board.cells()[0].notes().is_empty());

        board.set_note(4, &[0], Some(true), false, &settings);
        assert!(board.cells()[0].notes().contains(4));

        board.set_color(&[1], Some(CellColor::Blue), &settings);
        board.set_note(4, &[1], Some(true), false, &settings);
        assert!(board.cells()[1].notes().is_empty());
    }

    #[test]
    fn test_note_auto_solve_detour() {
        let settings = Settings {
            auto_solve_unique_in_unit: true,
            ..Settings::default()
        };
        let mut board = classic_board();
        let solution: Vec<u8> = EASY_SOLUTION.bytes().map(|b| b - b'0').collect();
        for id in [1, 3, 5, 7, 8] {
            board.set_value(&[id], solution[id], &settings);
        }

        board.set_note(4, &[0], Some(true), true, &settings);
        assert_eq!(board.cells()[0].value(), 4);
    }

    #[test]
    fn test_full_notation() {
        let settings = Settings::default();
        let mut board = classic_board();
        assert!(!board.full_notation());

        for id in 0..81 {
            if board.cells()[id].value() != 0 {
                continue;
            }
            let possible = board.cells()[id].possible_values();
            for digit in possible.iter() {
                board.set_note(digit, &[id], Some(true), false, &settings);
            }
        }
        assert!(board.full_notation());
    }

    #[test]
    fn test_killer_auto_solves_last_cell_in_cage() {
        let settings = Settings::default();
        let raw = blank_mission("k1", "12,0,1");
        let mut board = Board::from_raw(&raw, &settings).unwrap();
        assert_eq!(board.variant().cages.len(), 1);
        assert_eq!(board.units().len(), 28);

        board.set_value(&[0], 4, &settings);
        assert_eq!(board.cells()[1].value(), 8);
        assert!(
            board
                .take_animations()
                .contains(&Animation::CageCompleted { cage: 0 })
        );
    }

    #[test]
    fn test_killer_exact_sum_pruning() {
        let settings = Settings {
            killer_auto_solve_last_in_cage: false,
            ..Settings::default()
        };
        let raw = blank_mission("k1", "9,0,1");
        let mut board = Board::from_raw(&raw, &settings).unwrap();

        board.set_value(&[0], 6, &settings);
        assert_eq!(
            board.cells()[1].possible_values(),
            DigitSet::from_iter([3])
        );
    }

    #[test]
    fn test_sandwich_clue_hides_once_satisfied() {
        let settings = Settings::default();
        let raw = blank_mission("s0", "0,-,-,-,-,-,-,-,- -,-,-,-,-,-,-,-,-");
        let mut board = Board::from_raw(&raw, &settings).unwrap();

        let sandwich = board.variant().sandwich.as_ref().unwrap();
        assert_eq!(sandwich.row_clues[0], Some(0));
        assert!(sandwich.row_visible[0]);

        // 1 and 9 adjacent: nothing between them, so a 0 clue is satisfied
        board.set_value(&[0], 1, &settings);
        board.set_value(&[1], 9, &settings);
        let sandwich = board.variant().sandwich.as_ref().unwrap();
        assert!(!sandwich.row_visible[0]);
        assert!(!sandwich.row_errors[0]);
    }

    #[test]
    fn test_sandwich_mismatch_is_structural() {
        let settings = Settings::default();
        let raw = blank_mission("s0", "5,-,-,-,-,-,-,-,- -,-,-,-,-,-,-,-,-");
        let mut board = Board::from_raw(&raw, &settings).unwrap();

        board.set_value(&[0], 1, &settings);
        board.set_value(&[1], 9, &settings);
        let sandwich = board.variant().sandwich.as_ref().unwrap();
        assert!(sandwich.row_errors[0]);
        assert!(board.ruleset().has_structural_error(board.variant()));
        assert!(!board.complete());
    }

    #[test]
    fn test_thermo_bounds_and_violations() {
        let settings = Settings::default();
        let raw = blank_mission("t2", "0,1,2");
        let mut board = Board::from_raw(&raw, &settings).unwrap();

        board.set_value(&[1], 5, &settings);
        assert!(!board.cells()[0].possible_values().contains(5));
        assert!(board.cells()[0].possible_values().contains(4));
        assert!(!board.cells()[2].possible_values().contains(5));
        assert!(board.cells()[2].possible_values().contains(6));

        board.set_value(&[0], 7, &settings);
        assert_eq!(board.variant().thermometer_errors, vec![true]);
        assert!(board.cells()[0].is_error());
        assert!(board.cells()[1].is_error());
    }

    #[test]
    fn test_diagonal_duplicates_flagged() {
        let settings = Settings::default();
        let raw = RawMission {
            id: "x0".to_owned(),
            m: format!("{} {EASY_SOLUTION}", encode_clues(&"0".repeat(81))),
        };
        let mut board = Board::from_raw(&raw, &settings).unwrap();
        assert_eq!(board.units().len(), 29);

        board.set_value(&[0], 5, &settings);
        board.set_value(&[10], 5, &settings);
        assert!(board.variant().diagonal_errors[0]);
        assert!(!board.variant().diagonal_errors[1]);
        assert!(board.cells()[0].is_error());
    }

    #[test]
    fn test_underspecified_mission_is_rejected() {
        let clues = format!("{}{}", "1234567891", "0".repeat(71));
        let raw = RawMission {
            id: "c0".to_owned(),
            m: encode_clues(&clues),
        };
        assert_eq!(
            Board::from_raw(&raw, &Settings::default()).unwrap_err(),
            MissionError::Unsolvable(SolveError::TooFewClues { given: 10 })
        );
    }

    #[test]
    fn test_variant_mission_requires_solution_token() {
        let raw = RawMission {
            id: "k0".to_owned(),
            m: format!("{} 12,0,1", encode_clues(&"0".repeat(81))),
        };
        assert!(matches!(
            Board::from_raw(&raw, &Settings::default()),
            Err(MissionError::BadMetadata { .. })
        ));
    }

    #[test]
    fn test_inconsistent_solution_token_is_rejected() {
        let mut solution = EASY_SOLUTION.to_owned().into_bytes();
        solution.swap(0, 1);
        let raw = RawMission {
            id: "c0".to_owned(),
            m: format!(
                "{} {}",
                encode_clues(EASY_CLUES),
                String::from_utf8(solution).unwrap()
            ),
        };
        assert_eq!(
            Board::from_raw(&raw, &Settings::default()).unwrap_err(),
            MissionError::BadSolution
        );
    }
}
