// Copyright 2025 the Overstory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Grid variant of the roving tab stop.
//!
//! ARIA grids add a row/cell layer on top of the linear pattern:
//! horizontal keys move between cells of the current row, vertical keys
//! move to the same cell index in the adjacent row (falling back to that
//! row's first cell when the index does not exist), and a cell may
//! delegate focus to a control inside it. Delegation exists because grids
//! contain either directly focusable cells or cells wrapping a focusable
//! control; [`GridCell::focus_target`] carries the latter.
//!
//! As with the linear variant, the rows are a fresh host-built snapshot
//! per call; only the current owner (always a cell id, even when focus is
//! delegated) is stored.

use alloc::vec::Vec;

use crate::{NavKey, TextDirection};

/// One cell of a grid snapshot.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct GridCell<K> {
    /// Identifier of the cell element itself.
    pub id: K,
    /// Disabled cells keep their index but are skipped by navigation.
    pub enabled: bool,
    /// The first focusable descendant of the cell, when the cell wraps a
    /// control instead of being focusable itself.
    pub focus_target: Option<K>,
}

/// One row of a grid snapshot.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GridRow<K> {
    /// The row's cells, in column order. Rows need not be the same length.
    pub cells: Vec<GridCell<K>>,
}

#[derive(Copy, Clone)]
enum Step {
    Up,
    Down,
}

/// Roving tab-stop state for one grid widget.
#[derive(Clone, Debug)]
pub struct GridRovingFocus<K> {
    /// Text direction; horizontal arrows swap under [`TextDirection::Rtl`].
    pub direction: TextDirection,
    /// Wrap within a row (horizontal) and from the last row to the first
    /// (vertical).
    pub wrap: bool,
    current: Option<K>,
}

impl<K: Copy + Eq> GridRovingFocus<K> {
    /// Create a grid group, left-to-right, not wrapping.
    pub fn new() -> Self {
        Self {
            direction: TextDirection::Ltr,
            wrap: false,
            current: None,
        }
    }

    /// The cell currently owning the tab stop, if any has been recorded.
    pub fn current(&self) -> Option<K> {
        self.current
    }

    /// Record `id` as the owning cell (an external focus).
    pub fn set_current(&mut self, id: K) {
        self.current = Some(id);
    }

    /// The `tabindex` value for `node`, which may be a cell or a cell's
    /// delegated focus target.
    pub fn tab_index(&mut self, node: &K, rows: &[GridRow<K>]) -> i32 {
        let owned = self
            .resolve_owner(rows)
            .and_then(|owner| find_cell(rows, owner))
            .is_some_and(|cell| cell.id == *node || cell.focus_target == Some(*node));
        if owned { 0 } else { -1 }
    }

    /// Handle a navigation key pressed on `node` (a cell or its delegated
    /// focus target).
    ///
    /// Returns the element that should receive focus — the destination
    /// cell's `focus_target` when present, else the cell itself — or
    /// `None` when focus should stay put. The recorded owner is always the
    /// destination cell's id.
    pub fn handle_key(&mut self, node: &K, key: NavKey, rows: &[GridRow<K>]) -> Option<K> {
        let (row_index, cell_index) = locate(rows, node)?;
        let cell = match key {
            NavKey::ArrowLeft | NavKey::ArrowRight | NavKey::Home | NavKey::End => {
                self.row_target(&rows[row_index], cell_index, key)?
            }
            NavKey::ArrowUp => self.column_target(rows, row_index, cell_index, Step::Up)?,
            NavKey::ArrowDown => self.column_target(rows, row_index, cell_index, Step::Down)?,
        };
        self.current = Some(cell.id);
        Some(cell.focus_target.unwrap_or(cell.id))
    }

    /// Move the stop to the first enabled cell and return its focus key.
    pub fn focus_first(&mut self, rows: &[GridRow<K>]) -> Option<K> {
        let cell = rows.iter().flat_map(|row| &row.cells).find(|c| c.enabled)?;
        self.current = Some(cell.id);
        Some(cell.focus_target.unwrap_or(cell.id))
    }

    fn resolve_owner(&mut self, rows: &[GridRow<K>]) -> Option<K> {
        if let Some(current) = self.current
            && rows
                .iter()
                .flat_map(|row| &row.cells)
                .any(|c| c.enabled && c.id == current)
        {
            return Some(current);
        }
        let first = rows
            .iter()
            .flat_map(|row| &row.cells)
            .find(|c| c.enabled)
            .map(|c| c.id);
        self.current = first;
        first
    }

    /// Horizontal movement and Home/End, confined to `row`.
    fn row_target<'a>(
        &self,
        row: &'a GridRow<K>,
        cell_index: usize,
        key: NavKey,
    ) -> Option<&'a GridCell<K>> {
        let rtl = self.direction == TextDirection::Rtl;
        let enabled: Vec<usize> = row
            .cells
            .iter()
            .enumerate()
            .filter_map(|(i, c)| c.enabled.then_some(i))
            .collect();
        let position = enabled.iter().position(|i| *i == cell_index)?;

        let forward = match key {
            NavKey::ArrowRight => Some(!rtl),
            NavKey::ArrowLeft => Some(rtl),
            _ => None,
        };
        let target = match (key, forward) {
            (NavKey::Home, _) => 0,
            (NavKey::End, _) => enabled.len() - 1,
            (_, Some(true)) => {
                if position + 1 < enabled.len() {
                    position + 1
                } else if self.wrap {
                    0
                } else {
                    return None;
                }
            }
            (_, Some(false)) => {
                if position > 0 {
                    position - 1
                } else if self.wrap {
                    enabled.len() - 1
                } else {
                    return None;
                }
            }
            _ => return None,
        };
        row.cells.get(enabled[target])
    }

    /// Vertical movement: the same cell index in the adjacent row with any
    /// enabled cell, falling back to that row's first enabled cell when
    /// the index does not exist (or is disabled there).
    fn column_target<'a>(
        &self,
        rows: &'a [GridRow<K>],
        row_index: usize,
        cell_index: usize,
        step: Step,
    ) -> Option<&'a GridCell<K>> {
        let count = rows.len();
        let order: Vec<usize> = match step {
            Step::Down => {
                let ahead = row_index + 1..count;
                if self.wrap {
                    ahead.chain(0..row_index).collect()
                } else {
                    ahead.chain(0..0).collect()
                }
            }
            Step::Up => {
                let behind = (0..row_index).rev();
                if self.wrap {
                    behind.chain((row_index + 1..count).rev()).collect()
                } else {
                    behind.chain((0..0).rev()).collect()
                }
            }
        };
        let row = order
            .into_iter()
            .map(|i| &rows[i])
            .find(|row| row.cells.iter().any(|c| c.enabled))?;
        row.cells
            .get(cell_index)
            .filter(|c| c.enabled)
            .or_else(|| row.cells.iter().find(|c| c.enabled))
    }
}

impl<K: Copy + Eq> Default for GridRovingFocus<K> {
    fn default() -> Self {
        Self::new()
    }
}

fn find_cell<K: Copy + Eq>(rows: &[GridRow<K>], id: K) -> Option<&GridCell<K>> {
    rows.iter().flat_map(|row| &row.cells).find(|c| c.id == id)
}

fn locate<K: Copy + Eq>(rows: &[GridRow<K>], node: &K) -> Option<(usize, usize)> {
    for (row_index, row) in rows.iter().enumerate() {
        for (cell_index, cell) in row.cells.iter().enumerate() {
            if cell.enabled && (cell.id == *node || cell.focus_target == Some(*node)) {
                return Some((row_index, cell_index));
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    fn cell(id: u32) -> GridCell<u32> {
        GridCell {
            id,
            enabled: true,
            focus_target: None,
        }
    }

    /// 3×3 grid with ids row-major from 11.
    fn grid() -> Vec<GridRow<u32>> {
        vec![
            GridRow {
                cells: vec![cell(11), cell(12), cell(13)],
            },
            GridRow {
                cells: vec![cell(21), cell(22), cell(23)],
            },
            GridRow {
                cells: vec![cell(31), cell(32), cell(33)],
            },
        ]
    }

    #[test]
    fn horizontal_moves_stay_in_the_row() {
        let rows = grid();
        let mut roving: GridRovingFocus<u32> = GridRovingFocus::new();
        assert_eq!(roving.handle_key(&11, NavKey::ArrowRight, &rows), Some(12));
        assert_eq!(roving.handle_key(&12, NavKey::ArrowLeft, &rows), Some(11));
        // At the row edge without wrap: stay put, not a hop to row two.
        assert_eq!(roving.handle_key(&13, NavKey::ArrowRight, &rows), None);
    }

    #[test]
    fn horizontal_wrap_is_row_local() {
        let rows = grid();
        let mut roving: GridRovingFocus<u32> = GridRovingFocus::new();
        roving.wrap = true;
        assert_eq!(roving.handle_key(&23, NavKey::ArrowRight, &rows), Some(21));
        assert_eq!(roving.handle_key(&21, NavKey::ArrowLeft, &rows), Some(23));
    }

    #[test]
    fn rtl_swaps_horizontal_arrows() {
        let rows = grid();
        let mut roving: GridRovingFocus<u32> = GridRovingFocus::new();
        roving.direction = TextDirection::Rtl;
        assert_eq!(roving.handle_key(&12, NavKey::ArrowRight, &rows), Some(11));
        assert_eq!(roving.handle_key(&11, NavKey::ArrowLeft, &rows), Some(12));
    }

    #[test]
    fn vertical_moves_keep_the_cell_index() {
        let rows = grid();
        let mut roving: GridRovingFocus<u32> = GridRovingFocus::new();
        assert_eq!(roving.handle_key(&12, NavKey::ArrowDown, &rows), Some(22));
        assert_eq!(roving.handle_key(&22, NavKey::ArrowDown, &rows), Some(32));
        assert_eq!(roving.handle_key(&32, NavKey::ArrowUp, &rows), Some(22));
        // Without wrap the first row has no row above it.
        assert_eq!(roving.handle_key(&12, NavKey::ArrowUp, &rows), None);
    }

    #[test]
    fn vertical_wrap_goes_around() {
        let rows = grid();
        let mut roving: GridRovingFocus<u32> = GridRovingFocus::new();
        roving.wrap = true;
        assert_eq!(roving.handle_key(&32, NavKey::ArrowDown, &rows), Some(12));
        assert_eq!(roving.handle_key(&12, NavKey::ArrowUp, &rows), Some(32));
    }

    #[test]
    fn shorter_row_falls_back_to_its_first_cell() {
        let rows = vec![
            GridRow {
                cells: vec![cell(11), cell(12), cell(13)],
            },
            GridRow {
                cells: vec![cell(21), cell(22)],
            },
        ];
        let mut roving: GridRovingFocus<u32> = GridRovingFocus::new();
        assert_eq!(roving.handle_key(&13, NavKey::ArrowDown, &rows), Some(21));
    }

    #[test]
    fn home_and_end_are_row_local() {
        let rows = grid();
        let mut roving: GridRovingFocus<u32> = GridRovingFocus::new();
        assert_eq!(roving.handle_key(&22, NavKey::End, &rows), Some(23));
        assert_eq!(roving.handle_key(&23, NavKey::Home, &rows), Some(21));
    }

    #[test]
    fn cells_delegate_focus_but_own_the_stop() {
        let control = 220_u32;
        let rows = vec![
            GridRow {
                cells: vec![cell(11)],
            },
            GridRow {
                cells: vec![GridCell {
                    id: 21,
                    enabled: true,
                    focus_target: Some(control),
                }],
            },
        ];
        let mut roving: GridRovingFocus<u32> = GridRovingFocus::new();
        // Moving into the wrapping cell focuses its control…
        assert_eq!(roving.handle_key(&11, NavKey::ArrowDown, &rows), Some(control));
        // …while the stop is recorded on the cell, and both answer as the
        // tab stop.
        assert_eq!(roving.current(), Some(21));
        assert_eq!(roving.tab_index(&21, &rows), 0);
        assert_eq!(roving.tab_index(&control, &rows), 0);
        assert_eq!(roving.tab_index(&11, &rows), -1);
        // A key pressed on the delegated control navigates from its cell.
        assert_eq!(roving.handle_key(&control, NavKey::ArrowUp, &rows), Some(11));
    }

    #[test]
    fn disabled_cells_and_rows_are_skipped() {
        let mut rows = grid();
        rows[1].cells[1].enabled = false;
        // Vertical: the same index is disabled in the adjacent row, so its
        // first enabled cell catches the move.
        let mut roving: GridRovingFocus<u32> = GridRovingFocus::new();
        assert_eq!(roving.handle_key(&12, NavKey::ArrowDown, &rows), Some(21));

        // A fully disabled row is skipped outright.
        for c in &mut rows[1].cells {
            c.enabled = false;
        }
        assert_eq!(roving.handle_key(&12, NavKey::ArrowDown, &rows), Some(32));
    }

    #[test]
    fn implicit_owner_is_first_enabled_cell() {
        let mut rows = grid();
        rows[0].cells[0].enabled = false;
        let mut roving: GridRovingFocus<u32> = GridRovingFocus::new();
        assert_eq!(roving.tab_index(&11, &rows), -1);
        assert_eq!(roving.tab_index(&12, &rows), 0);
        assert_eq!(roving.focus_first(&rows), Some(12));
    }
}
