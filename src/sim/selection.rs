/// Selection controller shared by both interaction modes.
///
///   Drag:        down = anchor, enter = extend, up = commit
///   ClickClick:  click = anchor, move = extend, click again = commit
///
/// Every commit clears the selection, whatever the match outcome.

use serde::Deserialize;

use crate::domain::direction::Coord;
use crate::domain::path::resolve_path;

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectionMode {
    #[default]
    Drag,
    #[serde(alias = "clickclick")]
    Click,
}

impl SelectionMode {
    pub fn toggled(self) -> Self {
        match self {
            SelectionMode::Drag => SelectionMode::Click,
            SelectionMode::Click => SelectionMode::Drag,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SelectionMode::Drag => "drag",
            SelectionMode::Click => "click-click",
        }
    }
}

/// A committed pick: both endpoints, start first.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Pick {
    pub start: Coord,
    pub end: Coord,
}

#[derive(Clone, Debug)]
pub struct Selection {
    mode: SelectionMode,
    size: usize,
    anchor: Option<Coord>,
    preview: Vec<Coord>,
}

impl Selection {
    pub fn new(mode: SelectionMode, size: usize) -> Self {
        Selection { mode, size, anchor: None, preview: vec![] }
    }

    pub fn mode(&self) -> SelectionMode {
        self.mode
    }

    pub fn anchor(&self) -> Option<Coord> {
        self.anchor
    }

    /// Cells of the in-progress line (empty while the pointer is off-line).
    pub fn preview(&self) -> &[Coord] {
        &self.preview
    }

    /// Pointer down (drag) or click (click-click).
    /// In click-click mode a click with an anchor already set commits.
    pub fn on_anchor(&mut self, at: Coord) -> Option<Pick> {
        if at.row >= self.size || at.col >= self.size {
            return None;
        }
        match (self.mode, self.anchor) {
            (SelectionMode::Click, Some(start)) => {
                self.cancel();
                Some(Pick { start, end: at })
            }
            _ => {
                self.anchor = Some(at);
                self.preview = vec![at];
                None
            }
        }
    }

    /// Pointer entered a cell while a selection is pending.
    pub fn on_extend(&mut self, at: Coord) {
        if let Some(start) = self.anchor {
            self.preview = resolve_path(self.size, start, at);
        }
    }

    /// Pointer released. Only meaningful in drag mode.
    pub fn on_commit(&mut self, at: Coord) -> Option<Pick> {
        if self.mode != SelectionMode::Drag {
            return None;
        }
        let start = self.anchor?;
        self.cancel();
        Some(Pick { start, end: at })
    }

    pub fn cancel(&mut self) {
        self.anchor = None;
        self.preview.clear();
    }
}
