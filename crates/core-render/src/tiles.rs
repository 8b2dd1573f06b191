//! Status bar service surface plus an in-memory tile strip.

use crate::status::IndicatorWidget;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileId(pub u64);

/// Optional host service that places widgets in the status bar.
pub trait StatusBar {
    /// Register a right-side tile. Higher priority sits further right.
    fn add_right_tile(&mut self, widget: IndicatorWidget, priority: i32) -> TileId;
    /// Replace a tile's widget. False when the tile is gone.
    fn update_tile(&mut self, id: TileId, widget: IndicatorWidget) -> bool;
    fn remove_tile(&mut self, id: TileId) -> bool;
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Tile {
    id: TileId,
    priority: i32,
    widget: IndicatorWidget,
}

/// Right-side tiles kept in placement order.
#[derive(Debug, Default)]
pub struct TileStrip {
    tiles: Vec<Tile>,
    next_id: u64,
}

impl TileStrip {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn widget(&self, id: TileId) -> Option<&IndicatorWidget> {
        self.tiles.iter().find(|t| t.id == id).map(|t| &t.widget)
    }

    /// Render every tile left to right, separated by a single space.
    pub fn format_line(&self) -> String {
        let mut s = String::with_capacity(self.tiles.len() * 12);
        for (i, tile) in self.tiles.iter().enumerate() {
            if i > 0 {
                s.push(' ');
            }
            s.push_str(&tile.widget.text());
        }
        s
    }
}

impl StatusBar for TileStrip {
    fn add_right_tile(&mut self, widget: IndicatorWidget, priority: i32) -> TileId {
        self.next_id += 1;
        let id = TileId(self.next_id);
        let at = self
            .tiles
            .iter()
            .position(|t| t.priority > priority)
            .unwrap_or(self.tiles.len());
        self.tiles.insert(at, Tile { id, priority, widget });
        id
    }

    fn update_tile(&mut self, id: TileId, widget: IndicatorWidget) -> bool {
        match self.tiles.iter_mut().find(|t| t.id == id) {
            Some(tile) => {
                tile.widget = widget;
                true
            }
            None => false,
        }
    }

    fn remove_tile(&mut self, id: TileId) -> bool {
        let before = self.tiles.len();
        self.tiles.retain(|t| t.id != id);
        self.tiles.len() != before
    }
}
