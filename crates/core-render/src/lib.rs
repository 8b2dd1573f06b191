//! Status bar presentation: the overtype indicator and the tile strip it
//! renders into.

pub mod status;
pub mod tiles;

pub use status::{IndicatorSlot, IndicatorWidget, StatusIndicator};
pub use tiles::{StatusBar, TileId, TileStrip};
