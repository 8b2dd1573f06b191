//! Status bar indicator for the global overtype flag.
//!
//! `StatusIndicator::render` is a pure function of the global flag. Clicks are
//! translated, not executed: a left click yields `CommandEvent::ToggleAll`,
//! which the session dispatches like any other command. `IndicatorSlot` owns
//! the lifecycle: the tile exists only while the status bar service is present
//! and `status.show_indicator` is enabled.

use core_events::{CommandEvent, MouseButton};
use tracing::debug;

use crate::tiles::{StatusBar, TileId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndicatorWidget {
    pub label: &'static str,
    pub active: bool,
    pub tooltip: &'static str,
}

impl IndicatorWidget {
    /// Textual rendering; active state is shown with brackets.
    pub fn text(&self) -> String {
        if self.active {
            format!("[{}]", self.label)
        } else {
            self.label.to_string()
        }
    }
}

#[derive(Debug)]
pub struct StatusIndicator {
    tile: TileId,
}

impl StatusIndicator {
    pub fn render(global: bool) -> IndicatorWidget {
        IndicatorWidget {
            label: if global { "Overtype" } else { "Insert" },
            active: global,
            tooltip: "Click to toggle overtype in all editors",
        }
    }

    pub fn attach(bar: &mut dyn StatusBar, priority: i32, global: bool) -> Self {
        let tile = bar.add_right_tile(Self::render(global), priority);
        debug!(target: "status", tile = tile.0, priority, "indicator_attached");
        Self { tile }
    }

    pub fn tile(&self) -> TileId {
        self.tile
    }

    pub fn refresh(&self, bar: &mut dyn StatusBar, global: bool) {
        if !bar.update_tile(self.tile, Self::render(global)) {
            debug!(target: "status", tile = self.tile.0, "indicator_tile_missing");
        }
    }

    /// Only a left click toggles.
    pub fn click(&self, button: MouseButton) -> Option<CommandEvent> {
        (button == MouseButton::Left).then_some(CommandEvent::ToggleAll)
    }

    pub fn destroy(self, bar: &mut dyn StatusBar) {
        bar.remove_tile(self.tile);
        debug!(target: "status", tile = self.tile.0, "indicator_destroyed");
    }
}

/// Optional indicator with create/destroy driven by service and setting.
#[derive(Debug, Default)]
pub struct IndicatorSlot {
    indicator: Option<StatusIndicator>,
}

impl IndicatorSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_shown(&self) -> bool {
        self.indicator.is_some()
    }

    pub fn indicator(&self) -> Option<&StatusIndicator> {
        self.indicator.as_ref()
    }

    /// Reconcile with the current service availability and setting.
    /// Returns true when the indicator was created or destroyed.
    pub fn sync(
        &mut self,
        bar: Option<&mut dyn StatusBar>,
        enabled: bool,
        priority: i32,
        global: bool,
    ) -> bool {
        match (bar, enabled, self.indicator.take()) {
            (Some(bar), true, None) => {
                self.indicator = Some(StatusIndicator::attach(bar, priority, global));
                true
            }
            (Some(bar), false, Some(existing)) => {
                existing.destroy(bar);
                true
            }
            // Service withdrawn: its tiles went with it.
            (None, _, Some(_)) => {
                debug!(target: "status", "indicator_dropped_service_gone");
                true
            }
            (_, _, current) => {
                self.indicator = current;
                false
            }
        }
    }

    pub fn refresh(&self, bar: Option<&mut dyn StatusBar>, global: bool) {
        if let (Some(ind), Some(bar)) = (self.indicator.as_ref(), bar) {
            ind.refresh(bar, global);
        }
    }

    pub fn click(&self, button: MouseButton) -> Option<CommandEvent> {
        self.indicator.as_ref().and_then(|ind| ind.click(button))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tiles::TileStrip;
    use pretty_assertions::assert_eq;

    #[test]
    fn render_reflects_global_flag() {
        let on = StatusIndicator::render(true);
        assert!(on.active);
        assert_eq!(on.text(), "[Overtype]");
        let off = StatusIndicator::render(false);
        assert!(!off.active);
        assert_eq!(off.text(), "Insert");
    }

    #[test]
    fn left_click_only_toggles() {
        let mut strip = TileStrip::new();
        let ind = StatusIndicator::attach(&mut strip, 100, false);
        assert_eq!(ind.click(MouseButton::Left), Some(CommandEvent::ToggleAll));
        assert_eq!(ind.click(MouseButton::Right), None);
        assert_eq!(ind.click(MouseButton::Middle), None);
    }

    #[test]
    fn slot_needs_both_service_and_setting() {
        let mut strip = TileStrip::new();
        let mut slot = IndicatorSlot::new();

        assert!(!slot.sync(None, true, 100, false));
        assert!(!slot.is_shown());

        assert!(!slot.sync(Some(&mut strip), false, 100, false));
        assert!(!slot.is_shown());

        assert!(slot.sync(Some(&mut strip), true, 100, false));
        assert!(slot.is_shown());
        assert_eq!(strip.len(), 1);
        assert!(!slot.sync(Some(&mut strip), true, 100, false), "already shown");

        assert!(slot.sync(Some(&mut strip), false, 100, false));
        assert!(!slot.is_shown());
        assert!(strip.is_empty());
    }

    #[test]
    fn slot_drops_when_service_withdrawn() {
        let mut strip = TileStrip::new();
        let mut slot = IndicatorSlot::new();
        slot.sync(Some(&mut strip), true, 100, false);
        assert!(slot.sync(None, true, 100, false));
        assert!(!slot.is_shown());
        assert_eq!(slot.click(MouseButton::Left), None);
    }

    #[test]
    fn refresh_updates_tile() {
        let mut strip = TileStrip::new();
        let mut slot = IndicatorSlot::new();
        slot.sync(Some(&mut strip), true, 100, false);
        slot.refresh(Some(&mut strip), true);
        assert_eq!(strip.format_line(), "[Overtype]");
        let tile = slot.indicator().unwrap().tile();
        assert!(strip.widget(tile).unwrap().active);
    }
}
