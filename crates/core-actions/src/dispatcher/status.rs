//! Status bar service availability, the indicator setting and indicator clicks.

use super::{DispatchResult, dispatch};
use crate::Session;
use core_events::{Event, MouseButton, ServiceEvent, SettingChange};
use core_render::TileStrip;
use tracing::{debug, info};

pub(crate) fn handle_setting(change: SettingChange, session: &mut Session) -> DispatchResult {
    match change {
        SettingChange::ShowIndicator(enabled) => {
            // Later service and activation events re-read the live config.
            session.config.file.status.show_indicator = enabled;
            DispatchResult::from_dirty(session.sync_indicator(enabled))
        }
    }
}

pub(crate) fn handle_service(service: ServiceEvent, session: &mut Session) -> DispatchResult {
    match service {
        ServiceEvent::Provided => {
            if session.status_bar.is_none() {
                session.status_bar = Some(TileStrip::new());
                info!(target: "status", "status_bar_provided");
            }
        }
        ServiceEvent::Withdrawn => {
            if session.status_bar.take().is_some() {
                info!(target: "status", "status_bar_withdrawn");
            }
        }
    }
    let enabled = session.config.show_indicator();
    DispatchResult::from_dirty(session.sync_indicator(enabled))
}

pub(crate) fn handle_click(button: MouseButton, session: &mut Session) -> DispatchResult {
    match session.indicator.click(button) {
        Some(cmd) => dispatch(Event::Command(cmd), session),
        None => {
            debug!(target: "status", ?button, "indicator_click_ignored");
            DispatchResult::clean()
        }
    }
}
