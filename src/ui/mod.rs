mod dialogs;
mod help;
mod readout;
mod toolbar;

use bevy::prelude::*;
use bevy_egui::EguiPrimaryContextPass;

use crate::draw::render_measure_tooltip;

pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<help::HelpWindowState>()
            .add_systems(
                EguiPrimaryContextPass,
                (
                    // Map overlays first so windows draw above them
                    render_measure_tooltip,
                    readout::coordinate_readout_ui,
                    toolbar::map_toolbar_ui,
                )
                    .chain(),
            )
            .add_systems(
                EguiPrimaryContextPass,
                (
                    dialogs::config_reset_notification_ui,
                    help::help_popup_ui,
                )
                    .after(toolbar::map_toolbar_ui),
            )
            .add_systems(Update, help::handle_help_shortcut);
    }
}
