//! Help popup window and keyboard shortcut handling.

use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts};

use crate::map::wants_keyboard_input;

#[derive(Resource, Default)]
pub struct HelpWindowState {
    pub is_open: bool,
}

/// Renders the help popup window with keyboard shortcuts.
pub fn help_popup_ui(
    mut contexts: EguiContexts,
    mut help_state: ResMut<HelpWindowState>,
) -> Result {
    if !help_state.is_open {
        return Ok(());
    }

    let ctx = contexts.ctx_mut()?;

    egui::Window::new("Help")
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .default_width(360.0)
        .show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label("Version:");
                ui.strong(env!("CARGO_PKG_VERSION"));
            });

            ui.separator();
            render_drawing_section(ui);

            ui.add_space(10.0);
            ui.separator();
            render_map_section(ui);

            ui.add_space(10.0);

            ui.with_layout(egui::Layout::right_to_left(egui::Align::TOP), |ui| {
                if ui.button("Close").clicked() {
                    help_state.is_open = false;
                }
            });
        });

    Ok(())
}

fn render_drawing_section(ui: &mut egui::Ui) {
    ui.heading("Drawing");
    egui::Grid::new("drawing_grid")
        .num_columns(2)
        .spacing([20.0, 4.0])
        .show(ui, |ui| {
            ui.strong("1 / 2 / 3 / 4");
            ui.label("Point / Line / Polygon / Circle");
            ui.end_row();

            ui.strong("D");
            ui.label("Show or hide the drawing tools");
            ui.end_row();

            ui.strong("V");
            ui.label("Stop drawing");
            ui.end_row();

            ui.strong("Double-click / Enter");
            ui.label("Finish line or polygon");
            ui.end_row();

            ui.strong("Backspace");
            ui.label("Remove last vertex");
            ui.end_row();

            ui.strong("Escape");
            ui.label("Cancel sketch, then stop drawing");
            ui.end_row();
        });
}

fn render_map_section(ui: &mut egui::Ui) {
    ui.heading("Map");
    egui::Grid::new("map_grid")
        .num_columns(2)
        .spacing([20.0, 4.0])
        .show(ui, |ui| {
            ui.strong("Scroll");
            ui.label("Zoom at cursor");
            ui.end_row();

            ui.strong("+ / -");
            ui.label("Zoom in / out");
            ui.end_row();

            ui.strong("Left / middle drag");
            ui.label("Pan");
            ui.end_row();

            ui.strong("Shift + drag");
            ui.label("Zoom around the center");
            ui.end_row();

            ui.strong("H");
            ui.label("Toggle this help");
            ui.end_row();
        });
}

pub fn handle_help_shortcut(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut help_state: ResMut<HelpWindowState>,
    mut contexts: EguiContexts,
) {
    // Don't toggle if typing in a text field
    if wants_keyboard_input(&mut contexts) {
        return;
    }

    if keyboard.just_pressed(KeyCode::KeyH) {
        help_state.is_open = !help_state.is_open;
    }
}
