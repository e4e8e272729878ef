use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts};

use crate::constants::ZOOM_BUTTON_STEP;
use crate::draw::{DrawMode, MapSession};
use crate::map::MapView;
use crate::theme;

const BUTTON_SIZE: egui::Vec2 = egui::vec2(96.0, 28.0);

/// A toolbar button in the map's dark style, light when `active`
fn toolbar_button(ui: &mut egui::Ui, label: &str, active: bool) -> egui::Response {
    let (fill, text) = if active {
        (theme::ui::BUTTON_ACTIVE, theme::ui::BUTTON_TEXT_ACTIVE)
    } else {
        (theme::ui::BUTTON_BACKGROUND, theme::ui::BUTTON_TEXT)
    };

    ui.add(
        egui::Button::new(egui::RichText::new(label).size(14.0).strong().color(text))
            .fill(fill)
            .min_size(BUTTON_SIZE)
            .selected(active),
    )
}

/// Short usage hint for a draw mode
fn mode_hint(mode: DrawMode) -> &'static str {
    match mode {
        DrawMode::Point => "Click to place a point",
        DrawMode::LineString => "Click to add vertices\nDouble-click or Enter to finish",
        DrawMode::Polygon => "Click to add vertices\nClick the first vertex to close",
        DrawMode::Circle => "Click the center, then the rim",
    }
}

/// Map toolbar on the right edge: clear, zoom, and the draw mode picker
pub fn map_toolbar_ui(
    mut contexts: EguiContexts,
    mut session: ResMut<MapSession>,
    mut view: ResMut<MapView>,
    time: Res<Time>,
) -> Result {
    let ctx = contexts.ctx_mut()?;
    let now = time.elapsed_secs_f64();

    egui::Area::new(egui::Id::new("map_toolbar"))
        .anchor(egui::Align2::RIGHT_CENTER, [-12.0, 0.0])
        .show(ctx, |ui| {
            ui.spacing_mut().item_spacing.y = 4.0;

            if toolbar_button(ui, "Select", session.draw_mode().is_none())
                .on_hover_text("Stop drawing (V)")
                .clicked()
            {
                session.clear();
            }

            ui.add_space(8.0);

            if toolbar_button(ui, "+", false)
                .on_hover_text("Zoom in (+)")
                .clicked()
            {
                view.animate_zoom_by(ZOOM_BUTTON_STEP, now);
            }
            if toolbar_button(ui, "-", false)
                .on_hover_text("Zoom out (-)")
                .clicked()
            {
                view.animate_zoom_by(-ZOOM_BUTTON_STEP, now);
            }

            ui.add_space(8.0);

            if toolbar_button(ui, "Draw", session.picker_open())
                .on_hover_text("Show drawing tools (D)")
                .clicked()
            {
                session.toggle_open();
            }

            if session.picker_open() {
                for mode in DrawMode::all() {
                    let active = session.active_button() == Some(*mode);
                    if toolbar_button(ui, mode.type_name(), active)
                        .on_hover_text(mode.display_name())
                        .clicked()
                    {
                        session.select_mode(*mode);
                    }
                }
            }

            if let Some(mode) = session.draw_mode() {
                ui.add_space(6.0);
                ui.label(
                    egui::RichText::new(mode_hint(mode))
                        .color(theme::ui::HINT_TEXT)
                        .size(11.0),
                );
            }
        });

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_mode_has_a_hint() {
        for mode in DrawMode::all() {
            assert!(!mode_hint(*mode).is_empty());
        }
    }
}
