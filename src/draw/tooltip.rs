//! Measurement tooltip shown next to the pointer while drawing.

use bevy::math::DVec2;
use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts};

use crate::constants::TOOLTIP_OFFSET_PX;
use crate::map::{MapCamera, MapOrigin};
use crate::theme;

use super::geometry::Geometry;
use super::measure::measure_tooltip_text;
use super::session::MapSession;

/// Tooltip display state: text and map-space anchor. Only visible while a
/// geometry is being drawn.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeasureTooltip {
    text: String,
    anchor: Option<DVec2>,
}

impl MeasureTooltip {
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Map-space (Mercator) anchor, `None` while hidden
    pub fn anchor(&self) -> Option<DVec2> {
        self.anchor
    }

    pub fn is_visible(&self) -> bool {
        self.anchor.is_some()
    }

    /// Recompute from the sketch geometry. Geometries without a measurement
    /// (points) leave the tooltip untouched.
    pub fn update(&mut self, geometry: &Geometry) {
        let Some(text) = measure_tooltip_text(geometry) else {
            return;
        };
        self.text = text;
        self.anchor = geometry.measure_anchor();
    }

    pub fn hide(&mut self) {
        self.text.clear();
        self.anchor = None;
    }
}

/// Draw the tooltip at its anchor using egui
pub fn render_measure_tooltip(
    mut contexts: EguiContexts,
    session: Res<MapSession>,
    origin: Res<MapOrigin>,
    camera_query: Query<(&Camera, &GlobalTransform), With<MapCamera>>,
) -> Result {
    let tooltip = session.tooltip();
    let Some(anchor) = tooltip.anchor() else {
        return Ok(());
    };

    let Ok((camera, camera_transform)) = camera_query.single() else {
        return Ok(());
    };

    let world_pos = origin.to_world(anchor);
    let Ok(screen_pos) = camera.world_to_viewport(camera_transform, world_pos.extend(0.0)) else {
        return Ok(());
    };

    let ctx = contexts.ctx_mut()?;
    let (dx, dy) = TOOLTIP_OFFSET_PX;

    egui::Area::new(egui::Id::new("measure_tooltip"))
        .fixed_pos(egui::pos2(screen_pos.x + dx, screen_pos.y + dy))
        .pivot(egui::Align2::CENTER_BOTTOM)
        .interactable(false)
        .show(ctx, |ui| {
            egui::Frame::new()
                .fill(theme::ui::TOOLTIP_BACKGROUND)
                .corner_radius(4.0)
                .inner_margin(egui::Margin::symmetric(8, 4))
                .show(ui, |ui| {
                    ui.label(
                        egui::RichText::new(tooltip.text())
                            .color(theme::ui::TOOLTIP_TEXT)
                            .strong(),
                    );
                });
        });

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::measure::{format_length, geodesic_length};

    #[test]
    fn test_hidden_by_default() {
        let tooltip = MeasureTooltip::default();
        assert!(!tooltip.is_visible());
        assert_eq!(tooltip.text(), "");
    }

    #[test]
    fn test_point_is_a_no_op() {
        let mut tooltip = MeasureTooltip::default();
        tooltip.update(&Geometry::Point(DVec2::ZERO));
        assert!(!tooltip.is_visible());
    }

    #[test]
    fn test_anchor_follows_last_coordinate() {
        let mut tooltip = MeasureTooltip::default();
        let coords = vec![DVec2::ZERO, DVec2::new(30.0, 40.0)];
        let expected = format_length(geodesic_length(&coords, false));
        tooltip.update(&Geometry::LineString(coords));

        assert!(tooltip.is_visible());
        assert_eq!(tooltip.anchor(), Some(DVec2::new(30.0, 40.0)));
        assert_eq!(tooltip.text(), expected);
        assert!(expected.ends_with(" m"));

        tooltip.hide();
        assert!(!tooltip.is_visible());
        assert_eq!(tooltip.text(), "");
    }

    #[test]
    fn test_circle_anchor_is_east_of_center() {
        let mut tooltip = MeasureTooltip::default();
        tooltip.update(&Geometry::Circle {
            center: DVec2::ZERO,
            rim: DVec2::new(0.0, 20.0),
        });
        assert_eq!(tooltip.anchor(), Some(DVec2::new(20.0, 0.0)));
        assert_eq!(tooltip.text().lines().count(), 2);
    }

    #[test]
    fn test_polygon_anchor_is_first_vertex() {
        let mut tooltip = MeasureTooltip::default();
        tooltip.update(&Geometry::Polygon(vec![
            DVec2::new(5.0, 5.0),
            DVec2::new(25.0, 5.0),
            DVec2::new(25.0, 25.0),
        ]));
        assert_eq!(tooltip.anchor(), Some(DVec2::new(5.0, 5.0)));
    }
}
