//! Drawing on the map: mode controller, sketching, measurement and insertion flash.
//!
//! ## Module Structure
//!
//! - [`mode`] - Geometry types that can be drawn and their shortcuts
//! - [`geometry`] - Geometry values and the `MapFeature` component
//! - [`sketch`] - Gesture state of the geometry being drawn
//! - [`session`] - [`MapSession`]: interactions, mode picker, sketch and tooltip
//! - [`measure`] - Geodesic length/area and their formatting
//! - [`snap`] - Pointer snapping to existing features
//! - [`tooltip`] - Measurement tooltip state and egui rendering
//! - [`flash`] - Flash animation on feature insertion
//! - [`input`] - Pointer/keyboard systems for drawing
//! - [`rendering`] - Gizmo rendering of features and the sketch

mod flash;
mod geometry;
mod input;
mod measure;
mod mode;
mod rendering;
mod session;
mod sketch;
mod snap;
mod tooltip;


pub use mode::DrawMode;
pub use session::MapSession;
pub use tooltip::render_measure_tooltip;

use bevy::gizmos::config::{GizmoConfigGroup, GizmoConfigStore, GizmoLineStyle};
use bevy::prelude::*;

/// Gizmos for the geometry being drawn (dashed edit style)
#[derive(Default, Reflect, GizmoConfigGroup)]
pub struct SketchGizmoGroup;

/// Gizmos for committed features
#[derive(Default, Reflect, GizmoConfigGroup)]
pub struct FeatureGizmoGroup;

/// Gizmos for the insertion flash. Line width is driven by the animation.
#[derive(Default, Reflect, GizmoConfigGroup)]
pub struct FlashGizmoGroup;

fn configure_draw_gizmos(mut config_store: ResMut<GizmoConfigStore>) {
    let (config, _) = config_store.config_mut::<SketchGizmoGroup>();
    config.line.width = 3.0;
    // 20 px dashes with 20 px gaps at width 3
    config.line.style = GizmoLineStyle::Dashed {
        gap_scale: 20.0 / 3.0,
        line_scale: 20.0 / 3.0,
    };

    let (config, _) = config_store.config_mut::<FeatureGizmoGroup>();
    config.line.width = 2.0;

    let (config, _) = config_store.config_mut::<FlashGizmoGroup>();
    config.line.width = 1.25;
}

pub struct DrawPlugin;

impl Plugin for DrawPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<MapSession>()
            .init_gizmo_group::<SketchGizmoGroup>()
            .init_gizmo_group::<FeatureGizmoGroup>()
            .init_gizmo_group::<FlashGizmoGroup>()
            .add_systems(Startup, configure_draw_gizmos)
            .add_systems(
                Update,
                (
                    mode::handle_mode_shortcuts,
                    input::handle_draw_keys,
                    input::handle_draw_pointer,
                    flash::start_flash,
                    flash::apply_flash_stroke,
                    flash::end_finished_flashes,
                    flash::animate_flash,
                )
                    .chain(),
            )
            .add_systems(
                Update,
                (rendering::render_features, rendering::render_sketch)
                    .after(input::handle_draw_pointer),
            );
    }
}
