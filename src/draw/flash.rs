//! Flash animation played when a feature is added to the map.
//!
//! A red circle grows from the feature's anchor while fading out. The circle
//! radius is in screen pixels, so it is converted with the current resolution
//! every frame.

use bevy::gizmos::config::GizmoConfigStore;
use bevy::math::DVec2;
use bevy::prelude::*;

use crate::config::AppConfig;
use crate::constants::{FLASH_BASE_RADIUS_PX, FLASH_GROWTH_PX};
use crate::map::{MapOrigin, MapView};
use crate::theme::flash_color;

use super::geometry::MapFeature;
use super::FlashGizmoGroup;

/// Cubic ease-out: fast start, slow end
pub fn ease_out(t: f64) -> f64 {
    1.0 - (1.0 - t).powi(3)
}

/// One rendered frame of a flash
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlashFrame {
    pub radius_px: f32,
    pub opacity: f32,
    pub stroke_width: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FlashStep {
    Frame(FlashFrame),
    Finished,
}

/// Running flash on a feature entity
#[derive(Component, Debug, Clone)]
pub struct FlashAnimation {
    pub start: f64,
    pub duration: f64,
    /// Mercator position the circle is centred on
    pub anchor: DVec2,
}

impl FlashAnimation {
    pub fn step(&self, now: f64) -> FlashStep {
        let elapsed = now - self.start;
        if self.duration <= 0.0 || elapsed >= self.duration {
            return FlashStep::Finished;
        }

        let ratio = (elapsed / self.duration).max(0.0);
        let opacity = ease_out(1.0 - ratio) as f32;
        FlashStep::Frame(FlashFrame {
            radius_px: ease_out(ratio) as f32 * FLASH_GROWTH_PX + FLASH_BASE_RADIUS_PX,
            opacity,
            stroke_width: 0.25 + opacity,
        })
    }
}

/// Start a flash on every newly added feature
pub fn start_flash(
    mut commands: Commands,
    time: Res<Time>,
    config: Res<AppConfig>,
    added: Query<(Entity, &MapFeature), Added<MapFeature>>,
) {
    let now = time.elapsed_secs_f64();
    for (entity, feature) in added.iter() {
        let Some(anchor) = feature.geometry.flash_anchor() else {
            continue;
        };
        commands.entity(entity).insert(FlashAnimation {
            start: now,
            duration: config.data.flash_duration_secs(),
            anchor,
        });
    }
}

/// Gizmo line width is per group, so the widest running flash sets it
pub fn apply_flash_stroke(
    time: Res<Time>,
    flashes: Query<&FlashAnimation>,
    mut config_store: ResMut<GizmoConfigStore>,
) {
    let now = time.elapsed_secs_f64();
    let width = flashes
        .iter()
        .filter_map(|flash| match flash.step(now) {
            FlashStep::Frame(frame) => Some(frame.stroke_width),
            FlashStep::Finished => None,
        })
        .fold(None, |widest: Option<f32>, w| Some(widest.map_or(w, |c| c.max(w))));

    if let Some(width) = width {
        let (config, _) = config_store.config_mut::<FlashGizmoGroup>();
        config.line.width = width;
    }
}

/// Draw running flashes
pub fn animate_flash(
    time: Res<Time>,
    view: Res<MapView>,
    origin: Res<MapOrigin>,
    mut gizmos: Gizmos<FlashGizmoGroup>,
    flashes: Query<&FlashAnimation>,
) {
    let now = time.elapsed_secs_f64();
    let resolution = view.resolution() as f32;

    for flash in flashes.iter() {
        if let FlashStep::Frame(frame) = flash.step(now) {
            gizmos
                .circle_2d(
                    origin.to_world(flash.anchor),
                    frame.radius_px * resolution,
                    flash_color(frame.opacity),
                )
                .resolution(64);
        }
    }
}

/// Remove finished flashes, or restart them when `flash_repeat` is set
pub fn end_finished_flashes(
    mut commands: Commands,
    time: Res<Time>,
    config: Res<AppConfig>,
    mut flashes: Query<(Entity, &mut FlashAnimation)>,
) {
    let now = time.elapsed_secs_f64();
    for (entity, mut flash) in flashes.iter_mut() {
        if flash.step(now) != FlashStep::Finished {
            continue;
        }
        if config.data.flash_repeat {
            flash.start = now;
        } else {
            commands.entity(entity).remove::<FlashAnimation>();
        }
    }
}
