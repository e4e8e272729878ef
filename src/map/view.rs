//! Map view state and the camera systems that follow it.
//!
//! [`MapView`] is the single source of truth for center and zoom. Input systems
//! mutate it; [`apply_map_view`] copies it onto the camera when it changes.

use bevy::input::mouse::{MouseMotion, MouseScrollUnit, MouseWheel};
use bevy::math::DVec2;
use bevy::prelude::*;
use bevy_egui::EguiContexts;

use crate::config::AppConfig;
use crate::constants::{
    DEFAULT_CENTER_LAT, DEFAULT_CENTER_LON, DEFAULT_ZOOM, MAX_ZOOM, MIN_ZOOM,
    WHEEL_ZOOM_PER_LINE, WHEEL_ZOOM_PER_PIXEL, ZOOM_ANIMATION_SECS, ZOOM_BUTTON_STEP,
};

use super::params::{is_cursor_over_ui, wants_keyboard_input, CameraParams};
use super::projection::{clamp_to_extent, from_lon_lat, resolution_for_zoom, MapOrigin};

/// Camera z, above every tile sprite
const CAMERA_Z: f32 = 1000.0;

#[derive(Component)]
pub struct MapCamera;

/// Smooth (in-and-out) easing: slow start, slow end
pub fn in_and_out(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// An in-flight zoom transition
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomAnimation {
    pub from: f64,
    pub to: f64,
    pub start: f64,
    pub duration: f64,
}

impl ZoomAnimation {
    /// Zoom at time `now`, and whether the animation has completed
    pub fn sample(&self, now: f64) -> (f64, bool) {
        if self.duration <= 0.0 {
            return (self.to, true);
        }
        let t = (now - self.start) / self.duration;
        if t >= 1.0 {
            return (self.to, true);
        }
        (self.from + (self.to - self.from) * in_and_out(t), false)
    }
}

#[derive(Resource, Debug, Clone, PartialEq)]
pub struct MapView {
    /// View center in Mercator metres
    pub center: DVec2,
    pub zoom: f64,
    pub animation: Option<ZoomAnimation>,
}

impl Default for MapView {
    fn default() -> Self {
        Self {
            center: from_lon_lat(DEFAULT_CENTER_LON, DEFAULT_CENTER_LAT),
            zoom: DEFAULT_ZOOM,
            animation: None,
        }
    }
}

impl MapView {
    /// Metres per pixel at the current zoom
    pub fn resolution(&self) -> f64 {
        resolution_for_zoom(self.zoom)
    }

    /// Jump to a zoom level, cancelling any animation
    pub fn set_zoom(&mut self, zoom: f64) {
        self.zoom = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
        self.animation = None;
    }

    /// Animate the zoom by `delta` levels starting at `now`
    pub fn animate_zoom_by(&mut self, delta: f64, now: f64) {
        let base = self.animation.map(|a| a.to).unwrap_or(self.zoom);
        let target = (base + delta).clamp(MIN_ZOOM, MAX_ZOOM);
        if (target - self.zoom).abs() < f64::EPSILON {
            self.animation = None;
            return;
        }
        self.animation = Some(ZoomAnimation {
            from: self.zoom,
            to: target,
            start: now,
            duration: ZOOM_ANIMATION_SECS,
        });
    }

    /// Advance the zoom animation. Returns true while animating.
    pub fn tick(&mut self, now: f64) -> bool {
        let Some(animation) = self.animation else {
            return false;
        };
        let (zoom, finished) = animation.sample(now);
        self.zoom = zoom;
        if finished {
            self.animation = None;
        }
        !finished
    }

    /// Zoom by `delta` levels keeping `anchor` (Mercator) fixed on screen
    pub fn zoom_around(&mut self, delta: f64, anchor: DVec2) {
        let old_resolution = self.resolution();
        self.set_zoom(self.zoom + delta);
        let ratio = self.resolution() / old_resolution;
        self.center = clamp_to_extent(anchor + (self.center - anchor) * ratio);
    }

    /// Move the view by a screen-space drag delta (y down)
    pub fn pan_by_pixels(&mut self, delta: Vec2) {
        let resolution = self.resolution();
        let shift = DVec2::new(-delta.x as f64 * resolution, delta.y as f64 * resolution);
        self.center = clamp_to_extent(self.center + shift);
    }
}

/// Startup system: seed the view and render origin from config
pub fn init_map_view(
    config: Res<AppConfig>,
    mut view: ResMut<MapView>,
    mut origin: ResMut<MapOrigin>,
) {
    let center = from_lon_lat(config.data.start_lon, config.data.start_lat);
    view.center = clamp_to_extent(center);
    view.set_zoom(config.data.start_zoom());
    *origin = MapOrigin::new(view.center);
    info!(
        "Map view at lon {:.6}, lat {:.6}, zoom {}",
        config.data.start_lon,
        config.data.start_lat,
        view.zoom
    );
}

pub fn spawn_camera(mut commands: Commands) {
    commands.spawn((
        Camera2d,
        MapCamera,
        Transform::from_translation(Vec3::new(0.0, 0.0, CAMERA_Z)),
    ));
}

fn shift_pressed(keyboard: &ButtonInput<KeyCode>) -> bool {
    keyboard.any_pressed([KeyCode::ShiftLeft, KeyCode::ShiftRight])
}

/// Drag to pan with the middle or left button. Left drags work while drawing
/// too; shift + left drag zooms instead.
pub fn camera_pan(
    mouse_button: Res<ButtonInput<MouseButton>>,
    keyboard: Res<ButtonInput<KeyCode>>,
    mut mouse_motion: MessageReader<MouseMotion>,
    mut view: ResMut<MapView>,
    mut contexts: EguiContexts,
    mut left_drag: Local<bool>,
) {
    if mouse_button.just_pressed(MouseButton::Left) {
        *left_drag = !shift_pressed(&keyboard) && !is_cursor_over_ui(&mut contexts);
    }
    if !mouse_button.pressed(MouseButton::Left) {
        *left_drag = false;
    }

    if !mouse_button.pressed(MouseButton::Middle) && !*left_drag {
        mouse_motion.clear();
        return;
    }

    for event in mouse_motion.read() {
        view.pan_by_pixels(event.delta);
    }
}

/// Zoom levels for a drag moving the cursor from `last` to `current` pixels
/// away from the view center. Moving outward zooms in.
pub fn drag_zoom_delta(last: f32, current: f32) -> f64 {
    if last <= f32::EPSILON || current <= f32::EPSILON {
        return 0.0;
    }
    (current as f64 / last as f64).log2()
}

/// Shift + left drag zooms around the view center
pub fn camera_drag_zoom(
    mouse_button: Res<ButtonInput<MouseButton>>,
    keyboard: Res<ButtonInput<KeyCode>>,
    mut view: ResMut<MapView>,
    camera: CameraParams,
    mut contexts: EguiContexts,
    mut last_magnitude: Local<Option<f32>>,
) {
    if !mouse_button.pressed(MouseButton::Left) {
        *last_magnitude = None;
        return;
    }

    let magnitude = camera.cursor_offset_from_center().map(|offset| offset.length());

    if mouse_button.just_pressed(MouseButton::Left) {
        *last_magnitude = if shift_pressed(&keyboard) && !is_cursor_over_ui(&mut contexts) {
            magnitude
        } else {
            None
        };
        return;
    }

    let (Some(last), Some(current)) = (*last_magnitude, magnitude) else {
        return;
    };

    let delta = drag_zoom_delta(last, current);
    if delta != 0.0 {
        let zoom = view.zoom + delta;
        view.set_zoom(zoom);
        *last_magnitude = Some(current);
    }
}

/// Mouse wheel zoom, anchored at the cursor
pub fn camera_zoom(
    mut scroll_events: MessageReader<MouseWheel>,
    mut view: ResMut<MapView>,
    camera: CameraParams,
    mut contexts: EguiContexts,
) {
    if is_cursor_over_ui(&mut contexts) {
        scroll_events.clear();
        return;
    }

    let delta: f64 = scroll_events
        .read()
        .map(|event| match event.unit {
            MouseScrollUnit::Line => event.y as f64 * WHEEL_ZOOM_PER_LINE,
            MouseScrollUnit::Pixel => event.y as f64 * WHEEL_ZOOM_PER_PIXEL,
        })
        .sum();

    if delta == 0.0 {
        return;
    }

    match camera.cursor_map_pos() {
        Some(anchor) => view.zoom_around(delta, anchor),
        None => {
            let zoom = view.zoom + delta;
            view.set_zoom(zoom);
        }
    }
}

/// `+` / `-` keys zoom like the toolbar buttons
pub fn handle_zoom_shortcuts(
    keyboard: Res<ButtonInput<KeyCode>>,
    time: Res<Time>,
    mut view: ResMut<MapView>,
    mut contexts: EguiContexts,
) {
    if wants_keyboard_input(&mut contexts) {
        return;
    }

    let now = time.elapsed_secs_f64();
    if keyboard.any_just_pressed([KeyCode::Equal, KeyCode::NumpadAdd]) {
        view.animate_zoom_by(ZOOM_BUTTON_STEP, now);
    } else if keyboard.any_just_pressed([KeyCode::Minus, KeyCode::NumpadSubtract]) {
        view.animate_zoom_by(-ZOOM_BUTTON_STEP, now);
    }
}

pub fn animate_zoom(time: Res<Time>, mut view: ResMut<MapView>) {
    if view.animation.is_none() {
        return;
    }
    view.tick(time.elapsed_secs_f64());
}

/// Copy the view onto the camera transform and projection
pub fn apply_map_view(
    view: Res<MapView>,
    origin: Res<MapOrigin>,
    mut camera_query: Query<(&mut Transform, &mut Projection), With<MapCamera>>,
) {
    if !view.is_changed() && !origin.is_changed() {
        return;
    }

    for (mut transform, mut projection) in camera_query.iter_mut() {
        transform.translation = origin.to_world(view.center).extend(CAMERA_Z);
        if let Projection::Orthographic(ref mut ortho) = *projection {
            ortho.scale = view.resolution() as f32;
        }
    }
}
