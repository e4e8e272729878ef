//! Pointer and keyboard input for the active draw interaction.

use bevy::math::DVec2;
use bevy::prelude::*;
use bevy_egui::EguiContexts;

use crate::constants::{
    CLICK_TOLERANCE_PX, CLOSE_RING_TOLERANCE_PX, DOUBLE_CLICK_SECS, SNAP_TOLERANCE_PX,
};
use crate::map::{is_cursor_over_ui, wants_keyboard_input, CameraParams, MapView};

use super::geometry::{Geometry, MapFeature};
use super::session::MapSession;
use super::snap::snap_point;

/// Maximum pointer travel between the two clicks of a double click, in pixels
const DOUBLE_CLICK_SLOP_PX: f64 = 4.0;

#[derive(Debug, Clone, Copy)]
pub struct LastClick {
    time: f64,
    position: DVec2,
}

/// Whether a click at `position`/`time` completes a double click
fn is_double_click(last: Option<LastClick>, position: DVec2, time: f64, resolution: f64) -> bool {
    last.is_some_and(|click| {
        time - click.time <= DOUBLE_CLICK_SECS
            && click.position.distance(position) <= DOUBLE_CLICK_SLOP_PX * resolution
    })
}

/// Whether a press and release at these window positions form a click rather
/// than a drag
fn is_click(pressed_at: Vec2, released_at: Vec2) -> bool {
    pressed_at.distance(released_at) <= CLICK_TOLERANCE_PX
}

fn add_feature(commands: &mut Commands, geometry: Geometry) {
    info!("Added {} feature", geometry.mode().type_name());
    commands.spawn(MapFeature::new(geometry));
}

#[allow(clippy::too_many_arguments)]
pub fn handle_draw_pointer(
    mut commands: Commands,
    mouse_button: Res<ButtonInput<MouseButton>>,
    keyboard: Res<ButtonInput<KeyCode>>,
    time: Res<Time>,
    view: Res<MapView>,
    camera: CameraParams,
    features: Query<&MapFeature>,
    mut session: ResMut<MapSession>,
    mut contexts: EguiContexts,
    mut last_click: Local<Option<LastClick>>,
    mut pressed_at: Local<Option<Vec2>>,
) {
    let Some(mode) = session.draw_mode() else {
        *last_click = None;
        *pressed_at = None;
        return;
    };

    if is_cursor_over_ui(&mut contexts) {
        return;
    }

    let Some(cursor) = camera.cursor_map_pos() else {
        return;
    };

    let resolution = view.resolution();
    let pointer = if session.has_snap() {
        snap_point(
            cursor,
            features.iter().map(|f| &f.geometry),
            SNAP_TOLERANCE_PX * resolution,
        )
        .unwrap_or(cursor)
    } else {
        cursor
    };

    if session.pointer() != Some(pointer) {
        session.pointer_moved(pointer);
    }

    // Shift + drag belongs to the map's zoom gesture
    if mouse_button.just_pressed(MouseButton::Left) {
        *pressed_at = if keyboard.any_pressed([KeyCode::ShiftLeft, KeyCode::ShiftRight]) {
            None
        } else {
            camera.cursor_screen_pos()
        };
    }

    if !mouse_button.just_released(MouseButton::Left) {
        return;
    }

    // Drags pan the map instead of adding vertices
    let clicked = pressed_at
        .take()
        .zip(camera.cursor_screen_pos())
        .is_some_and(|(pressed, released)| is_click(pressed, released));
    if !clicked {
        return;
    }

    let now = time.elapsed_secs_f64();
    let committed = if mode.finishes_on_double_click()
        && is_double_click(*last_click, pointer, now, resolution)
    {
        *last_click = None;
        session.finish()
    } else {
        *last_click = Some(LastClick {
            time: now,
            position: pointer,
        });
        session.press(pointer, CLOSE_RING_TOLERANCE_PX * resolution)
    };

    if let Some(geometry) = committed {
        add_feature(&mut commands, geometry);
    }
}

/// Enter finishes, Backspace removes the last vertex, Escape aborts the
/// sketch (or leaves drawing when there is none).
pub fn handle_draw_keys(
    mut commands: Commands,
    keyboard: Res<ButtonInput<KeyCode>>,
    mut session: ResMut<MapSession>,
    mut contexts: EguiContexts,
) {
    if session.draw_mode().is_none() || wants_keyboard_input(&mut contexts) {
        return;
    }

    if keyboard.any_just_pressed([KeyCode::Enter, KeyCode::NumpadEnter]) {
        if let Some(geometry) = session.finish() {
            add_feature(&mut commands, geometry);
        }
    } else if keyboard.just_pressed(KeyCode::Backspace) {
        session.undo_vertex();
    } else if keyboard.just_pressed(KeyCode::Escape) && !session.abort() {
        session.clear();
    }
}
