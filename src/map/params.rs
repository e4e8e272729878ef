//! Common SystemParam bundles for cursor handling on the map.
//!
//! ## Available Bundles
//!
//! - [`CameraParams`]: Camera and window access for cursor-to-map conversion
//!
//! ## Helper Functions
//!
//! - [`is_cursor_over_ui`]: Check if cursor is over egui UI (for input gating)
//! - [`wants_keyboard_input`]: Check if egui is consuming keyboard input

use bevy::ecs::system::SystemParam;
use bevy::math::DVec2;
use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use bevy_egui::EguiContexts;

use super::projection::MapOrigin;
use super::view::MapCamera;

/// Bundled camera and window queries for cursor-to-map calculations
#[derive(SystemParam)]
pub struct CameraParams<'w, 's> {
    pub window: Query<'w, 's, &'static Window, With<PrimaryWindow>>,
    pub camera: Query<'w, 's, (&'static Camera, &'static GlobalTransform), With<MapCamera>>,
    pub origin: Res<'w, MapOrigin>,
}

impl CameraParams<'_, '_> {
    /// Get the world position of the cursor, if available
    pub fn cursor_world_pos(&self) -> Option<Vec2> {
        let window = self.window.single().ok()?;
        let (camera, transform) = self.camera.single().ok()?;
        let cursor_pos = window.cursor_position()?;
        camera.viewport_to_world_2d(transform, cursor_pos).ok()
    }

    /// Get the Mercator position of the cursor, if available
    pub fn cursor_map_pos(&self) -> Option<DVec2> {
        self.cursor_world_pos()
            .map(|world| self.origin.to_mercator(world))
    }

    /// Cursor position in window pixels
    pub fn cursor_screen_pos(&self) -> Option<Vec2> {
        self.window.single().ok()?.cursor_position()
    }

    /// Cursor offset from the window center in pixels
    pub fn cursor_offset_from_center(&self) -> Option<Vec2> {
        let window = self.window.single().ok()?;
        let cursor = window.cursor_position()?;
        Some(cursor - Vec2::new(window.width(), window.height()) / 2.0)
    }

    /// Screen size of the primary window in logical pixels
    pub fn viewport_size(&self) -> Option<Vec2> {
        let window = self.window.single().ok()?;
        Some(Vec2::new(window.width(), window.height()))
    }
}

/// Check if the cursor is over egui UI
pub fn is_cursor_over_ui(contexts: &mut EguiContexts) -> bool {
    contexts
        .ctx_mut()
        .map(|ctx| ctx.is_pointer_over_area())
        .unwrap_or(false)
}

/// Check if egui wants keyboard input (e.g. a text field has focus)
pub fn wants_keyboard_input(contexts: &mut EguiContexts) -> bool {
    contexts
        .ctx_mut()
        .map(|ctx| ctx.wants_keyboard_input())
        .unwrap_or(false)
}
