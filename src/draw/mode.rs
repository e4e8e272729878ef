use bevy::prelude::*;
use bevy_egui::EguiContexts;

use crate::map::wants_keyboard_input;

use super::session::MapSession;

/// Geometry type produced by a draw interaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DrawMode {
    Point,
    LineString,
    Polygon,
    Circle,
}

impl DrawMode {
    /// Geometry type name as used by the mode picker
    pub fn type_name(&self) -> &'static str {
        match self {
            DrawMode::Point => "Point",
            DrawMode::LineString => "LineString",
            DrawMode::Polygon => "Polygon",
            DrawMode::Circle => "Circle",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            DrawMode::Point => "Point (1)",
            DrawMode::LineString => "Line (2)",
            DrawMode::Polygon => "Polygon (3)",
            DrawMode::Circle => "Circle (4)",
        }
    }

    pub fn all() -> &'static [DrawMode] {
        &[
            DrawMode::Point,
            DrawMode::LineString,
            DrawMode::Polygon,
            DrawMode::Circle,
        ]
    }

    /// Look up a mode by geometry type name. Unknown names yield `None`.
    pub fn from_type_name(name: &str) -> Option<DrawMode> {
        Self::all().iter().copied().find(|m| m.type_name() == name)
    }

    /// Whether a double click ends the sketch
    pub fn finishes_on_double_click(&self) -> bool {
        matches!(self, DrawMode::LineString | DrawMode::Polygon)
    }
}

pub fn handle_mode_shortcuts(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut session: ResMut<MapSession>,
    mut contexts: EguiContexts,
) {
    if wants_keyboard_input(&mut contexts) {
        return;
    }

    let mode = if keyboard.just_pressed(KeyCode::Digit1) {
        Some(DrawMode::Point)
    } else if keyboard.just_pressed(KeyCode::Digit2) {
        Some(DrawMode::LineString)
    } else if keyboard.just_pressed(KeyCode::Digit3) {
        Some(DrawMode::Polygon)
    } else if keyboard.just_pressed(KeyCode::Digit4) {
        Some(DrawMode::Circle)
    } else {
        None
    };

    if let Some(mode) = mode {
        session.select_mode(mode);
    }

    if keyboard.just_pressed(KeyCode::KeyV) {
        session.clear();
    }

    if keyboard.just_pressed(KeyCode::KeyD) {
        session.toggle_open();
    }
}
