//! Centralized color theme for the application.
//!
//! This module provides all colors used by the map overlays and the egui widgets.
//! Modify values here to change the application's color scheme.

use bevy::prelude::Color;

// ============================================================================
// Map Background
// ============================================================================

/// Clear color shown behind tiles that are still loading
pub const MAP_BACKGROUND: Color = Color::srgb(0.12, 0.12, 0.16);

// ============================================================================
// Sketch (edit style)
// ============================================================================

/// Cyan dashed stroke of the geometry being drawn
pub const SKETCH_STROKE: Color = Color::srgb(1.0 / 255.0, 186.0 / 255.0, 239.0 / 255.0);

/// Translucent white for sketch guides (circle radius)
pub const SKETCH_FILL: Color = Color::srgba(1.0, 1.0, 1.0, 0.3);

// ============================================================================
// Features
// ============================================================================

/// Amber outline of committed features
pub const FEATURE_STROKE: Color = Color::srgb(1.0, 0.8, 0.2);

/// Faint white inner ring for point features
pub const FEATURE_FILL: Color = Color::srgba(1.0, 1.0, 1.0, 0.2);

/// Red flash circle at the given opacity
pub fn flash_color(opacity: f32) -> Color {
    Color::srgba(1.0, 0.0, 0.0, opacity.clamp(0.0, 1.0))
}

// ============================================================================
// UI Colors (egui)
// ============================================================================

pub mod ui {
    use bevy_egui::egui;

    /// Dark navy background of toolbar buttons and the coordinate readout
    pub const BUTTON_BACKGROUND: egui::Color32 = egui::Color32::from_rgb(0x1E, 0x1E, 0x2C);

    /// Light grey background of the active toolbar button
    pub const BUTTON_ACTIVE: egui::Color32 = egui::Color32::from_rgb(0xB7, 0xB7, 0xB7);

    /// White glyphs on toolbar buttons
    pub const BUTTON_TEXT: egui::Color32 = egui::Color32::WHITE;

    /// Dark glyphs on the active (light) toolbar button
    pub const BUTTON_TEXT_ACTIVE: egui::Color32 = egui::Color32::from_rgb(0x1E, 0x1E, 0x2C);

    /// White measurement tooltip background
    pub const TOOLTIP_BACKGROUND: egui::Color32 = egui::Color32::WHITE;

    /// Black measurement tooltip text
    pub const TOOLTIP_TEXT: egui::Color32 = egui::Color32::BLACK;

    /// Readout text
    pub const READOUT_TEXT: egui::Color32 = egui::Color32::WHITE;

    /// Grey for help/hint text
    pub const HINT_TEXT: egui::Color32 = egui::Color32::GRAY;
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::color::Alpha;

    #[test]
    fn test_flash_color_clamps_opacity() {
        assert_eq!(flash_color(1.5).alpha(), 1.0);
        assert_eq!(flash_color(-0.2).alpha(), 0.0);
        assert!((flash_color(0.4).alpha() - 0.4).abs() < 1e-6);
    }
}
