//! Drawing-mode controller.
//!
//! [`MapSession`] owns the interactions attached to the map, the mode picker
//! state, the sketch in progress and its measurement tooltip. Switching modes
//! always detaches the previous draw and snap interactions before attaching new
//! ones, so there is never more than one of each.

use bevy::math::DVec2;
use bevy::prelude::*;

use super::geometry::Geometry;
use super::mode::DrawMode;
use super::sketch::Sketch;
use super::tooltip::MeasureTooltip;

/// An object translating pointer input into map edits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interaction {
    /// Draws geometries of one type
    Draw { mode: DrawMode },
    /// Snaps the pointer to existing features
    Snap,
}

#[derive(Resource, Debug, Default)]
pub struct MapSession {
    interactions: Vec<Interaction>,
    picker_open: bool,
    active_button: Option<DrawMode>,
    sketch: Option<Sketch>,
    pointer: Option<DVec2>,
    tooltip: MeasureTooltip,
}

impl MapSession {
    pub fn interactions(&self) -> &[Interaction] {
        &self.interactions
    }

    /// Mode of the attached draw interaction, if any
    pub fn draw_mode(&self) -> Option<DrawMode> {
        self.interactions.iter().find_map(|i| match i {
            Interaction::Draw { mode } => Some(*mode),
            Interaction::Snap => None,
        })
    }

    pub fn has_snap(&self) -> bool {
        self.interactions.contains(&Interaction::Snap)
    }

    pub fn picker_open(&self) -> bool {
        self.picker_open
    }

    /// Mode whose picker button is highlighted
    pub fn active_button(&self) -> Option<DrawMode> {
        self.active_button
    }

    pub fn sketch(&self) -> Option<&Sketch> {
        self.sketch.as_ref()
    }

    /// Last (snapped) pointer position reported while drawing
    pub fn pointer(&self) -> Option<DVec2> {
        self.pointer
    }

    pub fn tooltip(&self) -> &MeasureTooltip {
        &self.tooltip
    }

    pub fn toggle_open(&mut self) {
        self.picker_open = !self.picker_open;
    }

    /// Picker button click: activate `mode` and highlight its button
    pub fn select_mode(&mut self, mode: DrawMode) {
        self.activate(mode);
        self.active_button = Some(mode);
    }

    /// Select a mode by geometry type name. Unsupported names are ignored.
    pub fn select_mode_by_name(&mut self, name: &str) -> bool {
        match DrawMode::from_type_name(name) {
            Some(mode) => {
                self.select_mode(mode);
                true
            }
            None => {
                debug!("Ignoring unsupported geometry type {:?}", name);
                false
            }
        }
    }

    /// Replace the current draw and snap interactions with new ones for `mode`
    pub fn activate(&mut self, mode: DrawMode) {
        self.remove_interactions();
        self.interactions.push(Interaction::Draw { mode });
        self.interactions.push(Interaction::Snap);
        info!("Drawing {}", mode.type_name());
    }

    /// Detach all drawing interactions and return to plain navigation
    pub fn clear(&mut self) {
        if !self.interactions.is_empty() {
            info!("Drawing cleared");
        }
        self.remove_interactions();
        self.active_button = None;
    }

    fn remove_interactions(&mut self) {
        self.interactions
            .retain(|i| !matches!(i, Interaction::Draw { .. } | Interaction::Snap));
        self.abort();
        self.pointer = None;
    }

    /// Pointer moved to `point` (already snapped)
    pub fn pointer_moved(&mut self, point: DVec2) {
        if self.draw_mode().is_none() {
            return;
        }
        self.pointer = Some(point);
        if let Some(sketch) = self.sketch.as_mut() {
            sketch.set_pointer(point);
            self.refresh_tooltip();
        }
    }

    /// Click at `point`. Starts a sketch if none is in progress and returns the
    /// geometry when the click completes it.
    pub fn press(&mut self, point: DVec2, close_tolerance: f64) -> Option<Geometry> {
        let mode = self.draw_mode()?;
        self.pointer = Some(point);

        let sketch = self.sketch.get_or_insert_with(|| Sketch::new(mode));
        match sketch.click(point, close_tolerance) {
            Some(geometry) => {
                self.end_sketch();
                Some(geometry)
            }
            None => {
                self.refresh_tooltip();
                None
            }
        }
    }

    /// Finish the sketch (double click or Enter)
    pub fn finish(&mut self) -> Option<Geometry> {
        let geometry = self.sketch.as_ref()?.finish()?;
        self.end_sketch();
        Some(geometry)
    }

    /// Discard the sketch in progress. Returns false if there was none.
    pub fn abort(&mut self) -> bool {
        let had_sketch = self.sketch.is_some();
        self.end_sketch();
        had_sketch
    }

    /// Remove the last sketch vertex, aborting once none are left
    pub fn undo_vertex(&mut self) {
        let Some(sketch) = self.sketch.as_mut() else {
            return;
        };
        sketch.undo();
        if sketch.is_empty() {
            self.end_sketch();
        } else {
            self.refresh_tooltip();
        }
    }

    fn end_sketch(&mut self) {
        self.sketch = None;
        self.tooltip.hide();
    }

    fn refresh_tooltip(&mut self) {
        if let Some(geometry) = self.sketch.as_ref().and_then(Sketch::geometry) {
            self.tooltip.update(&geometry);
        }
    }
}
