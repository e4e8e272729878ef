//! Center coordinate readout, refreshed when the view stops moving.

use bevy::math::DVec2;
use bevy::prelude::*;

use super::projection::to_lon_lat;
use super::view::MapView;

#[derive(Resource, Debug, Default)]
pub struct CenterReadout {
    pub latitude: f64,
    pub longitude: f64,
    /// View (center, zoom) seen on the previous frame
    last_view: Option<(DVec2, f64)>,
    moving: bool,
}

impl CenterReadout {
    /// Feed the current view. Returns true when a move just ended and the
    /// readout was refreshed.
    pub fn observe(&mut self, center: DVec2, zoom: f64) -> bool {
        let current = (center, zoom);
        if self.last_view != Some(current) {
            self.last_view = Some(current);
            self.moving = true;
            return false;
        }

        if !self.moving {
            return false;
        }

        self.moving = false;
        let lon_lat = to_lon_lat(center);
        self.longitude = lon_lat.x;
        self.latitude = lon_lat.y;
        true
    }

    /// Text shown in the readout panel
    pub fn label(&self) -> String {
        format!(
            "Latitude: {:.6} | Longitude: {:.6}",
            self.latitude, self.longitude
        )
    }
}

pub fn update_center_readout(view: Res<MapView>, mut readout: ResMut<CenterReadout>) {
    if readout.observe(view.center, view.zoom) {
        debug!("Move end at {}", readout.label());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::projection::from_lon_lat;

    #[test]
    fn test_readout_updates_only_after_move_ends() {
        let mut readout = CenterReadout::default();
        let center = from_lon_lat(107.60981, -6.914744);

        // First sighting counts as movement
        assert!(!readout.observe(center, 10.0));
        assert_eq!(readout.latitude, 0.0);

        // Unchanged view: move ended
        assert!(readout.observe(center, 10.0));
        assert!((readout.longitude - 107.60981).abs() < 1e-9);
        assert!((readout.latitude + 6.914744).abs() < 1e-9);

        // Still unchanged: nothing new
        assert!(!readout.observe(center, 10.0));
    }

    #[test]
    fn test_zoom_change_is_a_move() {
        let mut readout = CenterReadout::default();
        let center = from_lon_lat(0.0, 0.0);
        readout.observe(center, 10.0);
        readout.observe(center, 10.0);

        assert!(!readout.observe(center, 11.0));
        assert!(readout.observe(center, 11.0));
    }

    #[test]
    fn test_label_uses_six_decimals() {
        let mut readout = CenterReadout::default();
        let center = from_lon_lat(107.60981, -6.914744);
        readout.observe(center, 10.0);
        readout.observe(center, 10.0);
        assert_eq!(readout.label(), "Latitude: -6.914744 | Longitude: 107.609810");
    }
}
