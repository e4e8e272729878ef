mod params;
pub mod projection;
mod readout;
pub mod tiles;
mod view;

pub use params::{is_cursor_over_ui, wants_keyboard_input, CameraParams};
pub use projection::{to_lon_lat, MapOrigin};
pub use readout::CenterReadout;
pub use tiles::TileCache;
pub use view::{MapCamera, MapView};

use bevy::prelude::*;

use crate::config::ConfigLoaded;
use crate::theme::MAP_BACKGROUND;

pub struct MapPlugin;

impl Plugin for MapPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(ClearColor(MAP_BACKGROUND))
            .init_resource::<MapView>()
            .init_resource::<MapOrigin>()
            .init_resource::<CenterReadout>()
            .init_resource::<TileCache>()
            .add_systems(
                Startup,
                (view::init_map_view.after(ConfigLoaded), view::spawn_camera),
            )
            .add_systems(
                Update,
                (
                    (
                        view::camera_pan,
                        view::camera_drag_zoom,
                        view::camera_zoom,
                        view::handle_zoom_shortcuts,
                        view::animate_zoom,
                    ),
                    view::apply_map_view,
                    readout::update_center_readout,
                )
                    .chain(),
            )
            .add_systems(
                Update,
                (
                    tiles::request_visible_tiles,
                    tiles::poll_tile_tasks,
                    tiles::prune_tiles,
                )
                    .chain()
                    .after(view::apply_map_view),
            );
    }
}
