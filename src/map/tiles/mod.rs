//! Raster base map: tile requests, background downloads and tile sprites.

mod coords;
mod fetch;
mod filter;

pub use coords::{tile_zoom_for_view, visible_tiles, TileCoord};
pub use fetch::{fetch_tile, tile_image, TileError, TileRequest};

use bevy::prelude::*;
use bevy::tasks::{AsyncComputeTaskPool, Task};
use futures_lite::future;
use image::RgbaImage;
use std::collections::{HashMap, HashSet};

use crate::config::AppConfig;
use crate::constants::MAX_TILE_FETCHES_PER_FRAME;

use super::params::CameraParams;
use super::projection::MapOrigin;
use super::view::MapView;

/// Z of a zoom-0 tile. Deeper zoom levels stack slightly above.
const TILE_BASE_Z: f32 = 1.0;

/// A spawned tile sprite
#[derive(Component, Debug)]
pub struct MapTile {
    pub coord: TileCoord,
}

/// An in-flight tile download
#[derive(Component)]
pub struct TileFetchTask {
    coord: TileCoord,
    task: Task<Result<RgbaImage, TileError>>,
}

/// Bookkeeping for every tile that has been requested.
///
/// A coord lives in at most one of the three sets. Failed tiles are not retried.
#[derive(Resource, Debug, Default)]
pub struct TileCache {
    loaded: HashMap<TileCoord, Entity>,
    pending: HashSet<TileCoord>,
    failed: HashSet<TileCoord>,
}

impl TileCache {
    /// True if the tile is loaded, downloading or known to be unavailable
    pub fn is_known(&self, coord: &TileCoord) -> bool {
        self.loaded.contains_key(coord) || self.pending.contains(coord) || self.failed.contains(coord)
    }

    pub fn loaded_count(&self) -> usize {
        self.loaded.len()
    }

    pub fn mark_pending(&mut self, coord: TileCoord) {
        self.pending.insert(coord);
    }

    pub fn mark_loaded(&mut self, coord: TileCoord, entity: Entity) {
        self.pending.remove(&coord);
        self.loaded.insert(coord, entity);
    }

    pub fn mark_failed(&mut self, coord: TileCoord) {
        self.pending.remove(&coord);
        self.failed.insert(coord);
    }

    /// Drop loaded tiles the view no longer needs and return their entities.
    ///
    /// Tiles of other zoom levels stay until every wanted tile has settled so
    /// the map does not flash empty while zooming.
    pub fn retain_for_view(&mut self, wanted: &HashSet<TileCoord>, z: u8) -> Vec<Entity> {
        let settled = wanted
            .iter()
            .all(|c| self.loaded.contains_key(c) || self.failed.contains(c));

        let mut removed = Vec::new();
        self.loaded.retain(|coord, entity| {
            let keep = wanted.contains(coord) || (coord.z != z && !settled);
            if !keep {
                removed.push(*entity);
            }
            keep
        });
        removed
    }
}

/// Tiles covering the current view, nearest first
fn wanted_tiles(view: &MapView, camera: &CameraParams) -> Option<(u8, Vec<TileCoord>)> {
    let viewport = camera.viewport_size()?;
    let z = tile_zoom_for_view(view.zoom);
    Some((z, visible_tiles(view.center, view.resolution(), viewport, z)))
}

/// Start downloads for visible tiles that are not yet known
pub fn request_visible_tiles(
    mut commands: Commands,
    view: Res<MapView>,
    camera: CameraParams,
    config: Res<AppConfig>,
    mut cache: ResMut<TileCache>,
) {
    let Some((_, tiles)) = wanted_tiles(&view, &camera) else {
        return;
    };

    let missing: Vec<TileCoord> = tiles
        .into_iter()
        .filter(|coord| !cache.is_known(coord))
        .take(MAX_TILE_FETCHES_PER_FRAME)
        .collect();

    if missing.is_empty() {
        return;
    }

    let task_pool = AsyncComputeTaskPool::get();
    for coord in missing {
        let request = TileRequest::new(
            coord,
            &config.data.tile_url,
            &config.data.user_agent,
            config.data.night_filter,
        );
        debug!("Requesting tile {}", request.url);
        cache.mark_pending(coord);
        let task = task_pool.spawn(async move { fetch_tile(&request) });
        commands.spawn(TileFetchTask { coord, task });
    }
}

/// Turn finished downloads into tile sprites
pub fn poll_tile_tasks(
    mut commands: Commands,
    mut tasks: Query<(Entity, &mut TileFetchTask)>,
    mut images: ResMut<Assets<Image>>,
    mut cache: ResMut<TileCache>,
    origin: Res<MapOrigin>,
) {
    for (entity, mut fetch) in tasks.iter_mut() {
        let Some(result) = future::block_on(future::poll_once(&mut fetch.task)) else {
            continue;
        };
        let coord = fetch.coord;
        commands.entity(entity).despawn();

        match result {
            Ok(rgba) => {
                let size = TileCoord::size_m(coord.z) as f32;
                let position = origin
                    .to_world(coord.center())
                    .extend(TILE_BASE_Z + coord.z as f32 * 0.01);
                let tile = commands
                    .spawn((
                        MapTile { coord },
                        Sprite {
                            image: images.add(tile_image(rgba)),
                            custom_size: Some(Vec2::splat(size)),
                            ..default()
                        },
                        Transform::from_translation(position),
                    ))
                    .id();
                cache.mark_loaded(coord, tile);
            }
            Err(e) => {
                warn!(
                    "Tile {}/{}/{} unavailable: {}",
                    coord.z,
                    coord.wrapped_x(),
                    coord.y,
                    e
                );
                cache.mark_failed(coord);
            }
        }
    }
}

/// Despawn tiles that left the view
pub fn prune_tiles(
    mut commands: Commands,
    view: Res<MapView>,
    camera: CameraParams,
    mut cache: ResMut<TileCache>,
) {
    let Some((z, tiles)) = wanted_tiles(&view, &camera) else {
        return;
    };
    let wanted: HashSet<TileCoord> = tiles.into_iter().collect();

    let removed = cache.retain_for_view(&wanted, z);
    if removed.is_empty() {
        return;
    }
    for entity in &removed {
        commands.entity(*entity).despawn();
    }
    debug!(
        "Pruned {} tiles, {} still loaded",
        removed.len(),
        cache.loaded_count()
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entities(n: usize) -> Vec<Entity> {
        let mut world = World::new();
        (0..n).map(|_| world.spawn_empty().id()).collect()
    }

    #[test]
    fn test_cache_states_are_exclusive() {
        let e = entities(1)[0];
        let mut cache = TileCache::default();
        let a = TileCoord::new(3, 1, 1);
        let b = TileCoord::new(3, 2, 1);

        assert!(!cache.is_known(&a));
        cache.mark_pending(a);
        cache.mark_pending(b);
        assert!(cache.pending.contains(&a));

        cache.mark_loaded(a, e);
        cache.mark_failed(b);
        assert!(cache.pending.is_empty());
        assert_eq!(cache.failed.len(), 1);
        assert!(cache.is_known(&a));
        assert!(cache.is_known(&b));
        assert_eq!(cache.loaded_count(), 1);
    }

    #[test]
    fn test_offscreen_tiles_are_pruned() {
        let ents = entities(2);
        let mut cache = TileCache::default();
        let visible = TileCoord::new(5, 10, 10);
        let gone = TileCoord::new(5, 20, 10);
        cache.mark_loaded(visible, ents[0]);
        cache.mark_loaded(gone, ents[1]);

        let wanted = HashSet::from([visible]);
        let removed = cache.retain_for_view(&wanted, 5);

        assert_eq!(removed, vec![ents[1]]);
        assert_eq!(cache.loaded_count(), 1);
    }

    #[test]
    fn test_previous_zoom_kept_until_new_zoom_settles() {
        let ents = entities(2);
        let mut cache = TileCache::default();
        let old = TileCoord::new(4, 5, 5);
        let new = TileCoord::new(5, 10, 10);
        cache.mark_loaded(old, ents[0]);
        cache.mark_pending(new);

        let wanted = HashSet::from([new]);
        assert!(cache.retain_for_view(&wanted, 5).is_empty());

        cache.mark_loaded(new, ents[1]);
        assert_eq!(cache.retain_for_view(&wanted, 5), vec![ents[0]]);
    }

    #[test]
    fn test_failed_tile_counts_as_settled() {
        let ents = entities(1);
        let mut cache = TileCache::default();
        let old = TileCoord::new(4, 5, 5);
        let new = TileCoord::new(5, 10, 10);
        cache.mark_loaded(old, ents[0]);
        cache.mark_failed(new);

        let wanted = HashSet::from([new]);
        assert_eq!(cache.retain_for_view(&wanted, 5), vec![ents[0]]);
    }
}
