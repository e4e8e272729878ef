//! Gizmo rendering of committed features and the sketch in progress.

use bevy::gizmos::config::GizmoConfigGroup;
use bevy::math::DVec2;
use bevy::prelude::*;

use crate::map::{MapOrigin, MapView};
use crate::theme::{FEATURE_FILL, FEATURE_STROKE, SKETCH_FILL, SKETCH_STROKE};

use super::geometry::{Geometry, MapFeature};
use super::session::MapSession;
use super::{FeatureGizmoGroup, SketchGizmoGroup};

/// Screen radius of a point feature
const POINT_RADIUS_PX: f32 = 9.0;

/// Screen radius of the pointer vertex circle while drawing
const VERTEX_RADIUS_PX: f32 = 5.0;

fn draw_outline<C: GizmoConfigGroup>(
    gizmos: &mut Gizmos<C>,
    geometry: &Geometry,
    origin: &MapOrigin,
    color: Color,
) {
    let world = |p: &DVec2| origin.to_world(*p);
    match geometry {
        Geometry::Point(_) => {}
        Geometry::LineString(coords) => {
            gizmos.linestrip_2d(coords.iter().map(world), color);
        }
        Geometry::Polygon(coords) => {
            let closing = coords.first().map(world);
            gizmos.linestrip_2d(coords.iter().map(world).chain(closing), color);
        }
        Geometry::Circle { center, rim } => {
            gizmos
                .circle_2d(world(center), center.distance(*rim) as f32, color)
                .resolution(64);
        }
    }
}

pub fn render_features(
    mut gizmos: Gizmos<FeatureGizmoGroup>,
    features: Query<&MapFeature>,
    view: Res<MapView>,
    origin: Res<MapOrigin>,
) {
    let resolution = view.resolution() as f32;

    for feature in features.iter() {
        if let Geometry::Point(p) = feature.geometry {
            let center = origin.to_world(p);
            gizmos.circle_2d(center, POINT_RADIUS_PX * resolution, FEATURE_STROKE);
            gizmos.circle_2d(center, POINT_RADIUS_PX * 0.5 * resolution, FEATURE_FILL);
        } else {
            draw_outline(&mut gizmos, &feature.geometry, &origin, FEATURE_STROKE);
        }
    }
}

pub fn render_sketch(
    mut gizmos: Gizmos<SketchGizmoGroup>,
    session: Res<MapSession>,
    view: Res<MapView>,
    origin: Res<MapOrigin>,
) {
    if session.draw_mode().is_none() {
        return;
    }

    if let Some(geometry) = session.sketch().and_then(|s| s.geometry()) {
        draw_outline(&mut gizmos, &geometry, &origin, SKETCH_STROKE);

        // Faint radius line while sizing a circle
        if let Geometry::Circle { center, rim } = geometry {
            gizmos.line_2d(origin.to_world(center), origin.to_world(rim), SKETCH_FILL);
        }
    }

    if let Some(pointer) = session.pointer() {
        let radius = VERTEX_RADIUS_PX * view.resolution() as f32;
        gizmos.circle_2d(origin.to_world(pointer), radius, SKETCH_STROKE);
    }
}
