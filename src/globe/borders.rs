//! GeoJSON border rings draped on the globe surface
//!
//! Rings are resolved to world-space polylines once at startup and redrawn
//! every frame through the border entity's global transform, so they follow
//! the globe spin without any per-frame projection work.

use bevy::prelude::*;
use std::path::Path;

use crate::config::{DashboardOptions, parse_color_with_alpha};
use crate::core::projection::lglt2xyz;
use crate::globe::GlobeRoot;
use crate::overlay::{OverlayRegistry, replace_group};

/// One closed border ring, already lifted onto the sphere in the globe
/// group's local space.
#[derive(Component)]
pub struct BorderLine {
    pub points: Vec<Vec3>,
    pub color: Color,
}

pub fn setup_borders(
    options: Res<DashboardOptions>,
    mut registry: ResMut<OverlayRegistry>,
    mut commands: Commands,
    roots: Query<Entity, With<GlobeRoot>>,
) {
    let Ok(root) = roots.single() else {
        return;
    };
    let radius = options.globe_radius();

    for layer in &options.borders {
        if !layer.show {
            continue;
        }
        let collection = match crate::geodata::FeatureCollection::load(Path::new(&layer.file)) {
            Ok(collection) => collection,
            Err(err) => {
                error!("border layer {:?}: {err:#}", layer.key);
                continue;
            }
        };

        let color = parse_color_with_alpha(&layer.color, layer.opacity, Color::srgb(1.0, 0.43, 0.62));
        let group = replace_group(
            &mut commands,
            &mut registry,
            &format!("border:{}", layer.key),
            root,
        );

        let mut rings = 0usize;
        for feature in &collection.features {
            for ring in feature.rings() {
                let points: Vec<Vec3> = ring
                    .iter()
                    .map(|&[lon, lat]| lglt2xyz(lon, lat, 0.0, radius))
                    .collect();
                if points.len() < 2 {
                    continue;
                }
                commands.spawn((
                    Transform::default(),
                    Visibility::default(),
                    BorderLine { points, color },
                    ChildOf(group),
                ));
                rings += 1;
            }
        }
        info!("border layer {:?}: {rings} rings from {}", layer.key, layer.file);
    }
}

/// Redraw every border ring through its current global transform.
pub fn draw_border_lines(lines: Query<(&BorderLine, &GlobalTransform)>, mut gizmos: Gizmos) {
    for (line, transform) in lines.iter() {
        let mut points: Vec<Vec3> = line
            .points
            .iter()
            .map(|&p| transform.transform_point(p))
            .collect();
        // Close the ring.
        if let Some(&first) = points.first() {
            points.push(first);
        }
        gizmos.linestrip(points, line.color);
    }
}
