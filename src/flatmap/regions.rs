//! Extruded map regions
//!
//! Every GeoJSON ring becomes a prism: a triangulated top face plus side
//! walls down to the ground plane. The map group is tipped into the ground
//! plane so the extrusion points up, and region outlines are drawn twice,
//! along the top rim and along the base.

use bevy::asset::RenderAssetUsages;
use bevy::mesh::{Indices, PrimitiveTopology};
use bevy::picking::prelude::*;
use bevy::prelude::*;
use std::f32::consts::FRAC_PI_2;
use std::path::Path;

use crate::config::{DashboardOptions, parse_color_with_alpha};
use crate::core::projection::MapProjector;
use crate::core::triangulate::triangulate_ring;
use crate::host::DashboardRoot;

/// Marker for the flat-map group; its local XY plane is the projected map,
/// local +Z is up after the group tilt.
#[derive(Component)]
pub struct FlatMapRoot;

/// One pickable region plate. `base_color` is what hover restores.
#[derive(Component)]
pub struct RegionPlate {
    pub name: String,
    pub base_color: Color,
}

/// One outline polyline in the map group's local space.
#[derive(Component)]
pub struct RegionOutline {
    pub points: Vec<Vec3>,
    pub color: Color,
}

pub fn setup_regions(
    options: Res<DashboardOptions>,
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    // Tip the projected plane down so the map lies flat and depth extrudes up.
    let root = commands
        .spawn((
            Transform {
                translation: Vec3::from_array(options.map_position),
                rotation: Quat::from_rotation_x(-FRAC_PI_2),
                ..default()
            },
            Visibility::default(),
            FlatMapRoot,
            DashboardRoot,
            Name::new("mapGroup"),
        ))
        .id();

    let projector = match MapProjector::for_map(&options.map_name) {
        Ok(projector) => projector,
        Err(err) => {
            error!("map preset: {err:#}");
            return;
        }
    };
    let collection = match crate::geodata::FeatureCollection::load(Path::new(&options.map_data)) {
        Ok(collection) => collection,
        Err(err) => {
            error!("map data {:?}: {err:#}", options.map_data);
            return;
        }
    };

    let depth = options.area.depth;
    let area_color =
        parse_color_with_alpha(&options.area.color, options.area.opacity, Color::srgb(0.0, 0.49, 1.0));
    let border = options.borders.first().cloned().unwrap_or_default();
    let border_color =
        parse_color_with_alpha(&border.color, border.opacity, Color::srgb(1.0, 0.43, 0.62));

    let mut plates = 0usize;
    for feature in &collection.features {
        let name = feature.properties.name.clone();
        for ring in feature.rings() {
            let mut flat: Vec<Vec2> = ring
                .iter()
                .map(|&[lon, lat]| {
                    let p = projector.project(lon, lat);
                    Vec2::new(p.x, p.y)
                })
                .collect();
            // GeoJSON rings close on themselves; drop the repeated point.
            if flat.len() > 1 && flat.first() == flat.last() {
                flat.pop();
            }

            let Some(mesh) = build_prism(&flat, depth) else {
                warn!("region {name:?}: degenerate ring skipped");
                continue;
            };

            let material = materials.add(StandardMaterial {
                base_color: area_color,
                alpha_mode: if options.area.opacity < 1.0 {
                    AlphaMode::Blend
                } else {
                    AlphaMode::Opaque
                },
                double_sided: true,
                cull_mode: None,
                perceptual_roughness: 1.0,
                ..default()
            });

            commands.spawn((
                Mesh3d(meshes.add(mesh)),
                MeshMaterial3d(material),
                Transform::default(),
                RegionPlate {
                    name: name.clone(),
                    base_color: area_color,
                },
                Pickable::default(),
                ChildOf(root),
            ));

            // Rim and base outlines.
            for z in [depth + 0.01, 0.01] {
                commands.spawn((
                    Transform::default(),
                    Visibility::default(),
                    RegionOutline {
                        points: flat.iter().map(|p| Vec3::new(p.x, p.y, z)).collect(),
                        color: border_color,
                    },
                    ChildOf(root),
                ));
            }
            plates += 1;
        }
    }
    info!(
        "flat map {:?}: {plates} plates from {}",
        options.map_name, options.map_data
    );
}

/// Build one extruded prism: top face at `depth`, walls down to zero.
fn build_prism(ring: &[Vec2], depth: f32) -> Option<Mesh> {
    let triangles = triangulate_ring(ring)?;

    let mut positions: Vec<[f32; 3]> = Vec::new();
    let mut normals: Vec<[f32; 3]> = Vec::new();
    let mut uvs: Vec<[f32; 2]> = Vec::new();
    let mut indices: Vec<u32> = Vec::new();

    // Top face.
    for p in ring {
        positions.push([p.x, p.y, depth]);
        normals.push([0.0, 0.0, 1.0]);
        uvs.push([0.0, 0.0]);
    }
    for [a, b, c] in &triangles {
        indices.extend([*a, *b, *c]);
    }

    // Side walls, one quad per edge with a flat normal.
    let n = ring.len();
    for i in 0..n {
        let j = (i + 1) % n;
        let (p, q) = (ring[i], ring[j]);
        let edge = (q - p).normalize_or_zero();
        if edge == Vec2::ZERO {
            continue;
        }
        let normal = [edge.y, -edge.x, 0.0];

        let base = positions.len() as u32;
        for (v, z) in [(p, 0.0), (q, 0.0), (q, depth), (p, depth)] {
            positions.push([v.x, v.y, z]);
            normals.push(normal);
            uvs.push([0.0, 0.0]);
        }
        indices.extend([base, base + 1, base + 2, base, base + 2, base + 3]);
    }

    let mut mesh = Mesh::new(
        PrimitiveTopology::TriangleList,
        RenderAssetUsages::default(),
    );
    mesh.insert_indices(Indices::U32(indices));
    mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, positions);
    mesh.insert_attribute(Mesh::ATTRIBUTE_NORMAL, normals);
    mesh.insert_attribute(Mesh::ATTRIBUTE_UV_0, uvs);
    Some(mesh)
}

/// Redraw every region outline through the map group's current transform.
pub fn draw_region_outlines(outlines: Query<(&RegionOutline, &GlobalTransform)>, mut gizmos: Gizmos) {
    for (outline, transform) in outlines.iter() {
        let mut points: Vec<Vec3> = outline
            .points
            .iter()
            .map(|&p| transform.transform_point(p))
            .collect();
        if let Some(&first) = points.first() {
            points.push(first);
        }
        gizmos.linestrip(points, outline.color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prism_has_top_and_walls() {
        let ring = vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(2.0, 0.0),
            Vec2::new(2.0, 2.0),
            Vec2::new(0.0, 2.0),
        ];
        let mesh = build_prism(&ring, 1.0).unwrap();
        let positions = mesh.attribute(Mesh::ATTRIBUTE_POSITION).unwrap().len();
        // 4 top verts plus 4 verts per wall quad.
        assert_eq!(positions, 4 + 4 * 4);
    }

    #[test]
    fn test_degenerate_ring_is_rejected() {
        let ring = vec![Vec2::new(0.0, 0.0), Vec2::new(1.0, 0.0)];
        assert!(build_prism(&ring, 1.0).is_none());
    }
}
