//! Flight tubes on the flat map
//!
//! Flights are swept tube meshes along a quadratic Bezier lifted over the
//! map, with a flow texture scrolled along the tube's length axis. Both
//! endpoints get the same scatter markers as the beam overlay.

use bevy::asset::RenderAssetUsages;
use bevy::mesh::{Indices, PrimitiveTopology};
use bevy::prelude::*;

use crate::animation::{PulseStep, ScrollingTexture};
use crate::config::{DashboardOptions, FlightOptions, ScatterOptions, parse_color_with_alpha};
use crate::core::projection::MapProjector;
use crate::core::pulse::Pulse;
use crate::geodata::FlightLine;

/// How far the arc's control point lifts over the map plane.
const ARC_LIFT: f32 = 20.0;
const TUBE_SIDES: usize = 8;
/// Pulse step for the endpoint waves; the flat map pulses faster than the
/// globe.
const WAVE_STEP: f32 = 0.02;

#[allow(clippy::too_many_arguments)]
pub fn spawn_flights(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
    asset_server: &AssetServer,
    options: &DashboardOptions,
    projector: &MapProjector,
    style: &FlightOptions,
    data: &[FlightLine],
    group: Entity,
) {
    let lift = options.area.depth + 0.02;
    let line_color = parse_color_with_alpha(
        &style.line.color,
        style.line.opacity,
        Color::srgb(1.0, 0.83, 0.25),
    );
    let quad = meshes.add(Rectangle::new(1.0, 1.0));

    for flight in data {
        let (start_lon, start_lat) = flight.start();
        let (end_lon, end_lat) = flight.end();
        let mut start = projector.project(start_lon, start_lat);
        let mut end = projector.project(end_lon, end_lat);
        start.z = lift;
        end.z = lift;

        let control = (start + end) * 0.5 + Vec3::new(0.0, 0.0, ARC_LIFT);
        let segments = style.line.twisty.max(2) as usize;
        let path: Vec<Vec3> = (0..=segments)
            .map(|i| quadratic_point(start, control, end, i as f32 / segments as f32))
            .collect();

        let Some(tube) = build_tube(&path, style.line.width * 0.5) else {
            warn!("flight tube degenerate, skipped");
            continue;
        };

        let mut material = StandardMaterial {
            base_color: line_color,
            alpha_mode: AlphaMode::Blend,
            unlit: true,
            double_sided: true,
            cull_mode: None,
            ..default()
        };
        if !style.line.texture.is_empty() {
            material.base_color_texture = Some(asset_server.load(style.line.texture.clone()));
        }

        commands.spawn((
            Mesh3d(meshes.add(tube)),
            MeshMaterial3d(materials.add(material)),
            Transform::default(),
            ScrollingTexture {
                per_frame: style.line.speed,
            },
            ChildOf(group),
        ));

        spawn_scatter(commands, materials, &quad, &style.scatter_start, start, group);
        spawn_scatter(commands, materials, &quad, &style.scatter_end, end, group);
    }
}

fn quadratic_point(v0: Vec3, v1: Vec3, v2: Vec3, t: f32) -> Vec3 {
    let u = 1.0 - t;
    v0 * (u * u) + v1 * (2.0 * u * t) + v2 * (t * t)
}

/// Sweep a circular cross-section along `path`. The U coordinate runs along
/// the tube so the flow texture scrolls lengthwise.
fn build_tube(path: &[Vec3], radius: f32) -> Option<Mesh> {
    if path.len() < 2 || radius <= 0.0 {
        return None;
    }

    let mut positions: Vec<[f32; 3]> = Vec::new();
    let mut normals: Vec<[f32; 3]> = Vec::new();
    let mut uvs: Vec<[f32; 2]> = Vec::new();
    let mut indices: Vec<u32> = Vec::new();

    let last = path.len() - 1;
    for (i, &point) in path.iter().enumerate() {
        let tangent = if i == 0 {
            path[1] - path[0]
        } else if i == last {
            path[last] - path[last - 1]
        } else {
            path[i + 1] - path[i - 1]
        };
        let tangent = tangent.normalize_or_zero();
        if tangent == Vec3::ZERO {
            return None;
        }
        let side = tangent.any_orthonormal_vector();
        let up = tangent.cross(side);

        let u = i as f32 / last as f32;
        for j in 0..TUBE_SIDES {
            let angle = std::f32::consts::TAU * j as f32 / TUBE_SIDES as f32;
            let normal = side * angle.cos() + up * angle.sin();
            let vertex = point + normal * radius;
            positions.push(vertex.to_array());
            normals.push(normal.to_array());
            uvs.push([u, j as f32 / TUBE_SIDES as f32]);
        }
    }

    let sides = TUBE_SIDES as u32;
    for i in 0..last as u32 {
        for j in 0..sides {
            let a = i * sides + j;
            let b = i * sides + (j + 1) % sides;
            let c = (i + 1) * sides + (j + 1) % sides;
            let d = (i + 1) * sides + j;
            indices.extend([a, b, c, a, c, d]);
        }
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

fn spawn_scatter(
    commands: &mut Commands,
    materials: &mut Assets<StandardMaterial>,
    quad: &Handle<Mesh>,
    scatter: &ScatterOptions,
    position: Vec3,
    group: Entity,
) {
    let color =
        parse_color_with_alpha(&scatter.color, scatter.opacity, Color::srgb(1.0, 0.83, 0.25));
    let material = StandardMaterial {
        base_color: color,
        alpha_mode: AlphaMode::Blend,
        unlit: true,
        double_sided: true,
        cull_mode: None,
        ..default()
    };

    let marker = commands
        .spawn((
            Transform::from_translation(position),
            Visibility::default(),
            ChildOf(group),
        ))
        .id();

    commands.spawn((
        Mesh3d(quad.clone()),
        MeshMaterial3d(materials.add(material.clone())),
        Transform::from_scale(Vec3::splat(scatter.size)),
        ChildOf(marker),
    ));

    commands.spawn((
        Mesh3d(quad.clone()),
        MeshMaterial3d(materials.add(material)),
        Transform::default(),
        Pulse::new(scatter.size * 1.5),
        PulseStep(WAVE_STEP),
        ChildOf(marker),
    ));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quadratic_hits_endpoints() {
        let v0 = Vec3::new(0.0, 0.0, 0.0);
        let v1 = Vec3::new(5.0, 0.0, 20.0);
        let v2 = Vec3::new(10.0, 0.0, 0.0);
        assert!(quadratic_point(v0, v1, v2, 0.0).distance(v0) < 1e-6);
        assert!(quadratic_point(v0, v1, v2, 1.0).distance(v2) < 1e-6);
        // Midpoint rises toward the control point.
        assert!(quadratic_point(v0, v1, v2, 0.5).z > 5.0);
    }

    #[test]
    fn test_tube_vertex_count() {
        let path = vec![
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 1.0),
            Vec3::new(2.0, 0.0, 0.0),
        ];
        let mesh = build_tube(&path, 0.5).unwrap();
        let count = mesh.attribute(Mesh::ATTRIBUTE_POSITION).unwrap().len();
        assert_eq!(count, 3 * TUBE_SIDES);
    }

    #[test]
    fn test_tube_rejects_degenerate_path() {
        assert!(build_tube(&[Vec3::ZERO], 0.5).is_none());
        assert!(build_tube(&[Vec3::ZERO, Vec3::ZERO], 0.5).is_none());
    }
}
