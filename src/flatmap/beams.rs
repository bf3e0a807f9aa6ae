//! Light-column beam markers on the flat map
//!
//! Same marker family as the globe variant, but the column height scales
//! with the data point's weight and positions come from the mercator
//! projector instead of the sphere mapping.

use bevy::prelude::*;
use std::f32::consts::FRAC_PI_2;

use crate::animation::PulseStep;
use crate::config::{BeamOptions, DashboardOptions, parse_color_with_alpha};
use crate::core::projection::MapProjector;
use crate::core::pulse::Pulse;
use crate::geodata::BeamPoint;

/// Spawn one light column per point as children of `group`. The map
/// group's local +Z is up, so no per-marker orientation is needed.
pub fn spawn_beams(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
    options: &DashboardOptions,
    projector: &MapProjector,
    style: &BeamOptions,
    data: &[BeamPoint],
    group: Entity,
) {
    let color = parse_color_with_alpha(&style.color, style.opacity, Color::srgb(1.0, 0.25, 0.25));

    let fin = meshes.add(Rectangle::new(1.0, 1.0));
    let quad = meshes.add(Rectangle::new(1.0, 1.0));
    let fin_material = materials.add(column_material(color));
    let callout_material = materials.add(column_material(color));

    let lift = options.area.depth + 0.02;

    for point in data {
        let mut position = projector.project(point.lon(), point.lat());
        position.z = lift;
        let height = (style.base_height * point.weight()).max(0.01);

        let marker = commands
            .spawn((
                Transform::from_translation(position),
                Visibility::default(),
                ChildOf(group),
            ))
            .id();

        // Crossed fins standing on the map surface.
        for half_turn in [0.0, FRAC_PI_2] {
            commands.spawn((
                Mesh3d(fin.clone()),
                MeshMaterial3d(fin_material.clone()),
                Transform {
                    translation: Vec3::new(0.0, 0.0, height * 0.5),
                    rotation: Quat::from_rotation_z(half_turn) * Quat::from_rotation_x(FRAC_PI_2),
                    scale: Vec3::new(style.radius, height, 1.0),
                },
                ChildOf(marker),
            ));
        }

        commands.spawn((
            Mesh3d(quad.clone()),
            MeshMaterial3d(callout_material.clone()),
            Transform::from_scale(Vec3::splat(style.radius * 1.5)),
            ChildOf(marker),
        ));

        commands.spawn((
            Mesh3d(quad.clone()),
            MeshMaterial3d(materials.add(column_material(color))),
            Transform::default(),
            Pulse::new(style.radius * 2.0),
            PulseStep(style.speed),
            ChildOf(marker),
        ));
    }
}

fn column_material(color: Color) -> StandardMaterial {
    StandardMaterial {
        base_color: color,
        alpha_mode: AlphaMode::Blend,
        unlit: true,
        double_sided: true,
        cull_mode: None,
        ..default()
    }
}
