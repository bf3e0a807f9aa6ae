//! Pulsing beam markers on the globe
//!
//! Each data point becomes a small group standing on the surface: two
//! crossed light-column fins, a ground callout quad, and a pulsing wave
//! quad animated by the shared pulse pass.

use bevy::prelude::*;

use crate::animation::PulseStep;
use crate::config::{BeamOptions, DashboardOptions, parse_color_with_alpha};
use crate::core::projection::lglt2xyz;
use crate::core::pulse::Pulse;
use crate::geodata::BeamPoint;

/// Spawn one beam marker per point as children of `group`.
pub fn spawn_beams(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
    options: &DashboardOptions,
    style: &BeamOptions,
    data: &[BeamPoint],
    group: Entity,
) {
    let radius = options.globe_radius();
    // Config radius is in hundredths of the globe radius.
    let marker_radius = style.radius * 0.01;
    let color = parse_color_with_alpha(&style.color, style.opacity, Color::srgb(1.0, 0.25, 0.25));

    let fin = meshes.add(Rectangle::new(
        radius * (marker_radius + 0.03),
        radius * style.base_height,
    ));
    let quad = meshes.add(Rectangle::new(1.0, 1.0));

    let fin_material = materials.add(beam_material(color));
    let callout_material = materials.add(beam_material(color));

    for point in data {
        let position = lglt2xyz(point.lon(), point.lat(), 0.1, radius);
        let outward = position.normalize_or_zero();
        if outward == Vec3::ZERO {
            warn!("beam point at degenerate position, skipped");
            continue;
        }

        // Local +Z points away from the globe center.
        let marker = commands
            .spawn((
                Transform {
                    translation: position,
                    rotation: Quat::from_rotation_arc(Vec3::Z, outward),
                    ..default()
                },
                Visibility::default(),
                ChildOf(group),
            ))
            .id();

        // Two crossed fins standing along the outward axis.
        let lift = radius * style.base_height * 0.5;
        for half_turn in [0.0, std::f32::consts::FRAC_PI_2] {
            commands.spawn((
                Mesh3d(fin.clone()),
                MeshMaterial3d(fin_material.clone()),
                Transform {
                    translation: Vec3::new(0.0, 0.0, lift),
                    rotation: Quat::from_rotation_z(half_turn)
                        * Quat::from_rotation_x(std::f32::consts::FRAC_PI_2),
                    ..default()
                },
                ChildOf(marker),
            ));
        }

        // Ground callout, tangent to the surface.
        commands.spawn((
            Mesh3d(quad.clone()),
            MeshMaterial3d(callout_material.clone()),
            Transform::from_scale(Vec3::splat(radius * marker_radius)),
            ChildOf(marker),
        ));

        // Pulsing wave ring; each wave owns its material so the pulse pass
        // can fade it independently.
        commands.spawn((
            Mesh3d(quad.clone()),
            MeshMaterial3d(materials.add(beam_material(color))),
            Transform::default(),
            Pulse::new(radius * marker_radius + 0.02),
            PulseStep(style.speed),
            ChildOf(marker),
        ));
    }
}

fn beam_material(color: Color) -> StandardMaterial {
    StandardMaterial {
        base_color: color,
        alpha_mode: AlphaMode::Blend,
        unlit: true,
        double_sided: true,
        cull_mode: None,
        ..default()
    }
}
