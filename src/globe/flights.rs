//! Great-circle flight arcs between globe coordinates
//!
//! Each flight resolves its cubic Bezier once at spawn; the arc is redrawn
//! every frame through the entity's global transform so it rides the globe
//! spin. Endpoints get scatter markers with pulsing waves.

use bevy::prelude::*;

use crate::animation::PulseStep;
use crate::config::{DashboardOptions, FlightOptions, ScatterOptions, parse_color_with_alpha};
use crate::core::arc::{ARC_SEGMENTS, arc_control_points, sample_cubic};
use crate::core::projection::lglt2xyz;
use crate::core::pulse::Pulse;
use crate::geodata::FlightLine;

/// One flight arc, sampled in the globe group's local space.
#[derive(Component)]
pub struct FlightArc {
    pub points: Vec<Vec3>,
    pub color: Color,
}

/// Spawn one arc plus two endpoint markers per flight as children of `group`.
pub fn spawn_flights(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
    options: &DashboardOptions,
    style: &FlightOptions,
    data: &[FlightLine],
    group: Entity,
) {
    let radius = options.globe_radius();
    let line_color = parse_color_with_alpha(
        &style.line.color,
        style.line.opacity,
        Color::srgb(1.0, 0.83, 0.25),
    );
    let quad = meshes.add(Rectangle::new(1.0, 1.0));
    let pulse_step = options.beam.speed;

    for flight in data {
        let (start_lon, start_lat) = flight.start();
        let (end_lon, end_lat) = flight.end();
        let start = lglt2xyz(start_lon, start_lat, 0.1, radius);
        let end = lglt2xyz(end_lon, end_lat, 0.1, radius);

        commands.spawn((
            Transform::default(),
            Visibility::default(),
            FlightArc {
                points: sample_cubic(&arc_control_points(start, end), ARC_SEGMENTS),
                color: line_color,
            },
            ChildOf(group),
        ));

        spawn_scatter(
            commands, materials, &quad, options, &style.scatter_start, start, pulse_step, group,
        );
        spawn_scatter(
            commands, materials, &quad, options, &style.scatter_end, end, pulse_step, group,
        );
    }
}

#[allow(clippy::too_many_arguments)]
fn spawn_scatter(
    commands: &mut Commands,
    materials: &mut Assets<StandardMaterial>,
    quad: &Handle<Mesh>,
    options: &DashboardOptions,
    scatter: &ScatterOptions,
    position: Vec3,
    pulse_step: f32,
    group: Entity,
) {
    let outward = position.normalize_or_zero();
    if outward == Vec3::ZERO {
        return;
    }
    let color = parse_color_with_alpha(&scatter.color, scatter.opacity, Color::srgb(1.0, 0.83, 0.25));

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

    commands.spawn((
        Mesh3d(quad.clone()),
        MeshMaterial3d(materials.add(scatter_material(color))),
        Transform::from_scale(Vec3::splat(options.earth.radius * 0.002 * scatter.size)),
        ChildOf(marker),
    ));

    commands.spawn((
        Mesh3d(quad.clone()),
        MeshMaterial3d(materials.add(scatter_material(color))),
        Transform::default(),
        Pulse::new(options.earth.radius * 0.003 * scatter.size),
        PulseStep(pulse_step),
        ChildOf(marker),
    ));
}

fn scatter_material(color: Color) -> StandardMaterial {
    StandardMaterial {
        base_color: color,
        alpha_mode: AlphaMode::Blend,
        unlit: true,
        double_sided: true,
        cull_mode: None,
        ..default()
    }
}

/// Redraw every flight arc through its current global transform.
pub fn draw_flight_arcs(arcs: Query<(&FlightArc, &GlobalTransform)>, mut gizmos: Gizmos) {
    for (arc, transform) in arcs.iter() {
        let points: Vec<Vec3> = arc
            .points
            .iter()
            .map(|&p| transform.transform_point(p))
            .collect();
        gizmos.linestrip(points, arc.color);
    }
}
